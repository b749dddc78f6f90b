//! Contact form submission

use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

use crate::http::{ApiRequest, Dispatcher, TransportError};

pub const CONTACT_PATH: &str = "/api/contact/";

#[derive(Error, Debug)]
pub enum ContactError {
    #[error("{0}")]
    Rejected(String),

    #[error("Error connecting to server.")]
    Transport(#[from] TransportError),
}

/// A message for the site owner
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ContactMessage {
    pub name: String,
    pub email: String,
    pub message: String,
}

#[derive(Clone)]
pub struct ContactApi {
    dispatcher: Dispatcher,
}

impl ContactApi {
    pub fn new(dispatcher: Dispatcher) -> Self {
        Self { dispatcher }
    }

    /// Send a message; returns the server's acknowledgement text
    pub async fn send(&self, message: &ContactMessage) -> Result<String, ContactError> {
        let request = ApiRequest::post(self.dispatcher.url(CONTACT_PATH))
            .json(message)
            .map_err(|e| TransportError::Request(e.to_string()))?;
        let response = self.dispatcher.send_plain(request).await?;
        let body: Value = response.json().unwrap_or(Value::Null);

        if response.ok() {
            Ok(body
                .get("message")
                .and_then(Value::as_str)
                .unwrap_or("Message sent successfully!")
                .to_string())
        } else {
            Err(ContactError::Rejected(
                body.get("error")
                    .and_then(Value::as_str)
                    .unwrap_or("Something went wrong.")
                    .to_string(),
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::transport::mock::MockTransport;
    use crate::session::{Location, MemoryTokenStore};
    use serde_json::json;
    use std::sync::Arc;

    fn api() -> (ContactApi, Arc<MockTransport>) {
        let transport = Arc::new(MockTransport::new());
        let dispatcher = Dispatcher::new(
            "http://api.test",
            transport.clone(),
            Arc::new(MemoryTokenStore::new()),
            Location::new(),
        );
        (ContactApi::new(dispatcher), transport)
    }

    fn message() -> ContactMessage {
        ContactMessage {
            name: "Ann".into(),
            email: "ann@example.com".into(),
            message: "Hello".into(),
        }
    }

    #[tokio::test]
    async fn test_send_returns_server_message() {
        let (api, transport) = api();
        transport.respond(CONTACT_PATH, 200, json!({"message": "Message received successfully!"}));

        let ack = api.send(&message()).await.unwrap();
        assert_eq!(ack, "Message received successfully!");
    }

    #[tokio::test]
    async fn test_send_failure_messages() {
        let (api, transport) = api();
        transport.respond(CONTACT_PATH, 500, json!({"error": "db down"}));
        transport.respond(CONTACT_PATH, 500, json!({}));
        transport.fail(CONTACT_PATH, TransportError::Unavailable);

        assert_eq!(api.send(&message()).await.unwrap_err().to_string(), "db down");
        assert_eq!(
            api.send(&message()).await.unwrap_err().to_string(),
            "Something went wrong."
        );
        assert_eq!(
            api.send(&message()).await.unwrap_err().to_string(),
            "Error connecting to server."
        );
    }
}
