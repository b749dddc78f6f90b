//! HTTP Transport
//!
//! The seam between request descriptors and the network. Production code uses
//! [`ReqwestTransport`]; tests script responses through a mock.

use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use thiserror::Error;

use super::request::{ApiRequest, ApiResponse, FormPart, Headers, Method, RequestBody};

/// Errors raised before a response was received
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TransportError {
    #[error("Server unavailable")]
    Unavailable,

    #[error("Request timeout")]
    Timeout,

    #[error("Request failed: {0}")]
    Request(String),
}

/// Issues exactly one HTTP exchange per call
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse, TransportError>;
}

/// `reqwest`-backed transport
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    /// Build a transport with a per-request timeout
    pub fn new(timeout: Duration) -> Result<Self, TransportError> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("sales-predictor/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| TransportError::Request(e.to_string()))?;

        Ok(Self { client })
    }

    /// Wrap an already configured client
    pub fn with_client(client: Client) -> Self {
        Self { client }
    }
}

fn classify(err: reqwest::Error) -> TransportError {
    if err.is_timeout() {
        TransportError::Timeout
    } else if err.is_connect() {
        TransportError::Unavailable
    } else {
        TransportError::Request(err.to_string())
    }
}

fn to_form(parts: Vec<FormPart>) -> reqwest::multipart::Form {
    parts
        .into_iter()
        .fold(reqwest::multipart::Form::new(), |form, part| match part {
            FormPart::Text { name, value } => form.text(name, value),
            FormPart::File {
                name,
                file_name,
                bytes,
            } => form.part(
                name,
                reqwest::multipart::Part::bytes(bytes).file_name(file_name),
            ),
        })
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse, TransportError> {
        let method = match request.method {
            Method::Get => reqwest::Method::GET,
            Method::Post => reqwest::Method::POST,
            Method::Put => reqwest::Method::PUT,
            Method::Delete => reqwest::Method::DELETE,
        };

        let is_multipart = matches!(request.body, RequestBody::Multipart(_));
        let mut builder = self.client.request(method, &request.url);
        for (name, value) in request.headers.iter() {
            // reqwest writes its own boundary for multipart bodies
            if is_multipart && name.eq_ignore_ascii_case("content-type") {
                continue;
            }
            builder = builder.header(name, value);
        }

        builder = match request.body {
            RequestBody::Empty => builder,
            RequestBody::Json(value) => builder.body(value.to_string()),
            RequestBody::Multipart(parts) => builder.multipart(to_form(parts)),
        };

        let response = builder.send().await.map_err(classify)?;

        let status = response.status().as_u16();
        let mut headers = Headers::new();
        for (name, value) in response.headers() {
            if let Ok(value) = value.to_str() {
                headers.set(name.as_str(), value);
            }
        }
        let body = response.bytes().await.map_err(classify)?.to_vec();

        Ok(ApiResponse {
            status,
            headers,
            body,
        })
    }
}

#[cfg(test)]
pub(crate) mod mock {
    //! Scripted transport for unit tests

    use super::*;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    /// A scripted reply for the next matching request
    pub(crate) enum Reply {
        Respond(ApiResponse),
        Fail(TransportError),
    }

    /// Replies are consumed per URL in the order they were queued; every request
    /// is recorded.
    #[derive(Default)]
    pub(crate) struct MockTransport {
        replies: Mutex<Vec<(String, VecDeque<Reply>)>>,
        requests: Mutex<Vec<ApiRequest>>,
    }

    impl MockTransport {
        pub(crate) fn new() -> Self {
            Self::default()
        }

        fn push(&self, url_suffix: &str, reply: Reply) {
            let mut replies = self.replies.lock().unwrap();
            if let Some((_, queue)) = replies.iter_mut().find(|(u, _)| u == url_suffix) {
                queue.push_back(reply);
            } else {
                replies.push((url_suffix.to_string(), VecDeque::from([reply])));
            }
        }

        /// Queue a JSON reply for requests whose URL ends with `url_suffix`
        pub(crate) fn respond(&self, url_suffix: &str, status: u16, body: serde_json::Value) {
            self.push(
                url_suffix,
                Reply::Respond(ApiResponse::json_body(status, &body)),
            );
        }

        /// Queue a transport failure
        pub(crate) fn fail(&self, url_suffix: &str, error: TransportError) {
            self.push(url_suffix, Reply::Fail(error));
        }

        pub(crate) fn requests(&self) -> Vec<ApiRequest> {
            self.requests.lock().unwrap().clone()
        }

        pub(crate) fn requests_to(&self, url_suffix: &str) -> Vec<ApiRequest> {
            self.requests()
                .into_iter()
                .filter(|r| url_matches(&r.url, url_suffix))
                .collect()
        }
    }

    /// Suffix match on the full URL or on the URL without its query string
    fn url_matches(url: &str, suffix: &str) -> bool {
        url.ends_with(suffix) || url.split('?').next().is_some_and(|path| path.ends_with(suffix))
    }

    #[async_trait]
    impl Transport for MockTransport {
        async fn send(&self, request: ApiRequest) -> Result<ApiResponse, TransportError> {
            self.requests.lock().unwrap().push(request.clone());

            let mut replies = self.replies.lock().unwrap();
            // Longest suffix wins so `/saved-results/` does not shadow `/edit/1/`
            let mut candidates: Vec<_> = replies
                .iter_mut()
                .filter(|(suffix, queue)| url_matches(&request.url, suffix) && !queue.is_empty())
                .collect();
            candidates.sort_by_key(|(suffix, _)| std::cmp::Reverse(suffix.len()));

            match candidates.into_iter().next().and_then(|(_, q)| q.pop_front()) {
                Some(Reply::Respond(response)) => Ok(response),
                Some(Reply::Fail(error)) => Err(error),
                None => Err(TransportError::Request(format!(
                    "no scripted reply for {} {}",
                    request.method, request.url
                ))),
            }
        }
    }
}
