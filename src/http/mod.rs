//! HTTP Layer
//!
//! Request descriptors, the transport seam, and the authenticated dispatcher
//! that every protected API call goes through.
//!
//! ## Architecture
//!
//! - **Request**: `ApiRequest` / `ApiResponse`, transport-neutral and cloneable
//! - **Transport**: one raw exchange (`reqwest` in production)
//! - **Dispatcher**: bearer injection plus one refresh-and-retry on 401

mod dispatcher;
mod request;
pub(crate) mod transport;

pub use dispatcher::{DispatchError, Dispatcher, REFRESH_PATH};
pub use request::{ApiRequest, ApiResponse, FormPart, Headers, Method, RequestBody};
pub use transport::{ReqwestTransport, Transport, TransportError};
