//! Proxy module
//!
//! Handles request forwarding to the inference backend.

pub mod forwarder;
pub mod headers;
pub mod logging;
pub mod response;

pub use forwarder::{Forwarder, ProxyRequest};
pub use response::{ProxyResponse, RelayBody};
