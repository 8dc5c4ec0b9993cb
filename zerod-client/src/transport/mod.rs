//! HTTP transport abstraction.
//!
//! The client only prepares [`HttpRequest`]s and interprets
//! [`HttpResponse`]s; sending them is delegated to an [`HttpTransport`].
//! [`ReqwestTransport`] is the production implementation.

mod http;
mod traits;

pub use http::ReqwestTransport;
pub use traits::{HttpMethod, HttpRequest, HttpResponse, HttpTransport};
