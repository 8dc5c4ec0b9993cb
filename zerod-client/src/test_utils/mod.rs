//! Test utilities for the zerod client.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use zerod_client::test_utils::MockTransport;
//! use zerod_client::transport::HttpResponse;
//!
//! let transport = Arc::new(MockTransport::new());
//! transport.push_response(HttpResponse::new(500, ""));
//!
//! let client = ApiClient::builder().transport(transport.clone()).build()?;
//! let response = client.post("profile", Params::new()).await?;
//! assert!(response.is_error());
//! assert_eq!(transport.requests().len(), 1);
//! ```

mod mock_transport;

pub use mock_transport::MockTransport;
