mod endpoints;
mod http_transport;

pub use endpoints::{build_request_headers, PreparedEndpoints};
pub use http_transport::ApiClient;
