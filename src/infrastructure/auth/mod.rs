pub mod middleware;
pub mod request_id;

pub use middleware::{api_key_middleware, ApiCaller, X_API_KEY};
pub use request_id::{request_id_middleware, RequestId, X_REQUEST_ID};
