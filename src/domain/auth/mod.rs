pub mod jwt;

pub use jwt::{ApiKeyClaims, ApiKeyValidator};
