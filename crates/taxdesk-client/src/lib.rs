pub mod error;
pub mod http;
pub mod store;

pub use error::ApiError;
pub use http::{ApiClient, DEFAULT_BASE_URL};
pub use store::RecordStore;
