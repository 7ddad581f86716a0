pub mod cache;

pub use cache::{QueryClient, QueryError, QueryKey, QuerySnapshot, QueryStatus};
