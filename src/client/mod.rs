pub mod api;

pub use api::{ApiClient, DEFAULT_BASE_URL};
