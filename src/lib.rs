pub mod bulk_loader;
pub mod conf;
pub mod error;
pub mod es_client;
pub mod log_generator;
pub mod models;
pub mod utils;

pub use error::IngestError;
