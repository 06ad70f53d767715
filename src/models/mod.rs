pub mod bulk_response;
pub mod log_entry;
