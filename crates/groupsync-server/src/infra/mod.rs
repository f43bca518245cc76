pub mod metrics;
pub mod request_context;
