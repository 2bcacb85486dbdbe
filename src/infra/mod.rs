pub mod clock;
pub mod dataset_output_adapter;
pub mod http_client;
pub mod rate_limiter_adapter;
