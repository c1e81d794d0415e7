pub mod codec;
pub mod config;
pub mod endpoint;
pub mod errors;
pub mod kernel;
pub mod request;
pub mod status;
