pub mod codec;
pub mod codes;
pub mod endpoints;
pub mod rest;
pub mod signer;
pub mod types;
pub mod user;

// Re-export main types for easier importing
pub use codes::BinanceErrorCodes;
pub use rest::BinanceRestClient;
pub use user::BinanceUser;
