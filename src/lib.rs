pub mod core;
pub mod exchanges;

pub use crate::core::errors::{ApiErrorKind, RequestError, RequestErrorKind};
pub use crate::core::request::{request, Requester};
pub use exchanges::binance::{BinanceRestClient, BinanceUser};
