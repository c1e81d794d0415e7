//! Binance endpoint definitions.
//!
//! Interval hints follow the documented request weights; they are
//! informational and not enforced.

use crate::core::endpoint::{Endpoint, EndpointBase};
use crate::exchanges::binance::codec;
use crate::exchanges::binance::types::{
    ChangePositionModeParams, CodeMsg, FuturesNewOrderParams, FuturesOrder, Kline, KlineParams,
    NewSpotOrderParams, OrderBook, OrderBookParams, OrderIdParams, PositionMode, ServerTime,
    SpotAccount, SpotOrder, TickerPrice, TickerPriceParams,
};
use reqwest::Method;
use serde_json::Value;

pub const SPOT_BASE_URL: &str = "https://api.binance.com";
pub const SPOT_TESTNET_BASE_URL: &str = "https://testnet.binance.vision";
pub const FUTURES_BASE_URL: &str = "https://fapi.binance.com";
pub const FUTURES_TESTNET_BASE_URL: &str = "https://testnet.binancefuture.com";

const fn spot(path: &'static str, method: Method, requires_auth: bool, ip_ms: u64) -> EndpointBase {
    EndpointBase::new(SPOT_BASE_URL, path, method, requires_auth, 0, ip_ms)
}

const fn futures(
    path: &'static str,
    method: Method,
    requires_auth: bool,
    ip_ms: u64,
) -> EndpointBase {
    EndpointBase::new(FUTURES_BASE_URL, path, method, requires_auth, 0, ip_ms)
}

// Spot market data

pub const PING: Endpoint<(), Value> = Endpoint::new(
    spot("/api/v3/ping", Method::GET, false, 10),
    codec::http_status,
    codec::body::<Value>,
);

pub const SERVER_TIME: Endpoint<(), ServerTime> = Endpoint::new(
    spot("/api/v3/time", Method::GET, false, 10),
    codec::http_status,
    codec::body::<ServerTime>,
);

pub const KLINES: Endpoint<KlineParams, Vec<Kline>> = Endpoint::new(
    spot("/api/v3/klines", Method::GET, false, 20),
    codec::http_status,
    codec::klines,
);

pub const ORDER_BOOK: Endpoint<OrderBookParams, OrderBook> = Endpoint::new(
    spot("/api/v3/depth", Method::GET, false, 50),
    codec::http_status,
    codec::order_book,
);

pub const TICKER_PRICE: Endpoint<TickerPriceParams, TickerPrice> = Endpoint::new(
    spot("/api/v3/ticker/price", Method::GET, false, 20),
    codec::http_status,
    codec::body::<TickerPrice>,
);

// Spot user data

pub const SPOT_ACCOUNT: Endpoint<(), SpotAccount> = Endpoint::new(
    spot("/api/v3/account", Method::GET, true, 200),
    codec::http_status,
    codec::body::<SpotAccount>,
);

pub const NEW_SPOT_ORDER: Endpoint<NewSpotOrderParams, SpotOrder> = Endpoint::new(
    EndpointBase::new(SPOT_BASE_URL, "/api/v3/order", Method::POST, true, 10, 10),
    codec::http_status,
    codec::body::<SpotOrder>,
);

pub const QUERY_SPOT_ORDER: Endpoint<OrderIdParams, SpotOrder> = Endpoint::new(
    spot("/api/v3/order", Method::GET, true, 40),
    codec::http_status,
    codec::body::<SpotOrder>,
);

pub const CANCEL_SPOT_ORDER: Endpoint<OrderIdParams, SpotOrder> = Endpoint::new(
    spot("/api/v3/order", Method::DELETE, true, 10),
    codec::http_status,
    codec::body::<SpotOrder>,
);

// USDⓈ-M futures user data

pub const FU_POSITION_MODE: Endpoint<(), PositionMode> = Endpoint::new(
    futures("/fapi/v1/positionSide/dual", Method::GET, true, 300),
    codec::http_status,
    codec::body::<PositionMode>,
);

pub const FU_CHANGE_POSITION_MODE: Endpoint<ChangePositionModeParams, CodeMsg> = Endpoint::new(
    futures("/fapi/v1/positionSide/dual", Method::POST, true, 10),
    codec::http_status,
    codec::body::<CodeMsg>,
);

pub const FU_NEW_ORDER: Endpoint<FuturesNewOrderParams, FuturesOrder> = Endpoint::new(
    futures("/fapi/v1/order", Method::POST, true, 10),
    codec::http_status,
    codec::body::<FuturesOrder>,
);
