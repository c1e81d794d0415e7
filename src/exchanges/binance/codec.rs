use crate::core::codec::{decode_positional_rows, decode_with_envelope, FromBody};
use crate::core::errors::{BodyError, HttpErrorKind};
use crate::core::status;
use crate::exchanges::binance::codes::BinanceErrorCodes;
use crate::exchanges::binance::types::{BookLevel, Kline, OrderBook, RawOrderBook};
use rust_decimal::Decimal;
use std::str::FromStr;

/// Kline row positions, in the order Binance sends them.
pub const KLINE_FIELDS: [&str; 12] = [
    "openTime",
    "openPrice",
    "highPrice",
    "lowPrice",
    "closePrice",
    "volume",
    "closeTime",
    "quoteAssetVolume",
    "tradesNumber",
    "takerBuyBaseAssetVolume",
    "takerBuyQuoteAssetVolume",
    "unused",
];

/// Binance status classifier.
///
/// A 5xx means the request outcome is unknown (it may have been executed),
/// so it is not reported as an error here.
pub const fn http_status(status: u16) -> Option<HttpErrorKind> {
    if status::is_success(status) || (status >= 500 && status < 600) {
        None
    } else {
        Some(HttpErrorKind::from_status(status))
    }
}

/// Envelope check, then the type's own decoding.
pub fn body<R: FromBody>(body: &[u8]) -> Result<R, BodyError> {
    decode_with_envelope(&BinanceErrorCodes, body, R::from_body)
}

pub fn klines(body: &[u8]) -> Result<Vec<Kline>, BodyError> {
    decode_with_envelope(&BinanceErrorCodes, body, |b| {
        decode_positional_rows(b, &KLINE_FIELDS)
    })
}

pub fn order_book(body: &[u8]) -> Result<OrderBook, BodyError> {
    decode_with_envelope(&BinanceErrorCodes, body, |b| {
        let raw: RawOrderBook = serde_json::from_slice(b).map_err(BodyError::decode)?;
        Ok(OrderBook {
            last_update_id: raw.last_update_id,
            event_time: raw.event_time,
            transaction_time: raw.transaction_time,
            bids: parse_levels(&raw.bids, "bids")?,
            asks: parse_levels(&raw.asks, "asks")?,
        })
    })
}

fn parse_levels(raw: &[Vec<String>], side: &str) -> Result<Vec<BookLevel>, BodyError> {
    raw.iter()
        .map(|level| {
            let [price, qty] = level.as_slice() else {
                return Err(BodyError::Decode(format!(
                    "{side}: price and qty level has {} entries",
                    level.len()
                )));
            };
            Ok(BookLevel {
                price: parse_decimal(price, side)?,
                qty: parse_decimal(qty, side)?,
            })
        })
        .collect()
}

fn parse_decimal(value: &str, side: &str) -> Result<Decimal, BodyError> {
    Decimal::from_str(value).map_err(|e| BodyError::Decode(format!("{side}: parse {value}: {e}")))
}
