use crate::core::config::Credentials;
use crate::core::errors::BuildError;
use crate::core::kernel::query::{encode, QueryPairs};

pub const TIMESTAMP: &str = "timestamp";
pub const SIGNATURE: &str = "signature";

/// Current epoch time in milliseconds
pub fn timestamp_ms() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// Builds a signed query string for a user-data endpoint.
///
/// `timestamp` always overrides a caller value. The pairs are encoded in key
/// order and signed; the signature is appended last, since Binance requires it
/// to be the final parameter.
pub fn signed_query(
    mut pairs: QueryPairs,
    timestamp: i64,
    credentials: &Credentials,
) -> Result<String, BuildError> {
    if pairs.contains_key(SIGNATURE) {
        return Err(BuildError::ReservedParam(SIGNATURE.to_string()));
    }
    pairs.insert(TIMESTAMP.to_string(), timestamp.to_string());

    let query = encode(&pairs);
    let signature = credentials.sign(&query);
    Ok(format!("{query}&{SIGNATURE}={signature}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_signature_is_last_and_matches_hmac() {
        let mut pairs = QueryPairs::new();
        pairs.insert("symbol".into(), "ETHUSDT".into());

        let query = signed_query(pairs, 1_700_000_000_000, &Credentials::new("api", "k")).unwrap();
        assert_eq!(
            query,
            "symbol=ETHUSDT&timestamp=1700000000000&signature=986508843f64d97f9ff7de9be205600e735dd36e6f834715941829d7ebfffded"
        );
    }

    #[test]
    fn test_caller_timestamp_is_overridden() {
        let mut pairs = QueryPairs::new();
        pairs.insert("timestamp".into(), "1".into());

        let query =
            signed_query(pairs, 1_700_000_000_000, &Credentials::new("api", "secret")).unwrap();
        assert_eq!(
            query,
            "timestamp=1700000000000&signature=d615d05216c634afd48df5e1fc52c0d95b77892f19502e1b619f391bc9d68205"
        );
    }

    #[test]
    fn test_signature_param_is_reserved() {
        let mut pairs = QueryPairs::new();
        pairs.insert("signature".into(), "forged".into());

        let err = signed_query(pairs, 1, &Credentials::new("api", "k")).unwrap_err();
        assert!(matches!(err, BuildError::ReservedParam(ref p) if p == "signature"));
    }

    #[test]
    fn test_missing_signer_sends_empty_signature() {
        let query = signed_query(
            QueryPairs::new(),
            1_700_000_000_000,
            &Credentials::unsigned("api", "k"),
        )
        .unwrap();
        assert_eq!(query, "timestamp=1700000000000&signature=");
    }

    #[test]
    fn test_timestamp_is_epoch_millis() {
        // 2020-09-13, well before any plausible test run
        assert!(timestamp_ms() > 1_600_000_000_000);
    }
}
