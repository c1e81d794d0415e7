use crate::core::codec::ErrorCodeTable;
use crate::core::errors::ApiErrorKind;

/// Binance error codes shared by spot and USDⓈ-M futures.
///
/// <https://binance-docs.github.io/apidocs/spot/en/#error-codes>
#[derive(Debug, Clone, Copy, Default)]
pub struct BinanceErrorCodes;

impl ErrorCodeTable for BinanceErrorCodes {
    fn is_success(&self, code: i64) -> bool {
        code == 0 || code == 200
    }

    fn kind(&self, code: i64) -> Option<ApiErrorKind> {
        error_kind(code)
    }
}

pub const fn error_kind(code: i64) -> Option<ApiErrorKind> {
    use ApiErrorKind as K;

    let kind = match code {
        // 10xx general server or network issues
        -1000 => K::Unknown,
        -1001 => K::Disconnected,
        -1002 => K::Unauthorized,
        -1003 => K::TooManyRequests,
        -1006 => K::UnexpectedResponse,
        -1007 => K::Timeout,
        -1008 => K::ServerBusy,
        -1014 => K::UnknownOrderComposition,
        -1015 => K::TooManyOrders,
        -1016 => K::ServiceShuttingDown,
        -1020 => K::UnsupportedOperation,
        -1021 => K::InvalidTimestamp,
        -1022 => K::InvalidSignature,

        // 11xx request issues
        -1100 => K::IllegalChars,
        -1101 => K::TooManyParameters,
        -1102 => K::MandatoryParamMissing,
        -1103 => K::UnknownParam,
        -1104 => K::UnreadParameters,
        -1105 => K::EmptyParam,
        -1106 => K::ParamNotRequired,
        -1111 => K::BadPrecision,
        -1121 => K::InvalidSymbol,
        -1125 => K::InvalidListenKey,
        -1130 => K::InvalidParameter,

        // 20xx order and key issues
        -2010 => K::NewOrderRejected,
        -2011 => K::CancelRejected,
        -2013 => K::NoSuchOrder,
        -2014 => K::BadApiKeyFormat,
        -2015 => K::RejectedApiKey,

        // futures
        -4046 => K::NoNeedToChangeMarginType,
        -4059 => K::NoNeedToChangePositionSide,

        _ => return None,
    };
    Some(kind)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_sentinels() {
        assert!(BinanceErrorCodes.is_success(0));
        assert!(BinanceErrorCodes.is_success(200));
        assert!(!BinanceErrorCodes.is_success(-1021));
    }

    #[test]
    fn test_documented_codes() {
        assert_eq!(
            BinanceErrorCodes.kind(-1021),
            Some(ApiErrorKind::InvalidTimestamp)
        );
        assert_eq!(
            BinanceErrorCodes.kind(-2013),
            Some(ApiErrorKind::NoSuchOrder)
        );
        assert_eq!(
            BinanceErrorCodes.kind(-4059),
            Some(ApiErrorKind::NoNeedToChangePositionSide)
        );
        assert_eq!(BinanceErrorCodes.kind(-9999), None);
    }

    #[test]
    fn test_every_documented_code_and_retry_verdict() {
        use ApiErrorKind as K;

        let table: [(i64, ApiErrorKind, bool); 31] = [
            (-1000, K::Unknown, true),
            (-1001, K::Disconnected, true),
            (-1002, K::Unauthorized, false),
            (-1003, K::TooManyRequests, true),
            (-1006, K::UnexpectedResponse, true),
            (-1007, K::Timeout, true),
            (-1008, K::ServerBusy, true),
            (-1014, K::UnknownOrderComposition, false),
            (-1015, K::TooManyOrders, true),
            (-1016, K::ServiceShuttingDown, true),
            (-1020, K::UnsupportedOperation, false),
            (-1021, K::InvalidTimestamp, true),
            (-1022, K::InvalidSignature, false),
            (-1100, K::IllegalChars, false),
            (-1101, K::TooManyParameters, false),
            (-1102, K::MandatoryParamMissing, false),
            (-1103, K::UnknownParam, false),
            (-1104, K::UnreadParameters, false),
            (-1105, K::EmptyParam, false),
            (-1106, K::ParamNotRequired, false),
            (-1111, K::BadPrecision, false),
            (-1121, K::InvalidSymbol, false),
            (-1125, K::InvalidListenKey, false),
            (-1130, K::InvalidParameter, false),
            (-2010, K::NewOrderRejected, false),
            (-2011, K::CancelRejected, false),
            (-2013, K::NoSuchOrder, false),
            (-2014, K::BadApiKeyFormat, false),
            (-2015, K::RejectedApiKey, false),
            (-4046, K::NoNeedToChangeMarginType, false),
            (-4059, K::NoNeedToChangePositionSide, false),
        ];

        for (code, kind, retryable) in table {
            assert_eq!(BinanceErrorCodes.kind(code), Some(kind), "code {code}");
            assert_eq!(kind.is_retryable(), retryable, "code {code}");
        }
        assert_eq!(BinanceErrorCodes.kind(-9999), None);
        assert_eq!(BinanceErrorCodes.kind(0), None);
    }

    #[test]
    fn test_transient_codes() {
        assert!(error_kind(-1003).is_some_and(ApiErrorKind::is_retryable));
        assert!(error_kind(-1021).is_some_and(ApiErrorKind::is_retryable));
        assert!(!error_kind(-1022).is_some_and(ApiErrorKind::is_retryable));
        assert!(!error_kind(-2010).is_some_and(ApiErrorKind::is_retryable));
    }
}
