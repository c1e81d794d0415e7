use cex_rest::core::config::Credentials;
use cex_rest::core::errors::{ApiErrorKind, BodyError, TransportError};
use cex_rest::core::kernel::rest::{hooks, ReqwestTransport};
use cex_rest::core::kernel::signer::hmac_sha256_hex;
use cex_rest::exchanges::binance::types::{KlineInterval, KlineParams, OrderSide};
use cex_rest::{BinanceRestClient, BinanceUser};
use rust_decimal::Decimal;
use std::str::FromStr;
use std::time::Duration;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const API_KEY: &str = "wiremock-key";
const SECRET: &str = "wiremock-secret";

fn client(server: &MockServer) -> BinanceRestClient {
    let transport = ReqwestTransport::new("binance").unwrap();
    BinanceRestClient::new(BinanceUser::new(Credentials::new(API_KEY, SECRET)), transport)
        .with_base_urls(server.uri(), server.uri())
}

#[tokio::test]
async fn test_account_request_is_signed() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v3/account"))
        .and(header("X-MBX-APIKEY", API_KEY))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            r#"{"makerCommission":15,"takerCommission":15,"canTrade":true,"canWithdraw":true,"canDeposit":true,"updateTime":123456789,"accountType":"SPOT","balances":[{"asset":"BTC","free":"4723846.89208129","locked":"0.00000000"}]}"#,
        ))
        .expect(1)
        .mount(&server)
        .await;

    let account = client(&server).account().await.unwrap();
    assert_eq!(account.balances[0].asset, "BTC");
    assert_eq!(
        account.balances[0].free,
        Decimal::from_str("4723846.89208129").unwrap()
    );

    let received = server.received_requests().await.unwrap();
    let query = received[0].url.query().unwrap().to_string();
    let (signed, signature) = query.rsplit_once("&signature=").unwrap();
    assert!(signed.starts_with("timestamp="));
    assert_eq!(signature, hmac_sha256_hex(signed, SECRET));
}

#[tokio::test]
async fn test_klines_are_decoded_from_rows() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v3/klines"))
        .and(query_param("symbol", "BTCUSDT"))
        .and(query_param("interval", "1m"))
        .and(query_param("limit", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            r#"[[1499040000000,"0.01634790","0.80000000","0.01575800","0.01577100","148976.11427815",1499644799999,"2434.19055334",308,"1756.87402397","28.46694368","0"]]"#,
        ))
        .mount(&server)
        .await;

    let params = KlineParams::new("BTCUSDT", KlineInterval::Minutes1).with_limit(1);
    let klines = client(&server).klines(&params).await.unwrap();

    assert_eq!(klines.len(), 1);
    assert_eq!(klines[0].trades_number, 308);
    assert_eq!(klines[0].close_price, Decimal::from_str("0.01577100").unwrap());
}

#[tokio::test]
async fn test_clock_skew_is_retried_three_times() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v3/account"))
        .respond_with(ResponseTemplate::new(400).set_body_string(
            r#"{"code":-1021,"msg":"Timestamp for this request was 1000ms ahead of the server's time."}"#,
        ))
        .expect(3)
        .mount(&server)
        .await;

    let err = client(&server).account().await.unwrap_err();

    assert!(err.is_invalid_timestamp());
    assert_eq!(err.transport(), Some(&TransportError::Status(400)));
    assert_eq!(err.http().map(|h| h.status), Some(400));
}

#[tokio::test]
async fn test_server_error_status_with_valid_body_succeeds() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v3/time"))
        .respond_with(ResponseTemplate::new(503).set_body_string(r#"{"serverTime":7}"#))
        .expect(1)
        .mount(&server)
        .await;

    let time = client(&server).server_time().await.unwrap();

    assert_eq!(time.server_time, 7);
}

#[tokio::test]
async fn test_server_error_status_without_body_reports_transport_and_decode() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v3/time"))
        .respond_with(ResponseTemplate::new(503))
        .expect(1)
        .mount(&server)
        .await;

    let err = client(&server).server_time().await.unwrap_err();

    assert_eq!(err.transport(), Some(&TransportError::Status(503)));
    assert!(err.http().is_none());
    assert!(matches!(err.body(), Some(BodyError::Decode(_))));
    assert!(!err.is_invalid_timestamp());
}

#[tokio::test]
async fn test_limit_order_params_reach_exchange() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v3/order"))
        .and(query_param("symbol", "ETHUSDT"))
        .and(query_param("side", "BUY"))
        .and(query_param("type", "LIMIT"))
        .and(query_param("timeInForce", "GTC"))
        .and(query_param("quantity", "0.02"))
        .and(query_param("price", "1500"))
        .and(header("X-MBX-APIKEY", API_KEY))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            r#"{"symbol":"ETHUSDT","orderId":28,"orderListId":-1,"clientOrderId":"6gCrw2kRUAF9CvJDGP16IP","transactTime":1507725176595,"price":"1500.00000000","origQty":"0.02000000","executedQty":"0.00000000","status":"NEW","timeInForce":"GTC","type":"LIMIT","side":"BUY"}"#,
        ))
        .expect(1)
        .mount(&server)
        .await;

    let order = client(&server)
        .limit_order(
            "ETHUSDT",
            OrderSide::Buy,
            Decimal::from_str("0.02").unwrap(),
            Decimal::from(1500),
        )
        .await
        .unwrap();

    assert_eq!(order.order_id, 28);
    assert_eq!(order.side, Some(OrderSide::Buy));
    assert_eq!(order.status.as_deref(), Some("NEW"));
}

#[tokio::test]
async fn test_rejected_order_maps_error_code() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/api/v3/order"))
        .respond_with(
            ResponseTemplate::new(400)
                .set_body_string(r#"{"code":-2011,"msg":"Unknown order sent."}"#),
        )
        .expect(1)
        .mount(&server)
        .await;

    let params = cex_rest::exchanges::binance::types::OrderIdParams::by_id("ETHUSDT", 7);
    let err = client(&server).cancel_order(&params).await.unwrap_err();

    assert!(err.is(ApiErrorKind::CancelRejected));
    assert_eq!(err.body().and_then(BodyError::code), Some(-2011));
}

#[tokio::test]
async fn test_position_mode_change_accepts_success_code() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/fapi/v1/positionSide/dual"))
        .and(query_param("dualSidePosition", "true"))
        .respond_with(
            ResponseTemplate::new(200).set_body_string(r#"{"code":200,"msg":"success"}"#),
        )
        .expect(1)
        .mount(&server)
        .await;

    let ack = client(&server)
        .change_position_mode(true)
        .await
        .unwrap();
    assert_eq!(ack.msg, "success");
}

#[tokio::test]
async fn test_timeout_hook_fails_slow_responses() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v3/time"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(r#"{"serverTime":1}"#)
                .set_delay(Duration::from_millis(500)),
        )
        .mount(&server)
        .await;

    let err = client(&server)
        .with_hook(hooks::timeout(Duration::from_millis(50)))
        .server_time()
        .await
        .unwrap_err();

    assert_eq!(err.transport(), Some(&TransportError::Timeout));
    assert!(err.http().is_none());
}
