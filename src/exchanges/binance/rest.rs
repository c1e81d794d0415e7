use crate::core::config::{ConfigError, ExchangeConfig};
use crate::core::endpoint::Endpoint;
use crate::core::errors::RequestError;
use crate::core::kernel::rest::{
    HttpTransport, ReqwestTransport, RequestHook, RestClientBuilder, RestClientConfig,
};
use crate::core::request::Requester;
use crate::exchanges::binance::endpoints::{
    self, FUTURES_BASE_URL, FUTURES_TESTNET_BASE_URL, SPOT_BASE_URL, SPOT_TESTNET_BASE_URL,
};
use crate::exchanges::binance::types::{
    ChangePositionModeParams, CodeMsg, FuturesNewOrderParams, FuturesOrder, Kline, KlineParams,
    NewSpotOrderParams, OrderBook, OrderBookParams, OrderIdParams, OrderSide, PositionMode,
    ServerTime, SpotAccount, SpotOrder, TickerPrice, TickerPriceParams,
};
use crate::exchanges::binance::user::BinanceUser;
use rust_decimal::Decimal;
use serde::Serialize;
use std::borrow::Cow;
use tracing::instrument;

/// Typed Binance client over the generic executor
///
/// Every method maps to one endpoint definition in [`endpoints`]; base URLs
/// can be redirected (testnet, mock server) without touching the definitions.
pub struct BinanceRestClient<T = ReqwestTransport> {
    requester: Requester<BinanceUser, T>,
    spot_base_url: Cow<'static, str>,
    futures_base_url: Cow<'static, str>,
}

impl BinanceRestClient<ReqwestTransport> {
    /// Client for the configured account, honouring testnet and base URL overrides
    pub fn from_config(config: &ExchangeConfig) -> Result<Self, ConfigError> {
        let transport = RestClientBuilder::new(RestClientConfig::new("binance".to_string())).build()?;
        let mut client = Self::new(BinanceUser::from_config(config), transport);
        if config.testnet {
            client = client.with_testnet();
        }
        if let Some(base_url) = &config.base_url {
            client.spot_base_url = Cow::Owned(base_url.clone());
        }
        Ok(client)
    }
}

impl<T: HttpTransport> BinanceRestClient<T> {
    pub fn new(user: BinanceUser, transport: T) -> Self {
        Self {
            requester: Requester::new(user, transport),
            spot_base_url: Cow::Borrowed(SPOT_BASE_URL),
            futures_base_url: Cow::Borrowed(FUTURES_BASE_URL),
        }
    }

    #[must_use]
    pub fn with_testnet(mut self) -> Self {
        self.spot_base_url = Cow::Borrowed(SPOT_TESTNET_BASE_URL);
        self.futures_base_url = Cow::Borrowed(FUTURES_TESTNET_BASE_URL);
        self
    }

    /// Sends spot and futures requests to other hosts
    #[must_use]
    pub fn with_base_urls(
        mut self,
        spot: impl Into<Cow<'static, str>>,
        futures: impl Into<Cow<'static, str>>,
    ) -> Self {
        self.spot_base_url = spot.into();
        self.futures_base_url = futures.into();
        self
    }

    /// Hook applied to every request made by this client
    #[must_use]
    pub fn with_hook(mut self, hook: RequestHook) -> Self {
        self.requester = self.requester.with_hook(hook);
        self
    }

    pub const fn user(&self) -> &BinanceUser {
        self.requester.maker()
    }

    pub fn spot_base_url(&self) -> &str {
        &self.spot_base_url
    }

    pub fn futures_base_url(&self) -> &str {
        &self.futures_base_url
    }

    /// Runs any endpoint, rerouted to this client's hosts
    pub async fn execute<P, R>(
        &self,
        endpoint: &Endpoint<P, R>,
        params: &P,
        hooks: &[RequestHook],
    ) -> Result<R, RequestError>
    where
        P: Serialize,
    {
        let endpoint = self.route(endpoint);
        self.requester.request(&endpoint, params, hooks).await
    }

    fn route<P, R>(&self, endpoint: &Endpoint<P, R>) -> Endpoint<P, R> {
        let base_url = if endpoint.base.base_url == FUTURES_BASE_URL {
            &self.futures_base_url
        } else if endpoint.base.base_url == SPOT_BASE_URL {
            &self.spot_base_url
        } else {
            return endpoint.clone();
        };
        endpoint.clone().with_base_url(base_url.clone())
    }

    pub async fn ping(&self) -> Result<(), RequestError> {
        self.execute(&endpoints::PING, &(), &[]).await.map(|_| ())
    }

    /// Get server time
    #[instrument(skip(self), fields(exchange = "binance"))]
    pub async fn server_time(&self) -> Result<ServerTime, RequestError> {
        self.execute(&endpoints::SERVER_TIME, &(), &[]).await
    }

    /// Get klines/candlestick data
    #[instrument(skip(self), fields(exchange = "binance", symbol = %params.symbol))]
    pub async fn klines(&self, params: &KlineParams) -> Result<Vec<Kline>, RequestError> {
        self.execute(&endpoints::KLINES, params, &[]).await
    }

    #[instrument(skip(self), fields(exchange = "binance"))]
    pub async fn order_book(
        &self,
        symbol: &str,
        limit: Option<u32>,
    ) -> Result<OrderBook, RequestError> {
        let params = OrderBookParams {
            symbol: symbol.to_string(),
            limit,
        };
        self.execute(&endpoints::ORDER_BOOK, &params, &[]).await
    }

    #[instrument(skip(self), fields(exchange = "binance"))]
    pub async fn ticker_price(&self, symbol: &str) -> Result<TickerPrice, RequestError> {
        let params = TickerPriceParams {
            symbol: Some(symbol.to_string()),
        };
        self.execute(&endpoints::TICKER_PRICE, &params, &[]).await
    }

    /// Get account information
    #[instrument(skip(self), fields(exchange = "binance"))]
    pub async fn account(&self) -> Result<SpotAccount, RequestError> {
        self.execute(&endpoints::SPOT_ACCOUNT, &(), &[]).await
    }

    /// Place an order
    #[instrument(skip(self, order), fields(exchange = "binance", symbol = %order.symbol))]
    pub async fn place_order(&self, order: &NewSpotOrderParams) -> Result<SpotOrder, RequestError> {
        self.execute(&endpoints::NEW_SPOT_ORDER, order, &[]).await
    }

    pub async fn limit_order(
        &self,
        symbol: &str,
        side: OrderSide,
        quantity: Decimal,
        price: Decimal,
    ) -> Result<SpotOrder, RequestError> {
        self.place_order(&NewSpotOrderParams::limit(symbol, side, quantity, price))
            .await
    }

    pub async fn market_order(
        &self,
        symbol: &str,
        side: OrderSide,
        quantity: Decimal,
    ) -> Result<SpotOrder, RequestError> {
        self.place_order(&NewSpotOrderParams::market(symbol, side, quantity))
            .await
    }

    #[instrument(skip(self), fields(exchange = "binance", symbol = %order.symbol))]
    pub async fn query_order(&self, order: &OrderIdParams) -> Result<SpotOrder, RequestError> {
        self.execute(&endpoints::QUERY_SPOT_ORDER, order, &[]).await
    }

    /// Cancel an order
    #[instrument(skip(self), fields(exchange = "binance", symbol = %order.symbol))]
    pub async fn cancel_order(&self, order: &OrderIdParams) -> Result<SpotOrder, RequestError> {
        self.execute(&endpoints::CANCEL_SPOT_ORDER, order, &[]).await
    }

    #[instrument(skip(self), fields(exchange = "binance_perp"))]
    pub async fn position_mode(&self) -> Result<PositionMode, RequestError> {
        self.execute(&endpoints::FU_POSITION_MODE, &(), &[]).await
    }

    /// Switch between one-way (`false`) and hedge (`true`) mode
    #[instrument(skip(self), fields(exchange = "binance_perp"))]
    pub async fn change_position_mode(&self, dual_side: bool) -> Result<CodeMsg, RequestError> {
        let params = ChangePositionModeParams {
            dual_side_position: dual_side,
        };
        self.execute(&endpoints::FU_CHANGE_POSITION_MODE, &params, &[])
            .await
    }

    #[instrument(skip(self, order), fields(exchange = "binance_perp", symbol = %order.symbol))]
    pub async fn futures_order(
        &self,
        order: &FuturesNewOrderParams,
    ) -> Result<FuturesOrder, RequestError> {
        self.execute(&endpoints::FU_NEW_ORDER, order, &[]).await
    }
}
