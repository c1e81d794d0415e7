use cex_rest::core::config::ExchangeConfig;
use cex_rest::exchanges::binance::types::{KlineInterval, KlineParams};
use cex_rest::BinanceRestClient;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    // Public endpoints work without keys; BINANCE_API_KEY and BINANCE_SECRET_KEY enable the rest
    let config = ExchangeConfig::from_env("binance").unwrap_or_else(|_| ExchangeConfig::read_only());
    let binance = BinanceRestClient::from_config(&config)?;

    let time = binance.server_time().await?;
    println!("Server time: {}", time.server_time);

    println!("Fetching klines...");
    let params = KlineParams::new("BTCUSDT", KlineInterval::Minutes1).with_limit(5);
    for kline in binance.klines(&params).await? {
        println!(
            "{} open {} high {} low {} close {}",
            kline.open_time, kline.open_price, kline.high_price, kline.low_price, kline.close_price
        );
    }

    if config.has_credentials() {
        match binance.account().await {
            Ok(account) => {
                for balance in account.balances.iter().filter(|b| !b.free.is_zero()) {
                    println!("{}: {} (locked {})", balance.asset, balance.free, balance.locked);
                }
            }
            Err(e) if e.is_invalid_timestamp() => {
                println!("Clock skew persisted after retries: {}", e);
            }
            Err(e) => {
                println!("Error fetching account: {}", e);
            }
        }
    }

    Ok(())
}
