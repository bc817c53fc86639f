//! Coin information — current prices of the assets in a portfolio.

#[cfg(feature = "http")]
pub mod client;
pub mod wire;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use wire::CoinInformationResponse;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CoinInformation {
    pub symbol: String,
    pub current_price: Decimal,
}

impl From<CoinInformationResponse> for CoinInformation {
    fn from(c: CoinInformationResponse) -> Self {
        Self {
            symbol: c.symbol,
            current_price: c.current_price,
        }
    }
}

/// Price of `symbol` in a fetched list.
pub fn price_of(coins: &[CoinInformation], symbol: &str) -> Option<Decimal> {
    coins
        .iter()
        .find(|c| c.symbol.eq_ignore_ascii_case(symbol))
        .map(|c| c.current_price)
}
