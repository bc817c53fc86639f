//! Holding domain — one asset position inside a portfolio.

#[cfg(feature = "http")]
pub mod client;
mod convert;
pub mod wire;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Server-computed snapshot of one asset in a portfolio.
///
/// Derived values (share of portfolio, predictions) are computed by
/// [`metrics`](crate::domain::portfolio::metrics) and never stored here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Holding {
    pub symbol: String,
    pub portfolio_name: String,
    pub amount: Decimal,
    pub amount_in_btc: Decimal,
    pub price_in_btc: Option<Decimal>,
    pub amount_in_usdt: Decimal,
    pub price_in_usdt: Option<Decimal>,
    /// Share of the portfolio as reported by the server.
    pub percentage: Option<Decimal>,
    pub total_amount_bought: Option<Decimal>,
    pub total_amount_sold: Option<Decimal>,
    /// Cost basis in stablecoins.
    pub stable_total_cost: Option<Decimal>,
    pub current_position_in_usdt: Option<Decimal>,
    pub total_realized_profit_usdt: Option<Decimal>,
}

impl Holding {
    /// Unrealized result of the current position against its cost basis.
    pub fn unrealized_profit_usdt(&self) -> Option<Decimal> {
        match (self.current_position_in_usdt, self.stable_total_cost) {
            (Some(position), Some(cost)) => position.checked_sub(cost),
            _ => None,
        }
    }
}
