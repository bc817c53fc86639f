//! Portfolio domain — valuation snapshots, summaries and derived metrics.

#[cfg(feature = "http")]
pub mod client;
mod convert;
pub mod metrics;
pub mod state;
pub mod wire;

use crate::domain::holding::Holding;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

pub use metrics::{HoldingMetrics, Multipliers, PortfolioTotals};
pub use state::PortfolioDetail;

/// Number of holdings shown on a portfolio card.
pub const TOP_HOLDINGS: usize = 5;

/// A portfolio as valued by the server at fetch time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PortfolioSnapshot {
    pub portfolio_name: String,
    pub total_usdt: Decimal,
    /// Always `holdings.len()`.
    pub total_holdings: usize,
    pub holdings: Vec<Holding>,
}

impl PortfolioSnapshot {
    pub fn holding(&self, symbol: &str) -> Option<&Holding> {
        self.holdings.iter().find(|h| h.symbol == symbol)
    }

    pub fn is_empty(&self) -> bool {
        self.holdings.is_empty()
    }

    /// Card view: name, total and the first [`TOP_HOLDINGS`] holdings.
    pub fn summary(&self) -> PortfolioSummary {
        PortfolioSummary {
            name: self.portfolio_name.clone(),
            total_in_usdt: self.total_usdt,
            top_holdings: self.holdings.iter().take(TOP_HOLDINGS).cloned().collect(),
        }
    }
}

/// Condensed portfolio for overview lists.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PortfolioSummary {
    pub name: String,
    pub total_in_usdt: Decimal,
    pub top_holdings: Vec<Holding>,
}
