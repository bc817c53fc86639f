//! Wire types for portfolio responses.

use crate::domain::holding::wire::HoldingResponse;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// `GET /portfolio?name=` and `POST /portfolio` response.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PortfolioDistributionResponse {
    pub portfolio_name: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub total_usdt: Decimal,
    /// Ignored on receipt; recomputed from `holdings`.
    #[serde(default)]
    pub total_holdings: Option<u64>,
    #[serde(default)]
    pub holdings: Vec<HoldingResponse>,
}
