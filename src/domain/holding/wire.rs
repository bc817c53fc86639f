//! Wire types for holding responses.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// REST representation of a holding. Amounts arrive as JSON numbers.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct HoldingResponse {
    pub symbol: String,
    pub portfolio_name: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub amount_in_btc: Decimal,
    #[serde(default, with = "crate::shared::serde_util::decimal_option")]
    pub price_in_btc: Option<Decimal>,
    #[serde(with = "rust_decimal::serde::float")]
    pub amount_in_usdt: Decimal,
    #[serde(default, with = "crate::shared::serde_util::decimal_option")]
    pub price_in_usdt: Option<Decimal>,
    #[serde(default, with = "crate::shared::serde_util::decimal_option")]
    pub percentage: Option<Decimal>,
    #[serde(default, with = "crate::shared::serde_util::decimal_option")]
    pub total_amount_bought: Option<Decimal>,
    #[serde(default, with = "crate::shared::serde_util::decimal_option")]
    pub total_amount_sold: Option<Decimal>,
    #[serde(default, with = "crate::shared::serde_util::decimal_option")]
    pub stable_total_cost: Option<Decimal>,
    #[serde(default, with = "crate::shared::serde_util::decimal_option")]
    pub current_position_in_usdt: Option<Decimal>,
    #[serde(default, with = "crate::shared::serde_util::decimal_option")]
    pub total_realized_profit_usdt: Option<Decimal>,
}
