//! Conversions from wire types to domain types for holdings.

use super::wire::HoldingResponse;
use super::Holding;

impl From<HoldingResponse> for Holding {
    fn from(h: HoldingResponse) -> Self {
        Self {
            symbol: h.symbol,
            portfolio_name: h.portfolio_name,
            amount: h.amount,
            amount_in_btc: h.amount_in_btc,
            price_in_btc: h.price_in_btc,
            amount_in_usdt: h.amount_in_usdt,
            price_in_usdt: h.price_in_usdt,
            percentage: h.percentage,
            total_amount_bought: h.total_amount_bought,
            total_amount_sold: h.total_amount_sold,
            stable_total_cost: h.stable_total_cost,
            current_position_in_usdt: h.current_position_in_usdt,
            total_realized_profit_usdt: h.total_realized_profit_usdt,
        }
    }
}
