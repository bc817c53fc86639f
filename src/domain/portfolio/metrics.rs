//! Derived portfolio metrics. Pure functions over a fetched snapshot.
//!
//! Nothing here is persisted; every value is recomputed from the holdings and
//! the user's per-symbol prediction multipliers (default 1).

use crate::domain::holding::Holding;
use crate::shared::{Sort, SortDirection};

use rust_decimal::Decimal;
use serde::Serialize;
use std::cmp::Ordering;
use std::collections::HashMap;

/// Prediction multiplier per holding symbol. Missing symbols count as 1.
pub type Multipliers = HashMap<String, Decimal>;

/// Fields accepted by [`sort_holdings`].
pub const SORTABLE_FIELDS: [&str; 6] = [
    "symbol",
    "priceInUsdt",
    "priceInBtc",
    "amountInUsdt",
    "currentPositionInUsdt",
    "percentage",
];

pub fn multiplier_for(multipliers: &Multipliers, symbol: &str) -> Decimal {
    multipliers.get(symbol).copied().unwrap_or(Decimal::ONE)
}

/// Sum of `values`, or `None` if it leaves `Decimal`'s range.
fn checked_sum(values: impl IntoIterator<Item = Decimal>) -> Option<Decimal> {
    values
        .into_iter()
        .try_fold(Decimal::ZERO, |acc, v| acc.checked_add(v))
}

/// Sum of `amount_in_usdt` across holdings. `None` on overflow.
pub fn total_usdt(holdings: &[Holding]) -> Option<Decimal> {
    checked_sum(holdings.iter().map(|h| h.amount_in_usdt))
}

fn share(amount: Decimal, total: Option<Decimal>) -> Option<Decimal> {
    let total = total.filter(|t| !t.is_zero())?;
    amount.checked_div(total)
}

/// Share of `holding` in the portfolio as a fraction (0.25 = 25 %).
/// `None` when the portfolio total is zero or out of range.
pub fn percentage(holding: &Holding, holdings: &[Holding]) -> Option<Decimal> {
    share(holding.amount_in_usdt, total_usdt(holdings))
}

/// Share of `symbol`, or zero when it is not held or the total is zero.
pub fn percentage_of(holdings: &[Holding], symbol: &str) -> Decimal {
    holdings
        .iter()
        .find(|h| h.symbol == symbol)
        .and_then(|h| percentage(h, holdings))
        .unwrap_or(Decimal::ZERO)
}

/// `None` when the product overflows.
pub fn predicted_usdt(holding: &Holding, multiplier: Decimal) -> Option<Decimal> {
    multiplier.checked_mul(holding.current_position_in_usdt.unwrap_or_default())
}

/// `None` when the product overflows.
pub fn predicted_btc(holding: &Holding, multiplier: Decimal) -> Option<Decimal> {
    multiplier.checked_mul(holding.amount_in_btc)
}

/// Column totals of the holdings table. Missing values count as zero.
/// A column is `None` when any of its terms or their sum overflows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PortfolioTotals {
    pub realized_profit_usdt: Option<Decimal>,
    pub cost_basis_usdt: Option<Decimal>,
    pub current_position_usdt: Option<Decimal>,
    pub amount_in_btc: Option<Decimal>,
    pub predicted_usdt: Option<Decimal>,
    pub predicted_btc: Option<Decimal>,
}

pub fn totals(holdings: &[Holding], multipliers: &Multipliers) -> PortfolioTotals {
    let column = |f: &dyn Fn(&Holding) -> Option<Decimal>| -> Option<Decimal> {
        holdings
            .iter()
            .try_fold(Decimal::ZERO, |acc, h| acc.checked_add(f(h)?))
    };
    let multiplier = |h: &Holding| multiplier_for(multipliers, &h.symbol);

    PortfolioTotals {
        realized_profit_usdt: column(&|h: &Holding| Some(h.total_realized_profit_usdt.unwrap_or_default())),
        cost_basis_usdt: column(&|h: &Holding| Some(h.stable_total_cost.unwrap_or_default())),
        current_position_usdt: column(&|h: &Holding| Some(h.current_position_in_usdt.unwrap_or_default())),
        amount_in_btc: column(&|h: &Holding| Some(h.amount_in_btc)),
        predicted_usdt: column(&|h: &Holding| predicted_usdt(h, multiplier(h))),
        predicted_btc: column(&|h: &Holding| predicted_btc(h, multiplier(h))),
    }
}

/// Derived values for one table row.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HoldingMetrics {
    pub symbol: String,
    pub percentage: Option<Decimal>,
    pub multiplier: Decimal,
    pub predicted_usdt: Option<Decimal>,
    pub predicted_btc: Option<Decimal>,
}

pub fn holding_metrics(holdings: &[Holding], multipliers: &Multipliers) -> Vec<HoldingMetrics> {
    let total = total_usdt(holdings);
    holdings
        .iter()
        .map(|h| {
            let multiplier = multiplier_for(multipliers, &h.symbol);
            HoldingMetrics {
                symbol: h.symbol.clone(),
                percentage: share(h.amount_in_usdt, total),
                multiplier,
                predicted_usdt: predicted_usdt(h, multiplier),
                predicted_btc: predicted_btc(h, multiplier),
            }
        })
        .collect()
}

/// Whether [`sort_holdings`] knows how to order by `field`.
pub fn is_sortable(field: &str) -> bool {
    SORTABLE_FIELDS.contains(&field)
}

/// Holdings ordered by `sort`. Without a sort, or for an unknown field, the
/// server order is kept. Missing values sort first ascending.
pub fn sort_holdings(holdings: &[Holding], sort: Option<&Sort>) -> Vec<Holding> {
    let mut sorted = holdings.to_vec();
    let Some(sort) = sort else {
        return sorted;
    };

    let compare: fn(&Holding, &Holding) -> Ordering = match sort.field.as_str() {
        "symbol" => |a, b| a.symbol.cmp(&b.symbol),
        "priceInUsdt" => |a, b| a.price_in_usdt.cmp(&b.price_in_usdt),
        "priceInBtc" => |a, b| a.price_in_btc.cmp(&b.price_in_btc),
        "amountInUsdt" => |a, b| a.amount_in_usdt.cmp(&b.amount_in_usdt),
        "currentPositionInUsdt" => {
            |a, b| a.current_position_in_usdt.cmp(&b.current_position_in_usdt)
        }
        "percentage" => |a, b| a.percentage.cmp(&b.percentage),
        _ => return sorted,
    };

    match sort.direction {
        SortDirection::Asc => sorted.sort_by(compare),
        SortDirection::Desc => sorted.sort_by(|a, b| compare(b, a)),
    }
    sorted
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn holding(symbol: &str, usdt: Decimal, btc: Decimal) -> Holding {
        Holding {
            symbol: symbol.to_string(),
            portfolio_name: "Main".to_string(),
            amount: Decimal::ONE,
            amount_in_btc: btc,
            price_in_btc: None,
            amount_in_usdt: usdt,
            price_in_usdt: None,
            percentage: None,
            total_amount_bought: None,
            total_amount_sold: None,
            stable_total_cost: None,
            current_position_in_usdt: Some(usdt),
            total_realized_profit_usdt: None,
        }
    }

    #[test]
    fn test_prediction_with_multiplier() {
        let btc = holding("BTC", dec!(1000), dec!(0.02));
        let holdings = vec![btc.clone()];
        let multipliers = Multipliers::from([("BTC".to_string(), dec!(2))]);

        assert_eq!(predicted_usdt(&btc, dec!(2)), Some(dec!(2000)));
        assert_eq!(predicted_btc(&btc, dec!(2)), Some(dec!(0.04)));

        let totals = totals(&holdings, &multipliers);
        assert_eq!(totals.predicted_usdt, Some(dec!(2000)));
        assert_eq!(totals.predicted_btc, Some(dec!(0.04)));
        assert_eq!(totals.current_position_usdt, Some(dec!(1000)));
    }

    #[test]
    fn test_empty_portfolio_totals_are_zero() {
        let zero = Some(Decimal::ZERO);
        assert_eq!(
            totals(&[], &Multipliers::new()),
            PortfolioTotals {
                realized_profit_usdt: zero,
                cost_basis_usdt: zero,
                current_position_usdt: zero,
                amount_in_btc: zero,
                predicted_usdt: zero,
                predicted_btc: zero,
            }
        );
        assert_eq!(percentage_of(&[], "BTC"), Decimal::ZERO);
    }

    #[test]
    fn test_default_multiplier_is_one() {
        let holdings = vec![holding("ETH", dec!(300), dec!(0.01))];
        let totals = totals(&holdings, &Multipliers::new());
        assert_eq!(totals.predicted_usdt, Some(dec!(300)));
        assert_eq!(totals.predicted_btc, Some(dec!(0.01)));
    }

    #[test]
    fn test_percentage_shares() {
        let holdings = vec![
            holding("BTC", dec!(750), dec!(0.015)),
            holding("ETH", dec!(250), dec!(0.005)),
        ];
        assert_eq!(percentage(&holdings[0], &holdings), Some(dec!(0.75)));
        assert_eq!(percentage_of(&holdings, "ETH"), dec!(0.25));
        assert_eq!(percentage_of(&holdings, "DOGE"), Decimal::ZERO);

        let zero = vec![holding("USDT", Decimal::ZERO, Decimal::ZERO)];
        assert_eq!(percentage(&zero[0], &zero), None);
    }

    #[test]
    fn test_missing_optionals_count_as_zero() {
        let mut h = holding("ADA", dec!(10), dec!(0.0002));
        h.current_position_in_usdt = None;
        h.stable_total_cost = Some(dec!(8));
        let totals = totals(&[h], &Multipliers::new());
        assert_eq!(totals.current_position_usdt, Some(Decimal::ZERO));
        assert_eq!(totals.predicted_usdt, Some(Decimal::ZERO));
        assert_eq!(totals.cost_basis_usdt, Some(dec!(8)));
        assert_eq!(totals.realized_profit_usdt, Some(Decimal::ZERO));
    }

    #[test]
    fn test_holding_metrics_rows() {
        let holdings = vec![
            holding("BTC", dec!(600), dec!(0.01)),
            holding("ETH", dec!(400), dec!(0.006)),
        ];
        let multipliers = Multipliers::from([("ETH".to_string(), dec!(3))]);
        let rows = holding_metrics(&holdings, &multipliers);

        assert_eq!(rows[0].multiplier, Decimal::ONE);
        assert_eq!(rows[0].percentage, Some(dec!(0.6)));
        assert_eq!(rows[1].predicted_usdt, Some(dec!(1200)));
        assert_eq!(rows[1].predicted_btc, Some(dec!(0.018)));
    }

    #[test]
    fn test_huge_multiplier_yields_none() {
        let holdings = vec![
            holding("BTC", dec!(1000), dec!(0.02)),
            holding("ETH", dec!(400), dec!(0.006)),
        ];
        let multipliers = Multipliers::from([("BTC".to_string(), Decimal::MAX)]);

        assert_eq!(predicted_usdt(&holdings[0], Decimal::MAX), None);

        let totals = totals(&holdings, &multipliers);
        assert_eq!(totals.predicted_usdt, None);
        assert_eq!(totals.current_position_usdt, Some(dec!(1400)));

        let rows = holding_metrics(&holdings, &multipliers);
        assert_eq!(rows[0].predicted_usdt, None);
        assert_eq!(rows[1].predicted_usdt, Some(dec!(400)));
    }

    #[test]
    fn test_overflowing_sum_yields_none() {
        let holdings = vec![
            holding("A", Decimal::MAX, Decimal::ZERO),
            holding("B", Decimal::MAX, Decimal::ZERO),
        ];
        assert_eq!(total_usdt(&holdings), None);
        assert_eq!(percentage(&holdings[0], &holdings), None);
        assert_eq!(percentage_of(&holdings, "A"), Decimal::ZERO);
        assert_eq!(totals(&holdings, &Multipliers::new()).current_position_usdt, None);
    }

    #[test]
    fn test_sort_holdings() {
        let holdings = vec![
            holding("ETH", dec!(400), dec!(0.006)),
            holding("BTC", dec!(600), dec!(0.01)),
            holding("ADA", dec!(50), dec!(0.001)),
        ];
        let symbols = |v: Vec<Holding>| v.into_iter().map(|h| h.symbol).collect::<Vec<_>>();

        assert_eq!(
            symbols(sort_holdings(&holdings, Some(&Sort::asc("symbol")))),
            vec!["ADA", "BTC", "ETH"]
        );
        assert_eq!(
            symbols(sort_holdings(&holdings, Some(&Sort::desc("currentPositionInUsdt")))),
            vec!["BTC", "ETH", "ADA"]
        );
        assert_eq!(
            symbols(sort_holdings(&holdings, Some(&Sort::asc("color")))),
            vec!["ETH", "BTC", "ADA"]
        );
        assert_eq!(symbols(sort_holdings(&holdings, None)), vec!["ETH", "BTC", "ADA"]);
    }
}
