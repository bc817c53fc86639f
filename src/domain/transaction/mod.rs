//! Transaction domain — recorded trades and the filters of the transaction list.

#[cfg(feature = "http")]
pub mod client;
mod convert;
pub mod wire;

use crate::resource::FilterValue;
use crate::shared::TradeSide;

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Filter keys understood by `GET /transaction/filter`.
pub mod filter {
    pub const SYMBOL: &str = "symbol";
    pub const START_DATE: &str = "startDate";
    pub const END_DATE: &str = "endDate";
    pub const PORTFOLIO_NAME: &str = "portfolioName";
    pub const SIDE: &str = "side";
    pub const PAID_WITH: &str = "paidWith";
    pub const PAID_AMOUNT_OPERATOR: &str = "paidAmountOperator";
    pub const PAID_AMOUNT: &str = "paidAmount";
}

/// One recorded trade.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub id: Option<String>,
    pub date_utc: DateTime<Utc>,
    pub side: Option<TradeSide>,
    pub pair: String,
    pub price: Option<Decimal>,
    pub executed: Option<Decimal>,
    pub symbol: Option<String>,
    pub paid_with: Option<String>,
    pub paid_amount: Option<Decimal>,
    pub fee_amount: Option<Decimal>,
    pub fee_symbol: Option<String>,
    pub portfolio_name: String,
}

/// A trade to record. The server assigns the id.
#[derive(Debug, Clone, PartialEq)]
pub struct NewTransaction {
    pub date_utc: DateTime<Utc>,
    pub side: Option<TradeSide>,
    pub pair: String,
    pub price: Option<Decimal>,
    pub executed: Option<Decimal>,
    pub symbol: Option<String>,
    pub paid_with: Option<String>,
    pub paid_amount: Option<Decimal>,
    pub fee_amount: Option<Decimal>,
    pub fee_symbol: Option<String>,
    pub portfolio_name: String,
}

impl NewTransaction {
    pub fn new(
        portfolio_name: impl Into<String>,
        pair: impl Into<String>,
        date_utc: DateTime<Utc>,
    ) -> Self {
        Self {
            date_utc,
            side: None,
            pair: pair.into(),
            price: None,
            executed: None,
            symbol: None,
            paid_with: None,
            paid_amount: None,
            fee_amount: None,
            fee_symbol: None,
            portfolio_name: portfolio_name.into(),
        }
    }

    /// Checks the fields the backend requires.
    pub fn validate(&self) -> Result<(), String> {
        if self.portfolio_name.trim().is_empty() {
            return Err("Portfolio name is required".to_string());
        }
        if self.pair.trim().is_empty() {
            return Err("Pair is required".to_string());
        }
        let negative = [self.price, self.executed, self.paid_amount, self.fee_amount]
            .into_iter()
            .flatten()
            .any(|v| v.is_sign_negative() && !v.is_zero());
        if negative {
            return Err("Amounts must not be negative".to_string());
        }
        Ok(())
    }
}

/// Comparison applied to the `paidAmount` filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AmountOperator {
    Eq,
    Lt,
    Gt,
}

impl AmountOperator {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Eq => "=",
            Self::Lt => "<",
            Self::Gt => ">",
        }
    }
}

impl From<AmountOperator> for FilterValue {
    fn from(op: AmountOperator) -> Self {
        FilterValue::Text(op.as_str().to_string())
    }
}

/// Value for the `startDate` / `endDate` filters (`YYYY-MM-DD`).
pub fn date_filter(date: NaiveDate) -> FilterValue {
    FilterValue::Text(date.format("%Y-%m-%d").to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resource::ResourceQuery;
    use rust_decimal_macros::dec;

    #[test]
    fn test_transaction_filters_in_query_string() {
        let query = ResourceQuery::new()
            .with_filter(filter::PAID_AMOUNT_OPERATOR, AmountOperator::Gt)
            .with_filter(filter::PAID_AMOUNT, dec!(50))
            .with_filter(
                filter::START_DATE,
                date_filter(NaiveDate::from_ymd_opt(2024, 3, 1).unwrap()),
            );
        assert_eq!(
            query.to_query_string(),
            "paidAmount=50&paidAmountOperator=%3E&startDate=2024-03-01&page=0&size=10"
        );
    }

    #[test]
    fn test_new_transaction_validation() {
        let now = Utc::now();
        assert!(NewTransaction::new("Main", "BTCUSDT", now).validate().is_ok());
        assert!(NewTransaction::new(" ", "BTCUSDT", now).validate().is_err());
        assert!(NewTransaction::new("Main", "", now).validate().is_err());

        let mut tx = NewTransaction::new("Main", "BTCUSDT", now);
        tx.fee_amount = Some(dec!(-0.1));
        assert!(tx.validate().is_err());
    }
}
