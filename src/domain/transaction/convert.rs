//! Conversions between wire and domain transactions.

use super::wire::TransactionDto;
use super::{NewTransaction, Transaction};

impl From<TransactionDto> for Transaction {
    fn from(t: TransactionDto) -> Self {
        Self {
            id: t.id,
            date_utc: t.date_utc,
            side: t.side,
            pair: t.pair,
            price: t.price,
            executed: t.executed,
            symbol: t.symbol,
            paid_with: t.paid_with,
            paid_amount: t.paid_amount,
            fee_amount: t.fee_amount,
            fee_symbol: t.fee_symbol,
            portfolio_name: t.portfolio_name,
        }
    }
}

impl From<&NewTransaction> for TransactionDto {
    fn from(t: &NewTransaction) -> Self {
        Self {
            id: None,
            date_utc: t.date_utc,
            side: t.side,
            pair: t.pair.clone(),
            price: t.price,
            executed: t.executed,
            symbol: t.symbol.clone(),
            paid_with: t.paid_with.clone(),
            paid_amount: t.paid_amount,
            fee_amount: t.fee_amount,
            fee_symbol: t.fee_symbol.clone(),
            portfolio_name: t.portfolio_name.clone(),
        }
    }
}
