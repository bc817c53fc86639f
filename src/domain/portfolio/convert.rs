//! Conversions from wire types to domain types for portfolios.

use super::wire::PortfolioDistributionResponse;
use super::PortfolioSnapshot;
use crate::domain::holding::Holding;

impl From<PortfolioDistributionResponse> for PortfolioSnapshot {
    fn from(p: PortfolioDistributionResponse) -> Self {
        let holdings: Vec<Holding> = p.holdings.into_iter().map(Holding::from).collect();
        Self {
            portfolio_name: p.portfolio_name,
            total_usdt: p.total_usdt,
            total_holdings: holdings.len(),
            holdings,
        }
    }
}
