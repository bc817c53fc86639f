//! Portfolio detail state container — app-owned, SDK-provided update logic.

use crate::domain::holding::Holding;
use crate::domain::portfolio::metrics::{self, HoldingMetrics, Multipliers, PortfolioTotals};
use crate::domain::portfolio::PortfolioSnapshot;
use crate::error::FetchError;
use crate::resource::{FetchState, FetchTicket, StalePolicy};
use crate::shared::{Outcome, Sort};

use rust_decimal::Decimal;

/// State behind the holdings table of one portfolio: the fetched snapshot,
/// the user's prediction multipliers and the client-side sort.
///
/// Multipliers belong to a snapshot and are reset to 1 whenever a new
/// snapshot commits.
#[derive(Debug, Clone, Default)]
pub struct PortfolioDetail {
    fetch: FetchState<PortfolioSnapshot>,
    multipliers: Multipliers,
    sort: Option<Sort>,
}

impl PortfolioDetail {
    pub fn new(policy: StalePolicy) -> Self {
        Self {
            fetch: FetchState::new(policy),
            multipliers: Multipliers::new(),
            sort: None,
        }
    }

    pub fn begin(&mut self) -> FetchTicket {
        self.fetch.begin()
    }

    pub fn resolve(
        &mut self,
        ticket: FetchTicket,
        result: Result<PortfolioSnapshot, FetchError>,
    ) -> Outcome<()> {
        let succeeded = result.is_ok();
        let outcome = self.fetch.resolve(ticket, result);
        if outcome.is_applied() && succeeded {
            self.multipliers.clear();
        }
        outcome
    }

    pub fn fetch_state(&self) -> &FetchState<PortfolioSnapshot> {
        &self.fetch
    }

    pub fn snapshot(&self) -> Option<&PortfolioSnapshot> {
        self.fetch.data()
    }

    fn holdings(&self) -> &[Holding] {
        self.snapshot().map(|s| s.holdings.as_slice()).unwrap_or(&[])
    }

    // ── Multipliers ──────────────────────────────────────────────────────

    pub fn multiplier(&self, symbol: &str) -> Decimal {
        metrics::multiplier_for(&self.multipliers, symbol)
    }

    pub fn set_multiplier(&mut self, symbol: impl Into<String>, multiplier: Decimal) {
        self.multipliers.insert(symbol.into(), multiplier);
    }

    pub fn reset_multipliers(&mut self) {
        self.multipliers.clear();
    }

    // ── Sorting ──────────────────────────────────────────────────────────

    pub fn sort(&self) -> Option<&Sort> {
        self.sort.as_ref()
    }

    /// Toggle the sort on `field`. Unknown fields leave the sort unchanged
    /// and return `false`.
    pub fn toggle_sort(&mut self, field: &str) -> bool {
        if !metrics::is_sortable(field) {
            return false;
        }
        self.sort = Some(Sort::toggle(self.sort.as_ref(), field));
        true
    }

    // ── Derived views ────────────────────────────────────────────────────

    /// Holdings in display order.
    pub fn sorted_holdings(&self) -> Vec<Holding> {
        metrics::sort_holdings(self.holdings(), self.sort.as_ref())
    }

    /// Per-row metrics in display order.
    pub fn rows(&self) -> Vec<(Holding, HoldingMetrics)> {
        let sorted = self.sorted_holdings();
        let rows = metrics::holding_metrics(&sorted, &self.multipliers);
        sorted.into_iter().zip(rows).collect()
    }

    pub fn totals(&self) -> PortfolioTotals {
        metrics::totals(self.holdings(), &self.multipliers)
    }

    pub fn percentage_of(&self, symbol: &str) -> Decimal {
        metrics::percentage_of(self.holdings(), symbol)
    }
}
