//! Shared newtypes and utilities used across all modules.
//!
//! These types are serialization-transparent: they serialize/deserialize identically
//! to the raw format the backend sends, so they can be used directly in wire types
//! without conversion overhead.

pub mod serde_util;

use serde::{Deserialize, Serialize};

// ─── Outcome ─────────────────────────────────────────────────────────────────

/// Result of an async operation whose resolution may have been superseded.
///
/// `Stale` means a newer operation was started before this one resolved, so its
/// result was dropped without touching shared state.
#[derive(Debug, Clone, PartialEq, Eq)]
#[must_use]
pub enum Outcome<T> {
    Applied(T),
    Stale,
}

impl<T> Outcome<T> {
    pub fn is_applied(&self) -> bool {
        matches!(self, Self::Applied(_))
    }

    pub fn is_stale(&self) -> bool {
        matches!(self, Self::Stale)
    }

    pub fn applied(self) -> Option<T> {
        match self {
            Self::Applied(value) => Some(value),
            Self::Stale => None,
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Outcome<U> {
        match self {
            Self::Applied(value) => Outcome::Applied(f(value)),
            Self::Stale => Outcome::Stale,
        }
    }
}

// ─── Sort ────────────────────────────────────────────────────────────────────

/// Sort direction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }

    pub fn reversed(self) -> Self {
        match self {
            Self::Asc => Self::Desc,
            Self::Desc => Self::Asc,
        }
    }
}

impl std::fmt::Display for SortDirection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The single active sort of a table: one field and a direction.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Sort {
    pub field: String,
    pub direction: SortDirection,
}

impl Sort {
    pub fn asc(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            direction: SortDirection::Asc,
        }
    }

    pub fn desc(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            direction: SortDirection::Desc,
        }
    }

    /// Header-click semantics: the same field flips direction, any other field
    /// starts ascending.
    pub fn toggle(current: Option<&Sort>, field: &str) -> Sort {
        match current {
            Some(sort) if sort.field == field => Sort {
                field: sort.field.clone(),
                direction: sort.direction.reversed(),
            },
            _ => Sort::asc(field),
        }
    }

    /// Spring-style `field,direction` query value.
    pub fn to_param(&self) -> String {
        format!("{},{}", self.field, self.direction)
    }
}

// ─── TradeSide ───────────────────────────────────────────────────────────────

/// Transaction side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TradeSide {
    Buy,
    Sell,
}

impl TradeSide {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Buy => "BUY",
            Self::Sell => "SELL",
        }
    }
}

impl std::fmt::Display for TradeSide {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sort_toggle_scenario() {
        let first = Sort::toggle(None, "priceInUsdt");
        assert_eq!(first, Sort::asc("priceInUsdt"));

        let second = Sort::toggle(Some(&first), "priceInUsdt");
        assert_eq!(second, Sort::desc("priceInUsdt"));

        let third = Sort::toggle(Some(&second), "symbol");
        assert_eq!(third, Sort::asc("symbol"));
    }

    #[test]
    fn test_sort_param() {
        assert_eq!(Sort::desc("dateUtc").to_param(), "dateUtc,desc");
    }

    #[test]
    fn test_trade_side_serde() {
        let buy: TradeSide = serde_json::from_str("\"BUY\"").unwrap();
        assert_eq!(buy, TradeSide::Buy);
        assert_eq!(serde_json::to_string(&TradeSide::Sell).unwrap(), "\"SELL\"");
    }

    #[test]
    fn test_outcome_map() {
        assert_eq!(Outcome::Applied(2).map(|v| v * 2), Outcome::Applied(4));
        assert!(Outcome::<u8>::Stale.map(|v| v * 2).is_stale());
    }
}
