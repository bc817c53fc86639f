//! Immutable list query: filters, sort and page cursor.

use crate::shared::{Sort, TradeSide};

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Default rows per page.
pub const DEFAULT_PAGE_SIZE: u32 = 10;

/// A filter value. Absent filters are simply not in the map.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FilterValue {
    Text(String),
    Number(Decimal),
}

impl FilterValue {
    /// Query-string form; `None` for blank text.
    pub fn to_param(&self) -> Option<String> {
        match self {
            Self::Text(text) if text.trim().is_empty() => None,
            Self::Text(text) => Some(text.clone()),
            Self::Number(n) => Some(n.normalize().to_string()),
        }
    }
}

impl From<&str> for FilterValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for FilterValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<Decimal> for FilterValue {
    fn from(value: Decimal) -> Self {
        Self::Number(value)
    }
}

impl From<i64> for FilterValue {
    fn from(value: i64) -> Self {
        Self::Number(Decimal::from(value))
    }
}

impl From<TradeSide> for FilterValue {
    fn from(value: TradeSide) -> Self {
        Self::Text(value.as_str().to_string())
    }
}

/// The sole input determining which page of a list is requested.
///
/// Builder-style helpers return a new query. Changing filters or page size
/// resets the page to 0 since the old page index is meaningless afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceQuery {
    pub filters: BTreeMap<String, FilterValue>,
    pub sort: Option<Sort>,
    pub page: u32,
    pub page_size: u32,
}

impl Default for ResourceQuery {
    fn default() -> Self {
        Self {
            filters: BTreeMap::new(),
            sort: None,
            page: 0,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl ResourceQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_filter(mut self, key: impl Into<String>, value: impl Into<FilterValue>) -> Self {
        self.filters.insert(key.into(), value.into());
        self.page = 0;
        self
    }

    pub fn without_filter(mut self, key: &str) -> Self {
        self.filters.remove(key);
        self.page = 0;
        self
    }

    /// Drop every filter.
    pub fn without_filters(mut self) -> Self {
        self.filters.clear();
        self.page = 0;
        self
    }

    /// Same field flips direction, another field starts ascending.
    pub fn toggle_sort(mut self, field: &str) -> Self {
        self.sort = Some(Sort::toggle(self.sort.as_ref(), field));
        self
    }

    pub fn with_sort(mut self, sort: Sort) -> Self {
        self.sort = Some(sort);
        self
    }

    pub fn with_page(mut self, page: u32) -> Self {
        self.page = page;
        self
    }

    /// A zero size is treated as 1.
    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size.max(1);
        self.page = 0;
        self
    }

    pub fn filter(&self, key: &str) -> Option<&FilterValue> {
        self.filters.get(key)
    }

    /// Text value of a filter, if set and non-blank.
    pub fn filter_text(&self, key: &str) -> Option<String> {
        self.filters.get(key).and_then(FilterValue::to_param)
    }

    /// Query-string pairs: filters in key order (blank ones skipped), then
    /// `page`, `size` and `sort=field,dir`.
    pub fn to_params(&self) -> Vec<(String, String)> {
        let mut params: Vec<(String, String)> = self
            .filters
            .iter()
            .filter_map(|(key, value)| value.to_param().map(|v| (key.clone(), v)))
            .collect();
        params.push(("page".to_string(), self.page.to_string()));
        params.push(("size".to_string(), self.page_size.to_string()));
        if let Some(sort) = &self.sort {
            params.push(("sort".to_string(), sort.to_param()));
        }
        params
    }

    /// Percent-encoded query string, without the leading `?`.
    pub fn to_query_string(&self) -> String {
        self.to_params()
            .iter()
            .map(|(k, v)| format!("{}={}", urlencoding::encode(k), urlencoding::encode(v)))
            .collect::<Vec<_>>()
            .join("&")
    }
}
