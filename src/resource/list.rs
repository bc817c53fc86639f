//! Async driver for a paginated list: owns the state and a page source.

use crate::error::{FetchError, SdkError};
use crate::resource::page::ResourcePage;
use crate::resource::query::{FilterValue, ResourceQuery};
use crate::resource::state::{ListState, StalePolicy};
use crate::shared::Outcome;

use async_trait::async_trait;
use parking_lot::RwLock;
use std::sync::Arc;

/// Source of list pages, typically one backend endpoint.
#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
pub trait PageFetcher<T>: Send + Sync {
    async fn fetch_page(&self, query: &ResourceQuery) -> Result<ResourcePage<T>, SdkError>;
}

/// A list view's data: every navigation goes through one `fetch(query)`.
///
/// Cloning shares the same state. A fetch started later always wins; an
/// earlier one resolving afterwards returns [`Outcome::Stale`] and leaves the
/// state untouched.
pub struct ResourceList<T> {
    fetcher: Arc<dyn PageFetcher<T>>,
    state: Arc<RwLock<ListState<T>>>,
}

impl<T> Clone for ResourceList<T> {
    fn clone(&self) -> Self {
        Self {
            fetcher: self.fetcher.clone(),
            state: self.state.clone(),
        }
    }
}

impl<T: Clone + Send + Sync + 'static> ResourceList<T> {
    pub fn new(fetcher: impl PageFetcher<T> + 'static, query: ResourceQuery, policy: StalePolicy) -> Self {
        Self::from_arc(Arc::new(fetcher), query, policy)
    }

    pub fn from_arc(fetcher: Arc<dyn PageFetcher<T>>, query: ResourceQuery, policy: StalePolicy) -> Self {
        Self {
            fetcher,
            state: Arc::new(RwLock::new(ListState::new(query, policy))),
        }
    }

    /// Fetch the page described by `query` and make it the current query.
    pub async fn fetch(&self, query: ResourceQuery) -> Result<Outcome<ResourcePage<T>>, FetchError> {
        let ticket = {
            let mut state = self.state.write();
            state.query = query.clone();
            state.fetch.begin()
        };

        let result = self
            .fetcher
            .fetch_page(&query)
            .await
            .map_err(FetchError::from);

        let mut state = self.state.write();
        match state.fetch.resolve(ticket, result.clone()) {
            Outcome::Stale => Ok(Outcome::Stale),
            Outcome::Applied(()) => result.map(Outcome::Applied),
        }
    }

    /// Re-fetch the current query.
    pub async fn refresh(&self) -> Result<Outcome<ResourcePage<T>>, FetchError> {
        self.fetch(self.query()).await
    }

    /// Set a filter and fetch from page 0.
    pub async fn set_filter(
        &self,
        key: &str,
        value: impl Into<FilterValue>,
    ) -> Result<Outcome<ResourcePage<T>>, FetchError> {
        self.fetch(self.query().with_filter(key, value)).await
    }

    pub async fn clear_filter(&self, key: &str) -> Result<Outcome<ResourcePage<T>>, FetchError> {
        self.fetch(self.query().without_filter(key)).await
    }

    pub async fn clear_filters(&self) -> Result<Outcome<ResourcePage<T>>, FetchError> {
        self.fetch(self.query().without_filters()).await
    }

    pub async fn toggle_sort(&self, field: &str) -> Result<Outcome<ResourcePage<T>>, FetchError> {
        self.fetch(self.query().toggle_sort(field)).await
    }

    pub async fn go_to_page(&self, page: u32) -> Result<Outcome<ResourcePage<T>>, FetchError> {
        self.fetch(self.query().with_page(page)).await
    }

    pub async fn set_page_size(&self, page_size: u32) -> Result<Outcome<ResourcePage<T>>, FetchError> {
        self.fetch(self.query().with_page_size(page_size)).await
    }

    /// The last initiated query.
    pub fn query(&self) -> ResourceQuery {
        self.state.read().query.clone()
    }

    pub fn snapshot(&self) -> ListState<T> {
        self.state.read().clone()
    }

    pub fn is_loading(&self) -> bool {
        self.state.read().fetch.is_loading()
    }
}
