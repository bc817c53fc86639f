//! Fetch state reducer — app-owned, SDK-provided update logic.

use crate::error::FetchError;
use crate::resource::page::ResourcePage;
use crate::resource::query::ResourceQuery;
use crate::shared::Outcome;

/// What happens to the last good data when a fetch fails.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StalePolicy {
    /// Keep showing the previous data next to the error.
    #[default]
    KeepStale,
    Clear,
}

/// Status of the authoritative fetch.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum FetchStatus {
    #[default]
    Idle,
    Loading,
    Succeeded,
    Failed(FetchError),
}

/// Handle returned by [`FetchState::begin`]. Only the latest ticket commits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct FetchTicket(u64);

/// Status plus last known data for one remote resource.
#[derive(Debug, Clone)]
pub struct FetchState<P> {
    data: Option<P>,
    status: FetchStatus,
    latest: u64,
    policy: StalePolicy,
}

impl<P> Default for FetchState<P> {
    fn default() -> Self {
        Self::new(StalePolicy::default())
    }
}

impl<P> FetchState<P> {
    pub fn new(policy: StalePolicy) -> Self {
        Self {
            data: None,
            status: FetchStatus::Idle,
            latest: 0,
            policy,
        }
    }

    /// Start a fetch: `Loading`, error cleared, earlier tickets invalidated.
    pub fn begin(&mut self) -> FetchTicket {
        self.latest += 1;
        self.status = FetchStatus::Loading;
        FetchTicket(self.latest)
    }

    /// Commit a result if `ticket` is still the latest.
    pub fn resolve(&mut self, ticket: FetchTicket, result: Result<P, FetchError>) -> Outcome<()> {
        if ticket.0 != self.latest {
            tracing::debug!(
                ticket = ticket.0,
                latest = self.latest,
                "Discarding superseded fetch result"
            );
            return Outcome::Stale;
        }

        match result {
            Ok(data) => {
                self.data = Some(data);
                self.status = FetchStatus::Succeeded;
            }
            Err(error) => {
                if self.policy == StalePolicy::Clear {
                    self.data = None;
                }
                self.status = FetchStatus::Failed(error);
            }
        }
        Outcome::Applied(())
    }

    pub fn data(&self) -> Option<&P> {
        self.data.as_ref()
    }

    pub fn status(&self) -> &FetchStatus {
        &self.status
    }

    pub fn error(&self) -> Option<&FetchError> {
        match &self.status {
            FetchStatus::Failed(error) => Some(error),
            _ => None,
        }
    }

    pub fn is_loading(&self) -> bool {
        self.status == FetchStatus::Loading
    }

    pub fn policy(&self) -> StalePolicy {
        self.policy
    }

    /// Back to `Idle` with no data. Outstanding tickets become stale.
    pub fn reset(&mut self) {
        self.latest += 1;
        self.data = None;
        self.status = FetchStatus::Idle;
    }
}

/// State of a paginated list: fetch state plus the last initiated query.
#[derive(Debug, Clone)]
pub struct ListState<T> {
    pub fetch: FetchState<ResourcePage<T>>,
    pub query: ResourceQuery,
}

impl<T> ListState<T> {
    pub fn new(query: ResourceQuery, policy: StalePolicy) -> Self {
        Self {
            fetch: FetchState::new(policy),
            query,
        }
    }

    /// Items of the current page, empty before the first success.
    pub fn items(&self) -> &[T] {
        self.fetch.data().map(|p| p.items.as_slice()).unwrap_or(&[])
    }

    pub fn page(&self) -> Option<&ResourcePage<T>> {
        self.fetch.data()
    }
}
