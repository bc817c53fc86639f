//! Generic paginated resource fetching.
//!
//! Every list view is one [`ResourceQuery`] plus one [`FetchState`]. All
//! navigation (filtering, sorting, paging) produces a new query and goes
//! through a single fetch; the newest fetch is always the authoritative one.
//!
//! - [`query`] — immutable query values and their query-string encoding
//! - [`state`] — the pure reducer (`begin` / `resolve`) with ticket-based
//!   staleness checks
//! - [`page`] — the page envelope
//! - [`list`] — [`ResourceList`], the async driver over a [`PageFetcher`]

pub mod list;
pub mod page;
pub mod query;
pub mod state;

pub use list::{PageFetcher, ResourceList};
pub use page::{PageResponse, ResourcePage};
pub use query::{FilterValue, ResourceQuery, DEFAULT_PAGE_SIZE};
pub use state::{FetchState, FetchStatus, FetchTicket, ListState, StalePolicy};
