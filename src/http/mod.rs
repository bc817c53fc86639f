//! HTTP client layer — `CryptofolioHttp` with per-endpoint auth policies.

pub mod client;
pub mod policy;

pub use client::{CryptofolioHttp, FormPart};
pub use policy::{AuthPolicy, ReauthListener, UnauthorizedPolicy};
