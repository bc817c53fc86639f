//! Domain modules organized as vertical slices.
//!
//! Each sub-module contains:
//! - `mod.rs` — Rich domain types (`Decimal` amounts, parsed timestamps)
//! - `wire.rs` — Raw serde structs matching backend responses
//! - `convert.rs` — `From` conversions between wire and domain types
//! - `state.rs` — App-owned state containers with update methods
//! - `client.rs` — Sub-client with HTTP methods

pub mod coin;
pub mod holding;
pub mod portfolio;
pub mod transaction;
