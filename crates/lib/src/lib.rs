//! verso-lib: orchestration core for the verso installer
//!
//! This crate provides the pieces the `verso` CLI wires together:
//! - `hooks`: Lua hook discovery and before/after callback execution
//! - `install`: install-target resolution and partial-install cleanup
//! - `builder`: delegation to the external build engine
//! - `catalog`: definition listing and near-match suggestion
//! - `rehash`: the post-install shim regeneration trigger

pub mod builder;
pub mod catalog;
pub mod consts;
pub mod hooks;
pub mod install;
pub mod paths;
pub mod rehash;
