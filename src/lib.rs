//! Workspace root for chainlist.
//!
//! The crates live under `crates/`:
//!
//! - `chainlist-proto`: wire types and input validation
//! - `chainlist-core`: the linked list engine
//! - `chainlist-server`: HTTP server around the engine
//! - `chainlist-harness`: reference model and simulation tests
//!
//! This package exists so `cargo-husky` can install the hooks in
//! `.cargo-husky/hooks`.

#![forbid(unsafe_code)]
