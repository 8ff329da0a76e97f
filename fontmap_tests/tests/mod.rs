// Copyright 2026 the Fontmap Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! This crate contains the integration test suite for `fontmap`.
//!
//! - The `util` module contains the mock face and the font map fixtures shared by the
//!   topic modules.
//! - We do not use the default Rust test harness, but instead use this `mod.rs` file as the
//!   entry point to run all other tests. This makes it easier to share fixtures.
//! - For test naming, put the "topic" of the test at the start of the name, e.g.
//!   `cache_evicts_least_recently_used` rather than `evicts_from_cache`.

#![allow(missing_docs, reason = "we don't need docs for testing")]

mod fallback;
mod registry;
mod util;
