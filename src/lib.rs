#![doc(test(attr(deny(warnings))))]

//! Expense Core offers the shared-ledger accounting primitives behind a
//! group expense tracker: personal and class ledgers, even splits, monthly
//! aggregation, and whole-document JSON persistence.

pub mod core;
pub mod domain;
pub mod errors;
pub mod storage;
pub mod utils;

use std::sync::Once;

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing and emits a startup info log.
pub fn init() {
    INIT_TRACING.call_once(|| {
        utils::init_tracing();
        tracing::info!("Expense Core tracing initialized.");
    });
}
