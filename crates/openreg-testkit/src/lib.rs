//! # openreg-testkit
//!
//! Test support for OpenRegistry clients.
//!
//! - [`MemoryLedger`]: an in-memory [`Ledger`](openreg_core::Ledger) /
//!   [`RegistrarLedger`](openreg_core::RegistrarLedger) that records every call
//! - [`fixtures`]: golden things, keys and their expected ledger words
//!
//! ```rust,ignore
//! use openreg_testkit::{fixtures, MemoryLedger};
//!
//! let ledger = MemoryLedger::new().with_schema(0u64, fixtures::THING_PROTO);
//! ```

pub mod fixtures;
pub mod memory;

pub use memory::{LedgerCall, MemoryLedger};
