#![warn(missing_docs)]

//! Text and JSON-lines logging for training loops.
//!
//! The crate provides a single hook, [`hook::TextLoggerHook`], that a trainer
//! invokes at a fixed iteration interval. On each tick the hook collects a
//! [`metric::MetricSnapshot`] from the run, renders one human-readable line
//! through the [`log`] facade, and appends one JSON record to a session log
//! file named after the run timestamp.

#[macro_use]
extern crate derive_new;

/// The logger module.
pub mod logger;

/// The metric module.
pub mod metric;

/// The hook module.
pub mod hook;

mod collective;
mod run;

pub use collective::*;
pub use run::*;
