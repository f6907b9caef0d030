//! Local order book state for a single win-probability instrument.
//!
//! The book is reconstructed entirely from the platform's incremental
//! updates and snapshots; it reflects whatever the venue reports,
//! including locked, crossed, or one-sided states.

pub mod book;

pub use book::{BookView, PriceLevel};
