//! sheetlex: lookup engine over a spreadsheet published as CSV.
//!
//! The pipeline is fetch → parse → filter: [`fetch`] retrieves the raw CSV
//! text from the configured URL, [`parse`] normalizes it into ordered
//! [`parse::Record`]s, and [`search`] filters them against a user query.
//! [`session::Session`] owns the loaded dataset and the current filter state
//! and is the single entry point a presentation layer needs.

pub mod config;
pub mod fetch;
pub mod parse;
pub mod search;
pub mod session;
