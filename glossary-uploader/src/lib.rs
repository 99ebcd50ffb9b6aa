//! Upload public data standard glossaries from spreadsheets to a metadata
//! catalog over its REST API.
//!
//! - [`api`]: typed catalog client over a retrying HTTP transport
//! - [`reader`]: spreadsheet sources
//! - [`glossary`]: row to term request mapping
//! - [`cli`]: command handlers for `init`, `upload` and `delete-all`

pub mod api;
pub mod cli;
pub mod config;
pub mod glossary;
pub mod logging;
pub mod reader;
