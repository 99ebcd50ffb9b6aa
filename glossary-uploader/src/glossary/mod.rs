//! Glossary term mapping

pub mod mapper;

pub use mapper::{StandardSheet, TermDraft, build_term_request};
