//! Turns a fetched HTML page into a bounded, scored business profile.
//!
//! [`parser::process_document`] is the core: a synchronous, single-pass
//! extraction over one parsed tree. Everything around it (fetching, sitemap
//! crawling, configuration) lives in separate modules and is only used by the
//! binary.

pub mod config;
pub mod error;
pub mod fetch;
pub mod governor;
pub mod metrics;
pub mod parser;
pub mod profile;
pub mod response;
pub mod score;
pub mod sitemap;

pub use config::{ExtractConfig, Settings};
pub use error::ExtractError;
pub use parser::{process_document, process_document_at, Extraction};
pub use profile::{ExtractedProfile, RawDocument};
pub use response::{respond, ExtractResponse};
