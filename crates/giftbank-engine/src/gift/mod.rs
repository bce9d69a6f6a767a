//! # GIFT interchange
//!
//! Conversion between the question-bank model and the GIFT plain-text format,
//! plus a validator that gates imports.
//!
//! ## Modules
//!
//! - **`escape`**: backslash escaping of the reserved characters `: ~ = # { }`
//! - **`sanitize`**: strips presentational attributes from HTML fragments
//! - **`paths`**: `$CATEGORY:` paths, category index and path resolution
//! - **`blocks`**: blank-line block segmentation shared by parser and validator
//! - **`export`**: model to GIFT text
//! - **`parse`**: GIFT text to model, lenient and infallible
//! - **`validate`**: line-numbered structural errors and warnings
//!
//! Everything here is a pure function over borrowed input. Nothing touches
//! storage or keeps references into the caller's data.

pub mod blocks;
pub mod escape;
pub mod export;
pub mod parse;
pub mod paths;
pub mod sanitize;
pub mod validate;

pub use escape::{escape, unescape};
pub use export::{ExportOptions, export, suggested_file_name};
pub use parse::{ParsedBank, parse};
pub use paths::{CategoryIndex, ResolvedPath, resolve_path};
pub use sanitize::{clean_html, plain_text_preview};
pub use validate::{Severity, ValidationFinding, ValidationReport, validate};
