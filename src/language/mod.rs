//! Per-engine language directories.
//!
//! Every engine owns one [`LanguageDirectory`] built at construction time and
//! never mutated afterwards. Resolution is always done against the directory of
//! the engine selected by the current request; there is no global table.
//!
//! # Example
//!
//! ```rust
//! use simplytranslate_gemini::language::{LanguageDirectory, AUTO};
//!
//! let directory = LanguageDirectory::from_pairs([("French", "fr"), ("English", "en")]);
//!
//! assert_eq!(directory.resolve_code("french").as_deref(), Some("fr"));
//! assert_eq!(directory.resolve_code("EN").as_deref(), Some("en"));
//! assert_eq!(directory.resolve_code("Autodetect").as_deref(), Some(AUTO));
//! assert_eq!(directory.resolve_name("fr"), Some("French"));
//! ```

mod directory;

pub use directory::{Language, LanguageDirectory};

/// Language token meaning "detect the source language".
pub const AUTO: &str = "auto";

/// Display label for [`AUTO`].
pub const AUTODETECT_LABEL: &str = "Autodetect";

/// Target language used when a path does not name one.
pub const DEFAULT_TARGET: &str = "en";
