#![warn(missing_docs)]
//! `codeedit-langdef` - YAML language definitions for the `codeedit` engine.
//!
//! A definition file bundles everything the engine needs to know about a
//! language: comment markers, the indent unit, the bracket-pair table, and the
//! classification rules consumed by `codeedit-highlight-regex`. Loading is
//! all-or-nothing: a malformed document, unknown style name, or invalid regex
//! fails the whole load with a typed [`LanguageDefError`].
//!
//! ```
//! use codeedit_langdef::Language;
//!
//! let lang = Language::load_from_str(r#"
//! name: C
//! line_comment: "//"
//! block_comment: ["/*", "*/"]
//! rules:
//!   - { pattern: '\b(?:if|else|return)\b', style: keyword }
//! block_rules:
//!   - { start: '/\*', end: '\*/', style: comment }
//! "#).unwrap();
//!
//! assert_eq!(lang.config.name, "C");
//! assert!(lang.config.comments.has_block());
//! assert_eq!(lang.highlight.rules().len(), 1);
//! ```

mod compiler;
mod definition;
mod error;

pub use compiler::{Language, style_id};
pub use definition::{
    LanguageDefinition, RawBlockRule, RawBracket, RawIndent, RawIndentUnit, RawRule,
};
pub use error::LanguageDefError;
