//! # dustpan
//!
//! **Dead-code and duplication sweeper for web-application source trees.**
//!
//! dustpan takes an in-memory snapshot of a project (paths plus text) and
//! reports what is declared but never referenced, which function names are
//! repeated across files with copy-pasted bodies, which image assets nothing
//! points at, and a few characterization facts: auth providers, storage keys
//! and the type/interface dependency graph.
//!
//! Everything is heuristic text matching. There is no AST; every pattern runs
//! on the linear-time `regex` engine or plain substring scans.
//!
//! ## Features
//!
//! - **Liveness** - variables, `useState` pairs, functions, exports, hooks,
//!   images, CSS classes and API routes
//! - **Twins** - duplicate function names with a similarity verdict
//! - **Characterization** - auth providers and mechanisms, storage keys,
//!   IndexedDB usage, type dependency listing
//! - **Isolation** - a failing analyzer leaves its section empty, nothing more
//!
//! ## Quick Start (Library Usage)
//!
//! ```rust
//! use dustpan::{DustpanConfig, SourceFile, run_analysis};
//!
//! let files = vec![
//!     SourceFile::new("src/a.js", "const unused = 1;\n"),
//!     SourceFile::new("assets/logo.png", ""),
//!     SourceFile::new("index.html", "<img src=\"./assets/logo.png\">"),
//! ];
//! let result = run_analysis(&files, &DustpanConfig::default());
//! assert_eq!(result.variables.unused[0].name, "unused");
//! assert!(result.images.unused.is_empty());
//! ```
//!
//! ## CLI Usage
//!
//! ```bash
//! dustpan                       # sweep the current directory
//! dustpan path/to/app --json    # machine-readable report
//! dustpan --fail-on-findings    # exit 1 when anything is unused
//! ```

// ============================================================================
// Core Modules
// ============================================================================

/// Extractors, resolvers, characterizers and the aggregating runner.
///
/// # Submodules
///
/// - [`analyzer::runner`] - runs every analyzer with per-section isolation
/// - [`analyzer::twins`] - duplicate function detection
/// - [`analyzer::classify`] - file selection and census
/// - [`analyzer::output`] - text and JSON rendering
pub mod analyzer;

/// `.dustpan/config.toml` loading.
pub mod config;

pub mod error;

/// Project directory walking for the CLI host.
pub mod fs_utils;

/// Positional character similarity used by the duplicate detector.
pub mod similarity;

/// Token-boundary search, HTML escaping and asset path spellings.
pub mod text;

/// Core data model: files, declarations, identity tables, report items.
pub mod types;

// ============================================================================
// Re-exports
// ============================================================================

pub use analyzer::SymbolAnalyzer;
pub use analyzer::report::AnalysisResult;
pub use analyzer::runner::run_analysis;
pub use config::DustpanConfig;
pub use error::{DustpanError, Result};
pub use types::{DeclKind, Declaration, IdentityPolicy, SourceFile, SymbolReport, UnusedItem};
