//! pandoc-hwpx CLI - Command-line interface library
//!
//! # Binary Usage
//!
//! ```bash
//! pandoc report.md -t json | pandoc-hwpx -o report.hwpx --toc
//!
//! # Reuse the styles of an existing document
//! pandoc report.md -t json | pandoc-hwpx -o report.hwpx --reference-doc house.hwpx
//! ```

pub mod app;

pub use app::{convert_command, run_cli, Cli};
