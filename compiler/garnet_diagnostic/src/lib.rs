//! Diagnostic system for the Garnet type checker.
//!
//! Every phase reports problems as [`Diagnostic`] values tagged with an
//! [`ErrorCode`]. They are collected in a [`queue::DiagnosticQueue`] owned by
//! the global state and flushed either to the user (committing runs) or
//! dropped (best-effort runs).

mod diagnostic;
mod error_code;
pub mod queue;

pub use diagnostic::{Diagnostic, Severity};
pub use error_code::ErrorCode;
pub use queue::{DiagnosticConfig, DiagnosticQueue};
