//! The editor query layer.
//!
//! Turns a URI and position (or a symbol) into a [`Query`](garnet_core::Query),
//! runs it against a [`Typechecker`](crate::session::Typechecker), and cleans
//! up the responses. Transport and framing live elsewhere.

mod config;
mod error;
mod method;
mod position;
mod query;

pub use config::{ConfigError, LspConfig, PathMapper};
pub use error::{LspErrorCode, QueryError};
pub use method::LspMethod;
pub use position::Position;
pub use query::{candidate_files, filter_and_dedup, LspQuery};
