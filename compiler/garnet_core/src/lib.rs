//! Garnet core - the shared state of a type-checking run.
//!
//! - [`GlobalState`] owns the file, name and symbol tables and enforces the
//!   freeze discipline through [`Unfrozen`] guards.
//! - [`Snapshot`] is a private deep copy used for best-effort work.
//! - [`Query`] and [`QueryResponse`] are the vocabulary of the query layer.
//! - [`FileHash`] drives incremental decisions and symbol-search filtering.

mod error_channel;
mod file_hash;
mod files;
pub mod global_state;
pub mod names;
mod query;
pub mod symbols;
mod types;

pub use error_channel::ErrorChannel;
pub use file_hash::{DefinitionsHash, FileHash, ShortNameHash, UsageHash};
pub use files::{File, FileKind, StrictLevel};
pub use global_state::{GlobalState, Snapshot, Table, Unfrozen};
pub use names::{core_names, NameKind, UniqueNameKind};
pub use query::{Query, QueryResponse, ResponseKind};
pub use symbols::{SymbolData, SymbolFlags};
pub use types::Type;
