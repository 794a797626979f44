//! Semantic phases of the Garnet type checker.
//!
//! # Pipeline Position
//!
//! ```text
//! index (garnet_parse) → **name → resolve → flatten → validate → infer**
//!                                      ↓
//!                                  respond (queries)
//! ```
//!
//! Naming and resolution run in two flavors that share all their logic:
//!
//! - **committing**: enters symbols into the canonical state and reports
//!   diagnostics ([`PassPolicy::COMMITTING`]).
//! - **best-effort**: reads a private [`Snapshot`](garnet_core::Snapshot),
//!   substitutes `<todo>` for missing definitions and drops diagnostics
//!   ([`PassPolicy::BEST_EFFORT`]).
//!
//! Flattening, validation, inference and the responder only read the state,
//! so the driver runs them per file in parallel.

mod class_flatten;
pub mod hashing;
pub mod infer;
mod mapper;
pub mod namer;
mod paths;
mod policy;
pub mod resolver;
pub mod responder;
#[cfg(test)]
mod test_support;
mod validator;

pub use class_flatten::flatten_file;
pub use hashing::compute_file_hash;
pub use infer::{for_each_method, infer_file, literal_type, Inferencer, MethodContext, TypeObserver};
pub use mapper::{FileMapper, Sequential};
pub use namer::{find_definitions, symbolize, EnteringDefiner, FoundDefinitions, LookupDefiner, Namer, SymbolDefiner};
pub use paths::{constant_path, ConstPath};
pub use policy::PassPolicy;
pub use resolver::{AncestryWrite, Resolver};
pub use responder::respond;
pub use validator::validate_file;
