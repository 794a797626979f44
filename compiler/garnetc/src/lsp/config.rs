//! Mapping editor URIs onto the files a session knows.

use garnet_core::GlobalState;
use garnet_ir::FileRef;
use globset::{Glob, GlobSet, GlobSetBuilder};
use thiserror::Error;

const FILE_SCHEME: &str = "file://";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid ignore pattern '{pattern}': {message}")]
    InvalidPattern { pattern: String, message: String },
}

/// Turns client URIs into file handles.
pub trait PathMapper {
    /// The handle of the file `uri` names, `FileRef::NONE` if there is none.
    fn uri_to_file(&self, gs: &GlobalState, uri: &str) -> FileRef;

    /// The workspace-relative path of `uri`.
    fn remote_to_local(&self, uri: &str) -> String;

    /// Whether a workspace-relative path was deliberately left out.
    fn is_file_ignored(&self, path: &str) -> bool;
}

/// Workspace root plus ignore patterns.
///
/// Files are registered under their path relative to `root`; URIs are
/// `file://` followed by the absolute path.
#[derive(Debug, Clone)]
pub struct LspConfig {
    root: String,
    ignore: GlobSet,
}

impl LspConfig {
    pub fn new(root: impl Into<String>, patterns: &[String]) -> Result<Self, ConfigError> {
        let root = root.into().trim_end_matches('/').to_owned();
        Ok(LspConfig {
            root,
            ignore: build_glob_set(patterns)?,
        })
    }

    /// The URI a client would send for a workspace-relative path.
    pub fn file_uri(&self, path: &str) -> String {
        if self.root.is_empty() {
            format!("{FILE_SCHEME}{path}")
        } else {
            format!("{FILE_SCHEME}{}/{path}", self.root)
        }
    }

    /// `path` relative to the root, when it lies under it.
    pub fn relative_path<'a>(&self, path: &'a str) -> &'a str {
        let path = path.strip_prefix("./").unwrap_or(path);
        if self.root.is_empty() {
            return path;
        }
        path.strip_prefix(self.root.as_str())
            .and_then(|rest| rest.strip_prefix('/'))
            .unwrap_or(path)
    }
}

impl PathMapper for LspConfig {
    fn uri_to_file(&self, gs: &GlobalState, uri: &str) -> FileRef {
        if !uri.starts_with(FILE_SCHEME) {
            return FileRef::NONE;
        }
        gs.find_file_by_path(&self.remote_to_local(uri))
    }

    fn remote_to_local(&self, uri: &str) -> String {
        let path = uri.strip_prefix(FILE_SCHEME).unwrap_or(uri);
        self.relative_path(path).to_owned()
    }

    fn is_file_ignored(&self, path: &str) -> bool {
        self.ignore.is_match(path)
    }
}

fn build_glob_set(patterns: &[String]) -> Result<GlobSet, ConfigError> {
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        let glob = Glob::new(pattern).map_err(|e| ConfigError::InvalidPattern {
            pattern: pattern.clone(),
            message: e.to_string(),
        })?;
        builder.add(glob);
    }
    builder.build().map_err(|e| ConfigError::InvalidPattern {
        pattern: patterns.join(", "),
        message: e.to_string(),
    })
}
