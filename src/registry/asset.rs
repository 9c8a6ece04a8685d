//! AssetId type identifying a single sound clip.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Identifier of one short audio clip: the path of the clip file.
///
/// Ordering is lexicographic on the path, which is the order used wherever
/// clip order is observable (concatenation, metadata).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AssetId(PathBuf);

impl AssetId {
    /// Creates an identifier for the clip at `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self(path.into())
    }

    /// Returns the clip path.
    pub fn path(&self) -> &Path {
        &self.0
    }
}

impl fmt::Display for AssetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.display())
    }
}

impl From<&str> for AssetId {
    fn from(path: &str) -> Self {
        Self::new(path)
    }
}

impl From<PathBuf> for AssetId {
    fn from(path: PathBuf) -> Self {
        Self(path)
    }
}
