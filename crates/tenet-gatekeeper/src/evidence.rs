//! Evidence stubs presented to the state machine

use std::path::{Path, PathBuf};

/// A pointer to the on-disk evidence backing a transition
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EvidenceStub {
    /// File or directory the evidence refers to
    pub uri: PathBuf,

    /// Free-form evidence type
    pub evidence_type: String,
}

impl EvidenceStub {
    /// Create an evidence stub
    pub fn new(uri: impl Into<PathBuf>, evidence_type: impl Into<String>) -> Self {
        Self {
            uri: uri.into(),
            evidence_type: evidence_type.into(),
        }
    }

    /// Check that the URI is a directory holding at least one visible entry
    pub(crate) fn non_empty_dir(&self) -> Result<(), String> {
        let entries = std::fs::read_dir(&self.uri)
            .map_err(|e| format!("not a readable directory: {}", e))?;

        let has_entry = entries
            .filter_map(Result::ok)
            .any(|entry| !is_hidden(&entry.path()));

        if has_entry {
            Ok(())
        } else {
            Err("directory is empty".to_string())
        }
    }

    /// Check that the URI is an existing regular file
    pub(crate) fn existing_file(&self) -> Result<(), String> {
        match std::fs::metadata(&self.uri) {
            Ok(meta) if meta.is_file() => Ok(()),
            Ok(_) => Err("not a file".to_string()),
            Err(e) => Err(format!("file not found: {}", e)),
        }
    }
}

// Placeholders such as `.gitkeep` do not count as evidence
fn is_hidden(path: &Path) -> bool {
    path.file_name()
        .and_then(|n| n.to_str())
        .map(|n| n.starts_with('.'))
        .unwrap_or(false)
}
