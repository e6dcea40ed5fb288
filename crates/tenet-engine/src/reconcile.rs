//! Git reconciliation
//!
//! Compares `HEAD` with the last reconciled commit stored in the workflow
//! state and reports what changed in between.

use crate::EngineError;
use std::path::Path;
use std::process::Command;

/// Result of a reconciliation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reconciliation {
    /// Human report
    pub report: String,
    /// Commit to store as the new baseline, when it moved
    pub new_commit: Option<String>,
}

/// Reconcile the repository at `root` against `last_commit`
///
/// Never fails on git problems: a missing repository or git binary is
/// reported in the text and leaves the baseline untouched.
pub fn reconcile(root: &Path, last_commit: Option<&str>) -> Reconciliation {
    let head = match git(root, &["rev-parse", "HEAD"]) {
        Ok(out) => out.trim().to_string(),
        Err(e) => {
            tracing::debug!(error = %e, "git rev-parse failed");
            return Reconciliation {
                report: "RECONCILIATION: Not a git repository or git error.\n".to_string(),
                new_commit: None,
            };
        }
    };

    match last_commit.filter(|c| !c.is_empty()) {
        None => Reconciliation {
            report: format!("RECONCILIATION: Initializing baseline commit to {}\n", head),
            new_commit: Some(head),
        },
        Some(last) if last == head => Reconciliation {
            report: "RECONCILIATION: No changes detected (Clean).\n".to_string(),
            new_commit: None,
        },
        Some(last) => {
            let mut report = format!("RECONCILIATION: Detected changes since {}\n", last);
            let diff = validate_commit_ref(last)
                .and_then(|_| git(root, &["diff", "--name-status", last, "HEAD"]));
            match diff {
                Ok(out) => {
                    report.push_str("Changed files:\n");
                    report.push_str(&out);
                }
                Err(e) => report.push_str(&format!("Warning: Failed to get diff: {}\n", e)),
            }
            Reconciliation {
                report,
                new_commit: Some(head),
            }
        }
    }
}

/// Reject commit references that could be read as git options
pub fn validate_commit_ref(commit_ref: &str) -> Result<(), EngineError> {
    if commit_ref.is_empty() {
        return Err(EngineError::Git("commit ref cannot be empty".to_string()));
    }
    if commit_ref.starts_with('-') {
        return Err(EngineError::Git(format!(
            "commit ref cannot start with '-': {}",
            commit_ref
        )));
    }
    if commit_ref.contains('\0') {
        return Err(EngineError::Git("commit ref contains null byte".to_string()));
    }

    let valid = |c: char| {
        c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '/' | '.' | '~' | '^')
    };
    if !commit_ref.chars().all(valid) {
        return Err(EngineError::Git(format!(
            "commit ref contains invalid characters: {}",
            commit_ref
        )));
    }
    Ok(())
}

fn git(root: &Path, args: &[&str]) -> Result<String, EngineError> {
    let output = Command::new("git")
        .arg("-C")
        .arg(root)
        .args(args)
        .output()
        .map_err(|e| EngineError::Git(e.to_string()))?;

    if !output.status.success() {
        return Err(EngineError::Git(
            String::from_utf8_lossy(&output.stderr).trim().to_string(),
        ));
    }
    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_commit_ref_validation() {
        assert!(validate_commit_ref("abc123").is_ok());
        assert!(validate_commit_ref("HEAD~1").is_ok());
        assert!(validate_commit_ref("origin/main").is_ok());
        assert!(validate_commit_ref("").is_err());
        assert!(validate_commit_ref("--output=/tmp/x").is_err());
        assert!(validate_commit_ref("abc;rm -rf").is_err());
        assert!(validate_commit_ref("a\0b").is_err());
    }

    #[test]
    fn test_outside_repository() {
        let dir = tempfile::tempdir().unwrap();
        let result = reconcile(dir.path(), Some("abc123"));
        assert!(result.report.contains("Not a git repository"));
        assert!(result.new_commit.is_none());
    }
}
