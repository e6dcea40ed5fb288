//! Markdown journal and project layout
//!
//! Everything lives under `<root>/.tenet/`:
//!
//! ```text
//! .tenet/
//!   knowledge/{L0,L1,L2,invalid}/<artifact>.md
//!   evidence/<date>-<type>-<artifact>-<id>.md
//!   decisions/DRR-<unix>-<slug>.md
//!   sessions/loopback-<unix>-<child>.md
//!   agents/
//!   context.md
//!   config.toml
//!   tenet.db
//! ```
//!
//! The database is the source of truth; the journal is a human-readable
//! side channel that also serves as evidence for phase transitions.

use chrono::Utc;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tenet_domain::{Artifact, ArtifactId, Evidence, Tier};

/// Name of the project directory under the root
pub const PROJECT_DIR: &str = ".tenet";

const LAYOUT: &[&str] = &[
    "evidence",
    "decisions",
    "sessions",
    "knowledge/L0",
    "knowledge/L1",
    "knowledge/L2",
    "knowledge/invalid",
    "agents",
];

/// Writer for the `.tenet/` tree
#[derive(Debug, Clone)]
pub struct Journal {
    root: PathBuf,
    dir: PathBuf,
}

impl Journal {
    /// Journal for the project rooted at `root`
    pub fn new(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        let dir = root.join(PROJECT_DIR);
        Self { root, dir }
    }

    /// Project root (the directory containing `.tenet/`)
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// The `.tenet/` directory
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Whether the layout has been created
    pub fn is_initialized(&self) -> bool {
        self.dir.join("knowledge").is_dir()
    }

    /// Database file
    pub fn db_path(&self) -> PathBuf {
        self.dir.join("tenet.db")
    }

    /// Configuration file
    pub fn config_path(&self) -> PathBuf {
        self.dir.join("config.toml")
    }

    /// Bounded-context file
    pub fn context_path(&self) -> PathBuf {
        self.dir.join("context.md")
    }

    /// Directory holding artifacts of one tier
    pub fn knowledge_dir(&self, tier: Tier) -> PathBuf {
        self.dir.join("knowledge").join(tier.as_str())
    }

    /// Path of an artifact's file at a given tier
    pub fn artifact_path(&self, id: &ArtifactId, tier: Tier) -> PathBuf {
        self.knowledge_dir(tier).join(format!("{}.md", id))
    }

    /// Create every directory of the layout with a `.gitkeep` placeholder
    pub fn init_layout(&self) -> io::Result<()> {
        for d in LAYOUT {
            let path = self.dir.join(d);
            fs::create_dir_all(&path)?;
            fs::write(path.join(".gitkeep"), "")?;
        }
        Ok(())
    }

    /// Write an artifact's markdown file in its tier directory
    pub fn write_artifact(&self, artifact: &Artifact, rationale: &str) -> io::Result<PathBuf> {
        let path = self.artifact_path(&artifact.id, artifact.tier);
        let body = format!(
            "---\nscope: {}\nkind: {}\n---\n\n# Hypothesis: {}\n\n{}\n\n## Rationale\n{}\n",
            artifact.scope, artifact.kind, artifact.title, artifact.content, rationale
        );
        write_file(&path, &body)?;
        Ok(path)
    }

    /// Move an artifact's file between tier directories
    pub fn move_artifact(&self, id: &ArtifactId, from: Tier, to: Tier) -> io::Result<PathBuf> {
        let src = self.artifact_path(id, from);
        let dest = self.artifact_path(id, to);
        if let Some(parent) = dest.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::rename(&src, &dest)?;
        Ok(dest)
    }

    /// Write an evidence record
    pub fn write_evidence(&self, evidence: &Evidence) -> io::Result<PathBuf> {
        let date = evidence.created_at.format("%Y-%m-%d");
        let skip = evidence.id.chars().count().saturating_sub(8);
        let short_id: String = evidence.id.chars().skip(skip).collect();
        let filename = format!(
            "{}-{}-{}-{}.md",
            date,
            slug(&evidence.evidence_type),
            evidence.artifact_id,
            short_id
        );
        let path = self.dir.join("evidence").join(filename);

        let valid_until = evidence
            .valid_until
            .map(|d| d.to_rfc3339())
            .unwrap_or_default();
        let body = format!(
            "---\nid: {}\ntype: {}\ntarget: {}\nverdict: {}\nassurance_level: {}\ncarrier_ref: {}\nvalid_until: {}\ndate: {}\n---\n\n{}\n",
            evidence.id,
            evidence.evidence_type,
            evidence.artifact_id,
            evidence.verdict,
            evidence.assurance_level,
            evidence.carrier_ref,
            valid_until,
            date,
            evidence.content
        );
        write_file(&path, &body)?;
        Ok(path)
    }

    /// Write a decision record
    pub fn write_decision(&self, title: &str, body: &str) -> io::Result<PathBuf> {
        let name = format!("DRR-{}-{}.md", Utc::now().timestamp(), slug(title));
        let path = self.dir.join("decisions").join(name);
        write_file(&path, body)?;
        Ok(path)
    }

    /// Write a loopback event
    pub fn write_loopback(
        &self,
        parent: &ArtifactId,
        insight: &str,
        child: &ArtifactId,
    ) -> io::Result<PathBuf> {
        let name = format!("loopback-{}-{}.md", Utc::now().timestamp(), child);
        let path = self.dir.join("sessions").join(name);
        let body = format!(
            "# Loopback Event\n\nParent: {} (moved to invalid)\nInsight: {}\nChild: {}\n",
            parent, insight, child
        );
        write_file(&path, &body)?;
        Ok(path)
    }

    /// Write the bounded context
    pub fn write_context(&self, vocabulary: &str, invariants: &str) -> io::Result<PathBuf> {
        let path = self.context_path();
        let body = format!(
            "# Bounded Context\n\n## Vocabulary\n{}\n\n## Invariants\n{}\n",
            vocabulary, invariants
        );
        write_file(&path, &body)?;
        Ok(path)
    }
}

fn write_file(path: &Path, body: &str) -> io::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, body)
}

fn slug(s: &str) -> String {
    let id = ArtifactId::from_title(s);
    if id.is_empty() {
        "untitled".to_string()
    } else {
        id.to_string()
    }
}
