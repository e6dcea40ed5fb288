//! Tenet Storage Layer
//!
//! Implements the `ArtifactStore` trait on SQLite.
//!
//! # Architecture
//!
//! - One SQLite file per project (`.tenet/tenet.db`)
//! - Versioned migrations tracked in `schema_version`
//! - Timestamps stored as RFC3339 text (UTC, microsecond precision) so that
//!   lexical order matches chronological order
//!
//! # Examples
//!
//! ```no_run
//! use tenet_store::SqliteStore;
//!
//! let store = SqliteStore::new(":memory:").unwrap();
//! // Store is now ready for artifact operations
//! ```

#![warn(missing_docs)]

pub mod migrations;

use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::path::Path;
use tenet_domain::traits::{ArtifactQuery, ArtifactStore};
use tenet_domain::{
    Artifact, ArtifactId, ArtifactKind, AssuranceLevel, AuditLogEntry, AuditResult,
    CongruenceLevel, Evidence, Phase, Relation, RelationType, Role, RoleAssignment, Tier,
    Verdict, Waiver, WorkflowState,
};
use thiserror::Error;

/// Errors that can occur during storage operations
#[derive(Error, Debug)]
pub enum StoreError {
    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// Record not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Invalid data format
    #[error("Invalid data: {0}")]
    InvalidData(String),

    /// Artifact already exists
    #[error("Artifact already exists: {0}")]
    Duplicate(String),

    /// Parent artifact does not exist
    #[error("Parent artifact does not exist: {0}")]
    MissingParent(String),
}

/// SQLite-based implementation of `ArtifactStore`
///
/// # Thread Safety
///
/// SQLite connections are not thread-safe. Each thread should have its own
/// SqliteStore instance.
pub struct SqliteStore {
    conn: Connection,
}

const ARTIFACT_COLUMNS: &str = "id, kind, tier, title, content, scope, context_id, parent_id, \
     cached_reliability, created_at, updated_at";

const EVIDENCE_COLUMNS: &str = "id, artifact_id, evidence_type, content, verdict, \
     assurance_level, carrier_ref, valid_until, created_at";

const AUDIT_COLUMNS: &str = "id, timestamp, action, operation, actor, target_id, input_hash, \
     result, details, context_id";

impl SqliteStore {
    /// Open (or create) a store at the given database path and migrate it
    ///
    /// Use `:memory:` for an in-memory database (useful for testing).
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use tenet_store::SqliteStore;
    ///
    /// let store = SqliteStore::new(".tenet/tenet.db").unwrap();
    /// ```
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
        let conn = Connection::open(path)?;
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        migrations::run_migrations(&conn)?;
        Ok(Self { conn })
    }

    /// Highest applied schema version
    pub fn schema_version(&self) -> Result<i64, StoreError> {
        Ok(migrations::current_version(&self.conn)?)
    }

    fn exists(&self, sql: &str, id: &str) -> Result<bool, StoreError> {
        Ok(self
            .conn
            .query_row(sql, params![id], |_| Ok(true))
            .optional()?
            .unwrap_or(false))
    }
}

/// Format a timestamp for storage
fn ts(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::Micros, true)
}

fn conversion_error(col: usize, msg: String) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(
        col,
        rusqlite::types::Type::Text,
        Box::new(StoreError::InvalidData(msg)),
    )
}

fn parse_ts(col: usize, s: &str) -> rusqlite::Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| conversion_error(col, format!("bad timestamp {:?}: {}", s, e)))
}

fn row_to_artifact(row: &Row<'_>) -> rusqlite::Result<Artifact> {
    let tier_str: String = row.get(2)?;
    let tier = Tier::parse(&tier_str)
        .ok_or_else(|| conversion_error(2, format!("unknown tier {:?}", tier_str)))?;
    let kind: String = row.get(1)?;
    let parent_id: Option<String> = row.get(7)?;
    let created_at: String = row.get(9)?;
    let updated_at: String = row.get(10)?;

    Ok(Artifact {
        id: ArtifactId::new(row.get::<_, String>(0)?),
        kind: ArtifactKind::parse(&kind),
        tier,
        title: row.get(3)?,
        content: row.get(4)?,
        scope: row.get(5)?,
        context_id: row.get(6)?,
        parent_id: parent_id.map(ArtifactId::new),
        cached_reliability: row.get(8)?,
        created_at: parse_ts(9, &created_at)?,
        updated_at: parse_ts(10, &updated_at)?,
    })
}

fn row_to_evidence(row: &Row<'_>) -> rusqlite::Result<Evidence> {
    let verdict_str: String = row.get(4)?;
    let verdict = Verdict::parse(&verdict_str)
        .ok_or_else(|| conversion_error(4, format!("unknown verdict {:?}", verdict_str)))?;
    let level_str: String = row.get(5)?;
    let assurance_level = AssuranceLevel::parse(&level_str)
        .ok_or_else(|| conversion_error(5, format!("unknown assurance level {:?}", level_str)))?;
    let valid_until: Option<String> = row.get(7)?;
    let created_at: String = row.get(8)?;

    Ok(Evidence {
        id: row.get(0)?,
        artifact_id: ArtifactId::new(row.get::<_, String>(1)?),
        evidence_type: row.get(2)?,
        content: row.get(3)?,
        verdict,
        assurance_level,
        carrier_ref: row.get(6)?,
        valid_until: valid_until.map(|s| parse_ts(7, &s)).transpose()?,
        created_at: parse_ts(8, &created_at)?,
    })
}

fn row_to_audit(row: &Row<'_>) -> rusqlite::Result<AuditLogEntry> {
    let timestamp: String = row.get(1)?;
    let result_str: String = row.get(7)?;
    let result = AuditResult::parse(&result_str)
        .ok_or_else(|| conversion_error(7, format!("unknown result {:?}", result_str)))?;

    Ok(AuditLogEntry {
        id: row.get(0)?,
        timestamp: parse_ts(1, &timestamp)?,
        action: row.get(2)?,
        operation: row.get(3)?,
        actor: row.get(4)?,
        target_id: row.get(5)?,
        input_hash: row.get(6)?,
        result,
        details: row.get(8)?,
        context_id: row.get(9)?,
    })
}

impl ArtifactStore for SqliteStore {
    type Error = StoreError;

    fn get_artifact(&self, id: &ArtifactId) -> Result<Option<Artifact>, Self::Error> {
        let sql = format!("SELECT {} FROM artifacts WHERE id = ?1", ARTIFACT_COLUMNS);
        let artifact = self
            .conn
            .query_row(&sql, params![id.as_str()], row_to_artifact)
            .optional()?;
        Ok(artifact)
    }

    fn create_artifact(&mut self, artifact: Artifact) -> Result<(), Self::Error> {
        if self.exists("SELECT 1 FROM artifacts WHERE id = ?1", artifact.id.as_str())? {
            return Err(StoreError::Duplicate(artifact.id.to_string()));
        }

        if let Some(parent) = &artifact.parent_id {
            if !self.exists("SELECT 1 FROM artifacts WHERE id = ?1", parent.as_str())? {
                return Err(StoreError::MissingParent(parent.to_string()));
            }
        }

        self.conn.execute(
            "INSERT INTO artifacts (id, kind, tier, title, content, scope, context_id, parent_id,
                                    cached_reliability, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
            params![
                artifact.id.as_str(),
                artifact.kind.as_str(),
                artifact.tier.as_str(),
                &artifact.title,
                &artifact.content,
                &artifact.scope,
                &artifact.context_id,
                artifact.parent_id.as_ref().map(|p| p.as_str()),
                artifact.cached_reliability.clamp(0.0, 1.0),
                ts(&artifact.created_at),
                ts(&artifact.updated_at),
            ],
        )?;

        Ok(())
    }

    fn set_artifact_tier(&mut self, id: &ArtifactId, tier: Tier) -> Result<(), Self::Error> {
        let changed = self.conn.execute(
            "UPDATE artifacts SET tier = ?1, updated_at = ?2 WHERE id = ?3",
            params![tier.as_str(), ts(&Utc::now()), id.as_str()],
        )?;

        if changed == 0 {
            return Err(StoreError::NotFound(format!("artifact {}", id)));
        }
        Ok(())
    }

    fn set_cached_reliability(&mut self, id: &ArtifactId, score: f64) -> Result<(), Self::Error> {
        let changed = self.conn.execute(
            "UPDATE artifacts SET cached_reliability = ?1 WHERE id = ?2",
            params![score.clamp(0.0, 1.0), id.as_str()],
        )?;

        if changed == 0 {
            return Err(StoreError::NotFound(format!("artifact {}", id)));
        }
        Ok(())
    }

    fn query_artifacts(&self, query: &ArtifactQuery) -> Result<Vec<Artifact>, Self::Error> {
        let mut sql = format!("SELECT {} FROM artifacts WHERE 1=1", ARTIFACT_COLUMNS);
        let mut params: Vec<Box<dyn rusqlite::ToSql>> = Vec::new();

        if let Some(context_id) = &query.context_id {
            sql.push_str(" AND context_id = ?");
            params.push(Box::new(context_id.clone()));
        }

        if let Some(tier) = query.tier {
            sql.push_str(" AND tier = ?");
            params.push(Box::new(tier.as_str()));
        }

        if let Some(kind) = &query.kind {
            sql.push_str(" AND kind = ?");
            params.push(Box::new(kind.as_str().to_string()));
        }

        sql.push_str(" ORDER BY created_at, id");

        if let Some(limit) = query.limit {
            sql.push_str(" LIMIT ?");
            params.push(Box::new(limit as i64));
        }

        let mut stmt = self.conn.prepare(&sql)?;
        let param_refs: Vec<&dyn rusqlite::ToSql> = params.iter().map(|p| p.as_ref()).collect();

        let artifacts = stmt
            .query_map(&param_refs[..], row_to_artifact)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(artifacts)
    }

    fn list_artifact_ids(&self) -> Result<Vec<ArtifactId>, Self::Error> {
        let mut stmt = self.conn.prepare("SELECT id FROM artifacts ORDER BY created_at, id")?;
        let ids = stmt
            .query_map([], |row| Ok(ArtifactId::new(row.get::<_, String>(0)?)))?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(ids)
    }

    fn add_evidence(&mut self, evidence: Evidence) -> Result<(), Self::Error> {
        self.conn.execute(
            "INSERT INTO evidence (id, artifact_id, evidence_type, content, verdict,
                                   assurance_level, carrier_ref, valid_until, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
            params![
                &evidence.id,
                evidence.artifact_id.as_str(),
                &evidence.evidence_type,
                &evidence.content,
                evidence.verdict.as_str(),
                evidence.assurance_level.as_str(),
                &evidence.carrier_ref,
                evidence.valid_until.as_ref().map(ts),
                ts(&evidence.created_at),
            ],
        )?;
        Ok(())
    }

    fn get_evidence(&self, artifact_id: &ArtifactId) -> Result<Vec<Evidence>, Self::Error> {
        let sql = format!(
            "SELECT {} FROM evidence WHERE artifact_id = ?1 ORDER BY created_at, rowid",
            EVIDENCE_COLUMNS
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let evidence = stmt
            .query_map(params![artifact_id.as_str()], row_to_evidence)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(evidence)
    }

    fn get_evidence_by_id(&self, id: &str) -> Result<Option<Evidence>, Self::Error> {
        let sql = format!("SELECT {} FROM evidence WHERE id = ?1", EVIDENCE_COLUMNS);
        let evidence = self.conn.query_row(&sql, params![id], row_to_evidence).optional()?;
        Ok(evidence)
    }

    fn add_relation(&mut self, relation: Relation) -> Result<(), Self::Error> {
        self.conn.execute(
            "INSERT INTO relations (source_id, target_id, relation_type, congruence_level, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5)
             ON CONFLICT(source_id, target_id, relation_type) DO UPDATE SET
             congruence_level = excluded.congruence_level",
            params![
                &relation.source_id,
                relation.target_id.as_str(),
                relation.relation_type.as_str(),
                relation.congruence.value(),
                ts(&Utc::now()),
            ],
        )?;
        Ok(())
    }

    fn get_relations_targeting(
        &self,
        target: &ArtifactId,
        relation_type: &RelationType,
    ) -> Result<Vec<Relation>, Self::Error> {
        let mut stmt = self.conn.prepare(
            "SELECT source_id, target_id, relation_type, congruence_level
             FROM relations WHERE target_id = ?1 AND relation_type = ?2
             ORDER BY created_at, source_id",
        )?;

        let relations = stmt
            .query_map(params![target.as_str(), relation_type.as_str()], |row| {
                let rel_type: String = row.get(2)?;
                let level: u8 = row.get(3)?;
                let congruence = CongruenceLevel::new(level).map_err(|e| conversion_error(3, e))?;

                Ok(Relation {
                    source_id: row.get(0)?,
                    target_id: ArtifactId::new(row.get::<_, String>(1)?),
                    relation_type: RelationType::parse(&rel_type),
                    congruence,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(relations)
    }

    fn add_waiver(&mut self, waiver: Waiver) -> Result<(), Self::Error> {
        self.conn.execute(
            "INSERT INTO waivers (id, evidence_id, waived_by, expires_at, rationale, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                &waiver.id,
                &waiver.evidence_id,
                &waiver.waived_by,
                ts(&waiver.expires_at),
                &waiver.rationale,
                ts(&waiver.created_at),
            ],
        )?;
        Ok(())
    }

    fn get_active_waiver(
        &self,
        evidence_id: &str,
        now: DateTime<Utc>,
    ) -> Result<Option<Waiver>, Self::Error> {
        let waiver = self
            .conn
            .query_row(
                "SELECT id, evidence_id, waived_by, expires_at, rationale, created_at
                 FROM waivers WHERE evidence_id = ?1 AND expires_at > ?2
                 ORDER BY expires_at DESC LIMIT 1",
                params![evidence_id, ts(&now)],
                |row| {
                    let expires_at: String = row.get(3)?;
                    let created_at: String = row.get(5)?;
                    Ok(Waiver {
                        id: row.get(0)?,
                        evidence_id: row.get(1)?,
                        waived_by: row.get(2)?,
                        expires_at: parse_ts(3, &expires_at)?,
                        rationale: row.get(4)?,
                        created_at: parse_ts(5, &created_at)?,
                    })
                },
            )
            .optional()?;
        Ok(waiver)
    }

    fn load_workflow_state(&self, context_id: &str) -> Result<WorkflowState, Self::Error> {
        let state = self
            .conn
            .query_row(
                "SELECT phase, active_role, active_session_id, active_role_context,
                        last_commit, assurance_threshold
                 FROM workflow_state WHERE context_id = ?1",
                params![context_id],
                |row| {
                    let phase_str: String = row.get(0)?;
                    let phase = Phase::parse(&phase_str)
                        .ok_or_else(|| conversion_error(0, format!("unknown phase {:?}", phase_str)))?;

                    let role: Option<String> = row.get(1)?;
                    let active_role = match role {
                        Some(name) => {
                            let role = Role::parse(&name)
                                .ok_or_else(|| conversion_error(1, format!("unknown role {:?}", name)))?;
                            let session: Option<String> = row.get(2)?;
                            let context: Option<String> = row.get(3)?;
                            Some(RoleAssignment::new(
                                role,
                                session.unwrap_or_default(),
                                context.unwrap_or_default(),
                            ))
                        }
                        None => None,
                    };

                    Ok(WorkflowState {
                        context_id: context_id.to_string(),
                        phase,
                        active_role,
                        last_commit: row.get(4)?,
                        assurance_threshold: row.get(5)?,
                    })
                },
            )
            .optional()?;

        Ok(state.unwrap_or_else(|| WorkflowState::new(context_id)))
    }

    fn save_workflow_state(&mut self, state: &WorkflowState) -> Result<(), Self::Error> {
        let role = state.active_role.as_ref();
        self.conn.execute(
            "INSERT INTO workflow_state (context_id, phase, active_role, active_session_id,
                                         active_role_context, last_commit, assurance_threshold, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
             ON CONFLICT(context_id) DO UPDATE SET
                phase = excluded.phase,
                active_role = excluded.active_role,
                active_session_id = excluded.active_session_id,
                active_role_context = excluded.active_role_context,
                last_commit = excluded.last_commit,
                assurance_threshold = excluded.assurance_threshold,
                updated_at = excluded.updated_at",
            params![
                &state.context_id,
                state.phase.as_str(),
                role.map(|r| r.role.as_str()),
                role.map(|r| r.session_id.as_str()),
                role.map(|r| r.context.as_str()),
                state.last_commit.as_deref(),
                state.assurance_threshold,
                ts(&Utc::now()),
            ],
        )?;
        Ok(())
    }

    fn append_audit_log(&mut self, entry: AuditLogEntry) -> Result<(), Self::Error> {
        self.conn.execute(
            "INSERT INTO audit_log (id, timestamp, action, operation, actor, target_id,
                                    input_hash, result, details, context_id)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
            params![
                &entry.id,
                ts(&entry.timestamp),
                &entry.action,
                &entry.operation,
                &entry.actor,
                entry.target_id.as_deref(),
                &entry.input_hash,
                entry.result.as_str(),
                entry.details.as_deref(),
                &entry.context_id,
            ],
        )?;
        Ok(())
    }

    fn list_audit_log(&self, context_id: &str, limit: usize) -> Result<Vec<AuditLogEntry>, Self::Error> {
        let sql = format!(
            "SELECT {} FROM audit_log WHERE context_id = ?1
             ORDER BY timestamp DESC, rowid DESC LIMIT ?2",
            AUDIT_COLUMNS
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let entries = stmt
            .query_map(params![context_id, limit as i64], row_to_audit)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(entries)
    }
}
