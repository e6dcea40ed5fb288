//! Versioned schema migrations
//!
//! Migrations are applied in order and recorded in `schema_version`. Never
//! modify or reorder an existing entry; append new ones at the end.

use rusqlite::{params, Connection, OptionalExtension};

/// One schema step
pub struct Migration {
    /// Monotonic version number
    pub version: i64,
    /// Human description
    pub description: &'static str,
    /// SQL batch to execute
    pub sql: &'static str,
}

/// All migrations, oldest first
pub const MIGRATIONS: &[Migration] = &[
    Migration {
        version: 1,
        description: "Create artifacts, evidence and relations",
        sql: "
            CREATE TABLE IF NOT EXISTS artifacts (
                id TEXT PRIMARY KEY,
                kind TEXT NOT NULL,
                tier TEXT NOT NULL,
                title TEXT NOT NULL,
                content TEXT NOT NULL,
                scope TEXT NOT NULL DEFAULT '',
                context_id TEXT NOT NULL,
                parent_id TEXT REFERENCES artifacts(id),
                cached_reliability REAL NOT NULL DEFAULT 0.0
                    CHECK(cached_reliability BETWEEN 0.0 AND 1.0),
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL
            );
            CREATE INDEX IF NOT EXISTS idx_artifacts_context_tier ON artifacts(context_id, tier);

            CREATE TABLE IF NOT EXISTS evidence (
                id TEXT PRIMARY KEY,
                artifact_id TEXT NOT NULL,
                evidence_type TEXT NOT NULL,
                content TEXT NOT NULL,
                verdict TEXT NOT NULL,
                assurance_level TEXT NOT NULL,
                carrier_ref TEXT NOT NULL DEFAULT '',
                valid_until TEXT,
                created_at TEXT NOT NULL
            );
            CREATE INDEX IF NOT EXISTS idx_evidence_artifact ON evidence(artifact_id);

            CREATE TABLE IF NOT EXISTS relations (
                source_id TEXT NOT NULL,
                target_id TEXT NOT NULL,
                relation_type TEXT NOT NULL,
                congruence_level INTEGER NOT NULL DEFAULT 3
                    CHECK(congruence_level BETWEEN 0 AND 3),
                created_at TEXT NOT NULL,
                PRIMARY KEY (source_id, target_id, relation_type)
            );
            CREATE INDEX IF NOT EXISTS idx_relations_target ON relations(target_id, relation_type);
        ",
    },
    Migration {
        version: 2,
        description: "Add waivers",
        sql: "
            CREATE TABLE IF NOT EXISTS waivers (
                id TEXT PRIMARY KEY,
                evidence_id TEXT NOT NULL,
                waived_by TEXT NOT NULL,
                expires_at TEXT NOT NULL,
                rationale TEXT NOT NULL,
                created_at TEXT NOT NULL
            );
            CREATE INDEX IF NOT EXISTS idx_waivers_evidence ON waivers(evidence_id);
        ",
    },
    Migration {
        version: 3,
        description: "Add workflow_state for phase and role tracking",
        sql: "
            CREATE TABLE IF NOT EXISTS workflow_state (
                context_id TEXT PRIMARY KEY,
                phase TEXT NOT NULL DEFAULT 'IDLE',
                active_role TEXT,
                active_session_id TEXT,
                active_role_context TEXT,
                last_commit TEXT,
                assurance_threshold REAL NOT NULL DEFAULT 0.8
                    CHECK(assurance_threshold BETWEEN 0.0 AND 1.0),
                updated_at TEXT NOT NULL
            );
        ",
    },
    Migration {
        version: 4,
        description: "Add audit_log",
        sql: "
            CREATE TABLE IF NOT EXISTS audit_log (
                id TEXT PRIMARY KEY,
                timestamp TEXT NOT NULL,
                action TEXT NOT NULL,
                operation TEXT NOT NULL,
                actor TEXT NOT NULL,
                target_id TEXT,
                input_hash TEXT NOT NULL,
                result TEXT NOT NULL CHECK(result IN ('SUCCESS', 'FAILURE')),
                details TEXT,
                context_id TEXT NOT NULL
            );
            CREATE INDEX IF NOT EXISTS idx_audit_context ON audit_log(context_id, timestamp);
        ",
    },
];

/// Apply every migration not yet recorded in `schema_version`
pub fn run_migrations(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS schema_version (
            version INTEGER PRIMARY KEY,
            applied_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
        )",
    )?;

    for m in MIGRATIONS {
        let applied = conn
            .query_row(
                "SELECT 1 FROM schema_version WHERE version = ?1",
                params![m.version],
                |_| Ok(true),
            )
            .optional()?
            .unwrap_or(false);

        if applied {
            continue;
        }

        tracing::debug!(version = m.version, description = m.description, "applying migration");
        conn.execute_batch(m.sql)?;
        conn.execute("INSERT INTO schema_version (version) VALUES (?1)", params![m.version])?;
    }

    Ok(())
}

/// Highest applied migration version (0 for a fresh database)
pub fn current_version(conn: &Connection) -> rusqlite::Result<i64> {
    conn.query_row(
        "SELECT COALESCE(MAX(version), 0) FROM schema_version",
        [],
        |row| row.get(0),
    )
}
