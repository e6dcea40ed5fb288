//! Output formatting for the CLI.

use crate::cli::CliFormat;
use crate::error::Result;
use colored::*;
use tabled::{
    builder::Builder,
    settings::{object::Rows, Alignment, Modify, Style},
};
use tenet_domain::{AuditLogEntry, AuditResult};

/// Output formatter.
pub struct Formatter {
    format: CliFormat,
    color_enabled: bool,
}

impl Formatter {
    /// Create a new formatter.
    pub fn new(format: CliFormat, color_enabled: bool) -> Self {
        Self {
            format,
            color_enabled,
        }
    }

    /// Selected format.
    pub fn format(&self) -> CliFormat {
        self.format
    }

    /// Format the text an engine command returned.
    pub fn format_report(&self, command: &str, report: &str) -> Result<String> {
        match self.format {
            CliFormat::Json => Ok(serde_json::to_string_pretty(&serde_json::json!({
                "command": command,
                "output": report.trim_end(),
            }))?),
            CliFormat::Text => Ok(report.trim_end().to_string()),
        }
    }

    /// Format audit log entries.
    pub fn format_audit_log(&self, entries: &[AuditLogEntry]) -> Result<String> {
        match self.format {
            CliFormat::Json => self.format_audit_log_json(entries),
            CliFormat::Text => Ok(self.format_audit_log_table(entries)),
        }
    }

    fn format_audit_log_json(&self, entries: &[AuditLogEntry]) -> Result<String> {
        let json_entries: Vec<serde_json::Value> = entries
            .iter()
            .map(|e| {
                serde_json::json!({
                    "id": e.id,
                    "timestamp": e.timestamp.to_rfc3339(),
                    "action": e.action,
                    "operation": e.operation,
                    "actor": e.actor,
                    "target_id": e.target_id,
                    "input_hash": e.input_hash,
                    "result": e.result.as_str(),
                    "details": e.details,
                })
            })
            .collect();

        Ok(serde_json::to_string_pretty(&json_entries)?)
    }

    fn format_audit_log_table(&self, entries: &[AuditLogEntry]) -> String {
        if entries.is_empty() {
            return self.colorize("No audit entries found.", "yellow");
        }

        let mut builder = Builder::default();
        builder.push_record(["Time", "Action", "Actor", "Target", "Result", "Details"]);

        for entry in entries {
            let result = match entry.result {
                AuditResult::Success => self.colorize(entry.result.as_str(), "green"),
                AuditResult::Failure => self.colorize(entry.result.as_str(), "red"),
            };
            builder.push_record([
                entry.timestamp.format("%Y-%m-%d %H:%M:%S").to_string(),
                entry.action.clone(),
                entry.actor.clone(),
                entry.target_id.clone().unwrap_or_else(|| "-".to_string()),
                result,
                truncate(entry.details.as_deref().unwrap_or(""), 60),
            ]);
        }

        let mut table = builder.build();
        table
            .with(Style::rounded())
            .with(Modify::new(Rows::first()).with(Alignment::center()));

        table.to_string()
    }

    /// Format a success message.
    pub fn success(&self, msg: &str) -> String {
        self.colorize(msg, "green")
    }

    /// Format an error message.
    pub fn error(&self, msg: &str) -> String {
        self.colorize(msg, "red")
    }

    /// Format a warning message.
    pub fn warning(&self, msg: &str) -> String {
        self.colorize(msg, "yellow")
    }

    /// Format an info message.
    pub fn info(&self, msg: &str) -> String {
        self.colorize(msg, "cyan")
    }

    fn colorize(&self, text: &str, color: &str) -> String {
        if !self.color_enabled {
            return text.to_string();
        }

        match color {
            "red" => text.red().to_string(),
            "green" => text.green().to_string(),
            "yellow" => text.yellow().to_string(),
            "cyan" => text.cyan().to_string(),
            _ => text.to_string(),
        }
    }
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let cut: String = s.chars().take(max.saturating_sub(3)).collect();
    format!("{}...", cut)
}
