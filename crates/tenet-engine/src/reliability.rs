//! Reliability calculator
//!
//! Walks the `componentOf` graph below an artifact with an explicit stack,
//! scoring each node from its live evidence and blending in its components.
//!
//! Three kinds of edge are cut instead of followed: a component that is
//! still being scored (a cycle), a component that does not exist, and any
//! component below the depth bound. A cut edge contributes nothing and is
//! reported as a factor.
//!
//! A report with no cycle or depth cut anywhere below it does not depend on
//! where the walk started and is memoized for the lifetime of the
//! calculator. The rest are kept per root.

use crate::ReliabilityError;
use chrono::{DateTime, Utc};
use std::collections::{HashMap, HashSet};
use std::fmt::Display;
use tenet_domain::reliability::{self, ReliabilityParams};
use tenet_domain::traits::ArtifactStore;
use tenet_domain::{
    ArtifactId, AssuranceLevel, CongruenceLevel, RelationType, Tier, Verdict,
};

/// A `componentOf` edge below a scored artifact
#[derive(Debug, Clone, PartialEq)]
pub struct ComponentEdge {
    /// Component artifact
    pub id: ArtifactId,
    /// Congruence of the edge
    pub congruence: CongruenceLevel,
}

/// Score of one artifact with the reasons behind it
#[derive(Debug, Clone, PartialEq)]
pub struct ReliabilityReport {
    /// Scored artifact
    pub artifact_id: ArtifactId,
    /// Artifact title
    pub title: String,
    /// Tier at the time of scoring
    pub tier: Tier,
    /// Final score in [0.0, 1.0]
    pub score: f64,
    /// Score from the artifact's own evidence
    pub local_score: f64,
    /// Human-readable factors that lowered or qualified the score
    pub factors: Vec<String>,
    /// Direct components, in storage order
    pub components: Vec<ComponentEdge>,
}

impl ReliabilityReport {
    /// Multi-line summary
    pub fn render(&self) -> String {
        let mut out = format!(
            "Reliability of {} ({}): {:.2}\nLocal evidence score: {:.2}\n",
            self.artifact_id, self.tier, self.score, self.local_score
        );
        if !self.factors.is_empty() {
            out.push_str("Factors:\n");
            for f in &self.factors {
                out.push_str(&format!("- {}\n", f));
            }
        }
        out
    }
}

enum Frame {
    Enter { id: ArtifactId, depth: usize },
    Exit(Pending),
}

struct Pending {
    id: ArtifactId,
    title: String,
    tier: Tier,
    local: f64,
    factors: Vec<String>,
    components: Vec<ComponentEdge>,
    depth: usize,
}

/// Per-walk state
#[derive(Default)]
struct Walk {
    in_progress: HashSet<ArtifactId>,
    /// Reports cut somewhere below by a cycle or the depth bound
    rooted: HashMap<ArtifactId, ReliabilityReport>,
}

/// Memoizing reliability calculator over a store
pub struct ReliabilityCalculator<'a, S: ArtifactStore> {
    store: &'a S,
    params: ReliabilityParams,
    threshold: f64,
    now: DateTime<Utc>,
    cache: HashMap<ArtifactId, ReliabilityReport>,
    by_root: HashMap<ArtifactId, ReliabilityReport>,
    missing: HashSet<ArtifactId>,
}

impl<'a, S: ArtifactStore> ReliabilityCalculator<'a, S>
where
    S::Error: Display,
{
    /// Create a calculator that evaluates expiry and waivers at `now`
    pub fn new(store: &'a S, params: ReliabilityParams, threshold: f64, now: DateTime<Utc>) -> Self {
        Self {
            store,
            params,
            threshold,
            now,
            cache: HashMap::new(),
            by_root: HashMap::new(),
            missing: HashSet::new(),
        }
    }

    /// Memoized report that does not depend on the root it was reached from
    pub fn cached(&self, id: &ArtifactId) -> Option<&ReliabilityReport> {
        self.cache.get(id)
    }

    /// Whether a walk found that `id` does not exist
    pub fn is_missing(&self, id: &ArtifactId) -> bool {
        self.missing.contains(id)
    }

    /// Score an artifact and everything below it
    pub fn calculate(&mut self, id: &ArtifactId) -> Result<ReliabilityReport, ReliabilityError> {
        if let Some(report) = self.cache.get(id).or_else(|| self.by_root.get(id)) {
            return Ok(report.clone());
        }
        self.trace(id)?;
        self.cache
            .get(id)
            .or_else(|| self.by_root.get(id))
            .cloned()
            .ok_or_else(|| ReliabilityError::MissingArtifact(id.to_string()))
    }

    /// Score `root` and return the reports that only hold as seen from it
    ///
    /// Every other report the computation used is available from
    /// [`cached`](Self::cached).
    pub fn trace(
        &mut self,
        root: &ArtifactId,
    ) -> Result<HashMap<ArtifactId, ReliabilityReport>, ReliabilityError> {
        if self.cache.contains_key(root) {
            return Ok(HashMap::new());
        }

        let walk = self.walk(root)?;
        if let Some(report) = walk.rooted.get(root) {
            self.by_root.insert(root.clone(), report.clone());
        }
        Ok(walk.rooted)
    }

    fn walk(&mut self, root: &ArtifactId) -> Result<Walk, ReliabilityError> {
        let mut walk = Walk::default();
        let mut stack = vec![Frame::Enter {
            id: root.clone(),
            depth: 0,
        }];

        while let Some(frame) = stack.pop() {
            match frame {
                Frame::Enter { id, depth } => {
                    if self.is_resolved(&walk, &id) || walk.in_progress.contains(&id) {
                        continue;
                    }

                    let pending = match self.enter(&id, depth)? {
                        Some(pending) => pending,
                        None if depth == 0 => {
                            return Err(ReliabilityError::MissingArtifact(id.to_string()));
                        }
                        None => {
                            tracing::debug!(artifact = %id, "component not found");
                            self.missing.insert(id);
                            continue;
                        }
                    };
                    walk.in_progress.insert(id);

                    let children: Vec<ArtifactId> = if depth >= self.params.max_depth {
                        Vec::new()
                    } else {
                        pending
                            .components
                            .iter()
                            .filter(|c| !self.is_resolved(&walk, &c.id) && !walk.in_progress.contains(&c.id))
                            .map(|c| c.id.clone())
                            .collect()
                    };

                    stack.push(Frame::Exit(pending));
                    for child in children.into_iter().rev() {
                        stack.push(Frame::Enter {
                            id: child,
                            depth: depth + 1,
                        });
                    }
                }
                Frame::Exit(pending) => {
                    let (report, cut) = self.exit(&walk, pending);
                    walk.in_progress.remove(&report.artifact_id);
                    tracing::debug!(artifact = %report.artifact_id, score = report.score, cut, "scored");
                    if cut {
                        walk.rooted.insert(report.artifact_id.clone(), report);
                    } else {
                        self.cache.insert(report.artifact_id.clone(), report);
                    }
                }
            }
        }

        Ok(walk)
    }

    fn is_resolved(&self, walk: &Walk, id: &ArtifactId) -> bool {
        self.cache.contains_key(id) || walk.rooted.contains_key(id) || self.missing.contains(id)
    }

    fn enter(&self, id: &ArtifactId, depth: usize) -> Result<Option<Pending>, ReliabilityError> {
        let artifact = match self
            .store
            .get_artifact(id)
            .map_err(|e| ReliabilityError::Store(e.to_string()))?
        {
            Some(artifact) => artifact,
            None => return Ok(None),
        };

        let evidence = self
            .store
            .get_evidence(id)
            .map_err(|e| ReliabilityError::Store(e.to_string()))?;

        let mut factors = Vec::new();
        let mut scored: Vec<(Verdict, AssuranceLevel)> = Vec::with_capacity(evidence.len());

        for ev in &evidence {
            let waiver = self
                .store
                .get_active_waiver(&ev.id, self.now)
                .map_err(|e| ReliabilityError::Store(e.to_string()))?;

            if let Some(w) = waiver {
                factors.push(format!(
                    "Evidence {} waived by {} until {}",
                    ev.id,
                    w.waived_by,
                    w.expires_at.format("%Y-%m-%d")
                ));
                scored.push((Verdict::Pass, ev.assurance_level));
            } else if ev.is_expired(self.now) {
                let deadline = ev
                    .valid_until
                    .map(|d| d.format("%Y-%m-%d").to_string())
                    .unwrap_or_default();
                factors.push(format!("Evidence {} expired on {}", ev.id, deadline));
            } else {
                scored.push((ev.verdict, ev.assurance_level));
            }
        }

        let local = match reliability::local_score(&scored, &self.params) {
            Some(score) => score,
            None => {
                factors.push("No valid evidence found".to_string());
                self.params.no_evidence_score
            }
        };

        let components = self
            .store
            .get_relations_targeting(id, &RelationType::ComponentOf)
            .map_err(|e| ReliabilityError::Store(e.to_string()))?
            .into_iter()
            .map(|r| ComponentEdge {
                id: ArtifactId::new(r.source_id),
                congruence: r.congruence,
            })
            .collect();

        Ok(Some(Pending {
            id: artifact.id,
            title: artifact.title,
            tier: artifact.tier,
            local,
            factors,
            components,
            depth,
        }))
    }

    /// Build the report; the flag is set when a cycle or the depth bound cut
    /// an edge at or below this node
    fn exit(&self, walk: &Walk, pending: Pending) -> (ReliabilityReport, bool) {
        let Pending {
            id,
            title,
            tier,
            local,
            mut factors,
            components,
            depth,
        } = pending;

        let mut cut = false;
        let mut contributions = Vec::with_capacity(components.len());
        for edge in &components {
            if depth >= self.params.max_depth {
                cut = true;
                factors.push(format!(
                    "Depth bound {} reached at component {}; contribution ignored",
                    self.params.max_depth, edge.id
                ));
                continue;
            }

            let child = match self.cache.get(&edge.id) {
                Some(child) => child,
                None => match walk.rooted.get(&edge.id) {
                    Some(child) => {
                        cut = true;
                        child
                    }
                    None if self.missing.contains(&edge.id) => {
                        factors.push(format!(
                            "Component {} not found; contribution ignored",
                            edge.id
                        ));
                        continue;
                    }
                    None => {
                        cut = true;
                        factors.push(format!(
                            "Cycle detected at component {}; contribution ignored",
                            edge.id
                        ));
                        continue;
                    }
                },
            };

            contributions.push(reliability::component_contribution(
                child.score,
                local,
                edge.congruence,
            ));
            if child.score < local && edge.congruence.value() > 0 {
                factors.push(format!(
                    "Weakened by component {} (R:{:.2}, {})",
                    edge.id, child.score, edge.congruence
                ));
            }
        }

        let mut score = reliability::blend(local, &contributions, &self.params);

        if tier == Tier::Invalid {
            score = 0.0;
            factors.push("Artifact is invalid".to_string());
        }

        if score < self.threshold {
            factors.push(format!(
                "Below assurance threshold ({:.2} < {:.2})",
                score, self.threshold
            ));
        }

        let report = ReliabilityReport {
            artifact_id: id,
            title,
            tier,
            score,
            local_score: local,
            factors,
            components,
        };
        (report, cut)
    }
}
