//! Audit tree rendering
//!
//! Pre-order, depth-first view of the reliability computation:
//!
//! ```text
//! [api-gateway R:0.72] API gateway
//!   ! Weakened by component auth-service (R:0.40, CL:2)
//!   --(CL:2)-->
//!   [auth-service R:0.40] Auth service
//!     ! No valid evidence found
//! ```

use crate::reliability::ReliabilityCalculator;
use crate::ReliabilityError;
use std::collections::HashSet;
use std::fmt::Display;
use tenet_domain::traits::ArtifactStore;
use tenet_domain::{ArtifactId, CongruenceLevel};

enum Frame {
    Node { id: ArtifactId, level: usize },
    Edge { congruence: CongruenceLevel, level: usize },
    Leave(ArtifactId),
}

/// Render the audit tree rooted at `root`
///
/// The root must exist; missing components below it are rendered inline.
pub fn render<S: ArtifactStore>(
    calc: &mut ReliabilityCalculator<'_, S>,
    root: &ArtifactId,
) -> Result<String, ReliabilityError>
where
    S::Error: Display,
{
    let seen_from_root = calc.trace(root)?;
    if !seen_from_root.contains_key(root) && calc.cached(root).is_none() {
        return Err(ReliabilityError::MissingArtifact(root.to_string()));
    }

    let mut out = String::new();
    let mut path: HashSet<ArtifactId> = HashSet::new();
    let mut stack = vec![Frame::Node {
        id: root.clone(),
        level: 0,
    }];

    while let Some(frame) = stack.pop() {
        match frame {
            Frame::Edge { congruence, level } => {
                out.push_str(&format!("{}  --({})-->\n", indent(level), congruence));
            }
            Frame::Leave(id) => {
                path.remove(&id);
            }
            Frame::Node { id, level } => {
                let pad = indent(level);

                if path.contains(&id) {
                    out.push_str(&format!("{}[{}] (cycle, not expanded)\n", pad, id));
                    continue;
                }

                let report = match seen_from_root.get(&id).or_else(|| calc.cached(&id)) {
                    Some(report) => report,
                    None if calc.is_missing(&id) => {
                        out.push_str(&format!("{}[{}] (not found)\n", pad, id));
                        continue;
                    }
                    None => {
                        out.push_str(&format!("{}[{}] (not scored)\n", pad, id));
                        continue;
                    }
                };

                out.push_str(&format!(
                    "{}[{} R:{:.2}] {}\n",
                    pad, id, report.score, report.title
                ));
                for factor in &report.factors {
                    out.push_str(&format!("{}  ! {}\n", pad, factor));
                }

                path.insert(id.clone());
                stack.push(Frame::Leave(id));
                for edge in report.components.iter().rev() {
                    stack.push(Frame::Node {
                        id: edge.id.clone(),
                        level: level + 1,
                    });
                    stack.push(Frame::Edge {
                        congruence: edge.congruence,
                        level,
                    });
                }
            }
        }
    }

    Ok(out)
}

fn indent(level: usize) -> String {
    "  ".repeat(level)
}
