//! Structural audits for a quiescent graph.
//!
//! The checker validates what the engine actually guarantees at rest:
//! well-formed neighbour lists, degree bounds, dense level membership, and a
//! coherent entry point. Link symmetry is deliberately not audited; the
//! concurrent insertion order makes one-way edges legal.

use super::graph::HnswGraph;

/// Structural invariants the checker can audit.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum HnswInvariant {
    /// No node lists itself as a neighbour.
    NoSelfLoops,
    /// Neighbour lists contain no repeated ids.
    NoDuplicates,
    /// Neighbour counts respect the per-level capacity.
    DegreeBounds,
    /// A node at level `L` appears at every level below `L`.
    LevelMembership,
    /// Neighbour ids refer to inserted nodes.
    OrdinalRange,
    /// The entry point exists at its claimed level and tops the hierarchy.
    EntryPoint,
}

/// One audit failure, with enough context to locate the bad state.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct HnswInvariantViolation {
    /// Which invariant failed.
    pub invariant: HnswInvariant,
    /// Human-readable description of the failing node or edge.
    pub message: String,
}

/// Audits a graph that has no in-flight insertions.
#[derive(Debug)]
pub struct HnswInvariantChecker<'graph> {
    graph: &'graph HnswGraph,
}

impl<'graph> HnswInvariantChecker<'graph> {
    /// Creates a checker over `graph`.
    #[must_use]
    pub fn new(graph: &'graph HnswGraph) -> Self {
        Self { graph }
    }

    /// Runs every audit and returns all violations found.
    #[must_use]
    pub fn check_all(&self) -> Vec<HnswInvariantViolation> {
        let mut violations = Vec::new();
        self.check_neighbour_lists(&mut violations);
        self.check_level_membership(&mut violations);
        self.check_entry_point(&mut violations);
        violations
    }

    fn check_neighbour_lists(&self, violations: &mut Vec<HnswInvariantViolation>) {
        let base = self.graph.nodes_on_level(0);
        for level in 0..self.graph.num_levels() {
            for node in self.graph.nodes_on_level(level) {
                let Some(set) = self.graph.neighbours(level, node) else {
                    continue;
                };
                let ids = set.nodes();
                if ids.contains(&node) {
                    violations.push(HnswInvariantViolation {
                        invariant: HnswInvariant::NoSelfLoops,
                        message: format!("node {node} lists itself at level {level}"),
                    });
                }
                let mut sorted = ids.clone();
                sorted.sort_unstable();
                sorted.dedup();
                if sorted.len() != ids.len() {
                    violations.push(HnswInvariantViolation {
                        invariant: HnswInvariant::NoDuplicates,
                        message: format!("node {node} has duplicate neighbours at level {level}"),
                    });
                }
                let capacity = self.graph.max_connections_for_level(level);
                if ids.len() > capacity {
                    violations.push(HnswInvariantViolation {
                        invariant: HnswInvariant::DegreeBounds,
                        message: format!(
                            "node {node} has {} neighbours at level {level}, capacity {capacity}",
                            ids.len()
                        ),
                    });
                }
                for id in &sorted {
                    if base.binary_search(id).is_err() {
                        violations.push(HnswInvariantViolation {
                            invariant: HnswInvariant::OrdinalRange,
                            message: format!(
                                "node {node} links to uninserted node {id} at level {level}"
                            ),
                        });
                    }
                }
            }
        }
    }

    fn check_level_membership(&self, violations: &mut Vec<HnswInvariantViolation>) {
        for level in 1..self.graph.num_levels() {
            for node in self.graph.nodes_on_level(level) {
                for lower in 0..level {
                    if self.graph.neighbours(lower, node).is_none() {
                        violations.push(HnswInvariantViolation {
                            invariant: HnswInvariant::LevelMembership,
                            message: format!(
                                "node {node} is at level {level} but missing from level {lower}"
                            ),
                        });
                    }
                }
            }
        }
    }

    fn check_entry_point(&self, violations: &mut Vec<HnswInvariantViolation>) {
        let levels = self.graph.num_levels();
        match self.graph.entry() {
            None if levels == 0 => {}
            None => violations.push(HnswInvariantViolation {
                invariant: HnswInvariant::EntryPoint,
                message: "populated graph has no entry point".into(),
            }),
            Some(entry) => {
                if self.graph.neighbours(entry.level, entry.node).is_none() {
                    violations.push(HnswInvariantViolation {
                        invariant: HnswInvariant::EntryPoint,
                        message: format!(
                            "entry node {} is absent from its level {}",
                            entry.node, entry.level
                        ),
                    });
                }
                if entry.level + 1 != levels {
                    violations.push(HnswInvariantViolation {
                        invariant: HnswInvariant::EntryPoint,
                        message: format!(
                            "entry level {} does not top the {levels}-level hierarchy",
                            entry.level
                        ),
                    });
                }
            }
        }
    }
}
