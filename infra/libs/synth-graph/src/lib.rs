//! Declarative provisioning graph shared by all deployment stacks.
//!
//! Stacks declare typed resources and named outputs; the `App` holds the
//! stacks, the explicit dependency edges between them, and synthesizes a
//! deterministic, ordered deployment plan. Resource creation itself is the
//! external orchestrator's job; this crate ends at the serialized plan.

pub mod error;
pub mod stack;

pub use error::{Result, SynthError};
pub use stack::{Attr, Output, OutputRef, Resource, Stack};

use serde::Serialize;
use tracing::{debug, info};

/// Top-level unit holding every stack of one deployment.
#[derive(Debug, Default)]
pub struct App {
    stacks: Vec<Stack>,
    /// (dependent, dependency) pairs. Ordering is never inferred from
    /// declaration sequence; every cross-stack import needs one of these.
    edges: Vec<(String, String)>,
    cross_region_references: bool,
}

/// Synthesized result: stacks in provisioning order, ready to serialize.
#[derive(Debug, PartialEq, Serialize)]
pub struct DeploymentPlan {
    pub stacks: Vec<Stack>,
}

impl DeploymentPlan {
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(|e| SynthError::Serialization(e.to_string()))
    }

    pub fn stack(&self, name: &str) -> Option<&Stack> {
        self.stacks.iter().find(|s| s.name() == name)
    }

    /// Position of a stack in provisioning order.
    pub fn position(&self, name: &str) -> Option<usize> {
        self.stacks.iter().position(|s| s.name() == name)
    }
}

impl App {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allow stacks in different regions to pass outputs to each other.
    /// Disabled by default; a cross-region import without this is an error.
    pub fn enable_cross_region_references(&mut self) {
        self.cross_region_references = true;
    }

    pub fn add_stack(&mut self, stack: Stack) -> Result<()> {
        if self.stacks.iter().any(|s| s.name() == stack.name()) {
            return Err(SynthError::DuplicateStack(stack.name().to_string()));
        }
        debug!(stack = %stack.name(), region = %stack.region(), "registered stack");
        self.stacks.push(stack);
        Ok(())
    }

    /// Record an explicit ordering edge: `dependent` provisions only after
    /// `dependency` has completed and published its outputs.
    pub fn add_dependency(&mut self, dependent: &str, dependency: &str) {
        if !self.has_edge(dependent, dependency) {
            self.edges
                .push((dependent.to_string(), dependency.to_string()));
        }
    }

    /// Validate the graph and produce the ordered plan.
    pub fn synth(&self) -> Result<DeploymentPlan> {
        for (dependent, dependency) in &self.edges {
            for name in [dependent, dependency] {
                if self.stack_index(name).is_none() {
                    return Err(SynthError::UnknownStack(name.clone()));
                }
            }
        }
        self.validate_imports()?;
        let ordered = self.topological_order()?;

        info!(stacks = ordered.len(), "synthesized deployment plan");
        Ok(DeploymentPlan {
            stacks: ordered.into_iter().map(|i| self.stacks[i].clone()).collect(),
        })
    }

    fn stack_index(&self, name: &str) -> Option<usize> {
        self.stacks.iter().position(|s| s.name() == name)
    }

    fn has_edge(&self, dependent: &str, dependency: &str) -> bool {
        self.edges
            .iter()
            .any(|(a, b)| a == dependent && b == dependency)
    }

    fn validate_imports(&self) -> Result<()> {
        for consumer in &self.stacks {
            for import in consumer.imports() {
                let producer = match self.stacks.iter().find(|s| s.name() == import.stack) {
                    Some(p) => p,
                    None => {
                        return Err(SynthError::UnknownProducer {
                            stack: consumer.name().to_string(),
                            producer: import.stack.clone(),
                        })
                    }
                };
                if producer.output(&import.output).is_none() {
                    return Err(SynthError::UnknownOutput {
                        stack: consumer.name().to_string(),
                        producer: producer.name().to_string(),
                        output: import.output.clone(),
                    });
                }
                if !self.has_edge(consumer.name(), producer.name()) {
                    return Err(SynthError::MissingDependencyEdge {
                        consumer: consumer.name().to_string(),
                        producer: producer.name().to_string(),
                    });
                }
                if producer.region() != consumer.region() && !self.cross_region_references {
                    return Err(SynthError::CrossRegionDisabled {
                        consumer: consumer.name().to_string(),
                        consumer_region: consumer.region().to_string(),
                        producer: producer.name().to_string(),
                        producer_region: producer.region().to_string(),
                    });
                }
            }
        }
        Ok(())
    }

    /// Kahn's algorithm, stable over declaration order so that synthesis is
    /// deterministic for identical inputs.
    fn topological_order(&self) -> Result<Vec<usize>> {
        let n = self.stacks.len();
        let mut pending: Vec<usize> = (0..n)
            .map(|i| {
                self.edges
                    .iter()
                    .filter(|(dependent, _)| dependent == self.stacks[i].name())
                    .count()
            })
            .collect();
        let mut ordered = Vec::with_capacity(n);
        let mut placed = vec![false; n];

        while ordered.len() < n {
            let next = (0..n).find(|&i| !placed[i] && pending[i] == 0);
            let i = match next {
                Some(i) => i,
                None => {
                    let stuck = (0..n)
                        .find(|&i| !placed[i])
                        .map(|i| self.stacks[i].name().to_string())
                        .unwrap_or_default();
                    return Err(SynthError::DependencyCycle(stuck));
                }
            };
            placed[i] = true;
            ordered.push(i);
            for (j, stack) in self.stacks.iter().enumerate() {
                if !placed[j]
                    && self.has_edge(stack.name(), self.stacks[i].name())
                    && pending[j] > 0
                {
                    pending[j] -= 1;
                }
            }
        }
        Ok(ordered)
    }
}
