//! # Shreve Engine (iterative)
//!
//! Post-order traversal driven by an explicit work stack, so network depth
//! is bounded by heap memory instead of the call stack.
//!
//! ## Protocol
//!
//! A work item `(arc, at_node)` is popped. If every tributary already has a
//! memoized order the arc is resolved on the spot. Otherwise the item is
//! pushed back and its unresolved tributaries are pushed on top of it, so
//! they are evaluated first and the retry finds them in the memo.
//!
//! An arc is written exactly once: resolution happens only when all its
//! dependencies are present, and resolved arcs popped again are skipped.
//! With a single sink on an acyclic network every pending tributary resolves
//! before any sibling expands, so nothing is ever scheduled twice and the
//! skip count stays zero.
//!
//! ## Cycle guard
//!
//! Items that were expanded and are waiting on tributaries form the current
//! upstream path. Meeting one of them again as a tributary means the
//! upstream structure loops, and the traversal fails with `CycleDetected`.

use super::{ConfluenceRule, OrderEngine, shreve_combine};
use crate::{AdjacencyIndex, ArcId, Network, NodeId, StreamOrder, StreamOrderError};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Counters collected during one iterative traversal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TraversalStats {
    /// Arcs whose order was computed. Equals the number of distinct arcs
    /// upstream of (and including) the sink.
    pub resolved: usize,
    /// Items pushed back because a tributary was still unresolved.
    pub requeued: usize,
    /// Popped items whose arc was already resolved. Zero unless an item
    /// was scheduled more than once before it resolved.
    pub skipped: usize,
    /// Largest stack length observed.
    pub max_stack_depth: usize,
}

/// Result of [`ShreveIterative::run`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IterativeOutcome {
    pub sink_order: StreamOrder,
    pub stats: TraversalStats,
}

/// Stack-driven, memoized Shreve engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ShreveIterative {
    rule: ConfluenceRule,
}

impl ShreveIterative {
    /// Create an engine with the given combine rule.
    #[must_use]
    pub const fn new(rule: ConfluenceRule) -> Self {
        Self { rule }
    }

    /// The combine rule in use.
    #[must_use]
    pub const fn rule(&self) -> ConfluenceRule {
        self.rule
    }

    /// Run the traversal and return the sink order with traversal counters.
    pub fn run(
        &self,
        network: &mut Network,
        adjacency: &AdjacencyIndex,
        sink: ArcId,
        at_node: NodeId,
    ) -> Result<IterativeOutcome, StreamOrderError> {
        adjacency.check_sink(network, sink, at_node)?;
        self.drive(network, adjacency, vec![(sink, at_node)], sink)
    }

    /// Drain a seeded work stack and report the order of `sink`.
    fn drive(
        &self,
        network: &mut Network,
        adjacency: &AdjacencyIndex,
        mut stack: Vec<(ArcId, NodeId)>,
        sink: ArcId,
    ) -> Result<IterativeOutcome, StreamOrderError> {
        let mut expanded: BTreeSet<(ArcId, NodeId)> = BTreeSet::new();
        let mut orders: BTreeMap<ArcId, StreamOrder> = BTreeMap::new();
        let mut stats = TraversalStats {
            max_stack_depth: stack.len(),
            ..TraversalStats::default()
        };

        while let Some((arc, node)) = stack.pop() {
            if orders.contains_key(&arc) {
                stats.skipped = stats.skipped.saturating_add(1);
                continue;
            }

            let tributaries = adjacency.tributaries(network, arc, node)?;
            let mut upstream = Vec::with_capacity(tributaries.len());
            let mut pending = Vec::new();

            for (tributary, next) in tributaries {
                match orders.get(&tributary) {
                    Some(&order) => upstream.push(order),
                    None if expanded.contains(&(tributary, next)) => {
                        return Err(StreamOrderError::CycleDetected(tributary));
                    }
                    None => pending.push((tributary, next)),
                }
            }

            let first_expansion = expanded.insert((arc, node));

            if pending.is_empty() {
                let order = shreve_combine(&upstream, self.rule);
                network.set_order(arc, order)?;
                orders.insert(arc, order);
                stats.resolved = stats.resolved.saturating_add(1);
                continue;
            }

            // Every tributary pushed by the first expansion resolves before
            // the retry is popped, unless the structure loops.
            if !first_expansion {
                return Err(StreamOrderError::CycleDetected(arc));
            }

            stack.push((arc, node));
            stats.requeued = stats.requeued.saturating_add(1);
            stack.extend(pending);
            stats.max_stack_depth = stats.max_stack_depth.max(stack.len());
        }

        let sink_order = orders
            .get(&sink)
            .copied()
            .ok_or(StreamOrderError::TraversalFailed(sink))?;

        Ok(IterativeOutcome { sink_order, stats })
    }
}

impl OrderEngine for ShreveIterative {
    fn name(&self) -> &'static str {
        "shreve-iterative"
    }

    fn compute(
        &self,
        network: &mut Network,
        adjacency: &AdjacencyIndex,
        sink: ArcId,
        at_node: NodeId,
    ) -> Result<StreamOrder, StreamOrderError> {
        self.run(network, adjacency, sink, at_node)
            .map(|outcome| outcome.sink_order)
    }
}

// =============================================================================
// TESTS
// =============================================================================
