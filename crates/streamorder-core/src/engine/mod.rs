//! # Order Engines
//!
//! Three substitutable stream order engines over the same network model:
//!
//! | Engine | Rule | Traversal |
//! |--------|------|-----------|
//! | [`Strahler`] | max, +1 on a tie at the max | recursive |
//! | [`Shreve`] | additive magnitude | recursive |
//! | [`ShreveIterative`] | additive magnitude | explicit stack + memo |
//!
//! Every engine is rooted at a sink arc and the sink's upstream node, walks
//! upstream through the [`AdjacencyIndex`], writes each reached arc's order
//! into the [`Network`] and returns the sink's order.

mod shreve;
mod shreve_iterative;
mod strahler;

pub use shreve::Shreve;
pub use shreve_iterative::{IterativeOutcome, ShreveIterative, TraversalStats};
pub use strahler::Strahler;

use crate::primitives::MAX_RECURSION_DEPTH;
use crate::{AdjacencyIndex, ArcId, Network, NodeId, StreamOrder, StreamOrderError};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

// =============================================================================
// ORDER ENGINE TRAIT
// =============================================================================

/// Common contract of all order engines.
///
/// Engines share no runtime state; one value can be reused across any
/// number of traversals.
pub trait OrderEngine {
    /// Short engine name used in reports and logs.
    fn name(&self) -> &'static str;

    /// Compute the order of `sink` and of every arc upstream of it.
    ///
    /// `at_node` must be the upstream end of `sink`. Preconditions are
    /// checked before any order is written.
    fn compute(
        &self,
        network: &mut Network,
        adjacency: &AdjacencyIndex,
        sink: ArcId,
        at_node: NodeId,
    ) -> Result<StreamOrder, StreamOrderError>;
}

// =============================================================================
// SETTINGS
// =============================================================================

/// How upstream Shreve magnitudes merge at a confluence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ConfluenceRule {
    /// Sum of the two largest upstream magnitudes. Exact for strictly
    /// bifurcating networks.
    #[default]
    TopTwo,
    /// Sum of every upstream magnitude (canonical Shreve). Opt-in only.
    #[serde(alias = "all")]
    AllTributaries,
}

impl FromStr for ConfluenceRule {
    type Err = StreamOrderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "top-two" => Ok(Self::TopTwo),
            "all" | "all-tributaries" => Ok(Self::AllTributaries),
            other => Err(StreamOrderError::InvalidTopology(format!(
                "unknown confluence rule: {}",
                other
            ))),
        }
    }
}

impl std::fmt::Display for ConfluenceRule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::TopTwo => write!(f, "top-two"),
            Self::AllTributaries => write!(f, "all-tributaries"),
        }
    }
}

/// Tunables shared by the engines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineSettings {
    /// Recursion bound for [`Strahler`] and [`Shreve`].
    pub max_recursion_depth: usize,
    /// Combine rule for the Shreve engines.
    pub confluence_rule: ConfluenceRule,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            max_recursion_depth: MAX_RECURSION_DEPTH,
            confluence_rule: ConfluenceRule::default(),
        }
    }
}

// =============================================================================
// ENGINE SELECTION
// =============================================================================

/// Engine selector for configuration and the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EngineKind {
    Strahler,
    Shreve,
    #[default]
    ShreveIterative,
}

impl EngineKind {
    /// Instantiate the selected engine.
    #[must_use]
    pub fn build(self, settings: &EngineSettings) -> Box<dyn OrderEngine> {
        match self {
            Self::Strahler => Box::new(Strahler::new(settings.max_recursion_depth)),
            Self::Shreve => Box::new(Shreve::new(
                settings.max_recursion_depth,
                settings.confluence_rule,
            )),
            Self::ShreveIterative => Box::new(ShreveIterative::new(settings.confluence_rule)),
        }
    }

    /// Stable name, identical to the `FromStr` spelling.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Strahler => "strahler",
            Self::Shreve => "shreve",
            Self::ShreveIterative => "shreve-iterative",
        }
    }
}

impl FromStr for EngineKind {
    type Err = StreamOrderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "strahler" => Ok(Self::Strahler),
            "shreve" => Ok(Self::Shreve),
            "shreve-iterative" | "iterative" => Ok(Self::ShreveIterative),
            other => Err(StreamOrderError::InvalidTopology(format!(
                "unknown engine: {}",
                other
            ))),
        }
    }
}

impl std::fmt::Display for EngineKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// COMBINE RULES
// =============================================================================

/// Strahler rule over the orders of all tributaries at a confluence.
///
/// Let `m` be the maximum and `c` the number of tributaries reaching it:
/// the merged order is `m + 1` when `c > 1`, otherwise `m`. No tributaries
/// means a headwater.
#[must_use]
pub fn strahler_combine(upstream: &[StreamOrder]) -> StreamOrder {
    let mut max_order = None;
    let mut max_count = 0usize;

    for &order in upstream {
        match max_order {
            Some(current) if order < current => {}
            Some(current) if order == current => max_count = max_count.saturating_add(1),
            _ => {
                max_order = Some(order);
                max_count = 1;
            }
        }
    }

    match max_order {
        None => StreamOrder::HEADWATER,
        Some(max) if max_count > 1 => max.promote(),
        Some(max) => max,
    }
}

/// Shreve rule over the magnitudes of all tributaries at a confluence.
#[must_use]
pub fn shreve_combine(upstream: &[StreamOrder], rule: ConfluenceRule) -> StreamOrder {
    if upstream.is_empty() {
        return StreamOrder::HEADWATER;
    }

    match rule {
        ConfluenceRule::AllTributaries => upstream
            .iter()
            .fold(StreamOrder::new(0), |acc, &o| acc.saturating_add(o)),
        ConfluenceRule::TopTwo => {
            let mut sorted = upstream.to_vec();
            sorted.sort_unstable_by(|a, b| b.cmp(a));
            match sorted.as_slice() {
                [first, second, ..] => first.saturating_add(*second),
                [only] => *only,
                [] => StreamOrder::HEADWATER,
            }
        }
    }
}

// =============================================================================
// CONTRACT FUNCTIONS
// =============================================================================

/// Strahler order of `arc` with default settings.
pub fn strahler_order(
    arc: ArcId,
    at_node: NodeId,
    network: &mut Network,
    adjacency: &AdjacencyIndex,
) -> Result<StreamOrder, StreamOrderError> {
    Strahler::default().compute(network, adjacency, arc, at_node)
}

/// Shreve magnitude of `arc` using the recursive engine with default settings.
pub fn shreve_order(
    arc: ArcId,
    at_node: NodeId,
    network: &mut Network,
    adjacency: &AdjacencyIndex,
) -> Result<StreamOrder, StreamOrderError> {
    Shreve::default().compute(network, adjacency, arc, at_node)
}

/// Shreve magnitude of `sink` using the iterative engine with default settings.
pub fn shreve_order_iterative(
    sink: ArcId,
    at_node: NodeId,
    network: &mut Network,
    adjacency: &AdjacencyIndex,
) -> Result<StreamOrder, StreamOrderError> {
    ShreveIterative::default().compute(network, adjacency, sink, at_node)
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn orders(values: &[u64]) -> Vec<StreamOrder> {
        values.iter().map(|&v| StreamOrder::new(v)).collect()
    }

    #[test]
    fn strahler_tie_at_max_promotes() {
        assert_eq!(strahler_combine(&orders(&[2, 2, 1])), StreamOrder::new(3));
        assert_eq!(strahler_combine(&orders(&[1, 1])), StreamOrder::new(2));
    }

    #[test]
    fn strahler_single_max_keeps_rank() {
        assert_eq!(strahler_combine(&orders(&[2, 1])), StreamOrder::new(2));
        assert_eq!(strahler_combine(&orders(&[1, 1, 2])), StreamOrder::new(2));
        assert_eq!(strahler_combine(&orders(&[3])), StreamOrder::new(3));
    }

    #[test]
    fn strahler_empty_is_headwater() {
        assert_eq!(strahler_combine(&[]), StreamOrder::HEADWATER);
    }

    #[test]
    fn shreve_binary_merge_sums() {
        assert_eq!(
            shreve_combine(&orders(&[3, 5]), ConfluenceRule::TopTwo),
            StreamOrder::new(8)
        );
    }

    #[test]
    fn shreve_top_two_ignores_smaller_tributaries() {
        assert_eq!(
            shreve_combine(&orders(&[1, 4, 2, 4]), ConfluenceRule::TopTwo),
            StreamOrder::new(8)
        );
        assert_eq!(
            shreve_combine(&orders(&[2, 1, 3]), ConfluenceRule::TopTwo),
            StreamOrder::new(5)
        );
    }

    #[test]
    fn shreve_all_tributaries_sums_everything() {
        assert_eq!(
            shreve_combine(&orders(&[1, 4, 2]), ConfluenceRule::AllTributaries),
            StreamOrder::new(7)
        );
    }

    #[test]
    fn shreve_single_tributary_passes_through() {
        for rule in [ConfluenceRule::TopTwo, ConfluenceRule::AllTributaries] {
            assert_eq!(shreve_combine(&orders(&[6]), rule), StreamOrder::new(6));
            assert_eq!(shreve_combine(&[], rule), StreamOrder::HEADWATER);
        }
    }

    #[test]
    fn engine_kind_parses_and_displays() {
        for kind in [
            EngineKind::Strahler,
            EngineKind::Shreve,
            EngineKind::ShreveIterative,
        ] {
            assert_eq!(kind.as_str().parse::<EngineKind>(), Ok(kind));
            assert_eq!(kind.build(&EngineSettings::default()).name(), kind.as_str());
        }
        assert!("horton".parse::<EngineKind>().is_err());
    }

    #[test]
    fn confluence_rule_parses() {
        assert_eq!("top-two".parse::<ConfluenceRule>(), Ok(ConfluenceRule::TopTwo));
        assert_eq!("all".parse::<ConfluenceRule>(), Ok(ConfluenceRule::AllTributaries));
        assert!("max".parse::<ConfluenceRule>().is_err());
    }
}
