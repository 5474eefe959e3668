// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing,
// software distributed under the License is distributed on an
// "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND,
// either express or implied. See the License for the specific
// language governing permissions and limitations under the License.

//! Planner configuration.

/// Tunables for [`crate::normalize::normalize_with_config`].
///
/// There is deliberately little here: the normalizer and iterator factory
/// are pure functions of their input tree plus the external contracts in
/// `boolq-common`, so most of what would normally live in a planner config
/// (timeouts, cancellation, concurrency) does not apply.
#[derive(Debug, Clone, PartialEq)]
pub struct PlannerConfig {
    /// Recursion guard: the normalizer rejects any input tree deeper than
    /// this with [`boolq_common::QueryError::TreeTooDeep`]. The parser that
    /// produces the input tree is an external, potentially untrusted
    /// collaborator, so this bound exists as a defensive measure against a
    /// pathologically deep input tree.
    pub max_tree_depth: usize,
    /// Tolerance used by [`crate::query_node::QueryNode::weight_eq`] when
    /// tests compare a fabricated node's weight against a documented
    /// default, allowing structural rather than bit-exact comparison of
    /// `f64` weights.
    pub weight_epsilon: f64,
}

/// A generous but finite default depth bound rather than an unbounded
/// recursion.
pub const DEFAULT_MAX_TREE_DEPTH: usize = 256;

/// Default weight-comparison tolerance; weights here are either the fixed
/// constant `1.0` or caller-supplied, so this only needs to absorb ordinary
/// floating-point rounding, not accumulated error.
pub const DEFAULT_WEIGHT_EPSILON: f64 = 1e-9;

impl Default for PlannerConfig {
    fn default() -> Self {
        PlannerConfig {
            max_tree_depth: DEFAULT_MAX_TREE_DEPTH,
            weight_epsilon: DEFAULT_WEIGHT_EPSILON,
        }
    }
}
