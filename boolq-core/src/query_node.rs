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

//! The query node model.
//!
//! `QueryNode` is a sum type matched exhaustively rather than a family of
//! types behind a virtual `QueryNode` trait: the set of kinds is closed, so
//! a `match` gives the compiler the completeness check a `dyn` hierarchy
//! would need a runtime default arm for.

use ordered_float::OrderedFloat;

use boolq_common::QueryNodeKind;

/// Non-negative relevance weight. Wrapped in [`OrderedFloat`] so
/// `QueryNode` can derive `PartialEq`, which the normalizer's idempotency
/// tests need.
pub type Weight = OrderedFloat<f64>;

/// Weight assigned to every node fabricated by the normalizer, and to
/// freshly constructed leaves.
pub const DEFAULT_WEIGHT: Weight = OrderedFloat(1.0);

/// A `TERM` leaf's payload: the column it searches and the term itself.
/// Opaque leaves (`PHRASE`, `PREFIX_TERM`, ...) carry the same shape of
/// payload; they are treated as atoms by the normalizer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Leaf {
    pub column: String,
    pub term: String,
}

/// A boolean query tree node.
///
/// Composite variants own their children outright: normalizing a tree
/// consumes the root and returns a new owned root, reusing (moving) input
/// nodes where possible and fabricating fresh ones where the rewrite rules
/// require it.
#[derive(Debug, Clone, PartialEq)]
pub enum QueryNode {
    /// Sentinel kind. Never produced by the normalizer and never valid
    /// input; kept so `QueryNodeKind`'s closed set stays representable.
    Invalid,
    Term { weight: Weight, leaf: Leaf },
    /// An opaque leaf (`PHRASE`, `PREFIX_TERM`, `SUFFIX_TERM`,
    /// `SUBSTRING_TERM`, `WAND`). Treated as an atom by the normalizer;
    /// its own rewrite and iteration rules live outside this crate.
    Opaque {
        kind: QueryNodeKind,
        weight: Weight,
        leaf: Leaf,
    },
    And { weight: Weight, children: Vec<QueryNode> },
    Or { weight: Weight, children: Vec<QueryNode> },
    Not { weight: Weight, children: Vec<QueryNode> },
    /// First child is the positive branch; the rest are subtrahends.
    AndNot { weight: Weight, children: Vec<QueryNode> },
}

impl QueryNode {
    pub fn term(column: impl Into<String>, term: impl Into<String>) -> Self {
        QueryNode::Term {
            weight: DEFAULT_WEIGHT,
            leaf: Leaf {
                column: column.into(),
                term: term.into(),
            },
        }
    }

    pub fn term_weighted(column: impl Into<String>, term: impl Into<String>, weight: f64) -> Self {
        debug_assert!(weight >= 0.0, "QueryNode weight must be non-negative");
        QueryNode::Term {
            weight: OrderedFloat(weight),
            leaf: Leaf {
                column: column.into(),
                term: term.into(),
            },
        }
    }

    pub fn opaque(kind: QueryNodeKind, column: impl Into<String>, term: impl Into<String>) -> Self {
        debug_assert!(kind.is_opaque_leaf(), "{kind:?} is not an opaque leaf kind");
        QueryNode::Opaque {
            kind,
            weight: DEFAULT_WEIGHT,
            leaf: Leaf {
                column: column.into(),
                term: term.into(),
            },
        }
    }

    pub fn and(children: Vec<QueryNode>) -> Self {
        QueryNode::And {
            weight: DEFAULT_WEIGHT,
            children,
        }
    }

    pub fn or(children: Vec<QueryNode>) -> Self {
        QueryNode::Or {
            weight: DEFAULT_WEIGHT,
            children,
        }
    }

    pub fn not(children: Vec<QueryNode>) -> Self {
        QueryNode::Not {
            weight: DEFAULT_WEIGHT,
            children,
        }
    }

    /// Builds an `AND_NOT` node: `positive` is the first child, `subtrahends`
    /// the rest.
    pub fn and_not(positive: QueryNode, subtrahends: Vec<QueryNode>) -> Self {
        let mut children = Vec::with_capacity(1 + subtrahends.len());
        children.push(positive);
        children.extend(subtrahends);
        QueryNode::AndNot {
            weight: DEFAULT_WEIGHT,
            children,
        }
    }

    pub fn kind(&self) -> QueryNodeKind {
        match self {
            QueryNode::Invalid => QueryNodeKind::Invalid,
            QueryNode::Term { .. } => QueryNodeKind::Term,
            QueryNode::Opaque { kind, .. } => *kind,
            QueryNode::And { .. } => QueryNodeKind::And,
            QueryNode::Or { .. } => QueryNodeKind::Or,
            QueryNode::Not { .. } => QueryNodeKind::Not,
            QueryNode::AndNot { .. } => QueryNodeKind::AndNot,
        }
    }

    pub fn weight(&self) -> Weight {
        match self {
            QueryNode::Invalid => DEFAULT_WEIGHT,
            QueryNode::Term { weight, .. }
            | QueryNode::Opaque { weight, .. }
            | QueryNode::And { weight, .. }
            | QueryNode::Or { weight, .. }
            | QueryNode::Not { weight, .. }
            | QueryNode::AndNot { weight, .. } => *weight,
        }
    }

    /// Read-only access to children; empty for leaves and the sentinel.
    pub fn children(&self) -> &[QueryNode] {
        match self {
            QueryNode::And { children, .. }
            | QueryNode::Or { children, .. }
            | QueryNode::Not { children, .. }
            | QueryNode::AndNot { children, .. } => children,
            QueryNode::Invalid | QueryNode::Term { .. } | QueryNode::Opaque { .. } => &[],
        }
    }

    /// Consumes the node, returning its children by value. Empty for
    /// leaves and the sentinel.
    pub fn into_children(self) -> Vec<QueryNode> {
        match self {
            QueryNode::And { children, .. }
            | QueryNode::Or { children, .. }
            | QueryNode::Not { children, .. }
            | QueryNode::AndNot { children, .. } => children,
            QueryNode::Invalid | QueryNode::Term { .. } | QueryNode::Opaque { .. } => Vec::new(),
        }
    }

    /// `Some((column, term))` for `TERM` and opaque leaves, `None` for
    /// composites and the sentinel.
    pub fn leaf_payload(&self) -> Option<(&str, &str)> {
        match self {
            QueryNode::Term { leaf, .. } | QueryNode::Opaque { leaf, .. } => {
                Some((leaf.column.as_str(), leaf.term.as_str()))
            }
            _ => None,
        }
    }

    pub fn is_leaf(&self) -> bool {
        self.leaf_payload().is_some()
    }

    /// Weight equality within `epsilon`, for tests that compare a
    /// fabricated node's weight against an expected constant without
    /// relying on bit-exact `f64` equality.
    pub fn weight_eq(&self, other: &QueryNode, epsilon: f64) -> bool {
        (self.weight().into_inner() - other.weight().into_inner()).abs() <= epsilon
    }
}
