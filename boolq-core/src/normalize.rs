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

//! The tree normalizer.
//!
//! A post-order, bottom-up, in-place rewriter: each node normalizes all of
//! its children first, then applies its own rewrite rule. The traversal
//! itself is the free function [`normalize`]; per-kind rewrite rules are
//! private helpers below it, one per composite kind, so a single public
//! entry point dispatches into small, kind-specific private functions
//! rather than a method per `QueryNode` variant.

use boolq_common::{QueryError, QueryNodeKind, Result};

use crate::config::PlannerConfig;
use crate::query_node::{QueryNode, DEFAULT_WEIGHT};

/// Normalizes `root` using the default [`PlannerConfig`].
pub fn normalize(root: QueryNode) -> Result<QueryNode> {
    normalize_with_config(root, &PlannerConfig::default())
}

/// Normalizes `root`, rejecting input deeper than
/// `config.max_tree_depth` with [`QueryError::TreeTooDeep`].
pub fn normalize_with_config(root: QueryNode, config: &PlannerConfig) -> Result<QueryNode> {
    normalize_node(root, 0, config)
}

fn normalize_node(node: QueryNode, depth: usize, config: &PlannerConfig) -> Result<QueryNode> {
    if depth > config.max_tree_depth {
        return Err(QueryError::TreeTooDeep {
            max_depth: config.max_tree_depth,
        });
    }

    match node {
        QueryNode::Term { .. } | QueryNode::Opaque { .. } => {
            log::trace!("normalize: {:?} leaf passes through unchanged", node.kind());
            Ok(node)
        }
        QueryNode::Invalid => Err(QueryError::malformed_tree(
            QueryNodeKind::Invalid,
            "INVALID is a sentinel and never valid normalizer input",
        )),
        QueryNode::Not { children, .. } => normalize_not(children, depth, config),
        QueryNode::And { children, .. } => normalize_and(children, depth, config),
        QueryNode::Or { children, .. } => normalize_or(children, depth, config),
        QueryNode::AndNot { .. } => Err(QueryError::malformed_tree(
            QueryNodeKind::AndNot,
            "AND_NOT must not appear in normalizer input; it is only ever produced by the rewrite",
        )),
    }
}

fn normalize_children(
    children: Vec<QueryNode>,
    depth: usize,
    config: &PlannerConfig,
) -> Result<Vec<QueryNode>> {
    children
        .into_iter()
        .map(|child| normalize_node(child, depth + 1, config))
        .collect()
}

/// Returns the sole element of a single-element list, else wraps the list
/// with `wrap`. Used by both AND and OR to avoid ever fabricating a
/// minimum-arity-violating composite.
fn collapse(mut list: Vec<QueryNode>, wrap: impl FnOnce(Vec<QueryNode>) -> QueryNode) -> QueryNode {
    if list.len() == 1 {
        list.pop().expect("checked len == 1")
    } else {
        wrap(list)
    }
}

fn normalize_not(children: Vec<QueryNode>, depth: usize, config: &PlannerConfig) -> Result<QueryNode> {
    if children.is_empty() {
        return Err(QueryError::malformed_tree(
            QueryNodeKind::Not,
            "NOT requires at least 1 child",
        ));
    }

    let normalized = normalize_children(children, depth, config)?;

    let mut new_children = Vec::with_capacity(normalized.len());
    for child in normalized {
        match child.kind() {
            QueryNodeKind::Term | QueryNodeKind::And | QueryNodeKind::AndNot => {
                new_children.push(child);
            }
            kind if kind.is_opaque_leaf() => new_children.push(child),
            QueryNodeKind::Or => {
                // De Morgan: splice the OR's children in as a flat list of
                // subtrahends, to be absorbed by whichever AND consumes
                // this NOT.
                new_children.extend(child.into_children());
            }
            other => return Err(QueryError::unexpected_kind(QueryNodeKind::Not, other)),
        }
    }

    log::debug!(
        "normalize: NOT rewrite produced {} child(ren)",
        new_children.len()
    );
    Ok(QueryNode::Not {
        weight: DEFAULT_WEIGHT,
        children: new_children,
    })
}

fn normalize_and(children: Vec<QueryNode>, depth: usize, config: &PlannerConfig) -> Result<QueryNode> {
    if children.len() < 2 {
        return Err(QueryError::malformed_tree(
            QueryNodeKind::And,
            "AND requires at least 2 children",
        ));
    }

    let normalized = normalize_children(children, depth, config)?;

    let mut and_list = Vec::new();
    let mut not_list = Vec::new();

    for child in normalized {
        match child.kind() {
            QueryNodeKind::And => and_list.extend(child.into_children()),
            QueryNodeKind::Term | QueryNodeKind::Or => and_list.push(child),
            kind if kind.is_opaque_leaf() => and_list.push(child),
            QueryNodeKind::Not => not_list.extend(child.into_children()),
            QueryNodeKind::AndNot => {
                let mut grandchildren = child.into_children();
                let positive = grandchildren.remove(0);
                if positive.kind() == QueryNodeKind::And {
                    and_list.extend(positive.into_children());
                } else {
                    and_list.push(positive);
                }
                not_list.extend(grandchildren);
            }
            other => return Err(QueryError::unexpected_kind(QueryNodeKind::And, other)),
        }
    }

    let result = match (and_list.is_empty(), not_list.is_empty()) {
        (false, true) => collapse(and_list, QueryNode::and),
        (false, false) => {
            let positive = collapse(and_list, QueryNode::and);
            log::debug!(
                "normalize: AND rewrite produced AND_NOT with {} subtrahend(s)",
                not_list.len()
            );
            QueryNode::and_not(positive, not_list)
        }
        (true, false) => {
            log::debug!("normalize: AND rewrite collapsed to a bare NOT (awaiting a parent AND)");
            QueryNode::not(not_list)
        }
        (true, true) => unreachable!("AND has >= 2 children; at least one list is non-empty"),
    };

    Ok(result)
}

fn normalize_or(children: Vec<QueryNode>, depth: usize, config: &PlannerConfig) -> Result<QueryNode> {
    if children.len() < 2 {
        return Err(QueryError::malformed_tree(
            QueryNodeKind::Or,
            "OR requires at least 2 children",
        ));
    }

    let normalized = normalize_children(children, depth, config)?;

    let mut or_list = Vec::new();
    let mut not_list = Vec::new();

    for child in normalized {
        match child.kind() {
            QueryNodeKind::Or => or_list.extend(child.into_children()),
            QueryNodeKind::Term | QueryNodeKind::And | QueryNodeKind::AndNot => or_list.push(child),
            kind if kind.is_opaque_leaf() => or_list.push(child),
            QueryNodeKind::Not => not_list.push(child),
            other => return Err(QueryError::unexpected_kind(QueryNodeKind::Or, other)),
        }
    }

    if !or_list.is_empty() && !not_list.is_empty() {
        return Err(QueryError::UnsupportedDisjunction(
            "OR cannot mix positive and negated branches; restate as AND_NOT".to_string(),
        ));
    }

    if !not_list.is_empty() {
        // De Morgan: OR(NOT(a), NOT(b), ...) -> NOT(AND(a', b', ...))
        // where each a' is the NOT's sole grandchild, or an OR of its
        // grandchildren if it has more than one.
        let subtrahends = not_list
            .into_iter()
            .map(|not_node| {
                let grandchildren = not_node.into_children();
                collapse(grandchildren, QueryNode::or)
            })
            .collect::<Vec<_>>();
        log::debug!(
            "normalize: OR rewrite applied De Morgan over {} negated branch(es)",
            subtrahends.len()
        );
        return Ok(QueryNode::not(vec![QueryNode::and(subtrahends)]));
    }

    Ok(collapse(or_list, QueryNode::or))
}

#[cfg(test)]
mod tests {
    use super::*;
    use boolq_common::QueryNodeKind as K;

    fn term(column: &str, name: &str) -> QueryNode {
        QueryNode::term(column, name)
    }

    fn assert_tree_eq(actual: &QueryNode, expected: &QueryNode) {
        assert_eq!(actual.kind(), expected.kind(), "kind mismatch");
        assert_eq!(actual.weight(), expected.weight(), "weight mismatch");
        assert_eq!(actual.leaf_payload(), expected.leaf_payload(), "leaf mismatch");
        let a = actual.children();
        let b = expected.children();
        assert_eq!(a.len(), b.len(), "child count mismatch for {:?}", actual.kind());
        for (ac, bc) in a.iter().zip(b.iter()) {
            assert_tree_eq(ac, bc);
        }
    }

    #[test]
    fn and_with_not_child_becomes_and_not() {
        let input = QueryNode::and(vec![term("c", "a"), QueryNode::not(vec![term("c", "b")])]);
        let expected = QueryNode::and_not(term("c", "a"), vec![term("c", "b")]);
        let got = normalize(input).unwrap();
        assert_eq!(got.kind(), K::AndNot);
        assert_tree_eq(&got, &expected);
    }

    #[test]
    fn nested_and_of_nots_merges_subtrahends_into_one_and_not() {
        let input = QueryNode::and(vec![
            term("c", "a"),
            QueryNode::and(vec![
                QueryNode::not(vec![term("c", "b")]),
                QueryNode::not(vec![term("c", "c")]),
            ]),
        ]);
        let expected = QueryNode::and_not(term("c", "a"), vec![term("c", "b"), term("c", "c")]);
        let got = normalize(input).unwrap();
        assert_tree_eq(&got, &expected);
    }

    #[test]
    fn or_of_nots_under_and_demorgans_to_and_subtrahend() {
        let input = QueryNode::and(vec![
            term("c", "a"),
            QueryNode::or(vec![
                QueryNode::not(vec![term("c", "b")]),
                QueryNode::not(vec![term("c", "c")]),
            ]),
        ]);
        let expected =
            QueryNode::and_not(term("c", "a"), vec![QueryNode::and(vec![term("c", "b"), term("c", "c")])]);
        let got = normalize(input).unwrap();
        assert_tree_eq(&got, &expected);
    }

    #[test]
    fn or_mixing_positive_and_negated_branches_is_rejected() {
        let input = QueryNode::or(vec![term("c", "a"), QueryNode::not(vec![term("c", "b")])]);
        let err = normalize(input).unwrap_err();
        assert!(matches!(err, QueryError::UnsupportedDisjunction(_)));
    }

    #[test]
    fn rejected_inner_or_propagates_through_parent_and() {
        let input = QueryNode::and(vec![
            term("c", "a"),
            QueryNode::or(vec![QueryNode::not(vec![term("c", "b")]), term("c", "c")]),
        ]);
        let err = normalize(input).unwrap_err();
        assert!(matches!(err, QueryError::UnsupportedDisjunction(_)));
    }

    #[test]
    fn nested_and_and_or_children_are_flattened() {
        let input = QueryNode::and(vec![
            QueryNode::and(vec![term("c", "a"), term("c", "b")]),
            QueryNode::or(vec![term("c", "c"), QueryNode::or(vec![term("c", "d"), term("c", "e")])]),
        ]);
        let expected = QueryNode::and(vec![
            term("c", "a"),
            term("c", "b"),
            QueryNode::or(vec![term("c", "c"), term("c", "d"), term("c", "e")]),
        ]);
        let got = normalize(input).unwrap();
        assert_tree_eq(&got, &expected);
    }

    #[test]
    fn or_of_two_nots_demorgans_to_not_of_and_at_root() {
        let input = QueryNode::or(vec![
            QueryNode::not(vec![term("c", "a")]),
            QueryNode::not(vec![QueryNode::or(vec![term("c", "b"), term("c", "c")])]),
        ]);
        let expected = QueryNode::not(vec![QueryNode::and(vec![
            term("c", "a"),
            QueryNode::or(vec![term("c", "b"), term("c", "c")]),
        ])]);
        let got = normalize(input).unwrap();
        assert_eq!(got.kind(), K::Not);
        assert_tree_eq(&got, &expected);
    }

    #[test]
    fn and_not_in_input_is_rejected() {
        let input = QueryNode::and_not(term("c", "a"), vec![term("c", "b")]);
        let err = normalize(input).unwrap_err();
        assert!(matches!(err, QueryError::MalformedTree(_)));
    }

    #[test]
    fn and_with_one_child_is_malformed() {
        let input = QueryNode::And {
            weight: DEFAULT_WEIGHT,
            children: vec![term("c", "a")],
        };
        let err = normalize(input).unwrap_err();
        assert!(matches!(err, QueryError::MalformedTree(_)));
    }

    #[test]
    fn not_with_zero_children_is_malformed() {
        let input = QueryNode::Not {
            weight: DEFAULT_WEIGHT,
            children: vec![],
        };
        let err = normalize(input).unwrap_err();
        assert!(matches!(err, QueryError::MalformedTree(_)));
    }

    #[test]
    fn opaque_leaves_pass_through_unchanged() {
        let wand = QueryNode::opaque(K::Wand, "body", "rust lang");
        let input = QueryNode::and(vec![term("c", "a"), wand.clone()]);
        let got = normalize(input).unwrap();
        assert_eq!(got.kind(), K::And);
        assert_eq!(got.children()[1], wand);
    }

    #[test]
    fn idempotent_on_already_canonical_tree() {
        let input = QueryNode::and(vec![
            term("c", "a"),
            term("c", "b"),
            QueryNode::or(vec![term("c", "c"), term("c", "d")]),
        ]);
        let once = normalize(input).unwrap();
        let twice = normalize(once.clone()).unwrap();
        assert_tree_eq(&once, &twice);
    }

    #[test]
    fn idempotent_on_and_not_and_demorgan_outputs() {
        for input in [
            QueryNode::and(vec![term("c", "a"), QueryNode::not(vec![term("c", "b")])]),
            QueryNode::and(vec![
                term("c", "a"),
                QueryNode::or(vec![
                    QueryNode::not(vec![term("c", "b")]),
                    QueryNode::not(vec![term("c", "c")]),
                ]),
            ]),
        ] {
            let once = normalize(input).unwrap();
            let twice = normalize(once.clone()).unwrap();
            assert_tree_eq(&once, &twice);
        }
    }

    #[test]
    fn depth_guard_rejects_pathological_trees() {
        let config = PlannerConfig {
            max_tree_depth: 4,
            ..PlannerConfig::default()
        };
        let mut node = term("c", "leaf");
        for _ in 0..10 {
            node = QueryNode::and(vec![node, term("c", "x")]);
        }
        let err = normalize_with_config(node, &config).unwrap_err();
        assert!(matches!(err, QueryError::TreeTooDeep { max_depth: 4 }));
    }
}
