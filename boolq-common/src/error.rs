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

//! Error type shared by the normalizer and the iterator factory.

use std::fmt;

use crate::query_kind::QueryNodeKind;

/// Result alias used throughout `boolq-common` and `boolq-core`.
pub type Result<T> = std::result::Result<T, QueryError>;

/// Errors raised while normalizing or executing a boolean query tree.
///
/// All variants are fatal for the query they arose from: there is no
/// partial tree to fall back to, and retrying is never meaningful because
/// normalization and planning are pure functions of their input tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryError {
    /// A composite node did not meet its minimum arity, or an `AND_NOT`
    /// node appeared in the input where the normalizer never expects one.
    MalformedTree(String),
    /// An `OR` rewrite produced both positive and negated branches, which
    /// has no efficient representation in the `AND_NOT` algebra.
    UnsupportedDisjunction(String),
    /// A child of a recognized kind appeared somewhere the canonical-form
    /// table forbids it.
    UnexpectedKind(String),
    /// A `NOT` node survived normalization and reached the iterator
    /// factory. This indicates a bug in the normalizer, not bad input.
    InvalidNormalization(String),
    /// The input tree exceeded the configured maximum depth before the
    /// normalizer could finish walking it.
    TreeTooDeep { max_depth: usize },
}

impl QueryError {
    pub fn malformed_tree(kind: QueryNodeKind, detail: impl Into<String>) -> Self {
        QueryError::MalformedTree(format!("{kind:?}: {}", detail.into()))
    }

    pub fn unexpected_kind(parent: QueryNodeKind, child: QueryNodeKind) -> Self {
        QueryError::UnexpectedKind(format!(
            "{child:?} is not a permitted child of {parent:?}"
        ))
    }
}

impl fmt::Display for QueryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QueryError::MalformedTree(msg) => write!(f, "malformed query tree: {msg}"),
            QueryError::UnsupportedDisjunction(msg) => {
                write!(f, "unsupported disjunction: {msg}")
            }
            QueryError::UnexpectedKind(msg) => write!(f, "unexpected node kind: {msg}"),
            QueryError::InvalidNormalization(msg) => {
                write!(f, "invalid normalization (this is a bug): {msg}")
            }
            QueryError::TreeTooDeep { max_depth } => {
                write!(f, "query tree exceeds maximum depth of {max_depth}")
            }
        }
    }
}

impl std::error::Error for QueryError {}
