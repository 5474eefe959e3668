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

//! The closed set of query node kinds.
//!
//! This lives in `boolq-common` (rather than alongside the owning
//! `QueryNode` tree type in `boolq-core`) because the error type and the
//! diagnostic printer both need to name a kind without depending on the
//! heavier tree representation.

use std::fmt;

/// Discriminant for [`QueryNode`](../boolq_core/query_node/enum.QueryNode.html).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QueryNodeKind {
    Invalid,
    Term,
    And,
    Or,
    Not,
    AndNot,
    Phrase,
    PrefixTerm,
    SuffixTerm,
    SubstringTerm,
    Wand,
}

impl QueryNodeKind {
    /// `true` for the opaque leaf kinds the normalizer treats as atoms.
    pub fn is_opaque_leaf(self) -> bool {
        matches!(
            self,
            QueryNodeKind::Phrase
                | QueryNodeKind::PrefixTerm
                | QueryNodeKind::SuffixTerm
                | QueryNodeKind::SubstringTerm
                | QueryNodeKind::Wand
        )
    }

    /// The exact token used by [`print_tree`](../boolq_core/print_tree/index.html).
    pub fn token(self) -> &'static str {
        match self {
            QueryNodeKind::Invalid => "INVALID",
            QueryNodeKind::Term => "TERM",
            QueryNodeKind::And => "AND",
            QueryNodeKind::AndNot => "AND_NOT",
            QueryNodeKind::Or => "OR",
            QueryNodeKind::Not => "NOT",
            QueryNodeKind::Wand => "WAND",
            QueryNodeKind::Phrase => "PHRASE",
            QueryNodeKind::PrefixTerm => "PREFIX_TERM",
            QueryNodeKind::SuffixTerm => "SUFFIX_TERM",
            QueryNodeKind::SubstringTerm => "SUBSTRING_TERM",
        }
    }
}

impl fmt::Display for QueryNodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}
