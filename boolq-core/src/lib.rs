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

//! Boolean query tree normalizer and posting-list iterator factory for an
//! inverted-index full-text search subsystem.
//!
//! This crate owns three public entry points, split into separate modules
//! behind one crate root: rewriting, iterator construction and diagnostic
//! display.
//!
//! - [`normalize::normalize`] rewrites an arbitrary parser-produced
//!   [`query_node::QueryNode`] tree into canonical form.
//! - [`factory::create_search`] builds a `Box<dyn DocIterator>` tree from a
//!   normalized query, against the external contracts in `boolq-common`.
//! - [`print_tree::print_tree`] renders any tree (normalized or not) as a
//!   stable diagnostic string.
//!
//! Everything this crate consumes from outside its own tree model —
//! `Table`, `IndexReader`, `ColumnIndexReader`, `Scorer`, `DocIterator`, the
//! error type — lives in `boolq-common`, re-exported here for convenience.

pub mod config;
pub mod factory;
pub mod normalize;
pub mod print_tree;
pub mod query_node;

pub use boolq_common::{
    ColumnId, ColumnIndexReader, DocId, DocIterator, IndexReader, PostingIterator, QueryError,
    QueryNodeKind, Result, Scorer, SessionPool, Table,
};
pub use config::PlannerConfig;
pub use factory::create_search;
pub use normalize::{normalize, normalize_with_config};
pub use print_tree::{print_tree, print_tree_to_string};
pub use query_node::{Leaf, QueryNode, Weight};
