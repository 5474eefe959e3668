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

//! External contracts consumed by the iterator factory.
//!
//! Everything in this module is a trait: the SQL/DSL parser, the on-disk
//! posting-list format, the column index reader and the scorer are owned
//! and implemented elsewhere in the larger system. `boolq-core` only calls
//! through these traits; it never constructs a concrete implementation of
//! any of them outside of tests.

use crate::ids::{ColumnId, DocId};

/// A session-scoped handle external to the core; `ColumnIndexReader::lookup`
/// borrows it for the lifetime of a single posting-list lookup. The core
/// never inspects or constructs one.
pub trait SessionPool {}

/// Read-only table catalog, queried once per `TERM` leaf to resolve a
/// column name to the [`ColumnId`] the index reader expects.
pub trait Table {
    fn column_id_by_name(&self, name: &str) -> ColumnId;
}

/// Per-table handle into the inverted index. Returns `None` when a column
/// has no index (the factory treats that as an absent term, not an error).
pub trait IndexReader {
    fn column_index_reader(&self, id: ColumnId) -> Option<Box<dyn ColumnIndexReader>>;
}

/// Per-column handle into the inverted index.
pub trait ColumnIndexReader {
    /// Looks up a single term's posting list. `None` means the term does
    /// not occur in this column.
    fn lookup(
        &self,
        term: &str,
        session_pool: &dyn SessionPool,
    ) -> Option<Box<dyn PostingIterator>>;
}

/// The sorted sequence of document ids for one term in one column.
pub trait PostingIterator {
    /// Advances to the next document id, or `None` at exhaustion.
    fn next(&mut self) -> Option<DocId>;
    /// Advances to the first document id `>= target`, or `None` if none
    /// remains.
    fn advance_to(&mut self, target: DocId) -> Option<DocId>;
    /// The current document id, or `None` before the first `next()` call
    /// or after exhaustion.
    fn doc_id(&self) -> Option<DocId>;
}

/// Capability set exposed by every node in the composed document-iterator
/// tree (term, conjunction, disjunction, difference).
pub trait DocIterator {
    fn next(&mut self) -> Option<DocId>;
    fn advance_to(&mut self, target: DocId) -> Option<DocId>;
    fn doc_id(&self) -> Option<DocId>;
    /// Relevance score for the current document. The core never computes
    /// this itself; it is the scorer's business, reached through term
    /// leaves registered via [`Scorer::add_doc_iterator`].
    fn score(&self) -> f64;
}

/// Accumulates per-term statistics used to score surviving documents.
/// The factory mutates this by registering every surviving term-leaf
/// iterator, left to right, as it builds the tree.
pub trait Scorer {
    fn add_doc_iterator(&mut self, iter: &dyn DocIterator, column: ColumnId);
}
