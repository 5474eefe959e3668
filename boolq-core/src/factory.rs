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

//! The posting-list iterator factory.
//!
//! `create_search` walks a *normalized* query tree and produces a
//! `Box<dyn DocIterator>` tree, type-erasing the concrete conjunction,
//! disjunction and difference iterators behind a trait object so
//! `AND`/`OR`/`AND_NOT` combinators can hold heterogeneous children without
//! an enum of iterator kinds.

use boolq_common::{
    ColumnId, DocId, DocIterator, IndexReader, QueryError, QueryNodeKind, Result, Scorer,
    SessionPool, Table,
};

use crate::query_node::QueryNode;

/// Builds a document-iterator tree for `root`, registering every surviving
/// term leaf with `scorer` in left-to-right order. Returns `Ok(None)` when
/// the whole tree is *absent*: every leaf resolved to no postings anywhere
/// in the tree.
///
/// `root` must already be normalized; `create_search` never calls
/// `normalize` itself. A `NOT` (or the `INVALID` sentinel) surviving to
/// this point means the normalizer produced a non-canonical root, which
/// is a programming error, not a data problem — `QueryError::InvalidNormalization`.
pub fn create_search(
    root: &QueryNode,
    table: &dyn Table,
    index_reader: &dyn IndexReader,
    session_pool: &dyn SessionPool,
    scorer: &mut dyn Scorer,
) -> Result<Option<Box<dyn DocIterator>>> {
    build(root, table, index_reader, session_pool, scorer)
}

fn build(
    node: &QueryNode,
    table: &dyn Table,
    index_reader: &dyn IndexReader,
    session_pool: &dyn SessionPool,
    scorer: &mut dyn Scorer,
) -> Result<Option<Box<dyn DocIterator>>> {
    match node.kind() {
        QueryNodeKind::Term => Ok(build_term(node, table, index_reader, session_pool, scorer)),
        kind if kind.is_opaque_leaf() => {
            log::warn!(
                "factory: {kind} has no iterator factory; treating as absent"
            );
            Ok(None)
        }
        QueryNodeKind::And => build_and(node.children(), table, index_reader, session_pool, scorer),
        QueryNodeKind::Or => build_or(node.children(), table, index_reader, session_pool, scorer),
        QueryNodeKind::AndNot => build_and_not(node.children(), table, index_reader, session_pool, scorer),
        QueryNodeKind::Not => Err(QueryError::InvalidNormalization(
            "NOT reached the iterator factory; normalize() should have absorbed it into an AND_NOT or rejected the tree".to_string(),
        )),
        QueryNodeKind::Invalid => Err(QueryError::InvalidNormalization(
            "INVALID sentinel reached the iterator factory".to_string(),
        )),
    }
}

fn build_term(
    node: &QueryNode,
    table: &dyn Table,
    index_reader: &dyn IndexReader,
    session_pool: &dyn SessionPool,
    scorer: &mut dyn Scorer,
) -> Option<Box<dyn DocIterator>> {
    let (column, term) = node.leaf_payload().expect("QueryNodeKind::Term always carries a leaf payload");
    let column_id = table.column_id_by_name(column);
    let column_reader = index_reader.column_index_reader(column_id)?;
    let posting = column_reader.lookup(term, session_pool)?;
    let iter: Box<dyn DocIterator> = Box::new(TermDocIterator { inner: posting });
    scorer.add_doc_iterator(iter.as_ref(), column_id);
    Some(iter)
}

fn build_children(
    children: &[QueryNode],
    table: &dyn Table,
    index_reader: &dyn IndexReader,
    session_pool: &dyn SessionPool,
    scorer: &mut dyn Scorer,
) -> Result<Vec<Box<dyn DocIterator>>> {
    let mut built = Vec::with_capacity(children.len());
    for child in children {
        if let Some(iter) = build(child, table, index_reader, session_pool, scorer)? {
            built.push(iter);
        }
    }
    Ok(built)
}

fn build_and(
    children: &[QueryNode],
    table: &dyn Table,
    index_reader: &dyn IndexReader,
    session_pool: &dyn SessionPool,
    scorer: &mut dyn Scorer,
) -> Result<Option<Box<dyn DocIterator>>> {
    let mut built = build_children(children, table, index_reader, session_pool, scorer)?;
    match built.len() {
        0 => {
            log::debug!("factory: AND has no surviving children; absent");
            Ok(None)
        }
        1 => Ok(built.pop()),
        _ => Ok(Some(Box::new(AndIterator::new(built)) as Box<dyn DocIterator>)),
    }
}

fn build_or(
    children: &[QueryNode],
    table: &dyn Table,
    index_reader: &dyn IndexReader,
    session_pool: &dyn SessionPool,
    scorer: &mut dyn Scorer,
) -> Result<Option<Box<dyn DocIterator>>> {
    let mut built = build_children(children, table, index_reader, session_pool, scorer)?;
    match built.len() {
        0 => {
            log::debug!("factory: OR has no surviving children; absent");
            Ok(None)
        }
        1 => Ok(built.pop()),
        _ => Ok(Some(Box::new(OrIterator::new(built)) as Box<dyn DocIterator>)),
    }
}

fn build_and_not(
    children: &[QueryNode],
    table: &dyn Table,
    index_reader: &dyn IndexReader,
    session_pool: &dyn SessionPool,
    scorer: &mut dyn Scorer,
) -> Result<Option<Box<dyn DocIterator>>> {
    let (positive, subtrahends) = children
        .split_first()
        .ok_or_else(|| QueryError::malformed_tree(QueryNodeKind::AndNot, "AND_NOT has no children"))?;

    let positive_iter = match build(positive, table, index_reader, session_pool, scorer)? {
        Some(iter) => iter,
        None => {
            log::debug!("factory: AND_NOT positive side is absent; nothing to subtract from");
            return Ok(None);
        }
    };

    let subtrahend_iters = build_children(subtrahends, table, index_reader, session_pool, scorer)?;
    if subtrahend_iters.is_empty() {
        Ok(Some(positive_iter))
    } else {
        Ok(Some(Box::new(AndNotIterator::new(positive_iter, subtrahend_iters)) as Box<dyn DocIterator>))
    }
}

/// Wraps a single term's posting list as a `DocIterator`. Relevance scoring
/// is the scorer's business; this always reports `0.0` since the BM25/TF-IDF
/// math happens outside this crate.
struct TermDocIterator {
    inner: Box<dyn boolq_common::PostingIterator>,
}

impl DocIterator for TermDocIterator {
    fn next(&mut self) -> Option<DocId> {
        self.inner.next()
    }

    fn advance_to(&mut self, target: DocId) -> Option<DocId> {
        self.inner.advance_to(target)
    }

    fn doc_id(&self) -> Option<DocId> {
        self.inner.doc_id()
    }

    fn score(&self) -> f64 {
        0.0
    }
}

/// Conjunction: a leapfrog join that advances every child to the largest
/// candidate seen so far until all agree, or one is exhausted.
struct AndIterator {
    children: Vec<Box<dyn DocIterator>>,
    current: Option<DocId>,
}

impl AndIterator {
    fn new(children: Vec<Box<dyn DocIterator>>) -> Self {
        debug_assert!(children.len() >= 2, "AndIterator needs at least 2 children");
        AndIterator { children, current: None }
    }

    /// Advances every child to the first document id `>= candidate` on
    /// which they all agree, restarting from the front whenever a child
    /// jumps past the current candidate.
    fn converge(&mut self, mut candidate: DocId) -> Option<DocId> {
        'outer: loop {
            for child in self.children.iter_mut() {
                match child.advance_to(candidate) {
                    Some(doc) if doc == candidate => continue,
                    Some(doc) => {
                        candidate = doc;
                        continue 'outer;
                    }
                    None => return None,
                }
            }
            return Some(candidate);
        }
    }
}

impl DocIterator for AndIterator {
    fn next(&mut self) -> Option<DocId> {
        let start = self.children[0].next()?;
        self.current = self.converge(start);
        self.current
    }

    fn advance_to(&mut self, target: DocId) -> Option<DocId> {
        self.current = self.converge(target);
        self.current
    }

    fn doc_id(&self) -> Option<DocId> {
        self.current
    }

    fn score(&self) -> f64 {
        self.children.iter().map(|c| c.score()).sum()
    }
}

/// Disjunction: a merge over child cursors, emitting the minimum doc id
/// seen across all children and advancing every child parked on it.
struct OrIterator {
    children: Vec<Box<dyn DocIterator>>,
    cursors: Vec<Option<DocId>>,
    current: Option<DocId>,
    started: bool,
}

impl OrIterator {
    fn new(children: Vec<Box<dyn DocIterator>>) -> Self {
        debug_assert!(children.len() >= 2, "OrIterator needs at least 2 children");
        let len = children.len();
        OrIterator {
            children,
            cursors: vec![None; len],
            current: None,
            started: false,
        }
    }

    fn ensure_started(&mut self) {
        if !self.started {
            for (child, cursor) in self.children.iter_mut().zip(self.cursors.iter_mut()) {
                *cursor = child.next();
            }
            self.started = true;
        }
    }

    fn emit_min(&mut self) -> Option<DocId> {
        let min = self.cursors.iter().flatten().min().copied()?;
        for (child, cursor) in self.children.iter_mut().zip(self.cursors.iter_mut()) {
            if *cursor == Some(min) {
                *cursor = child.next();
            }
        }
        self.current = Some(min);
        Some(min)
    }
}

impl DocIterator for OrIterator {
    fn next(&mut self) -> Option<DocId> {
        self.ensure_started();
        self.emit_min()
    }

    fn advance_to(&mut self, target: DocId) -> Option<DocId> {
        self.ensure_started();
        for (child, cursor) in self.children.iter_mut().zip(self.cursors.iter_mut()) {
            if matches!(*cursor, Some(doc) if doc < target) {
                *cursor = child.advance_to(target);
            }
        }
        self.emit_min()
    }

    fn doc_id(&self) -> Option<DocId> {
        self.current
    }

    fn score(&self) -> f64 {
        self.children.iter().map(|c| c.score()).sum()
    }
}

/// Difference: yields every document the positive iterator matches that no
/// subtrahend also matches.
struct AndNotIterator {
    positive: Box<dyn DocIterator>,
    subtrahends: Vec<Box<dyn DocIterator>>,
    current: Option<DocId>,
}

impl AndNotIterator {
    fn new(positive: Box<dyn DocIterator>, subtrahends: Vec<Box<dyn DocIterator>>) -> Self {
        debug_assert!(!subtrahends.is_empty(), "AndNotIterator needs at least one subtrahend");
        AndNotIterator {
            positive,
            subtrahends,
            current: None,
        }
    }

    fn excluded(&mut self, candidate: DocId) -> bool {
        self.subtrahends
            .iter_mut()
            .any(|s| s.advance_to(candidate) == Some(candidate))
    }
}

impl DocIterator for AndNotIterator {
    fn next(&mut self) -> Option<DocId> {
        let mut candidate = self.positive.next()?;
        while self.excluded(candidate) {
            candidate = self.positive.next()?;
        }
        self.current = Some(candidate);
        self.current
    }

    fn advance_to(&mut self, target: DocId) -> Option<DocId> {
        let mut candidate = self.positive.advance_to(target)?;
        while self.excluded(candidate) {
            candidate = self.positive.next()?;
        }
        self.current = Some(candidate);
        self.current
    }

    fn doc_id(&self) -> Option<DocId> {
        self.current
    }

    fn score(&self) -> f64 {
        self.positive.score()
    }
}
