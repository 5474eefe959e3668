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

//! In-memory mock implementations of the external contracts, shared by the
//! integration tests in this directory. Not a test module itself — pulled
//! in with `mod support;`.

use std::cell::RefCell;
use std::collections::HashMap;

use boolq_core::{ColumnId, ColumnIndexReader, DocId, DocIterator, IndexReader, PostingIterator, Scorer, SessionPool, Table};

pub struct MockPostingIterator {
    docs: Vec<u64>,
    pos: usize,
}

impl MockPostingIterator {
    fn new(docs: Vec<u64>) -> Self {
        MockPostingIterator { docs, pos: 0 }
    }
}

impl MockPostingIterator {
    fn current(&self) -> Option<DocId> {
        if self.pos == 0 {
            None
        } else {
            self.docs.get(self.pos - 1).copied().map(DocId)
        }
    }
}

impl PostingIterator for MockPostingIterator {
    fn next(&mut self) -> Option<DocId> {
        let doc = self.docs.get(self.pos).copied()?;
        self.pos += 1;
        Some(DocId(doc))
    }

    fn advance_to(&mut self, target: DocId) -> Option<DocId> {
        // See the identical note on `VecPostingIterator` in
        // `src/factory.rs`'s unit tests: a target at or behind the current
        // position must be a no-op, not a re-scan.
        if let Some(current) = self.current() {
            if current >= target {
                return Some(current);
            }
        }
        while let Some(&doc) = self.docs.get(self.pos) {
            self.pos += 1;
            if doc >= target.0 {
                return Some(DocId(doc));
            }
        }
        None
    }

    fn doc_id(&self) -> Option<DocId> {
        self.current()
    }
}

pub struct MockSessionPool;

impl SessionPool for MockSessionPool {}

#[derive(Clone)]
pub struct MockColumnIndex {
    postings: HashMap<String, Vec<u64>>,
}

impl ColumnIndexReader for MockColumnIndex {
    fn lookup(&self, term: &str, _session_pool: &dyn SessionPool) -> Option<Box<dyn PostingIterator>> {
        self.postings
            .get(term)
            .map(|docs| Box::new(MockPostingIterator::new(docs.clone())) as Box<dyn PostingIterator>)
    }
}

pub struct MockIndexReader {
    columns: HashMap<u32, MockColumnIndex>,
}

impl IndexReader for MockIndexReader {
    fn column_index_reader(&self, id: ColumnId) -> Option<Box<dyn ColumnIndexReader>> {
        self.columns.get(&id.0).map(|c| Box::new(c.clone()) as Box<dyn ColumnIndexReader>)
    }
}

pub struct MockTable {
    columns: HashMap<String, u32>,
}

impl Table for MockTable {
    fn column_id_by_name(&self, name: &str) -> ColumnId {
        ColumnId(*self.columns.get(name).unwrap_or_else(|| panic!("no such column in fixture: {name}")))
    }
}

/// Records every `(column, registration index)` passed to
/// `add_doc_iterator`, in call order, so tests can assert on scorer
/// registration ordering.
#[derive(Default)]
pub struct RecordingScorer {
    pub registrations: RefCell<Vec<ColumnId>>,
}

impl Scorer for RecordingScorer {
    fn add_doc_iterator(&mut self, _iter: &dyn DocIterator, column: ColumnId) {
        self.registrations.borrow_mut().push(column);
    }
}

/// Builds a small fixed corpus: a `body` column with terms `a`..`e` over
/// documents `1`..`6`.
pub fn fixture() -> (MockTable, MockIndexReader, MockSessionPool) {
    let mut columns = HashMap::new();
    columns.insert("body".to_string(), 1u32);

    let mut postings = HashMap::new();
    postings.insert("a".to_string(), vec![1, 2, 3, 4, 5, 6]);
    postings.insert("b".to_string(), vec![2, 4, 6]);
    postings.insert("c".to_string(), vec![3, 6]);
    postings.insert("d".to_string(), vec![1, 6]);
    postings.insert("e".to_string(), vec![5]);

    let mut index_columns = HashMap::new();
    index_columns.insert(1u32, MockColumnIndex { postings });

    (
        MockTable { columns },
        MockIndexReader { columns: index_columns },
        MockSessionPool,
    )
}

pub fn drain(mut iter: Box<dyn DocIterator>) -> Vec<u64> {
    let mut out = Vec::new();
    while let Some(doc) = iter.next() {
        out.push(doc.0);
    }
    out
}
