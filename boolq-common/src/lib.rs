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

//! Shared error type, identifiers and external contracts for `boolq-core`.
//!
//! Kept deliberately small and dependency-light: every other crate in this
//! workspace depends on this one, never the reverse.

pub mod contracts;
pub mod error;
pub mod ids;
pub mod query_kind;

pub use contracts::{ColumnIndexReader, DocIterator, IndexReader, PostingIterator, Scorer, SessionPool, Table};
pub use error::{QueryError, Result};
pub use ids::{ColumnId, DocId};
pub use query_kind::QueryNodeKind;
