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

//! The diagnostic printer.
//!
//! Renders a query tree as Unicode box-drawing lines into any
//! `std::fmt::Write` sink, so callers can render into a `String`, or expose
//! it through a `Display` impl that forwards into a `Formatter`. Output is
//! byte-stable for a given tree: no hash-map iteration order, no addresses,
//! nothing time-dependent, which makes it usable as a golden-file test
//! oracle.

use std::fmt::{self, Write};

use itertools::{Itertools, Position};

use crate::query_node::QueryNode;

const MID_CONNECTOR: &str = "├── ";
const LAST_CONNECTOR: &str = "└── ";
const INDENT_CONTINUE: &str = "│   ";
const INDENT_DONE: &str = "    ";

/// Renders `root` into `sink`. See the module docs for the exact format.
pub fn print_tree(root: &QueryNode, sink: &mut dyn Write) -> fmt::Result {
    render(root, sink, "", "")
}

/// Renders `root` into a freshly allocated `String`. Convenience wrapper
/// over [`print_tree`] for callers (tests, logging) that don't already have
/// a sink on hand.
pub fn print_tree_to_string(root: &QueryNode) -> String {
    let mut out = String::new();
    print_tree(root, &mut out).expect("writing to a String never fails");
    out
}

fn render(node: &QueryNode, sink: &mut dyn Write, prefix: &str, connector: &str) -> fmt::Result {
    writeln!(sink, "{prefix}{connector}{}", describe(node))?;

    let child_prefix = if connector.is_empty() {
        String::new()
    } else if connector == LAST_CONNECTOR {
        format!("{prefix}{INDENT_DONE}")
    } else {
        format!("{prefix}{INDENT_CONTINUE}")
    };

    for (position, child) in node.children().iter().with_position() {
        let child_connector = match position {
            Position::Last | Position::Only => LAST_CONNECTOR,
            Position::First | Position::Middle => MID_CONNECTOR,
        };
        render(child, sink, &child_prefix, child_connector)?;
    }
    Ok(())
}

fn describe(node: &QueryNode) -> String {
    let kind = node.kind();
    let weight = node.weight().into_inner();
    match node.leaf_payload() {
        Some((column, term)) => format!("{kind} weight={weight} column={column} term={term}"),
        None => format!("{kind} weight={weight} children={}", node.children().len()),
    }
}
