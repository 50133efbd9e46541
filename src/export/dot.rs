//! Graphviz DOT rendering
//!
//! A multigraph is drawn with one DOT node per node and one edge per relationship.
//! A community grouping adds one synthetic node per community, labelled
//! `Community <i>, Group <j>`, and a heavy edge from every member to it so layout engines
//! pull the members together.

use crate::graph::{DirectedMultigraph, GraphResult, Node};
use std::collections::BTreeSet;
use std::fmt::Write as _;
use std::path::Path;

/// Edge weight tying a member to its community node
pub const GROUP_WEIGHT: u32 = 100;

/// Communities of one partition, drawn as synthetic group nodes
#[derive(Debug, Clone, Copy)]
pub struct CommunityGrouping<'a> {
    /// Position of the partition in its profile
    pub index: usize,
    pub communities: &'a [Vec<Node>],
}

fn dot_escape(s: &str) -> String {
    s.replace('\\', "\\\\").replace('"', "\\\"")
}

fn node_label(node: &Node) -> String {
    let labels = node.label_string();
    if labels.is_empty() {
        node.id.as_i64().to_string()
    } else {
        labels
    }
}

/// Ids for synthetic group nodes: counting up from the largest id in use, wrapping past
/// `i64::MAX` and skipping any id already taken.
struct GroupIds {
    taken: BTreeSet<i64>,
    next: i64,
}

impl GroupIds {
    fn after(taken: BTreeSet<i64>) -> Self {
        let next = taken.last().map_or(0, |max| max.wrapping_add(1));
        GroupIds { taken, next }
    }

    fn next_free(&mut self) -> i64 {
        while self.taken.contains(&self.next) {
            self.next = self.next.wrapping_add(1);
        }
        let id = self.next;
        self.taken.insert(id);
        self.next = id.wrapping_add(1);
        id
    }
}

/// Render a graph, and optionally a community grouping, as a DOT digraph
pub fn render_dot(name: &str, graph: &DirectedMultigraph, grouping: Option<CommunityGrouping<'_>>) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "digraph \"{}\" {{", dot_escape(name));

    let mut taken: BTreeSet<i64> = BTreeSet::new();
    for node in graph.nodes() {
        taken.insert(node.id.as_i64());
        let _ = writeln!(out, "\t{} [label=\"{}\"];", node.id.as_i64(), dot_escape(&node_label(node)));
    }
    for rel in graph.relationships() {
        taken.insert(rel.start.as_i64());
        taken.insert(rel.end.as_i64());
    }

    if let Some(grouping) = grouping {
        taken.extend(grouping.communities.iter().flatten().map(|member| member.id.as_i64()));
        let mut group_ids = GroupIds::after(taken);

        for (j, community) in grouping.communities.iter().enumerate() {
            let group_id = group_ids.next_free();
            let _ = writeln!(
                out,
                "\t{} [label=\"Community {}, Group {}\", weight={}];",
                group_id, grouping.index, j, GROUP_WEIGHT
            );
            for member in community {
                let _ = writeln!(out, "\t{} -> {} [weight={}];", member.id.as_i64(), group_id, GROUP_WEIGHT);
            }
        }
    }

    for rel in graph.relationships() {
        let _ = writeln!(
            out,
            "\t{} -> {} [id={}, label=\"{}\"];",
            rel.start.as_i64(),
            rel.end.as_i64(),
            rel.id.as_i64(),
            dot_escape(&rel.type_string())
        );
    }

    out.push_str("}\n");
    out
}

/// Write a rendered graph, creating missing parent directories
pub fn write_dot(path: impl AsRef<Path>, dot: &str) -> GraphResult<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, dot)?;
    tracing::debug!("wrote {:?}", path);
    Ok(())
}
