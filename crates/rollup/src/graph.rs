use crate::aggregate::AssemblyTable;
use crate::error::{Result, RollupError};
use petgraph::algo::kosaraju_scc;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;
use petgraph::Direction;
use std::collections::HashMap;

/// Assembly -> sub-assembly containment graph
///
/// Nodes are assembly names; edge weights are direct occurrence counts.
pub struct AssemblyGraph {
    graph: DiGraph<String, u64>,
    index: HashMap<String, NodeIndex>,
}

impl AssemblyGraph {
    pub fn from_table(table: &AssemblyTable) -> Self {
        let mut graph = DiGraph::new();
        let mut index = HashMap::new();

        for name in table.assemblies() {
            let idx = graph.add_node(name.to_string());
            index.insert(name.to_string(), idx);
        }

        for (parent, sub, count) in table.subassembly_links() {
            let (Some(&from), Some(&to)) = (index.get(parent), index.get(sub)) else {
                continue;
            };
            graph.add_edge(from, to, count);
        }

        log::debug!(
            "Built assembly graph: {} nodes, {} edges",
            graph.node_count(),
            graph.edge_count()
        );

        Self { graph, index }
    }

    /// Direct sub-assemblies of `name` with their occurrence counts
    pub fn subassemblies(&self, name: &str) -> Vec<(&str, u64)> {
        let Some(&idx) = self.index.get(name) else {
            return Vec::new();
        };
        let mut subs: Vec<(&str, u64)> = self
            .graph
            .edges(idx)
            .map(|e| (self.graph[e.target()].as_str(), *e.weight()))
            .collect();
        subs.sort_unstable();
        subs
    }

    /// Assemblies that no other assembly contains, in name order
    pub fn roots(&self) -> Vec<&str> {
        let mut roots: Vec<&str> = self
            .graph
            .node_indices()
            .filter(|&idx| {
                self.graph
                    .neighbors_directed(idx, Direction::Incoming)
                    .next()
                    .is_none()
            })
            .map(|idx| self.graph[idx].as_str())
            .collect();
        roots.sort_unstable();
        roots
    }

    /// Fail with the members of the first containment cycle, if any
    pub fn check_acyclic(&self) -> Result<()> {
        for component in kosaraju_scc(&self.graph) {
            let self_loop = component.len() == 1
                && self.graph.contains_edge(component[0], component[0]);
            if component.len() > 1 || self_loop {
                let mut path: Vec<String> = component
                    .iter()
                    .map(|&idx| self.graph[idx].clone())
                    .collect();
                path.sort_unstable();
                return Err(RollupError::CyclicReference { path });
            }
        }
        Ok(())
    }
}
