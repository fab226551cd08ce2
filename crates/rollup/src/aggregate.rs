use bom_tree::{Edge, ItemKind, KindRegistry, ParsedTree};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Occurrence count per item name
pub type Counts = BTreeMap<String, u64>;

/// Per-assembly child counters built from an edge list
///
/// Counting is purely additive: every edge adds one to its parent's counter,
/// so repeated instances of the same sub-assembly accumulate their children.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AssemblyTable {
    direct_children: BTreeMap<String, Counts>,
    direct_subassemblies: BTreeMap<String, Counts>,
    kinds: KindRegistry,
    assemblies: BTreeSet<String>,
}

impl AssemblyTable {
    /// Fold the edges of a parsed export
    pub fn from_tree(tree: &ParsedTree) -> Self {
        Self::aggregate(&tree.edges, tree.kinds.clone(), tree.assemblies.iter().cloned())
    }

    /// Fold an edge list; `pushed` names every item that opened a scope
    pub fn aggregate<I>(edges: &[Edge], kinds: KindRegistry, pushed: I) -> Self
    where
        I: IntoIterator<Item = String>,
    {
        let mut direct_children: BTreeMap<String, Counts> = BTreeMap::new();
        let mut direct_subassemblies: BTreeMap<String, Counts> = BTreeMap::new();

        for edge in edges {
            *direct_children
                .entry(edge.parent.clone())
                .or_default()
                .entry(edge.child.clone())
                .or_insert(0) += 1;

            if edge.child_kind == ItemKind::Assembly {
                *direct_subassemblies
                    .entry(edge.parent.clone())
                    .or_default()
                    .entry(edge.child.clone())
                    .or_insert(0) += 1;
            }
        }

        let mut assemblies: BTreeSet<String> = pushed.into_iter().collect();
        assemblies.extend(direct_children.keys().cloned());
        assemblies.extend(kinds.assemblies().map(str::to_string));

        log::debug!(
            "Aggregated {} edges into {} assemblies",
            edges.len(),
            assemblies.len()
        );

        Self {
            direct_children,
            direct_subassemblies,
            kinds,
            assemblies,
        }
    }

    /// Known assemblies in name order
    pub fn assemblies(&self) -> impl Iterator<Item = &str> {
        self.assemblies.iter().map(String::as_str)
    }

    pub fn is_assembly(&self, name: &str) -> bool {
        self.assemblies.contains(name)
    }

    pub fn kinds(&self) -> &KindRegistry {
        &self.kinds
    }

    /// Every immediate child of `assembly`, parts and assemblies alike
    pub fn direct_children(&self, assembly: &str) -> Option<&Counts> {
        self.direct_children.get(assembly)
    }

    /// Direct count of `item` inside `assembly`, 0 when absent
    pub fn direct_count(&self, assembly: &str, item: &str) -> u64 {
        self.direct_children
            .get(assembly)
            .and_then(|c| c.get(item))
            .copied()
            .unwrap_or(0)
    }

    /// Immediate children that occurred as sub-assemblies
    pub fn direct_subassemblies(&self, assembly: &str) -> Option<&Counts> {
        self.direct_subassemblies.get(assembly)
    }

    /// Immediate children whose final kind is part
    pub fn direct_parts(&self, assembly: &str) -> Counts {
        self.direct_children
            .get(assembly)
            .map(|children| {
                children
                    .iter()
                    .filter(|(item, _)| !self.kinds.is_assembly(item))
                    .map(|(item, n)| (item.clone(), *n))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// All (parent, sub-assembly, count) triples
    pub fn subassembly_links(&self) -> impl Iterator<Item = (&str, &str, u64)> {
        self.direct_subassemblies.iter().flat_map(|(parent, subs)| {
            subs.iter()
                .map(move |(sub, n)| (parent.as_str(), sub.as_str(), *n))
        })
    }
}
