use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

/// Kind of a node in the assembly tree
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemKind {
    /// Contains other nodes
    Assembly,
    /// Leaf node
    Part,
}

impl ItemKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Assembly => "assembly",
            Self::Part => "part",
        }
    }

    pub const fn is_assembly(self) -> bool {
        matches!(self, Self::Assembly)
    }
}

impl fmt::Display for ItemKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A named physical item, after instance-suffix normalization
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Item {
    pub name: String,
    pub kind: ItemKind,
}

impl Item {
    pub fn new(name: impl Into<String>, kind: ItemKind) -> Self {
        Self {
            name: name.into(),
            kind,
        }
    }

    pub fn assembly(name: impl Into<String>) -> Self {
        Self::new(name, ItemKind::Assembly)
    }

    pub fn part(name: impl Into<String>) -> Self {
        Self::new(name, ItemKind::Part)
    }
}

/// One containment occurrence: `child` appears once directly inside `parent`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Edge {
    /// Containing assembly
    pub parent: String,

    /// Contained item
    pub child: String,

    /// Kind of this particular occurrence (before sticky merging)
    pub child_kind: ItemKind,

    /// 1-based line number in the export
    pub line: usize,
}

/// Item kinds merged across all occurrences
///
/// Kinds are sticky toward assembly: a name seen once as an assembly stays an
/// assembly no matter how its other occurrences look.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KindRegistry {
    kinds: BTreeMap<String, ItemKind>,
}

impl KindRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one occurrence of `name`; returns the merged kind
    pub fn merge(&mut self, name: &str, kind: ItemKind) -> ItemKind {
        let entry = self.kinds.entry(name.to_string()).or_insert(kind);
        if kind.is_assembly() {
            *entry = ItemKind::Assembly;
        }
        *entry
    }

    pub fn get(&self, name: &str) -> Option<ItemKind> {
        self.kinds.get(name).copied()
    }

    pub fn is_assembly(&self, name: &str) -> bool {
        self.get(name).is_some_and(ItemKind::is_assembly)
    }

    pub fn is_part(&self, name: &str) -> bool {
        self.get(name) == Some(ItemKind::Part)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.kinds.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.kinds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.kinds.is_empty()
    }

    /// All items in name order
    pub fn iter(&self) -> impl Iterator<Item = (&str, ItemKind)> {
        self.kinds.iter().map(|(name, kind)| (name.as_str(), *kind))
    }

    /// Assembly names in name order
    pub fn assemblies(&self) -> impl Iterator<Item = &str> {
        self.iter()
            .filter(|(_, kind)| kind.is_assembly())
            .map(|(name, _)| name)
    }

    /// Part names in name order
    pub fn parts(&self) -> impl Iterator<Item = &str> {
        self.iter()
            .filter(|(_, kind)| !kind.is_assembly())
            .map(|(name, _)| name)
    }
}

/// Line counters collected while parsing an export
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParseStats {
    /// Every line handed to the parser, blank ones included
    pub lines_read: usize,

    /// Lines that produced an item
    pub lines_classified: usize,

    /// Non-blank lines that produced nothing (metadata, notes, containers)
    pub lines_skipped: usize,

    /// Items attached to a parent more than one level above them
    pub depth_jumps: usize,
}

/// Output of the first phase: the containment edges of one export
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ParsedTree {
    /// Containment occurrences in document order
    pub edges: Vec<Edge>,

    /// Sticky kind of every item seen
    pub kinds: KindRegistry,

    /// Names pushed on the ancestry stack at least once
    pub assemblies: BTreeSet<String>,

    /// Assemblies that appeared with no containing assembly
    pub roots: BTreeSet<String>,

    pub stats: ParseStats,
}

impl ParsedTree {
    pub fn item_count(&self) -> usize {
        self.kinds.len()
    }
}
