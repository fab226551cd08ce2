//! # BOM Rollup
//!
//! Quantity matrices for parsed assembly trees.
//!
//! ## Architecture
//!
//! ```text
//! ParsedTree (edges)
//!     │
//!     ├──> Aggregator
//!     │      ├─ direct_children: assembly -> item -> count
//!     │      └─ direct_subassemblies: assembly -> sub -> count
//!     │
//!     ├──> Assembly Graph (petgraph)
//!     │      ├─ Nodes: assemblies
//!     │      └─ Edges: containment, weighted by count
//!     │
//!     ├──> Rollup Engine
//!     │      ├─ rollup(A) = parts(A) + Σ n × rollup(S)
//!     │      ├─ Per-engine memo cache
//!     │      └─ Explicit work stack with cycle detection
//!     │
//!     └──> Matrix Builder
//!            ├─ DirectChildren: items × assemblies
//!            └─ RollupPartsOnly: parts × assemblies
//! ```
//!
//! ## Example
//!
//! ```rust
//! use bom_rollup::{AssemblyTable, MatrixSet};
//! use bom_tree::TreeParser;
//!
//! let tree = TreeParser::default().parse_str("\
//! Root (Assembly) @ top
//!  ├─ Leg001 => Assembly
//!  │   └─ Foot (Rubber)
//!  └─ Leg002 => Assembly
//! ");
//!
//! let table = AssemblyTable::from_tree(&tree);
//! let set = MatrixSet::build(&table).unwrap();
//! assert_eq!(set.rollup_parts_only.get("Foot", "Root"), Some(2));
//! ```

mod aggregate;
mod engine;
mod error;
mod export;
mod graph;
mod matrix;

pub use aggregate::{AssemblyTable, Counts};
pub use engine::RollupEngine;
pub use error::{Result, RollupError};
pub use export::{
    write_csv, write_csv_files, write_json, write_json_file, DIRECT_CHILDREN_CSV, MATRIX_JSON,
    ROLLUP_PARTS_CSV,
};
pub use graph::AssemblyGraph;
pub use matrix::{direct_children_matrix, rollup_matrix, Matrix, MatrixRow, MatrixSet, ROW_HEADER};

use bom_tree::ParsedTree;

/// Aggregate a parsed export and build both matrices
pub fn build_matrices(tree: &ParsedTree) -> Result<MatrixSet> {
    let table = AssemblyTable::from_tree(tree);
    MatrixSet::build(&table)
}
