//! # BOM Tree
//!
//! Parser for plain-text CAD assembly tree exports.
//!
//! ## Architecture
//!
//! ```text
//! Tree export (lines)
//!     │
//!     ├──> Line Classifier
//!     │      ├─ Depth from branch glyph offset (4-char stride)
//!     │      ├─ Kind from markers (=> Assembly, => Body, (...))
//!     │      └─ Name with instance suffix stripped (Bolt007 -> Bolt)
//!     │
//!     └──> Tree Parser
//!            ├─ Ancestry stack of open assemblies
//!            ├─ Sticky kind registry (assembly wins)
//!            └─ Edge list: parent -> child, one per occurrence
//! ```
//!
//! ## Example
//!
//! ```rust
//! use bom_tree::TreeParser;
//!
//! let export = "\
//! Root (Assembly) @ top
//!  ├─ Arm001 => Assembly
//!  │   ├─ Bolt001 (Screw)
//!  │   └─ Bolt002 (Screw)
//! ";
//!
//! let tree = TreeParser::default().parse_str(export);
//! assert_eq!(tree.edges.len(), 3);
//! assert!(tree.kinds.is_assembly("Arm"));
//! ```

mod classify;
mod config;
mod error;
mod reconstruct;
mod types;

pub use classify::{normalize_instance_suffix, Classified, LineClassifier};
pub use config::TreeFormat;
pub use error::{Result, TreeError};
pub use reconstruct::{AncestryStack, TreeParser};
pub use types::{Edge, Item, ItemKind, KindRegistry, ParseStats, ParsedTree};
