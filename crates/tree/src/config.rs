use crate::error::{Result, TreeError};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Describes the textual conventions of a CAD tree export
///
/// The defaults match the known export: `├─`/`└─` branches, a 4-character
/// indentation stride and 3-digit instance counters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TreeFormat {
    /// Glyphs that open a tree branch (middle branch, last branch)
    pub branch_glyphs: Vec<char>,

    /// Horizontal stroke that follows a branch glyph
    pub branch_dash: char,

    /// Characters of indentation per hierarchy level
    pub indent_stride: usize,

    /// Trailing words marking metadata rows that are not physical nodes
    pub metadata_suffixes: Vec<String>,

    /// Name prefix of pattern/array containers excluded from every output
    pub reserved_prefix: String,

    /// Width of the numeric instance counter appended by the export
    pub instance_suffix_digits: usize,

    /// Marker of the root header line, e.g. `Frame (Assembly) @ ...`
    pub root_marker: String,

    /// Separator that follows the root marker on the header line
    pub root_separator: String,

    /// Arrow that introduces the node type on branch lines
    pub arrow: String,

    /// Node type written after the arrow for sub-assemblies
    pub assembly_type: String,

    /// Node types written after the arrow for leaf parts
    pub part_types: Vec<String>,
}

impl Default for TreeFormat {
    fn default() -> Self {
        Self {
            branch_glyphs: vec!['├', '└'],
            branch_dash: '─',
            indent_stride: 4,
            metadata_suffixes: vec!["Constraints".to_string(), "Configurations".to_string()],
            reserved_prefix: "Circular_".to_string(),
            instance_suffix_digits: 3,
            root_marker: "(Assembly)".to_string(),
            root_separator: "@".to_string(),
            arrow: "=>".to_string(),
            assembly_type: "Assembly".to_string(),
            part_types: vec!["Body".to_string(), "Part".to_string()],
        }
    }
}

impl TreeFormat {
    /// Parse a format description from TOML; missing keys keep their defaults
    pub fn from_toml_str(source: &str) -> Result<Self> {
        let format: Self = toml::from_str(source)?;
        format.validate()?;
        Ok(format)
    }

    /// Load a format description from a TOML file
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|e| TreeError::io(path, e))?;
        Self::from_toml_str(&source)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.branch_glyphs.is_empty() {
            return Err(TreeError::invalid_format("branch_glyphs must not be empty"));
        }
        if self.indent_stride == 0 {
            return Err(TreeError::invalid_format("indent_stride must be > 0"));
        }
        if self.instance_suffix_digits == 0 {
            return Err(TreeError::invalid_format(
                "instance_suffix_digits must be > 0",
            ));
        }
        if self.arrow.trim().is_empty() {
            return Err(TreeError::invalid_format("arrow must not be blank"));
        }
        if self.root_marker.trim().is_empty() {
            return Err(TreeError::invalid_format("root_marker must not be blank"));
        }
        Ok(())
    }

    /// `=> Assembly` style marker for sub-assembly lines
    pub fn assembly_marker(&self) -> String {
        format!("{} {}", self.arrow, self.assembly_type)
    }

    /// `=> Body` / `=> Part` style markers for part lines
    pub fn part_markers(&self) -> Vec<String> {
        self.part_types
            .iter()
            .map(|t| format!("{} {}", self.arrow, t))
            .collect()
    }
}
