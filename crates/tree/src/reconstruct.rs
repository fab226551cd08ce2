use crate::classify::LineClassifier;
use crate::config::TreeFormat;
use crate::error::{Result, TreeError};
use crate::types::{Edge, ParsedTree};
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Eq)]
struct Frame {
    name: String,
    depth: usize,
}

/// Path of open assemblies from the document root to the current line
#[derive(Debug, Default)]
pub struct AncestryStack {
    frames: Vec<Frame>,
}

impl AncestryStack {
    pub fn new() -> Self {
        Self::default()
    }

    /// Close every assembly at `depth` or deeper
    pub fn unwind_to(&mut self, depth: usize) {
        while self.frames.last().is_some_and(|top| top.depth >= depth) {
            self.frames.pop();
        }
    }

    pub fn push(&mut self, name: impl Into<String>, depth: usize) {
        self.frames.push(Frame {
            name: name.into(),
            depth,
        });
    }

    /// Innermost open assembly and its depth
    pub fn parent(&self) -> Option<(&str, usize)> {
        self.frames.last().map(|f| (f.name.as_str(), f.depth))
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }
}

/// Rebuilds parent/child edges from a flat sequence of export lines
pub struct TreeParser {
    classifier: LineClassifier,
}

impl TreeParser {
    pub fn new(format: TreeFormat) -> Result<Self> {
        Ok(Self {
            classifier: LineClassifier::new(format)?,
        })
    }

    pub fn classifier(&self) -> &LineClassifier {
        &self.classifier
    }

    pub fn parse_str(&self, text: &str) -> ParsedTree {
        self.parse_lines(text.lines())
    }

    /// Read and parse an export file
    pub fn parse_path(&self, path: impl AsRef<Path>) -> Result<ParsedTree> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| TreeError::io(path, e))?;
        log::debug!("Parsing tree export {}", path.display());
        Ok(self.parse_str(&text))
    }

    /// Build the edge list for an ordered sequence of lines
    pub fn parse_lines<I, S>(&self, lines: I) -> ParsedTree
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut tree = ParsedTree::default();
        let mut stack = AncestryStack::new();

        for (idx, raw) in lines.into_iter().enumerate() {
            let line_no = idx + 1;
            let line = raw.as_ref();
            tree.stats.lines_read += 1;

            if line.trim().is_empty() {
                continue;
            }

            // Every non-blank line closes the scopes at its depth, item or not
            let classified = self.classifier.classify(line);
            let depth = classified.depth;
            stack.unwind_to(depth);

            let Some(item) = classified.item else {
                log::trace!("Skipping line {line_no}: {}", line.trim());
                tree.stats.lines_skipped += 1;
                continue;
            };
            tree.stats.lines_classified += 1;

            tree.kinds.merge(&item.name, item.kind);

            match stack.parent() {
                Some((parent, parent_depth)) => {
                    if depth > parent_depth + 1 {
                        log::debug!(
                            "Line {line_no}: '{}' at depth {depth} attached to '{parent}' at depth {parent_depth}",
                            item.name
                        );
                        tree.stats.depth_jumps += 1;
                    }
                    tree.edges.push(Edge {
                        parent: parent.to_string(),
                        child: item.name.clone(),
                        child_kind: item.kind,
                        line: line_no,
                    });
                }
                None if item.kind.is_assembly() => {
                    tree.roots.insert(item.name.clone());
                }
                None => {
                    log::debug!("Line {line_no}: part '{}' has no containing assembly", item.name);
                }
            }

            if item.kind.is_assembly() {
                tree.assemblies.insert(item.name.clone());
                stack.push(item.name, depth);
            }
        }

        log::info!(
            "Parsed tree: {} items, {} edges, {} lines skipped",
            tree.item_count(),
            tree.edges.len(),
            tree.stats.lines_skipped
        );

        tree
    }
}

impl Default for TreeParser {
    fn default() -> Self {
        Self {
            classifier: LineClassifier::default(),
        }
    }
}
