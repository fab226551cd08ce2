use crate::config::TreeFormat;
use crate::error::Result;
use crate::types::{Item, ItemKind};
use once_cell::sync::Lazy;
use regex::Regex;

static DEFAULT_SUFFIX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(.*?)(\d{3})$").expect("valid instance suffix pattern"));

static DEFAULT_BRANCH: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[├└]─\s*(.*)$").expect("valid branch pattern"));

/// Strip a trailing 3-digit instance counter (`Bracket007` -> `Bracket`)
///
/// Whitespace is trimmed first. Names with fewer than three trailing digits
/// are returned unchanged.
pub fn normalize_instance_suffix(name: &str) -> String {
    strip_suffix(&DEFAULT_SUFFIX, name)
}

fn strip_suffix(pattern: &Regex, name: &str) -> String {
    let name = name.trim();
    match pattern.captures(name) {
        Some(caps) => caps.get(1).map_or("", |m| m.as_str()).to_string(),
        None => name.to_string(),
    }
}

/// Result of classifying one export line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classified {
    /// Hierarchy depth; 0 for lines without a branch glyph
    pub depth: usize,

    /// Item named on the line, if it is a physical node
    pub item: Option<Item>,
}

/// Turns raw export lines into (depth, item) pairs
pub struct LineClassifier {
    format: TreeFormat,
    suffix: Regex,
    branch: Regex,
}

impl LineClassifier {
    pub fn new(format: TreeFormat) -> Result<Self> {
        format.validate()?;

        let suffix = Regex::new(&format!(
            r"^(.*?)(\d{{{}}})$",
            format.instance_suffix_digits
        ))?;

        let glyphs: String = format
            .branch_glyphs
            .iter()
            .map(|g| regex::escape(&g.to_string()))
            .collect();
        let branch = Regex::new(&format!(
            r"[{}]{}\s*(.*)$",
            glyphs,
            regex::escape(&format.branch_dash.to_string())
        ))?;

        Ok(Self {
            format,
            suffix,
            branch,
        })
    }

    pub fn format(&self) -> &TreeFormat {
        &self.format
    }

    pub fn classify(&self, line: &str) -> Classified {
        Classified {
            depth: self.depth(line),
            item: self.extract(line),
        }
    }

    /// Hierarchy depth from the character offset of the first branch glyph
    ///
    /// Depth is `floor((offset - 1) / stride) + 1`, so a glyph at offset 0
    /// sits at depth 0 together with the root header.
    pub fn depth(&self, line: &str) -> usize {
        let Some(offset) = line
            .chars()
            .position(|c| self.format.branch_glyphs.contains(&c))
        else {
            return 0;
        };

        let stride = self.format.indent_stride as isize;
        let level = (offset as isize - 1).div_euclid(stride) + 1;
        level.max(0) as usize
    }

    /// Canonical item named on the line, or `None` for non-physical lines
    pub fn extract(&self, line: &str) -> Option<Item> {
        let stripped = line.trim();
        if self
            .format
            .metadata_suffixes
            .iter()
            .any(|suffix| stripped.ends_with(suffix.as_str()))
        {
            return None;
        }

        let content = self
            .branch
            .captures(stripped)
            .and_then(|caps| caps.get(1))
            .map_or(stripped, |m| m.as_str());

        let arrow = self.format.arrow.as_str();

        if content.contains(self.format.root_marker.as_str())
            && content.contains(self.format.root_separator.as_str())
            && !content.contains(arrow)
        {
            let raw = content
                .split(self.format.root_marker.as_str())
                .next()
                .unwrap_or_default();
            let name = self.normalize(raw);
            if self.is_reserved(&name) {
                return None;
            }
            return self.item(name, ItemKind::Assembly);
        }

        let lead = content
            .split(arrow)
            .next()
            .unwrap_or_default()
            .split('(')
            .next()
            .unwrap_or_default()
            .trim();
        if self.is_reserved(lead) {
            return None;
        }

        let assembly_marker = self.format.assembly_marker();
        if let Some((raw, _)) = content.split_once(assembly_marker.as_str()) {
            return self.item(self.normalize(raw), ItemKind::Assembly);
        }

        if self
            .format
            .part_markers()
            .iter()
            .any(|marker| content.contains(marker.as_str()))
        {
            let raw = content.split(arrow).next().unwrap_or_default();
            return self.item(self.normalize(raw), ItemKind::Part);
        }

        if content.contains('(') && content.contains(')') {
            let raw = content.split('(').next().unwrap_or_default();
            return self.item(self.normalize(raw), ItemKind::Part);
        }

        None
    }

    /// Trim and strip the configured instance suffix
    pub fn normalize(&self, name: &str) -> String {
        strip_suffix(&self.suffix, name)
    }

    fn is_reserved(&self, name: &str) -> bool {
        !self.format.reserved_prefix.is_empty() && name.starts_with(&self.format.reserved_prefix)
    }

    fn item(&self, name: String, kind: ItemKind) -> Option<Item> {
        if name.is_empty() {
            log::trace!("Dropping {kind} with empty name");
            return None;
        }
        Some(Item::new(name, kind))
    }
}

impl Default for LineClassifier {
    fn default() -> Self {
        Self {
            format: TreeFormat::default(),
            suffix: DEFAULT_SUFFIX.clone(),
            branch: DEFAULT_BRANCH.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn classifier() -> LineClassifier {
        LineClassifier::default()
    }

    #[test]
    fn normalize_strips_three_digit_suffix() {
        assert_eq!(normalize_instance_suffix("Bracket007"), "Bracket");
        assert_eq!(normalize_instance_suffix("  Body003 "), "Body");
        assert_eq!(normalize_instance_suffix("Bracket"), "Bracket");
    }

    #[test]
    fn normalize_keeps_short_or_non_digit_tails() {
        assert_eq!(normalize_instance_suffix("Bracket07"), "Bracket07");
        assert_eq!(normalize_instance_suffix("M3x10"), "M3x10");
        assert_eq!(normalize_instance_suffix("Plate00A"), "Plate00A");
    }

    #[test]
    fn normalize_strips_only_last_three_of_longer_runs() {
        assert_eq!(normalize_instance_suffix("Part1234"), "Part1");
    }

    #[test]
    fn depth_from_glyph_offset() {
        let c = classifier();
        assert_eq!(c.depth("Frame (Assembly) @ top"), 0);
        assert_eq!(c.depth("├─ Glyph at zero (x)"), 0);
        assert_eq!(c.depth(" ├─ Arm001 => Assembly"), 1);
        assert_eq!(c.depth("    └─ Arm001 => Assembly"), 1);
        assert_eq!(c.depth(" │   ├─ Bolt001 (Screw)"), 2);
        assert_eq!(c.depth(" │   │   └─ Nut001 (Nut)"), 3);
    }

    #[test]
    fn depth_counts_characters_not_bytes() {
        // Each `│` is three bytes in UTF-8 but one character
        let c = classifier();
        assert_eq!(c.depth("│   │   ├─ Washer001 (Washer)"), 2);
    }

    #[test]
    fn root_header_is_assembly() {
        let c = classifier();
        let item = c.extract("Gantry001 (Assembly) @ Gantry.FCStd").unwrap();
        assert_eq!(item, Item::assembly("Gantry"));
    }

    #[test]
    fn reserved_root_header_is_skipped() {
        let c = classifier();
        assert_eq!(c.extract("Circular_Array (Assembly) @ x"), None);
    }

    #[test]
    fn arrow_markers_decide_kind() {
        let c = classifier();
        assert_eq!(
            c.extract(" ├─ Carriage002 => Assembly"),
            Some(Item::assembly("Carriage"))
        );
        assert_eq!(
            c.extract(" │   ├─ Rail001 => Body"),
            Some(Item::part("Rail"))
        );
        assert_eq!(
            c.extract(" │   └─ Plate => Part"),
            Some(Item::part("Plate"))
        );
    }

    #[test]
    fn parenthesized_annotation_is_part() {
        let c = classifier();
        assert_eq!(
            c.extract(" │   ├─ ISO4762_M5x12_005 (Screw)"),
            Some(Item::part("ISO4762_M5x12_"))
        );
        assert_eq!(
            c.extract(" ├─ Spacer (Aluminium)"),
            Some(Item::part("Spacer"))
        );
    }

    #[test]
    fn metadata_rows_are_skipped() {
        let c = classifier();
        assert_eq!(c.extract(" ├─ Constraints"), None);
        assert_eq!(c.extract(" │   └─ Configurations"), None);
    }

    #[test]
    fn circular_containers_are_skipped() {
        let c = classifier();
        assert_eq!(c.extract(" ├─ Circular_Pattern001 => Assembly"), None);
        assert_eq!(c.extract(" ├─ Circular_Holes (Screw)"), None);
        assert_eq!(c.extract(" ├─ Circular_Body => Body"), None);
    }

    #[test]
    fn unrecognized_lines_are_ignored() {
        let c = classifier();
        assert_eq!(c.extract(" │   Note: revised"), None);
        assert_eq!(c.extract(" ├─ Sketch"), None);
        assert_eq!(c.extract(""), None);
    }

    #[test]
    fn assembly_marker_wins_over_parentheses() {
        let c = classifier();
        assert_eq!(
            c.extract(" ├─ Motor (NEMA17) => Assembly"),
            Some(Item::assembly("Motor (NEMA17)"))
        );
    }

    #[test]
    fn custom_format_changes_markers_and_stride() {
        let format = TreeFormat {
            indent_stride: 2,
            reserved_prefix: "Pattern_".to_string(),
            instance_suffix_digits: 2,
            ..TreeFormat::default()
        };
        let c = LineClassifier::new(format).unwrap();

        assert_eq!(c.depth(" ├─ A"), 1);
        assert_eq!(c.depth(" │ ├─ B"), 2);
        assert_eq!(c.extract(" ├─ Pattern_X (Screw)"), None);
        assert_eq!(
            c.extract(" ├─ Circular_X07 (Screw)"),
            Some(Item::part("Circular_X"))
        );
    }

    proptest! {
        #[test]
        fn proptest_normalize_strips_any_counter(base in "[A-Za-z_]{1,16}", counter in 0u32..1000u32) {
            let name = format!("{base}{counter:03}");
            prop_assert_eq!(normalize_instance_suffix(&name), base);
        }

        #[test]
        fn proptest_normalize_is_stable_on_bases(base in "[A-Za-z_]{1,16}[A-Za-z_0-9]{0,2}") {
            // At most two trailing digits
            prop_assert_eq!(normalize_instance_suffix(&base), base.clone());
        }

        #[test]
        fn proptest_depth_follows_stride(level in 1usize..12) {
            let line = format!(" {}├─ X (Screw)", "│   ".repeat(level - 1));
            prop_assert_eq!(classifier().depth(&line), level);
        }
    }
}
