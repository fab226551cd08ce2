use crate::aggregate::AssemblyTable;
use crate::engine::RollupEngine;
use crate::error::Result;
use bom_tree::ItemKind;
use serde::{Deserialize, Serialize};

/// Label of the first header cell
pub const ROW_HEADER: &str = "Item";

/// One labelled row of counts, aligned with [`Matrix::columns`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatrixRow {
    pub item: String,
    pub kind: ItemKind,
    pub cells: Vec<u64>,
}

/// Rectangular item x assembly count table
///
/// Every row has exactly one cell per column; absent counts are stored as 0.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Matrix {
    pub row_header: String,
    pub columns: Vec<String>,
    pub rows: Vec<MatrixRow>,
}

impl Matrix {
    fn new(columns: Vec<String>) -> Self {
        Self {
            row_header: ROW_HEADER.to_string(),
            columns,
            rows: Vec::new(),
        }
    }

    /// Cell for (`item`, `assembly`), `None` if either label is unknown
    pub fn get(&self, item: &str, assembly: &str) -> Option<u64> {
        let col = self.columns.iter().position(|c| c == assembly)?;
        self.row(item).map(|row| row.cells[col])
    }

    pub fn row(&self, item: &str) -> Option<&MatrixRow> {
        self.rows.iter().find(|row| row.item == item)
    }

    /// Row labels in display order
    pub fn items(&self) -> impl Iterator<Item = &str> {
        self.rows.iter().map(|row| row.item.as_str())
    }

    pub fn is_rectangular(&self) -> bool {
        self.rows.iter().all(|row| row.cells.len() == self.columns.len())
    }

    /// Header row: row header followed by the assembly names
    pub fn header(&self) -> Vec<&str> {
        std::iter::once(self.row_header.as_str())
            .chain(self.columns.iter().map(String::as_str))
            .collect()
    }
}

/// Direct occurrence counts: every item against every assembly
///
/// Rows list assemblies first, then parts, each group in name order.
pub fn direct_children_matrix(table: &AssemblyTable) -> Matrix {
    let columns: Vec<String> = table.assemblies().map(str::to_string).collect();
    let mut matrix = Matrix::new(columns);

    let mut items: Vec<(&str, ItemKind)> = table.kinds().iter().collect();
    items.sort_by(|a, b| (a.1, a.0).cmp(&(b.1, b.0)));

    for (item, kind) in items {
        let cells = matrix
            .columns
            .iter()
            .map(|assembly| table.direct_count(assembly, item))
            .collect();
        matrix.rows.push(MatrixRow {
            item: item.to_string(),
            kind,
            cells,
        });
    }

    matrix
}

/// Recursive part totals: every part against every assembly
pub fn rollup_matrix(table: &AssemblyTable, engine: &mut RollupEngine<'_>) -> Result<Matrix> {
    let columns: Vec<String> = table.assemblies().map(str::to_string).collect();
    let mut matrix = Matrix::new(columns);

    for part in table.kinds().parts() {
        matrix.rows.push(MatrixRow {
            item: part.to_string(),
            kind: ItemKind::Part,
            cells: Vec::with_capacity(matrix.columns.len()),
        });
    }

    for (col, assembly) in matrix.columns.iter().enumerate() {
        let totals = engine.rollup(assembly)?;
        for row in &mut matrix.rows {
            debug_assert_eq!(row.cells.len(), col);
            row.cells.push(totals.get(&row.item).copied().unwrap_or(0));
        }
    }

    Ok(matrix)
}

/// Both deliverable tables of one export
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatrixSet {
    pub direct_children: Matrix,
    pub rollup_parts_only: Matrix,
}

impl MatrixSet {
    pub fn build(table: &AssemblyTable) -> Result<Self> {
        let mut engine = RollupEngine::new(table);
        engine.graph().check_acyclic()?;
        log::debug!("Root assemblies: {}", engine.graph().roots().join(", "));

        let direct_children = direct_children_matrix(table);
        let rollup_parts_only = rollup_matrix(table, &mut engine)?;

        log::info!(
            "Built matrices: {} items x {} assemblies, {} parts rolled up",
            direct_children.rows.len(),
            direct_children.columns.len(),
            rollup_parts_only.rows.len()
        );

        Ok(Self {
            direct_children,
            rollup_parts_only,
        })
    }
}
