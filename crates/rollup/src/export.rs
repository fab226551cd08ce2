use crate::error::{Result, RollupError};
use crate::matrix::{Matrix, MatrixSet};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// File name of the direct-children sheet
pub const DIRECT_CHILDREN_CSV: &str = "DirectChildren.csv";

/// File name of the recursive part totals sheet
pub const ROLLUP_PARTS_CSV: &str = "RollupPartsOnly.csv";

/// File name of the combined JSON document
pub const MATRIX_JSON: &str = "assembly_matrix.json";

/// Write one matrix as CSV: header row, then one row per item
pub fn write_csv<W: Write>(matrix: &Matrix, writer: W) -> Result<()> {
    let mut csv = csv::Writer::from_writer(writer);
    csv.write_record(matrix.header())?;

    for row in &matrix.rows {
        let record = std::iter::once(row.item.clone())
            .chain(row.cells.iter().map(u64::to_string));
        csv.write_record(record)?;
    }

    csv.flush().map_err(csv::Error::from)?;
    Ok(())
}

/// Write both matrices as JSON
pub fn write_json<W: Write>(set: &MatrixSet, writer: W, pretty: bool) -> Result<()> {
    if pretty {
        serde_json::to_writer_pretty(writer, set)?;
    } else {
        serde_json::to_writer(writer, set)?;
    }
    Ok(())
}

/// Write `DirectChildren.csv` and `RollupPartsOnly.csv` into `dir`
pub fn write_csv_files(set: &MatrixSet, dir: &Path) -> Result<Vec<PathBuf>> {
    let mut written = Vec::with_capacity(2);
    for (name, matrix) in [
        (DIRECT_CHILDREN_CSV, &set.direct_children),
        (ROLLUP_PARTS_CSV, &set.rollup_parts_only),
    ] {
        let path = dir.join(name);
        let file = File::create(&path).map_err(|e| RollupError::io(&path, e))?;
        write_csv(matrix, BufWriter::new(file))?;
        log::debug!("Wrote {}", path.display());
        written.push(path);
    }
    Ok(written)
}

/// Write `assembly_matrix.json` into `dir`
pub fn write_json_file(set: &MatrixSet, dir: &Path, pretty: bool) -> Result<PathBuf> {
    let path = dir.join(MATRIX_JSON);
    let file = File::create(&path).map_err(|e| RollupError::io(&path, e))?;
    let mut writer = BufWriter::new(file);
    write_json(set, &mut writer, pretty)?;
    writer.flush().map_err(|e| RollupError::io(&path, e))?;
    log::debug!("Wrote {}", path.display());
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::AssemblyTable;
    use bom_tree::TreeParser;
    use pretty_assertions::assert_eq;

    fn set() -> MatrixSet {
        let tree = TreeParser::default().parse_str(
            "\
Shelf (Assembly) @ shelf
 ├─ Bracket001 => Assembly
 │   ├─ Plate => Body
 │   └─ Screw001 (Screw, M4)
 ├─ Bracket002 => Assembly
 └─ Board => Body
",
        );
        MatrixSet::build(&AssemblyTable::from_tree(&tree)).unwrap()
    }

    #[test]
    fn csv_has_header_and_zero_cells() {
        let mut out = Vec::new();
        write_csv(&set().direct_children, &mut out).unwrap();

        assert_eq!(
            String::from_utf8(out).unwrap(),
            "\
Item,Bracket,Shelf
Bracket,0,2
Shelf,0,0
Board,0,1
Plate,1,0
Screw,1,0
"
        );
    }

    #[test]
    fn rollup_csv_multiplies() {
        let mut out = Vec::new();
        write_csv(&set().rollup_parts_only, &mut out).unwrap();

        assert_eq!(
            String::from_utf8(out).unwrap(),
            "\
Item,Bracket,Shelf
Board,0,1
Plate,1,2
Screw,1,2
"
        );
    }

    #[test]
    fn json_round_trips_matrix_set() {
        let original = set();
        let mut out = Vec::new();
        write_json(&original, &mut out, false).unwrap();

        let value: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(value["direct_children"]["row_header"], "Item");
        assert_eq!(value["rollup_parts_only"]["rows"][0]["kind"], "part");
        assert_eq!(
            serde_json::from_slice::<MatrixSet>(&out).unwrap(),
            original
        );
    }

    #[test]
    fn writes_files_into_directory() {
        let dir = tempfile::tempdir().unwrap();
        let set = set();

        let csv_paths = write_csv_files(&set, dir.path()).unwrap();
        assert_eq!(
            csv_paths,
            vec![
                dir.path().join(DIRECT_CHILDREN_CSV),
                dir.path().join(ROLLUP_PARTS_CSV)
            ]
        );

        let json_path = write_json_file(&set, dir.path(), true).unwrap();
        let text = std::fs::read_to_string(json_path).unwrap();
        assert!(text.contains("\n  \"direct_children\""));
    }

    #[test]
    fn missing_directory_is_io_error() {
        let err = write_csv_files(&set(), Path::new("/nonexistent/out")).unwrap_err();
        assert!(matches!(err, RollupError::Io { .. }));
    }
}
