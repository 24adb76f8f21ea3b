use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use arrow::array::{Array, ArrayRef, AsArray};
use arrow::compute::cast;
use arrow::datatypes::{
    DataType, Float32Type, Float64Type, Int8Type, Int16Type, Int32Type, Int64Type, UInt8Type,
    UInt16Type, UInt32Type, UInt64Type,
};
use calamine::{Data, Reader, open_workbook_auto};
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde_json::Value as JsonValue;
use thiserror::Error;

use super::model::{AssessmentTable, Cell, required_columns};

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Why an assessment file could not be turned into a table.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("unsupported file extension '.{extension}' ({})", .path.display())]
    UnsupportedFormat { path: PathBuf, extension: String },

    #[error("could not read {}: {reason}", .path.display())]
    Unreadable { path: PathBuf, reason: String },

    #[error("{} is missing required column '{column}'", .path.display())]
    MissingColumn { path: PathBuf, column: String },

    #[error("{} contains no athlete rows", .path.display())]
    NoRows { path: PathBuf },
}

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load an assessment table from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.xlsx` / `.xlsm` / `.xls` / `.xlsb` / `.ods` – first worksheet, one header row
/// * `.csv`     – header row, one athlete per line
/// * `.json`    – `[{ "Athlete": "Ana", "Deep Squat": 2, ... }, ...]`
/// * `.parquet` – flat scalar columns
///
/// The first column becomes `Name` and every required column must be present.
pub fn load_table(path: &Path) -> Result<AssessmentTable, LoadError> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let read = match ext.as_str() {
        "xlsx" | "xlsm" | "xls" | "xlsb" | "ods" => read_workbook(path),
        "csv" => read_csv(path),
        "json" => read_json(path),
        "parquet" | "pq" => read_parquet(path),
        _ => {
            return Err(LoadError::UnsupportedFormat {
                path: path.to_path_buf(),
                extension: ext,
            });
        }
    };

    let (headers, rows) = read.map_err(|e| LoadError::Unreadable {
        path: path.to_path_buf(),
        reason: format!("{e:#}"),
    })?;

    let table = AssessmentTable::from_rows(headers, rows);
    validate(path, &table)?;

    for name in table.duplicate_names() {
        log::warn!("Athlete '{name}' appears on more than one row; the first row is charted");
    }

    Ok(table)
}

fn validate(path: &Path, table: &AssessmentTable) -> Result<(), LoadError> {
    if let Some(column) = required_columns().find(|c| !table.has_column(c)) {
        return Err(LoadError::MissingColumn {
            path: path.to_path_buf(),
            column: column.to_string(),
        });
    }
    if table.is_empty() {
        return Err(LoadError::NoRows {
            path: path.to_path_buf(),
        });
    }
    Ok(())
}

/// Header row plus data rows, cells already classified.
type RawSheet = (Vec<String>, Vec<Vec<Cell>>);

// ---------------------------------------------------------------------------
// Spreadsheet loader
// ---------------------------------------------------------------------------

/// Read the first worksheet.  Row 0 is the header; a blank header cell
/// is kept as an empty string (only the first column is expected to be
/// blank, and that one is renamed anyway).
fn read_workbook(path: &Path) -> Result<RawSheet> {
    let mut workbook = open_workbook_auto(path).context("opening workbook")?;
    let range = workbook
        .worksheet_range_at(0)
        .context("workbook has no worksheets")?
        .context("reading first worksheet")?;

    let mut rows = range.rows();
    let headers: Vec<String> = rows
        .next()
        .context("worksheet is empty")?
        .iter()
        .map(|c| c.to_string().trim().to_string())
        .collect();

    let data = rows
        .filter(|row| row.iter().any(|c| !matches!(c, Data::Empty)))
        .map(|row| row.iter().map(workbook_cell).collect())
        .collect();

    Ok((headers, data))
}

fn workbook_cell(data: &Data) -> Cell {
    match data {
        Data::Float(v) => Cell::number(*v),
        Data::Int(i) => Cell::Numeric(*i as f64),
        Data::String(s) => Cell::parse(s),
        Data::Empty => Cell::Empty,
        other => Cell::Text(other.to_string()),
    }
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

fn read_csv(path: &Path) -> Result<RawSheet> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_path(path)
        .context("opening CSV")?;
    let headers: Vec<String> = reader
        .headers()
        .context("reading CSV headers")?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();

    let mut rows = Vec::new();
    for (row_no, result) in reader.records().enumerate() {
        let record = result.with_context(|| format!("CSV row {row_no}"))?;
        rows.push(record.iter().map(Cell::parse).collect());
    }

    Ok((headers, rows))
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Expected JSON schema (records-oriented, `df.to_json(orient='records')`):
///
/// ```json
/// [
///   { "Athlete": "Ana", "Deep Squat": 2, ..., "CM Jump (cm)": 25.3, "Squat Jump (cm)": "NP" },
///   ...
/// ]
/// ```
///
/// Column order is taken from the first record.
fn read_json(path: &Path) -> Result<RawSheet> {
    let text = std::fs::read_to_string(path).context("reading JSON file")?;
    let root: JsonValue = serde_json::from_str(&text).context("parsing JSON")?;

    let records = root.as_array().context("Expected top-level JSON array")?;
    let first = records
        .first()
        .and_then(JsonValue::as_object)
        .context("Expected at least one JSON object")?;
    let headers: Vec<String> = first.keys().cloned().collect();

    let mut rows = Vec::with_capacity(records.len());
    for (i, rec) in records.iter().enumerate() {
        let obj = rec
            .as_object()
            .with_context(|| format!("Row {i} is not a JSON object"))?;
        rows.push(
            headers
                .iter()
                .map(|h| obj.get(h).map(json_cell).unwrap_or(Cell::Empty))
                .collect(),
        );
    }

    Ok((headers, rows))
}

fn json_cell(val: &JsonValue) -> Cell {
    match val {
        JsonValue::String(s) => Cell::parse(s),
        JsonValue::Number(n) => n
            .as_f64()
            .map(Cell::number)
            .unwrap_or_else(|| Cell::Text(n.to_string())),
        JsonValue::Null => Cell::Empty,
        other => Cell::Text(other.to_string()),
    }
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a Parquet file with one scalar column per header.
///
/// Works with files written by both **Pandas** (`df.to_parquet()`) and
/// **Polars** (`df.write_parquet()`), and with `generate_sample`.
/// String columns may be plain, large, view or dictionary encoded;
/// numeric columns may be any integer or float width up to 64 bits.
fn read_parquet(path: &Path) -> Result<RawSheet> {
    let file = std::fs::File::open(path).context("opening parquet file")?;
    let builder =
        ParquetRecordBatchReaderBuilder::try_new(file).context("reading parquet metadata")?;
    let headers: Vec<String> = builder
        .schema()
        .fields()
        .iter()
        .map(|f| f.name().clone())
        .collect();
    let reader = builder.build().context("building parquet reader")?;

    let mut rows = Vec::new();
    for batch_result in reader {
        let batch = batch_result.context("reading parquet record batch")?;
        let columns = batch
            .columns()
            .iter()
            .map(decode_dictionary)
            .collect::<Result<Vec<_>>>()?;
        for row in 0..batch.num_rows() {
            let cells = columns
                .iter()
                .map(|col| arrow_cell(col, row))
                .collect::<Result<Vec<_>>>()
                .with_context(|| format!("Row {row}"))?;
            rows.push(cells);
        }
    }

    Ok((headers, rows))
}

/// Categorical columns arrive dictionary encoded; expand them to their
/// value type so `arrow_cell` only sees flat arrays.
fn decode_dictionary(col: &ArrayRef) -> Result<ArrayRef> {
    match col.data_type() {
        DataType::Dictionary(_, values) => {
            cast(col.as_ref(), values.as_ref()).context("decoding dictionary column")
        }
        _ => Ok(Arc::clone(col)),
    }
}

/// Extract a single cell from an Arrow column at a given row.
fn arrow_cell(col: &ArrayRef, row: usize) -> Result<Cell> {
    if col.is_null(row) {
        return Ok(Cell::Empty);
    }
    let cell = match col.data_type() {
        DataType::Utf8 => Cell::parse(col.as_string::<i32>().value(row)),
        DataType::LargeUtf8 => Cell::parse(col.as_string::<i64>().value(row)),
        DataType::Utf8View => Cell::parse(col.as_string_view().value(row)),
        DataType::Int8 => Cell::Numeric(col.as_primitive::<Int8Type>().value(row) as f64),
        DataType::Int16 => Cell::Numeric(col.as_primitive::<Int16Type>().value(row) as f64),
        DataType::Int32 => Cell::Numeric(col.as_primitive::<Int32Type>().value(row) as f64),
        DataType::Int64 => Cell::Numeric(col.as_primitive::<Int64Type>().value(row) as f64),
        DataType::UInt8 => Cell::Numeric(col.as_primitive::<UInt8Type>().value(row) as f64),
        DataType::UInt16 => Cell::Numeric(col.as_primitive::<UInt16Type>().value(row) as f64),
        DataType::UInt32 => Cell::Numeric(col.as_primitive::<UInt32Type>().value(row) as f64),
        DataType::UInt64 => Cell::Numeric(col.as_primitive::<UInt64Type>().value(row) as f64),
        DataType::Float32 => Cell::number(col.as_primitive::<Float32Type>().value(row) as f64),
        DataType::Float64 => Cell::number(col.as_primitive::<Float64Type>().value(row)),
        DataType::Boolean => Cell::Text(col.as_boolean().value(row).to_string()),
        other => bail!("unsupported column type {other:?}"),
    };
    Ok(cell)
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;
    use crate::data::model::{MOBILITY_METRICS, SentinelCode};

    const HEADER: &str = ",Deep Squat,Hurdle Step,Inline lunge,Shoulder mobility DA,\
Shoulder mobility NDA,Leg Raise DA,Leg Raise NDA,TS Push Up,Rotary Stability,\
CM Jump (cm),Squat Jump (cm)";

    fn write_file(dir: &tempfile::TempDir, name: &str, contents: &str) -> PathBuf {
        let path = dir.path().join(name);
        let mut f = std::fs::File::create(&path).unwrap();
        f.write_all(contents.as_bytes()).unwrap();
        path
    }

    fn fixture_path() -> PathBuf {
        Path::new(env!("CARGO_MANIFEST_DIR")).join("fixtures/physical_tests.xlsx")
    }

    #[test]
    fn test_load_xlsx_fixture() {
        let table = load_table(&fixture_path()).unwrap();

        assert_eq!(table.columns[0], "Name");
        assert_eq!(table.athlete_names(), vec!["Ana", "Bia", "Carla", "Duda"]);

        let ana = &table.rows[0];
        let scores: Vec<f64> = MOBILITY_METRICS
            .iter()
            .map(|m| ana.number(m).unwrap())
            .collect();
        assert_eq!(scores, vec![2.0, 3.0, 2.0, 1.0, 1.0, 2.0, 2.0, 3.0, 2.0]);
        assert_eq!(ana.number("CM Jump (cm)"), Some(25.3));

        assert_eq!(
            table.rows[1].cell("CM Jump (cm)"),
            Some(&Cell::Sentinel(SentinelCode::DidNotParticipate))
        );
        assert_eq!(
            table.rows[3].cell("Squat Jump (cm)"),
            Some(&Cell::Sentinel(SentinelCode::Injured))
        );
    }

    #[test]
    fn test_load_is_deterministic() {
        let first = load_table(&fixture_path()).unwrap();
        let second = load_table(&fixture_path()).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_load_csv_renames_first_column() {
        let dir = tempfile::tempdir().unwrap();
        let body = format!(
            "{}\nAna,2,3,2,1,1,2,2,3,2,25.3,24.1\nBia,1,2,2,2,2,3,3,1,2,NP,22.0\n",
            HEADER.replacen(',', "Athlete,", 1)
        );
        let path = write_file(&dir, "tests.csv", &body);

        let table = load_table(&path).unwrap();
        assert_eq!(table.columns[0], "Name");
        assert!(!table.has_column("Athlete"));
        assert_eq!(table.len(), 2);
        assert_eq!(
            table.rows[1].cell("CM Jump (cm)"),
            Some(&Cell::Sentinel(SentinelCode::DidNotParticipate))
        );
    }

    #[test]
    fn test_load_json_keeps_column_order() {
        let dir = tempfile::tempdir().unwrap();
        let mut record = serde_json::Map::new();
        record.insert("Athlete".into(), JsonValue::from("Ana"));
        for m in MOBILITY_METRICS {
            record.insert(m.into(), JsonValue::from(2));
        }
        record.insert("CM Jump (cm)".into(), JsonValue::from(25.3));
        record.insert("Squat Jump (cm)".into(), JsonValue::from("L"));
        let body = serde_json::to_string(&vec![JsonValue::Object(record)]).unwrap();
        let path = write_file(&dir, "tests.json", &body);

        let table = load_table(&path).unwrap();
        assert_eq!(table.rows[0].name, "Ana");
        assert_eq!(table.columns[1], "Deep Squat");
        assert_eq!(
            table.rows[0].cell("Squat Jump (cm)"),
            Some(&Cell::Sentinel(SentinelCode::Injured))
        );
    }

    fn write_parquet(
        dir: &tempfile::TempDir,
        name_column: ArrayRef,
        cm_jump: ArrayRef,
        squat_jump: ArrayRef,
    ) -> PathBuf {
        use arrow::array::Int64Array;
        use arrow::datatypes::{Field, Schema};
        use arrow::record_batch::RecordBatch;
        use parquet::arrow::ArrowWriter;

        let rows = name_column.len();
        let mut fields = vec![Field::new("", name_column.data_type().clone(), false)];
        let mut columns = vec![name_column];
        for (i, m) in MOBILITY_METRICS.into_iter().enumerate() {
            fields.push(Field::new(m, DataType::Int64, false));
            columns.push(Arc::new(Int64Array::from(vec![2 + (i as i64 % 2); rows])));
        }
        fields.push(Field::new("CM Jump (cm)", cm_jump.data_type().clone(), true));
        columns.push(cm_jump);
        fields.push(Field::new("Squat Jump (cm)", squat_jump.data_type().clone(), true));
        columns.push(squat_jump);
        let schema = Arc::new(Schema::new(fields));
        let batch = RecordBatch::try_new(schema.clone(), columns).unwrap();

        let path = dir.path().join("tests.parquet");
        let mut writer =
            ArrowWriter::try_new(std::fs::File::create(&path).unwrap(), schema, None).unwrap();
        writer.write(&batch).unwrap();
        writer.close().unwrap();
        path
    }

    #[test]
    fn test_load_parquet_flat_columns() {
        use arrow::array::{Float64Array, StringArray};

        let dir = tempfile::tempdir().unwrap();
        let path = write_parquet(
            &dir,
            Arc::new(StringArray::from(vec!["Ana", "Bia"])),
            Arc::new(StringArray::from(vec!["25.3", "NP"])),
            Arc::new(Float64Array::from(vec![Some(24.1), None])),
        );

        let table = load_table(&path).unwrap();
        assert_eq!(table.athlete_names(), vec!["Ana", "Bia"]);
        assert_eq!(table.rows[1].number("Hurdle Step"), Some(3.0));
        assert_eq!(table.rows[0].number("CM Jump (cm)"), Some(25.3));
        assert_eq!(
            table.rows[1].cell("CM Jump (cm)"),
            Some(&Cell::Sentinel(SentinelCode::DidNotParticipate))
        );
        assert_eq!(table.rows[1].cell("Squat Jump (cm)"), Some(&Cell::Empty));
    }

    #[test]
    fn test_parquet_nan_is_not_a_jump_height() {
        use arrow::array::{Float64Array, StringArray};

        use crate::view::DashboardView;

        let dir = tempfile::tempdir().unwrap();
        let path = write_parquet(
            &dir,
            Arc::new(StringArray::from(vec!["Ana", "Bia"])),
            Arc::new(Float64Array::from(vec![25.3, f64::NAN])),
            Arc::new(Float64Array::from(vec![24.1, 22.0])),
        );

        let table = load_table(&path).unwrap();
        assert_eq!(table.rows[1].number("CM Jump (cm)"), None);

        let view = DashboardView::build(&table, "Ana");
        assert_eq!(view.jumps.athletes, vec!["Ana"]);
        for summary in &view.stats {
            for (_, value) in summary.rows() {
                assert!(!value.contains("NaN"), "{value}");
            }
        }
        assert_eq!(view.stats[0].rows()[2], ("Average", "25.3 cm".to_string()));
    }

    #[test]
    fn test_parquet_view_and_dictionary_strings() {
        use arrow::array::{DictionaryArray, StringViewArray};
        use arrow::datatypes::Int32Type;

        let dir = tempfile::tempdir().unwrap();
        let names: DictionaryArray<Int32Type> = vec!["Ana", "Bia"].into_iter().collect();
        let path = write_parquet(
            &dir,
            Arc::new(names),
            Arc::new(StringViewArray::from(vec!["25.3", "L"])),
            Arc::new(StringViewArray::from(vec!["24.1", "22.0"])),
        );

        let table = load_table(&path).unwrap();
        assert_eq!(table.athlete_names(), vec!["Ana", "Bia"]);
        assert_eq!(table.rows[0].number("CM Jump (cm)"), Some(25.3));
        assert_eq!(
            table.rows[1].cell("CM Jump (cm)"),
            Some(&Cell::Sentinel(SentinelCode::Injured))
        );
    }

    #[test]
    fn test_missing_required_column() {
        let dir = tempfile::tempdir().unwrap();
        let header = HEADER.replace(",Rotary Stability", "");
        let body = format!("{header}\nAna,2,3,2,1,1,2,2,3,25.3,24.1\n");
        let path = write_file(&dir, "tests.csv", &body);

        match load_table(&path) {
            Err(LoadError::MissingColumn { column, .. }) => assert_eq!(column, "Rotary Stability"),
            other => panic!("expected MissingColumn, got {other:?}"),
        }
    }

    #[test]
    fn test_missing_file_is_unreadable() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_table(&dir.path().join("absent.xlsx")).unwrap_err();
        assert!(matches!(err, LoadError::Unreadable { .. }));
    }

    #[test]
    fn test_unsupported_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(&dir, "tests.txt", "nothing");
        let err = load_table(&path).unwrap_err();
        assert!(matches!(err, LoadError::UnsupportedFormat { extension, .. } if extension == "txt"));
    }

    #[test]
    fn test_header_only_file_has_no_rows() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(&dir, "tests.csv", &format!("{HEADER}\n"));
        assert!(matches!(load_table(&path), Err(LoadError::NoRows { .. })));
    }
}
