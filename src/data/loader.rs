use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result, bail};
use arrow::array::{Array, AsArray, Float64Array};
use arrow::compute::cast;
use arrow::datatypes::{DataType, Float64Type};
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde_json::Value as JsonValue;
use thiserror::Error;

use super::model::{MAX_AGE, MIN_AGE, PlayerDataset, Record};

/// Columns every input file must provide, in `Record` field order.
pub const REQUIRED_COLUMNS: [&str; 5] = ["age", "gp", "pts", "reb", "ast"];

// ---------------------------------------------------------------------------
// Row sanitization
// ---------------------------------------------------------------------------

/// Why a single row was left out of the dataset.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RowRejection {
    #[error("row is not a record")]
    Malformed,
    #[error("missing value for '{0}'")]
    MissingField(&'static str),
    #[error("'{0}' is not a finite number")]
    NotNumeric(&'static str),
    #[error("age {0} is outside [18, 45]")]
    AgeOutOfRange(f64),
}

/// Numeric reading of one textual cell: blank is 0, anything unparseable
/// is NaN. Surrounding whitespace is ignored.
fn coerce_cell(text: &str) -> f64 {
    let text = text.trim();
    if text.is_empty() {
        return 0.0;
    }
    text.parse::<f64>().unwrap_or(f64::NAN)
}

/// Validate cell values (in `REQUIRED_COLUMNS` order, `None` = absent) into
/// a record.
///
/// Only `age` and `gp` can reject a row. Metric cells that are absent or
/// non-numeric are kept as NaN and skipped when that metric is averaged.
fn build_record(values: [Option<f64>; 5]) -> Result<Record, RowRejection> {
    let [age, games_played, points, rebounds, assists] = values;

    let age = age.ok_or(RowRejection::MissingField("age"))?;
    let games_played = games_played.ok_or(RowRejection::MissingField("gp"))?;
    if !age.is_finite() {
        return Err(RowRejection::NotNumeric("age"));
    }
    if !games_played.is_finite() {
        return Err(RowRejection::NotNumeric("gp"));
    }
    if !(MIN_AGE..=MAX_AGE).contains(&age) {
        return Err(RowRejection::AgeOutOfRange(age));
    }

    Ok(Record {
        age,
        games_played,
        points: points.unwrap_or(f64::NAN),
        rebounds: rebounds.unwrap_or(f64::NAN),
        assists: assists.unwrap_or(f64::NAN),
    })
}

/// Collects accepted records and counts rejected rows.
#[derive(Default)]
struct RowSink {
    records: Vec<Record>,
    rows_read: usize,
    rows_rejected: usize,
}

impl RowSink {
    fn push(&mut self, row: usize, outcome: Result<Record, RowRejection>) {
        self.rows_read += 1;
        match outcome {
            Ok(record) => self.records.push(record),
            Err(reason) => {
                log::debug!("Skipping row {row}: {reason}");
                self.rows_rejected += 1;
            }
        }
    }

    fn finish(self) -> PlayerDataset {
        PlayerDataset {
            records: self.records,
            rows_read: self.rows_read,
            rows_rejected: self.rows_rejected,
            source: None,
        }
    }
}

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load player seasons from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv`     – header row with at least `age, gp, pts, reb, ast`
/// * `.json`    – `[{ "age": 25, "gp": 70, "pts": 12.1, ... }, ...]`
/// * `.parquet` – numeric columns with the same names
///
/// Rows without a usable `age` / `gp` or outside the age bounds are
/// skipped; a missing required column fails the whole load.
pub fn load_file(path: &Path) -> Result<PlayerDataset> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let mut dataset = match ext.as_str() {
        "csv" => {
            let reader = csv::ReaderBuilder::new()
                .flexible(true)
                .from_path(path)
                .context("opening CSV")?;
            load_csv(reader)?
        }
        "json" => load_json(path)?,
        "parquet" | "pq" => load_parquet(path)?,
        other => bail!("Unsupported file extension: .{other}"),
    };
    dataset.source = Some(path.to_path_buf());
    Ok(dataset)
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// CSV layout: header row with column names; the required columns may
/// appear in any order alongside any number of others.
///
/// Only the required cells are decoded, so undecodable text elsewhere in a
/// row does not affect it.
pub fn load_csv<R: Read>(mut reader: csv::Reader<R>) -> Result<PlayerDataset> {
    let headers = reader.byte_headers().context("reading CSV headers")?.clone();

    let mut indices = [0usize; 5];
    for (slot, name) in indices.iter_mut().zip(REQUIRED_COLUMNS) {
        *slot = headers
            .iter()
            .position(|h| String::from_utf8_lossy(h).trim() == name)
            .with_context(|| format!("CSV missing '{name}' column"))?;
    }

    let mut sink = RowSink::default();
    for (row_no, result) in reader.byte_records().enumerate() {
        let record = result.with_context(|| format!("CSV row {row_no}"))?;
        sink.push(row_no, csv_row(&record, &indices));
    }

    Ok(sink.finish())
}

fn csv_row(record: &csv::ByteRecord, indices: &[usize; 5]) -> Result<Record, RowRejection> {
    let mut values = [None; 5];
    for (v, &idx) in values.iter_mut().zip(indices) {
        *v = record.get(idx).map(|bytes| match std::str::from_utf8(bytes) {
            Ok(text) => coerce_cell(text),
            Err(_) => f64::NAN,
        });
    }
    build_record(values)
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Expected JSON schema (records-oriented, the default `df.to_json(orient='records')`):
///
/// ```json
/// [
///   { "player_name": "…", "age": 25, "gp": 70, "pts": 12.1, "reb": 4.0, "ast": 2.2 },
///   ...
/// ]
/// ```
fn load_json(path: &Path) -> Result<PlayerDataset> {
    let text = std::fs::read_to_string(path).context("reading JSON file")?;
    parse_json(&text)
}

fn parse_json(text: &str) -> Result<PlayerDataset> {
    let root: JsonValue = serde_json::from_str(text).context("parsing JSON")?;
    let rows = root
        .as_array()
        .context("Expected top-level JSON array")?;

    let mut sink = RowSink::default();
    for (i, row) in rows.iter().enumerate() {
        sink.push(i, json_row(row));
    }
    Ok(sink.finish())
}

/// `null` counts as absent; strings go through the same coercion as CSV cells.
fn json_row(row: &JsonValue) -> Result<Record, RowRejection> {
    let obj = row.as_object().ok_or(RowRejection::Malformed)?;
    let mut values = [None; 5];
    for (v, column) in values.iter_mut().zip(REQUIRED_COLUMNS) {
        *v = match obj.get(column) {
            None | Some(JsonValue::Null) => None,
            Some(JsonValue::Number(n)) => Some(n.as_f64().unwrap_or(f64::NAN)),
            Some(JsonValue::String(s)) => Some(coerce_cell(s)),
            Some(_) => Some(f64::NAN),
        };
    }
    build_record(values)
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a Parquet file of player seasons.
///
/// The required columns may be any integer, float or numeric-string type;
/// they are cast to Float64 and a null (or unparseable string) counts as an
/// absent cell.
/// Works with files written by both **Pandas** and **Polars**.
fn load_parquet(path: &Path) -> Result<PlayerDataset> {
    let file = std::fs::File::open(path).context("opening parquet file")?;
    let builder = ParquetRecordBatchReaderBuilder::try_new(file)
        .context("reading parquet metadata")?;
    let reader = builder.build().context("building parquet reader")?;

    let mut sink = RowSink::default();
    let mut row_offset = 0;

    for batch_result in reader {
        let batch = batch_result.context("reading parquet record batch")?;
        let schema = batch.schema();

        let mut columns = Vec::with_capacity(REQUIRED_COLUMNS.len());
        for name in REQUIRED_COLUMNS {
            let idx = schema
                .index_of(name)
                .map_err(|_| anyhow::anyhow!("Parquet file missing '{name}' column"))?;
            let as_f64 = cast(batch.column(idx), &DataType::Float64)
                .with_context(|| format!("column '{name}' is not numeric"))?;
            columns.push(as_f64.as_primitive::<Float64Type>().clone());
        }

        for row in 0..batch.num_rows() {
            sink.push(row_offset + row, parquet_row(&columns, row));
        }
        row_offset += batch.num_rows();
    }

    Ok(sink.finish())
}

fn parquet_row(columns: &[Float64Array], row: usize) -> Result<Record, RowRejection> {
    let mut values = [None; 5];
    for (v, col) in values.iter_mut().zip(columns) {
        *v = (!col.is_null(row)).then(|| col.value(row));
    }
    build_record(values)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use arrow::array::{Int64Array, StringArray};
    use arrow::datatypes::{Field, Schema};
    use arrow::record_batch::RecordBatch;
    use parquet::arrow::ArrowWriter;

    use super::*;
    use crate::data::aggregate::aggregate_by_age;
    use crate::data::model::Metric;

    fn csv_from(text: &str) -> csv::Reader<&[u8]> {
        csv::ReaderBuilder::new()
            .flexible(true)
            .from_reader(text.as_bytes())
    }

    fn csv_from_bytes(bytes: &[u8]) -> csv::Reader<&[u8]> {
        csv::ReaderBuilder::new().flexible(true).from_reader(bytes)
    }

    fn temp_path(name: &str) -> std::path::PathBuf {
        std::env::temp_dir().join(format!("age-curves-{}-{name}", std::process::id()))
    }

    #[test]
    fn csv_keeps_valid_rows_in_any_column_order() {
        let text = "player_name,pts,age,gp,reb,ast\n\
                    A,20.5,25,70,5,3\n\
                    B,10,31,12,8.5,1\n";
        let ds = load_csv(csv_from(text)).unwrap();
        assert_eq!(ds.len(), 2);
        assert_eq!(ds.rows_read, 2);
        assert_eq!(ds.rows_rejected, 0);
        assert_eq!(
            ds.records[0],
            Record {
                age: 25.0,
                games_played: 70.0,
                points: 20.5,
                rebounds: 5.0,
                assists: 3.0,
            }
        );
    }

    #[test]
    fn csv_skips_rows_without_usable_age_or_games() {
        let text = "age,gp,pts,reb,ast\n\
                    17,50,10,2,1\n\
                    46,50,10,2,1\n\
                    abc,50,10,2,1\n\
                    ,50,10,2,1\n\
                    25,x,10,2,1\n\
                    25\n\
                    18,50,10,2,1\n\
                    45,50,10,2,1\n";
        let ds = load_csv(csv_from(text)).unwrap();
        let ages: Vec<f64> = ds.records.iter().map(|r| r.age).collect();
        assert_eq!(ages, vec![18.0, 45.0]);
        assert_eq!(ds.rows_read, 8);
        assert_eq!(ds.rows_rejected, 6);
    }

    #[test]
    fn csv_bad_metric_cells_do_not_drop_the_row() {
        let text = "age,gp,pts,reb,ast\n\
                    25,50,20,5,\n\
                    25,50,10,5,abc\n\
                    30,60,15,4,2\n\
                    31,,12,3,1\n\
                    32,40\n";
        let ds = load_csv(csv_from(text)).unwrap();
        assert_eq!(ds.len(), 5);
        assert_eq!(ds.rows_rejected, 0);

        // Blank reads as 0, junk and absent cells as NaN.
        assert_eq!(ds.records[0].assists, 0.0);
        assert!(ds.records[1].assists.is_nan());
        assert_eq!(ds.records[3].games_played, 0.0);
        assert!(ds.records[4].points.is_nan());

        let points = aggregate_by_age(&ds.records[..3], Metric::Points, 0);
        let pairs: Vec<(f64, f64)> = points.iter().map(|p| (p.age, p.value)).collect();
        assert_eq!(pairs, vec![(25.0, 15.0), (30.0, 15.0)]);
    }

    #[test]
    fn csv_undecodable_cells_are_handled_per_row() {
        let mut bytes = b"player_name,age,gp,pts,reb,ast\n".to_vec();
        bytes.extend_from_slice(b"Nen\xea,30,60,15,4,2\n");
        bytes.extend_from_slice(b"B,31,\xff\xfe,10,3,1\n");
        bytes.extend_from_slice(b"C,24,70,8,2,\xff\n");
        bytes.extend_from_slice(b"D,26,50,11,5,3\n");

        let ds = load_csv(csv_from_bytes(&bytes)).unwrap();
        let ages: Vec<f64> = ds.records.iter().map(|r| r.age).collect();
        assert_eq!(ages, vec![30.0, 24.0, 26.0]);
        assert_eq!(ds.rows_read, 4);
        assert_eq!(ds.rows_rejected, 1);
        assert!(ds.records[1].assists.is_nan());
    }

    #[test]
    fn csv_missing_column_fails() {
        let err = load_csv(csv_from("age,gp,pts,reb\n25,50,10,2\n")).unwrap_err();
        assert!(format!("{err:#}").contains("'ast'"));
    }

    #[test]
    fn rejection_reasons() {
        assert_eq!(coerce_cell("  "), 0.0);
        assert!(coerce_cell("x").is_nan());
        assert_eq!(coerce_cell(" 7.5 "), 7.5);
        assert_eq!(
            build_record([Some(50.0), Some(10.0), Some(1.0), Some(1.0), Some(1.0)]),
            Err(RowRejection::AgeOutOfRange(50.0))
        );
        assert_eq!(
            build_record([Some(20.0), Some(f64::INFINITY), Some(1.0), Some(1.0), Some(1.0)]),
            Err(RowRejection::NotNumeric("gp"))
        );
        assert_eq!(
            build_record([Some(20.0), None, Some(1.0), Some(1.0), Some(1.0)]),
            Err(RowRejection::MissingField("gp"))
        );
        let kept = build_record([Some(20.0), Some(10.0), None, Some(f64::NAN), Some(1.0)]).unwrap();
        assert!(kept.points.is_nan() && kept.rebounds.is_nan());
    }

    #[test]
    fn json_accepts_numbers_and_numeric_strings() {
        let text = r#"[
            {"age": 22, "gp": 60, "pts": 11.5, "reb": 3, "ast": 6},
            {"age": "29", "gp": "40", "pts": "8", "reb": "2", "ast": "1"},
            {"age": 30, "gp": null, "pts": 1, "reb": 1, "ast": 1},
            {"age": 30, "gp": 5, "pts": true, "reb": 1, "ast": 1},
            [1, 2, 3]
        ]"#;
        let ds = parse_json(text).unwrap();
        let ages: Vec<f64> = ds.records.iter().map(|r| r.age).collect();
        assert_eq!(ages, vec![22.0, 29.0, 30.0]);
        assert_eq!(ds.rows_rejected, 2);
        assert!(ds.records[2].points.is_nan());
    }

    #[test]
    fn json_requires_array() {
        assert!(parse_json(r#"{"age": 22}"#).is_err());
    }

    #[test]
    fn load_file_dispatches_by_extension() {
        let path = temp_path("seasons.csv");
        std::fs::write(&path, "age,gp,pts,reb,ast\n24,82,15,4,5\n").unwrap();
        let ds = load_file(&path).unwrap();
        assert_eq!(ds.len(), 1);
        assert_eq!(ds.source.as_deref(), Some(path.as_path()));
        std::fs::remove_file(&path).ok();

        let err = load_file(Path::new("seasons.xlsx")).unwrap_err();
        assert!(err.to_string().contains(".xlsx"));
    }

    #[test]
    fn load_file_missing_file_fails() {
        assert!(load_file(&temp_path("does-not-exist.csv")).is_err());
    }

    #[test]
    fn parquet_casts_integer_columns() {
        let schema = Arc::new(Schema::new(vec![
            Field::new("player_name", DataType::Utf8, false),
            Field::new("age", DataType::Int64, false),
            Field::new("gp", DataType::Int64, true),
            Field::new("pts", DataType::Float64, false),
            Field::new("reb", DataType::Float64, false),
            Field::new("ast", DataType::Float64, false),
        ]));
        let batch = RecordBatch::try_new(
            schema.clone(),
            vec![
                Arc::new(StringArray::from(vec!["A", "B", "C"])),
                Arc::new(Int64Array::from(vec![23, 40, 60])),
                Arc::new(Int64Array::from(vec![Some(70), None, Some(10)])),
                Arc::new(Float64Array::from(vec![18.0, 9.0, 4.0])),
                Arc::new(Float64Array::from(vec![6.0, 3.0, 2.0])),
                Arc::new(Float64Array::from(vec![2.5, 1.0, 0.5])),
            ],
        )
        .unwrap();

        let path = temp_path("seasons.parquet");
        let file = std::fs::File::create(&path).unwrap();
        let mut writer = ArrowWriter::try_new(file, schema, None).unwrap();
        writer.write(&batch).unwrap();
        writer.close().unwrap();

        let ds = load_file(&path).unwrap();
        std::fs::remove_file(&path).ok();

        // B has a null gp, C is too old.
        assert_eq!(ds.rows_read, 3);
        assert_eq!(ds.rows_rejected, 2);
        assert_eq!(ds.records[0].age, 23.0);
        assert_eq!(ds.records[0].games_played, 70.0);
        assert_eq!(ds.records[0].assists, 2.5);
    }
}
