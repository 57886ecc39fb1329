//! CSV → Arrow table.
//!
//! The whole file is read into column-major cells first, then each column
//! gets a type from [`infer_type`] and is materialized with the matching
//! Arrow builder.
//!
//! Inference, per column over its non-null cells:
//! 1. every cell parses as `i64` → `Int64` (`"007"` becomes `7`)
//! 2. else every cell parses as `u64` → `UInt64`
//! 3. else every cell is integer-shaped (too large for both) → `Utf8`
//! 4. else every cell parses as `f64` → `Float64`
//! 5. else every cell is a boolean literal → `Boolean`
//! 6. else `Utf8`
//!
//! A column without a single non-null cell is `Utf8`.

use crate::error::ReadError;
use arrow::{
    array::{
        ArrayRef, BooleanBuilder, Float64Builder, Int64Builder, RecordBatch, StringBuilder,
        UInt64Builder,
    },
    datatypes::{DataType, Field, Schema},
};
use std::{
    collections::{HashMap, HashSet},
    fs::File,
    io::Read,
    path::Path,
    sync::Arc,
};
use tracing::{debug, info};

/// Cell texts read as null.
const NA_VALUES: &[&str] = &[
    "", "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

fn is_na(cell: &str) -> bool {
    NA_VALUES.contains(&cell)
}

fn parse_bool(cell: &str) -> Option<bool> {
    match cell {
        "True" | "TRUE" | "true" => Some(true),
        "False" | "FALSE" | "false" => Some(false),
        _ => None,
    }
}

// Optional sign followed by ASCII digits only
fn is_integer_shaped(cell: &str) -> bool {
    let digits = cell.strip_prefix(|c: char| c == '+' || c == '-').unwrap_or(cell);
    !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit())
}

fn infer_type(cells: &[Option<String>]) -> DataType {
    let values: Vec<&str> = cells.iter().flatten().map(String::as_str).collect();

    if values.is_empty() {
        DataType::Utf8
    } else if values.iter().all(|v| v.parse::<i64>().is_ok()) {
        DataType::Int64
    } else if values.iter().all(|v| v.parse::<u64>().is_ok()) {
        DataType::UInt64
    } else if values.iter().all(|v| is_integer_shaped(v)) {
        DataType::Utf8
    } else if values.iter().all(|v| v.parse::<f64>().is_ok()) {
        DataType::Float64
    } else if values.iter().all(|v| parse_bool(v).is_some()) {
        DataType::Boolean
    } else {
        DataType::Utf8
    }
}

/// Empty names become `Unnamed: <index>`, repeats get a `.N` suffix.
fn normalize_headers<'a>(headers: impl IntoIterator<Item = &'a str>) -> Vec<String> {
    let raw: Vec<String> = headers
        .into_iter()
        .enumerate()
        .map(|(index, name)| {
            if name.is_empty() {
                format!("Unnamed: {index}")
            } else {
                name.to_owned()
            }
        })
        .collect();

    let mut taken: HashSet<String> = raw.iter().cloned().collect();
    let mut seen: HashSet<&str> = HashSet::new();
    let mut suffixes: HashMap<&str, usize> = HashMap::new();
    let mut names = Vec::with_capacity(raw.len());

    for name in &raw {
        if seen.insert(name.as_str()) {
            names.push(name.clone());
            continue;
        }
        let suffix = suffixes.entry(name.as_str()).or_insert(0);
        loop {
            *suffix += 1;
            let candidate = format!("{name}.{suffix}");
            if taken.insert(candidate.clone()) {
                names.push(candidate);
                break;
            }
        }
    }
    names
}

// One Arrow builder per inferred type
#[derive(Debug)]
enum ColumnBuilder {
    Int64(Int64Builder),
    UInt64(UInt64Builder),
    Float64(Float64Builder),
    Boolean(BooleanBuilder),
    Utf8(StringBuilder),
}

impl ColumnBuilder {
    fn new(data_type: &DataType, capacity: usize) -> Self {
        match data_type {
            DataType::Int64 => ColumnBuilder::Int64(Int64Builder::with_capacity(capacity)),
            DataType::UInt64 => ColumnBuilder::UInt64(UInt64Builder::with_capacity(capacity)),
            DataType::Float64 => ColumnBuilder::Float64(Float64Builder::with_capacity(capacity)),
            DataType::Boolean => ColumnBuilder::Boolean(BooleanBuilder::with_capacity(capacity)),
            _ => ColumnBuilder::Utf8(StringBuilder::with_capacity(capacity, capacity * 8)),
        }
    }

    fn append(&mut self, cell: Option<&str>) {
        match self {
            ColumnBuilder::Int64(builder) => {
                builder.append_option(cell.and_then(|c| c.parse::<i64>().ok()))
            }
            ColumnBuilder::UInt64(builder) => {
                builder.append_option(cell.and_then(|c| c.parse::<u64>().ok()))
            }
            ColumnBuilder::Float64(builder) => {
                builder.append_option(cell.and_then(|c| c.parse::<f64>().ok()))
            }
            ColumnBuilder::Boolean(builder) => builder.append_option(cell.and_then(parse_bool)),
            ColumnBuilder::Utf8(builder) => builder.append_option(cell),
        }
    }

    fn finish(&mut self) -> ArrayRef {
        match self {
            ColumnBuilder::Int64(builder) => Arc::new(builder.finish()),
            ColumnBuilder::UInt64(builder) => Arc::new(builder.finish()),
            ColumnBuilder::Float64(builder) => Arc::new(builder.finish()),
            ColumnBuilder::Boolean(builder) => Arc::new(builder.finish()),
            ColumnBuilder::Utf8(builder) => Arc::new(builder.finish()),
        }
    }
}

impl<'a> Extend<Option<&'a str>> for ColumnBuilder {
    fn extend<T: IntoIterator<Item = Option<&'a str>>>(&mut self, iter: T) {
        iter.into_iter().for_each(|cell| self.append(cell));
    }
}

/// Reads the CSV file at `path` into a single [`RecordBatch`].
pub fn read_csv(path: &Path) -> Result<RecordBatch, ReadError> {
    let file = File::open(path).map_err(|err| ReadError::io(path, err))?;
    let batch = read_csv_from(file)?;
    info!(
        path = %path.display(),
        rows = batch.num_rows(),
        columns = batch.num_columns(),
        "read csv"
    );
    Ok(batch)
}

/// Reads comma-delimited CSV with a header line from any reader.
///
/// Rows shorter than the header are padded with nulls; longer rows are an
/// error.
pub fn read_csv_from<R: Read>(reader: R) -> Result<RecordBatch, ReadError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let headers = csv_reader.headers()?.clone();
    if headers.is_empty() {
        return Err(ReadError::NoColumns);
    }
    let width = headers.len();

    let mut cells: Vec<Vec<Option<String>>> = vec![Vec::new(); width];
    for (index, record) in csv_reader.records().enumerate() {
        let record = record?;
        if record.len() > width {
            let line = record
                .position()
                .map(|position| position.line())
                .unwrap_or(index as u64 + 2);
            return Err(ReadError::TooManyFields {
                line,
                expected: width,
                found: record.len(),
            });
        }
        for (column, column_cells) in cells.iter_mut().enumerate() {
            let cell = record.get(column).filter(|cell| !is_na(cell));
            column_cells.push(cell.map(str::to_owned));
        }
    }

    let names = normalize_headers(headers.iter());
    let mut fields = Vec::with_capacity(width);
    let mut columns = Vec::with_capacity(width);

    for (name, column_cells) in names.into_iter().zip(&cells) {
        let data_type = infer_type(column_cells);
        debug!(column = %name, data_type = %data_type, "inferred column type");

        let mut builder = ColumnBuilder::new(&data_type, column_cells.len());
        builder.extend(column_cells.iter().map(Option::as_deref));
        columns.push(builder.finish());
        fields.push(Field::new(name, data_type, true));
    }

    let batch = RecordBatch::try_new(Arc::new(Schema::new(fields)), columns)?;
    Ok(batch)
}
