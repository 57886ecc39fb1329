// CLI integration tests: run the built binary end to end.
use std::{
    fs::{self, File},
    path::Path,
    process::{Command, Output},
};

use arrow::{array::RecordBatch, json::ArrayWriter};
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde_json::{json, Value};

const USAGE: &str = "Usage: csv2parquet <input_file> <output_file>\n\
                     Example: csv2parquet input.csv output.parquet\n";

fn cmd() -> Command {
    let exe = env!("CARGO_BIN_EXE_csv2parquet");
    Command::new(exe)
}

fn run(args: &[&str]) -> Output {
    cmd().args(args).output().expect("run csv2parquet")
}

fn stdout(output: &Output) -> String {
    String::from_utf8(output.stdout.clone()).expect("utf8 stdout")
}

fn read_rows(path: &Path) -> Value {
    let reader = ParquetRecordBatchReaderBuilder::try_new(File::open(path).expect("open"))
        .expect("parquet reader")
        .build()
        .expect("build reader");
    let batches: Vec<RecordBatch> = reader.collect::<Result<_, _>>().expect("batches");

    let mut writer = ArrayWriter::new(Vec::new());
    let refs: Vec<&RecordBatch> = batches.iter().collect();
    writer.write_batches(&refs).expect("json rows");
    writer.finish().expect("finish json");
    let bytes = writer.into_inner();
    if bytes.is_empty() {
        return json!([]);
    }
    serde_json::from_slice(&bytes).expect("valid json")
}

#[test]
fn converts_category_criterion_csv() {
    let temp = tempfile::tempdir().expect("tempdir");
    let input = temp.path().join("criteria.csv");
    let output = temp.path().join("criteria.parquet");
    fs::write(
        &input,
        "Category,Criterion\nSize,Large\nSize,Medium\nColor,Red\n",
    )
    .expect("write csv");

    let result = run(&[input.to_str().unwrap(), output.to_str().unwrap()]);
    assert_eq!(result.status.code(), Some(0));
    assert_eq!(
        stdout(&result),
        format!(
            "Successfully created Parquet file: {}\n",
            output.to_str().unwrap()
        )
    );

    assert_eq!(
        read_rows(&output),
        json!([
            {"Category": "Size", "Criterion": "Large"},
            {"Category": "Size", "Criterion": "Medium"},
            {"Category": "Color", "Criterion": "Red"},
        ])
    );
}

#[test]
fn numeric_columns_are_written_as_numbers() {
    let temp = tempfile::tempdir().expect("tempdir");
    let input = temp.path().join("scores.csv");
    let output = temp.path().join("scores.parquet");
    fs::write(&input, "id,score,label\n007,1.5,a\n2,,b\n").expect("write csv");

    let result = run(&[input.to_str().unwrap(), output.to_str().unwrap()]);
    assert!(result.status.success());

    assert_eq!(
        read_rows(&output),
        json!([
            {"id": 7, "score": 1.5, "label": "a"},
            {"id": 2, "label": "b"},
        ])
    );
}

#[test]
fn wrong_argument_count_prints_usage() {
    let temp = tempfile::tempdir().expect("tempdir");
    let output = temp.path().join("out.parquet");

    for args in [
        vec![],
        vec!["in.csv"],
        vec!["in.csv", output.to_str().unwrap(), "extra"],
    ] {
        let result = run(&args);
        assert_eq!(result.status.code(), Some(1), "args: {args:?}");
        assert_eq!(stdout(&result), USAGE);
    }
    assert!(!output.exists());
}

#[test]
fn rejects_input_without_csv_suffix() {
    let temp = tempfile::tempdir().expect("tempdir");
    let input = temp.path().join("input.txt");
    let output = temp.path().join("out.parquet");
    fs::write(&input, "a\n1\n").expect("write input");

    let result = run(&[input.to_str().unwrap(), output.to_str().unwrap()]);
    assert_eq!(result.status.code(), Some(1));
    assert_eq!(stdout(&result), "Error: Input file must be a .csv file.\n");
    assert!(!output.exists());
}

#[test]
fn rejects_output_without_parquet_suffix() {
    let temp = tempfile::tempdir().expect("tempdir");
    let input = temp.path().join("input.csv");
    let output = temp.path().join("out.pq");
    fs::write(&input, "a\n1\n").expect("write input");

    let result = run(&[input.to_str().unwrap(), output.to_str().unwrap()]);
    assert_eq!(result.status.code(), Some(1));
    assert_eq!(stdout(&result), "Error: Output file must be a .parquet file.\n");
    assert!(!output.exists());
}

#[test]
fn missing_input_reports_read_error() {
    let temp = tempfile::tempdir().expect("tempdir");
    let input = temp.path().join("missing.csv");
    let output = temp.path().join("out.parquet");

    let result = run(&[input.to_str().unwrap(), output.to_str().unwrap()]);
    assert_eq!(result.status.code(), Some(1));
    assert!(stdout(&result).starts_with("Error reading input file: "));
    assert!(!output.exists());
}

#[test]
fn ragged_csv_reports_read_error() {
    let temp = tempfile::tempdir().expect("tempdir");
    let input = temp.path().join("ragged.csv");
    let output = temp.path().join("out.parquet");
    fs::write(&input, "a,b\n1,2\n3,4,5\n").expect("write csv");

    let result = run(&[input.to_str().unwrap(), output.to_str().unwrap()]);
    assert_eq!(result.status.code(), Some(1));
    assert_eq!(
        stdout(&result),
        "Error reading input file: Expected 2 fields in line 3, saw 3\n"
    );
    assert!(!output.exists());
}

#[test]
fn unwritable_output_reports_write_error() {
    let temp = tempfile::tempdir().expect("tempdir");
    let input = temp.path().join("input.csv");
    let output = temp.path().join("missing-dir").join("out.parquet");
    fs::write(&input, "a\n1\n").expect("write csv");

    let result = run(&[input.to_str().unwrap(), output.to_str().unwrap()]);
    assert_eq!(result.status.code(), Some(1));
    assert!(stdout(&result).starts_with("Error saving Parquet file: "));
}

#[test]
fn help_and_version_flags_are_usage_errors() {
    for flag in ["--help", "-h", "-V", "--version"] {
        let result = run(&[flag]);
        assert_eq!(result.status.code(), Some(1), "flag: {flag}");
        assert_eq!(stdout(&result), USAGE);
    }
}

#[test]
fn help_flag_in_output_position_is_a_path() {
    let result = run(&["in.csv", "-h"]);
    assert_eq!(result.status.code(), Some(1));
    assert_eq!(stdout(&result), "Error: Output file must be a .parquet file.\n");
}

#[test]
fn double_dash_counts_as_an_argument() {
    let temp = tempfile::tempdir().expect("tempdir");
    let input = temp.path().join("input.csv");
    let output = temp.path().join("out.parquet");
    fs::write(&input, "a\n1\n").expect("write csv");

    let result = run(&["--", input.to_str().unwrap(), output.to_str().unwrap()]);
    assert_eq!(result.status.code(), Some(1));
    assert_eq!(stdout(&result), USAGE);
    assert!(!output.exists());
}

#[test]
fn converts_input_named_with_leading_hyphen() {
    let temp = tempfile::tempdir().expect("tempdir");
    fs::write(temp.path().join("-data.csv"), "Category,Criterion\nSize,Large\n")
        .expect("write csv");

    let result = cmd()
        .current_dir(temp.path())
        .args(["-data.csv", "out.parquet"])
        .output()
        .expect("run csv2parquet");
    assert_eq!(result.status.code(), Some(0));
    assert_eq!(
        stdout(&result),
        "Successfully created Parquet file: out.parquet\n"
    );
    assert_eq!(
        read_rows(&temp.path().join("out.parquet")),
        json!([{"Category": "Size", "Criterion": "Large"}])
    );
}
