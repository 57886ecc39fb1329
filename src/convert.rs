use crate::{
    cli::ConvertArgs,
    error::{ConvertError, WriteError},
    table,
};
use arrow::array::RecordBatch;
use parquet::{arrow::ArrowWriter, basic::Compression, file::properties::WriterProperties};
use std::{fs::File, path::Path};
use tracing::info;

// Everything lands in one row group
fn writer_properties(num_rows: usize) -> WriterProperties {
    WriterProperties::builder()
        .set_compression(Compression::SNAPPY)
        .set_max_row_group_size(num_rows.max(1))
        .build()
}

/// Writes `batch` to `path` as Parquet and returns the number of rows written.
///
/// The output file is created (or truncated) before encoding starts, so a
/// failed write can leave a partial file behind.
pub fn write_parquet(batch: &RecordBatch, path: &Path) -> Result<usize, WriteError> {
    let parquet = File::create(path).map_err(|err| WriteError::io(path, err))?;

    let properties = writer_properties(batch.num_rows());
    let mut writer = ArrowWriter::try_new(parquet, batch.schema(), Some(properties))?;
    writer.write(batch)?;
    writer.close()?;

    info!(path = %path.display(), rows = batch.num_rows(), "wrote parquet");
    Ok(batch.num_rows())
}

/// Reads `args.input` and writes it to `args.output`.
pub fn convert_csv_to_parquet(args: &ConvertArgs) -> Result<usize, ConvertError> {
    let batch = table::read_csv(&args.input)?;
    let rows = write_parquet(&batch, &args.output)?;
    Ok(rows)
}
