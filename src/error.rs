use std::{
    error::Error,
    fmt, io,
    path::{Path, PathBuf},
};

use arrow::error::ArrowError;
use parquet::errors::ParquetError;

/// Raised before any file is touched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UsageError {
    WrongArgumentCount,
    InputExtension,
    OutputExtension,
}

impl fmt::Display for UsageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UsageError::WrongArgumentCount => write!(
                f,
                "Usage: csv2parquet <input_file> <output_file>\n\
                 Example: csv2parquet input.csv output.parquet"
            ),
            UsageError::InputExtension => write!(f, "Error: Input file must be a .csv file."),
            UsageError::OutputExtension => {
                write!(f, "Error: Output file must be a .parquet file.")
            }
        }
    }
}

impl Error for UsageError {}

/// Failure while turning the CSV file into a table.
#[derive(Debug)]
pub enum ReadError {
    Io { path: PathBuf, source: io::Error },
    Csv(csv::Error),
    TooManyFields {
        line: u64,
        expected: usize,
        found: usize,
    },
    NoColumns,
    Arrow(ArrowError),
}

impl ReadError {
    pub(crate) fn io(path: &Path, source: io::Error) -> Self {
        ReadError::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

impl fmt::Display for ReadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReadError::Io { path, source } => write!(f, "{}: {}", path.display(), source),
            ReadError::Csv(err) => write!(f, "{err}"),
            ReadError::TooManyFields {
                line,
                expected,
                found,
            } => write!(f, "Expected {expected} fields in line {line}, saw {found}"),
            ReadError::NoColumns => write!(f, "No columns to parse from file"),
            ReadError::Arrow(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ReadError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            ReadError::Io { source, .. } => Some(source),
            ReadError::Csv(err) => Some(err),
            ReadError::Arrow(err) => Some(err),
            ReadError::TooManyFields { .. } | ReadError::NoColumns => None,
        }
    }
}

impl From<csv::Error> for ReadError {
    fn from(err: csv::Error) -> Self {
        ReadError::Csv(err)
    }
}

impl From<ArrowError> for ReadError {
    fn from(err: ArrowError) -> Self {
        ReadError::Arrow(err)
    }
}

/// Failure while serializing the table to Parquet.
#[derive(Debug)]
pub enum WriteError {
    Io { path: PathBuf, source: io::Error },
    Parquet(ParquetError),
}

impl WriteError {
    pub(crate) fn io(path: &Path, source: io::Error) -> Self {
        WriteError::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

impl fmt::Display for WriteError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WriteError::Io { path, source } => write!(f, "{}: {}", path.display(), source),
            WriteError::Parquet(err) => write!(f, "{err}"),
        }
    }
}

impl Error for WriteError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            WriteError::Io { source, .. } => Some(source),
            WriteError::Parquet(err) => Some(err),
        }
    }
}

impl From<ParquetError> for WriteError {
    fn from(err: ParquetError) -> Self {
        WriteError::Parquet(err)
    }
}

/// Any failure of a conversion run. Each one ends the process.
#[derive(Debug)]
pub enum ConvertError {
    Usage(UsageError),
    Read(ReadError),
    Write(WriteError),
}

impl ConvertError {
    pub fn exit_code(&self) -> u8 {
        1
    }
}

impl fmt::Display for ConvertError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConvertError::Usage(err) => write!(f, "{err}"),
            ConvertError::Read(err) => write!(f, "Error reading input file: {err}"),
            ConvertError::Write(err) => write!(f, "Error saving Parquet file: {err}"),
        }
    }
}

impl Error for ConvertError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            ConvertError::Usage(err) => Some(err),
            ConvertError::Read(err) => Some(err),
            ConvertError::Write(err) => Some(err),
        }
    }
}

impl From<UsageError> for ConvertError {
    fn from(err: UsageError) -> Self {
        ConvertError::Usage(err)
    }
}

impl From<ReadError> for ConvertError {
    fn from(err: ReadError) -> Self {
        ConvertError::Read(err)
    }
}

impl From<WriteError> for ConvertError {
    fn from(err: WriteError) -> Self {
        ConvertError::Write(err)
    }
}
