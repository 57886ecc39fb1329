use std::{ffi::OsString, path::PathBuf};

use clap::Parser;

use crate::error::UsageError;

#[derive(Parser)]
#[command(name = "csv2parquet")]
#[command(version = "0.1.0")]
#[command(about = "Converts a CSV file into a Parquet file.", long_about = None)]
#[command(disable_help_flag = true, disable_version_flag = true)]
pub struct Cli {
    /// CSV file to read, header line first
    #[arg(value_name = "INPUT FILE", allow_hyphen_values = true)]
    pub src: PathBuf,

    /// Parquet file to write
    #[arg(value_name = "OUTPUT FILE", allow_hyphen_values = true)]
    pub dst: PathBuf,
}

/// Paths that passed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConvertArgs {
    pub input: PathBuf,
    pub output: PathBuf,
}

impl Cli {
    /// Checks the literal, case-sensitive suffixes. Input is checked first.
    pub fn validate(self) -> Result<ConvertArgs, UsageError> {
        if !self.src.to_string_lossy().ends_with(".csv") {
            return Err(UsageError::InputExtension);
        }
        if !self.dst.to_string_lossy().ends_with(".parquet") {
            return Err(UsageError::OutputExtension);
        }
        Ok(ConvertArgs {
            input: self.src,
            output: self.dst,
        })
    }
}

/// Parses the full argument list, program name included.
///
/// Exactly two arguments must follow the program name. They are taken as
/// paths verbatim, so `--help`, `-h` or `--` are plain (badly suffixed) paths.
pub fn parse_args<I, T>(args: I) -> Result<ConvertArgs, UsageError>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString>,
{
    let args: Vec<OsString> = args.into_iter().map(Into::into).collect();
    let [program, src, dst] = <[OsString; 3]>::try_from(args)
        .map_err(|_| UsageError::WrongArgumentCount)?;

    let escaped = [program, OsString::from("--"), src, dst];
    let cli = Cli::try_parse_from(escaped).map_err(|_| UsageError::WrongArgumentCount)?;
    cli.validate()
}
