use std::process::ExitCode;

use error::ConvertError;
use tracing::debug;
use tracing_subscriber::{fmt, EnvFilter};

mod cli;
mod convert;
mod error;
mod table;

fn main() -> ExitCode {
    // Logs go to stderr; stdout is reserved for the result line
    let env = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    fmt::Subscriber::builder()
        .with_env_filter(env)
        .with_writer(std::io::stderr)
        .init();

    let args = match cli::parse_args(std::env::args_os()) {
        Ok(args) => args,
        Err(err) => return report(err.into()),
    };

    match convert::convert_csv_to_parquet(&args) {
        Ok(_) => {
            println!(
                "Successfully created Parquet file: {}",
                args.output.display()
            );
            ExitCode::SUCCESS
        }
        Err(err) => report(err),
    }
}

fn report(err: ConvertError) -> ExitCode {
    debug!(error = ?err, "conversion failed");
    println!("{err}");
    ExitCode::from(err.exit_code())
}
