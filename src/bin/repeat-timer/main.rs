mod cli;
mod setup;

use clap::Parser;
use snafu::{prelude::*, Whatever};
use tokio::io::BufReader;

use crate::cli::Arguments;

#[snafu::report]
fn main() -> Result<(), Whatever> {
    let args = Arguments::parse();
    setup::logger(args.verbosity)?;

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .whatever_context("Could not build the async runtime")?;
    let res = runtime.block_on(run(args));
    // A pending stdin read holds a blocking thread which would keep a normal
    // shutdown waiting for the next line.
    runtime.shutdown_background();
    res
}

async fn run(args: Arguments) -> Result<(), Whatever> {
    let mut console = setup::bootstrap(&args)?;
    let outcome = console
        .run(BufReader::new(tokio::io::stdin()))
        .await
        .whatever_context("Console failed to run")?;

    tracing::info!(?outcome, "Timer ended");
    Ok(())
}
