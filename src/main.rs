//! # keyline Main Entry Point
//!
//! Terminal dashboard for a key-value store HTTP API.

use anyhow::Result;
use keyline::cmd_args::CommandLineArgs;
use keyline::{logging, AppController};

#[tokio::main]
async fn main() -> Result<()> {
    let args = CommandLineArgs::parse();

    logging::init(args.verbose())?;

    // The dashboard takes over the terminal; refuse to start on a pipe.
    if !atty::is(atty::Stream::Stdout) {
        anyhow::bail!("keyline needs an interactive terminal (stdout is not a tty)");
    }

    tracing::info!("starting keyline with profile '{}'", args.profile());

    let mut app = AppController::new(args)?;
    app.run().await
}
