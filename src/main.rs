use anyhow::Result;
use bidtest::cli::{Cli, OutputFormat};
use bidtest::{analysis, report};
use clap::Parser;
use tracing_subscriber::EnvFilter;

/// Initialize tracing subscriber for debug output
fn init_tracing(debug: bool) {
    if debug {
        tracing_subscriber::fmt()
            .with_env_filter(
                EnvFilter::from_default_env().add_directive(tracing::Level::DEBUG.into()),
            )
            .with_writer(std::io::stderr)
            .init();
    }
}

fn main() -> Result<()> {
    let args = Cli::parse();

    // Initialize tracing if --debug flag is set
    init_tracing(args.debug);

    let config = args.to_config();
    if let Err(msg) = config.validate() {
        anyhow::bail!("invalid configuration: {}", msg);
    }

    let outcome = analysis::run_workbook(&args.workbook, &config)?;

    match args.format {
        OutputFormat::Text => print!("{}", report::format_report(&outcome)),
        OutputFormat::Plain => print!("{}", outcome.summary()),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&outcome)?),
    }

    Ok(())
}
