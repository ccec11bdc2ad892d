use clap::Parser;
use ws_addressing::{CliArgs, InspectorConfig, LoggingConfig, OutputFormat, init_logging};

fn main() -> anyhow::Result<()> {
    let logging_config = LoggingConfig::from_env();
    let _guard = init_logging(logging_config)?;

    let cli = CliArgs::parse();
    let config = InspectorConfig::from_args(cli)?;

    // Validate the workspace before doing any work (fail-fast)
    config.ensure_workspace_root()?;

    let report = ws_addressing::inspect::run(&config)?;

    match config.format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
        OutputFormat::Text => print!("{}", ws_addressing::inspect::render_text(&report)),
    }

    Ok(())
}
