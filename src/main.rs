use cable::cli::{run_cli, Cli};
use cable::logging::{init_logging_with_config, LogConfig, LogFormat, LogOutput};
use clap::Parser;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Registration logs at info would drown the report; stay quiet unless asked.
    let mut log_config = LogConfig::from_env();
    if cli.verbose {
        log_config.log_level = "debug".to_string();
    } else if std::env::var("CABLE_LOG_LEVEL").is_err() {
        log_config.log_level = "warn".to_string();
    }
    if std::env::var("CABLE_LOG_FORMAT").is_err() {
        log_config.format = LogFormat::Pretty;
    }
    // The report goes to stdout.
    log_config.output = LogOutput::Stderr;
    let _guard = init_logging_with_config(&log_config)?;

    run_cli(&cli, &mut std::io::stdout().lock())
}
