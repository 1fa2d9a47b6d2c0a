// batavg entry point.
//
// 1. Parse arguments and initialize tracing (stderr; stdout is the report)
// 2. Load config, copying defaults on first run (built-in settings when the
//    working directory has neither config/ nor defaults/)
// 3. Load the team lookup
// 4. Process the file and write the report to stdout

use std::io::Write;

use anyhow::Context;
use batavg_app::app;
use batavg_app::cli::Cli;
use batavg_core::config;
use clap::Parser;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose)?;

    let config = match &cli.config_dir {
        Some(dir) => config::load_config_in(dir),
        None => {
            let cwd = std::env::current_dir().context("failed to resolve working directory")?;
            config::load_or_default(&cwd)
        }
    }
    .context("failed to load configuration")?;
    info!(
        "Config loaded: format={}, precision={}",
        config.output.format, config.output.precision
    );

    let teams = app::load_teams(&config);

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    app::run(&cli, &config, &teams, &mut out).await?;
    out.flush().context("failed to flush stdout")?;
    Ok(())
}

/// Initialize tracing to stderr so it never mixes with the report on stdout.
fn init_tracing(verbose: bool) -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::EnvFilter;

    let default_filter = if verbose {
        "batavg_app=debug,batavg_core=debug,batavg_baseball=debug,warn"
    } else {
        "batavg_app=info,batavg_core=info,batavg_baseball=info,warn"
    };

    let subscriber = fmt::Subscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .with_target(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .context("failed to set tracing subscriber")?;

    Ok(())
}
