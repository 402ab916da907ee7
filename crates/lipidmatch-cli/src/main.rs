use anyhow::{Context, Result};

mod args;
mod cmd_match;
mod cmd_schema;
mod dataset;
mod report;

use args::{CommandLineArgs, GlobalArgs};

/// Set up the logging / tracing system for the application.
fn configure_tracing(global_args: &GlobalArgs) -> Result<()> {
    use tracing_log::{AsLog, LogTracer};
    use tracing_subscriber::{filter::LevelFilter, EnvFilter};

    // Set the tracing level according to the `-q`/`--quiet` and `-v`/`--verbose` options
    let level_filter = if global_args.quiet {
        LevelFilter::ERROR
    } else {
        match global_args.verbose {
            0 => LevelFilter::WARN,
            1 => LevelFilter::INFO,
            2 => LevelFilter::DEBUG,
            _ => LevelFilter::TRACE,
        }
    };

    // Configure the bridge from the `log` crate to the `tracing` crate
    LogTracer::builder()
        .with_max_level(level_filter.as_log())
        .init()?;

    // Configure logging filters according to the `LIPIDMATCH_LOG` environment variable
    let env_filter = EnvFilter::builder()
        .with_default_directive(level_filter.into())
        .with_env_var("LIPIDMATCH_LOG")
        .from_env()
        .context("Failed to parse filters from LIPIDMATCH_LOG environment variable")?;

    // Install the global tracing subscriber
    let subscriber = tracing_subscriber::FmtSubscriber::builder()
        .with_ansi(global_args.use_color(std::io::stderr()))
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    Ok(())
}

fn try_main(args: &CommandLineArgs) -> Result<()> {
    let global_args = &args.global_args;

    configure_tracing(global_args).context("Failed to initialize logging")?;

    match &args.command {
        args::Command::Match(args) => cmd_match::run(global_args, args),
        args::Command::Schema(args) => cmd_schema::run(global_args, args),
    }
}

fn main() {
    let args = &CommandLineArgs::parse_args();
    if let Err(e) = try_main(args) {
        // Use the more verbose format that includes a backtrace when running with -vv or higher,
        // otherwise use a more compact one-line error format.
        if args.global_args.verbose > 1 {
            eprintln!("Error: {e:?}");
        } else {
            eprintln!("Error: {e:#}");
        }
        std::process::exit(2);
    }
}
