mod cli;
mod core;

use clap::{Parser, Subcommand};

use crate::core::config::AppConfig;

#[derive(Parser)]
#[command(name = "ccmeter", about = "Claude Code usage and cost metering CLI", version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Output format (text|json)
    #[arg(short, long, global = true)]
    format: Option<String>,

    /// Shorthand for --format json
    #[arg(short = 'j', long = "json", global = true)]
    json: bool,

    /// Pretty-print JSON output
    #[arg(long, global = true)]
    pretty: bool,

    /// Disable ANSI colors
    #[arg(long, global = true)]
    no_color: bool,

    /// Verbose logging to stderr
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Show today's cost (the default command)
    Today {
        /// Include the full token breakdown
        #[arg(short, long)]
        all: bool,
    },
    /// Per-day usage table over an optional date range
    Daily {
        /// Start date, inclusive (YYYYMMDD)
        #[arg(long)]
        since: Option<String>,

        /// End date, inclusive (YYYYMMDD)
        #[arg(long)]
        until: Option<String>,
    },
    /// Per-session usage table over an optional date range
    Sessions {
        /// Start date, inclusive (YYYYMMDD)
        #[arg(long)]
        since: Option<String>,

        /// End date, inclusive (YYYYMMDD)
        #[arg(long)]
        until: Option<String>,
    },
    /// Redraw today's usage on a fixed interval
    Watch,
    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Generate default config file
    Init,
    /// Validate config file
    Check,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Cli::parse();
    let config = AppConfig::load().unwrap_or_default();

    let format = if args.json {
        cli::output::OutputFormat::Json
    } else {
        match args
            .format
            .as_deref()
            .unwrap_or(config.settings.default_format.as_str())
        {
            "json" => cli::output::OutputFormat::Json,
            _ => cli::output::OutputFormat::Text,
        }
    };

    let output_opts = cli::output::OutputOptions {
        format,
        pretty: args.pretty,
        use_color: cli::output::resolve_color(&config.settings.color, args.no_color),
        verbose: args.verbose,
    };

    match args.command {
        None => cli::report_cmd::today(false, &output_opts, &config).await?,
        Some(Commands::Today { all }) => {
            cli::report_cmd::today(all, &output_opts, &config).await?
        }
        Some(Commands::Daily { since, until }) => {
            cli::report_cmd::daily(since, until, &output_opts, &config).await?
        }
        Some(Commands::Sessions { since, until }) => {
            cli::report_cmd::sessions(since, until, &output_opts, &config).await?
        }
        Some(Commands::Watch) => cli::report_cmd::watch(&output_opts, &config).await?,
        Some(Commands::Config { action }) => match action {
            ConfigAction::Init => cli::config_cmd::init(&output_opts)?,
            ConfigAction::Check => cli::config_cmd::check(&output_opts)?,
        },
    }

    Ok(())
}
