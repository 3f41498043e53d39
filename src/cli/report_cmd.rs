use anyhow::Result;
use chrono::Local;
use serde::Serialize;
use std::path::PathBuf;

use crate::cli::output::{OutputFormat, OutputOptions};
use crate::cli::renderer;
use crate::core::config::AppConfig;
use crate::core::cost::aggregate::{aggregate, summarize};
use crate::core::cost::loader::{self, DateFilter};
use crate::core::cost::pricing;
use crate::core::models::usage::{DailyUsage, SessionUsage, TotalsSummary};

#[derive(Serialize)]
struct DailyReportPayload {
    days: Vec<DailyUsage>,
    totals: TotalsSummary,
}

#[derive(Serialize)]
struct SessionReportPayload {
    sessions: Vec<SessionUsage>,
    totals: TotalsSummary,
}

fn print_json<T: Serialize>(value: &T, opts: &OutputOptions) -> Result<()> {
    let json = if opts.pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    println!("{}", json);
    Ok(())
}

async fn load_daily_blocking(filter: DateFilter, roots: Vec<PathBuf>) -> Result<Vec<DailyUsage>> {
    tokio::task::spawn_blocking(move || loader::load_daily(&filter, &roots)).await?
}

async fn load_sessions_blocking(
    filter: DateFilter,
    roots: Vec<PathBuf>,
) -> Result<Vec<SessionUsage>> {
    tokio::task::spawn_blocking(move || loader::load_sessions(&filter, &roots)).await?
}

/// `ccmeter today`: today's spend on one line, with a token breakdown
/// behind `--all`.
pub async fn today(detailed: bool, opts: &OutputOptions, config: &AppConfig) -> Result<()> {
    let filter = DateFilter::single_day(Local::now().date_naive());
    let days = load_daily_blocking(filter, config.logs.roots.clone()).await?;
    let summary = summarize(&aggregate(&days));

    if opts.verbose {
        eprintln!("Priced at {} rates", pricing::OPUS.model);
    }

    match opts.format {
        OutputFormat::Text => {
            println!("{}", renderer::render_today(&summary, detailed, opts.use_color));
        }
        OutputFormat::Json => print_json(&summary, opts)?,
    }
    Ok(())
}

/// `ccmeter daily`: per-day table over an optional inclusive date range.
pub async fn daily(
    since: Option<String>,
    until: Option<String>,
    opts: &OutputOptions,
    config: &AppConfig,
) -> Result<()> {
    let filter = DateFilter::parse(since.as_deref(), until.as_deref())?;
    let days = load_daily_blocking(filter, config.logs.roots.clone()).await?;

    if opts.verbose {
        eprintln!("Loaded {} day group(s)", days.len());
    }

    match opts.format {
        OutputFormat::Text => {
            println!("{}", renderer::render_daily_table(&days, opts.use_color));
        }
        OutputFormat::Json => {
            let totals = summarize(&aggregate(&days));
            print_json(&DailyReportPayload { days, totals }, opts)?;
        }
    }
    Ok(())
}

/// `ccmeter sessions`: per-session table over an optional date range.
pub async fn sessions(
    since: Option<String>,
    until: Option<String>,
    opts: &OutputOptions,
    config: &AppConfig,
) -> Result<()> {
    let filter = DateFilter::parse(since.as_deref(), until.as_deref())?;
    let sessions = load_sessions_blocking(filter, config.logs.roots.clone()).await?;

    if opts.verbose {
        eprintln!("Loaded {} session(s)", sessions.len());
    }

    match opts.format {
        OutputFormat::Text => {
            println!("{}", renderer::render_sessions_table(&sessions, opts.use_color));
        }
        OutputFormat::Json => {
            let totals = summarize(&aggregate(&sessions));
            print_json(&SessionReportPayload { sessions, totals }, opts)?;
        }
    }
    Ok(())
}

/// `ccmeter watch`: redraw the today view on a fixed interval until
/// Ctrl-C.
pub async fn watch(opts: &OutputOptions, config: &AppConfig) -> Result<()> {
    use crossterm::cursor::MoveTo;
    use crossterm::execute;
    use crossterm::terminal::{Clear, ClearType};
    use std::io::Write as _;

    let refresh = std::time::Duration::from_secs(config.settings.refresh_secs.max(1));

    loop {
        let filter = DateFilter::single_day(Local::now().date_naive());
        let days = load_daily_blocking(filter, config.logs.roots.clone()).await?;
        let summary = summarize(&aggregate(&days));

        execute!(std::io::stdout(), Clear(ClearType::All), MoveTo(0, 0))?;
        println!("{}", renderer::render_today(&summary, true, opts.use_color));
        println!();
        println!(
            " Updated {}, refreshing every {}s (Ctrl-C to exit)",
            Local::now().format("%H:%M:%S"),
            refresh.as_secs()
        );

        tokio::select! {
            _ = tokio::time::sleep(refresh) => {}
            _ = tokio::signal::ctrl_c() => break,
        }
    }

    Ok(())
}
