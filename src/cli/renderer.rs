use colored::{control, Colorize};

use crate::core::cost::aggregate::{aggregate, summarize};
use crate::core::models::usage::{DailyUsage, SessionUsage, TotalsSummary, UsageRecord};

/// "1234" / "1.2K" / "3.4M".
fn format_tokens(count: u64) -> String {
    if count >= 1_000_000 {
        format!("{:.1}M", count as f64 / 1_000_000.0)
    } else if count >= 1_000 {
        format!("{:.1}K", count as f64 / 1_000.0)
    } else {
        format!("{}", count)
    }
}

/// "$12.34". Two-decimal display rounding happens here, never upstream.
fn format_cost(cost: f64) -> String {
    format!("${:.2}", cost)
}

/// "1234567" -> "1,234,567".
fn group_thousands(count: u64) -> String {
    let digits = count.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    grouped
}

/// One-line today view, optionally followed by the full token breakdown.
///
/// Layout:
/// ```text
///  Today: $4.20
///   Input tokens     123,456
///   Output tokens    7,890
///   Cache creation   0
///   Cache read       987,654
///   Total tokens     1,119,000
/// ```
pub fn render_today(summary: &TotalsSummary, detailed: bool, use_color: bool) -> String {
    control::set_override(use_color);

    let mut lines: Vec<String> = Vec::new();
    let headline = format!(" Today: {}", format_cost(summary.total_cost));
    lines.push(headline.bold().to_string());

    if summary.total_tokens == 0 && summary.total_cost == 0.0 {
        lines.push(format!("  {}", "No Claude Code usage today".dimmed()));
        return lines.join("\n");
    }

    if detailed {
        let rows = [
            ("Input tokens", summary.input_tokens),
            ("Output tokens", summary.output_tokens),
            ("Cache creation", summary.cache_creation_tokens),
            ("Cache read", summary.cache_read_tokens),
            ("Total tokens", summary.total_tokens),
        ];
        for (label, count) in rows {
            lines.push(format!(
                "  {:<16} {}",
                label.cyan(),
                group_thousands(count)
            ));
        }
    }

    lines.join("\n")
}

fn table_row(key: &str, record: &impl UsageRecord, key_width: usize) -> String {
    format!(
        "  {:<kw$} {:>9} {:>9} {:>9} {:>9} {:>9} {:>10}",
        key,
        format_tokens(record.input_tokens()),
        format_tokens(record.output_tokens()),
        format_tokens(record.cache_creation_tokens()),
        format_tokens(record.cache_read_tokens()),
        format_tokens(record.total_tokens()),
        format_cost(record.total_cost()),
        kw = key_width,
    )
}

fn table_header(key_label: &str, key_width: usize, use_color: bool) -> String {
    control::set_override(use_color);
    let header = format!(
        "  {:<kw$} {:>9} {:>9} {:>9} {:>9} {:>9} {:>10}",
        key_label,
        "Input",
        "Output",
        "Cache Cr",
        "Cache Rd",
        "Tokens",
        "Cost",
        kw = key_width,
    );
    header.cyan().to_string()
}

/// Per-day table with a totals row.
pub fn render_daily_table(days: &[DailyUsage], use_color: bool) -> String {
    control::set_override(use_color);

    if days.is_empty() {
        return format!("  {}", "No usage in range".dimmed());
    }

    let mut lines = vec![table_header("Date", 12, use_color)];
    for day in days {
        lines.push(table_row(&day.date, day, 12));
    }

    let totals = aggregate(days);
    let summary = summarize(&totals);
    lines.push(table_row("Total", &totals, 12).bold().to_string());
    lines.push(format!(
        "  {} {} tokens, {}",
        "Range:".dimmed(),
        group_thousands(summary.total_tokens),
        format_cost(summary.total_cost)
    ));

    lines.join("\n")
}

/// Per-session table with a totals row. Long session identifiers are
/// truncated for display only.
pub fn render_sessions_table(sessions: &[SessionUsage], use_color: bool) -> String {
    control::set_override(use_color);

    if sessions.is_empty() {
        return format!("  {}", "No usage in range".dimmed());
    }

    let mut lines = vec![table_header("Session", 26, use_color)];
    for session in sessions {
        let id = truncate_id(&session.session_id, 26);
        lines.push(table_row(&id, session, 26));
    }

    let totals = aggregate(sessions);
    let summary = summarize(&totals);
    lines.push(table_row("Total", &totals, 26).bold().to_string());
    lines.push(format!(
        "  {} {} sessions, {} tokens, {}",
        "Range:".dimmed(),
        sessions.len(),
        group_thousands(summary.total_tokens),
        format_cost(summary.total_cost)
    ));

    lines.join("\n")
}

fn truncate_id(id: &str, max: usize) -> String {
    if id.chars().count() <= max {
        id.to_string()
    } else {
        let prefix: String = id.chars().take(max - 1).collect();
        format!("{}…", prefix)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_summary(cost: f64) -> TotalsSummary {
        TotalsSummary {
            input_tokens: 3000,
            output_tokens: 1500,
            cache_creation_tokens: 0,
            cache_read_tokens: 500,
            total_tokens: 5000,
            total_cost: cost,
        }
    }

    fn make_day(date: &str, input: u64, cost: f64) -> DailyUsage {
        DailyUsage {
            date: date.to_string(),
            input_tokens: input,
            output_tokens: 0,
            cache_creation_tokens: 0,
            cache_read_tokens: 0,
            total_cost: cost,
        }
    }

    #[test]
    fn format_tokens_scales() {
        assert_eq!(format_tokens(950), "950");
        assert_eq!(format_tokens(1_500), "1.5K");
        assert_eq!(format_tokens(2_400_000), "2.4M");
    }

    #[test]
    fn format_cost_two_decimals() {
        assert_eq!(format_cost(0.0), "$0.00");
        assert_eq!(format_cost(4.2), "$4.20");
        assert_eq!(format_cost(110.25), "$110.25");
    }

    #[test]
    fn group_thousands_separators() {
        assert_eq!(group_thousands(0), "0");
        assert_eq!(group_thousands(999), "999");
        assert_eq!(group_thousands(1_000), "1,000");
        assert_eq!(group_thousands(1_234_567), "1,234,567");
    }

    #[test]
    fn today_shows_cost() {
        let output = render_today(&make_summary(4.2), false, false);
        assert!(output.contains("Today: $4.20"));
        assert!(!output.contains("Input tokens"));
    }

    #[test]
    fn today_detailed_shows_breakdown() {
        let output = render_today(&make_summary(4.2), true, false);
        assert!(output.contains("Input tokens"));
        assert!(output.contains("3,000"));
        assert!(output.contains("Total tokens"));
        assert!(output.contains("5,000"));
    }

    #[test]
    fn today_empty_mentions_no_usage() {
        let empty = TotalsSummary {
            input_tokens: 0,
            output_tokens: 0,
            cache_creation_tokens: 0,
            cache_read_tokens: 0,
            total_tokens: 0,
            total_cost: 0.0,
        };
        let output = render_today(&empty, true, false);
        assert!(output.contains("Today: $0.00"));
        assert!(output.contains("No Claude Code usage today"));
    }

    #[test]
    fn daily_table_contains_rows_and_totals() {
        let days = vec![
            make_day("2026-08-27", 1000, 0.05),
            make_day("2026-08-28", 2000, 0.10),
        ];
        let output = render_daily_table(&days, false);
        assert!(output.contains("2026-08-27"));
        assert!(output.contains("2026-08-28"));
        assert!(output.contains("Total"));
        assert!(output.contains("$0.15"));
    }

    #[test]
    fn daily_table_empty_range() {
        let output = render_daily_table(&[], false);
        assert!(output.contains("No usage in range"));
    }

    #[test]
    fn sessions_table_truncates_long_ids() {
        let sessions = vec![SessionUsage {
            session_id: "a".repeat(64),
            input_tokens: 10,
            output_tokens: 0,
            cache_creation_tokens: 0,
            cache_read_tokens: 0,
            total_cost: 0.01,
        }];
        let output = render_sessions_table(&sessions, false);
        assert!(output.contains('…'));
        assert!(!output.contains(&"a".repeat(64)));
    }

    #[test]
    fn no_ansi_when_color_disabled() {
        let days = vec![make_day("2026-08-28", 1000, 0.05)];
        let output = render_daily_table(&days, false);
        assert!(!output.contains('\x1b'), "output should not contain ANSI codes");
    }
}
