use anyhow::{Context, Result};
use chrono::NaiveDate;
use serde::Deserialize;
use std::collections::HashMap;
use std::io::BufRead;
use std::path::{Path, PathBuf};

use crate::core::cost::pricing;
use crate::core::models::usage::{DailyUsage, SessionUsage};

// ── Date-range filter ─────────────────────────────────────────────────

/// Inclusive date range in `YYYYMMDD` form; both bounds optional.
#[derive(Debug, Clone, Default)]
pub struct DateFilter {
    pub since: Option<NaiveDate>,
    pub until: Option<NaiveDate>,
}

impl DateFilter {
    /// Parse optional `YYYYMMDD` bounds as given on the command line.
    pub fn parse(since: Option<&str>, until: Option<&str>) -> Result<Self> {
        Ok(Self {
            since: since.map(parse_compact_date).transpose()?,
            until: until.map(parse_compact_date).transpose()?,
        })
    }

    /// Filter covering exactly one day.
    pub fn single_day(date: NaiveDate) -> Self {
        Self {
            since: Some(date),
            until: Some(date),
        }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        if let Some(since) = self.since {
            if date < since {
                return false;
            }
        }
        if let Some(until) = self.until {
            if date > until {
                return false;
            }
        }
        true
    }
}

fn parse_compact_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y%m%d")
        .with_context(|| format!("Invalid date '{}' (expected YYYYMMDD)", s))
}

// ── Session JSONL structs ─────────────────────────────────────────────

#[derive(Deserialize)]
struct JsonlLine {
    #[serde(rename = "type")]
    line_type: Option<String>,
    message: Option<JsonlMessage>,
    #[serde(rename = "requestId")]
    request_id: Option<String>,
    timestamp: Option<String>,
}

#[derive(Deserialize)]
struct JsonlMessage {
    usage: Option<JsonlUsage>,
    id: Option<String>,
}

#[derive(Deserialize)]
struct JsonlUsage {
    input_tokens: Option<u64>,
    output_tokens: Option<u64>,
    cache_read_input_tokens: Option<u64>,
    cache_creation_input_tokens: Option<u64>,
}

/// One priced assistant turn out of a session log.
#[derive(Debug, Clone)]
struct ParsedEntry {
    session_id: String,
    date: NaiveDate,
    input_tokens: u64,
    output_tokens: u64,
    cache_creation_tokens: u64,
    cache_read_tokens: u64,
    cost: f64,
}

// ── File discovery ────────────────────────────────────────────────────

/// Default log roots: `~/.claude`, `$CLAUDE_CONFIG_DIR`, and the XDG
/// config `claude` directory.
fn default_roots() -> Vec<PathBuf> {
    let mut roots: Vec<PathBuf> = Vec::new();

    if let Some(home) = dirs::home_dir() {
        roots.push(home.join(".claude"));
    }
    if let Ok(config_dir) = std::env::var("CLAUDE_CONFIG_DIR") {
        roots.push(PathBuf::from(config_dir));
    }
    if let Some(config_home) = dirs::config_dir() {
        roots.push(config_home.join("claude"));
    }

    roots
}

/// Collect `*.jsonl` session files under `{root}/projects/`, including one
/// `subagents/` level below each session directory.
fn collect_project_files(root: &Path, files: &mut Vec<PathBuf>) {
    let projects_dir = root.join("projects");
    let projects = match std::fs::read_dir(&projects_dir) {
        Ok(entries) => entries,
        Err(_) => return,
    };

    for project_entry in projects.flatten() {
        let project_path = project_entry.path();
        if !project_path.is_dir() {
            continue;
        }

        if let Ok(entries) = std::fs::read_dir(&project_path) {
            for entry in entries.flatten() {
                let path = entry.path();
                if is_jsonl(&path) {
                    files.push(path);
                } else if path.is_dir() {
                    let subagents_dir = path.join("subagents");
                    if let Ok(sub_entries) = std::fs::read_dir(&subagents_dir) {
                        for sub_entry in sub_entries.flatten() {
                            let sub_path = sub_entry.path();
                            if is_jsonl(&sub_path) {
                                files.push(sub_path);
                            }
                        }
                    }
                }
            }
        }
    }
}

fn is_jsonl(path: &Path) -> bool {
    path.is_file() && path.extension().and_then(|e| e.to_str()) == Some("jsonl")
}

fn discover_session_files(roots: &[PathBuf]) -> Vec<PathBuf> {
    let defaults;
    let roots = if roots.is_empty() {
        defaults = default_roots();
        &defaults
    } else {
        roots
    };

    let mut files: Vec<PathBuf> = Vec::new();
    for root in roots {
        collect_project_files(root, &mut files);
    }
    files
}

// ── Session file parsing ──────────────────────────────────────────────

/// Fast ASCII check: does this line look like an assistant turn with usage?
fn is_candidate_line(line: &str) -> bool {
    line.contains("\"type\":\"assistant\"") && line.contains("\"usage\"")
}

/// Parse one session JSONL file into priced entries. Streaming retries of
/// the same turn are deduped by (message id, request id), keeping the last
/// occurrence. Lines that fail to decode are skipped.
fn parse_session_file(path: &Path) -> Result<Vec<ParsedEntry>> {
    let file = std::fs::File::open(path)
        .with_context(|| format!("Failed to open {}", path.display()))?;
    let session_id = path
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| "unknown".to_string());

    let mut reader = std::io::BufReader::new(file);
    let mut entries: Vec<ParsedEntry> = Vec::new();
    let mut dedup: HashMap<(String, String), usize> = HashMap::new();
    let mut line_buf = String::new();

    loop {
        line_buf.clear();
        let bytes_read = reader.read_line(&mut line_buf)?;
        if bytes_read == 0 {
            break;
        }

        let line = line_buf.trim();
        if line.is_empty() || !is_candidate_line(line) {
            continue;
        }

        let parsed: JsonlLine = match serde_json::from_str(line) {
            Ok(p) => p,
            Err(_) => continue,
        };

        if parsed.line_type.as_deref() != Some("assistant") {
            continue;
        }

        let message = match parsed.message {
            Some(m) => m,
            None => continue,
        };
        let usage = match message.usage {
            Some(u) => u,
            None => continue,
        };

        let date = parsed
            .timestamp
            .as_deref()
            .and_then(|ts| {
                chrono::DateTime::parse_from_rfc3339(ts)
                    .map(|dt| dt.date_naive())
                    .ok()
                    .or_else(|| {
                        if ts.len() >= 10 {
                            NaiveDate::parse_from_str(&ts[..10], "%Y-%m-%d").ok()
                        } else {
                            None
                        }
                    })
            })
            .unwrap_or_else(|| chrono::Local::now().date_naive());

        let input_tokens = usage.input_tokens.unwrap_or(0);
        let output_tokens = usage.output_tokens.unwrap_or(0);
        let cache_read_tokens = usage.cache_read_input_tokens.unwrap_or(0);
        let cache_creation_tokens = usage.cache_creation_input_tokens.unwrap_or(0);

        // Cost is attributed here, at load time. Aggregation downstream
        // treats it as authoritative.
        let cost = pricing::cost_from_tokens(
            input_tokens as f64,
            output_tokens as f64,
            cache_creation_tokens as f64,
            cache_read_tokens as f64,
        );

        let entry = ParsedEntry {
            session_id: session_id.clone(),
            date,
            input_tokens,
            output_tokens,
            cache_creation_tokens,
            cache_read_tokens,
            cost,
        };

        let msg_id = message.id.unwrap_or_default();
        let req_id = parsed.request_id.unwrap_or_default();
        if !msg_id.is_empty() || !req_id.is_empty() {
            let key = (msg_id, req_id);
            if let Some(idx) = dedup.get(&key) {
                entries[*idx] = entry;
            } else {
                let idx = entries.len();
                dedup.insert(key, idx);
                entries.push(entry);
            }
        } else {
            entries.push(entry);
        }
    }

    Ok(entries)
}

// ── Grouping ──────────────────────────────────────────────────────────

fn group_daily(entries: Vec<ParsedEntry>) -> Vec<DailyUsage> {
    let mut by_date: HashMap<NaiveDate, DailyUsage> = HashMap::new();
    for entry in entries {
        let day = by_date.entry(entry.date).or_insert_with(|| DailyUsage {
            date: entry.date.format("%Y-%m-%d").to_string(),
            input_tokens: 0,
            output_tokens: 0,
            cache_creation_tokens: 0,
            cache_read_tokens: 0,
            total_cost: 0.0,
        });
        day.input_tokens += entry.input_tokens;
        day.output_tokens += entry.output_tokens;
        day.cache_creation_tokens += entry.cache_creation_tokens;
        day.cache_read_tokens += entry.cache_read_tokens;
        day.total_cost += entry.cost;
    }

    let mut days: Vec<DailyUsage> = by_date.into_values().collect();
    days.sort_by(|a, b| a.date.cmp(&b.date));
    days
}

fn group_sessions(entries: Vec<ParsedEntry>) -> Vec<SessionUsage> {
    let mut by_session: HashMap<String, SessionUsage> = HashMap::new();
    for entry in entries {
        let session = by_session
            .entry(entry.session_id.clone())
            .or_insert_with(|| SessionUsage {
                session_id: entry.session_id.clone(),
                input_tokens: 0,
                output_tokens: 0,
                cache_creation_tokens: 0,
                cache_read_tokens: 0,
                total_cost: 0.0,
            });
        session.input_tokens += entry.input_tokens;
        session.output_tokens += entry.output_tokens;
        session.cache_creation_tokens += entry.cache_creation_tokens;
        session.cache_read_tokens += entry.cache_read_tokens;
        session.total_cost += entry.cost;
    }

    let mut sessions: Vec<SessionUsage> = by_session.into_values().collect();
    sessions.sort_by(|a, b| {
        b.total_cost
            .partial_cmp(&a.total_cost)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    sessions
}

// ── Load entry points ─────────────────────────────────────────────────

fn load_entries(filter: &DateFilter, roots: &[PathBuf]) -> Vec<ParsedEntry> {
    let mut all_entries: Vec<ParsedEntry> = Vec::new();
    for file_path in discover_session_files(roots) {
        // Unreadable files are someone else's problem; keep going.
        if let Ok(entries) = parse_session_file(&file_path) {
            all_entries.extend(entries);
        }
    }
    all_entries.retain(|e| filter.contains(e.date));
    all_entries
}

/// Load usage grouped by day, ascending by date. An empty `roots` slice
/// means the default discovery locations.
pub fn load_daily(filter: &DateFilter, roots: &[PathBuf]) -> Result<Vec<DailyUsage>> {
    Ok(group_daily(load_entries(filter, roots)))
}

/// Load usage grouped by session, most expensive first.
pub fn load_sessions(filter: &DateFilter, roots: &[PathBuf]) -> Result<Vec<SessionUsage>> {
    Ok(group_sessions(load_entries(filter, roots)))
}
