#[derive(Debug, Clone, Copy, PartialEq)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Debug, Clone)]
pub struct OutputOptions {
    pub format: OutputFormat,
    pub pretty: bool,
    pub use_color: bool,
    pub verbose: bool,
}

/// Resolve the color setting from config ("auto"/"always"/"never") and the
/// `--no-color` flag. The flag and `NO_COLOR` always win.
pub fn resolve_color(config_color: &str, no_color_flag: bool) -> bool {
    if no_color_flag || std::env::var("NO_COLOR").is_ok() {
        return false;
    }
    match config_color {
        "always" => true,
        "never" => false,
        _ => atty_stdout(),
    }
}

fn atty_stdout() -> bool {
    unsafe { libc_isatty(1) != 0 }
}

extern "C" {
    #[link_name = "isatty"]
    fn libc_isatty(fd: i32) -> i32;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_color_flag_wins_over_always() {
        assert!(!resolve_color("always", true));
    }

    #[test]
    fn never_disables_color() {
        assert!(!resolve_color("never", false));
    }
}
