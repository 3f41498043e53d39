use anyhow::Result;
use colored::{control, Colorize};

use crate::cli::output::OutputOptions;
use crate::core::config::AppConfig;

/// `ccmeter config init`: write a default config file.
pub fn init(opts: &OutputOptions) -> Result<()> {
    control::set_override(opts.use_color);

    let path = AppConfig::config_path();
    if path.exists() {
        println!("Config already exists at {}", path.display());
        return Ok(());
    }

    let written = AppConfig::default().save()?;
    println!("{} {}", "Created".green(), written.display());
    Ok(())
}

/// `ccmeter config check`: load and validate the config file.
pub fn check(opts: &OutputOptions) -> Result<()> {
    control::set_override(opts.use_color);

    let path = AppConfig::config_path();
    if !path.exists() {
        println!(
            "No config at {} (defaults apply)",
            path.display()
        );
        return Ok(());
    }

    let config = AppConfig::load()?;
    let issues = config.validate();
    if issues.is_empty() {
        println!("{} {}", "OK".green(), path.display());
    } else {
        println!("{} {}", "Issues in".red(), path.display());
        for issue in &issues {
            println!("  - {}", issue);
        }
        std::process::exit(1);
    }
    Ok(())
}
