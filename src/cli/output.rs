//! Terminal output formatting with colors
//!
//! Respects NO_COLOR, CLICOLOR, CLICOLOR_FORCE automatically.

use colored::Colorize;
use itertools::Itertools;

/// Print error (red bold "error:" prefix) to stderr
pub fn error(msg: &(impl std::fmt::Display + ?Sized)) {
    eprintln!("{}: {}", "error".red().bold(), msg);
}

/// Print warning (yellow "Warning:" prefix) to stderr
pub fn warning(msg: &(impl std::fmt::Display + ?Sized)) {
    eprintln!("{}: {}", "Warning".yellow(), msg);
}

/// Print success status (green checkmark)
pub fn success(msg: &(impl std::fmt::Display + ?Sized)) {
    println!("{} {}", "✓".green(), msg);
}

/// Print a config file location (green label)
pub fn location(label: &str, path: &std::path::Path) {
    if path.exists() {
        println!("{}: {}", label.green(), path.display());
    } else {
        println!("{}: {} {}", label, path.display(), "(not found)".dimmed());
    }
}

/// Id list in the wire format the map service receives: `[0,1,3]`.
pub fn format_ids(ids: &[i64]) -> String {
    format!("[{}]", ids.iter().join(","))
}

/// Print the ids a toggle showed (green +) and hid (red -), then the published list.
pub fn visibility_change(added: &[i64], removed: &[i64], published: &[i64]) {
    if !added.is_empty() {
        println!("  {} {}", "+".green(), format_ids(added));
    }
    if !removed.is_empty() {
        println!("  {} {}", "-".red(), format_ids(removed));
    }
    println!("{}", format_ids(published));
}

/// Print plain output (no color, for TOML and menu trees)
pub fn info(msg: &(impl std::fmt::Display + ?Sized)) {
    println!("{}", msg);
}
