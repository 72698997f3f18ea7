//! Status markers for stderr summaries.

use colored::Colorize;

pub fn success() -> String {
    "✓".green().to_string()
}

pub fn warning() -> String {
    "!".yellow().to_string()
}
