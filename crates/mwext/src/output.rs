//! Terminal output utilities

use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use mwext_extensions::{InfoLine, Tone};

/// Print a success message
pub fn success(msg: &str) {
    println!("{} {}", style("✓").green().bold(), msg);
}

/// Print an error message
pub fn error(msg: &str) {
    eprintln!("{} {}", style("✗").red().bold(), msg);
}

/// Print a warning message
pub fn warning(msg: &str) {
    eprintln!("{} {}", style("⚠").yellow().bold(), msg);
}

/// Print an info message
pub fn info(msg: &str) {
    println!("{} {}", style("ℹ").blue().bold(), msg);
}

/// Print a header
pub fn header(msg: &str) {
    println!("\n{}", style(msg).bold().underlined());
}

/// Print a key-value pair
pub fn kv(key: &str, value: &str) {
    println!("  {}: {}", style(key).dim(), value);
}

/// Print a status line produced by an install source
pub fn line(line: &InfoLine) {
    match line {
        InfoLine::Pair { label, value } => kv(label, value),
        InfoLine::Notice {
            tone: Tone::Success,
            text,
        } => println!("  {} {}", style("✓").green().bold(), text),
        InfoLine::Notice {
            tone: Tone::Warning,
            text,
        } => println!("  {} {}", style("⚠").yellow().bold(), text),
    }
}

/// Create a spinner
pub fn spinner(msg: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    if let Ok(template) = ProgressStyle::with_template("{spinner:.blue} {msg}") {
        pb.set_style(template.tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏"));
    }
    pb.set_message(msg.to_string());
    pb.enable_steady_tick(std::time::Duration::from_millis(100));
    pb
}
