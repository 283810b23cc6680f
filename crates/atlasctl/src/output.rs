//! Transcript formatting helpers
//!
//! Sections with underlined headers, green/red status markers, indented
//! detail lines. Everything returns or prints plain lines so the transcript
//! stays readable when piped to a file.

use atlas_common::dns::SrvTarget;
use console::measure_text_width;
use owo_colors::OwoColorize;

/// Top banner for a transcript.
pub fn banner(title: &str) {
    println!("{}", title.bold());
    println!("{}", "=".repeat(measure_text_width(title)));
    println!();
}

/// Underlined section header.
pub fn section(title: &str) {
    println!();
    println!("{}", title.bold());
    println!("{}", "-".repeat(measure_text_width(title)));
}

/// Successful step line.
pub fn ok(msg: &str) {
    println!("{} {}", "✓".green().bold(), msg);
}

/// Failed step line.
pub fn fail(msg: &str) {
    println!("{} {}", "✗".red().bold(), msg);
}

/// Indented detail line under a step.
pub fn detail(msg: &str) {
    println!("   {msg}");
}

/// One line per SRV record, matching the numbered list of the transcript.
pub fn format_target_line(index: usize, target: &SrvTarget) -> String {
    format!(
        "{}. {}:{} (priority {}, weight {})",
        index + 1,
        target.target,
        target.port,
        target.priority,
        target.weight
    )
}

/// The re-resolution line printed under each SRV record.
pub fn format_target_resolution(target: &SrvTarget) -> String {
    match &target.resolution_error {
        Some(err) => format!("→ target resolution failed: {err}"),
        None => {
            let addresses: Vec<String> =
                target.addresses.iter().map(|a| a.to_string()).collect();
            format!("→ {}", addresses.join(", "))
        }
    }
}
