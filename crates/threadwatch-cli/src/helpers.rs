//! Shared CLI helpers — banner, status marks, error line.

use colored::Colorize;

use threadwatch_core::RoutingTable;

/// Print the startup banner with a routing summary.
pub fn print_banner(table: &RoutingTable) {
    let version = env!("CARGO_PKG_VERSION");
    let settings = table.settings();
    println!();
    println!("{}  v{}", "threadwatch".cyan().bold(), version.dimmed());
    println!("  Watching:      {} channel(s)", table.source_count());
    println!("  Notifying:     {} channel(s)", table.destination_count());
    println!("  Template:      {}", settings.template.as_str());
    println!("  Strip embeds:  {}", mark(settings.suppress_embeds));
    println!();
    println!("  {}", "Ctrl+C to stop".dimmed());
    println!();
}

/// ✓ / ✗ for a boolean setting.
pub fn mark(on: bool) -> String {
    if on {
        "✓".green().to_string()
    } else {
        "✗".red().to_string()
    }
}

/// One-line diagnostic for a fatal error, with its cause chain.
pub fn print_error(err: &anyhow::Error) {
    eprintln!("{} {err:#}", "error:".red().bold());
}
