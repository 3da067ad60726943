//! `threadwatch check` — load the routing config and show what it does.
//!
//! No network access: IDs are printed as configured, not resolved.

use std::path::Path;

use anyhow::Result;
use colored::Colorize;

use threadwatch_core::config::load_config;
use threadwatch_core::RoutingTable;

use crate::helpers::mark;

/// Run the check command.
pub fn run(path: &Path) -> Result<()> {
    let table = RoutingTable::new(load_config(Some(path))?);
    println!("{}", render(path, &table));
    Ok(())
}

fn render(path: &Path, table: &RoutingTable) -> String {
    let config = table.config();
    let settings = table.settings();
    let mut out = Vec::new();

    out.push(String::new());
    out.push(format!("{}", "threadwatch config".cyan().bold()));
    out.push(String::new());
    out.push(format!("  {:<16} {} {}", "Config:".bold(), path.display(), mark(true)));
    out.push(format!("  {:<16} {}", "Template:".bold(), settings.template.as_str()));
    out.push(format!("  {:<16} {}", "Strip embeds:".bold(), mark(settings.suppress_embeds)));

    out.push(String::new());
    out.push(format!("  {}", "Sources:".bold()));
    if config.sources.is_empty() {
        out.push(format!("    {}", "· none (nothing will be relayed)".dimmed()));
    }
    for source in &config.sources {
        out.push(format!("    guild {}", source.guild_id));
        for channel in &source.channels {
            out.push(format!("      # {channel}"));
        }
    }

    out.push(String::new());
    out.push(format!("  {}", "Destinations:".bold()));
    if config.destinations.is_empty() {
        out.push(format!("    {}", "· none".dimmed()));
    }
    for dest in &config.destinations {
        out.push(format!("    guild {}", dest.guild_id));
        for channel in &dest.channels {
            if channel.user_ids.is_empty() {
                out.push(format!("      # {}", channel.channel_id));
            } else {
                out.push(format!(
                    "      # {}  mentions {}",
                    channel.channel_id,
                    channel.user_ids.join(", ")
                ));
            }
        }
    }
    out.push(String::new());

    out.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_temp_json(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn test_check_valid_config() {
        let file = write_temp_json(r#"{
            "sources": [{ "guildId": "G1", "channels": ["C1"] }],
            "destinations": [{
                "guildId": "G2",
                "channels": [{ "channelId": "D1", "voterIds": ["U1", "U2"] }]
            }]
        }"#);
        assert!(run(file.path()).is_ok());
    }

    #[test]
    fn test_check_invalid_config() {
        let file = write_temp_json("{ nope");
        assert!(run(file.path()).is_err());
    }

    #[test]
    fn test_render_lists_routes() {
        colored::control::set_override(false);
        let file = write_temp_json(r#"{
            "sources": [{ "guildId": "G1", "channels": ["C1", "C2"] }],
            "destinations": [{
                "guildId": "G2",
                "channels": [
                    { "channelId": "D1", "userIds": ["U1", "U2"] },
                    { "channelId": "D2" }
                ]
            }],
            "notifier": { "template": "vote" }
        }"#);
        let table = RoutingTable::new(load_config(Some(file.path())).unwrap());
        let text = render(file.path(), &table);

        assert!(text.contains("guild G1"));
        assert!(text.contains("# C2"));
        assert!(text.contains("# D1  mentions U1, U2"));
        assert!(text.contains("# D2\n"));
        assert!(text.contains("vote"));
    }
}
