//! Routing table — which threads count, and where notifications go.
//!
//! Tables are small and static, so matching is a linear scan.

use crate::bus::types::ThreadCreatedEvent;
use crate::config::schema::{DestinationChannel, NotifierSettings, RoutingConfig};

/// Read-only view over a loaded `RoutingConfig`.
#[derive(Clone, Debug)]
pub struct RoutingTable {
    config: RoutingConfig,
}

impl RoutingTable {
    pub fn new(config: RoutingConfig) -> Self {
        Self { config }
    }

    /// Whether the event's (guild, parent channel) appears in any source.
    ///
    /// A parent listed twice still matches once.
    pub fn matches(&self, event: &ThreadCreatedEvent) -> bool {
        self.config.sources.iter().any(|source| {
            source.guild_id == event.guild_id
                && source.channels.iter().any(|c| *c == event.parent_id)
        })
    }

    /// Every destination channel with its guild, in config order.
    pub fn destinations(&self) -> impl Iterator<Item = (&str, &DestinationChannel)> {
        self.config.destinations.iter().flat_map(|guild| {
            guild
                .channels
                .iter()
                .map(move |ch| (guild.guild_id.as_str(), ch))
        })
    }

    pub fn settings(&self) -> &NotifierSettings {
        &self.config.notifier
    }

    /// Number of watched parent channels across all source guilds.
    pub fn source_count(&self) -> usize {
        self.config.sources.iter().map(|s| s.channels.len()).sum()
    }

    /// Number of destination channels across all guilds.
    pub fn destination_count(&self) -> usize {
        self.config.destinations.iter().map(|d| d.channels.len()).sum()
    }

    pub fn config(&self) -> &RoutingConfig {
        &self.config
    }
}
