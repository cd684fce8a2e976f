use crate::event::EventKind;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Destination for one settings group: a webhook URL plus an enable flag.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EventSettings {
    pub enabled: bool,
    pub webhook_url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GlobalSettings {
    /// Emit an info log line for every dispatched event.
    pub logging_enabled: bool,
    /// Suppress connect/disconnect notifications for admins.
    pub hide_admin: bool,
    /// Suppress death notifications for NPCs.
    pub hide_npc: bool,
    /// Replacement token for game markup tags stripped out of death notices.
    pub tags_replacement: String,
    /// Minimum interval between webhook sends, in seconds.
    pub queue_interval_seconds: f64,
    /// Pause before retrying after a delivery failure, in seconds.
    pub sleep_interval_seconds: f64,
    /// RCON commands that never produce a notification.
    pub rcon_command_blacklist: Vec<String>,
    /// World size used to derive map grid labels.
    pub grid_world_size: f32,
    /// Optional sender display-name override on outgoing messages.
    pub webhook_username: Option<String>,
    /// Optional sender avatar override on outgoing messages.
    pub webhook_avatar_url: Option<String>,
}

impl Default for GlobalSettings {
    fn default() -> Self {
        Self {
            logging_enabled: false,
            hide_admin: false,
            hide_npc: false,
            tags_replacement: "`".to_string(),
            queue_interval_seconds: 1.5,
            sleep_interval_seconds: 60.0,
            rcon_command_blacklist: vec!["playerlist".to_string(), "status".to_string()],
            grid_world_size: 4500.0,
            webhook_username: None,
            webhook_avatar_url: None,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EventsConfig {
    pub bradley: EventSettings,
    pub cargo_plane: EventSettings,
    pub cargo_ship: EventSettings,
    pub chat: EventSettings,
    pub chat_team: EventSettings,
    pub chinook: EventSettings,
    pub christmas: EventSettings,
    pub clan: EventSettings,
    pub dangerous_treasures: EventSettings,
    pub death: EventSettings,
    pub death_notes: EventSettings,
    pub duel: EventSettings,
    pub easter: EventSettings,
    pub halloween: EventSettings,
    pub helicopter: EventSettings,
    pub locked_crate: EventSettings,
    pub player_connected: EventSettings,
    pub player_connected_info: EventSettings,
    pub player_disconnected: EventSettings,
    pub player_respawned: EventSettings,
    pub raidable_bases: EventSettings,
    pub rcon_command: EventSettings,
    pub rcon_connection: EventSettings,
    pub santa_sleigh: EventSettings,
    pub server_messages: EventSettings,
    pub server_state: EventSettings,
    pub supply_drop: EventSettings,
    pub user_banned: EventSettings,
    pub user_kicked: EventSettings,
    pub user_muted: EventSettings,
    pub user_name_update: EventSettings,
}

/// Full notifier configuration. The default has every event kind disabled, so
/// a host handed a missing or unreadable config file can fall back to
/// `NotifierConfig::default()` and stay silent.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct NotifierConfig {
    pub global: GlobalSettings,
    pub events: EventsConfig,
}

impl NotifierConfig {
    pub fn from_toml_str(raw: &str) -> Result<Self> {
        toml::from_str(raw).context("parse notifier config")
    }

    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("read notifier config {}", path.display()))?;
        Self::from_toml_str(&raw)
    }

    pub fn settings(&self, kind: EventKind) -> &EventSettings {
        match kind {
            EventKind::Bradley => &self.events.bradley,
            EventKind::CargoPlane => &self.events.cargo_plane,
            EventKind::CargoShip => &self.events.cargo_ship,
            EventKind::Chat => &self.events.chat,
            EventKind::ChatTeam => &self.events.chat_team,
            EventKind::Chinook => &self.events.chinook,
            EventKind::Christmas => &self.events.christmas,
            EventKind::Clan => &self.events.clan,
            EventKind::DangerousTreasures => &self.events.dangerous_treasures,
            EventKind::Death => &self.events.death,
            EventKind::DeathNotes => &self.events.death_notes,
            EventKind::Duel => &self.events.duel,
            EventKind::Easter => &self.events.easter,
            EventKind::Halloween => &self.events.halloween,
            EventKind::Helicopter => &self.events.helicopter,
            EventKind::LockedCrate => &self.events.locked_crate,
            EventKind::PlayerConnected => &self.events.player_connected,
            EventKind::PlayerConnectedInfo => &self.events.player_connected_info,
            EventKind::PlayerDisconnected => &self.events.player_disconnected,
            EventKind::PlayerRespawned => &self.events.player_respawned,
            EventKind::RaidableBases => &self.events.raidable_bases,
            EventKind::RconCommand => &self.events.rcon_command,
            EventKind::RconConnection => &self.events.rcon_connection,
            EventKind::SantaSleigh => &self.events.santa_sleigh,
            EventKind::ServerMessages => &self.events.server_messages,
            EventKind::ServerState => &self.events.server_state,
            EventKind::SupplyDrop => &self.events.supply_drop,
            EventKind::UserBanned => &self.events.user_banned,
            EventKind::UserKicked => &self.events.user_kicked,
            EventKind::UserMuted => &self.events.user_muted,
            EventKind::UserNameUpdate => &self.events.user_name_update,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn default_config_disables_every_kind() {
        let config = NotifierConfig::default();
        assert!(!config.settings(EventKind::Chat).enabled);
        assert!(!config.settings(EventKind::Bradley).enabled);
        assert!(config.settings(EventKind::UserBanned).webhook_url.is_empty());
    }

    #[test]
    fn defaults_match_shipped_values() {
        let global = GlobalSettings::default();
        assert_eq!(global.tags_replacement, "`");
        assert_eq!(global.queue_interval_seconds, 1.5);
        assert_eq!(global.sleep_interval_seconds, 60.0);
        assert_eq!(
            global.rcon_command_blacklist,
            vec!["playerlist".to_string(), "status".to_string()]
        );
    }

    #[test]
    fn partial_toml_overrides_only_named_sections() {
        let raw = r#"
            [global]
            logging_enabled = true
            queue_interval_seconds = 2.0

            [events.chat]
            enabled = true
            webhook_url = "https://discord.test/api/webhooks/1/abc"
        "#;

        let config = NotifierConfig::from_toml_str(raw).expect("parse partial config");
        assert!(config.global.logging_enabled);
        assert_eq!(config.global.queue_interval_seconds, 2.0);
        assert_eq!(config.global.sleep_interval_seconds, 60.0);
        assert!(config.settings(EventKind::Chat).enabled);
        assert!(!config.settings(EventKind::ChatTeam).enabled);
    }

    #[test]
    fn corrupted_toml_is_an_error() {
        assert!(NotifierConfig::from_toml_str("[global\nnope").is_err());
    }

    #[test]
    fn loads_from_file() {
        let mut file = tempfile::NamedTempFile::new().expect("create temp config");
        write!(
            file,
            "[events.server_state]\nenabled = true\nwebhook_url = \"https://discord.test/w\"\n"
        )
        .expect("write temp config");

        let config = NotifierConfig::from_toml_file(file.path()).expect("load config file");
        assert!(config.settings(EventKind::ServerState).enabled);
    }
}
