use serde::{Deserialize, Serialize};

/// World position of the entity or event that triggered a notification.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Position {
    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }
}

/// A single event raised by the host game server.
///
/// The host constructs exactly one variant per notification; classification
/// downstream is a pure match on the discriminant, never inspection of raw
/// payload text.
#[derive(Debug, Clone, PartialEq)]
pub enum NotificationEvent {
    BradleySpawned { position: Position },
    CargoPlaneSpawned { position: Position },
    CargoShipSpawned { position: Position },
    ChinookSpawned { position: Position },
    HelicopterSpawned { position: Position, personal: bool },
    LockedCrateSpawned { position: Position },
    SantaSleighSpawned { position: Position },
    SupplyDropSpawned { position: Position },
    SupplyDropLanded { entity_id: u64, position: Position },
    SupplySignalThrown { player: String, position: Position },
    ChristmasStarted,
    EasterStarted,
    EasterEnded { winner: Option<String> },
    HalloweenStarted,
    HalloweenEnded { winner: Option<String> },
    Chat { player: String, message: String },
    TeamChat { player: String, message: String },
    PlayerConnected { player: String, is_admin: bool },
    PlayerConnectedInfo { player: String, steam_id: String, ip: String },
    PlayerDisconnected { player: String, reason: String, is_admin: bool },
    PlayerDeath { player: String, is_npc: bool },
    DeathNotice { message: String },
    PlayerRespawned { player: String, position: Position },
    DuelEnded { winner: String, loser: String },
    RaidableBaseStarted { position: Position, difficulty: u32 },
    RaidableBaseEnded { position: Position, difficulty: u32 },
    DangerousTreasuresStarted { position: Position },
    DangerousTreasuresEnded { position: Position },
    ClanCreated { tag: String },
    ClanDisbanded { tag: String },
    RconConnectionOpened { ip: String },
    RconCommandRun { ip: String, command: String, args: Vec<String> },
    ServerMessage { message: String },
    ServerInitialized,
    ServerShutdown,
    UserBanned { name: String, id: String, ip: String, reason: String },
    UserUnbanned { name: String, id: String, ip: String },
    UserKicked { name: String, id: String, reason: String },
    UserMuted { target: String, initiator: String, duration: Option<String>, reason: String },
    UserUnmuted { target: String, initiator: String },
    UserNameUpdated { id: String, old_name: String, new_name: String },
}

/// Settings group an event belongs to. Several event variants share one
/// configurable destination (e.g. banned and unbanned both route through the
/// user-banned settings).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    Bradley,
    CargoPlane,
    CargoShip,
    Chat,
    ChatTeam,
    Chinook,
    Christmas,
    Clan,
    DangerousTreasures,
    Death,
    DeathNotes,
    Duel,
    Easter,
    Halloween,
    Helicopter,
    LockedCrate,
    PlayerConnected,
    PlayerConnectedInfo,
    PlayerDisconnected,
    PlayerRespawned,
    RaidableBases,
    RconCommand,
    RconConnection,
    SantaSleigh,
    ServerMessages,
    ServerState,
    SupplyDrop,
    UserBanned,
    UserKicked,
    UserMuted,
    UserNameUpdate,
}

impl EventKind {
    pub fn as_str(self) -> &'static str {
        match self {
            EventKind::Bradley => "bradley",
            EventKind::CargoPlane => "cargo_plane",
            EventKind::CargoShip => "cargo_ship",
            EventKind::Chat => "chat",
            EventKind::ChatTeam => "chat_team",
            EventKind::Chinook => "chinook",
            EventKind::Christmas => "christmas",
            EventKind::Clan => "clan",
            EventKind::DangerousTreasures => "dangerous_treasures",
            EventKind::Death => "death",
            EventKind::DeathNotes => "death_notes",
            EventKind::Duel => "duel",
            EventKind::Easter => "easter",
            EventKind::Halloween => "halloween",
            EventKind::Helicopter => "helicopter",
            EventKind::LockedCrate => "locked_crate",
            EventKind::PlayerConnected => "player_connected",
            EventKind::PlayerConnectedInfo => "player_connected_info",
            EventKind::PlayerDisconnected => "player_disconnected",
            EventKind::PlayerRespawned => "player_respawned",
            EventKind::RaidableBases => "raidable_bases",
            EventKind::RconCommand => "rcon_command",
            EventKind::RconConnection => "rcon_connection",
            EventKind::SantaSleigh => "santa_sleigh",
            EventKind::ServerMessages => "server_messages",
            EventKind::ServerState => "server_state",
            EventKind::SupplyDrop => "supply_drop",
            EventKind::UserBanned => "user_banned",
            EventKind::UserKicked => "user_kicked",
            EventKind::UserMuted => "user_muted",
            EventKind::UserNameUpdate => "user_name_update",
        }
    }
}

impl NotificationEvent {
    pub fn kind(&self) -> EventKind {
        match self {
            NotificationEvent::BradleySpawned { .. } => EventKind::Bradley,
            NotificationEvent::CargoPlaneSpawned { .. } => EventKind::CargoPlane,
            NotificationEvent::CargoShipSpawned { .. } => EventKind::CargoShip,
            NotificationEvent::ChinookSpawned { .. } => EventKind::Chinook,
            NotificationEvent::HelicopterSpawned { .. } => EventKind::Helicopter,
            NotificationEvent::LockedCrateSpawned { .. } => EventKind::LockedCrate,
            NotificationEvent::SantaSleighSpawned { .. } => EventKind::SantaSleigh,
            NotificationEvent::SupplyDropSpawned { .. }
            | NotificationEvent::SupplyDropLanded { .. }
            | NotificationEvent::SupplySignalThrown { .. } => EventKind::SupplyDrop,
            NotificationEvent::ChristmasStarted => EventKind::Christmas,
            NotificationEvent::EasterStarted | NotificationEvent::EasterEnded { .. } => {
                EventKind::Easter
            }
            NotificationEvent::HalloweenStarted | NotificationEvent::HalloweenEnded { .. } => {
                EventKind::Halloween
            }
            NotificationEvent::Chat { .. } => EventKind::Chat,
            NotificationEvent::TeamChat { .. } => EventKind::ChatTeam,
            NotificationEvent::PlayerConnected { .. } => EventKind::PlayerConnected,
            NotificationEvent::PlayerConnectedInfo { .. } => EventKind::PlayerConnectedInfo,
            NotificationEvent::PlayerDisconnected { .. } => EventKind::PlayerDisconnected,
            NotificationEvent::PlayerDeath { .. } => EventKind::Death,
            NotificationEvent::DeathNotice { .. } => EventKind::DeathNotes,
            NotificationEvent::PlayerRespawned { .. } => EventKind::PlayerRespawned,
            NotificationEvent::DuelEnded { .. } => EventKind::Duel,
            NotificationEvent::RaidableBaseStarted { .. }
            | NotificationEvent::RaidableBaseEnded { .. } => EventKind::RaidableBases,
            NotificationEvent::DangerousTreasuresStarted { .. }
            | NotificationEvent::DangerousTreasuresEnded { .. } => EventKind::DangerousTreasures,
            NotificationEvent::ClanCreated { .. } | NotificationEvent::ClanDisbanded { .. } => {
                EventKind::Clan
            }
            NotificationEvent::RconConnectionOpened { .. } => EventKind::RconConnection,
            NotificationEvent::RconCommandRun { .. } => EventKind::RconCommand,
            NotificationEvent::ServerMessage { .. } => EventKind::ServerMessages,
            NotificationEvent::ServerInitialized | NotificationEvent::ServerShutdown => {
                EventKind::ServerState
            }
            NotificationEvent::UserBanned { .. } | NotificationEvent::UserUnbanned { .. } => {
                EventKind::UserBanned
            }
            NotificationEvent::UserKicked { .. } => EventKind::UserKicked,
            NotificationEvent::UserMuted { .. } | NotificationEvent::UserUnmuted { .. } => {
                EventKind::UserMuted
            }
            NotificationEvent::UserNameUpdated { .. } => EventKind::UserNameUpdate,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shared_settings_groups_map_to_one_kind() {
        let landed = NotificationEvent::SupplyDropLanded {
            entity_id: 42,
            position: Position::new(0.0, 0.0, 0.0),
        };
        let thrown = NotificationEvent::SupplySignalThrown {
            player: "dev".to_string(),
            position: Position::new(0.0, 0.0, 0.0),
        };
        assert_eq!(landed.kind(), EventKind::SupplyDrop);
        assert_eq!(thrown.kind(), EventKind::SupplyDrop);

        let banned = NotificationEvent::UserBanned {
            name: "dev".to_string(),
            id: "7656".to_string(),
            ip: "10.0.0.1".to_string(),
            reason: "cheating".to_string(),
        };
        let unbanned = NotificationEvent::UserUnbanned {
            name: "dev".to_string(),
            id: "7656".to_string(),
            ip: "10.0.0.1".to_string(),
        };
        assert_eq!(banned.kind(), unbanned.kind());
    }

    #[test]
    fn lifecycle_events_share_server_state() {
        assert_eq!(NotificationEvent::ServerInitialized.kind(), EventKind::ServerState);
        assert_eq!(NotificationEvent::ServerShutdown.kind(), EventKind::ServerState);
    }
}
