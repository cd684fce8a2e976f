use crate::clock::Clock;
use crate::dedup::DedupCache;
use crate::formatter::MessageFormatter;
use crate::queue::{EnqueueError, QueueHandle};
use notify_core::config::NotifierConfig;
use notify_core::event::NotificationEvent;
use notify_core::grid::GridLocator;
use notify_core::sanitize::{replace_chars, strip_markup_tags};
use notify_core::templates::TemplateSource;
use std::sync::Arc;
use tracing::{error, info};

/// Window during which a second "landed" notification for the same entity is
/// suppressed.
pub const LANDED_DEDUP_WINDOW_SECONDS: i64 = 60;

const UNNAMED_PLAYER: &str = "Unnamed";
const NO_WINNER: &str = "No winner";
const MUTED_FOREVER: &str = "ever";

#[derive(Debug, thiserror::Error)]
pub enum DispatchError {
    #[error("unknown raid difficulty: {0}")]
    UnknownDifficulty(u32),
    #[error(transparent)]
    Enqueue(#[from] EnqueueError),
}

/// Facade between host event hooks and the delivery queue.
///
/// Classifies the event, applies enable and suppression policy, renders the
/// message, and enqueues it. Never blocks and performs no network I/O.
pub struct EventDispatcher {
    config: Arc<NotifierConfig>,
    formatter: MessageFormatter,
    grid: Arc<dyn GridLocator>,
    clock: Arc<dyn Clock>,
    dedup: DedupCache,
    queue: QueueHandle,
}

impl EventDispatcher {
    pub fn new(
        config: Arc<NotifierConfig>,
        templates: Arc<dyn TemplateSource>,
        grid: Arc<dyn GridLocator>,
        clock: Arc<dyn Clock>,
        queue: QueueHandle,
    ) -> Self {
        Self {
            config,
            formatter: MessageFormatter::new(templates, clock.clone()),
            grid,
            clock,
            dedup: DedupCache::new(),
            queue,
        }
    }

    /// Handles one host event. Classification and configuration problems are
    /// logged and dropped here; nothing propagates to the caller.
    pub fn notify(&self, event: NotificationEvent) {
        if let Err(dispatch_error) = self.dispatch(event) {
            error!(error = %dispatch_error, "event dropped");
        }
    }

    fn dispatch(&self, event: NotificationEvent) -> Result<(), DispatchError> {
        let kind = event.kind();
        let settings = self.config.settings(kind);
        // Hosts are expected to stop raising disabled kinds, but that is not
        // assumed here.
        if !settings.enabled {
            return Ok(());
        }

        let Some((key, args)) = self.plan(&event)? else {
            return Ok(());
        };

        if self.config.global.logging_enabled {
            info!(kind = kind.as_str(), template = key, "event dispatched");
        }

        let text = self.formatter.render(key, &args);
        if text.is_empty() {
            return Ok(());
        }

        self.queue
            .enqueue(settings.webhook_url.clone(), text, self.clock.now_epoch())?;
        Ok(())
    }

    /// Maps an enabled event to its template key and rendered arguments, or
    /// `None` when policy suppresses it. User-supplied strings are sanitized
    /// here; system-generated labels (grid coordinates, ids, addresses) pass
    /// through untouched.
    fn plan(
        &self,
        event: &NotificationEvent,
    ) -> Result<Option<(&'static str, Vec<String>)>, DispatchError> {
        let global = &self.config.global;

        let planned = match event {
            NotificationEvent::BradleySpawned { position } => {
                ("Bradley", vec![self.grid.label(*position)])
            }
            NotificationEvent::CargoPlaneSpawned { position } => {
                ("CargoPlane", vec![self.grid.label(*position)])
            }
            NotificationEvent::CargoShipSpawned { position } => {
                ("CargoShip", vec![self.grid.label(*position)])
            }
            NotificationEvent::ChinookSpawned { position } => {
                ("Chinook", vec![self.grid.label(*position)])
            }
            NotificationEvent::HelicopterSpawned { position, personal } => {
                let key = if *personal { "PersonalHelicopter" } else { "Helicopter" };
                (key, vec![self.grid.label(*position)])
            }
            NotificationEvent::LockedCrateSpawned { position } => {
                ("LockedCrate", vec![self.grid.label(*position)])
            }
            NotificationEvent::SantaSleighSpawned { position } => {
                ("SantaSleigh", vec![self.grid.label(*position)])
            }
            NotificationEvent::SupplyDropSpawned { position } => {
                ("SupplyDrop", vec![self.grid.label(*position)])
            }
            NotificationEvent::SupplyDropLanded { entity_id, position } => {
                let now_epoch = self.clock.now_epoch();
                if self.dedup.should_suppress(*entity_id, now_epoch) {
                    return Ok(None);
                }
                self.dedup
                    .mark_seen(*entity_id, LANDED_DEDUP_WINDOW_SECONDS, now_epoch);
                ("SupplyDropLanded", vec![self.grid.label(*position)])
            }
            NotificationEvent::SupplySignalThrown { player, position } => (
                "SupplySignal",
                vec![replace_chars(player), self.grid.label(*position)],
            ),
            NotificationEvent::ChristmasStarted => ("Christmas", Vec::new()),
            NotificationEvent::EasterStarted => ("Easter", Vec::new()),
            NotificationEvent::EasterEnded { winner } => {
                ("EasterWinner", vec![winner_label(winner.as_deref())])
            }
            NotificationEvent::HalloweenStarted => ("Halloween", Vec::new()),
            NotificationEvent::HalloweenEnded { winner } => {
                ("HalloweenWinner", vec![winner_label(winner.as_deref())])
            }
            NotificationEvent::Chat { player, message } => {
                ("Chat", vec![replace_chars(player), replace_chars(message)])
            }
            NotificationEvent::TeamChat { player, message } => {
                ("ChatTeam", vec![replace_chars(player), replace_chars(message)])
            }
            NotificationEvent::PlayerConnected { player, is_admin } => {
                if global.hide_admin && *is_admin {
                    return Ok(None);
                }
                ("PlayerConnected", vec![replace_chars(player)])
            }
            NotificationEvent::PlayerConnectedInfo { player, steam_id, ip } => (
                "PlayerConnectedInfo",
                vec![replace_chars(player), steam_id.clone(), ip.clone()],
            ),
            NotificationEvent::PlayerDisconnected { player, reason, is_admin } => {
                if global.hide_admin && *is_admin {
                    return Ok(None);
                }
                ("PlayerDisconnected", vec![replace_chars(player), reason.clone()])
            }
            NotificationEvent::PlayerDeath { player, is_npc } => {
                if global.hide_npc && *is_npc {
                    return Ok(None);
                }
                ("Death", vec![replace_chars(player)])
            }
            NotificationEvent::DeathNotice { message } => (
                "DeathNotes",
                vec![strip_markup_tags(message, &global.tags_replacement)],
            ),
            NotificationEvent::PlayerRespawned { player, position } => (
                "PlayerRespawned",
                vec![replace_chars(player), self.grid.label(*position)],
            ),
            NotificationEvent::DuelEnded { winner, loser } => {
                ("Duel", vec![replace_chars(winner), replace_chars(loser)])
            }
            NotificationEvent::RaidableBaseStarted { position, difficulty } => (
                "RaidableBaseStarted",
                vec![self.grid.label(*position), self.difficulty_label(*difficulty)?],
            ),
            NotificationEvent::RaidableBaseEnded { position, difficulty } => (
                "RaidableBaseEnded",
                vec![self.grid.label(*position), self.difficulty_label(*difficulty)?],
            ),
            NotificationEvent::DangerousTreasuresStarted { position } => {
                ("DangerousTreasuresStarted", vec![self.grid.label(*position)])
            }
            NotificationEvent::DangerousTreasuresEnded { position } => {
                ("DangerousTreasuresEnded", vec![self.grid.label(*position)])
            }
            NotificationEvent::ClanCreated { tag } => ("ClanCreated", vec![replace_chars(tag)]),
            NotificationEvent::ClanDisbanded { tag } => {
                ("ClanDisbanded", vec![replace_chars(tag)])
            }
            NotificationEvent::RconConnectionOpened { ip } => {
                ("RconConnection", vec![ip.clone()])
            }
            NotificationEvent::RconCommandRun { ip, command, args } => {
                if global
                    .rcon_command_blacklist
                    .iter()
                    .any(|blocked| blocked.eq_ignore_ascii_case(command))
                {
                    return Ok(None);
                }

                let mut full_command = command.clone();
                for arg in args {
                    full_command.push(' ');
                    full_command.push_str(arg);
                }
                ("RconCommand", vec![full_command, ip.clone()])
            }
            NotificationEvent::ServerMessage { message } => {
                ("ServerMessage", vec![message.clone()])
            }
            NotificationEvent::ServerInitialized => ("Initialized", Vec::new()),
            NotificationEvent::ServerShutdown => ("Shutdown", Vec::new()),
            NotificationEvent::UserBanned { name, id, ip, reason } => (
                "UserBanned",
                vec![replace_chars(name), id.clone(), ip.clone(), replace_chars(reason)],
            ),
            NotificationEvent::UserUnbanned { name, id, ip } => (
                "UserUnbanned",
                vec![replace_chars(name), id.clone(), ip.clone()],
            ),
            NotificationEvent::UserKicked { name, id, reason } => (
                "UserKicked",
                vec![replace_chars(name), id.clone(), replace_chars(reason)],
            ),
            NotificationEvent::UserMuted { target, initiator, duration, reason } => (
                "UserMuted",
                vec![
                    replace_chars(target),
                    replace_chars(initiator),
                    duration.clone().unwrap_or_else(|| MUTED_FOREVER.to_string()),
                    replace_chars(reason),
                ],
            ),
            NotificationEvent::UserUnmuted { target, initiator } => (
                "UserUnmuted",
                vec![replace_chars(target), replace_chars(initiator)],
            ),
            NotificationEvent::UserNameUpdated { id, old_name, new_name } => {
                if old_name == new_name || old_name == UNNAMED_PLAYER {
                    return Ok(None);
                }
                (
                    "UserNameUpdated",
                    vec![replace_chars(old_name), replace_chars(new_name), id.clone()],
                )
            }
        };

        Ok(Some(planned))
    }

    fn difficulty_label(&self, difficulty: u32) -> Result<String, DispatchError> {
        let key = match difficulty {
            0 => "Easy",
            1 => "Medium",
            2 => "Hard",
            3 => "Expert",
            4 => "Nightmare",
            other => return Err(DispatchError::UnknownDifficulty(other)),
        };

        Ok(self.formatter.label(key).unwrap_or_else(|| key.to_string()))
    }
}

fn winner_label(winner: Option<&str>) -> String {
    match winner {
        Some(name) => replace_chars(name),
        None => NO_WINNER.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;
    use crate::queue::test_channel;
    use notify_core::config::NotifierConfig;
    use notify_core::event::Position;
    use notify_core::grid::WorldGrid;
    use notify_core::templates::DefaultTemplates;

    struct Harness {
        dispatcher: EventDispatcher,
        clock: Arc<FixedClock>,
        rx: tokio::sync::mpsc::UnboundedReceiver<crate::queue::QueuedMessage>,
    }

    fn harness(mutate: impl FnOnce(&mut NotifierConfig)) -> Harness {
        let mut config = NotifierConfig::default();
        mutate(&mut config);

        let (handle, rx) = test_channel();
        let clock = Arc::new(FixedClock::at(1_700_000_000));
        let dispatcher = EventDispatcher::new(
            Arc::new(config),
            Arc::new(DefaultTemplates),
            Arc::new(WorldGrid::new(4500.0)),
            clock.clone(),
            handle,
        );

        Harness { dispatcher, clock, rx }
    }

    fn enable(settings: &mut notify_core::config::EventSettings) {
        settings.enabled = true;
        settings.webhook_url = "https://discord.test/api/webhooks/1/abc".to_string();
    }

    #[test]
    fn disabled_kind_is_a_no_op() {
        let mut harness = harness(|_| {});
        harness.dispatcher.notify(NotificationEvent::ServerInitialized);
        assert!(harness.rx.try_recv().is_err());
    }

    #[test]
    fn enabled_event_enqueues_rendered_text() {
        let mut harness = harness(|config| enable(&mut config.events.server_state));
        harness.dispatcher.notify(NotificationEvent::ServerInitialized);

        let message = harness.rx.try_recv().expect("message enqueued");
        assert_eq!(message.webhook_url, "https://discord.test/api/webhooks/1/abc");
        assert_eq!(message.body, ":ballot_box_with_check: 12:00 Server is online again!");
    }

    #[test]
    fn chat_arguments_are_sanitized() {
        let mut harness = harness(|config| enable(&mut config.events.chat));
        harness.dispatcher.notify(NotificationEvent::Chat {
            player: "ev*l_pl~ayer".to_string(),
            message: "hi @everyone".to_string(),
        });

        let message = harness.rx.try_recv().expect("message enqueued");
        assert_eq!(message.body, ":speech_left: 12:00 **ev＊l＿pl～ayer**: hi everyone");
    }

    #[test]
    fn spawn_events_carry_grid_labels() {
        let mut harness = harness(|config| enable(&mut config.events.bradley));
        harness.dispatcher.notify(NotificationEvent::BradleySpawned {
            position: Position::new(0.0, 0.0, 0.0),
        });

        let message = harness.rx.try_recv().expect("message enqueued");
        assert_eq!(message.body, ":dagger: 12:00 Bradley spawned `P15`");
    }

    #[test]
    fn hide_admin_suppresses_connect_and_disconnect() {
        let mut harness = harness(|config| {
            config.global.hide_admin = true;
            enable(&mut config.events.player_connected);
            enable(&mut config.events.player_disconnected);
        });

        harness.dispatcher.notify(NotificationEvent::PlayerConnected {
            player: "admin".to_string(),
            is_admin: true,
        });
        harness.dispatcher.notify(NotificationEvent::PlayerDisconnected {
            player: "admin".to_string(),
            reason: "quit".to_string(),
            is_admin: true,
        });
        assert!(harness.rx.try_recv().is_err());

        harness.dispatcher.notify(NotificationEvent::PlayerConnected {
            player: "regular".to_string(),
            is_admin: false,
        });
        assert!(harness.rx.try_recv().is_ok());
    }

    #[test]
    fn hide_npc_suppresses_npc_deaths() {
        let mut harness = harness(|config| {
            config.global.hide_npc = true;
            enable(&mut config.events.death);
        });

        harness.dispatcher.notify(NotificationEvent::PlayerDeath {
            player: "scientist".to_string(),
            is_npc: true,
        });
        assert!(harness.rx.try_recv().is_err());
    }

    #[test]
    fn supply_drop_landing_is_deduplicated_within_window() {
        let mut harness = harness(|config| enable(&mut config.events.supply_drop));
        let landed = NotificationEvent::SupplyDropLanded {
            entity_id: 42,
            position: Position::new(0.0, 0.0, 0.0),
        };

        harness.dispatcher.notify(landed.clone());
        assert!(harness.rx.try_recv().is_ok());

        harness.clock.advance(30);
        harness.dispatcher.notify(landed.clone());
        assert!(harness.rx.try_recv().is_err());

        harness.clock.advance(31);
        harness.dispatcher.notify(landed);
        assert!(harness.rx.try_recv().is_ok());
    }

    #[test]
    fn blacklisted_rcon_commands_are_dropped() {
        let mut harness = harness(|config| enable(&mut config.events.rcon_command));

        harness.dispatcher.notify(NotificationEvent::RconCommandRun {
            ip: "10.0.0.1".to_string(),
            command: "STATUS".to_string(),
            args: Vec::new(),
        });
        assert!(harness.rx.try_recv().is_err());

        harness.dispatcher.notify(NotificationEvent::RconCommandRun {
            ip: "10.0.0.1".to_string(),
            command: "kick".to_string(),
            args: vec!["dev".to_string(), "spam".to_string()],
        });
        let message = harness.rx.try_recv().expect("message enqueued");
        assert_eq!(
            message.body,
            ":satellite: 12:00 RCON command `kick dev spam` is run from `10.0.0.1`"
        );
    }

    #[test]
    fn unknown_raid_difficulty_is_dropped() {
        let mut harness = harness(|config| enable(&mut config.events.raidable_bases));
        harness.dispatcher.notify(NotificationEvent::RaidableBaseStarted {
            position: Position::new(0.0, 0.0, 0.0),
            difficulty: 9,
        });
        assert!(harness.rx.try_recv().is_err());

        harness.dispatcher.notify(NotificationEvent::RaidableBaseStarted {
            position: Position::new(0.0, 0.0, 0.0),
            difficulty: 4,
        });
        let message = harness.rx.try_recv().expect("message enqueued");
        assert_eq!(
            message.body,
            ":homes: 12:00 Nightmare Raidable Base spawned at `P15`"
        );
    }

    #[test]
    fn identity_and_placeholder_renames_are_dropped() {
        let mut harness = harness(|config| enable(&mut config.events.user_name_update));

        harness.dispatcher.notify(NotificationEvent::UserNameUpdated {
            id: "7656".to_string(),
            old_name: "same".to_string(),
            new_name: "same".to_string(),
        });
        harness.dispatcher.notify(NotificationEvent::UserNameUpdated {
            id: "7656".to_string(),
            old_name: "Unnamed".to_string(),
            new_name: "fresh".to_string(),
        });
        assert!(harness.rx.try_recv().is_err());

        harness.dispatcher.notify(NotificationEvent::UserNameUpdated {
            id: "7656".to_string(),
            old_name: "old".to_string(),
            new_name: "new".to_string(),
        });
        assert!(harness.rx.try_recv().is_ok());
    }

    #[test]
    fn empty_webhook_url_drops_without_panicking() {
        let mut harness = harness(|config| {
            config.events.chat.enabled = true;
        });

        harness.dispatcher.notify(NotificationEvent::Chat {
            player: "dev".to_string(),
            message: "hello".to_string(),
        });
        assert!(harness.rx.try_recv().is_err());
    }

    #[test]
    fn muted_without_duration_reads_ever() {
        let mut harness = harness(|config| enable(&mut config.events.user_muted));
        harness.dispatcher.notify(NotificationEvent::UserMuted {
            target: "dev".to_string(),
            initiator: "mod".to_string(),
            duration: None,
            reason: "spam".to_string(),
        });

        let message = harness.rx.try_recv().expect("message enqueued");
        assert_eq!(
            message.body,
            ":mute: 12:00 `dev` was muted by `mod` for `ever` (`spam`)"
        );
    }
}
