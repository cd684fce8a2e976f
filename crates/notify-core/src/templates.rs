use regex::Regex;
use std::collections::HashMap;
use std::sync::LazyLock;

/// Placeholder substituted for a positional slot with no matching argument.
pub const MISSING_ARG_PLACEHOLDER: &str = "unknown";

static DEFAULT_CATALOG: LazyLock<HashMap<&'static str, &'static str>> = LazyLock::new(|| {
    HashMap::from([
        ("Bradley", ":dagger: {time} Bradley spawned `{0}`"),
        ("CargoPlane", ":airplane: {time} Cargo Plane incoming `{0}`"),
        ("CargoShip", ":ship: {time} Cargo Ship incoming `{0}`"),
        ("Chat", ":speech_left: {time} **{0}**: {1}"),
        ("ChatTeam", ":busts_in_silhouette: {time} **{0}**: {1}"),
        ("Chinook", ":helicopter: {time} Chinook 47 incoming `{0}`"),
        ("Christmas", ":christmas_tree: {time} Christmas event started"),
        ("ClanCreated", ":family_mwgb: {time} **{0}** clan was created"),
        ("ClanDisbanded", ":family_mwgb: {time} **{0}** clan was disbanded"),
        (
            "DangerousTreasuresEnded",
            ":pirate_flag: {time} Dangerous Treasures event at `{0}` is ended",
        ),
        (
            "DangerousTreasuresStarted",
            ":pirate_flag: {time} Dangerous Treasures started at `{0}`",
        ),
        ("Death", ":skull: {time} `{0}` died"),
        ("DeathNotes", ":skull_crossbones: {time} {0}"),
        ("Duel", ":crossed_swords: {time} `{0}` has defeated `{1}` in a duel"),
        ("Easter", ":egg: {time} Easter event started"),
        ("EasterWinner", ":egg: {time} Easter event ended. The winner is `{0}`"),
        ("Halloween", ":jack_o_lantern: {time} Halloween event started"),
        (
            "HalloweenWinner",
            ":jack_o_lantern: {time} Halloween event ended. The winner is `{0}`",
        ),
        ("Helicopter", ":dagger: {time} Helicopter incoming `{0}`"),
        ("Initialized", ":ballot_box_with_check: {time} Server is online again!"),
        ("LockedCrate", ":package: {time} Codelocked crate is here `{0}`"),
        ("PersonalHelicopter", ":dagger: {time} Personal Helicopter incoming `{0}`"),
        ("PlayerConnected", ":white_check_mark: {time} {0} connected"),
        (
            "PlayerConnectedInfo",
            ":detective: {time} {0} connected. SteamID: `{1}` IP: `{2}`",
        ),
        ("PlayerDisconnected", ":x: {time} {0} disconnected ({1})"),
        ("PlayerRespawned", ":baby_symbol: {time} `{0}` has been spawned at `{1}`"),
        ("RaidableBaseEnded", ":homes: {time} {1} Raidable Base at `{0}` is ended"),
        ("RaidableBaseStarted", ":homes: {time} {1} Raidable Base spawned at `{0}`"),
        ("RconCommand", ":satellite: {time} RCON command `{0}` is run from `{1}`"),
        ("RconConnection", ":satellite: {time} RCON connection is opened from `{0}`"),
        ("SantaSleigh", ":santa: {time} SantaSleigh Event started"),
        ("ServerMessage", ":desktop: {time} `{0}`"),
        ("Shutdown", ":stop_sign: {time} Server is shutting down!"),
        ("SupplyDrop", ":parachute: {time} SupplyDrop incoming at `{0}`"),
        ("SupplyDropLanded", ":gift: {time} SupplyDrop landed at `{0}`"),
        ("SupplySignal", ":firecracker: {time} SupplySignal was thrown by `{0}` at `{1}`"),
        (
            "UserBanned",
            ":no_entry: {time} Player `{0}` SteamID: `{1}` IP: `{2}` was banned: `{3}`",
        ),
        ("UserKicked", ":hiking_boot: {time} Player `{0}` SteamID: `{1}` was kicked: `{2}`"),
        ("UserMuted", ":mute: {time} `{0}` was muted by `{1}` for `{2}` (`{3}`)"),
        ("UserNameUpdated", ":label: {time} `{0}` changed name to `{1}` SteamID: `{2}`"),
        (
            "UserUnbanned",
            ":ok: {time} Player `{0}` SteamID: `{1}` IP: `{2}` was unbanned",
        ),
        ("UserUnmuted", ":speaker: {time} `{0}` was unmuted `{1}`"),
        ("Easy", "Easy"),
        ("Medium", "Medium"),
        ("Hard", "Hard"),
        ("Expert", "Expert"),
        ("Nightmare", "Nightmare"),
    ])
});

static UNRESOLVED_SLOT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{\d+\}").expect("slot pattern must compile"));

/// Source of message templates, keyed by event template name. Hosts that ship
/// their own localization implement this over their string store.
pub trait TemplateSource: Send + Sync {
    fn template(&self, key: &str) -> Option<String>;
}

/// Built-in English catalog matching the stock notifier messages.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultTemplates;

impl TemplateSource for DefaultTemplates {
    fn template(&self, key: &str) -> Option<String> {
        DEFAULT_CATALOG.get(key).map(|template| (*template).to_string())
    }
}

/// Substitutes `{time}` and positional `{0}`, `{1}`, ... slots into a
/// template. Slots with no matching argument render as a fixed placeholder
/// rather than erroring.
pub fn fill_template(template: &str, time: &str, args: &[String]) -> String {
    let mut output = template.replace("{time}", time);
    for (index, arg) in args.iter().enumerate() {
        output = output.replace(&format!("{{{index}}}"), arg);
    }

    UNRESOLVED_SLOT
        .replace_all(&output, MISSING_ARG_PLACEHOLDER)
        .into_owned()
}
