//! `/starterpack` admin command: parsing, dispatch and tab completion.
//!
//! Every sub-command except `help` and `version` requires
//! [`PERMISSION_ADMIN`]. Replies go back to the issuing [`CommandSender`];
//! targets of give/equip/force/reset get a short notice of their own.

use log::{debug, error};
use uuid::Uuid;

use super::{StarterPackPlugin, PLUGIN_NAME};
use crate::host::{GamePlayer, GameServer, PERMISSION_ADMIN};
use crate::logutil::escape_log;
use crate::pack::text::{ChatColor, FormattedText};
use crate::pack::StarterPackError;
use crate::storage::AttributeStore;

pub const COMMAND: &str = "starterpack";
pub const ALIASES: [&str; 2] = ["sp", "starter"];

const PUBLIC_SUBCOMMANDS: [&str; 2] = ["help", "version"];
const ALL_SUBCOMMANDS: [&str; 8] = [
    "help", "version", "reload", "give", "equip", "force", "reset", "stats",
];

/// Whoever issued the command: the console or a player.
pub trait CommandSender {
    fn name(&self) -> &str;
    fn has_permission(&self, node: &str) -> bool;
    fn send_message(&mut self, message: &FormattedText);
}

/// Server console. Holds every permission; replies are collected.
#[derive(Debug, Default)]
pub struct ConsoleSender {
    pub messages: Vec<FormattedText>,
}

impl ConsoleSender {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lines(&self) -> Vec<String> {
        self.messages.iter().map(FormattedText::plain).collect()
    }
}

impl CommandSender for ConsoleSender {
    fn name(&self) -> &str {
        "CONSOLE"
    }

    fn has_permission(&self, _node: &str) -> bool {
        true
    }

    fn send_message(&mut self, message: &FormattedText) {
        self.messages.push(message.clone());
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResetTarget {
    All,
    Player(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AdminCommand {
    Help,
    Version,
    Reload,
    Give(String),
    Equip(String),
    Force(String),
    Reset(ResetTarget),
    Stats,
    Unknown(String),
    /// A sub-command that needs a player argument was given none.
    Usage(&'static str),
}

impl AdminCommand {
    /// Parse the arguments following `/starterpack`.
    pub fn parse(args: &[&str]) -> Self {
        let Some(first) = args.first() else {
            return AdminCommand::Help;
        };
        let sub = first.to_ascii_lowercase();
        let target = args.get(1).map(|s| s.to_string());

        match (sub.as_str(), target) {
            ("help", _) => AdminCommand::Help,
            ("version", _) => AdminCommand::Version,
            ("reload", _) => AdminCommand::Reload,
            ("stats", _) => AdminCommand::Stats,
            ("give", Some(name)) => AdminCommand::Give(name),
            ("equip", Some(name)) => AdminCommand::Equip(name),
            ("force", Some(name)) => AdminCommand::Force(name),
            ("reset", Some(name)) if name.eq_ignore_ascii_case("all") => {
                AdminCommand::Reset(ResetTarget::All)
            }
            ("reset", Some(name)) => AdminCommand::Reset(ResetTarget::Player(name)),
            ("give", None) => AdminCommand::Usage("give"),
            ("equip", None) => AdminCommand::Usage("equip"),
            ("force", None) => AdminCommand::Usage("force"),
            ("reset", None) => AdminCommand::Usage("reset"),
            _ => AdminCommand::Unknown(sub),
        }
    }

    /// Sub-command name, used for permission denials and usage lines.
    fn subcommand(&self) -> Option<&'static str> {
        match self {
            AdminCommand::Help => Some("help"),
            AdminCommand::Version => Some("version"),
            AdminCommand::Reload => Some("reload"),
            AdminCommand::Give(_) => Some("give"),
            AdminCommand::Equip(_) => Some("equip"),
            AdminCommand::Force(_) => Some("force"),
            AdminCommand::Reset(_) => Some("reset"),
            AdminCommand::Stats => Some("stats"),
            AdminCommand::Usage(sub) => Some(*sub),
            AdminCommand::Unknown(_) => None,
        }
    }

    pub fn requires_admin(&self) -> bool {
        self.subcommand()
            .is_some_and(|sub| !PUBLIC_SUBCOMMANDS.contains(&sub))
    }
}

fn denial(sub: &str) -> StarterPackError {
    let action = match sub {
        "reload" => "reload the configuration",
        "give" => "give starter packs",
        "equip" => "equip starter packs",
        "force" => "force equip starter packs",
        "reset" => "reset starter pack data",
        "stats" => "view starter pack statistics",
        _ => "use this command",
    };
    StarterPackError::PermissionDenied(action.to_string())
}

fn usage(sub: &str) -> String {
    match sub {
        "reset" => format!("Usage: /{} reset <player|all>", COMMAND),
        other => format!("Usage: /{} {} <player>", COMMAND, other),
    }
}

fn say(sender: &mut dyn CommandSender, text: impl Into<String>, color: ChatColor) {
    sender.send_message(&FormattedText::colored(text, color));
}

fn labelled(label: &str, value: &str, value_color: ChatColor) -> FormattedText {
    FormattedText::colored(label, ChatColor::Yellow).append(FormattedText::colored(value, value_color))
}

fn yes_no(flag: bool) -> (&'static str, ChatColor) {
    if flag {
        ("Yes", ChatColor::Green)
    } else {
        ("No", ChatColor::Red)
    }
}

fn notify<G: GameServer>(server: &mut G, player: Uuid, text: String, color: ChatColor) {
    if let Some(target) = server.player_mut(player) {
        target.send_message(&FormattedText::colored(text, color));
    }
}

/// Resolve an online player by name, replying to the sender when absent.
fn resolve<G: GameServer>(
    sender: &mut dyn CommandSender,
    server: &G,
    name: &str,
) -> Option<(Uuid, String)> {
    let found = server
        .find_player(name)
        .and_then(|id| server.player(id).map(|p| (id, p.name().to_string())));
    if found.is_none() {
        say(
            sender,
            format!("Player '{}' not found or not online.", name),
            ChatColor::Red,
        );
    }
    found
}

impl<S: AttributeStore> StarterPackPlugin<S> {
    /// Parse and run a `/starterpack` invocation.
    pub fn dispatch_command<G: GameServer>(
        &mut self,
        sender: &mut dyn CommandSender,
        server: &mut G,
        args: &[&str],
    ) {
        let command = AdminCommand::parse(args);
        self.execute(sender, server, command);
    }

    pub fn execute<G: GameServer>(
        &mut self,
        sender: &mut dyn CommandSender,
        server: &mut G,
        command: AdminCommand,
    ) {
        if command.requires_admin() && !sender.has_permission(PERMISSION_ADMIN) {
            let denied = denial(command.subcommand().unwrap_or_default());
            debug!("{} refused: {}", escape_log(sender.name()), denied);
            say(sender, denied.to_string(), ChatColor::Red);
            return;
        }

        match command {
            AdminCommand::Help => self.send_help(sender),
            AdminCommand::Version => self.send_version(sender),
            AdminCommand::Reload => self.handle_reload(sender),
            AdminCommand::Give(name) => self.handle_give(sender, server, &name),
            AdminCommand::Equip(name) => self.handle_equip(sender, server, &name),
            AdminCommand::Force(name) => self.handle_force(sender, server, &name),
            AdminCommand::Reset(target) => self.handle_reset(sender, server, target),
            AdminCommand::Stats => self.handle_stats(sender, &*server),
            AdminCommand::Usage(sub) => say(sender, usage(sub), ChatColor::Red),
            AdminCommand::Unknown(_) => say(
                sender,
                format!(
                    "Unknown command. Use /{} help for available commands.",
                    COMMAND
                ),
                ChatColor::Red,
            ),
        }
    }

    fn handle_reload(&mut self, sender: &mut dyn CommandSender) {
        match self.reload() {
            Ok(()) => say(sender, "Configuration reloaded successfully!", ChatColor::Green),
            Err(e) => {
                error!("Error reloading config: {}", e);
                say(
                    sender,
                    format!("Error reloading configuration: {}", e),
                    ChatColor::Red,
                );
            }
        }
    }

    fn handle_give<G: GameServer>(
        &mut self,
        sender: &mut dyn CommandSender,
        server: &mut G,
        name: &str,
    ) {
        let Some((id, target)) = resolve(sender, &*server, name) else {
            return;
        };
        match self.manager.force_give(server, id) {
            Ok(_) => {
                say(
                    sender,
                    format!("Successfully gave starter pack to {}!", target),
                    ChatColor::Green,
                );
                notify(
                    server,
                    id,
                    format!("You have been given a starter pack by {}!", sender.name()),
                    ChatColor::Green,
                );
            }
            Err(_) => say(
                sender,
                format!("Failed to give starter pack to {}.", target),
                ChatColor::Red,
            ),
        }
    }

    fn handle_equip<G: GameServer>(
        &mut self,
        sender: &mut dyn CommandSender,
        server: &mut G,
        name: &str,
    ) {
        let Some((id, target)) = resolve(sender, &*server, name) else {
            return;
        };
        match self.manager.equip(server, id) {
            Ok(_) => {
                say(
                    sender,
                    format!("Successfully equipped starter items on {}!", target),
                    ChatColor::Green,
                );
                notify(
                    server,
                    id,
                    format!("You have been equipped with starter items by {}!", sender.name()),
                    ChatColor::Green,
                );
            }
            Err(StarterPackError::AlreadyEquipped(_)) => say(
                sender,
                format!(
                    "{} already has equipment. Use '/{} force {}' to override.",
                    target, COMMAND, target
                ),
                ChatColor::Yellow,
            ),
            Err(_) => say(
                sender,
                format!("Failed to equip starter items on {}.", target),
                ChatColor::Red,
            ),
        }
    }

    fn handle_force<G: GameServer>(
        &mut self,
        sender: &mut dyn CommandSender,
        server: &mut G,
        name: &str,
    ) {
        let Some((id, target)) = resolve(sender, &*server, name) else {
            return;
        };
        match self.manager.force_equip(server, id) {
            Ok(_) => {
                say(
                    sender,
                    format!("Successfully force equipped starter items on {}!", target),
                    ChatColor::Green,
                );
                notify(
                    server,
                    id,
                    format!(
                        "Your equipment has been replaced with starter items by {}!",
                        sender.name()
                    ),
                    ChatColor::Yellow,
                );
                notify(
                    server,
                    id,
                    "Your previous equipment has been moved to your inventory or dropped.".into(),
                    ChatColor::Gray,
                );
            }
            Err(_) => say(
                sender,
                format!("Failed to force equip starter items on {}.", target),
                ChatColor::Red,
            ),
        }
    }

    fn handle_reset<G: GameServer>(
        &mut self,
        sender: &mut dyn CommandSender,
        server: &mut G,
        target: ResetTarget,
    ) {
        let name = match target {
            ResetTarget::All => {
                match self.manager.reset_all(&*server) {
                    Ok(count) => {
                        say(
                            sender,
                            format!(
                                "Successfully reset starter pack status for {} online players!",
                                count
                            ),
                            ChatColor::Green,
                        );
                        say(
                            sender,
                            "Note: This only affects online players. Offline players will retain their status.",
                            ChatColor::Gray,
                        );
                    }
                    Err(_) => say(
                        sender,
                        "Failed to reset starter pack status for all players.",
                        ChatColor::Red,
                    ),
                }
                return;
            }
            ResetTarget::Player(name) => name,
        };

        let Some((id, target)) = resolve(sender, &*server, &name) else {
            return;
        };
        match self.manager.reset(&*server, id) {
            Ok(()) => {
                say(
                    sender,
                    format!("Successfully reset starter pack status for {}!", target),
                    ChatColor::Green,
                );
                notify(
                    server,
                    id,
                    format!(
                        "Your starter pack status has been reset by {}. You can receive it again on next join!",
                        sender.name()
                    ),
                    ChatColor::Yellow,
                );
            }
            Err(_) => say(
                sender,
                format!("Failed to reset starter pack status for {}.", target),
                ChatColor::Red,
            ),
        }
    }

    fn handle_stats<G: GameServer>(&mut self, sender: &mut dyn CommandSender, server: &G) {
        say(sender, format!("=== {} Statistics ===", PLUGIN_NAME), ChatColor::Gold);
        match self.manager.stats(server) {
            Ok(stats) => say(sender, stats.to_string(), ChatColor::Gray),
            Err(e) => {
                error!("Error collecting starter pack stats: {}", e);
                say(sender, "Failed to collect statistics.", ChatColor::Red);
            }
        }
    }

    fn send_version(&self, sender: &mut dyn CommandSender) {
        say(sender, format!("=== {} Plugin ===", PLUGIN_NAME), ChatColor::Gold);
        sender.send_message(&labelled("Version: ", env!("CARGO_PKG_VERSION"), ChatColor::White));
        sender.send_message(&labelled("Author: ", env!("CARGO_PKG_AUTHORS"), ChatColor::White));
        sender.send_message(&labelled(
            "Description: ",
            env!("CARGO_PKG_DESCRIPTION"),
            ChatColor::White,
        ));
        sender.send_message(&FormattedText::default());
        say(sender, "Configuration Status:", ChatColor::Gold);
        for (label, flag) in [
            ("Enabled: ", self.config.starter_pack.enabled),
            ("Broadcast: ", self.config.starter_pack.broadcast),
            ("Debug: ", self.config.debug.enabled),
        ] {
            let (text, color) = yes_no(flag);
            sender.send_message(&labelled(label, text, color));
        }
    }

    fn send_help(&self, sender: &mut dyn CommandSender) {
        say(sender, format!("=== {} Commands ===", PLUGIN_NAME), ChatColor::Gold);
        let mut lines = vec![
            ("help", "Show this help message"),
            ("version", "Show plugin version and status"),
        ];
        if sender.has_permission(PERMISSION_ADMIN) {
            lines.extend([
                ("reload", "Reload configuration"),
                ("give <player>", "Give starter pack to a player"),
                ("equip <player>", "Equip starter items (only if no equipment)"),
                ("force <player>", "Force equip starter items (overrides existing)"),
                ("reset <player|all>", "Reset starter pack status"),
                ("stats", "Show starter pack statistics"),
            ]);
        }
        for (usage, description) in lines {
            sender.send_message(
                &FormattedText::colored(format!("/{} {}", COMMAND, usage), ChatColor::Yellow)
                    .append(FormattedText::colored(
                        format!(" - {}", description),
                        ChatColor::Gray,
                    )),
            );
        }
        sender.send_message(&FormattedText::default());
        let aliases = ALIASES
            .iter()
            .map(|a| format!("/{}", a))
            .collect::<Vec<_>>()
            .join(", ");
        sender.send_message(
            &FormattedText::colored("Aliases: ", ChatColor::Aqua)
                .append(FormattedText::colored(aliases, ChatColor::White)),
        );
    }

    /// Suggestions for the argument currently being typed.
    pub fn tab_complete<G: GameServer>(
        &self,
        sender: &dyn CommandSender,
        server: &G,
        args: &[&str],
    ) -> Vec<String> {
        let admin = sender.has_permission(PERMISSION_ADMIN);
        match args {
            [partial] => {
                let input = partial.to_ascii_lowercase();
                let options: &[&str] = if admin {
                    &ALL_SUBCOMMANDS
                } else {
                    &PUBLIC_SUBCOMMANDS
                };
                options
                    .iter()
                    .filter(|sub| sub.starts_with(&input))
                    .map(|sub| sub.to_string())
                    .collect()
            }
            [sub, partial] if admin => {
                let sub = sub.to_ascii_lowercase();
                let input = partial.to_ascii_lowercase();
                let mut out = Vec::new();
                match sub.as_str() {
                    "reset" => {
                        if "all".starts_with(&input) {
                            out.push("all".to_string());
                        }
                    }
                    "give" | "equip" | "force" => {}
                    _ => return out,
                }
                out.extend(
                    server
                        .online_players()
                        .into_iter()
                        .filter_map(|id| server.player(id))
                        .map(|p| p.name().to_string())
                        .filter(|name| name.to_ascii_lowercase().starts_with(&input)),
                );
                out
            }
            _ => Vec::new(),
        }
    }
}
