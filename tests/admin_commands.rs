//! `/starterpack` sub-commands driven through the plugin.
mod common;

use starterpack::host::{GameServer, LocalPlayer, PERMISSION_ADMIN};
use starterpack::pack::{EquipmentSlot, FormattedText, ItemStack, Material};
use starterpack::plugin::{CommandSender, ConsoleSender};

/// A player issuing commands from chat.
struct ChatSender {
    name: String,
    admin: bool,
    replies: Vec<String>,
}

impl ChatSender {
    fn new(name: &str, admin: bool) -> Self {
        Self {
            name: name.to_string(),
            admin,
            replies: Vec::new(),
        }
    }
}

impl CommandSender for ChatSender {
    fn name(&self) -> &str {
        &self.name
    }

    fn has_permission(&self, node: &str) -> bool {
        self.admin && node == PERMISSION_ADMIN
    }

    fn send_message(&mut self, message: &FormattedText) {
        self.replies.push(message.plain());
    }
}

#[test]
fn give_equip_force_from_an_admin() {
    let mut plugin = common::memory_plugin(common::fixture_config());
    let (mut server, ids) = common::server_with(&["Steve"]);
    let mut admin = ChatSender::new("Op", true);

    plugin.dispatch_command(&mut admin, &mut server, &["give", "STEVE"]);
    plugin.dispatch_command(&mut admin, &mut server, &["equip", "Steve"]);
    plugin.dispatch_command(&mut admin, &mut server, &["equip", "Steve"]);
    plugin.dispatch_command(&mut admin, &mut server, &["force", "Steve"]);
    assert_eq!(
        admin.replies,
        vec![
            "Successfully gave starter pack to Steve!",
            "Successfully equipped starter items on Steve!",
            "Steve already has equipment. Use '/starterpack force Steve' to override.",
            "Successfully force equipped starter items on Steve!",
        ]
    );

    let steve = server.player(ids[0]).unwrap();
    assert_eq!(
        steve.inbox_plain(),
        vec![
            "You have been given a starter pack by Op!",
            "You have been equipped with starter items by Op!",
            "Your equipment has been replaced with starter items by Op!",
            "Your previous equipment has been moved to your inventory or dropped.",
        ]
    );
    // The first set of gear was moved into storage by `force`.
    assert_eq!(steve.inventory.count(Material::LeatherHelmet), 1);
    assert_eq!(steve.inventory.count(Material::StoneSword), 1);
    assert!(steve.inventory.get(EquipmentSlot::Helmet).is_some());
}

#[test]
fn give_does_not_mark_receipt() {
    let mut plugin = common::memory_plugin(common::fixture_config());
    let (mut server, ids) = common::server_with(&["Steve"]);
    let mut console = ConsoleSender::new();
    plugin.dispatch_command(&mut console, &mut server, &["give", "Steve"]);
    assert!(!plugin.manager_mut().has_received(ids[0]).unwrap());
}

#[test]
fn non_admin_is_denied_everywhere_but_help_and_version() {
    let mut plugin = common::memory_plugin(common::fixture_config());
    let (mut server, ids) = common::server_with(&["Steve"]);
    let mut guest = ChatSender::new("Guest", false);

    for args in [
        vec!["reload"],
        vec!["give", "Steve"],
        vec!["equip", "Steve"],
        vec!["force", "Steve"],
        vec!["reset", "all"],
        vec!["stats"],
        vec!["give"],
    ] {
        plugin.dispatch_command(&mut guest, &mut server, &args);
    }
    assert_eq!(
        guest.replies,
        vec![
            "You don't have permission to reload the configuration.",
            "You don't have permission to give starter packs.",
            "You don't have permission to equip starter packs.",
            "You don't have permission to force equip starter packs.",
            "You don't have permission to reset starter pack data.",
            "You don't have permission to view starter pack statistics.",
            "You don't have permission to give starter packs.",
        ]
    );
    let steve = server.player(ids[0]).unwrap();
    assert!(steve.inventory.storage_items().next().is_none());
    assert!(steve.inbox.is_empty());

    guest.replies.clear();
    plugin.dispatch_command(&mut guest, &mut server, &["version"]);
    assert_eq!(guest.replies[0], "=== StarterPack Plugin ===");
    assert!(guest.replies.contains(&"Broadcast: Yes".to_string()));
}

#[test]
fn usage_and_unknown_target_messages() {
    let mut plugin = common::memory_plugin(common::fixture_config());
    let (mut server, _) = common::server_with(&["Steve"]);
    let mut console = ConsoleSender::new();

    plugin.dispatch_command(&mut console, &mut server, &["force"]);
    plugin.dispatch_command(&mut console, &mut server, &["reset"]);
    plugin.dispatch_command(&mut console, &mut server, &["reset", "Herobrine"]);
    plugin.dispatch_command(&mut console, &mut server, &["fly"]);
    assert_eq!(
        console.lines(),
        vec![
            "Usage: /starterpack force <player>",
            "Usage: /starterpack reset <player|all>",
            "Player 'Herobrine' not found or not online.",
            "Unknown command. Use /starterpack help for available commands.",
        ]
    );
}

#[test]
fn reset_player_lets_them_receive_again() {
    let mut plugin = common::memory_plugin(common::fixture_config());
    let (mut server, ids) = common::server_with(&["Steve"]);
    plugin.manager_mut().give_starter_pack(&mut server, ids[0]).unwrap();
    let mut console = ConsoleSender::new();

    plugin.dispatch_command(&mut console, &mut server, &["reset", "steve"]);
    assert_eq!(console.lines(), vec!["Successfully reset starter pack status for Steve!"]);
    assert!(!plugin.manager_mut().has_received(ids[0]).unwrap());
    assert_eq!(
        server.player(ids[0]).unwrap().inbox_plain().last().map(String::as_str),
        Some("Your starter pack status has been reset by CONSOLE. You can receive it again on next join!")
    );
}

#[test]
fn help_lists_admin_lines_only_for_admins() {
    let mut plugin = common::memory_plugin(common::fixture_config());
    let (mut server, _) = common::server_with(&[]);
    let mut guest = ChatSender::new("Guest", false);
    let mut console = ConsoleSender::new();

    plugin.dispatch_command(&mut guest, &mut server, &[]);
    plugin.dispatch_command(&mut console, &mut server, &["HELP"]);

    assert!(guest.replies.iter().all(|l| !l.contains("/starterpack give")));
    assert_eq!(guest.replies.last().map(String::as_str), Some("Aliases: /sp, /starter"));
    assert!(console.lines().iter().any(|l| l == "/starterpack reset <player|all> - Reset starter pack status"));
}

#[test]
fn stats_counts_online_players() {
    let mut plugin = common::memory_plugin(common::fixture_config());
    let (mut server, ids) = common::server_with(&["A", "B", "C"]);
    plugin.manager_mut().give_starter_pack(&mut server, ids[0]).unwrap();
    server.connect(LocalPlayer::new("D"));
    server.disconnect(ids[2]);

    let mut console = ConsoleSender::new();
    plugin.dispatch_command(&mut console, &mut server, &["stats"]);
    assert_eq!(
        console.lines()[1],
        "Online players: 3 | Have received pack: 1 | New players: 2"
    );
}

#[test]
fn pre_existing_item_in_hand_is_not_equipment() {
    let mut plugin = common::memory_plugin(common::fixture_config());
    let mut player = LocalPlayer::new("Chef");
    player
        .inventory
        .set(EquipmentSlot::MainHand, ItemStack::new(Material::CookedBeef, 3));
    let (mut server, _) = common::server_with(&[]);
    let id = server.connect(player);

    let mut console = ConsoleSender::new();
    plugin.dispatch_command(&mut console, &mut server, &["equip", "Chef"]);
    assert_eq!(console.lines(), vec!["Successfully equipped starter items on Chef!"]);
    let chef = server.player(id).unwrap();
    assert_eq!(
        chef.inventory.get(EquipmentSlot::MainHand).map(|i| i.material),
        Some(Material::StoneSword)
    );
    assert_eq!(chef.inventory.count(Material::CookedBeef), 3);
}
