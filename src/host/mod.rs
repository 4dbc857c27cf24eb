//! Host platform seam.
//!
//! The add-on never talks to a concrete game server directly. Everything it
//! needs from the host (player lookup, inventories, messaging, dropping items
//! in the world, permissions) goes through [`GamePlayer`] and [`GameServer`].
//! [`LocalServer`] is an in-process implementation used by the CLI and tests.

pub mod local;

use uuid::Uuid;

use crate::pack::inventory::PlayerInventory;
use crate::pack::text::FormattedText;
use crate::pack::types::{ItemStack, Location};

pub use local::{LocalPlayer, LocalServer};

/// Permission that exempts a player from automatic granting.
pub const PERMISSION_BYPASS: &str = "starterpack.bypass";

/// Permission required for every admin sub-command except help/version.
pub const PERMISSION_ADMIN: &str = "starterpack.admin";

/// A connected (or recently connected) player as seen through the host API.
pub trait GamePlayer {
    fn id(&self) -> Uuid;
    fn name(&self) -> &str;
    fn is_online(&self) -> bool;
    fn has_permission(&self, node: &str) -> bool;
    fn inventory(&self) -> &PlayerInventory;
    fn inventory_mut(&mut self) -> &mut PlayerInventory;
    fn location(&self) -> Location;
    /// Drop an item into the world at the player's current location.
    fn drop_item(&mut self, item: ItemStack);
    fn send_message(&mut self, message: &FormattedText);
}

/// The server side of the host API.
pub trait GameServer {
    type Player: GamePlayer;

    fn player(&self, id: Uuid) -> Option<&Self::Player>;
    fn player_mut(&mut self, id: Uuid) -> Option<&mut Self::Player>;
    /// Online player by name, case-insensitive.
    fn find_player(&self, name: &str) -> Option<Uuid>;
    fn online_players(&self) -> Vec<Uuid>;
    /// Send a message to every connected player.
    fn broadcast(&mut self, message: &FormattedText);
}
