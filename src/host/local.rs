//! In-process host: players live in memory and record what happens to them.

use std::collections::{HashMap, HashSet};

use uuid::Uuid;

use super::{GamePlayer, GameServer};
use crate::pack::inventory::PlayerInventory;
use crate::pack::text::FormattedText;
use crate::pack::types::{ItemStack, Location};

/// Player held by [`LocalServer`].
#[derive(Debug, Clone)]
pub struct LocalPlayer {
    pub id: Uuid,
    pub name: String,
    pub online: bool,
    pub permissions: HashSet<String>,
    pub inventory: PlayerInventory,
    pub location: Location,
    /// Messages delivered to this player, oldest first.
    pub inbox: Vec<FormattedText>,
    /// Items dropped at this player's feet.
    pub dropped: Vec<(Location, ItemStack)>,
}

impl LocalPlayer {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            online: true,
            permissions: HashSet::new(),
            inventory: PlayerInventory::default(),
            location: Location::default(),
            inbox: Vec::new(),
            dropped: Vec::new(),
        }
    }

    pub fn with_id(mut self, id: Uuid) -> Self {
        self.id = id;
        self
    }

    pub fn with_permission(mut self, node: &str) -> Self {
        self.permissions.insert(node.to_string());
        self
    }

    pub fn with_inventory(mut self, inventory: PlayerInventory) -> Self {
        self.inventory = inventory;
        self
    }

    /// Plain text of every message received.
    pub fn inbox_plain(&self) -> Vec<String> {
        self.inbox.iter().map(FormattedText::plain).collect()
    }
}

impl GamePlayer for LocalPlayer {
    fn id(&self) -> Uuid {
        self.id
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn is_online(&self) -> bool {
        self.online
    }

    fn has_permission(&self, node: &str) -> bool {
        self.permissions.contains(node) || self.permissions.contains("*")
    }

    fn inventory(&self) -> &PlayerInventory {
        &self.inventory
    }

    fn inventory_mut(&mut self) -> &mut PlayerInventory {
        &mut self.inventory
    }

    fn location(&self) -> Location {
        self.location.clone()
    }

    fn drop_item(&mut self, item: ItemStack) {
        self.dropped.push((self.location.clone(), item));
    }

    fn send_message(&mut self, message: &FormattedText) {
        self.inbox.push(message.clone());
    }
}

/// Minimal server keeping every player it has ever seen.
#[derive(Debug, Default)]
pub struct LocalServer {
    players: HashMap<Uuid, LocalPlayer>,
    /// Join order, so iteration is deterministic.
    order: Vec<Uuid>,
}

impl LocalServer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register (or re-register) a player and mark them online.
    pub fn connect(&mut self, mut player: LocalPlayer) -> Uuid {
        let id = player.id;
        player.online = true;
        if !self.order.contains(&id) {
            self.order.push(id);
        }
        self.players.insert(id, player);
        id
    }

    pub fn disconnect(&mut self, id: Uuid) -> bool {
        match self.players.get_mut(&id) {
            Some(player) => {
                player.online = false;
                true
            }
            None => false,
        }
    }

    pub fn players(&self) -> impl Iterator<Item = &LocalPlayer> {
        self.order.iter().filter_map(|id| self.players.get(id))
    }
}

impl GameServer for LocalServer {
    type Player = LocalPlayer;

    fn player(&self, id: Uuid) -> Option<&LocalPlayer> {
        self.players.get(&id)
    }

    fn player_mut(&mut self, id: Uuid) -> Option<&mut LocalPlayer> {
        self.players.get_mut(&id)
    }

    fn find_player(&self, name: &str) -> Option<Uuid> {
        self.players()
            .find(|p| p.online && p.name.eq_ignore_ascii_case(name))
            .map(|p| p.id)
    }

    fn online_players(&self) -> Vec<Uuid> {
        self.players().filter(|p| p.online).map(|p| p.id).collect()
    }

    fn broadcast(&mut self, message: &FormattedText) {
        for player in self.players.values_mut().filter(|p| p.online) {
            player.inbox.push(message.clone());
        }
    }
}
