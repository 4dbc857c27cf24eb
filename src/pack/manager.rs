//! Starter pack distribution.
//!
//! [`StarterPackManager`] owns the receipt tracker and the active settings and
//! drives every grant, equip and reset. Failures are logged at `error` and
//! returned; whatever was already handed out before the failure stays with
//! the player.

use std::fmt;

use log::error;
use uuid::Uuid;

use super::builder::build_items;
use super::equipment::{give_or_drop, has_any_equipment, place_item, relocate_existing};
use super::errors::StarterPackError;
use super::receipt::ReceiptTracker;
use super::text::render_template;
use super::types::ItemStack;
use crate::config::{Config, StarterPackConfig};
use crate::host::{GamePlayer, GameServer, PERMISSION_BYPASS};
use crate::logutil::{debug_log, escape_log};
use crate::storage::AttributeStore;

const ITEMS_SECTION: &str = "starter-pack.items";
const EQUIPMENT_SECTION: &str = "starter-pack.equipment";

/// Result of an automatic grant that did not fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GrantOutcome {
    Granted,
    /// Feature switched off in config; nothing changed.
    Disabled,
    /// Player holds the bypass permission; nothing changed.
    Bypassed,
}

/// Receipt counts over the currently connected players.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PackStats {
    pub online: usize,
    pub received: usize,
    pub new_players: usize,
}

impl fmt::Display for PackStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Online players: {} | Have received pack: {} | New players: {}",
            self.online, self.received, self.new_players
        )
    }
}

pub struct StarterPackManager<S: AttributeStore> {
    settings: StarterPackConfig,
    debug: bool,
    receipts: ReceiptTracker<S>,
}

fn player_mut<G: GameServer>(
    server: &mut G,
    id: Uuid,
) -> Result<&mut G::Player, StarterPackError> {
    server
        .player_mut(id)
        .ok_or_else(|| StarterPackError::PlayerNotFound(id.to_string()))
}

impl<S: AttributeStore> StarterPackManager<S> {
    pub fn new(config: &Config, store: S) -> Self {
        Self {
            settings: config.starter_pack.clone(),
            debug: config.debug.enabled,
            receipts: ReceiptTracker::new(store),
        }
    }

    /// Swap in freshly loaded settings. Receipts are untouched.
    pub fn apply_config(&mut self, config: &Config) {
        self.settings = config.starter_pack.clone();
        self.debug = config.debug.enabled;
    }

    pub fn settings(&self) -> &StarterPackConfig {
        &self.settings
    }

    pub fn is_enabled(&self) -> bool {
        self.settings.enabled
    }

    pub fn debug_enabled(&self) -> bool {
        self.debug
    }

    pub fn receipts(&self) -> &ReceiptTracker<S> {
        &self.receipts
    }

    pub fn has_received(&mut self, player: Uuid) -> Result<bool, StarterPackError> {
        self.receipts.has_received(player)
    }

    pub fn starter_items(&self) -> Vec<ItemStack> {
        build_items(&self.settings.items, ITEMS_SECTION)
    }

    pub fn equipment_items(&self) -> Vec<ItemStack> {
        build_items(&self.settings.equipment, EQUIPMENT_SECTION)
    }

    /// Automatic grant including equipment.
    pub fn give_starter_pack<G: GameServer>(
        &mut self,
        server: &mut G,
        player: Uuid,
    ) -> Result<GrantOutcome, StarterPackError> {
        self.give_starter_pack_with_equipment(server, player, true)
    }

    /// Hand out the configured items, optionally equip a player who has no
    /// equipment yet, record the receipt, then greet and announce.
    pub fn give_starter_pack_with_equipment<G: GameServer>(
        &mut self,
        server: &mut G,
        player: Uuid,
        auto_equip: bool,
    ) -> Result<GrantOutcome, StarterPackError> {
        let target = player_mut(server, player)?;
        let name = target.name().to_string();

        if !self.settings.enabled {
            debug_log(
                self.debug,
                &format!("Starter pack is disabled, not giving to {}", escape_log(&name)),
            );
            return Ok(GrantOutcome::Disabled);
        }
        if target.has_permission(PERMISSION_BYPASS) {
            debug_log(
                self.debug,
                &format!(
                    "Player {} has bypass permission, not giving starter pack",
                    escape_log(&name)
                ),
            );
            return Ok(GrantOutcome::Bypassed);
        }

        match self.grant(server, player, &name, auto_equip) {
            Ok(()) => {
                debug_log(
                    self.debug,
                    &format!("Successfully gave starter pack to {}", escape_log(&name)),
                );
                Ok(GrantOutcome::Granted)
            }
            Err(e) => {
                error!("Error giving starter pack to {}: {}", escape_log(&name), e);
                Err(e)
            }
        }
    }

    fn grant<G: GameServer>(
        &mut self,
        server: &mut G,
        player: Uuid,
        name: &str,
        auto_equip: bool,
    ) -> Result<(), StarterPackError> {
        let items = self.starter_items();
        let target = player_mut(server, player)?;
        for item in items {
            give_or_drop(target, item);
        }

        if auto_equip && !has_any_equipment(&*target) {
            for item in self.equipment_items() {
                place_item(target, item);
            }
        }

        self.receipts.mark_received(player)?;

        target.send_message(&render_template(&self.settings.welcome_message, name));
        if self.settings.broadcast {
            server.broadcast(&render_template(&self.settings.broadcast_message, name));
        }
        Ok(())
    }

    /// Administrative grant: items only, no checks, no receipt, no messages.
    /// Returns how many item stacks were handed out.
    pub fn force_give<G: GameServer>(
        &mut self,
        server: &mut G,
        player: Uuid,
    ) -> Result<usize, StarterPackError> {
        let items = self.starter_items();
        let target = player_mut(server, player)?;
        let count = items.len();
        for item in items {
            give_or_drop(target, item);
        }
        debug_log(
            self.debug,
            &format!("Force gave starter pack to {}", escape_log(target.name())),
        );
        Ok(count)
    }

    /// Place every configured equipment item. No equipment check.
    pub fn equip_starter_items<G: GameServer>(
        &mut self,
        server: &mut G,
        player: Uuid,
    ) -> Result<usize, StarterPackError> {
        let equipment = self.equipment_items();
        if equipment.is_empty() {
            debug_log(self.debug, "No starter pack equipment configured");
        }
        let target = player_mut(server, player)?;
        let count = equipment.len();
        for item in equipment {
            place_item(target, item);
        }
        Ok(count)
    }

    /// Equip only when the player has no armor and no weapon/tool in hand.
    pub fn equip<G: GameServer>(
        &mut self,
        server: &mut G,
        player: Uuid,
    ) -> Result<usize, StarterPackError> {
        let target = player_mut(server, player)?;
        if has_any_equipment(&*target) {
            return Err(StarterPackError::AlreadyEquipped(target.name().to_string()));
        }
        let name = target.name().to_string();
        match self.equip_starter_items(server, player) {
            Ok(count) => {
                debug_log(
                    self.debug,
                    &format!("Successfully equipped starter items on {}", escape_log(&name)),
                );
                Ok(count)
            }
            Err(e) => {
                error!("Error equipping starter items on {}: {}", escape_log(&name), e);
                Err(e)
            }
        }
    }

    /// Move whatever the player wears or holds into the inventory (or onto the
    /// ground), then equip the configured items.
    pub fn force_equip<G: GameServer>(
        &mut self,
        server: &mut G,
        player: Uuid,
    ) -> Result<usize, StarterPackError> {
        let target = player_mut(server, player)?;
        let name = target.name().to_string();
        let moved = relocate_existing(target);
        match self.equip_starter_items(server, player) {
            Ok(count) => {
                debug_log(
                    self.debug,
                    &format!(
                        "Successfully force equipped starter items on {} ({} previous item(s) moved)",
                        escape_log(&name),
                        moved
                    ),
                );
                Ok(count)
            }
            Err(e) => {
                error!("Error force equipping starter items on {}: {}", escape_log(&name), e);
                Err(e)
            }
        }
    }

    pub fn reset<G: GameServer>(
        &mut self,
        server: &G,
        player: Uuid,
    ) -> Result<(), StarterPackError> {
        let name = server
            .player(player)
            .map(|p| p.name().to_string())
            .unwrap_or_else(|| player.to_string());
        match self.receipts.reset(player) {
            Ok(()) => {
                debug_log(
                    self.debug,
                    &format!("Reset starter pack status for {}", escape_log(&name)),
                );
                Ok(())
            }
            Err(e) => {
                error!("Error resetting starter pack for {}: {}", escape_log(&name), e);
                Err(e)
            }
        }
    }

    /// Reset every connected player. Offline players keep their receipt.
    pub fn reset_all<G: GameServer>(&mut self, server: &G) -> Result<usize, StarterPackError> {
        match self.receipts.reset_all(&server.online_players()) {
            Ok(count) => {
                debug_log(
                    self.debug,
                    &format!("Reset starter pack status for {} online players", count),
                );
                Ok(count)
            }
            Err(e) => {
                error!("Error resetting starter pack for all players: {}", e);
                Err(e)
            }
        }
    }

    pub fn stats<G: GameServer>(&mut self, server: &G) -> Result<PackStats, StarterPackError> {
        let online = server.online_players();
        let mut received = 0;
        for player in &online {
            if self.receipts.has_received(*player)? {
                received += 1;
            }
        }
        Ok(PackStats {
            online: online.len(),
            received,
            new_players: online.len() - received,
        })
    }
}
