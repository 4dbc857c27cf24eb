//! Equipment placement.
//!
//! Slot precedence for a single item:
//! 1. the slot tag recorded by the pack builder, when present;
//! 2. otherwise an armor slot inferred from the material name suffix;
//! 3. otherwise the main hand for weapons and tools;
//! 4. otherwise generic placement (free inventory slot, else dropped).
//!
//! An item whose tag names no known slot goes straight to generic placement.

use log::{debug, warn};

use super::types::{EquipmentSlot, ItemStack};
use crate::host::GamePlayer;
use crate::logutil::escape_log;

/// Where an item ended up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    Equipped(EquipmentSlot),
    Stored,
    /// Part of the stack was stored, the rest dropped.
    Split,
    Dropped,
}

/// Generic placement: into the inventory if a slot is free, otherwise onto
/// the ground at the player's location. Anything that does not fit into the
/// free slots is dropped as well.
pub fn give_or_drop<P: GamePlayer + ?Sized>(player: &mut P, item: ItemStack) -> Placement {
    if !player.inventory().has_free_slot() {
        drop_at_feet(player, item);
        return Placement::Dropped;
    }
    match player.inventory_mut().add_item(item) {
        None => Placement::Stored,
        Some(leftover) => {
            drop_at_feet(player, leftover);
            Placement::Split
        }
    }
}

fn drop_at_feet<P: GamePlayer + ?Sized>(player: &mut P, item: ItemStack) {
    debug!(
        "Inventory of {} is full, dropping {} at {}",
        escape_log(player.name()),
        item,
        player.location()
    );
    player.drop_item(item);
}

/// Any armor worn, or a weapon/tool in either hand.
pub fn has_any_equipment<P: GamePlayer + ?Sized>(player: &P) -> bool {
    player.inventory().snapshot().has_any_equipment()
}

/// Resolve the slot an item should occupy, or `None` for generic placement.
pub fn resolve_slot(item: &ItemStack) -> Option<EquipmentSlot> {
    if let Some(tag) = item.equipment_slot_tag() {
        let slot = EquipmentSlot::from_tag(tag);
        if slot.is_none() {
            warn!("Unknown equipment slot: {}", escape_log(tag));
        }
        return slot;
    }
    item.material.armor_slot().or_else(|| {
        item.material
            .is_weapon_or_tool()
            .then_some(EquipmentSlot::MainHand)
    })
}

/// Put one item where it belongs. Whatever occupied the target slot is
/// handed back through generic placement.
pub fn place_item<P: GamePlayer + ?Sized>(player: &mut P, item: ItemStack) -> Placement {
    match resolve_slot(&item) {
        Some(slot) => {
            if let Some(displaced) = player.inventory_mut().set(slot, item) {
                give_or_drop(player, displaced);
            }
            Placement::Equipped(slot)
        }
        None => give_or_drop(player, item),
    }
}

/// Empty every occupied equipment slot into the inventory (or the ground).
/// Armor goes first in the host's armor order, then main hand, then off hand.
/// Returns how many items were moved.
pub fn relocate_existing<P: GamePlayer + ?Sized>(player: &mut P) -> usize {
    let mut moved = 0;
    for slot in EquipmentSlot::ARMOR.into_iter().chain(EquipmentSlot::HANDS) {
        if let Some(item) = player.inventory_mut().take(slot) {
            give_or_drop(player, item);
            moved += 1;
        }
    }
    moved
}
