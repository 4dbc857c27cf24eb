//! Player inventory model: storage slots, armor and hands.

use serde::{Deserialize, Serialize};

use super::types::{EquipmentSlot, ItemStack, Material};

/// Main storage slots, hotbar included.
pub const STORAGE_SLOTS: usize = 36;

// ============================================================================
// Inventory Model
// ============================================================================

/// A player's storage, armor and hand slots.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerInventory {
    pub storage: Vec<Option<ItemStack>>,
    pub helmet: Option<ItemStack>,
    pub chestplate: Option<ItemStack>,
    pub leggings: Option<ItemStack>,
    pub boots: Option<ItemStack>,
    pub main_hand: Option<ItemStack>,
    pub off_hand: Option<ItemStack>,
}

impl Default for PlayerInventory {
    fn default() -> Self {
        Self::with_storage_slots(STORAGE_SLOTS)
    }
}

impl PlayerInventory {
    pub fn with_storage_slots(slots: usize) -> Self {
        Self {
            storage: vec![None; slots],
            helmet: None,
            chestplate: None,
            leggings: None,
            boots: None,
            main_hand: None,
            off_hand: None,
        }
    }

    /// Index of the first empty storage slot.
    pub fn first_empty(&self) -> Option<usize> {
        self.storage
            .iter()
            .position(|slot| slot.as_ref().map_or(true, ItemStack::is_empty))
    }

    pub fn has_free_slot(&self) -> bool {
        self.first_empty().is_some()
    }

    /// Add an item to storage, topping up similar stacks first and then
    /// filling empty slots. Returns whatever did not fit.
    pub fn add_item(&mut self, item: ItemStack) -> Option<ItemStack> {
        if item.is_empty() {
            return None;
        }
        let max = item.material.max_stack_size();
        let mut remaining = item.amount;

        for existing in self.storage.iter_mut().flatten() {
            if remaining == 0 {
                break;
            }
            if existing.is_similar(&item) && existing.amount < max {
                let moved = remaining.min(max - existing.amount);
                existing.amount += moved;
                remaining -= moved;
            }
        }

        while remaining > 0 {
            let Some(index) = self.first_empty() else {
                break;
            };
            let moved = remaining.min(max);
            let mut stack = item.clone();
            stack.amount = moved;
            self.storage[index] = Some(stack);
            remaining -= moved;
        }

        if remaining == 0 {
            None
        } else {
            let mut leftover = item;
            leftover.amount = remaining;
            Some(leftover)
        }
    }

    fn slot_ref(&self, slot: EquipmentSlot) -> &Option<ItemStack> {
        match slot {
            EquipmentSlot::Helmet => &self.helmet,
            EquipmentSlot::Chestplate => &self.chestplate,
            EquipmentSlot::Leggings => &self.leggings,
            EquipmentSlot::Boots => &self.boots,
            EquipmentSlot::MainHand => &self.main_hand,
            EquipmentSlot::OffHand => &self.off_hand,
        }
    }

    fn slot_mut(&mut self, slot: EquipmentSlot) -> &mut Option<ItemStack> {
        match slot {
            EquipmentSlot::Helmet => &mut self.helmet,
            EquipmentSlot::Chestplate => &mut self.chestplate,
            EquipmentSlot::Leggings => &mut self.leggings,
            EquipmentSlot::Boots => &mut self.boots,
            EquipmentSlot::MainHand => &mut self.main_hand,
            EquipmentSlot::OffHand => &mut self.off_hand,
        }
    }

    /// Non-empty item in an equipment slot.
    pub fn get(&self, slot: EquipmentSlot) -> Option<&ItemStack> {
        self.slot_ref(slot).as_ref().filter(|item| !item.is_empty())
    }

    /// Overwrite an equipment slot, returning whatever was there.
    pub fn set(&mut self, slot: EquipmentSlot, item: ItemStack) -> Option<ItemStack> {
        self.slot_mut(slot).replace(item)
    }

    /// Empty an equipment slot and hand back its non-empty content.
    pub fn take(&mut self, slot: EquipmentSlot) -> Option<ItemStack> {
        self.slot_mut(slot).take().filter(|item| !item.is_empty())
    }

    pub fn snapshot(&self) -> EquipmentSnapshot {
        EquipmentSnapshot {
            helmet: self.get(EquipmentSlot::Helmet).cloned(),
            chestplate: self.get(EquipmentSlot::Chestplate).cloned(),
            leggings: self.get(EquipmentSlot::Leggings).cloned(),
            boots: self.get(EquipmentSlot::Boots).cloned(),
            main_hand: self.get(EquipmentSlot::MainHand).cloned(),
            off_hand: self.get(EquipmentSlot::OffHand).cloned(),
        }
    }

    /// Non-empty storage stacks in slot order.
    pub fn storage_items(&self) -> impl Iterator<Item = &ItemStack> {
        self.storage.iter().flatten().filter(|item| !item.is_empty())
    }

    /// Total amount of a material across storage slots.
    pub fn count(&self, material: Material) -> u32 {
        self.storage_items()
            .filter(|item| item.material == material)
            .map(|item| item.amount)
            .sum()
    }
}

/// Read-only copy of the six equip-relevant slots.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EquipmentSnapshot {
    pub helmet: Option<ItemStack>,
    pub chestplate: Option<ItemStack>,
    pub leggings: Option<ItemStack>,
    pub boots: Option<ItemStack>,
    pub main_hand: Option<ItemStack>,
    pub off_hand: Option<ItemStack>,
}

impl EquipmentSnapshot {
    pub fn get(&self, slot: EquipmentSlot) -> Option<&ItemStack> {
        match slot {
            EquipmentSlot::Helmet => self.helmet.as_ref(),
            EquipmentSlot::Chestplate => self.chestplate.as_ref(),
            EquipmentSlot::Leggings => self.leggings.as_ref(),
            EquipmentSlot::Boots => self.boots.as_ref(),
            EquipmentSlot::MainHand => self.main_hand.as_ref(),
            EquipmentSlot::OffHand => self.off_hand.as_ref(),
        }
    }

    /// Any armor piece worn, or a weapon/tool held in either hand.
    pub fn has_any_equipment(&self) -> bool {
        let armor = EquipmentSlot::ARMOR.iter().any(|s| self.get(*s).is_some());
        let tools = EquipmentSlot::HANDS
            .iter()
            .filter_map(|s| self.get(*s))
            .any(|item| item.material.is_weapon_or_tool());
        armor || tools
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
