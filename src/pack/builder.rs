//! Pack builder: turns configured item entries into concrete items.
//!
//! Each entry of `starter-pack.items` / `starter-pack.equipment` is a TOML
//! table:
//!
//! ```toml
//! [[starter-pack.equipment]]
//! material = "IRON_SWORD"          # required, case-insensitive
//! amount = 1                       # optional, defaults to 1
//! name = "&bTrusty Blade"          # optional, & colour codes
//! lore = ["&7Issued on arrival"]   # optional
//! enchantments = { sharpness = 2 } # optional, name -> level
//! slot = "mainhand"                # optional
//! ```
//!
//! A bad entry is logged and skipped; it never aborts the rest of the list.

use log::warn;
use toml::Value;

use super::errors::ItemSpecError;
use super::text::{decode, FormattedText};
use super::types::{Enchantment, ItemMeta, ItemStack, Material, NamespacedKey, EQUIPMENT_SLOT_KEY};
use crate::logutil::escape_log;

/// One validated configuration entry, before construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemSpec {
    pub material: Material,
    pub amount: u32,
    pub name: Option<String>,
    pub lore: Option<Vec<String>>,
    /// Raw enchantment names with their levels, in configuration order.
    pub enchantments: Option<Vec<(String, u32)>>,
    /// Lowercased slot tag.
    pub slot: Option<String>,
}

impl ItemSpec {
    pub fn new(material: Material) -> Self {
        Self {
            material,
            amount: 1,
            name: None,
            lore: None,
            enchantments: None,
            slot: None,
        }
    }

    /// Validate a single configuration entry.
    pub fn from_value(value: &Value) -> Result<Self, ItemSpecError> {
        let Value::Table(table) = value else {
            return Err(ItemSpecError::NotATable(value.type_str()));
        };

        let material_name = match table.get("material") {
            None => return Err(ItemSpecError::MissingMaterial),
            Some(Value::String(s)) => s,
            Some(_) => {
                return Err(ItemSpecError::WrongType {
                    field: "material",
                    expected: "a string",
                })
            }
        };
        let material = Material::from_name(material_name)
            .ok_or_else(|| ItemSpecError::UnknownMaterial(material_name.clone()))?;

        let mut spec = ItemSpec::new(material);
        spec.amount = table.get("amount").map_or(1, positive_or_default);

        if let Some(name) = table.get("name") {
            let Value::String(name) = name else {
                return Err(ItemSpecError::WrongType {
                    field: "name",
                    expected: "a string",
                });
            };
            spec.name = Some(name.clone());
        }

        match table.get("lore") {
            None => {}
            Some(Value::Array(lines)) => {
                let mut lore = Vec::with_capacity(lines.len());
                for line in lines {
                    let Value::String(line) = line else {
                        return Err(ItemSpecError::WrongType {
                            field: "lore",
                            expected: "a list of strings",
                        });
                    };
                    lore.push(line.clone());
                }
                spec.lore = Some(lore);
            }
            Some(_) => {
                warn!(
                    "Ignoring lore for {}: expected a list of strings",
                    material
                );
                spec.lore = Some(Vec::new());
            }
        }

        match table.get("enchantments") {
            None => {}
            Some(Value::Table(map)) => {
                spec.enchantments = Some(
                    map.iter()
                        .map(|(name, level)| (name.clone(), positive_or_default(level)))
                        .collect(),
                );
            }
            Some(_) => {
                warn!("Ignoring enchantments for {}: expected a table", material);
                spec.enchantments = Some(Vec::new());
            }
        }

        if let Some(slot) = table.get("slot") {
            let Value::String(slot) = slot else {
                return Err(ItemSpecError::WrongType {
                    field: "slot",
                    expected: "a string",
                });
            };
            spec.slot = Some(slot.to_ascii_lowercase());
        }

        Ok(spec)
    }

    fn has_meta(&self) -> bool {
        self.name.is_some()
            || self.lore.is_some()
            || self.enchantments.is_some()
            || self.slot.is_some()
    }

    /// Construct the item. Unknown enchantments are logged and left off.
    pub fn build(&self) -> ItemStack {
        let item = ItemStack::new(self.material, self.amount);
        if !self.has_meta() {
            return item;
        }

        let mut meta = ItemMeta {
            display_name: self.name.as_deref().map(decode),
            ..Default::default()
        };
        if let Some(lore) = &self.lore {
            meta.lore = lore.iter().map(|line| decode(line)).collect::<Vec<FormattedText>>();
        }
        for (name, level) in self.enchantments.iter().flatten() {
            match Enchantment::from_key(name) {
                Some(enchantment) => {
                    meta.enchantments.insert(enchantment, *level);
                }
                None => warn!("Unknown enchantment: {}", escape_log(name)),
            }
        }
        if let Some(slot) = &self.slot {
            meta.set_tag(&NamespacedKey::plugin(EQUIPMENT_SLOT_KEY), slot.clone());
        }
        item.with_meta(meta)
    }
}

/// Integer-like values at or above 1; anything else means 1.
fn positive_or_default(value: &Value) -> u32 {
    let raw = match value {
        Value::Integer(i) => *i,
        Value::Float(f) => *f as i64,
        _ => return 1,
    };
    if raw < 1 {
        1
    } else {
        u32::try_from(raw).unwrap_or(u32::MAX)
    }
}

/// Build every valid entry of a configured list, in order.
///
/// `section` only labels log lines (e.g. `starter-pack.items`).
pub fn build_items(entries: &[Value], section: &str) -> Vec<ItemStack> {
    if entries.is_empty() {
        warn!("No entries configured in {}", section);
        return Vec::new();
    }

    let mut items = Vec::with_capacity(entries.len());
    for (index, entry) in entries.iter().enumerate() {
        match ItemSpec::from_value(entry) {
            Ok(spec) => items.push(spec.build()),
            Err(e) => warn!(
                "Skipping {} entry at index {}: {}",
                section,
                index,
                escape_log(&e.to_string())
            ),
        }
    }
    items
}
