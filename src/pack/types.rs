//! Item, material and slot types shared by the pack builder and the equipment placer.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use super::text::FormattedText;

/// Namespace used for every key this add-on attaches to players or items.
pub const PLUGIN_NAMESPACE: &str = "starterpack";

/// Player attribute meaning "received starter pack".
pub const RECEIVED_KEY: &str = "received_starter_pack";

/// Item tag holding the configured equipment slot.
pub const EQUIPMENT_SLOT_KEY: &str = "equipment_slot";

/// Declares a fieldless enum whose variants map one-to-one onto canonical names.
macro_rules! named_enum {
    ($(#[$meta:meta])* $ty:ident { $($variant:ident => $name:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        pub enum $ty {
            $(#[serde(rename = $name)] $variant),+
        }

        impl $ty {
            pub const ALL: &'static [$ty] = &[$($ty::$variant),+];

            /// Canonical name as it appears in configuration.
            pub fn name(self) -> &'static str {
                match self {
                    $($ty::$variant => $name),+
                }
            }
        }

        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.name())
            }
        }
    };
}

named_enum!(
    /// Known item types. Configuration naming anything else is skipped.
    Material {
        Air => "AIR",

        LeatherHelmet => "LEATHER_HELMET",
        LeatherChestplate => "LEATHER_CHESTPLATE",
        LeatherLeggings => "LEATHER_LEGGINGS",
        LeatherBoots => "LEATHER_BOOTS",
        ChainmailHelmet => "CHAINMAIL_HELMET",
        ChainmailChestplate => "CHAINMAIL_CHESTPLATE",
        ChainmailLeggings => "CHAINMAIL_LEGGINGS",
        ChainmailBoots => "CHAINMAIL_BOOTS",
        IronHelmet => "IRON_HELMET",
        IronChestplate => "IRON_CHESTPLATE",
        IronLeggings => "IRON_LEGGINGS",
        IronBoots => "IRON_BOOTS",
        GoldenHelmet => "GOLDEN_HELMET",
        GoldenChestplate => "GOLDEN_CHESTPLATE",
        GoldenLeggings => "GOLDEN_LEGGINGS",
        GoldenBoots => "GOLDEN_BOOTS",
        DiamondHelmet => "DIAMOND_HELMET",
        DiamondChestplate => "DIAMOND_CHESTPLATE",
        DiamondLeggings => "DIAMOND_LEGGINGS",
        DiamondBoots => "DIAMOND_BOOTS",
        NetheriteHelmet => "NETHERITE_HELMET",
        NetheriteChestplate => "NETHERITE_CHESTPLATE",
        NetheriteLeggings => "NETHERITE_LEGGINGS",
        NetheriteBoots => "NETHERITE_BOOTS",
        TurtleHelmet => "TURTLE_HELMET",

        WoodenSword => "WOODEN_SWORD",
        WoodenAxe => "WOODEN_AXE",
        WoodenPickaxe => "WOODEN_PICKAXE",
        WoodenShovel => "WOODEN_SHOVEL",
        WoodenHoe => "WOODEN_HOE",
        StoneSword => "STONE_SWORD",
        StoneAxe => "STONE_AXE",
        StonePickaxe => "STONE_PICKAXE",
        StoneShovel => "STONE_SHOVEL",
        StoneHoe => "STONE_HOE",
        IronSword => "IRON_SWORD",
        IronAxe => "IRON_AXE",
        IronPickaxe => "IRON_PICKAXE",
        IronShovel => "IRON_SHOVEL",
        IronHoe => "IRON_HOE",
        GoldenSword => "GOLDEN_SWORD",
        GoldenAxe => "GOLDEN_AXE",
        GoldenPickaxe => "GOLDEN_PICKAXE",
        GoldenShovel => "GOLDEN_SHOVEL",
        GoldenHoe => "GOLDEN_HOE",
        DiamondSword => "DIAMOND_SWORD",
        DiamondAxe => "DIAMOND_AXE",
        DiamondPickaxe => "DIAMOND_PICKAXE",
        DiamondShovel => "DIAMOND_SHOVEL",
        DiamondHoe => "DIAMOND_HOE",
        NetheriteSword => "NETHERITE_SWORD",
        NetheriteAxe => "NETHERITE_AXE",
        NetheritePickaxe => "NETHERITE_PICKAXE",
        NetheriteShovel => "NETHERITE_SHOVEL",
        NetheriteHoe => "NETHERITE_HOE",
        Bow => "BOW",
        Crossbow => "CROSSBOW",
        Trident => "TRIDENT",
        Mace => "MACE",
        Shield => "SHIELD",
        Arrow => "ARROW",
        FishingRod => "FISHING_ROD",
        FlintAndSteel => "FLINT_AND_STEEL",
        Shears => "SHEARS",
        Elytra => "ELYTRA",
        CarvedPumpkin => "CARVED_PUMPKIN",
        SpectralArrow => "SPECTRAL_ARROW",
        Lead => "LEAD",
        Spyglass => "SPYGLASS",
        OakBoat => "OAK_BOAT",
        Minecart => "MINECART",

        Apple => "APPLE",
        Bread => "BREAD",
        CookedBeef => "COOKED_BEEF",
        CookedChicken => "COOKED_CHICKEN",
        CookedPorkchop => "COOKED_PORKCHOP",
        CookedMutton => "COOKED_MUTTON",
        CookedCod => "COOKED_COD",
        CookedSalmon => "COOKED_SALMON",
        BakedPotato => "BAKED_POTATO",
        Carrot => "CARROT",
        GoldenApple => "GOLDEN_APPLE",
        GoldenCarrot => "GOLDEN_CARROT",
        Cookie => "COOKIE",
        CookedRabbit => "COOKED_RABBIT",
        Potato => "POTATO",
        Beetroot => "BEETROOT",
        MelonSlice => "MELON_SLICE",
        SweetBerries => "SWEET_BERRIES",
        PumpkinPie => "PUMPKIN_PIE",
        MushroomStew => "MUSHROOM_STEW",
        DriedKelp => "DRIED_KELP",
        HoneyBottle => "HONEY_BOTTLE",
        MilkBucket => "MILK_BUCKET",
        Cake => "CAKE",

        Stone => "STONE",
        Cobblestone => "COBBLESTONE",
        Dirt => "DIRT",
        GrassBlock => "GRASS_BLOCK",
        Sand => "SAND",
        Gravel => "GRAVEL",
        OakLog => "OAK_LOG",
        OakPlanks => "OAK_PLANKS",
        BirchLog => "BIRCH_LOG",
        SpruceLog => "SPRUCE_LOG",
        JungleLog => "JUNGLE_LOG",
        AcaciaLog => "ACACIA_LOG",
        DarkOakLog => "DARK_OAK_LOG",
        CherryLog => "CHERRY_LOG",
        BirchPlanks => "BIRCH_PLANKS",
        SprucePlanks => "SPRUCE_PLANKS",
        OakSapling => "OAK_SAPLING",
        BirchSapling => "BIRCH_SAPLING",
        SpruceSapling => "SPRUCE_SAPLING",
        Glass => "GLASS",
        Sandstone => "SANDSTONE",
        Bricks => "BRICKS",
        Cobweb => "COBWEB",
        OakSign => "OAK_SIGN",
        OakDoor => "OAK_DOOR",
        OakFence => "OAK_FENCE",
        Lantern => "LANTERN",
        SoulTorch => "SOUL_TORCH",
        Campfire => "CAMPFIRE",
        Barrel => "BARREL",
        EnderChest => "ENDER_CHEST",
        Anvil => "ANVIL",
        EnchantingTable => "ENCHANTING_TABLE",
        Smoker => "SMOKER",
        BlastFurnace => "BLAST_FURNACE",
        RedBed => "RED_BED",
        Torch => "TORCH",
        CraftingTable => "CRAFTING_TABLE",
        Furnace => "FURNACE",
        Chest => "CHEST",
        WhiteBed => "WHITE_BED",
        Ladder => "LADDER",

        Stick => "STICK",
        WheatSeeds => "WHEAT_SEEDS",
        BeetrootSeeds => "BEETROOT_SEEDS",
        PumpkinSeeds => "PUMPKIN_SEEDS",
        MelonSeeds => "MELON_SEEDS",
        Wheat => "WHEAT",
        SugarCane => "SUGAR_CANE",
        BoneMeal => "BONE_MEAL",
        CopperIngot => "COPPER_INGOT",
        RawIron => "RAW_IRON",
        LapisLazuli => "LAPIS_LAZULI",
        Redstone => "REDSTONE",
        Paper => "PAPER",
        ExperienceBottle => "EXPERIENCE_BOTTLE",
        LavaBucket => "LAVA_BUCKET",
        NameTag => "NAME_TAG",
        TotemOfUndying => "TOTEM_OF_UNDYING",
        RecoveryCompass => "RECOVERY_COMPASS",
        Coal => "COAL",
        IronIngot => "IRON_INGOT",
        GoldIngot => "GOLD_INGOT",
        Diamond => "DIAMOND",
        Emerald => "EMERALD",
        String => "STRING",
        Leather => "LEATHER",
        Feather => "FEATHER",
        Flint => "FLINT",
        Bucket => "BUCKET",
        WaterBucket => "WATER_BUCKET",
        Map => "MAP",
        Compass => "COMPASS",
        Clock => "CLOCK",
        Book => "BOOK",
        WritableBook => "WRITABLE_BOOK",
        EnderPearl => "ENDER_PEARL",
        Snowball => "SNOWBALL",
        Egg => "EGG",
        Saddle => "SADDLE",
    }
);

const WEAPON_OR_TOOL_PATTERNS: &[&str] = &[
    "_SWORD", "_AXE", "_PICKAXE", "_SHOVEL", "_HOE", "BOW", "CROSSBOW", "TRIDENT", "MACE",
];

impl Material {
    /// Resolve a configured material name (case-insensitive).
    pub fn from_name(name: &str) -> Option<Material> {
        let upper = name.to_ascii_uppercase();
        Self::ALL.iter().copied().find(|m| m.name() == upper)
    }

    pub fn is_air(self) -> bool {
        matches!(self, Material::Air)
    }

    /// True for swords, axes, pickaxes, shovels, hoes, bows, crossbows, tridents and maces.
    pub fn is_weapon_or_tool(self) -> bool {
        let name = self.name();
        WEAPON_OR_TOOL_PATTERNS.iter().any(|p| name.contains(p))
    }

    /// Armor slot implied by the material name, if any.
    pub fn armor_slot(self) -> Option<EquipmentSlot> {
        let name = self.name();
        if name.ends_with("_HELMET") {
            Some(EquipmentSlot::Helmet)
        } else if name.ends_with("_CHESTPLATE") {
            Some(EquipmentSlot::Chestplate)
        } else if name.ends_with("_LEGGINGS") {
            Some(EquipmentSlot::Leggings)
        } else if name.ends_with("_BOOTS") {
            Some(EquipmentSlot::Boots)
        } else {
            None
        }
    }

    pub fn max_stack_size(self) -> u32 {
        match self {
            _ if self.is_weapon_or_tool() || self.armor_slot().is_some() => 1,
            Material::Shield
            | Material::FishingRod
            | Material::FlintAndSteel
            | Material::Shears
            | Material::WaterBucket
            | Material::WritableBook
            | Material::WhiteBed
            | Material::RedBed
            | Material::Saddle
            | Material::Elytra
            | Material::Spyglass
            | Material::OakBoat
            | Material::Minecart
            | Material::MilkBucket
            | Material::LavaBucket
            | Material::MushroomStew
            | Material::Cake
            | Material::TotemOfUndying
            | Material::RecoveryCompass => 1,
            Material::EnderPearl
            | Material::Snowball
            | Material::Egg
            | Material::Bucket
            | Material::OakSign
            | Material::HoneyBottle => 16,
            _ => 64,
        }
    }
}

named_enum!(
    /// Enchantments resolvable from configuration keys.
    Enchantment {
        Protection => "protection",
        FireProtection => "fire_protection",
        FeatherFalling => "feather_falling",
        BlastProtection => "blast_protection",
        ProjectileProtection => "projectile_protection",
        Respiration => "respiration",
        AquaAffinity => "aqua_affinity",
        Thorns => "thorns",
        DepthStrider => "depth_strider",
        FrostWalker => "frost_walker",
        BindingCurse => "binding_curse",
        SoulSpeed => "soul_speed",
        SwiftSneak => "swift_sneak",
        Sharpness => "sharpness",
        Smite => "smite",
        BaneOfArthropods => "bane_of_arthropods",
        Knockback => "knockback",
        FireAspect => "fire_aspect",
        Looting => "looting",
        SweepingEdge => "sweeping_edge",
        Efficiency => "efficiency",
        SilkTouch => "silk_touch",
        Unbreaking => "unbreaking",
        Fortune => "fortune",
        Power => "power",
        Punch => "punch",
        Flame => "flame",
        Infinity => "infinity",
        LuckOfTheSea => "luck_of_the_sea",
        Lure => "lure",
        Loyalty => "loyalty",
        Impaling => "impaling",
        Riptide => "riptide",
        Channeling => "channeling",
        Multishot => "multishot",
        QuickCharge => "quick_charge",
        Piercing => "piercing",
        Density => "density",
        Breach => "breach",
        WindBurst => "wind_burst",
        Mending => "mending",
        VanishingCurse => "vanishing_curse",
    }
);

impl Enchantment {
    /// Resolve an enchantment key such as `sharpness` or `minecraft:sharpness`.
    pub fn from_key(key: &str) -> Option<Enchantment> {
        let lower = key.to_ascii_lowercase();
        let bare = lower.strip_prefix("minecraft:").unwrap_or(&lower);
        Self::ALL.iter().copied().find(|e| e.name() == bare)
    }
}

/// One of the six equipment-bearing positions on a player.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EquipmentSlot {
    Helmet,
    Chestplate,
    Leggings,
    Boots,
    MainHand,
    OffHand,
}

impl EquipmentSlot {
    /// Armor slots in the host's armor-array order (feet first).
    pub const ARMOR: [EquipmentSlot; 4] = [
        EquipmentSlot::Boots,
        EquipmentSlot::Leggings,
        EquipmentSlot::Chestplate,
        EquipmentSlot::Helmet,
    ];

    pub const HANDS: [EquipmentSlot; 2] = [EquipmentSlot::MainHand, EquipmentSlot::OffHand];

    pub fn tag(self) -> &'static str {
        match self {
            EquipmentSlot::Helmet => "helmet",
            EquipmentSlot::Chestplate => "chestplate",
            EquipmentSlot::Leggings => "leggings",
            EquipmentSlot::Boots => "boots",
            EquipmentSlot::MainHand => "mainhand",
            EquipmentSlot::OffHand => "offhand",
        }
    }

    /// Parse a slot tag (case-insensitive).
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag.to_ascii_lowercase().as_str() {
            "helmet" => Some(EquipmentSlot::Helmet),
            "chestplate" => Some(EquipmentSlot::Chestplate),
            "leggings" => Some(EquipmentSlot::Leggings),
            "boots" => Some(EquipmentSlot::Boots),
            "mainhand" => Some(EquipmentSlot::MainHand),
            "offhand" => Some(EquipmentSlot::OffHand),
            _ => None,
        }
    }

    pub fn is_armor(self) -> bool {
        !matches!(self, EquipmentSlot::MainHand | EquipmentSlot::OffHand)
    }
}

impl fmt::Display for EquipmentSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// `namespace:key` identifier for attributes and item tags.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NamespacedKey {
    pub namespace: String,
    pub key: String,
}

impl NamespacedKey {
    pub fn new(namespace: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into().to_ascii_lowercase(),
            key: key.into().to_ascii_lowercase(),
        }
    }

    /// Key in this add-on's own namespace.
    pub fn plugin(key: &str) -> Self {
        Self::new(PLUGIN_NAMESPACE, key)
    }
}

impl fmt::Display for NamespacedKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.namespace, self.key)
    }
}

/// Optional presentation and tagging attached to an item.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemMeta {
    pub display_name: Option<FormattedText>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub lore: Vec<FormattedText>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub enchantments: BTreeMap<Enchantment, u32>,
    /// String tags keyed by `namespace:key`, carried with the item.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub tags: BTreeMap<String, String>,
}

impl ItemMeta {
    pub fn tag(&self, key: &NamespacedKey) -> Option<&str> {
        self.tags.get(&key.to_string()).map(String::as_str)
    }

    pub fn set_tag(&mut self, key: &NamespacedKey, value: impl Into<String>) {
        self.tags.insert(key.to_string(), value.into());
    }
}

/// A concrete in-game item: type, quantity and optional metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemStack {
    pub material: Material,
    pub amount: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<ItemMeta>,
}

impl ItemStack {
    pub fn new(material: Material, amount: u32) -> Self {
        Self {
            material,
            amount,
            meta: None,
        }
    }

    pub fn with_meta(mut self, meta: ItemMeta) -> Self {
        self.meta = Some(meta);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.material.is_air() || self.amount == 0
    }

    /// Same material and metadata, ignoring amount.
    pub fn is_similar(&self, other: &ItemStack) -> bool {
        self.material == other.material && self.meta == other.meta
    }

    /// Slot tag recorded by the pack builder, if any.
    pub fn equipment_slot_tag(&self) -> Option<&str> {
        self.meta
            .as_ref()
            .and_then(|m| m.tag(&NamespacedKey::plugin(EQUIPMENT_SLOT_KEY)))
    }

    pub fn display_name(&self) -> Option<&FormattedText> {
        self.meta.as_ref().and_then(|m| m.display_name.as_ref())
    }
}

impl fmt::Display for ItemStack {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.display_name() {
            Some(name) => write!(f, "{}x {} ({})", self.amount, self.material, name.plain()),
            None => write!(f, "{}x {}", self.amount, self.material),
        }
    }
}

/// A position in a named world.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub world: String,
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Location {
    pub fn new(world: impl Into<String>, x: f64, y: f64, z: f64) -> Self {
        Self {
            world: world.into(),
            x,
            y,
            z,
        }
    }
}

impl Default for Location {
    fn default() -> Self {
        Self::new("world", 0.0, 64.0, 0.0)
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({:.1}, {:.1}, {:.1})", self.world, self.x, self.y, self.z)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn material_lookup_is_case_insensitive() {
        assert_eq!(Material::from_name("diamond_sword"), Some(Material::DiamondSword));
        assert_eq!(Material::from_name("Cooked_Beef"), Some(Material::CookedBeef));
        assert_eq!(Material::from_name("oak_sapling"), Some(Material::OakSapling));
        assert_eq!(Material::from_name("WHEAT_SEEDS"), Some(Material::WheatSeeds));
        assert_eq!(Material::from_name("COOKED_RABBIT"), Some(Material::CookedRabbit));
        assert_eq!(Material::from_name("ELYTRA"), Some(Material::Elytra));
        assert_eq!(Material::Elytra.max_stack_size(), 1);
        assert_eq!(Material::Elytra.armor_slot(), None);
        assert_eq!(Material::from_name("NOT_A_BLOCK"), None);
        assert_eq!(Material::from_name(""), None);
    }

    #[test]
    fn weapon_and_tool_detection() {
        for m in [
            Material::WoodenAxe,
            Material::DiamondSword,
            Material::StonePickaxe,
            Material::IronShovel,
            Material::GoldenHoe,
            Material::Bow,
            Material::Crossbow,
            Material::Trident,
            Material::Mace,
        ] {
            assert!(m.is_weapon_or_tool(), "{} should be a weapon/tool", m);
        }
        for m in [Material::CookedBeef, Material::Stone, Material::Shield, Material::IronHelmet] {
            assert!(!m.is_weapon_or_tool(), "{} should not be a weapon/tool", m);
        }
    }

    #[test]
    fn armor_slot_inference() {
        assert_eq!(Material::TurtleHelmet.armor_slot(), Some(EquipmentSlot::Helmet));
        assert_eq!(Material::IronChestplate.armor_slot(), Some(EquipmentSlot::Chestplate));
        assert_eq!(Material::LeatherLeggings.armor_slot(), Some(EquipmentSlot::Leggings));
        assert_eq!(Material::NetheriteBoots.armor_slot(), Some(EquipmentSlot::Boots));
        assert_eq!(Material::DiamondSword.armor_slot(), None);
    }

    #[test]
    fn stack_sizes() {
        assert_eq!(Material::IronSword.max_stack_size(), 1);
        assert_eq!(Material::ChainmailBoots.max_stack_size(), 1);
        assert_eq!(Material::EnderPearl.max_stack_size(), 16);
        assert_eq!(Material::Bread.max_stack_size(), 64);
    }

    #[test]
    fn enchantment_keys() {
        assert_eq!(Enchantment::from_key("SHARPNESS"), Some(Enchantment::Sharpness));
        assert_eq!(Enchantment::from_key("minecraft:unbreaking"), Some(Enchantment::Unbreaking));
        assert_eq!(Enchantment::from_key("super_speed"), None);
    }

    #[test]
    fn slot_tags_round_trip_case_insensitively() {
        assert_eq!(EquipmentSlot::from_tag("HELMET"), Some(EquipmentSlot::Helmet));
        assert_eq!(EquipmentSlot::from_tag("MainHand"), Some(EquipmentSlot::MainHand));
        assert_eq!(EquipmentSlot::from_tag("belt"), None);
        assert!(EquipmentSlot::Boots.is_armor());
        assert!(!EquipmentSlot::OffHand.is_armor());
    }

    #[test]
    fn material_serializes_by_canonical_name() {
        let json = serde_json::to_string(&Material::DiamondSword).unwrap();
        assert_eq!(json, "\"DIAMOND_SWORD\"");
    }
}
