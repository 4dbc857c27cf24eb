//! Starter pack domain: item model, colour markup, inventory, the pack
//! builder, equipment placement, receipt tracking and the manager that ties
//! them together.

pub mod builder;
pub mod equipment;
pub mod errors;
pub mod inventory;
pub mod manager;
pub mod receipt;
pub mod text;
pub mod types;

pub use builder::{build_items, ItemSpec};
pub use equipment::{give_or_drop, has_any_equipment, place_item, relocate_existing, Placement};
pub use errors::{ItemSpecError, StarterPackError};
pub use inventory::{EquipmentSnapshot, PlayerInventory, STORAGE_SLOTS};
pub use manager::{GrantOutcome, PackStats, StarterPackManager};
pub use receipt::ReceiptTracker;
pub use text::{decode, render_template, ChatColor, FormattedText};
pub use types::*;
