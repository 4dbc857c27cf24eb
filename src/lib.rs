//! # StarterPack - one-time starter kits for game servers
//!
//! StarterPack hands every player a configured set of items the first time
//! they join, optionally equips them with armor and a weapon, and remembers
//! who already received it so the grant never repeats.
//!
//! ## Features
//!
//! - **Configurable kit**: inventory items and equipment listed in TOML, with
//!   display names, lore, enchantments and explicit slots.
//! - **Smart equipping**: items go to the slot they name, or the slot their
//!   material implies; players who already have gear are not re-equipped.
//! - **Durable receipts**: a per-player attribute survives restarts; an
//!   in-memory cache keeps repeat lookups cheap.
//! - **Admin command**: `/starterpack` (`/sp`, `/starter`) to give, equip,
//!   force, reset, reload and inspect statistics.
//! - **Host agnostic**: the server is reached only through the traits in
//!   [`host`].
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::time::Instant;
//! use starterpack::config::Config;
//! use starterpack::host::{LocalPlayer, LocalServer};
//! use starterpack::plugin::StarterPackPlugin;
//! use starterpack::storage::SledAttributeStore;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::load("starterpack.toml").await?;
//!     let store = SledAttributeStore::open(config.storage.attributes_path())?;
//!     let mut plugin = StarterPackPlugin::new(config, store);
//!
//!     let mut server = LocalServer::new();
//!     let steve = server.connect(LocalPlayer::new("Steve"));
//!     plugin.on_player_join(&server, steve);
//!     plugin.tick(&mut server, Instant::now());
//!     Ok(())
//! }
//! ```
//!
//! ## Module Organization
//!
//! - [`config`] - Configuration loading and validation
//! - [`host`] - Player/server traits and the in-process host
//! - [`pack`] - Item model, pack builder, equipment placement, receipts, manager
//! - [`plugin`] - Join handling, scheduler and the admin command
//! - [`storage`] - Durable per-player attributes (memory and sled)
//! - [`logutil`] - Log sanitising and the debug toggle
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────┐   join / tick / command   ┌──────────────────┐
//! │  Game host   │ ───────────────────────▶ │ StarterPackPlugin │
//! │ (GameServer) │ ◀─────────────────────── │  + Scheduler      │
//! └──────────────┘   items, messages         └────────┬─────────┘
//!                                                     │
//!                                           ┌─────────▼─────────┐
//!                                           │ StarterPackManager│
//!                                           │ builder/equipment │
//!                                           └─────────┬─────────┘
//!                                                     │
//!                                           ┌─────────▼─────────┐
//!                                           │  ReceiptTracker   │
//!                                           │  AttributeStore   │
//!                                           └───────────────────┘
//! ```

pub mod config;
pub mod host;
pub mod logutil;
pub mod pack;
pub mod plugin;
pub mod storage;
