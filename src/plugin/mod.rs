//! # Plugin Runtime
//!
//! [`StarterPackPlugin`] is what a host embeds. It owns the active
//! configuration, the [`StarterPackManager`], and the scheduler holding
//! delayed first-join grants. The host forwards three things to it:
//!
//! - join events via [`StarterPackPlugin::on_player_join`]
//! - a periodic [`StarterPackPlugin::tick`] from its main loop
//! - `/starterpack` (aliases `/sp`, `/starter`) invocations via
//!   [`StarterPackPlugin::dispatch_command`] and
//!   [`StarterPackPlugin::tab_complete`]
//!
//! Everything runs on the caller's thread; the plugin never spawns work.
//!
//! ```rust,no_run
//! use std::time::Instant;
//! use starterpack::config::Config;
//! use starterpack::host::{LocalPlayer, LocalServer};
//! use starterpack::plugin::StarterPackPlugin;
//! use starterpack::storage::MemoryAttributeStore;
//!
//! let mut server = LocalServer::new();
//! let mut plugin = StarterPackPlugin::new(Config::default(), MemoryAttributeStore::new());
//! let steve = server.connect(LocalPlayer::new("Steve"));
//! plugin.on_player_join(&server, steve);
//! // ... later, from the main loop:
//! plugin.tick(&mut server, Instant::now());
//! ```

pub mod commands;
pub mod join;
pub mod scheduler;

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use log::{info, warn};
use uuid::Uuid;

use crate::config::Config;
use crate::pack::{StarterPackError, StarterPackManager};
use crate::storage::AttributeStore;

pub use commands::{AdminCommand, CommandSender, ConsoleSender, ResetTarget};
pub use join::{JoinDecision, PendingGrant};
pub use scheduler::{Scheduler, TaskId};

pub const PLUGIN_NAME: &str = "StarterPack";

pub struct StarterPackPlugin<S: AttributeStore> {
    config: Config,
    config_path: Option<PathBuf>,
    manager: StarterPackManager<S>,
    scheduler: Scheduler<PendingGrant>,
    /// Players with a grant still waiting in the scheduler.
    pending: HashMap<Uuid, TaskId>,
}

impl<S: AttributeStore> StarterPackPlugin<S> {
    pub fn new(config: Config, store: S) -> Self {
        for warning in config.validate() {
            warn!("{}", warning);
        }
        let manager = StarterPackManager::new(&config, store);
        info!(
            "{} plugin enabled (starter pack {}, broadcast {})",
            PLUGIN_NAME,
            if config.starter_pack.enabled { "on" } else { "off" },
            if config.starter_pack.broadcast { "on" } else { "off" },
        );
        Self {
            config,
            config_path: None,
            manager,
            scheduler: Scheduler::new(),
            pending: HashMap::new(),
        }
    }

    /// Remember where the configuration came from so `reload` can re-read it.
    pub fn with_config_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config_path = Some(path.into());
        self
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn config_path(&self) -> Option<&Path> {
        self.config_path.as_deref()
    }

    pub fn manager(&self) -> &StarterPackManager<S> {
        &self.manager
    }

    pub fn manager_mut(&mut self) -> &mut StarterPackManager<S> {
        &mut self.manager
    }

    /// Grants waiting to fire.
    pub fn pending_grants(&self) -> usize {
        self.scheduler.pending()
    }

    /// Replace the active configuration in place.
    pub fn apply_config(&mut self, config: Config) {
        for warning in config.validate() {
            warn!("{}", warning);
        }
        self.manager.apply_config(&config);
        self.config = config;
    }

    /// Re-read the configuration file. On failure the previous configuration
    /// stays active.
    pub fn reload(&mut self) -> Result<(), StarterPackError> {
        let path = self
            .config_path
            .clone()
            .ok_or_else(|| StarterPackError::Config("no configuration file to reload".into()))?;
        let config = Config::load_blocking(&path)
            .map_err(|e| StarterPackError::Config(e.to_string()))?;
        self.apply_config(config);
        info!("Configuration reloaded successfully!");
        Ok(())
    }

    /// Drop every pending grant. Called when the host unloads the plugin.
    pub fn shutdown(&mut self) {
        for (_, task) in self.pending.drain() {
            self.scheduler.cancel(task);
        }
        info!("{} plugin disabled.", PLUGIN_NAME);
    }
}
