//! First-join handling: decide on join, grant after the configured delay.

use std::time::{Duration, Instant};

use log::{info, warn};
use uuid::Uuid;

use super::scheduler::TaskId;
use super::StarterPackPlugin;
use crate::host::{GamePlayer, GameServer, PERMISSION_BYPASS};
use crate::logutil::{debug_log, escape_log};
use crate::pack::GrantOutcome;
use crate::storage::AttributeStore;

/// A grant waiting for its delay to elapse.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingGrant {
    pub player: Uuid,
}

/// What a join event led to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinDecision {
    Scheduled(TaskId),
    Disabled,
    AlreadyReceived,
    Bypassed,
    /// A grant for this player is already queued.
    AlreadyPending,
    UnknownPlayer,
    /// The receipt could not be read; nothing was scheduled.
    Failed,
}

impl<S: AttributeStore> StarterPackPlugin<S> {
    pub fn on_player_join<G: GameServer>(&mut self, server: &G, player: Uuid) -> JoinDecision {
        let Some(joined) = server.player(player) else {
            return JoinDecision::UnknownPlayer;
        };
        let name = escape_log(joined.name());
        let debug = self.config.debug.enabled;

        if self.config.debug.log_all_joins {
            debug_log(debug, &format!("Player {} joined the server", name));
        }
        if !self.config.starter_pack.enabled {
            debug_log(debug, &format!("Starter pack is disabled, skipping {}", name));
            return JoinDecision::Disabled;
        }
        match self.manager.has_received(player) {
            Ok(true) => {
                debug_log(
                    debug,
                    &format!("Player {} has already received starter pack", name),
                );
                return JoinDecision::AlreadyReceived;
            }
            Ok(false) => {}
            Err(e) => {
                warn!("Could not read starter pack receipt for {}: {}", name, e);
                return JoinDecision::Failed;
            }
        }
        if joined.has_permission(PERMISSION_BYPASS) {
            debug_log(
                debug,
                &format!("Player {} has bypass permission, not giving starter pack", name),
            );
            return JoinDecision::Bypassed;
        }
        if self.pending.contains_key(&player) {
            debug_log(debug, &format!("Starter pack for {} is already queued", name));
            return JoinDecision::AlreadyPending;
        }

        let delay = Duration::from_millis(self.config.starter_pack.grant_delay_ms);
        let task = self.scheduler.schedule_once(delay, PendingGrant { player });
        self.pending.insert(player, task);
        JoinDecision::Scheduled(task)
    }

    /// Fire every grant due at `now`. Players who left in the meantime are
    /// skipped. Returns the outcome of each grant actually attempted.
    pub fn tick<G: GameServer>(
        &mut self,
        server: &mut G,
        now: Instant,
    ) -> Vec<(Uuid, Result<GrantOutcome, String>)> {
        let mut results = Vec::new();
        for PendingGrant { player } in self.scheduler.take_due(now) {
            self.pending.remove(&player);
            let Some(target) = server.player(player).filter(|p| p.is_online()) else {
                continue;
            };
            let name = escape_log(target.name());
            match self.manager.give_starter_pack(server, player) {
                Ok(GrantOutcome::Granted) => {
                    info!("Gave starter pack to new player: {}", name);
                    results.push((player, Ok(GrantOutcome::Granted)));
                }
                Ok(outcome) => results.push((player, Ok(outcome))),
                Err(e) => {
                    warn!("Failed to give starter pack to player: {}", name);
                    results.push((player, Err(e.to_string())));
                }
            }
        }
        results
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::host::{LocalPlayer, LocalServer};
    use crate::storage::{FailingAttributeStore, MemoryAttributeStore};

    fn plugin() -> StarterPackPlugin<MemoryAttributeStore> {
        let mut config = Config::default();
        config.starter_pack.grant_delay_ms = 0;
        StarterPackPlugin::new(config, MemoryAttributeStore::new())
    }

    #[test]
    fn join_schedules_once_and_tick_grants() {
        let mut server = LocalServer::new();
        let id = server.connect(LocalPlayer::new("Steve"));
        let mut plugin = plugin();

        assert!(matches!(plugin.on_player_join(&server, id), JoinDecision::Scheduled(_)));
        assert_eq!(plugin.on_player_join(&server, id), JoinDecision::AlreadyPending);
        assert_eq!(plugin.pending_grants(), 1);

        let fired = plugin.tick(&mut server, Instant::now());
        assert_eq!(fired, vec![(id, Ok(GrantOutcome::Granted))]);
        assert_eq!(plugin.on_player_join(&server, id), JoinDecision::AlreadyReceived);
    }

    #[test]
    fn player_leaving_before_grant_is_skipped() {
        let mut server = LocalServer::new();
        let id = server.connect(LocalPlayer::new("Steve"));
        let mut plugin = plugin();
        plugin.on_player_join(&server, id);
        server.disconnect(id);

        assert!(plugin.tick(&mut server, Instant::now()).is_empty());
        assert_eq!(plugin.pending_grants(), 0);
        assert!(!plugin.manager_mut().has_received(id).unwrap());
    }

    #[test]
    fn grant_waits_for_delay() {
        let mut config = Config::default();
        config.starter_pack.grant_delay_ms = 60_000;
        let mut plugin = StarterPackPlugin::new(config, MemoryAttributeStore::new());
        let mut server = LocalServer::new();
        let id = server.connect(LocalPlayer::new("Steve"));
        plugin.on_player_join(&server, id);
        assert!(plugin.tick(&mut server, Instant::now()).is_empty());
        assert_eq!(plugin.pending_grants(), 1);
        plugin.shutdown();
        assert_eq!(plugin.pending_grants(), 0);
    }

    #[test]
    fn bypass_and_disabled_never_schedule() {
        let mut server = LocalServer::new();
        let vip = server.connect(LocalPlayer::new("Vip").with_permission(PERMISSION_BYPASS));
        let mut plugin = plugin();
        assert_eq!(plugin.on_player_join(&server, vip), JoinDecision::Bypassed);

        let mut config = Config::default();
        config.starter_pack.enabled = false;
        plugin.apply_config(config);
        let id = server.connect(LocalPlayer::new("Steve"));
        assert_eq!(plugin.on_player_join(&server, id), JoinDecision::Disabled);
        assert_eq!(plugin.pending_grants(), 0);
        assert_eq!(plugin.on_player_join(&server, Uuid::new_v4()), JoinDecision::UnknownPlayer);
    }

    #[test]
    fn unreadable_receipt_fails_the_join() {
        let mut config = Config::default();
        config.starter_pack.grant_delay_ms = 0;
        let mut plugin = StarterPackPlugin::new(config, FailingAttributeStore::reads());
        let mut server = LocalServer::new();
        let id = server.connect(LocalPlayer::new("Steve"));

        assert_eq!(plugin.on_player_join(&server, id), JoinDecision::Failed);
        assert_eq!(plugin.pending_grants(), 0);
        assert!(plugin.tick(&mut server, Instant::now()).is_empty());
    }

    #[test]
    fn unwritable_receipt_fails_the_grant_and_allows_retry() {
        let mut config = Config::default();
        config.starter_pack.grant_delay_ms = 0;
        let mut plugin = StarterPackPlugin::new(config, FailingAttributeStore::writes());
        let mut server = LocalServer::new();
        let id = server.connect(LocalPlayer::new("Steve"));

        plugin.on_player_join(&server, id);
        let fired = plugin.tick(&mut server, Instant::now());
        assert_eq!(fired.len(), 1);
        assert!(fired[0].1.is_err());
        assert!(server.player(id).unwrap().inbox.is_empty());
        assert!(matches!(plugin.on_player_join(&server, id), JoinDecision::Scheduled(_)));
    }
}
