//! Delayed grants driven by a tokio interval, the way the CLI runs them.
mod common;

use std::time::{Duration, Instant};

use starterpack::host::GameServer;
use starterpack::pack::{GrantOutcome, Material};
use starterpack::plugin::Scheduler;

#[tokio::test]
async fn grants_fire_after_the_configured_delay() {
    let mut config = common::fixture_config();
    config.starter_pack.grant_delay_ms = 100;
    let mut plugin = common::memory_plugin(config);
    let (mut server, ids) = common::server_with(&["Alex", "Steve"]);

    let joined = Instant::now();
    for id in &ids {
        plugin.on_player_join(&server, *id);
    }
    assert!(plugin.tick(&mut server, joined).is_empty());

    let mut interval = tokio::time::interval(Duration::from_millis(20));
    let mut fired = Vec::new();
    while plugin.pending_grants() > 0 {
        interval.tick().await;
        fired.extend(plugin.tick(&mut server, Instant::now()));
        assert!(joined.elapsed() < Duration::from_secs(5), "grants never fired");
    }

    assert!(joined.elapsed() >= Duration::from_millis(100));
    assert_eq!(
        fired,
        vec![(ids[0], Ok(GrantOutcome::Granted)), (ids[1], Ok(GrantOutcome::Granted))]
    );
    for id in &ids {
        assert_eq!(server.player(*id).unwrap().inventory.count(Material::Bread), 16);
    }
}

#[test]
fn scheduler_orders_by_due_time_then_insertion() {
    let mut scheduler = Scheduler::new();
    let base = Instant::now();
    let slow = scheduler.schedule_at(base + Duration::from_millis(50), "slow");
    scheduler.schedule_at(base + Duration::from_millis(10), "fast");
    scheduler.schedule_at(base + Duration::from_millis(10), "fast-too");

    assert_eq!(scheduler.next_due(), Some(base + Duration::from_millis(10)));
    assert!(scheduler.cancel(slow));
    assert_eq!(
        scheduler.take_due(base + Duration::from_secs(1)),
        vec!["fast", "fast-too"]
    );
    assert_eq!(scheduler.pending(), 0);
}
