//! Test utilities & fixtures.
//! Provides access to integration test data under `tests/test-data-int`.

use std::path::{Path, PathBuf};

use starterpack::config::Config;
use starterpack::host::{LocalPlayer, LocalServer};
use starterpack::plugin::StarterPackPlugin;
use starterpack::storage::MemoryAttributeStore;
use uuid::Uuid;

/// Return the path to the static integration test fixture directory.
pub fn fixture_root() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("test-data-int")
}

pub fn fixture_config_path() -> PathBuf {
    fixture_root().join("starterpack.toml")
}

/// The fixture configuration: four items (one unknown), four equipment
/// entries, no grant delay.
pub fn fixture_config() -> Config {
    Config::load_blocking(fixture_config_path()).expect("fixture config")
}

/// Writable copy of the fixture config in a temp dir. Keep the TempDir alive.
#[allow(dead_code)]
pub fn writable_config() -> (tempfile::TempDir, PathBuf) {
    let tmp = tempfile::tempdir().expect("tempdir");
    let path = tmp.path().join("starterpack.toml");
    std::fs::copy(fixture_config_path(), &path).expect("copy fixture");
    (tmp, path)
}

#[allow(dead_code)]
pub fn memory_plugin(config: Config) -> StarterPackPlugin<MemoryAttributeStore> {
    StarterPackPlugin::new(config, MemoryAttributeStore::new())
}

/// Server with one online player per name, in order.
#[allow(dead_code)]
pub fn server_with(names: &[&str]) -> (LocalServer, Vec<Uuid>) {
    let mut server = LocalServer::new();
    let ids = names
        .iter()
        .map(|name| server.connect(LocalPlayer::new(*name)))
        .collect();
    (server, ids)
}
