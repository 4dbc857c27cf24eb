//! Binary entrypoint for the StarterPack CLI.
//!
//! Commands:
//! - `init` - write a default `starterpack.toml`
//! - `check` - validate the configuration and print what a new player would get
//! - `simulate --player <name>...` - join players on an in-process server and run the grants
//! - `status` - count players holding a durable receipt
//!
//! See the library crate docs for module-level details: `starterpack::`.
use std::time::{Duration, Instant};

use anyhow::Result;
use clap::{Parser, Subcommand};
use log::{info, warn};
use serde_json::json;

use starterpack::config::Config;
use starterpack::host::{GameServer, LocalPlayer, LocalServer};
use starterpack::pack::{EquipmentSlot, ItemStack, NamespacedKey, StarterPackManager, RECEIVED_KEY};
use starterpack::plugin::{JoinDecision, StarterPackPlugin};
use starterpack::storage::{AttributeStore, MemoryAttributeStore, SledAttributeStore};

#[derive(Parser)]
#[command(name = "starterpack")]
#[command(about = "One-time starter items and equipment for players joining a game server")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file path (can be used before or after subcommand)
    #[arg(short, long, default_value = "starterpack.toml", global = true)]
    config: String,

    /// Verbose logging (-v, -vv for more; may appear before or after subcommand)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a default configuration file
    Init,
    /// Validate the configuration and print the resulting kit as JSON
    Check,
    /// Join players on an in-process server and run their first-join grants
    Simulate {
        /// Player names to join (repeatable)
        #[arg(short, long = "player", required = true)]
        players: Vec<String>,
        /// Record receipts in the sled store instead of memory
        #[arg(long)]
        persist: bool,
    },
    /// Show how many players have received the starter pack
    Status,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let pre_config = match cli.command {
        Commands::Init => None,
        _ => Config::load(&cli.config).await.ok(),
    };
    init_logging(&pre_config, cli.verbose);

    match cli.command {
        Commands::Init => {
            info!("Initializing new StarterPack configuration");
            Config::create_default(&cli.config).await?;
            info!("Configuration file created at {}", cli.config);
        }
        Commands::Check => {
            let config = match pre_config {
                Some(config) => config,
                None => Config::load(&cli.config).await?,
            };
            let warnings = config.validate();
            for warning in &warnings {
                warn!("{}", warning);
            }
            let manager = StarterPackManager::new(&config, MemoryAttributeStore::new());
            let items: Vec<_> = manager.starter_items().iter().map(item_json).collect();
            let equipment: Vec<_> = manager.equipment_items().iter().map(item_json).collect();
            let payload = json!({
                "enabled": config.starter_pack.enabled,
                "broadcast": config.starter_pack.broadcast,
                "grant_delay_ms": config.starter_pack.grant_delay_ms,
                "configured": {
                    "items": config.starter_pack.items.len(),
                    "equipment": config.starter_pack.equipment.len(),
                },
                "items": items,
                "equipment": equipment,
                "warnings": warnings,
            });
            println!("{}", serde_json::to_string_pretty(&payload)?);
        }
        Commands::Simulate { players, persist } => {
            let config = match pre_config {
                Some(config) => config,
                None => Config::load(&cli.config).await?,
            };
            if persist {
                let store = SledAttributeStore::open(config.storage.attributes_path())?;
                simulate(config, store, &players, &cli.config).await;
            } else {
                simulate(config, MemoryAttributeStore::new(), &players, &cli.config).await;
            }
        }
        Commands::Status => {
            let config = match pre_config {
                Some(config) => config,
                None => Config::load(&cli.config).await?,
            };
            let path = config.storage.attributes_path();
            let store = SledAttributeStore::open(&path)?;
            let received = store.list_players_with(&NamespacedKey::plugin(RECEIVED_KEY))?;
            println!("StarterPack status");
            println!("  Attribute store: {}", path.display());
            println!("  Starter pack enabled: {}", config.starter_pack.enabled);
            println!("  Players with starter pack: {}", received.len());
        }
    }

    Ok(())
}

fn item_json(item: &ItemStack) -> serde_json::Value {
    let meta = item.meta.as_ref();
    json!({
        "material": item.material.name(),
        "amount": item.amount,
        "name": meta.and_then(|m| m.display_name.as_ref()).map(|n| n.plain()),
        "lore": meta.map(|m| m.lore.iter().map(|l| l.plain()).collect::<Vec<_>>()).unwrap_or_default(),
        "enchantments": meta
            .map(|m| m.enchantments.iter().map(|(e, lvl)| (e.name().to_string(), json!(lvl))).collect::<serde_json::Map<_, _>>())
            .unwrap_or_default(),
        "slot": item.equipment_slot_tag(),
    })
}

async fn simulate<S: AttributeStore>(config: Config, store: S, names: &[String], path: &str) {
    let mut plugin = StarterPackPlugin::new(config, store).with_config_path(path);
    let mut server = LocalServer::new();

    for name in names {
        let id = server.connect(LocalPlayer::new(name.clone()));
        match plugin.on_player_join(&server, id) {
            JoinDecision::Scheduled(task) => info!("{} joined, grant queued as {}", name, task),
            other => info!("{} joined, no grant ({:?})", name, other),
        }
    }

    let deadline = Instant::now() + Duration::from_secs(30);
    let mut interval = tokio::time::interval(Duration::from_millis(50));
    while plugin.pending_grants() > 0 && Instant::now() < deadline {
        interval.tick().await;
        for (id, result) in plugin.tick(&mut server, Instant::now()) {
            if let Err(e) = result {
                warn!("Grant for {} failed: {}", id, e);
            }
        }
    }

    for id in server.online_players() {
        let Some(player) = server.player(id) else {
            continue;
        };
        println!("== {} ==", player.name);
        println!("  Inventory:");
        for item in player.inventory.storage_items() {
            println!("    {}", item);
        }
        println!("  Equipment:");
        for slot in EquipmentSlot::ARMOR.into_iter().chain(EquipmentSlot::HANDS) {
            if let Some(item) = player.inventory.get(slot) {
                println!("    {:<10} {}", slot, item);
            }
        }
        if !player.dropped.is_empty() {
            println!("  Dropped:");
            for (_, item) in &player.dropped {
                println!("    {}", item);
            }
        }
        println!("  Messages:");
        for line in player.inbox_plain() {
            println!("    {}", line);
        }
    }
}

fn init_logging(config: &Option<Config>, verbosity: u8) {
    use std::io::Write;
    let mut builder = env_logger::Builder::new();
    // CLI verbosity wins; otherwise the configured level
    let base_level = match verbosity {
        0 => config
            .as_ref()
            .and_then(|c| c.logging.level.parse().ok())
            .unwrap_or(log::LevelFilter::Info),
        1 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };
    builder.filter_level(base_level);

    let log_file = config
        .as_ref()
        .and_then(|c| c.logging.file.as_ref())
        .and_then(|file| {
            std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(file)
                .ok()
        });

    if let Some(f) = log_file {
        let write_mutex = std::sync::Arc::new(std::sync::Mutex::new(f));
        // Mirror to the console only when attached to a terminal
        let is_tty = atty::is(atty::Stream::Stdout);
        builder.format(move |fmt, record| {
            let ts = chrono::Utc::now().format("%Y-%m-%dT%H:%M:%SZ");
            let line = format!("{} [{}] {}", ts, record.level(), record.args());
            if let Ok(mut guard) = write_mutex.lock() {
                let _ = writeln!(guard, "{}", line);
            }
            if is_tty {
                writeln!(fmt, "{}", line)
            } else {
                Ok(())
            }
        });
    } else {
        builder.format(|fmt, record| {
            let ts = chrono::Utc::now().format("%Y-%m-%dT%H:%M:%SZ");
            writeln!(fmt, "{} [{}] {}", ts, record.level(), record.args())
        });
    }
    let _ = builder.try_init();
}
