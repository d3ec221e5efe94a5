//! Fogbound - headless survivor/killer simulation
//!
//! Loads a world layout, spawns a survivor and a killer and runs a fixed
//! number of simulation ticks, logging what the collision core reports.

use fogbound::config::AppConfig;
use fogbound::scene::default_yard;
use fogbound::systems::SimulationSystem;
use fogbound_physics::WorldLayout;

fn load_layout(config: &AppConfig) -> WorldLayout {
    let path = &config.level.layout_path;
    if path.is_empty() {
        log::info!("No layout configured, using the built-in yard");
        return default_yard();
    }

    match WorldLayout::load(path) {
        Ok(layout) => {
            log::info!(
                "Loaded layout '{}' from {}: {} solids, {} triggers",
                layout.name,
                path,
                layout.solids.len(),
                layout.triggers.len()
            );
            layout
        }
        Err(e) => {
            log::warn!("Failed to load layout '{}': {}. Using the built-in yard.", path, e);
            default_yard()
        }
    }
}

fn main() {
    let loaded = AppConfig::load();
    let config = loaded.as_ref().cloned().unwrap_or_default();

    // RUST_LOG still wins over the configured level
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(config.debug.log_level.as_str()))
        .init();

    if let Err(e) = &loaded {
        log::warn!("Failed to load config: {}. Using defaults.", e);
    }
    log::info!("Starting Fogbound");

    let layout = load_layout(&config);
    let mut simulation = SimulationSystem::new(&config, &layout);

    for _ in 0..config.simulation.tick_count {
        simulation.update();
    }

    let stats = simulation.stats();
    log::info!(
        "Finished {} ticks: survivor walked {:.1}, {} step-ups, sighted {} ticks, chased {} ticks, near vaults {} ticks, max penetration {:.4}",
        stats.ticks,
        stats.survivor_distance,
        stats.step_ups,
        stats.sighted_ticks,
        stats.chase_ticks,
        stats.vault_ticks,
        stats.max_penetration
    );
}
