//! Binary entry point for the orrery viewer.

use orrery_app::paths::AppDirs;
use orrery_config::Config;
use tracing::info;

fn main() {
    let dirs = match AppDirs::resolve_and_create() {
        Ok(dirs) => Some(dirs),
        Err(err) => {
            eprintln!("failed to prepare application directories: {err}");
            None
        }
    };

    let config = match &dirs {
        Some(dirs) => Config::load_or_create(&dirs.config_dir).unwrap_or_else(|err| {
            eprintln!("failed to load config, falling back to defaults: {err}");
            Config::default()
        }),
        None => Config::default(),
    };

    orrery_log::init_logging(
        dirs.as_ref().map(|d| d.log_dir.as_path()),
        cfg!(debug_assertions),
        Some(&config),
    );
    info!(
        "starting {} ({}x{}, vsync: {})",
        config.window.title, config.window.width, config.window.height, config.window.vsync
    );

    orrery_app::window::run_with_config(config);
}
