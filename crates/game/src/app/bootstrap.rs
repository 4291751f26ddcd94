use engine::{resolve_app_paths, AssetStore, LoopConfig, Scene, StartupError};
use tracing::info;
use tracing_subscriber::EnvFilter;

use super::npcs;
use super::scenes::{self, LoaderScene, SetScene};

pub(crate) struct AppWiring {
    pub(crate) config: LoopConfig,
    pub(crate) loader_scene: Box<dyn Scene>,
    pub(crate) set_scene: Box<dyn Scene>,
    pub(crate) assets: AssetStore,
}

pub(crate) fn build_app() -> Result<AppWiring, StartupError> {
    init_tracing();
    info!("=== Film Set Startup ===");

    let app_paths = resolve_app_paths()?;
    info!(
        root = %app_paths.root.display(),
        assets_dir = %app_paths.assets_dir.display(),
        "startup"
    );

    let profiles = npcs::load_profiles(&app_paths.assets_dir);
    let assets = scenes::build_asset_store(&app_paths.assets_dir, &profiles);

    Ok(AppWiring {
        config: LoopConfig::default(),
        loader_scene: Box::new(LoaderScene::new()),
        set_scene: Box::new(SetScene::new(profiles)),
        assets,
    })
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_names(true)
        .compact()
        .init();
}
