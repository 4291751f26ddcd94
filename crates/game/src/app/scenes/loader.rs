use engine::{InputSnapshot, Scene, SceneCommand, SceneKey, SceneWorld};
use tracing::info;

use super::{FADE_OUT_SECONDS, LOADER_TITLE};

/// Decodes one queued image per tick, drives the progress bar, then fades
/// to black and hands over to the set.
pub(crate) struct LoaderScene {
    fade_remaining: Option<f32>,
}

impl LoaderScene {
    pub(crate) fn new() -> Self {
        Self {
            fade_remaining: None,
        }
    }
}

impl Scene for LoaderScene {
    fn load(&mut self, world: &mut SceneWorld) {
        self.fade_remaining = None;
        let ui = world.ui_mut();
        ui.title = Some(LOADER_TITLE.to_string());
        ui.progress = Some(0.0);
        ui.fade_alpha = 0.0;
    }

    fn update(
        &mut self,
        fixed_dt_seconds: f32,
        _input: &InputSnapshot,
        world: &mut SceneWorld,
    ) -> SceneCommand {
        let assets = world.assets().cloned();
        let progress = match assets {
            Some(assets) => {
                let mut store = assets.borrow_mut();
                store.load_next();
                store.progress()
            }
            None => 1.0,
        };
        world.ui_mut().progress = Some(progress);

        if progress < 1.0 {
            return SceneCommand::None;
        }

        if self.fade_remaining.is_none() {
            info!("assets_ready_starting_fade");
        }
        let remaining = self.fade_remaining.get_or_insert(FADE_OUT_SECONDS);
        *remaining = (*remaining - fixed_dt_seconds).max(0.0);
        world.ui_mut().fade_alpha = 1.0 - *remaining / FADE_OUT_SECONDS;

        if *remaining <= 0.0 {
            return SceneCommand::SwitchTo(SceneKey::Set);
        }
        SceneCommand::None
    }

    fn unload(&mut self, world: &mut SceneWorld) {
        self.fade_remaining = None;
        let ui = world.ui_mut();
        ui.title = None;
        ui.progress = None;
        ui.fade_alpha = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use engine::AssetStore;

    use super::*;

    fn world_with_queued_assets(count: usize) -> SceneWorld {
        let mut store = AssetStore::default();
        for index in 0..count {
            // Paths do not exist; a failed decode still advances progress.
            store.enqueue(format!("asset-{index}"), format!("/nonexistent/{index}.png"));
        }
        let mut world = SceneWorld::default();
        world.set_assets(Rc::new(RefCell::new(store)));
        world
    }

    #[test]
    fn progress_advances_one_asset_per_tick() {
        let mut scene = LoaderScene::new();
        let mut world = world_with_queued_assets(2);
        scene.load(&mut world);

        scene.update(1.0 / 60.0, &InputSnapshot::empty(), &mut world);
        assert_eq!(world.ui().progress, Some(0.5));

        scene.update(1.0 / 60.0, &InputSnapshot::empty(), &mut world);
        assert_eq!(world.ui().progress, Some(1.0));
    }

    #[test]
    fn fade_runs_after_completion_then_switches_to_set() {
        let mut scene = LoaderScene::new();
        let mut world = world_with_queued_assets(1);
        scene.load(&mut world);

        let dt = 0.1;
        let mut command = scene.update(dt, &InputSnapshot::empty(), &mut world);
        assert_eq!(command, SceneCommand::None);

        let mut last_fade = world.ui().fade_alpha;
        for _ in 0..10 {
            command = scene.update(dt, &InputSnapshot::empty(), &mut world);
            let fade = world.ui().fade_alpha;
            assert!(fade >= last_fade);
            last_fade = fade;
            if command != SceneCommand::None {
                break;
            }
        }

        assert_eq!(command, SceneCommand::SwitchTo(SceneKey::Set));
        assert!((world.ui().fade_alpha - 1.0).abs() < 0.0001);
    }

    #[test]
    fn missing_asset_store_completes_immediately() {
        let mut scene = LoaderScene::new();
        let mut world = SceneWorld::default();
        scene.load(&mut world);

        let mut command = SceneCommand::None;
        for _ in 0..10 {
            command = scene.update(0.1, &InputSnapshot::empty(), &mut world);
            if command != SceneCommand::None {
                break;
            }
        }
        assert_eq!(command, SceneCommand::SwitchTo(SceneKey::Set));
    }

    #[test]
    fn unload_clears_loader_ui() {
        let mut scene = LoaderScene::new();
        let mut world = world_with_queued_assets(1);
        scene.load(&mut world);
        scene.update(0.1, &InputSnapshot::empty(), &mut world);

        scene.unload(&mut world);
        assert!(world.ui().progress.is_none());
        assert!(world.ui().title.is_none());
        assert_eq!(world.ui().fade_alpha, 0.0);
    }
}
