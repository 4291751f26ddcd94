use std::path::Path;

use engine::AssetStore;

use super::npcs::NpcProfile;

mod loader;
mod set;

pub(crate) use loader::LoaderScene;
pub(crate) use set::SetScene;

pub(crate) const BACKGROUND_SPRITE: &str = "filmset-bg";
pub(crate) const COLLISION_SPRITE: &str = "filmset-collision";
pub(crate) const PLAYER_SPRITE: &str = "player";

pub(crate) const WORLD_WIDTH: f32 = 1500.0;
pub(crate) const WORLD_HEIGHT: f32 = 1000.0;

pub(crate) const PLAYER_SPEED: f32 = 150.0;
pub(crate) const PLAYER_SPAWN_X: f32 = 320.0;
pub(crate) const PLAYER_SPAWN_Y: f32 = 450.0;
pub(crate) const PLAYER_SCALE: f32 = 0.4;

pub(crate) const COLLISION_CELL_SIZE: u32 = 32;
pub(crate) const COLLISION_SAMPLE_STEP: u32 = 4;
pub(crate) const COLLISION_ALPHA_THRESHOLD: u8 = 20;
pub(crate) const OBSTACLE_INDEX_CELL_SIZE: f32 = 64.0;

/// Pointer steering ignores taps closer than this to the player (squared
/// world units).
pub(crate) const POINTER_DEAD_ZONE_DIST_SQ: f32 = 25.0;

pub(crate) const FADE_OUT_SECONDS: f32 = 0.35;
pub(crate) const HINT_HOLD_SECONDS: f32 = 2.6;
pub(crate) const HINT_FADE_SECONDS: f32 = 2.0;

pub(crate) const LOADER_TITLE: &str = "Film Set";

/// Queues every image the set needs. Decoding happens one file per tick in
/// the loader scene so the progress bar can advance between frames.
pub(crate) fn build_asset_store(assets_dir: &Path, profiles: &[NpcProfile]) -> AssetStore {
    let mut store = AssetStore::default();
    store.enqueue(
        BACKGROUND_SPRITE,
        assets_dir.join("background").join("filmset.png"),
    );
    store.enqueue(
        COLLISION_SPRITE,
        assets_dir.join("background").join("filmset-collision.png"),
    );
    store.enqueue(
        PLAYER_SPRITE,
        assets_dir.join("character").join("player.png"),
    );
    for profile in profiles {
        store.enqueue(profile.sprite_key.clone(), assets_dir.join(&profile.image_path));
    }
    store
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::npcs::builtin_profiles;

    #[test]
    fn asset_store_queues_core_images_and_npcs() {
        let profiles = builtin_profiles();
        let mut store = build_asset_store(Path::new("/tmp/assets"), &profiles);

        let mut loaded = 0;
        while store.load_next().is_some() {
            loaded += 1;
        }
        // Three core images plus one per crew member; the paths do not exist
        // here so each load records a failure but still counts.
        assert_eq!(loaded, 3 + profiles.len());
        assert!(store.is_complete());
    }
}
