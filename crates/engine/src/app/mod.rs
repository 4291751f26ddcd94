mod assets;
pub mod collision;
pub(crate) mod hud;
mod input;
mod loop_runner;
mod metrics;
mod physics;
mod rendering;
mod scene;

pub use assets::{AssetError, AssetStore};
pub use collision::{build_obstacles, InvalidInputError, ObstacleRect, SourceBitmap};
pub use input::InputAction;
pub use loop_runner::{
    run_app, AppError, LoopConfig, DEBUG_COLLISION_ENV_VAR, SLOW_FRAME_ENV_VAR,
};
pub use metrics::LoopMetricsSnapshot;
pub use physics::{resolve_movement, Aabb, ObstacleIndex};
pub use rendering::{
    screen_to_world_px, world_to_screen, world_to_screen_px, Renderer, Viewport,
    PIXELS_PER_WORLD, PLACEHOLDER_HALF_SIZE_PX,
};
pub use scene::{
    Camera2D, DialogContent, Entity, EntityId, InputSnapshot, RenderableDesc, RenderableKind,
    Scene, SceneCommand, SceneKey, SceneWorld, UiState, Vec2, CAMERA_FOLLOW_LERP,
    WALK_CYCLE_SECONDS,
};
