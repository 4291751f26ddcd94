mod renderer;
mod transform;

pub use renderer::Renderer;
pub use transform::{
    screen_to_world_px, world_to_screen, world_to_screen_px, Viewport, PIXELS_PER_WORLD,
};

pub const PLACEHOLDER_HALF_SIZE_PX: i32 = 5;
