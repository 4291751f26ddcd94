use crate::app::{Camera2D, Vec2};

/// World units map 1:1 to pixels. World axes match screen axes (y down),
/// so this is a pure translation around the camera.
pub const PIXELS_PER_WORLD: f32 = 1.0;

#[derive(Debug, Clone, Copy)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

pub fn world_to_screen(world: Vec2, camera: &Camera2D, viewport: Viewport) -> (i32, i32) {
    let x = (world.x - camera.position.x) * PIXELS_PER_WORLD + viewport.width as f32 * 0.5;
    let y = (world.y - camera.position.y) * PIXELS_PER_WORLD + viewport.height as f32 * 0.5;
    (x.round() as i32, y.round() as i32)
}

pub fn world_to_screen_px(camera: &Camera2D, window_size: (u32, u32), world: Vec2) -> (i32, i32) {
    world_to_screen(
        world,
        camera,
        Viewport {
            width: window_size.0,
            height: window_size.1,
        },
    )
}

pub fn screen_to_world_px(camera: &Camera2D, window_size: (u32, u32), screen_px: Vec2) -> Vec2 {
    Vec2 {
        x: camera.position.x + (screen_px.x - window_size.0 as f32 * 0.5) / PIXELS_PER_WORLD,
        y: camera.position.y + (screen_px.y - window_size.1 as f32 * 0.5) / PIXELS_PER_WORLD,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn camera_position_maps_to_viewport_center() {
        let viewport = Viewport {
            width: 960,
            height: 540,
        };
        let camera = Camera2D {
            position: Vec2 { x: 750.0, y: 500.0 },
        };
        let (x, y) = world_to_screen(Vec2 { x: 750.0, y: 500.0 }, &camera, viewport);
        assert_eq!(x, 480);
        assert_eq!(y, 270);
    }

    #[test]
    fn world_y_increases_downward_on_screen() {
        let viewport = Viewport {
            width: 800,
            height: 600,
        };
        let camera = Camera2D::default();
        let (_, above) = world_to_screen(Vec2 { x: 0.0, y: -10.0 }, &camera, viewport);
        let (_, below) = world_to_screen(Vec2 { x: 0.0, y: 10.0 }, &camera, viewport);
        assert!(above < below);
        assert_eq!(below - above, 20);
    }

    #[test]
    fn screen_to_world_inverts_world_to_screen() {
        let camera = Camera2D {
            position: Vec2 { x: 320.0, y: 450.0 },
        };
        let world = Vec2 { x: 400.0, y: 380.0 };
        let (sx, sy) = world_to_screen_px(&camera, (960, 540), world);
        let round_trip = screen_to_world_px(
            &camera,
            (960, 540),
            Vec2 {
                x: sx as f32,
                y: sy as f32,
            },
        );
        assert!((round_trip.x - world.x).abs() < 0.5);
        assert!((round_trip.y - world.y).abs() < 0.5);
    }

    #[test]
    fn offsets_from_camera_shift_screen_position() {
        let viewport = Viewport {
            width: 800,
            height: 600,
        };
        let camera = Camera2D {
            position: Vec2 { x: 100.0, y: 200.0 },
        };
        let (x, y) = world_to_screen(Vec2 { x: 120.0, y: 195.0 }, &camera, viewport);
        assert_eq!(x, 420);
        assert_eq!(y, 295);
    }
}
