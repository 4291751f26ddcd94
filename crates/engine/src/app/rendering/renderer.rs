use std::collections::HashSet;
use std::sync::Arc;

use pixels::{Error, Pixels, SurfaceTexture};
use tracing::warn;
use winit::window::Window;

use crate::app::collision::SourceBitmap;
use crate::app::hud::{self, RectPx};
use crate::app::{
    AssetStore, Entity, RenderableKind, SceneWorld, UiState, Vec2, WALK_CYCLE_SECONDS,
};

use super::{world_to_screen_px, Viewport, PLACEHOLDER_HALF_SIZE_PX};

const CLEAR_COLOR: [u8; 4] = [15, 18, 32, 255];
const PLACEHOLDER_COLOR: [u8; 4] = [220, 220, 240, 255];
const LABEL_COLOR: [u8; 4] = [236, 240, 246, 255];
const LABEL_OFFSET_Y_PX: i32 = 22;
const LABEL_TEXT_SCALE: i32 = 1;
const VIEW_CULL_PADDING_PX: i32 = 16;
const DEBUG_COLLISION_IMAGE_OPACITY: f32 = 0.35;
const DEBUG_OBSTACLE_FILL: [u8; 4] = [255, 82, 82, 102];
const WALK_BOB_AMPLITUDE_PX: f32 = 2.0;
// Two bobs per walk cycle, one per footfall.
const WALK_BOBS_PER_CYCLE: f32 = 2.0;

pub struct Renderer {
    window: Arc<Window>,
    pixels: Pixels<'static>,
    viewport: Viewport,
    warned_missing_sprites: HashSet<String>,
    draw_order: Vec<usize>,
}

impl Renderer {
    pub fn new(window: Arc<Window>) -> Result<Self, Error> {
        let size = window.inner_size();
        let pixels = Self::build_pixels(Arc::clone(&window), size.width, size.height)?;
        Ok(Self {
            window,
            pixels,
            viewport: Viewport {
                width: size.width,
                height: size.height,
            },
            warned_missing_sprites: HashSet::new(),
            draw_order: Vec::new(),
        })
    }

    pub fn resize(&mut self, width: u32, height: u32) -> Result<(), Error> {
        if width == 0 || height == 0 {
            return Ok(());
        }
        self.pixels = Self::build_pixels(Arc::clone(&self.window), width, height)?;
        self.viewport = Viewport { width, height };
        Ok(())
    }

    fn build_pixels(
        window: Arc<Window>,
        width: u32,
        height: u32,
    ) -> Result<Pixels<'static>, Error> {
        let surface = SurfaceTexture::new(width, height, window);
        Pixels::new(width, height, surface)
    }

    pub(crate) fn render_world(
        &mut self,
        world: &SceneWorld,
        debug_collision: bool,
    ) -> Result<(), Error> {
        let width = self.viewport.width;
        let height = self.viewport.height;
        if width == 0 || height == 0 {
            return Ok(());
        }

        let frame = self.pixels.frame_mut();
        for chunk in frame.chunks_exact_mut(4) {
            chunk.copy_from_slice(&CLEAR_COLOR);
        }

        let assets = world.assets().map(|store| store.borrow());
        let assets = assets.as_deref();

        draw_background(frame, width, height, world, assets);
        if debug_collision {
            draw_collision_debug(frame, width, height, world, assets);
        }

        collect_draw_order(world, &mut self.draw_order);
        for index in self.draw_order.iter().copied() {
            let entity = &world.entities()[index];
            let (cx, cy) = world_to_screen_px(world.camera(), (width, height), entity.position);
            let body_cy = cy + walk_bob_offset_px(entity);

            match &entity.renderable.kind {
                RenderableKind::Placeholder => {
                    draw_placeholder(frame, width, height, cx, body_cy);
                }
                RenderableKind::Sprite(key) => {
                    match assets.and_then(|store| store.bitmap(key)) {
                        Some(bitmap) => {
                            if sprite_in_view(bitmap, entity.scale, cx, body_cy, width, height) {
                                draw_bitmap_centered(
                                    frame,
                                    width,
                                    height,
                                    cx,
                                    body_cy,
                                    bitmap,
                                    entity.scale,
                                    entity.flip_x,
                                );
                            }
                        }
                        None => {
                            if self.warned_missing_sprites.insert(key.clone()) {
                                warn!(
                                    sprite_key = %key,
                                    entity = entity.renderable.debug_name,
                                    "renderer_sprite_missing_using_placeholder"
                                );
                            }
                            draw_placeholder(frame, width, height, cx, body_cy);
                        }
                    }
                }
            }

            if let Some(label) = entity.label.as_deref() {
                let label_x = cx - hud::text_width_px(label, LABEL_TEXT_SCALE) / 2;
                hud::draw_text(
                    frame,
                    width,
                    height,
                    label_x,
                    cy + LABEL_OFFSET_Y_PX,
                    label,
                    LABEL_TEXT_SCALE,
                    LABEL_COLOR,
                );
            }
        }

        draw_ui(frame, width, height, world.ui(), assets);

        self.pixels.render()
    }
}

fn draw_background(
    frame: &mut [u8],
    width: u32,
    height: u32,
    world: &SceneWorld,
    assets: Option<&AssetStore>,
) {
    let Some(key) = world.background_sprite() else {
        return;
    };
    let Some(bitmap) = assets.and_then(|store| store.bitmap(key)) else {
        return;
    };
    let dst = world_rect_on_screen(world, width, height);
    hud::blit_scaled(frame, width, height, bitmap, dst, 1.0);
}

fn draw_collision_debug(
    frame: &mut [u8],
    width: u32,
    height: u32,
    world: &SceneWorld,
    assets: Option<&AssetStore>,
) {
    if let Some(bitmap) = world
        .collision_sprite()
        .and_then(|key| assets.and_then(|store| store.bitmap(key)))
    {
        let dst = world_rect_on_screen(world, width, height);
        hud::blit_scaled(frame, width, height, bitmap, dst, DEBUG_COLLISION_IMAGE_OPACITY);
    }

    for rect in world.obstacles() {
        let (left, top) = world_to_screen_px(
            world.camera(),
            (width, height),
            Vec2 {
                x: rect.center.x - rect.size.x / 2.0,
                y: rect.center.y - rect.size.y / 2.0,
            },
        );
        hud::draw_filled_rect(
            frame,
            width,
            height,
            left,
            top,
            rect.size.x.round() as i32,
            rect.size.y.round() as i32,
            DEBUG_OBSTACLE_FILL,
        );
    }
}

fn world_rect_on_screen(world: &SceneWorld, width: u32, height: u32) -> RectPx {
    let (x, y) = world_to_screen_px(world.camera(), (width, height), Vec2::default());
    let size = world.world_size();
    RectPx {
        x,
        y,
        w: size.x.round() as i32,
        h: size.y.round() as i32,
    }
}

/// Draw order is depth, then spawn order, then id. The sort is stable
/// across frames so overlapping entities never flicker.
fn collect_draw_order(world: &SceneWorld, out: &mut Vec<usize>) {
    out.clear();
    out.extend(0..world.entities().len());
    out.sort_by(|left, right| {
        let left_entity = &world.entities()[*left];
        let right_entity = &world.entities()[*right];
        left_entity
            .depth
            .cmp(&right_entity.depth)
            .then_with(|| {
                left_entity
                    .applied_spawn_order()
                    .cmp(&right_entity.applied_spawn_order())
            })
            .then_with(|| left_entity.id.0.cmp(&right_entity.id.0))
    });
}

fn draw_placeholder(frame: &mut [u8], width: u32, height: u32, cx: i32, cy: i32) {
    hud::draw_filled_rect(
        frame,
        width,
        height,
        cx - PLACEHOLDER_HALF_SIZE_PX,
        cy - PLACEHOLDER_HALF_SIZE_PX,
        PLACEHOLDER_HALF_SIZE_PX * 2 + 1,
        PLACEHOLDER_HALF_SIZE_PX * 2 + 1,
        PLACEHOLDER_COLOR,
    );
}

fn scaled_dimensions(bitmap: &SourceBitmap, scale: f32) -> (i32, i32) {
    let scale = if scale.is_finite() && scale > 0.0 {
        scale
    } else {
        1.0
    };
    let w = (bitmap.width() as f32 * scale).round().max(1.0) as i32;
    let h = (bitmap.height() as f32 * scale).round().max(1.0) as i32;
    (w, h)
}

fn sprite_in_view(
    bitmap: &SourceBitmap,
    scale: f32,
    cx: i32,
    cy: i32,
    width: u32,
    height: u32,
) -> bool {
    let (w, h) = scaled_dimensions(bitmap, scale);
    let half_w = w / 2 + VIEW_CULL_PADDING_PX;
    let half_h = h / 2 + VIEW_CULL_PADDING_PX;
    cx + half_w >= 0
        && cx - half_w < width as i32
        && cy + half_h >= 0
        && cy - half_h < height as i32
}

/// Vertical bob for walking entities, a sine over the walk cycle. Idle
/// entities sit at their exact position.
fn walk_bob_offset_px(entity: &Entity) -> i32 {
    if !entity.walking {
        return 0;
    }
    let cycles = entity.walk_phase / WALK_CYCLE_SECONDS;
    let angle = cycles * WALK_BOBS_PER_CYCLE * std::f32::consts::TAU;
    (angle.sin() * WALK_BOB_AMPLITUDE_PX).round() as i32
}

#[allow(clippy::too_many_arguments)]
fn draw_bitmap_centered(
    frame: &mut [u8],
    width: u32,
    height: u32,
    cx: i32,
    cy: i32,
    bitmap: &SourceBitmap,
    scale: f32,
    flip_x: bool,
) {
    let (scaled_w, scaled_h) = scaled_dimensions(bitmap, scale);
    let left = cx - scaled_w / 2;
    let top = cy - scaled_h / 2;

    let draw_left = left.max(0);
    let draw_top = top.max(0);
    let draw_right = (left + scaled_w).min(width as i32);
    let draw_bottom = (top + scaled_h).min(height as i32);
    if draw_left >= draw_right || draw_top >= draw_bottom {
        return;
    }

    let src_w = bitmap.width();
    let src_h = bitmap.height();
    let rgba = bitmap.rgba();
    let frame_width = width as usize;

    for out_y in draw_top..draw_bottom {
        let v = (out_y - top) as f32 / scaled_h as f32;
        let src_y = ((v * src_h as f32) as u32).min(src_h - 1) as usize;
        for out_x in draw_left..draw_right {
            let u = (out_x - left) as f32 / scaled_w as f32;
            let mut src_x = ((u * src_w as f32) as u32).min(src_w - 1);
            if flip_x {
                src_x = src_w - 1 - src_x;
            }
            let offset = (src_y * src_w as usize + src_x as usize) * 4;
            let alpha = rgba[offset + 3];
            if alpha == 0 {
                continue;
            }
            hud::blend_pixel(
                frame,
                frame_width,
                out_x,
                out_y,
                [rgba[offset], rgba[offset + 1], rgba[offset + 2], alpha],
            );
        }
    }
}

fn draw_ui(frame: &mut [u8], width: u32, height: u32, ui: &UiState, assets: Option<&AssetStore>) {
    if let Some(progress) = ui.progress {
        hud::draw_progress_bar(frame, width, height, progress, ui.title.as_deref());
    }
    if ui.controls_hint_alpha > 0.0 {
        hud::draw_controls_hint(frame, width, height, ui.controls_hint_alpha);
    }
    if ui.talk_prompt_visible {
        hud::draw_talk_prompt(frame, width, height);
    }
    if let Some(dialog) = ui.dialog.as_ref() {
        let avatar = dialog
            .avatar_sprite
            .as_deref()
            .and_then(|key| assets.and_then(|store| store.bitmap(key)));
        hud::draw_dialog(frame, width, height, dialog, avatar);
    }
    if ui.fade_alpha > 0.0 {
        hud::draw_fade(frame, width, height, ui.fade_alpha);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::{RenderableDesc, SceneWorld};

    fn spawn_at_depth(
        world: &mut SceneWorld,
        depth: i32,
        name: &'static str,
    ) -> crate::app::EntityId {
        let id = world.spawn(
            Vec2::default(),
            RenderableDesc {
                kind: RenderableKind::Placeholder,
                debug_name: name,
            },
        );
        world.apply_pending();
        if let Some(entity) = world.find_entity_mut(id) {
            entity.depth = depth;
        }
        id
    }

    #[test]
    fn renderer_type_is_non_generic() {
        let _renderer: Option<Renderer> = None;
    }

    #[test]
    fn draw_order_sorts_by_depth_then_spawn_order() {
        let mut world = SceneWorld::default();
        let back = spawn_at_depth(&mut world, -10, "background_prop");
        let front = spawn_at_depth(&mut world, 10, "player");
        let mid_first = spawn_at_depth(&mut world, 0, "npc_a");
        let mid_second = spawn_at_depth(&mut world, 0, "npc_b");

        let mut order = Vec::new();
        collect_draw_order(&world, &mut order);
        let ids: Vec<_> = order.iter().map(|i| world.entities()[*i].id).collect();
        assert_eq!(ids, vec![back, mid_first, mid_second, front]);
    }

    #[test]
    fn draw_order_is_stable_across_calls() {
        let mut world = SceneWorld::default();
        for i in 0..6 {
            spawn_at_depth(&mut world, (i % 3) as i32, "prop");
        }
        let mut first = Vec::new();
        let mut second = Vec::new();
        collect_draw_order(&world, &mut first);
        collect_draw_order(&world, &mut second);
        assert_eq!(first, second);
    }

    #[test]
    fn sprite_culling_keeps_partially_visible_sprites() {
        let bitmap = SourceBitmap::new(10, 10, vec![255u8; 10 * 10 * 4]).expect("bitmap");
        assert!(sprite_in_view(&bitmap, 1.0, 0, 0, 960, 540));
        assert!(sprite_in_view(&bitmap, 1.0, -5, 270, 960, 540));
        assert!(!sprite_in_view(&bitmap, 1.0, -100, 270, 960, 540));
        assert!(!sprite_in_view(&bitmap, 1.0, 480, 700, 960, 540));
    }

    #[test]
    fn flipped_blit_mirrors_horizontally() {
        // 2x1 bitmap: left pixel red, right pixel green.
        let rgba = vec![255, 0, 0, 255, 0, 255, 0, 255];
        let bitmap = SourceBitmap::new(2, 1, rgba).expect("bitmap");

        let mut plain = vec![0u8; 2 * 1 * 4];
        draw_bitmap_centered(&mut plain, 2, 1, 1, 0, &bitmap, 1.0, false);
        let mut flipped = vec![0u8; 2 * 1 * 4];
        draw_bitmap_centered(&mut flipped, 2, 1, 1, 0, &bitmap, 1.0, true);

        assert_eq!(&plain[0..3], &[255, 0, 0]);
        assert_eq!(&flipped[0..3], &[0, 255, 0]);
    }

    #[test]
    fn walking_entity_renders_offset_from_idle() {
        let mut world = SceneWorld::default();
        let id = world.spawn(
            Vec2::default(),
            RenderableDesc {
                kind: RenderableKind::Placeholder,
                debug_name: "player",
            },
        );
        world.apply_pending();
        let entity = world.find_entity_mut(id).expect("entity");

        assert_eq!(walk_bob_offset_px(entity), 0);

        // A quarter of the first bob puts the sine at its peak.
        entity.advance_walk(WALK_CYCLE_SECONDS / WALK_BOBS_PER_CYCLE / 4.0);
        let offset = walk_bob_offset_px(entity);
        assert_eq!(offset, WALK_BOB_AMPLITUDE_PX.round() as i32);

        // The same sprite lands on different rows mid-stride and idle.
        let rgba = vec![255, 255, 255, 255];
        let bitmap = SourceBitmap::new(1, 1, rgba).expect("bitmap");
        let mut idle_frame = vec![0u8; 4 * 8 * 4];
        draw_bitmap_centered(&mut idle_frame, 4, 8, 1, 3, &bitmap, 1.0, false);
        let mut walking_frame = vec![0u8; 4 * 8 * 4];
        draw_bitmap_centered(&mut walking_frame, 4, 8, 1, 3 + offset, &bitmap, 1.0, false);
        assert_ne!(idle_frame, walking_frame);

        // Stopping snaps the entity back to its exact position.
        entity.stop_walking();
        assert_eq!(walk_bob_offset_px(entity), 0);
    }

    #[test]
    fn transparent_pixels_leave_the_frame_untouched() {
        let rgba = vec![255, 255, 255, 0];
        let bitmap = SourceBitmap::new(1, 1, rgba).expect("bitmap");
        let mut frame = vec![7u8; 4];
        draw_bitmap_centered(&mut frame, 1, 1, 0, 0, &bitmap, 1.0, false);
        assert_eq!(&frame[0..3], &[7, 7, 7]);
    }
}
