use engine::{
    build_obstacles, resolve_movement, screen_to_world_px, Aabb, EntityId, InputAction,
    InputSnapshot, RenderableDesc, RenderableKind, Scene, SceneCommand, SceneWorld, Vec2,
    CAMERA_FOLLOW_LERP,
};
use tracing::{info, warn};

use crate::app::dialog::DialogBox;
use crate::app::npcs::NpcProfile;

use super::{
    BACKGROUND_SPRITE, COLLISION_ALPHA_THRESHOLD, COLLISION_CELL_SIZE, COLLISION_SAMPLE_STEP,
    COLLISION_SPRITE, HINT_FADE_SECONDS, HINT_HOLD_SECONDS, OBSTACLE_INDEX_CELL_SIZE,
    PLAYER_SCALE, PLAYER_SPAWN_X, PLAYER_SPAWN_Y, PLAYER_SPEED, PLAYER_SPRITE,
    POINTER_DEAD_ZONE_DIST_SQ, WORLD_HEIGHT, WORLD_WIDTH,
};

const PLAYER_DEPTH: i32 = 5;
const NPC_DEPTH: i32 = 3;
// Stand-in dimensions when a sprite failed to decode.
const PLAYER_FALLBACK_SIZE: Vec2 = Vec2 { x: 48.0, y: 64.0 };
const NPC_FALLBACK_SIZE: Vec2 = Vec2 { x: 48.0, y: 48.0 };

/// The walkable film set: player movement against the collision grid, crew
/// proximity checks, and the talk dialog.
pub(crate) struct SetScene {
    profiles: Vec<NpcProfile>,
    player_id: Option<EntityId>,
    player_half: Vec2,
    npc_zones: Vec<(usize, Aabb)>,
    dialog: DialogBox,
    hint_elapsed: f32,
}

impl SetScene {
    pub(crate) fn new(profiles: Vec<NpcProfile>) -> Self {
        Self {
            profiles,
            player_id: None,
            player_half: Vec2 {
                x: PLAYER_FALLBACK_SIZE.x * PLAYER_SCALE / 2.0,
                y: PLAYER_FALLBACK_SIZE.y * PLAYER_SCALE / 2.0,
            },
            npc_zones: Vec::new(),
            dialog: DialogBox::default(),
            hint_elapsed: 0.0,
        }
    }

    fn sprite_size(world: &SceneWorld, key: &str, fallback: Vec2) -> Vec2 {
        world
            .assets()
            .and_then(|assets| {
                assets.borrow().bitmap(key).map(|bitmap| Vec2 {
                    x: bitmap.width() as f32,
                    y: bitmap.height() as f32,
                })
            })
            .unwrap_or(fallback)
    }

    fn player_position(&self, world: &SceneWorld) -> Option<Vec2> {
        self.player_id
            .and_then(|id| world.find_entity(id))
            .map(|entity| entity.position)
    }

    fn nearby_npc(&self, player_body: &Aabb) -> Option<usize> {
        self.npc_zones
            .iter()
            .find(|(_, zone)| zone.overlaps(player_body))
            .map(|(index, _)| *index)
    }
}

impl Scene for SetScene {
    fn load(&mut self, world: &mut SceneWorld) {
        world.set_world_size(Vec2 {
            x: WORLD_WIDTH,
            y: WORLD_HEIGHT,
        });
        world.set_background_sprite(BACKGROUND_SPRITE);
        world.set_collision_sprite(COLLISION_SPRITE);

        let collision_result = world.assets().map(|assets| {
            let store = assets.borrow();
            store.bitmap(COLLISION_SPRITE).map(|bitmap| {
                build_obstacles(
                    bitmap,
                    COLLISION_CELL_SIZE,
                    COLLISION_SAMPLE_STEP,
                    WORLD_WIDTH,
                    WORLD_HEIGHT,
                    COLLISION_ALPHA_THRESHOLD,
                )
            })
        });
        match collision_result.flatten() {
            Some(Ok(obstacles)) => {
                info!(obstacle_count = obstacles.len(), "collision_grid_built");
                world.set_obstacles(obstacles, OBSTACLE_INDEX_CELL_SIZE);
            }
            Some(Err(error)) => {
                warn!(error = %error, "collision_grid_rejected");
            }
            None => {
                warn!("collision_image_missing_no_obstacles");
            }
        }

        let player_size = Self::sprite_size(world, PLAYER_SPRITE, PLAYER_FALLBACK_SIZE);
        self.player_half = Vec2 {
            x: player_size.x * PLAYER_SCALE / 2.0,
            y: player_size.y * PLAYER_SCALE / 2.0,
        };

        let player_spawn = Vec2 {
            x: PLAYER_SPAWN_X,
            y: PLAYER_SPAWN_Y,
        };
        let player_id = world.spawn(
            player_spawn,
            RenderableDesc {
                kind: RenderableKind::Sprite(PLAYER_SPRITE.to_string()),
                debug_name: "player",
            },
        );
        self.player_id = Some(player_id);

        self.npc_zones.clear();
        let mut npc_ids = Vec::with_capacity(self.profiles.len());
        for (index, profile) in self.profiles.iter().enumerate() {
            let position = Vec2 {
                x: profile.x,
                y: profile.y,
            };
            let id = world.spawn(
                position,
                RenderableDesc {
                    kind: RenderableKind::Sprite(profile.sprite_key.clone()),
                    debug_name: "npc",
                },
            );
            npc_ids.push((id, index));
            let zone_size = Self::sprite_size(world, &profile.sprite_key, NPC_FALLBACK_SIZE);
            self.npc_zones.push((index, Aabb::new(position, zone_size)));
        }
        world.apply_pending();

        if let Some(player) = world.find_entity_mut(player_id) {
            player.scale = PLAYER_SCALE;
            player.depth = PLAYER_DEPTH;
        }
        for (id, index) in npc_ids {
            if let Some(npc) = world.find_entity_mut(id) {
                npc.depth = NPC_DEPTH;
                npc.label = Some(self.profiles[index].name.clone());
            }
        }

        world.camera_mut().position = player_spawn;
        self.dialog.close();
        self.hint_elapsed = 0.0;
        let ui = world.ui_mut();
        ui.controls_hint_alpha = 1.0;
        ui.talk_prompt_visible = false;
        ui.dialog = None;

        info!(
            npc_count = self.profiles.len(),
            entity_count = world.entity_count(),
            "set_scene_ready"
        );
    }

    fn update(
        &mut self,
        fixed_dt_seconds: f32,
        input: &InputSnapshot,
        world: &mut SceneWorld,
    ) -> SceneCommand {
        self.hint_elapsed += fixed_dt_seconds;
        world.ui_mut().controls_hint_alpha = hint_alpha(self.hint_elapsed);

        let Some(player_position) = self.player_position(world) else {
            return SceneCommand::None;
        };
        let window_size = input.window_size();
        let player_body = Aabb {
            center: player_position,
            half: self.player_half,
        };
        let nearby = self.nearby_npc(&player_body);

        if self.dialog.is_open() {
            // Conversation freezes the player until dismissed.
            if input.talk_pressed() {
                self.dialog.close();
            }
            if let Some(player) = self.player_id.and_then(|id| world.find_entity_mut(id)) {
                player.stop_walking();
            }
            sync_camera(world, player_position, window_size);
            sync_ui(world, nearby, &self.dialog);
            return SceneCommand::None;
        }

        if let Some(index) = nearby {
            if input.talk_pressed() {
                let profile = &self.profiles[index];
                let avatar_available = world
                    .assets()
                    .map(|assets| assets.borrow().bitmap(&profile.sprite_key).is_some())
                    .unwrap_or(false);
                self.dialog.open(profile, avatar_available);
                info!(npc = %profile.id, "dialog_opened");
            }
        }

        let (mut axis_x, mut axis_y) = keyboard_axes(input);
        if input.pointer_held() {
            if let Some(cursor) = input.cursor_position_px() {
                let target = screen_to_world_px(world.camera(), window_size, cursor);
                let dx = target.x - player_position.x;
                let dy = target.y - player_position.y;
                let dist_sq = dx * dx + dy * dy;
                if dist_sq > POINTER_DEAD_ZONE_DIST_SQ {
                    let len = dist_sq.sqrt();
                    axis_x = dx / len;
                    axis_y = dy / len;
                } else {
                    axis_x = 0.0;
                    axis_y = 0.0;
                }
            }
        }
        let (dir_x, dir_y) = normalized(axis_x, axis_y);
        let moving = dir_x != 0.0 || dir_y != 0.0;
        let delta = Vec2 {
            x: dir_x * PLAYER_SPEED * fixed_dt_seconds,
            y: dir_y * PLAYER_SPEED * fixed_dt_seconds,
        };

        let resolved = match world.obstacle_index() {
            Some(index) => resolve_movement(player_body, delta, index, WORLD_WIDTH, WORLD_HEIGHT),
            None => Vec2 {
                x: (player_position.x + delta.x).clamp(
                    self.player_half.x,
                    WORLD_WIDTH - self.player_half.x,
                ),
                y: (player_position.y + delta.y).clamp(
                    self.player_half.y,
                    WORLD_HEIGHT - self.player_half.y,
                ),
            },
        };

        if let Some(player) = self.player_id.and_then(|id| world.find_entity_mut(id)) {
            player.position = resolved;
            if moving {
                player.flip_x = dir_x < 0.0;
                player.advance_walk(fixed_dt_seconds);
            } else {
                player.stop_walking();
            }
        }

        sync_camera(world, resolved, window_size);
        sync_ui(world, nearby, &self.dialog);
        SceneCommand::None
    }

    fn unload(&mut self, world: &mut SceneWorld) {
        info!(entity_count = world.entity_count(), "set_scene_unload");
        self.player_id = None;
        self.npc_zones.clear();
        self.dialog.close();
        self.hint_elapsed = 0.0;
    }
}

fn sync_camera(world: &mut SceneWorld, target: Vec2, window_size: (u32, u32)) {
    world.camera_mut().follow(target, CAMERA_FOLLOW_LERP);
    let world_size = world.world_size();
    world.camera_mut().clamp_to_world(world_size, window_size);
}

fn sync_ui(world: &mut SceneWorld, nearby: Option<usize>, dialog: &DialogBox) {
    let ui = world.ui_mut();
    ui.talk_prompt_visible = nearby.is_some() && !dialog.is_open();
    ui.dialog = dialog.content().cloned();
}

fn keyboard_axes(input: &InputSnapshot) -> (f32, f32) {
    let mut x = 0.0f32;
    let mut y = 0.0f32;

    if input.is_down(InputAction::MoveRight) {
        x += 1.0;
    }
    if input.is_down(InputAction::MoveLeft) {
        x -= 1.0;
    }
    if input.is_down(InputAction::MoveDown) {
        y += 1.0;
    }
    if input.is_down(InputAction::MoveUp) {
        y -= 1.0;
    }

    (x, y)
}

fn normalized(x: f32, y: f32) -> (f32, f32) {
    let len_sq = x * x + y * y;
    if len_sq <= f32::EPSILON {
        return (0.0, 0.0);
    }
    let inv_len = len_sq.sqrt().recip();
    (x * inv_len, y * inv_len)
}

/// Controls hint sits at full alpha for a hold period, then fades out.
fn hint_alpha(elapsed: f32) -> f32 {
    if elapsed <= HINT_HOLD_SECONDS {
        return 1.0;
    }
    (1.0 - (elapsed - HINT_HOLD_SECONDS) / HINT_FADE_SECONDS).clamp(0.0, 1.0)
}
