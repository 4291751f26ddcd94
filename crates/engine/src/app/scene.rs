use super::assets::AssetStore;
use super::collision::ObstacleRect;
use super::input::{ActionStates, InputAction};
use super::physics::ObstacleIndex;
use std::cell::RefCell;
use std::rc::Rc;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SceneKey {
    Loader,
    Set,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SceneCommand {
    None,
    SwitchTo(SceneKey),
    HardResetTo(SceneKey),
}

#[derive(Debug, Clone, Copy, Default)]
pub struct InputSnapshot {
    quit_requested: bool,
    talk_pressed: bool,
    actions: ActionStates,
    cursor_position_px: Option<Vec2>,
    pointer_held: bool,
    window_width: u32,
    window_height: u32,
}

impl InputSnapshot {
    pub fn empty() -> Self {
        Self::default()
    }

    pub(crate) fn new(
        quit_requested: bool,
        talk_pressed: bool,
        actions: ActionStates,
        cursor_position_px: Option<Vec2>,
        pointer_held: bool,
        window_width: u32,
        window_height: u32,
    ) -> Self {
        Self {
            quit_requested,
            talk_pressed,
            actions,
            cursor_position_px,
            pointer_held,
            window_width,
            window_height,
        }
    }

    pub fn quit_requested(&self) -> bool {
        self.quit_requested
    }

    /// Edge-triggered: true only on the tick the talk key went down.
    pub fn talk_pressed(&self) -> bool {
        self.talk_pressed
    }

    pub fn is_down(&self, action: InputAction) -> bool {
        self.actions.is_down(action)
    }

    pub fn with_action_down(mut self, action: InputAction, is_down: bool) -> Self {
        self.actions.set(action, is_down);
        self
    }

    pub fn with_talk_pressed(mut self, talk_pressed: bool) -> Self {
        self.talk_pressed = talk_pressed;
        self
    }

    pub fn with_cursor_position_px(mut self, cursor_position_px: Option<Vec2>) -> Self {
        self.cursor_position_px = cursor_position_px;
        self
    }

    pub fn with_pointer_held(mut self, pointer_held: bool) -> Self {
        self.pointer_held = pointer_held;
        self
    }

    pub fn with_window_size(mut self, window_size: (u32, u32)) -> Self {
        self.window_width = window_size.0;
        self.window_height = window_size.1;
        self
    }

    pub fn cursor_position_px(&self) -> Option<Vec2> {
        self.cursor_position_px
    }

    pub fn pointer_held(&self) -> bool {
        self.pointer_held
    }

    pub fn window_size(&self) -> (u32, u32) {
        (self.window_width, self.window_height)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EntityId(pub u64);

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

pub const CAMERA_FOLLOW_LERP: f32 = 0.12;

/// World-space coordinates run x right, y down, matching bitmap space, so
/// the camera position is the world point at the viewport center.
#[derive(Debug, Clone, Copy, Default)]
pub struct Camera2D {
    pub position: Vec2,
}

impl Camera2D {
    /// Moves a fraction of the remaining distance toward `target` each
    /// tick, giving the standard exponential ease-out follow.
    pub fn follow(&mut self, target: Vec2, lerp: f32) {
        let lerp = lerp.clamp(0.0, 1.0);
        self.position.x += (target.x - self.position.x) * lerp;
        self.position.y += (target.y - self.position.y) * lerp;
    }

    /// Keeps the visible rect inside the world. A world smaller than the
    /// viewport on an axis centers on that axis instead.
    pub fn clamp_to_world(&mut self, world_size: Vec2, viewport_size_px: (u32, u32)) {
        let half_w = viewport_size_px.0 as f32 / 2.0;
        let half_h = viewport_size_px.1 as f32 / 2.0;

        self.position.x = if world_size.x <= half_w * 2.0 {
            world_size.x / 2.0
        } else {
            self.position.x.clamp(half_w, world_size.x - half_w)
        };
        self.position.y = if world_size.y <= half_h * 2.0 {
            world_size.y / 2.0
        } else {
            self.position.y.clamp(half_h, world_size.y - half_h)
        };
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderableKind {
    Placeholder,
    Sprite(String),
}

#[derive(Debug, Clone)]
pub struct RenderableDesc {
    pub kind: RenderableKind,
    pub debug_name: &'static str,
}

/// One full walk cycle: 29 steps advanced at 12 steps per second.
pub const WALK_CYCLE_SECONDS: f32 = 29.0 / 12.0;

#[derive(Debug, Clone)]
pub struct Entity {
    pub id: EntityId,
    pub position: Vec2,
    pub renderable: RenderableDesc,
    pub scale: f32,
    pub depth: i32,
    pub flip_x: bool,
    pub walking: bool,
    /// Seconds into the walk cycle, wrapped to [0, WALK_CYCLE_SECONDS).
    /// Zero while idle; the renderer derives the walk bob from it.
    pub walk_phase: f32,
    pub label: Option<String>,
    applied_spawn_order: u64,
}

impl Entity {
    pub fn applied_spawn_order(&self) -> u64 {
        self.applied_spawn_order
    }

    pub fn advance_walk(&mut self, dt: f32) {
        self.walking = true;
        self.walk_phase = (self.walk_phase + dt).rem_euclid(WALK_CYCLE_SECONDS);
    }

    pub fn stop_walking(&mut self) {
        self.walking = false;
        self.walk_phase = 0.0;
    }
}

#[derive(Debug, Default)]
pub struct EntityIdAllocator {
    next: u64,
}

impl EntityIdAllocator {
    pub fn allocate(&mut self) -> EntityId {
        let id = EntityId(self.next);
        self.next = self.next.saturating_add(1);
        id
    }
}

/// Dialog content the renderer lays out into the bottom panel.
#[derive(Debug, Clone, PartialEq)]
pub struct DialogContent {
    pub name: String,
    pub role: String,
    pub text: String,
    pub accent_rgba: [u8; 4],
    pub avatar_sprite: Option<String>,
}

/// Per-frame UI flags the active scene publishes for the renderer.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UiState {
    pub dialog: Option<DialogContent>,
    pub talk_prompt_visible: bool,
    /// 0.0 hidden, 1.0 fully visible.
    pub controls_hint_alpha: f32,
    /// Loading progress in [0, 1]; None hides the bar.
    pub progress: Option<f32>,
    pub title: Option<String>,
    /// Full-screen black overlay alpha for scene transitions.
    pub fade_alpha: f32,
}

#[derive(Debug, Default)]
pub struct SceneWorld {
    allocator: EntityIdAllocator,
    entities: Vec<Entity>,
    pending_spawns: Vec<Entity>,
    pending_despawns: Vec<EntityId>,
    next_applied_spawn_order: u64,
    camera: Camera2D,
    world_size: Vec2,
    background_sprite: Option<String>,
    collision_sprite: Option<String>,
    obstacles: Vec<ObstacleRect>,
    obstacle_index: Option<ObstacleIndex>,
    ui: UiState,
    assets: Option<Rc<RefCell<AssetStore>>>,
}

impl SceneWorld {
    pub fn spawn(&mut self, position: Vec2, renderable: RenderableDesc) -> EntityId {
        let id = self.allocator.allocate();
        self.pending_spawns.push(Entity {
            id,
            position,
            renderable,
            scale: 1.0,
            depth: 0,
            flip_x: false,
            walking: false,
            walk_phase: 0.0,
            label: None,
            applied_spawn_order: 0,
        });
        id
    }

    pub fn despawn(&mut self, id: EntityId) -> bool {
        let exists_now = self.entities.iter().any(|entity| entity.id == id);
        let pending_spawn = self.pending_spawns.iter().any(|entity| entity.id == id);
        if !exists_now && !pending_spawn {
            return false;
        }
        self.pending_despawns.push(id);
        true
    }

    pub fn apply_pending(&mut self) {
        if !self.pending_despawns.is_empty() {
            self.pending_despawns.sort_by_key(|id| id.0);
            self.pending_despawns.dedup();
            let pending = &self.pending_despawns;
            self.entities.retain(|entity| {
                pending
                    .binary_search_by_key(&entity.id.0, |id| id.0)
                    .is_err()
            });
            self.pending_despawns.clear();
        }

        if !self.pending_spawns.is_empty() {
            for mut entity in self.pending_spawns.drain(..) {
                entity.applied_spawn_order = self.next_applied_spawn_order;
                self.next_applied_spawn_order = self.next_applied_spawn_order.saturating_add(1);
                self.entities.push(entity);
            }
        }
    }

    /// Resets scene state. The shared asset store survives so a reset does
    /// not force a reload of decoded images.
    pub fn clear(&mut self) {
        self.entities.clear();
        self.pending_spawns.clear();
        self.pending_despawns.clear();
        self.next_applied_spawn_order = 0;
        self.camera = Camera2D::default();
        self.world_size = Vec2::default();
        self.background_sprite = None;
        self.collision_sprite = None;
        self.obstacles.clear();
        self.obstacle_index = None;
        self.ui = UiState::default();
    }

    pub fn entity_count(&self) -> usize {
        self.entities.len()
    }

    pub fn entities(&self) -> &[Entity] {
        &self.entities
    }

    pub fn entities_mut(&mut self) -> &mut [Entity] {
        &mut self.entities
    }

    pub fn find_entity(&self, id: EntityId) -> Option<&Entity> {
        self.entities.iter().find(|entity| entity.id == id)
    }

    pub fn find_entity_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        self.entities.iter_mut().find(|entity| entity.id == id)
    }

    pub fn camera(&self) -> &Camera2D {
        &self.camera
    }

    pub fn camera_mut(&mut self) -> &mut Camera2D {
        &mut self.camera
    }

    pub fn world_size(&self) -> Vec2 {
        self.world_size
    }

    pub fn set_world_size(&mut self, size: Vec2) {
        self.world_size = size;
    }

    pub fn background_sprite(&self) -> Option<&str> {
        self.background_sprite.as_deref()
    }

    pub fn set_background_sprite(&mut self, key: impl Into<String>) {
        self.background_sprite = Some(key.into());
    }

    pub fn collision_sprite(&self) -> Option<&str> {
        self.collision_sprite.as_deref()
    }

    pub fn set_collision_sprite(&mut self, key: impl Into<String>) {
        self.collision_sprite = Some(key.into());
    }

    /// Installs the obstacle set and rebuilds the spatial index over it.
    pub fn set_obstacles(&mut self, obstacles: Vec<ObstacleRect>, index_cell_size: f32) {
        self.obstacle_index = Some(ObstacleIndex::new(&obstacles, index_cell_size));
        self.obstacles = obstacles;
    }

    pub fn obstacles(&self) -> &[ObstacleRect] {
        &self.obstacles
    }

    pub fn obstacle_index(&self) -> Option<&ObstacleIndex> {
        self.obstacle_index.as_ref()
    }

    pub fn ui(&self) -> &UiState {
        &self.ui
    }

    pub fn ui_mut(&mut self) -> &mut UiState {
        &mut self.ui
    }

    pub fn set_assets(&mut self, assets: Rc<RefCell<AssetStore>>) {
        self.assets = Some(assets);
    }

    pub fn assets(&self) -> Option<&Rc<RefCell<AssetStore>>> {
        self.assets.as_ref()
    }
}

pub trait Scene {
    fn load(&mut self, world: &mut SceneWorld);
    fn update(
        &mut self,
        fixed_dt_seconds: f32,
        input: &InputSnapshot,
        world: &mut SceneWorld,
    ) -> SceneCommand;
    fn unload(&mut self, world: &mut SceneWorld);
}

struct SceneRuntime {
    scene: Box<dyn Scene>,
    world: SceneWorld,
    is_loaded: bool,
}

pub(crate) struct SceneMachine {
    loader: SceneRuntime,
    set: SceneRuntime,
    active_scene: SceneKey,
}

impl SceneMachine {
    pub(crate) fn new(
        loader: Box<dyn Scene>,
        set: Box<dyn Scene>,
        active_scene: SceneKey,
    ) -> Self {
        Self {
            loader: SceneRuntime {
                scene: loader,
                world: SceneWorld::default(),
                is_loaded: false,
            },
            set: SceneRuntime {
                scene: set,
                world: SceneWorld::default(),
                is_loaded: false,
            },
            active_scene,
        }
    }

    pub(crate) fn active_scene(&self) -> SceneKey {
        self.active_scene
    }

    pub(crate) fn set_assets_for_all(&mut self, assets: Rc<RefCell<AssetStore>>) {
        self.loader.world.set_assets(Rc::clone(&assets));
        self.set.world.set_assets(assets);
    }

    pub(crate) fn load_active(&mut self) {
        if self.active_runtime_ref().is_loaded {
            return;
        }
        let runtime = self.active_runtime_mut();
        let (scene, world) = (&mut runtime.scene, &mut runtime.world);
        scene.load(world);
        runtime.is_loaded = true;
    }

    pub(crate) fn update_active(
        &mut self,
        fixed_dt_seconds: f32,
        input: &InputSnapshot,
    ) -> SceneCommand {
        let runtime = self.active_runtime_mut();
        let (scene, world) = (&mut runtime.scene, &mut runtime.world);
        scene.update(fixed_dt_seconds, input, world)
    }

    pub(crate) fn apply_pending_active(&mut self) {
        self.active_runtime_mut().world.apply_pending();
    }

    pub(crate) fn active_world(&self) -> &SceneWorld {
        &self.active_runtime_ref().world
    }

    #[cfg(test)]
    pub(crate) fn active_world_mut(&mut self) -> &mut SceneWorld {
        &mut self.active_runtime_mut().world
    }

    pub(crate) fn switch_to(&mut self, next_scene: SceneKey) -> bool {
        if self.active_scene == next_scene {
            return false;
        }

        self.load_scene_if_needed(next_scene);
        self.active_scene = next_scene;
        true
    }

    pub(crate) fn hard_reset_to(&mut self, next_scene: SceneKey) -> bool {
        let runtime = self.runtime_mut(next_scene);
        if runtime.is_loaded {
            let (scene, world) = (&mut runtime.scene, &mut runtime.world);
            scene.unload(world);
        }
        runtime.world.clear();
        {
            let (scene, world) = (&mut runtime.scene, &mut runtime.world);
            scene.load(world);
        }
        runtime.is_loaded = true;
        let changed = self.active_scene != next_scene;
        self.active_scene = next_scene;
        changed
    }

    pub(crate) fn shutdown_all(&mut self) {
        for runtime in [&mut self.loader, &mut self.set] {
            if runtime.is_loaded {
                let (scene, world) = (&mut runtime.scene, &mut runtime.world);
                scene.unload(world);
                runtime.world.clear();
                runtime.is_loaded = false;
            }
        }
    }

    fn load_scene_if_needed(&mut self, key: SceneKey) {
        if self.runtime_ref(key).is_loaded {
            return;
        }
        let runtime = self.runtime_mut(key);
        {
            let (scene, world) = (&mut runtime.scene, &mut runtime.world);
            scene.load(world);
        }
        runtime.is_loaded = true;
    }

    fn active_runtime_mut(&mut self) -> &mut SceneRuntime {
        self.runtime_mut(self.active_scene)
    }

    fn active_runtime_ref(&self) -> &SceneRuntime {
        self.runtime_ref(self.active_scene)
    }

    fn runtime_mut(&mut self, key: SceneKey) -> &mut SceneRuntime {
        match key {
            SceneKey::Loader => &mut self.loader,
            SceneKey::Set => &mut self.set,
        }
    }

    fn runtime_ref(&self, key: SceneKey) -> &SceneRuntime {
        match key {
            SceneKey::Loader => &self.loader,
            SceneKey::Set => &self.set,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn placeholder(debug_name: &'static str) -> RenderableDesc {
        RenderableDesc {
            kind: RenderableKind::Placeholder,
            debug_name,
        }
    }

    struct TestScene {
        spawn_count: usize,
    }

    impl Scene for TestScene {
        fn load(&mut self, world: &mut SceneWorld) {
            for _ in 0..self.spawn_count {
                world.spawn(Vec2::default(), placeholder("test"));
            }
            world.apply_pending();
        }

        fn update(
            &mut self,
            _fixed_dt_seconds: f32,
            _input: &InputSnapshot,
            _world: &mut SceneWorld,
        ) -> SceneCommand {
            SceneCommand::None
        }

        fn unload(&mut self, _world: &mut SceneWorld) {}
    }

    struct SteppingScene {
        spawn_count: usize,
        step_x: f32,
    }

    impl Scene for SteppingScene {
        fn load(&mut self, world: &mut SceneWorld) {
            for _ in 0..self.spawn_count {
                world.spawn(Vec2::default(), placeholder("step"));
            }
            world.apply_pending();
        }

        fn update(
            &mut self,
            _fixed_dt_seconds: f32,
            _input: &InputSnapshot,
            world: &mut SceneWorld,
        ) -> SceneCommand {
            if let Some(entity) = world.entities_mut().first_mut() {
                entity.position.x += self.step_x;
            }
            SceneCommand::None
        }

        fn unload(&mut self, _world: &mut SceneWorld) {}
    }

    #[test]
    fn allocator_never_reuses_ids() {
        let mut allocator = EntityIdAllocator::default();
        let first = allocator.allocate();
        let second = allocator.allocate();
        let third = allocator.allocate();

        assert_eq!(first.0, 0);
        assert_eq!(second.0, 1);
        assert_eq!(third.0, 2);
    }

    #[test]
    fn walk_phase_accumulates_wraps_and_resets() {
        let mut world = SceneWorld::default();
        let id = world.spawn(Vec2::default(), placeholder("walker"));
        world.apply_pending();
        let entity = world.find_entity_mut(id).expect("entity");

        entity.advance_walk(0.5);
        entity.advance_walk(0.5);
        assert!(entity.walking);
        assert!((entity.walk_phase - 1.0).abs() < 1e-6);

        entity.advance_walk(WALK_CYCLE_SECONDS);
        assert!((entity.walk_phase - 1.0).abs() < 1e-4);
        assert!(entity.walk_phase < WALK_CYCLE_SECONDS);

        entity.stop_walking();
        assert!(!entity.walking);
        assert_eq!(entity.walk_phase, 0.0);
    }

    #[test]
    fn scene_world_spawn_and_despawn_updates_count() {
        let mut world = SceneWorld::default();
        let id = world.spawn(Vec2::default(), placeholder("spawned"));
        world.apply_pending();
        assert_eq!(world.entity_count(), 1);

        world.despawn(id);
        world.apply_pending();
        assert_eq!(world.entity_count(), 0);
    }

    #[test]
    fn scene_world_duplicate_pending_despawns_are_safe_and_idempotent() {
        let mut world = SceneWorld::default();
        let doomed = world.spawn(Vec2::default(), placeholder("doomed"));
        let survivor = world.spawn(Vec2 { x: 3.0, y: 1.0 }, placeholder("survivor"));
        world.apply_pending();
        assert_eq!(world.entity_count(), 2);

        assert!(world.despawn(doomed));
        assert!(world.despawn(doomed));
        assert!(world.despawn(doomed));
        world.apply_pending();

        assert_eq!(world.entity_count(), 1);
        assert!(world.find_entity(doomed).is_none());
        assert!(world.find_entity(survivor).is_some());
    }

    #[test]
    fn applied_spawn_order_is_monotonic() {
        let mut world = SceneWorld::default();
        world.spawn(Vec2::default(), placeholder("a"));
        world.spawn(Vec2::default(), placeholder("b"));
        world.apply_pending();
        world.spawn(Vec2::default(), placeholder("c"));
        world.apply_pending();

        let orders: Vec<u64> = world
            .entities()
            .iter()
            .map(|entity| entity.applied_spawn_order())
            .collect();
        assert_eq!(orders, vec![0, 1, 2]);
    }

    #[test]
    fn switch_away_and_back_preserves_entity_ids_and_positions() {
        let mut machine = SceneMachine::new(
            Box::new(TestScene { spawn_count: 2 }),
            Box::new(TestScene { spawn_count: 1 }),
            SceneKey::Loader,
        );
        machine.load_active();
        machine.apply_pending_active();

        {
            let world = machine.active_world_mut();
            world.entities_mut()[0].position = Vec2 { x: 2.5, y: -1.0 };
        }
        let before: Vec<(u64, Vec2)> = machine
            .active_world()
            .entities()
            .iter()
            .map(|entity| (entity.id.0, entity.position))
            .collect();

        assert!(machine.switch_to(SceneKey::Set));
        machine.apply_pending_active();
        assert!(machine.switch_to(SceneKey::Loader));
        machine.apply_pending_active();

        let after: Vec<(u64, Vec2)> = machine
            .active_world()
            .entities()
            .iter()
            .map(|entity| (entity.id.0, entity.position))
            .collect();
        assert_eq!(before, after);
    }

    #[test]
    fn inactive_scene_world_does_not_advance() {
        let mut machine = SceneMachine::new(
            Box::new(SteppingScene {
                spawn_count: 1,
                step_x: 1.0,
            }),
            Box::new(SteppingScene {
                spawn_count: 1,
                step_x: 3.0,
            }),
            SceneKey::Loader,
        );
        machine.load_active();
        machine.apply_pending_active();

        let _ = machine.update_active(1.0 / 60.0, &InputSnapshot::empty());
        machine.apply_pending_active();
        let before_switch = machine.active_world().entities()[0].position.x;

        assert!(machine.switch_to(SceneKey::Set));
        machine.apply_pending_active();
        for _ in 0..10 {
            let _ = machine.update_active(1.0 / 60.0, &InputSnapshot::empty());
            machine.apply_pending_active();
        }

        assert!(machine.switch_to(SceneKey::Loader));
        let after_return = machine.active_world().entities()[0].position.x;
        assert_eq!(before_switch, after_return);
    }

    #[test]
    fn hard_reset_recreates_target_scene_state() {
        let mut machine = SceneMachine::new(
            Box::new(TestScene { spawn_count: 1 }),
            Box::new(TestScene { spawn_count: 1 }),
            SceneKey::Loader,
        );
        machine.load_active();
        machine.apply_pending_active();

        machine.active_world_mut().entities_mut()[0].position = Vec2 { x: 9.0, y: 3.0 };
        assert_eq!(machine.active_world().entities()[0].position.x, 9.0);

        let _ = machine.hard_reset_to(SceneKey::Loader);
        machine.apply_pending_active();

        assert_eq!(machine.active_world().entity_count(), 1);
        assert_eq!(
            machine.active_world().entities()[0].position,
            Vec2 { x: 0.0, y: 0.0 }
        );
    }

    #[test]
    fn repeated_switching_after_despawn_is_stable() {
        let mut machine = SceneMachine::new(
            Box::new(TestScene { spawn_count: 2 }),
            Box::new(TestScene { spawn_count: 1 }),
            SceneKey::Loader,
        );
        machine.load_active();
        machine.apply_pending_active();

        let doomed = machine.active_world().entities()[0].id;
        assert!(machine.active_world_mut().despawn(doomed));
        machine.apply_pending_active();
        assert_eq!(machine.active_world().entity_count(), 1);

        for _ in 0..25 {
            assert!(machine.switch_to(SceneKey::Set));
            machine.apply_pending_active();
            assert!(machine.switch_to(SceneKey::Loader));
            machine.apply_pending_active();
            assert_eq!(machine.active_world().entity_count(), 1);
        }
    }

    #[test]
    fn camera_follow_moves_a_fixed_fraction_per_call() {
        let mut camera = Camera2D::default();
        camera.follow(Vec2 { x: 100.0, y: 50.0 }, 0.12);
        assert!((camera.position.x - 12.0).abs() < 0.0001);
        assert!((camera.position.y - 6.0).abs() < 0.0001);

        camera.follow(Vec2 { x: 100.0, y: 50.0 }, 0.12);
        assert!((camera.position.x - 22.56).abs() < 0.001);
    }

    #[test]
    fn camera_follow_converges_on_target() {
        let mut camera = Camera2D::default();
        for _ in 0..200 {
            camera.follow(Vec2 { x: 320.0, y: 450.0 }, CAMERA_FOLLOW_LERP);
        }
        assert!((camera.position.x - 320.0).abs() < 0.01);
        assert!((camera.position.y - 450.0).abs() < 0.01);
    }

    #[test]
    fn camera_clamps_to_world_edges() {
        let world = Vec2 {
            x: 1500.0,
            y: 1000.0,
        };

        let mut camera = Camera2D {
            position: Vec2 { x: 10.0, y: 990.0 },
        };
        camera.clamp_to_world(world, (960, 540));
        assert_eq!(camera.position, Vec2 { x: 480.0, y: 730.0 });

        let mut camera = Camera2D {
            position: Vec2 {
                x: 1490.0,
                y: 10.0,
            },
        };
        camera.clamp_to_world(world, (960, 540));
        assert_eq!(
            camera.position,
            Vec2 {
                x: 1020.0,
                y: 270.0
            }
        );
    }

    #[test]
    fn camera_centers_when_world_smaller_than_viewport() {
        let mut camera = Camera2D {
            position: Vec2 { x: 999.0, y: -50.0 },
        };
        camera.clamp_to_world(Vec2 { x: 400.0, y: 300.0 }, (960, 540));
        assert_eq!(camera.position, Vec2 { x: 200.0, y: 150.0 });
    }

    #[test]
    fn set_obstacles_builds_a_queryable_index() {
        let mut world = SceneWorld::default();
        world.set_obstacles(
            vec![ObstacleRect {
                center: Vec2 { x: 50.0, y: 50.0 },
                size: Vec2 { x: 32.0, y: 32.0 },
            }],
            64.0,
        );
        assert_eq!(world.obstacles().len(), 1);
        let index = world.obstacle_index().expect("index");
        assert_eq!(index.len(), 1);
    }

    #[test]
    fn clear_keeps_shared_asset_store() {
        let mut world = SceneWorld::default();
        world.set_assets(Rc::new(RefCell::new(AssetStore::default())));
        world.set_world_size(Vec2 {
            x: 1500.0,
            y: 1000.0,
        });
        world.ui_mut().talk_prompt_visible = true;
        world.clear();
        assert!(world.assets().is_some());
        assert_eq!(world.world_size(), Vec2::default());
        assert!(!world.ui().talk_prompt_visible);
    }
}
