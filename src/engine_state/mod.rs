//! # Engine State Module
//!
//! The simulation core of the sandbox.
//!
//! ## Key Components
//!
//! * `Session` - Top-level owner of the world, player, inventory and generation
//! * `events` - Change notifications for the presentation layer
//! * `inventory` - Block stock and selection
//! * `player_state` - Player body, camera and collision
//! * `scene` - The write-only render surface contract
//! * `targeting` - Ray selection and the place/remove protocol
//! * `task_management` - Deferred, budgeted work queue
//! * `voxels` - Blocks, world storage and terrain generation
//!
//! ## Architecture
//!
//! There are no globals. A `Session` owns every subsystem and is driven by one
//! call to `tick` per frame; the presentation layer holds the session and
//! subscribes to its events. Each running tick:
//!
//! 1. Runs a budget of queued generation tasks
//! 2. Applies hotbar, mode and look input
//! 3. Derives the player's velocity and resolves it against the world
//! 4. Re-targets from the new camera pose and updates highlight and ghost
//! 5. Applies place/remove commands
//! 6. Emits events for whatever changed
//!
//! Pausing stops steps 2 to 6; the scene keeps showing the last state.

pub mod events;
pub mod inventory;
pub mod player_state;
pub mod scene;
pub mod targeting;
pub mod task_management;
pub mod voxels;

use std::rc::Rc;

use cgmath::Point3;
use log::{debug, info, warn};
use web_time::Duration;

use crate::{
    application_state::{
        input_state::PlayerAction,
        settings::{ConfigError, Settings},
    },
    core::StResource,
};
use events::{EventBus, SessionEvent};
use inventory::Inventory;
use player_state::{camera::Camera, collision::CollisionResolver, PlayerBody, PlayerMode};
use scene::SceneSurface;
use targeting::{BlockTargeter, EditError, EditOutcome, Selection, VoxelRaycaster};
use task_management::TaskManager;
use voxels::{
    block::block_type::{BlockCatalog, BlockId},
    tasks::{ChunkGenerationTask, DemoStructuresTask},
    terrain::TerrainGenerator,
    world::VoxelWorld,
};

/// Session lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// No world exists.
    Stopped,
    /// Generation tasks are still queued.
    Loading,
    /// Input, physics and targeting run every tick.
    Running,
    /// Ticks do nothing; the last state stays on screen.
    Paused,
}

/// One play session: world, player, inventory, and the machinery around them.
pub struct Session {
    settings: Settings,
    catalog: Rc<BlockCatalog>,
    world: StResource<VoxelWorld>,
    generator: StResource<TerrainGenerator>,
    player: PlayerBody,
    inventory: Inventory,
    targeter: BlockTargeter,
    collision: CollisionResolver,
    task_manager: TaskManager,
    events: EventBus,
    state: SessionState,
    player_actions: PlayerAction,
    last_position: Point3<f32>,
}

impl Session {
    /// Creates a stopped session rendering into `scene`.
    ///
    /// Fails if the block catalog is malformed or lacks a type the generator or
    /// the starting inventory needs.
    pub fn new(settings: Settings, scene: Box<dyn SceneSurface>) -> Result<Self, ConfigError> {
        let generator = TerrainGenerator::new(settings.terrain.clone());
        Self::with_generator(settings, scene, generator)
    }

    /// Creates a stopped session around an explicit terrain generator.
    pub fn with_generator(
        settings: Settings,
        scene: Box<dyn SceneSurface>,
        generator: TerrainGenerator,
    ) -> Result<Self, ConfigError> {
        let catalog = Rc::new(settings.catalog()?);
        TerrainGenerator::validate(&catalog)?;
        catalog.require(&[settings.inventory.selected])?;

        let player = PlayerBody::new(&settings.player);
        let last_position = player.position;
        Ok(Session {
            world: StResource::new(VoxelWorld::new(catalog.clone(), scene)),
            generator: StResource::new(generator),
            inventory: Inventory::new(&settings.inventory),
            targeter: BlockTargeter::new(Box::new(VoxelRaycaster::new(
                settings.targeting.max_distance,
            ))),
            collision: CollisionResolver::new(settings.player.ground_band),
            task_manager: TaskManager::new(settings.generation.tasks_per_tick),
            events: EventBus::new(),
            state: SessionState::Stopped,
            player_actions: PlayerAction::default(),
            last_position,
            player,
            catalog,
            settings,
        })
    }

    /// Schedules world generation and enters `Loading`.
    ///
    /// The player and inventory are reset to their starting values. Does
    /// nothing unless the session is stopped.
    pub fn start(&mut self) {
        if self.state != SessionState::Stopped {
            warn!("Ignoring start while {:?}", self.state);
            return;
        }

        self.player = PlayerBody::new(&self.settings.player);
        self.last_position = self.player.position;
        self.inventory = Inventory::new(&self.settings.inventory);
        self.player_actions = PlayerAction::default();

        let origins = self.generator.get().chunk_origins();
        let chunk_size = self.settings.terrain.chunk_size.max(1);
        info!("Starting session: {} chunks to generate", origins.len());
        for origin in origins {
            self.task_manager.publish_task(Box::new(ChunkGenerationTask::new(
                self.generator.clone(),
                self.world.clone(),
                origin,
                chunk_size,
            )));
        }
        if self.settings.terrain.demo_structures {
            self.task_manager.publish_task(Box::new(DemoStructuresTask::new(
                self.generator.clone(),
                self.world.clone(),
            )));
        }
        self.set_state(SessionState::Loading);
    }

    /// Tears the world down. Unstarted generation tasks are dropped.
    pub fn stop(&mut self) {
        if self.state == SessionState::Stopped {
            return;
        }
        self.task_manager.clear();
        self.targeter.clear();
        {
            let mut world = self.world.get_mut();
            world.scene_mut().set_ghost(None, 0);
            world.clear();
        }
        info!("Session stopped");
        self.set_state(SessionState::Stopped);
    }

    /// Suspends input, physics and targeting. Only a running session pauses.
    pub fn pause(&mut self) {
        if self.state == SessionState::Running {
            self.set_state(SessionState::Paused);
        }
    }

    /// Leaves `Paused`.
    pub fn resume(&mut self) {
        if self.state == SessionState::Paused {
            self.set_state(SessionState::Running);
        }
    }

    /// Sets the actions the next tick will apply.
    pub fn set_input(&mut self, action: PlayerAction) {
        self.player_actions = action;
    }

    /// Advances the session by `elapsed`, clamped to the configured maximum.
    pub fn tick(&mut self, elapsed: Duration) {
        let dt = elapsed
            .as_secs_f32()
            .min(self.settings.physics.max_delta_time);

        match self.state {
            SessionState::Stopped | SessionState::Paused => {}
            SessionState::Loading => {
                self.task_manager.process_queued_tasks();
                if self.task_manager.is_idle() {
                    self.finish_loading();
                }
            }
            SessionState::Running => {
                self.task_manager.process_queued_tasks();
                let action = std::mem::take(&mut self.player_actions);
                self.simulate(&action, dt);
            }
        }
    }

    /// Runs every queued generation task now and, if loading, starts running.
    pub fn finish_generation(&mut self) {
        let processed = self.task_manager.run_to_completion();
        debug!("Ran {} generation tasks", processed);
        if self.state == SessionState::Loading {
            self.finish_loading();
        }
    }

    /// Places the selected block type at the current placement cell.
    pub fn place_block(&mut self) -> Result<EditOutcome, EditError> {
        if self.state != SessionState::Running {
            return Err(EditError::NotRunning);
        }
        let outcome = {
            let mut world = self.world.get_mut();
            self.targeter.place(&mut world, &mut self.inventory)?
        };
        if let EditOutcome::Placed(coordinate, id) = outcome {
            self.events.emit(SessionEvent::BlockPlaced(coordinate, id));
            self.emit_inventory(id);
        }
        Ok(outcome)
    }

    /// Removes the targeted block and restocks it.
    pub fn remove_block(&mut self) -> Result<EditOutcome, EditError> {
        if self.state != SessionState::Running {
            return Err(EditError::NotRunning);
        }
        let outcome = {
            let mut world = self.world.get_mut();
            self.targeter.remove(&mut world, &mut self.inventory)?
        };
        if let EditOutcome::Removed(coordinate, id) = outcome {
            self.events.emit(SessionEvent::BlockRemoved(coordinate, id));
            self.emit_inventory(id);
        }
        Ok(outcome)
    }

    /// Selects the block type in hotbar slot `index` (0-based).
    pub fn select_slot(&mut self, index: usize) -> Option<BlockId> {
        let id = self.catalog.slot(index)?.id;
        self.select_block_type(id).ok()?;
        Some(id)
    }

    /// Selects a block type by id and recolors the ghost.
    pub fn select_block_type(&mut self, id: BlockId) -> Result<(), EditError> {
        let color = self
            .catalog
            .get(id)
            .map(|block_type| block_type.color)
            .ok_or(EditError::InvalidBlock(id))?;
        if !self.inventory.select(id) {
            return Ok(());
        }
        if let Some(selection) = self.targeter.selection().filter(|s| s.ghost_visible) {
            let placement = selection.placement;
            self.world.get_mut().scene_mut().set_ghost(Some(placement), color);
        }
        debug!("Selected block type {}", id);
        self.events.emit(SessionEvent::SelectedBlockChanged(id));
        Ok(())
    }

    /// Switches the player between Walk and Fly.
    pub fn toggle_mode(&mut self) -> PlayerMode {
        let mode = self.player.toggle_mode();
        self.events.emit(SessionEvent::ModeChanged(mode));
        mode
    }

    /// Registers an event subscriber.
    pub fn subscribe(&mut self) -> std::sync::mpsc::Receiver<SessionEvent> {
        self.events.subscribe()
    }

    /// Current lifecycle state.
    pub fn state(&self) -> SessionState {
        self.state
    }

    /// The configuration the session was built from.
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// The block catalog.
    pub fn catalog(&self) -> &Rc<BlockCatalog> {
        &self.catalog
    }

    /// Shared handle to the world.
    pub fn world(&self) -> &StResource<VoxelWorld> {
        &self.world
    }

    /// The player body.
    pub fn player(&self) -> &PlayerBody {
        &self.player
    }

    /// Mutable access to the player body, e.g. to teleport it.
    pub fn player_mut(&mut self) -> &mut PlayerBody {
        &mut self.player
    }

    /// The camera derived from the player body.
    pub fn camera(&self) -> Camera {
        self.player.camera()
    }

    /// The inventory.
    pub fn inventory(&self) -> &Inventory {
        &self.inventory
    }

    /// The current selection, if the player is looking at a block.
    pub fn selection(&self) -> Option<&Selection> {
        self.targeter.selection()
    }

    /// Generation tasks still queued.
    pub fn pending_tasks(&self) -> usize {
        self.task_manager.pending()
    }

    /// Recomputes the selection from the current camera without moving.
    pub fn refresh_selection(&mut self) {
        let color = self.selected_color();
        let camera = self.player.camera();
        let changed = {
            let mut world = self.world.get_mut();
            self.targeter.update(&mut world, &camera, color)
        };
        if changed {
            let selection = self.targeter.selection();
            self.events.emit(SessionEvent::SelectionChanged {
                target: selection.map(|s| s.hit.coordinate),
                ghost: selection.filter(|s| s.ghost_visible).map(|s| s.placement),
            });
        }
    }

    fn simulate(&mut self, action: &PlayerAction, dt: f32) {
        if let Some(slot) = action.select_slot {
            if self.select_slot(slot).is_none() {
                debug!("Hotbar slot {} is empty", slot);
            }
        }
        if action.toggle_mode {
            self.toggle_mode();
        }
        if let Some(delta) = action.rotate_view {
            self.player.look(delta, self.settings.physics.mouse_sensitivity);
        }

        self.player.apply_input(action, &self.settings.physics, dt);
        self.collision
            .resolve(&mut self.player, &self.world.get(), dt);

        if self.player.position != self.last_position {
            self.last_position = self.player.position;
            self.events
                .emit(SessionEvent::PositionChanged(self.player.position));
        }

        self.refresh_selection();

        if action.primary {
            if let Err(e) = self.place_block() {
                debug!("Place rejected: {}", e);
            }
        }
        if action.secondary {
            if let Err(e) = self.remove_block() {
                debug!("Remove rejected: {}", e);
            }
        }
    }

    fn finish_loading(&mut self) {
        if self.settings.player.spawn_on_surface {
            let [x, _, z] = self.settings.player.spawn;
            let top = self
                .world
                .get()
                .top_at(x.floor() as i32, z.floor() as i32);
            if let Some(top) = top {
                self.player.position.y = top as f32 + 1.0;
            }
        }
        self.player.velocity = cgmath::Vector3::new(0.0, 0.0, 0.0);
        self.last_position = self.player.position;

        let blocks = self.world.get().len();
        info!(
            "World ready: {} blocks, player at {:?}",
            blocks, self.player.position
        );
        self.set_state(SessionState::Running);
        self.events.emit(SessionEvent::WorldReady(blocks));
        self.events
            .emit(SessionEvent::PositionChanged(self.player.position));
        self.refresh_selection();
    }

    fn selected_color(&self) -> u32 {
        self.catalog
            .get(self.inventory.selected())
            .map(|block_type| block_type.color)
            .unwrap_or(0)
    }

    fn emit_inventory(&mut self, id: BlockId) {
        let count = self.inventory.count(id);
        self.events.emit(SessionEvent::InventoryChanged(id, count));
    }

    fn set_state(&mut self, state: SessionState) {
        debug!("Session {:?} -> {:?}", self.state, state);
        self.state = state;
        self.events.emit(SessionEvent::StateChanged(state));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        application_state::settings::{InventoryMode, StackSettings},
        engine_state::{
            scene::{NullScene, RecordingScene, SceneCommand},
            voxels::terrain::{noise::Biome, tests::{flat_generator, quiet_settings}},
        },
    };
    use cgmath::Rad;

    fn flat_settings() -> Settings {
        let mut settings = Settings::default();
        settings.terrain = quiet_settings();
        settings.terrain.radius = 8;
        settings.terrain.demo_structures = false;
        settings
    }

    fn flat_session(settings: Settings) -> Session {
        let generator = flat_generator(4, Biome::Plains, settings.terrain.clone());
        Session::with_generator(settings, Box::new(NullScene), generator).unwrap()
    }

    const FRAME: Duration = Duration::from_millis(16);

    #[test]
    fn loading_runs_tasks_within_the_budget() {
        let mut settings = flat_settings();
        settings.generation.tasks_per_tick = 1;
        let mut session = flat_session(settings);
        let events = session.subscribe();

        session.start();
        assert_eq!(session.state(), SessionState::Loading);
        assert_eq!(session.pending_tasks(), 4);

        for _ in 0..4 {
            session.tick(FRAME);
        }
        assert_eq!(session.state(), SessionState::Running);
        assert_eq!(session.player().position.y, 5.0);

        let events: Vec<_> = events.try_iter().collect();
        assert!(events.contains(&SessionEvent::StateChanged(SessionState::Loading)));
        assert!(events.contains(&SessionEvent::WorldReady(16 * 16 * 5)));
    }

    #[test]
    fn stop_clears_the_world_and_restart_regenerates() {
        let scene = RecordingScene::new();
        let settings = flat_settings();
        let generator = flat_generator(4, Biome::Plains, settings.terrain.clone());
        let mut session = Session::with_generator(settings, Box::new(scene.clone()), generator).unwrap();

        session.start();
        session.finish_generation();
        let blocks = session.world().get().len();
        assert!(blocks > 0);
        scene.drain();

        session.stop();
        assert_eq!(session.state(), SessionState::Stopped);
        assert!(session.world().get().is_empty());
        let removals = scene
            .drain()
            .into_iter()
            .filter(|c| matches!(c, SceneCommand::Remove(_)))
            .count();
        assert_eq!(removals, blocks);

        session.start();
        session.finish_generation();
        assert_eq!(session.world().get().len(), blocks);
    }

    #[test]
    fn stop_hides_the_ghost() {
        let scene = RecordingScene::new();
        let settings = flat_settings();
        let generator = flat_generator(4, Biome::Plains, settings.terrain.clone());
        let mut session = Session::with_generator(settings, Box::new(scene.clone()), generator).unwrap();
        session.start();
        session.finish_generation();
        session.player_mut().position = Point3::new(5.5, 5.0, 5.5);
        session.player_mut().pitch = Rad(-std::f32::consts::FRAC_PI_2);
        session.refresh_selection();
        assert!(session.selection().is_some_and(|s| s.ghost_visible));
        scene.drain();

        session.stop();
        let last_ghost = scene
            .drain()
            .into_iter()
            .filter_map(|c| match c {
                SceneCommand::Ghost(cell, _) => Some(cell),
                _ => None,
            })
            .last();
        assert_eq!(last_ghost, Some(None));
        assert!(session.selection().is_none());
    }

    #[test]
    fn pause_freezes_the_player() {
        let mut session = flat_session(flat_settings());
        session.start();
        session.finish_generation();
        session.player_mut().position.y = 20.0;

        session.pause();
        session.tick(FRAME);
        assert_eq!(session.player().position.y, 20.0);
        assert_eq!(
            session.place_block(),
            Err(EditError::NotRunning)
        );

        session.resume();
        session.tick(FRAME);
        assert!(session.player().position.y < 20.0);
    }

    #[test]
    fn edits_go_through_the_tick() {
        let mut settings = flat_settings();
        settings.inventory.starting = vec![StackSettings {
            block: BlockId::STONE,
            count: 1,
        }];
        let mut session = flat_session(settings);
        session.start();
        session.finish_generation();
        session.player_mut().position = Point3::new(5.5, 5.0, 5.5);
        session.player_mut().pitch = Rad(-std::f32::consts::FRAC_PI_2);
        session.tick(FRAME);

        let target = session.selection().map(|s| s.hit.coordinate);
        assert_eq!(target, Some(Point3::new(5, 4, 5)));

        session.set_input(PlayerAction {
            secondary: true,
            ..PlayerAction::default()
        });
        session.tick(FRAME);
        assert!(!session.world().get().contains(Point3::new(5, 4, 5)));
        assert_eq!(session.inventory().count(BlockId::GRASS), 1);
    }

    #[test]
    fn selecting_a_slot_emits_once() {
        let mut settings = flat_settings();
        settings.inventory.mode = InventoryMode::Unlimited;
        let mut session = flat_session(settings);
        let events = session.subscribe();

        assert_eq!(session.select_slot(1), Some(BlockId::GRASS));
        assert_eq!(session.select_slot(1), Some(BlockId::GRASS));
        assert_eq!(session.select_slot(40), None);
        assert_eq!(
            session.select_block_type(BlockId(99)),
            Err(EditError::InvalidBlock(BlockId(99)))
        );

        let selected: Vec<_> = events
            .try_iter()
            .filter(|e| matches!(e, SessionEvent::SelectedBlockChanged(_)))
            .collect();
        assert_eq!(selected, vec![SessionEvent::SelectedBlockChanged(BlockId::GRASS)]);
    }

    #[test]
    fn catalog_missing_generator_types_is_rejected() {
        let mut settings = flat_settings();
        settings.blocks.retain(|b| b.id != BlockId::LEAVES);
        let generator = flat_generator(4, Biome::Plains, settings.terrain.clone());
        assert!(matches!(
            Session::with_generator(settings, Box::new(NullScene), generator),
            Err(ConfigError::Catalog(_))
        ));
    }
}
