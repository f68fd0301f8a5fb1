//! # Application State Management
//!
//! This module sits between the windowing layer and the simulation:
//! - `settings`: the configuration the session is built from
//! - `input_state` / `input_manager`: winit events to per-tick `PlayerAction`s
//! - `ApplicationState`: owns the session and the input manager, and turns
//!   wall-clock frames into session ticks
//!
//! A presentation layer with a real window forwards its `WindowEvent`s and raw
//! pointer motion here, calls `update` once per frame, and renders whatever its
//! scene surface was told.

pub mod input_manager;
pub mod input_state;
pub mod settings;

use input_manager::InputManager;
use input_state::PlayerAction;
use log::{debug, info};
use winit::{
    event::{ElementState, KeyEvent, WindowEvent},
    keyboard::{KeyCode, PhysicalKey},
};

use crate::engine_state::{scene::SceneSurface, Session, SessionState};
use settings::{ConfigError, Settings};

/// Owns the running session together with input and frame timing.
pub struct ApplicationState {
    /// The simulation
    pub session: Session,

    /// Manages input state and event processing
    pub input_manager: InputManager,

    /// Timestamp of the last frame for delta time calculations
    pub last_wait_time: web_time::Instant,
}

impl ApplicationState {
    /// Builds the session from `settings` and starts generating the world.
    pub fn new(settings: Settings, scene: Box<dyn SceneSurface>) -> Result<Self, ConfigError> {
        let mut session = Session::new(settings, scene)?;
        session.start();
        Ok(Self {
            session,
            input_manager: InputManager::new(),
            last_wait_time: web_time::Instant::now(),
        })
    }

    /// Processes a window event.
    ///
    /// Escape toggles pause. Losing focus releases every key and pauses, so
    /// nothing stays held while the window is in the background.
    pub fn window_event(&mut self, event: &WindowEvent) {
        self.input_manager.intake_input(event);

        match event {
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(KeyCode::Escape),
                        state: ElementState::Pressed,
                        repeat: false,
                        ..
                    },
                ..
            } => self.toggle_pause(),
            WindowEvent::Focused(false) => {
                debug!("Focus lost");
                self.session.pause();
            }
            _ => {}
        }
    }

    /// Adds raw pointer motion for the next tick.
    pub fn mouse_motion(&mut self, delta: (f64, f64)) {
        self.input_manager.intake_mouse_motion(delta);
    }

    /// Runs one frame: samples input and advances the session by the wall
    /// time elapsed since the previous frame.
    pub fn update(&mut self) {
        let now = web_time::Instant::now();
        let elapsed = now.duration_since(self.last_wait_time);
        self.last_wait_time = now;

        let action = self.input_manager.get_and_reset_player_action();
        self.step(action, elapsed);
    }

    /// Advances the session by an explicit duration with the given actions.
    pub fn step(&mut self, action: PlayerAction, elapsed: web_time::Duration) {
        self.session.set_input(action);
        self.session.tick(elapsed);
    }

    fn toggle_pause(&mut self) {
        match self.session.state() {
            SessionState::Running => {
                info!("Paused");
                self.session.pause();
            }
            SessionState::Paused => {
                info!("Resumed");
                self.session.resume();
            }
            SessionState::Stopped | SessionState::Loading => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine_state::scene::NullScene;

    fn small_app() -> ApplicationState {
        let mut settings = Settings::for_variant(settings::Variant::Classic);
        settings.terrain.radius = 4;
        settings.terrain.chunk_size = 4;
        settings.terrain.demo_structures = false;
        settings.terrain.seed = Some(7);
        let mut app = ApplicationState::new(settings, Box::new(NullScene)).unwrap();
        app.session.finish_generation();
        app
    }

    #[test]
    fn losing_focus_pauses_and_releases_keys() {
        let mut app = small_app();
        assert_eq!(app.session.state(), SessionState::Running);
        app.input_manager.set_key_state(KeyCode::KeyW, true);

        app.window_event(&WindowEvent::Focused(false));
        assert_eq!(app.session.state(), SessionState::Paused);
        assert!(!app.input_manager.get_and_reset_player_action().move_forward);
    }

    #[test]
    fn step_feeds_actions_to_the_session() {
        let mut app = small_app();
        app.session.player_mut().position.y += 10.0;
        let before = app.session.player().position;
        app.step(
            PlayerAction {
                move_forward: true,
                ..PlayerAction::default()
            },
            web_time::Duration::from_millis(50),
        );
        let after = app.session.player().position;
        assert!(after.x > before.x);
        assert!(after.y < before.y);
    }
}
