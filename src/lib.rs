#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]
#![warn(rustdoc::invalid_rust_codeblocks)]

//! # Voxel Sandbox
//!
//! The simulation core of a first-person block sandbox: a sparse voxel world,
//! procedural terrain, walk/fly player physics with collision, and ray-based
//! block targeting with a place/remove protocol.
//!
//! Rendering is not part of this crate. The core writes to a
//! [`SceneSurface`](engine_state::scene::SceneSurface) and emits
//! [`SessionEvent`](engine_state::events::SessionEvent)s; a presentation layer
//! draws from those.
//!
//! ## Key Modules
//!
//! * `application_state` - Settings, input handling, frame driving
//! * `core` - Shared-ownership primitive used across the engine
//! * `engine_state` - The session and every simulation subsystem
//!
//! ## Usage
//!
//! ```rust
//! use voxel_sandbox::{
//!     application_state::settings::Settings,
//!     engine_state::{scene::NullScene, Session, SessionState},
//! };
//!
//! let mut settings = Settings::default();
//! settings.terrain.radius = 4;
//! let mut session = Session::new(settings, Box::new(NullScene)).unwrap();
//! session.start();
//! session.finish_generation();
//! assert_eq!(session.state(), SessionState::Running);
//! ```

pub mod application_state;
pub mod core;
pub mod engine_state;

use application_state::{
    input_state::PlayerAction,
    settings::{ConfigError, Settings},
    ApplicationState,
};
use engine_state::{events::SessionEvent, scene::LoggingScene, SessionState};
use log::{error, info};
use web_time::Duration;

/// Length of one simulated frame in the headless demo.
const DEMO_FRAME: Duration = Duration::from_millis(16);

/// Runs the headless demo.
///
/// Settings come from the JSON file named by the first command line argument,
/// or the defaults. The world is generated, then a short scripted walk (look
/// down, dig, build, jump, fly) runs with every event logged. Set `RUST_LOG`
/// to see it.
pub fn run() {
    let mut log_builder = env_logger::Builder::new();
    log_builder
        .target(env_logger::Target::Stdout)
        .parse_env("RUST_LOG")
        .init();

    info!("Logger initialized");

    let settings = match std::env::args().nth(1) {
        Some(path) => Settings::load(&path),
        None => Ok(Settings::default()),
    };
    if let Err(e) = settings.and_then(run_demo) {
        error!("{}", e);
    }
}

/// The scripted part of [`run`], usable with any settings.
pub fn run_demo(settings: Settings) -> Result<(), ConfigError> {
    let mut app = ApplicationState::new(settings, Box::new(LoggingScene::default()))?;
    let events = app.session.subscribe();

    let mut loading_ticks = 0;
    while app.session.state() == SessionState::Loading {
        app.step(PlayerAction::default(), DEMO_FRAME);
        loading_ticks += 1;
    }
    info!("World generated in {} ticks", loading_ticks);

    let script = [
        // settle, then look down
        (30, PlayerAction::default()),
        (
            1,
            PlayerAction {
                rotate_view: Some((0.0, 600.0)),
                ..PlayerAction::default()
            },
        ),
        // dig, then build back with the second hotbar slot
        (
            1,
            PlayerAction {
                secondary: true,
                ..PlayerAction::default()
            },
        ),
        (
            1,
            PlayerAction {
                select_slot: Some(1),
                ..PlayerAction::default()
            },
        ),
        (
            1,
            PlayerAction {
                primary: true,
                ..PlayerAction::default()
            },
        ),
        // walk and jump
        (
            40,
            PlayerAction {
                move_forward: true,
                move_up: true,
                ..PlayerAction::default()
            },
        ),
        // take off and climb
        (
            1,
            PlayerAction {
                toggle_mode: true,
                ..PlayerAction::default()
            },
        ),
        (
            30,
            PlayerAction {
                move_up: true,
                move_right: true,
                ..PlayerAction::default()
            },
        ),
    ];

    for (ticks, action) in script {
        for _ in 0..ticks {
            app.step(action, DEMO_FRAME);
        }
        for event in events.try_iter() {
            match event {
                SessionEvent::PositionChanged(_) => {}
                other => info!("{:?}", other),
            }
        }
    }

    let player = app.session.player();
    info!(
        "Demo finished at {:?} in {:?} mode with {} blocks in the world",
        player.position,
        player.mode,
        app.session.world().get().len()
    );
    Ok(())
}
