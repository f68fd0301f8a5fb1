//! # Input State
//!
//! This module defines the input state types used by the input manager:
//! per-key transition states, the per-tick snapshot built from them, and the
//! `PlayerAction` the simulation consumes.

use std::collections::HashMap;
use winit::{event::MouseButton, keyboard::KeyCode};

/// Represents the state of a key or button.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RawInputState {
    /// Key/button is not pressed
    #[default]
    NotPressed,
    /// Key/button was just pressed this tick
    Pressed,
    /// Key/button has been held down for multiple ticks
    Held,
    /// Key/button was just released this tick
    Released,
}

impl RawInputState {
    /// Determines if the input is actively down (either pressed or held)
    pub fn is_active(&self) -> bool {
        matches!(self, RawInputState::Pressed | RawInputState::Held)
    }

    /// Determines if the input was just pressed this tick
    pub fn is_just_pressed(&self) -> bool {
        matches!(self, RawInputState::Pressed)
    }

    /// Determines if the input was just released this tick
    pub fn is_just_released(&self) -> bool {
        matches!(self, RawInputState::Released)
    }

    /// Derives the transition from the previous and current raw states
    pub fn from_raw_states(previous: bool, current: bool) -> Self {
        match (previous, current) {
            (false, true) => RawInputState::Pressed,
            (true, true) => RawInputState::Held,
            (true, false) => RawInputState::Released,
            (false, false) => RawInputState::NotPressed,
        }
    }
}

/// A snapshot of the processed input states with state transitions.
#[derive(Debug, Default)]
pub struct ProcessedInputState {
    /// Current state of all tracked keyboard keys
    pub keyboard_states: HashMap<KeyCode, RawInputState>,

    /// Current state of mouse buttons
    pub mouse_button_states: HashMap<MouseButton, RawInputState>,

    /// Pointer movement accumulated since the last tick (x, y)
    pub mouse_delta: Option<(f64, f64)>,
}

impl ProcessedInputState {
    /// Gets the state of a keyboard key
    pub fn get_key_state(&self, key: KeyCode) -> RawInputState {
        self.keyboard_states.get(&key).copied().unwrap_or_default()
    }

    /// Gets the state of a mouse button
    pub fn get_mouse_button_state(&self, button: MouseButton) -> RawInputState {
        self.mouse_button_states
            .get(&button)
            .copied()
            .unwrap_or_default()
    }

    /// Gets the pointer movement since the last tick
    pub fn get_mouse_delta(&self) -> Option<(f64, f64)> {
        self.mouse_delta
    }
}

/// Tracks the state of mouse inputs: buttons and movement.
#[derive(Debug, Default)]
pub struct MouseInput {
    /// Previous state of each mouse button (pressed/released)
    pub mouse_button_inputs_old: HashMap<MouseButton, bool>,
    /// Current state of each mouse button (pressed/released)
    pub mouse_button_inputs_new: HashMap<MouseButton, bool>,

    /// Pointer movement accumulated since the last tick (x, y)
    pub mouse_delta: Option<(f64, f64)>,
}

/// What the player asked for during one tick.
///
/// Movement flags are level-triggered (true for as long as the key is held).
/// `toggle_mode`, `primary`, `secondary` and `select_slot` are edge-triggered:
/// they fire only on the tick the key or button went down.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PlayerAction {
    /// Move along the view direction
    pub move_forward: bool,
    /// Move against the view direction
    pub move_backward: bool,
    /// Strafe left
    pub move_left: bool,
    /// Strafe right
    pub move_right: bool,
    /// Jump (Walk) or ascend (Fly)
    pub move_up: bool,
    /// Descend (Fly only)
    pub move_down: bool,
    /// Switch between Walk and Fly
    pub toggle_mode: bool,
    /// Place the selected block
    pub primary: bool,
    /// Remove the targeted block
    pub secondary: bool,
    /// Select a hotbar slot (0-based)
    pub select_slot: Option<usize>,
    /// Pointer movement (x, y) to turn the view by
    pub rotate_view: Option<(f64, f64)>,
}
