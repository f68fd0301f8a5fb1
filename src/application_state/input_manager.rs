//! # Input Manager
//!
//! This module handles input processing for the application, including:
//! - Keyboard input state tracking
//! - Mouse button and pointer motion tracking
//! - Translation of the per-tick snapshot into a `PlayerAction`

use std::collections::HashMap;

use winit::{
    event::{ElementState, KeyEvent, MouseButton, WindowEvent},
    keyboard::{KeyCode, PhysicalKey},
};

use super::input_state::{MouseInput, PlayerAction, ProcessedInputState, RawInputState};

const KEY_CODES: [KeyCode; 16] = [
    KeyCode::KeyW,
    KeyCode::KeyS,
    KeyCode::KeyA,
    KeyCode::KeyD,
    KeyCode::Space,
    KeyCode::ShiftLeft,
    KeyCode::KeyF,
    KeyCode::Digit1,
    KeyCode::Digit2,
    KeyCode::Digit3,
    KeyCode::Digit4,
    KeyCode::Digit5,
    KeyCode::Digit6,
    KeyCode::Digit7,
    KeyCode::Digit8,
    KeyCode::Digit9,
];

/// Hotbar keys, slot 0 first.
const SLOT_KEYS: [KeyCode; 9] = [
    KeyCode::Digit1,
    KeyCode::Digit2,
    KeyCode::Digit3,
    KeyCode::Digit4,
    KeyCode::Digit5,
    KeyCode::Digit6,
    KeyCode::Digit7,
    KeyCode::Digit8,
    KeyCode::Digit9,
];

const MOUSE_BUTTONS: [MouseButton; 2] = [MouseButton::Left, MouseButton::Right];

/// Manages the state of all input devices and processes input events.
///
/// Events may arrive any number of times between ticks. Key and button states
/// keep the latest value; pointer motion is summed until the next tick reads it.
pub struct InputManager {
    /// Previous state of all tracked keyboard keys
    pub keyboard_inputs_old: HashMap<KeyCode, bool>,
    /// Current state of all tracked keyboard keys
    pub keyboard_inputs_new: HashMap<KeyCode, bool>,

    /// Current state of mouse inputs
    pub mouse_inputs: MouseInput,
}

impl Default for InputManager {
    fn default() -> Self {
        Self::new()
    }
}

impl InputManager {
    /// Creates a new InputManager with every tracked key and button released.
    pub fn new() -> Self {
        let keyboard_inputs_old: HashMap<KeyCode, bool> =
            KEY_CODES.iter().map(|&key| (key, false)).collect();
        let keyboard_inputs_new = keyboard_inputs_old.clone();

        let mouse_button_inputs_old: HashMap<MouseButton, bool> =
            MOUSE_BUTTONS.iter().map(|&button| (button, false)).collect();
        let mouse_button_inputs_new = mouse_button_inputs_old.clone();

        Self {
            keyboard_inputs_old,
            keyboard_inputs_new,
            mouse_inputs: MouseInput {
                mouse_button_inputs_old,
                mouse_button_inputs_new,
                mouse_delta: None,
            },
        }
    }

    /// Updates the old state with the current state to prepare for the next tick.
    pub fn move_old_states(&mut self) {
        for (key, new_state) in self.keyboard_inputs_new.iter() {
            if let Some(old_state) = self.keyboard_inputs_old.get_mut(key) {
                *old_state = *new_state;
            }
        }

        for (button, new_state) in self.mouse_inputs.mouse_button_inputs_new.iter() {
            if let Some(old_state) = self.mouse_inputs.mouse_button_inputs_old.get_mut(button) {
                *old_state = *new_state;
            }
        }
    }

    /// Processes a window event and updates internal input state.
    pub fn intake_input(&mut self, event: &WindowEvent) {
        match event {
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        state,
                        physical_key: PhysicalKey::Code(key),
                        ..
                    },
                ..
            } => self.set_key_state(*key, *state == ElementState::Pressed),
            WindowEvent::MouseInput { button, state, .. } => {
                self.set_button_state(*button, *state == ElementState::Pressed)
            }
            WindowEvent::Focused(false) => self.release_all(),
            _ => {}
        }
    }

    /// Records the current state of a key. Untracked keys are ignored.
    pub fn set_key_state(&mut self, key: KeyCode, pressed: bool) {
        if let Some(key_state) = self.keyboard_inputs_new.get_mut(&key) {
            *key_state = pressed;
        }
    }

    /// Records the current state of a mouse button. Untracked buttons are ignored.
    pub fn set_button_state(&mut self, button: MouseButton, pressed: bool) {
        if let Some(button_state) = self.mouse_inputs.mouse_button_inputs_new.get_mut(&button) {
            *button_state = pressed;
        }
    }

    /// Adds pointer movement to the delta accumulated since the last tick.
    pub fn intake_mouse_motion(&mut self, delta: (f64, f64)) {
        let (x, y) = self.mouse_inputs.mouse_delta.unwrap_or((0.0, 0.0));
        self.mouse_inputs.mouse_delta = Some((x + delta.0, y + delta.1));
    }

    /// Builds the transition snapshot from the old and new raw states.
    pub fn create_processed_input_state(&self) -> ProcessedInputState {
        let keyboard_states = self
            .keyboard_inputs_new
            .iter()
            .map(|(key, &new_state)| {
                let old_state = self.keyboard_inputs_old.get(key).copied().unwrap_or(false);
                (*key, RawInputState::from_raw_states(old_state, new_state))
            })
            .collect();

        let mouse_button_states = self
            .mouse_inputs
            .mouse_button_inputs_new
            .iter()
            .map(|(button, &new_state)| {
                let old_state = self
                    .mouse_inputs
                    .mouse_button_inputs_old
                    .get(button)
                    .copied()
                    .unwrap_or(false);
                (*button, RawInputState::from_raw_states(old_state, new_state))
            })
            .collect();

        ProcessedInputState {
            keyboard_states,
            mouse_button_states,
            mouse_delta: self.mouse_inputs.mouse_delta,
        }
    }

    /// Returns this tick's snapshot and resets for the next tick.
    pub fn get_and_reset_processed_input(&mut self) -> ProcessedInputState {
        let processed_input = self.create_processed_input_state();
        self.reset_inputs();
        processed_input
    }

    /// Returns this tick's `PlayerAction` and resets for the next tick.
    pub fn get_and_reset_player_action(&mut self) -> PlayerAction {
        translate_processed_input(&self.get_and_reset_processed_input())
    }

    /// Moves current states to old ones and forgets accumulated motion.
    pub fn reset_inputs(&mut self) {
        self.move_old_states();
        self.mouse_inputs.mouse_delta = None;
    }

    /// Releases every key and button, e.g. when the window loses focus.
    pub fn release_all(&mut self) {
        self.keyboard_inputs_new.values_mut().for_each(|s| *s = false);
        self.mouse_inputs
            .mouse_button_inputs_new
            .values_mut()
            .for_each(|s| *s = false);
        self.mouse_inputs.mouse_delta = None;
    }
}

/// Maps a processed input snapshot to player actions.
///
/// WASD moves, Space is jump/ascend, left Shift descends, F toggles Walk/Fly,
/// digits select hotbar slots, the left button places and the right removes.
pub fn translate_processed_input(input: &ProcessedInputState) -> PlayerAction {
    PlayerAction {
        move_forward: input.get_key_state(KeyCode::KeyW).is_active(),
        move_backward: input.get_key_state(KeyCode::KeyS).is_active(),
        move_left: input.get_key_state(KeyCode::KeyA).is_active(),
        move_right: input.get_key_state(KeyCode::KeyD).is_active(),
        move_up: input.get_key_state(KeyCode::Space).is_active(),
        move_down: input.get_key_state(KeyCode::ShiftLeft).is_active(),
        toggle_mode: input.get_key_state(KeyCode::KeyF).is_just_pressed(),
        primary: input
            .get_mouse_button_state(MouseButton::Left)
            .is_just_pressed(),
        secondary: input
            .get_mouse_button_state(MouseButton::Right)
            .is_just_pressed(),
        select_slot: SLOT_KEYS
            .iter()
            .position(|&key| input.get_key_state(key).is_just_pressed()),
        rotate_view: input.get_mouse_delta(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transitions_follow_raw_states() {
        assert_eq!(RawInputState::from_raw_states(false, true), RawInputState::Pressed);
        assert_eq!(RawInputState::from_raw_states(true, true), RawInputState::Held);
        assert_eq!(RawInputState::from_raw_states(true, false), RawInputState::Released);
        assert_eq!(RawInputState::from_raw_states(false, false), RawInputState::NotPressed);
    }

    #[test]
    fn movement_is_level_triggered_and_toggle_is_edge_triggered() {
        let mut manager = InputManager::new();
        manager.set_key_state(KeyCode::KeyW, true);
        manager.set_key_state(KeyCode::KeyF, true);

        let first = manager.get_and_reset_player_action();
        assert!(first.move_forward);
        assert!(first.toggle_mode);

        let second = manager.get_and_reset_player_action();
        assert!(second.move_forward);
        assert!(!second.toggle_mode);

        manager.set_key_state(KeyCode::KeyW, false);
        let third = manager.get_and_reset_player_action();
        assert!(!third.move_forward);
    }

    #[test]
    fn pointer_motion_accumulates_until_read() {
        let mut manager = InputManager::new();
        manager.intake_mouse_motion((3.0, -1.0));
        manager.intake_mouse_motion((2.0, 4.0));
        assert_eq!(manager.get_and_reset_player_action().rotate_view, Some((5.0, 3.0)));
        assert_eq!(manager.get_and_reset_player_action().rotate_view, None);
    }

    #[test]
    fn digits_select_slots_and_buttons_edit() {
        let mut manager = InputManager::new();
        manager.set_key_state(KeyCode::Digit3, true);
        manager.set_button_state(MouseButton::Right, true);
        let action = manager.get_and_reset_player_action();
        assert_eq!(action.select_slot, Some(2));
        assert!(action.secondary);
        assert!(!action.primary);

        let held = manager.get_and_reset_player_action();
        assert_eq!(held.select_slot, None);
        assert!(!held.secondary);
    }

    #[test]
    fn release_all_clears_held_keys() {
        let mut manager = InputManager::new();
        manager.set_key_state(KeyCode::KeyA, true);
        manager.get_and_reset_player_action();
        manager.release_all();
        let action = manager.get_and_reset_player_action();
        assert!(!action.move_left);
    }
}
