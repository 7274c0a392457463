//! # Input State
//!
//! This module defines the processed input types consumed by the frame
//! loop: the logical game buttons, their per-frame state transitions, and
//! the one-per-frame input snapshot.

use std::collections::HashMap;

/// The logical buttons the simulation reacts to.
///
/// The embedding host maps its physical keys onto these; the core never
/// sees key codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GameButton {
    /// Walk along the view direction.
    MoveForward,
    /// Walk against the view direction.
    MoveBackward,
    /// Strafe left.
    MoveLeft,
    /// Strafe right.
    MoveRight,
    /// Jump while grounded.
    Jump,
    /// Switch between first and third person.
    TogglePerspective,
}

impl GameButton {
    /// All logical buttons, used to seed the state maps.
    pub const ALL: [GameButton; 6] = [
        GameButton::MoveForward,
        GameButton::MoveBackward,
        GameButton::MoveLeft,
        GameButton::MoveRight,
        GameButton::Jump,
        GameButton::TogglePerspective,
    ];
}

/// The state of a button across the last frame boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ButtonState {
    /// Button is not pressed.
    #[default]
    NotPressed,
    /// Button was just pressed this frame.
    Pressed,
    /// Button has been held down for multiple frames.
    Held,
    /// Button was just released this frame.
    Released,
}

impl ButtonState {
    /// Whether the button is actively down (pressed or held).
    pub fn is_active(&self) -> bool {
        matches!(self, ButtonState::Pressed | ButtonState::Held)
    }

    /// Whether the button went down this frame.
    pub fn is_just_pressed(&self) -> bool {
        matches!(self, ButtonState::Pressed)
    }

    /// Derives the transition from the previous and current raw levels.
    pub fn from_raw_states(previous: bool, current: bool) -> Self {
        match (previous, current) {
            (false, true) => ButtonState::Pressed,
            (true, true) => ButtonState::Held,
            (true, false) => ButtonState::Released,
            (false, false) => ButtonState::NotPressed,
        }
    }
}

/// One frame's processed input snapshot.
///
/// Produced once per frame by the input manager; key levels are
/// last-state-wins and the mouse delta is everything accumulated since the
/// previous snapshot.
#[derive(Debug, Default)]
pub struct FrameInput {
    /// Transition state of every logical button.
    pub button_states: HashMap<GameButton, ButtonState>,
    /// Accumulated mouse movement since the last frame, if any.
    pub mouse_delta: Option<(f64, f64)>,
    /// Hotbar slot selection made since the last frame, if any.
    pub hotbar_select: Option<usize>,
}

impl FrameInput {
    /// The transition state of a button.
    pub fn button(&self, button: GameButton) -> ButtonState {
        self.button_states.get(&button).copied().unwrap_or_default()
    }
}
