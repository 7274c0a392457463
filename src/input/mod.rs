//! # Input Module
//!
//! This module buffers asynchronously-arriving input events until the
//! frame loop reads them. Host event listeners write at any time; the
//! simulation consumes exactly one processed snapshot per frame.
//!
//! Discrete button levels are last-state-wins between frames, while mouse
//! movement deltas accumulate between reads, so fast flicks are never
//! dropped by a slow frame.

use std::collections::HashMap;

pub mod state;

use state::{ButtonState, FrameInput, GameButton};

/// Buffers raw input levels and produces per-frame snapshots.
///
/// The manager keeps the previous and current level of every logical
/// button so the snapshot can report press/hold/release transitions.
pub struct InputManager {
    buttons_old: HashMap<GameButton, bool>,
    buttons_new: HashMap<GameButton, bool>,
    mouse_delta: Option<(f64, f64)>,
    hotbar_select: Option<usize>,
}

impl InputManager {
    /// Creates a manager with every button released.
    pub fn new() -> Self {
        let mut buttons_old = HashMap::new();
        let mut buttons_new = HashMap::new();
        for button in GameButton::ALL {
            buttons_old.insert(button, false);
            buttons_new.insert(button, false);
        }

        InputManager {
            buttons_old,
            buttons_new,
            mouse_delta: None,
            hotbar_select: None,
        }
    }

    /// Records a button level change; the latest level before the next
    /// snapshot wins.
    pub fn set_button(&mut self, button: GameButton, pressed: bool) {
        if let Some(level) = self.buttons_new.get_mut(&button) {
            *level = pressed;
        }
    }

    /// Accumulates a mouse movement delta onto whatever is already
    /// buffered.
    pub fn accumulate_mouse_delta(&mut self, delta_x: f64, delta_y: f64) {
        let (x, y) = self.mouse_delta.unwrap_or((0.0, 0.0));
        self.mouse_delta = Some((x + delta_x, y + delta_y));
    }

    /// Records a hotbar slot selection (0-based).
    pub fn select_hotbar(&mut self, slot: usize) {
        self.hotbar_select = Some(slot);
    }

    /// Produces this frame's snapshot and rolls the manager forward.
    ///
    /// Button transitions are derived from the previous snapshot's levels;
    /// the accumulated mouse delta and hotbar selection are handed over
    /// and cleared.
    pub fn take_frame_input(&mut self) -> FrameInput {
        let mut button_states = HashMap::new();
        for (button, &current) in &self.buttons_new {
            let previous = self.buttons_old.get(button).copied().unwrap_or(false);
            button_states.insert(*button, ButtonState::from_raw_states(previous, current));
        }

        for (button, current) in &self.buttons_new {
            if let Some(old) = self.buttons_old.get_mut(button) {
                *old = *current;
            }
        }

        FrameInput {
            button_states,
            mouse_delta: self.mouse_delta.take(),
            hotbar_select: self.hotbar_select.take(),
        }
    }

    /// Releases every button, used when the host window loses focus so no
    /// key sticks.
    pub fn release_all(&mut self) {
        for level in self.buttons_new.values_mut() {
            *level = false;
        }
    }
}

impl Default for InputManager {
    fn default() -> Self {
        Self::new()
    }
}
