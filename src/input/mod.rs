//! Input boundary between the host and the render thread.
//!
//! A host thread publishes raw device state as it arrives; the render
//! thread polls one [`InputSnapshot`] per tick. Rising edges (mouse click,
//! button press) are latched until the next poll so a press shorter than a
//! frame is never lost, and cleared by that poll so it is reported once.
//!
//! All state sits behind one `parking_lot::Mutex`, so a poll always sees a
//! consistent set of values.

use std::sync::Arc;

use parking_lot::Mutex;

/// Number of console buttons.
pub const NUM_BUTTONS: u8 = 8;

/// Console button ids.
pub mod button {
    pub const LEFT: u8 = 0;
    pub const RIGHT: u8 = 1;
    pub const UP: u8 = 2;
    pub const DOWN: u8 = 3;
    pub const O: u8 = 4;
    pub const X: u8 = 5;
    pub const START: u8 = 6;
    pub const SELECT: u8 = 7;
}

/// Input as seen by one tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InputSnapshot {
    pub mouse_x: i32,
    pub mouse_y: i32,
    /// Mouse button currently held.
    pub mouse_down: bool,
    /// Mouse button went down since the previous poll.
    pub mouse_clicked: bool,
    buttons: u8,
    buttons_pressed: u8,
}

impl InputSnapshot {
    pub fn mouse_position(&self) -> (i32, i32) {
        (self.mouse_x, self.mouse_y)
    }

    /// Button held this tick.
    pub fn btn(&self, id: u8) -> bool {
        id < NUM_BUTTONS && self.buttons & (1 << id) != 0
    }

    /// Button went down since the previous poll.
    pub fn btnp(&self, id: u8) -> bool {
        id < NUM_BUTTONS && self.buttons_pressed & (1 << id) != 0
    }
}

/// Shared, cloneable handle to the published input state.
#[derive(Debug, Clone, Default)]
pub struct InputState {
    shared: Arc<Mutex<InputSnapshot>>,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Host side: report the mouse position and button.
    pub fn publish_mouse(&self, x: i32, y: i32, down: bool) {
        let mut s = self.shared.lock();
        if down && !s.mouse_down {
            s.mouse_clicked = true;
        }
        s.mouse_x = x;
        s.mouse_y = y;
        s.mouse_down = down;
    }

    /// Host side: report one console button. Unknown ids are ignored.
    pub fn publish_button(&self, id: u8, down: bool) {
        if id >= NUM_BUTTONS {
            log::warn!("Ignoring unknown button id {}", id);
            return;
        }
        let bit = 1u8 << id;
        let mut s = self.shared.lock();
        if down {
            if s.buttons & bit == 0 {
                s.buttons_pressed |= bit;
            }
            s.buttons |= bit;
        } else {
            s.buttons &= !bit;
        }
    }

    /// Render side: take this tick's snapshot and clear the latched edges.
    pub fn poll(&self) -> InputSnapshot {
        let mut s = self.shared.lock();
        let snapshot = *s;
        s.mouse_clicked = false;
        s.buttons_pressed = 0;
        snapshot
    }
}
