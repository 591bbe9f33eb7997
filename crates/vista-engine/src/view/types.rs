use crate::coords::Vec2;
use crate::input::{Key, KeyState};

/// Tunables for a `ViewState`.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ViewConfig {
    /// World-to-device magnification at startup.
    pub initial_zoom: f32,

    /// Lower bound applied after every scroll. Must be positive.
    pub min_zoom: f32,
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            initial_zoom: 100.0,
            min_zoom: 1.0,
        }
    }
}

/// Last observed key transition.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum KeyAction {
    Press,
    Release,
    Repeat,
}

impl KeyAction {
    /// Folds the engine's `(state, repeat)` pair into a single action.
    #[inline]
    pub fn from_key_state(state: KeyState, repeat: bool) -> Self {
        match (state, repeat) {
            (KeyState::Released, _) => KeyAction::Release,
            (KeyState::Pressed, true) => KeyAction::Repeat,
            (KeyState::Pressed, false) => KeyAction::Press,
        }
    }
}

/// How the frame loop should wait for the next batch of events.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum EventPolicy {
    /// Block until an input event arrives.
    Wait,
    /// Drain pending events and redraw continuously.
    Poll,
}

/// Arrow-key pan directions.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Direction {
    Left,
    Right,
    Up,
    Down,
}

impl Direction {
    pub fn from_key(key: Key) -> Option<Self> {
        match key {
            Key::ArrowLeft => Some(Direction::Left),
            Key::ArrowRight => Some(Direction::Right),
            Key::ArrowUp => Some(Direction::Up),
            Key::ArrowDown => Some(Direction::Down),
            _ => None,
        }
    }
}

/// Set of currently held arrow keys.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub struct DirectionKeys {
    pub left: bool,
    pub right: bool,
    pub up: bool,
    pub down: bool,
}

impl DirectionKeys {
    pub fn set(&mut self, dir: Direction, held: bool) {
        match dir {
            Direction::Left => self.left = held,
            Direction::Right => self.right = held,
            Direction::Up => self.up = held,
            Direction::Down => self.down = held,
        }
    }

    #[inline]
    pub fn any(&self) -> bool {
        self.left || self.right || self.up || self.down
    }

    /// Per-axis sign in NDC orientation (+Y up). Opposing keys cancel to 0.
    pub fn axis(&self) -> Vec2 {
        Vec2::new(
            sign(self.right) - sign(self.left),
            sign(self.up) - sign(self.down),
        )
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

#[inline]
fn sign(held: bool) -> f32 {
    if held { 1.0 } else { 0.0 }
}

/// Values pushed to the shape shader each frame.
///
/// Field names match the uniform block: `size`, `scale`, `location`.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ViewUniforms {
    /// Framebuffer size in physical pixels.
    pub size: Vec2,
    /// Zoom factor (world units to device pixels).
    pub scale: f32,
    /// Pan offset in NDC.
    pub location: Vec2,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_action_folds_repeat_flag() {
        assert_eq!(KeyAction::from_key_state(KeyState::Pressed, false), KeyAction::Press);
        assert_eq!(KeyAction::from_key_state(KeyState::Pressed, true), KeyAction::Repeat);
        assert_eq!(KeyAction::from_key_state(KeyState::Released, true), KeyAction::Release);
    }

    #[test]
    fn opposing_directions_cancel() {
        let mut keys = DirectionKeys::default();
        keys.set(Direction::Left, true);
        keys.set(Direction::Right, true);
        keys.set(Direction::Up, true);
        assert_eq!(keys.axis(), Vec2::new(0.0, 1.0));
    }

    #[test]
    fn only_arrows_map_to_directions() {
        assert_eq!(Direction::from_key(Key::ArrowDown), Some(Direction::Down));
        assert_eq!(Direction::from_key(Key::Escape), None);
    }
}
