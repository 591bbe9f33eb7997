use super::types::{InputEvent, Modifiers, PointerButtonEvent, PointerMoveEvent};

/// Platform bookkeeping for a single window.
///
/// winit reports modifiers and the cursor position as separate events; this
/// keeps the latest of each so later events can carry them.
#[derive(Debug, Default)]
pub struct InputState {
    pub modifiers: Modifiers,
    /// Physical pixels. `None` until the pointer enters, and after it leaves.
    pub pointer_pos: Option<(f32, f32)>,
}

impl InputState {
    pub fn apply_event(&mut self, ev: &InputEvent) {
        match ev {
            InputEvent::ModifiersChanged(m) => self.modifiers = *m,

            InputEvent::PointerMoved(PointerMoveEvent { x, y }) => {
                self.pointer_pos = Some((*x, *y));
            }

            InputEvent::PointerLeft => self.pointer_pos = None,

            InputEvent::Key { modifiers, .. }
            | InputEvent::MouseWheel { modifiers, .. }
            | InputEvent::PointerButton(PointerButtonEvent { modifiers, .. }) => {
                self.modifiers = *modifiers;
            }

            InputEvent::Focused(_) => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tracks_pointer_until_it_leaves() {
        let mut state = InputState::default();
        assert_eq!(state.pointer_pos, None);

        state.apply_event(&InputEvent::PointerMoved(PointerMoveEvent { x: 3.0, y: 4.0 }));
        assert_eq!(state.pointer_pos, Some((3.0, 4.0)));

        state.apply_event(&InputEvent::PointerLeft);
        assert_eq!(state.pointer_pos, None);
    }

    #[test]
    fn modifiers_follow_latest_event() {
        let mut state = InputState::default();
        let shift = Modifiers { shift: true, ..Modifiers::default() };

        state.apply_event(&InputEvent::ModifiersChanged(shift));
        assert!(state.modifiers.shift);

        state.apply_event(&InputEvent::MouseWheel {
            delta: crate::input::MouseWheelDelta::Line { x: 0.0, y: 1.0 },
            modifiers: Modifiers::default(),
        });
        assert_eq!(state.modifiers, Modifiers::default());
    }
}
