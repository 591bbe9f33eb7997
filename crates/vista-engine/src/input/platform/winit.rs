use winit::dpi::PhysicalPosition;
use winit::event::{ElementState, MouseButton as WinitMouseButton, MouseScrollDelta, WindowEvent};
use winit::keyboard::{KeyCode, ModifiersState, PhysicalKey};

use crate::input::{
    InputEvent, InputState, Key, KeyState, Modifiers, MouseButton, MouseButtonState,
    MouseWheelDelta, PointerButtonEvent, PointerMoveEvent,
};

/// Translates a winit `WindowEvent` into an engine `InputEvent`.
///
/// Positions stay in physical pixels. Returns `None` for events the input
/// subsystem does not model.
pub(crate) fn translate_window_event(state: &InputState, event: &WindowEvent) -> Option<InputEvent> {
    match event {
        WindowEvent::ModifiersChanged(m) => Some(InputEvent::ModifiersChanged(map_modifiers(m.state()))),

        WindowEvent::Focused(f) => Some(InputEvent::Focused(*f)),

        WindowEvent::CursorLeft { .. } => Some(InputEvent::PointerLeft),

        WindowEvent::CursorMoved { position, .. } => {
            let (x, y) = to_f32(*position);
            Some(InputEvent::PointerMoved(PointerMoveEvent { x, y }))
        }

        WindowEvent::MouseInput { state: st, button, .. } => {
            let st = match st {
                ElementState::Pressed => MouseButtonState::Pressed,
                ElementState::Released => MouseButtonState::Released,
            };

            // winit 0.30 has no cursor query; use the tracked position.
            Some(InputEvent::PointerButton(PointerButtonEvent {
                button: map_mouse_button(*button),
                state: st,
                position: state.pointer_pos,
                modifiers: state.modifiers,
            }))
        }

        WindowEvent::MouseWheel { delta, .. } => {
            let delta = match delta {
                MouseScrollDelta::LineDelta(x, y) => MouseWheelDelta::Line { x: *x, y: *y },
                MouseScrollDelta::PixelDelta(p) => {
                    let (x, y) = to_f32(*p);
                    MouseWheelDelta::Pixel { x, y }
                }
            };
            Some(InputEvent::MouseWheel { delta, modifiers: state.modifiers })
        }

        WindowEvent::KeyboardInput { event, .. } => {
            let st = match event.state {
                ElementState::Pressed => KeyState::Pressed,
                ElementState::Released => KeyState::Released,
            };

            let (key, code) = map_key(event.physical_key);

            Some(InputEvent::Key {
                key,
                state: st,
                modifiers: state.modifiers,
                code,
                repeat: event.repeat,
            })
        }

        _ => None,
    }
}

fn to_f32(pos: PhysicalPosition<f64>) -> (f32, f32) {
    (pos.x as f32, pos.y as f32)
}

fn map_modifiers(m: ModifiersState) -> Modifiers {
    Modifiers {
        shift: m.shift_key(),
        ctrl: m.control_key(),
        alt: m.alt_key(),
        meta: m.super_key(),
    }
}

fn map_mouse_button(b: WinitMouseButton) -> MouseButton {
    match b {
        WinitMouseButton::Left => MouseButton::Left,
        WinitMouseButton::Right => MouseButton::Right,
        WinitMouseButton::Middle => MouseButton::Middle,
        WinitMouseButton::Back => MouseButton::Back,
        WinitMouseButton::Forward => MouseButton::Forward,
        WinitMouseButton::Other(v) => MouseButton::Other(v),
    }
}

fn map_key(pk: PhysicalKey) -> (Key, u32) {
    match pk {
        PhysicalKey::Code(code) => {
            let key = match code {
                KeyCode::Escape => Key::Escape,
                KeyCode::Enter => Key::Enter,
                KeyCode::Space => Key::Space,

                KeyCode::ArrowUp => Key::ArrowUp,
                KeyCode::ArrowDown => Key::ArrowDown,
                KeyCode::ArrowLeft => Key::ArrowLeft,
                KeyCode::ArrowRight => Key::ArrowRight,

                KeyCode::ShiftLeft | KeyCode::ShiftRight => Key::Shift,
                KeyCode::ControlLeft | KeyCode::ControlRight => Key::Control,
                KeyCode::AltLeft | KeyCode::AltRight => Key::Alt,
                KeyCode::SuperLeft | KeyCode::SuperRight => Key::Meta,

                other => Key::Unknown(other as u32),
            };

            (key, code as u32)
        }

        // NativeKeyCode has no stable numeric form in winit 0.30.
        PhysicalKey::Unidentified(_) => (Key::Unknown(0), 0),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use winit::event::DeviceId;

    use crate::view::ViewState;

    fn device() -> DeviceId {
        // SAFETY: only compared, never passed back to the platform.
        unsafe { DeviceId::dummy() }
    }

    fn left_press() -> WindowEvent {
        WindowEvent::MouseInput {
            device_id: device(),
            state: ElementState::Pressed,
            button: WinitMouseButton::Left,
        }
    }

    /// Runs `events` through translation, input state and view, like the runtime does.
    fn feed(input: &mut InputState, view: &mut ViewState, events: &[WindowEvent]) {
        for event in events {
            if let Some(ev) = translate_window_event(input, event) {
                input.apply_event(&ev);
                view.apply_event(&ev);
            }
        }
    }

    #[test]
    fn press_before_any_cursor_move_has_no_position() {
        let input = InputState::default();

        match translate_window_event(&input, &left_press()) {
            Some(InputEvent::PointerButton(ev)) => assert_eq!(ev.position, None),
            other => panic!("unexpected translation: {other:?}"),
        }
    }

    #[test]
    fn press_before_any_cursor_move_keeps_pan() {
        let mut input = InputState::default();
        let mut view = ViewState::new(640.0, 480.0);

        feed(&mut input, &mut view, &[left_press()]);
        view.advance_frame();

        assert!(view.pointer_held());
        assert_eq!(view.pan_offset(), crate::coords::Vec2::zero());
    }

    #[test]
    fn press_after_cursor_move_drags_to_cursor() {
        let mut input = InputState::default();
        let mut view = ViewState::new(640.0, 480.0);

        let moved = WindowEvent::CursorMoved {
            device_id: device(),
            position: PhysicalPosition::new(480.0, 120.0),
        };
        feed(&mut input, &mut view, &[moved, left_press()]);
        view.advance_frame();

        assert_eq!(view.pan_offset(), crate::coords::Vec2::new(0.5, 0.5));
    }

    #[test]
    fn pixel_scroll_reaches_view_in_lines() {
        let mut input = InputState::default();
        let mut view = ViewState::new(640.0, 480.0);

        let wheel = WindowEvent::MouseWheel {
            device_id: device(),
            delta: MouseScrollDelta::PixelDelta(PhysicalPosition::new(0.0, 40.0)),
            phase: winit::event::TouchPhase::Moved,
        };
        feed(&mut input, &mut view, &[wheel]);

        assert_eq!(view.zoom(), 102.0);
    }
}
