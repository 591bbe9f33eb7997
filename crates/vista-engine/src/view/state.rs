use crate::coords::Vec2;
use crate::input::{InputEvent, Key, MouseButton, MouseButtonState, PointerButtonEvent, PointerMoveEvent};

use super::types::{Direction, DirectionKeys, EventPolicy, KeyAction, ViewConfig, ViewUniforms};

/// Pan/zoom state for one window.
///
/// Spaces:
/// - `framebuffer_size` and cursor positions are physical pixels (top-left origin)
/// - `pan_offset` is NDC
/// - `normalized_scale` maps world units to NDC: `ndc = world * normalized_scale + pan_offset`
///
/// Invariant: `normalized_scale[i] == zoom * 2 / framebuffer_size[i]`. Every
/// mutation of `zoom` or `framebuffer_size` goes through `update_scale`.
///
/// Pan updates are exclusive per frame: while the primary button is held the
/// offset follows the cursor and arrow keys are ignored.
#[derive(Debug, Clone)]
pub struct ViewState {
    config: ViewConfig,

    framebuffer_size: Vec2,
    zoom: f32,
    normalized_scale: Vec2,
    pan_offset: Vec2,

    cursor: Option<Vec2>,
    pointer_held: bool,
    held: DirectionKeys,
    last_key_action: KeyAction,
}

impl ViewState {
    /// Creates a view for a framebuffer of `width x height` physical pixels.
    pub fn new(width: f32, height: f32) -> Self {
        Self::with_config(ViewConfig::default(), width, height)
    }

    /// Sizes below one pixel are raised to one so the scale stays finite.
    pub fn with_config(config: ViewConfig, width: f32, height: f32) -> Self {
        debug_assert!(config.min_zoom > 0.0, "min_zoom must be positive");

        let mut view = Self {
            config,
            framebuffer_size: Vec2::new(width.max(1.0), height.max(1.0)),
            zoom: config.initial_zoom.max(config.min_zoom),
            normalized_scale: Vec2::zero(),
            pan_offset: Vec2::zero(),
            cursor: None,
            pointer_held: false,
            held: DirectionKeys::default(),
            last_key_action: KeyAction::Release,
        };
        view.update_scale();
        view
    }

    // ── accessors ─────────────────────────────────────────────────────────

    #[inline]
    pub fn framebuffer_size(&self) -> Vec2 {
        self.framebuffer_size
    }

    #[inline]
    pub fn zoom(&self) -> f32 {
        self.zoom
    }

    #[inline]
    pub fn normalized_scale(&self) -> Vec2 {
        self.normalized_scale
    }

    #[inline]
    pub fn pan_offset(&self) -> Vec2 {
        self.pan_offset
    }

    #[inline]
    pub fn pointer_held(&self) -> bool {
        self.pointer_held
    }

    #[inline]
    pub fn cursor(&self) -> Option<Vec2> {
        self.cursor
    }

    #[inline]
    pub fn held_directions(&self) -> DirectionKeys {
        self.held
    }

    #[inline]
    pub fn last_key_action(&self) -> KeyAction {
        self.last_key_action
    }

    // ── input handlers ────────────────────────────────────────────────────

    /// Applies a new framebuffer size (physical pixels, not logical window size).
    ///
    /// A zero dimension (minimized window) is ignored and the previous size kept.
    pub fn on_resize(&mut self, width: f32, height: f32) {
        if !(width > 0.0 && height > 0.0) {
            log::debug!("ignoring degenerate framebuffer size {width}x{height}");
            return;
        }

        self.framebuffer_size = Vec2::new(width, height);
        self.update_scale();
        log::debug!(
            "view resized to {width}x{height}, normalized scale {:?}",
            self.normalized_scale
        );
    }

    /// Adds a wheel delta (in lines) to the zoom, clamped to `min_zoom`.
    pub fn on_scroll(&mut self, delta_y: f32) {
        if !delta_y.is_finite() {
            return;
        }

        self.zoom = (self.zoom + delta_y).max(self.config.min_zoom);
        self.update_scale();
        log::debug!("zoom {}", self.zoom);
    }

    /// Records a key transition. Arrow keys update the held set; no key moves
    /// the pan offset here, that happens in `advance_frame`.
    pub fn on_key(&mut self, key: Key, action: KeyAction) {
        self.last_key_action = action;

        if let Some(dir) = Direction::from_key(key) {
            self.held.set(dir, action != KeyAction::Release);
        }
    }

    /// Records the cursor position in physical pixels.
    pub fn on_cursor_moved(&mut self, x: f32, y: f32) {
        self.cursor = Some(Vec2::new(x, y));
    }

    /// Tracks the primary button. A press samples the cursor immediately so a
    /// click repositions the shape even without a following move.
    pub fn on_mouse_button(&mut self, button: MouseButton, state: MouseButtonState) {
        if button != MouseButton::Left {
            return;
        }

        match state {
            MouseButtonState::Pressed => {
                self.pointer_held = true;
                self.sample_drag();
            }
            MouseButtonState::Released => self.pointer_held = false,
        }
    }

    /// Drops held keys and the drag so nothing sticks after focus changes.
    /// Counts as a key release for the event policy.
    pub fn on_focus_lost(&mut self) {
        self.held.clear();
        self.pointer_held = false;
        self.last_key_action = KeyAction::Release;
    }

    /// Routes an engine input event to the matching handler.
    pub fn apply_event(&mut self, ev: &InputEvent) {
        match ev {
            InputEvent::Key { key, state, repeat, .. } => {
                self.on_key(*key, KeyAction::from_key_state(*state, *repeat));
            }

            InputEvent::PointerMoved(PointerMoveEvent { x, y }) => self.on_cursor_moved(*x, *y),

            InputEvent::PointerLeft => {
                // Keep the last sample while dragging; the drag holds its position.
                if !self.pointer_held {
                    self.cursor = None;
                }
            }

            InputEvent::PointerButton(PointerButtonEvent { button, state, position, .. }) => {
                if let Some((x, y)) = position {
                    self.on_cursor_moved(*x, *y);
                }
                self.on_mouse_button(*button, *state);
            }

            InputEvent::MouseWheel { delta, .. } => self.on_scroll(delta.lines_y()),

            InputEvent::Focused(false) => self.on_focus_lost(),

            InputEvent::Focused(true) | InputEvent::ModifiersChanged(_) => {}
        }
    }

    // ── per-frame ─────────────────────────────────────────────────────────

    /// Advances the pan offset by one frame.
    ///
    /// Dragging sets the offset from the cursor and skips key movement.
    /// Otherwise each held arrow nudges its axis by `normalized_scale / zoom`
    /// (one physical pixel); opposing keys cancel.
    pub fn advance_frame(&mut self) {
        if self.pointer_held {
            self.sample_drag();
            return;
        }

        if !self.held.any() {
            return;
        }

        self.pan_offset += self.held.axis().mul_elem(self.key_pan_step());
    }

    /// Values for the shader's `size`, `scale` and `location` uniforms.
    #[inline]
    pub fn snapshot(&self) -> ViewUniforms {
        ViewUniforms {
            size: self.framebuffer_size,
            scale: self.zoom,
            location: self.pan_offset,
        }
    }

    /// Block on events after a key release; keep polling otherwise.
    #[inline]
    pub fn event_policy(&self) -> EventPolicy {
        if self.last_key_action == KeyAction::Release {
            EventPolicy::Wait
        } else {
            EventPolicy::Poll
        }
    }

    // ── coordinate conversions ────────────────────────────────────────────

    /// Per-frame NDC displacement produced by one held arrow key.
    #[inline]
    pub fn key_pan_step(&self) -> Vec2 {
        self.normalized_scale / self.zoom
    }

    /// Maps a top-left-origin pixel position into the `[-1, 1]` device box (+Y up).
    pub fn screen_to_ndc(&self, p: Vec2) -> Vec2 {
        Vec2::new(
            p.x * 2.0 / self.framebuffer_size.x - 1.0,
            1.0 - p.y * 2.0 / self.framebuffer_size.y,
        )
    }

    pub fn ndc_to_world(&self, p: Vec2) -> Vec2 {
        (p - self.pan_offset).div_elem(self.normalized_scale)
    }

    pub fn world_to_ndc(&self, p: Vec2) -> Vec2 {
        p.mul_elem(self.normalized_scale) + self.pan_offset
    }

    // ── private helpers ───────────────────────────────────────────────────

    fn update_scale(&mut self) {
        self.normalized_scale = Vec2::new(
            self.zoom * 2.0 / self.framebuffer_size.x,
            self.zoom * 2.0 / self.framebuffer_size.y,
        );
    }

    fn sample_drag(&mut self) {
        let Some(cursor) = self.cursor else { return };
        self.pan_offset = self.screen_to_ndc(cursor);
        log::trace!("drag cursor {:?} -> location {:?}", cursor, self.pan_offset);
    }
}
