use anyhow::{Context, Result};
use ouroboros::self_referencing;

use winit::application::ApplicationHandler;
use winit::dpi::{LogicalSize, PhysicalSize};
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::window::{Window, WindowId};

use crate::core::{App, AppControl, FrameCtx, WindowCtx};
use crate::device::{Gpu, GpuInit};
use crate::input::platform::winit::translate_window_event;
use crate::input::{InputEvent, InputState, Key, KeyState};
use crate::view::{EventPolicy, ViewConfig, ViewState};

/// Window/runtime configuration.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub title: String,
    pub initial_size: LogicalSize<f64>,
    pub view: ViewConfig,
    /// Close the window when Escape is pressed.
    pub exit_on_escape: bool,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            title: "vista".to_string(),
            initial_size: LogicalSize::new(640.0, 480.0),
            view: ViewConfig::default(),
            exit_on_escape: true,
        }
    }
}

/// Entry point for the runtime.
pub struct Runtime;

impl Runtime {
    /// Opens the window and runs the event loop until exit.
    ///
    /// Returns the first fatal setup error (window, GPU or `App::on_gpu_ready`).
    pub fn run<A>(config: RuntimeConfig, gpu_init: GpuInit, app: A) -> Result<()>
    where
        A: 'static + App,
    {
        let event_loop = EventLoop::new().context("failed to create winit EventLoop")?;
        let mut state = AppState::new(config, gpu_init, app);

        event_loop
            .run_app(&mut state)
            .context("winit event loop terminated with error")?;

        match state.fatal.take() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

#[self_referencing]
struct WindowEntry {
    input_state: InputState,
    view: ViewState,

    window: Window,

    #[borrows(window)]
    #[covariant]
    gpu: Gpu<'this>,
}

struct AppState<A>
where
    A: App + 'static,
{
    config: RuntimeConfig,
    gpu_init: GpuInit,
    app: A,

    window: Option<WindowEntry>,
    exit_requested: bool,
    fatal: Option<anyhow::Error>,
}

impl<A> AppState<A>
where
    A: App + 'static,
{
    fn new(config: RuntimeConfig, gpu_init: GpuInit, app: A) -> Self {
        Self {
            config,
            gpu_init,
            app,
            window: None,
            exit_requested: false,
            fatal: None,
        }
    }

    fn request_exit(&mut self, event_loop: &ActiveEventLoop) {
        self.exit_requested = true;
        event_loop.exit();
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, err: anyhow::Error) {
        log::error!("{err:#}");
        self.fatal.get_or_insert(err);
        self.request_exit(event_loop);
    }

    fn create_window_entry(&mut self, event_loop: &ActiveEventLoop) -> Result<()> {
        let attrs = Window::default_attributes()
            .with_title(self.config.title.clone())
            .with_inner_size(self.config.initial_size);

        let window = event_loop
            .create_window(attrs)
            .context("failed to create window")?;

        // The view works in framebuffer pixels, not logical window size.
        let size = window.inner_size();
        let view = ViewState::with_config(self.config.view, size.width as f32, size.height as f32);
        log::info!(
            "window {}x{} px (scale factor {})",
            size.width,
            size.height,
            window.scale_factor()
        );

        let gpu_init = self.gpu_init.clone();
        let entry = WindowEntryTryBuilder {
            input_state: InputState::default(),
            view,
            window,
            gpu_builder: |w| pollster::block_on(Gpu::new(w, gpu_init)),
        }
        .try_build()
        .context("GPU initialization failed")?;

        let app = &mut self.app;
        entry
            .with_gpu(|gpu| app.on_gpu_ready(gpu))
            .context("application setup failed")?;

        self.window = Some(entry);
        Ok(())
    }

    fn redraw(&mut self, event_loop: &ActiveEventLoop) {
        let (app, window) = (&mut self.app, &mut self.window);
        let Some(entry) = window.as_mut() else { return };

        let mut control = AppControl::Continue;

        entry.with_mut(|fields| {
            // Events for this iteration are already applied; step the view, then read it.
            fields.view.advance_frame();

            let mut ctx = FrameCtx {
                window: WindowCtx {
                    id: fields.window.id(),
                    window: fields.window,
                },
                gpu: &mut *fields.gpu,
                view: &*fields.view,
            };

            control = app.on_frame(&mut ctx);
        });

        if control == AppControl::Exit {
            self.request_exit(event_loop);
        }
    }
}

impl<A> ApplicationHandler for AppState<A>
where
    A: App + 'static,
{
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        if let Err(e) = self.create_window_entry(event_loop) {
            self.fail(event_loop, e);
            return;
        }

        if let Some(entry) = self.window.as_ref() {
            entry.with_window(|w| w.request_redraw());
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        if self.exit_requested {
            event_loop.exit();
            return;
        }

        let Some(entry) = self.window.as_ref() else { return };

        match entry.with_view(|v| v.event_policy()) {
            EventPolicy::Poll => {
                event_loop.set_control_flow(ControlFlow::Poll);
                entry.with_window(|w| w.request_redraw());
            }
            // Input events request their own redraw.
            EventPolicy::Wait => event_loop.set_control_flow(ControlFlow::Wait),
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        window_id: WindowId,
        event: WindowEvent,
    ) {
        if self.exit_requested {
            event_loop.exit();
            return;
        }

        let exit_on_escape = self.config.exit_on_escape;
        let (app, window) = (&mut self.app, &mut self.window);

        let Some(entry) = window.as_mut() else { return };
        if entry.with_window(|w| w.id()) != window_id {
            return;
        }

        let mut exit = false;

        entry.with_mut(|fields| {
            if let Some(ev) = translate_window_event(&*fields.input_state, &event) {
                fields.input_state.apply_event(&ev);
                fields.view.apply_event(&ev);

                if exit_on_escape && is_escape_press(&ev) {
                    log::info!("escape pressed");
                    exit = true;
                }

                fields.window.request_redraw();
            }

            if app.on_window_event(&event) == AppControl::Exit {
                exit = true;
            }

            // A scale factor change is followed by `Resized` with the new physical size.
            if let WindowEvent::Resized(new_size) = &event {
                apply_resize(&mut *fields.gpu, &mut *fields.view, *new_size);
                fields.window.request_redraw();
            }
        });

        if exit {
            self.request_exit(event_loop);
            return;
        }

        match event {
            WindowEvent::CloseRequested => {
                log::info!("close requested");
                self.request_exit(event_loop);
            }

            WindowEvent::RedrawRequested => self.redraw(event_loop),

            _ => {}
        }
    }

    fn exiting(&mut self, _event_loop: &ActiveEventLoop) {
        // Release GPU resources while the window still exists.
        self.window = None;
    }
}

fn apply_resize(gpu: &mut Gpu<'_>, view: &mut ViewState, size: PhysicalSize<u32>) {
    gpu.resize(size);
    view.on_resize(size.width as f32, size.height as f32);
}

fn is_escape_press(ev: &InputEvent) -> bool {
    matches!(
        ev,
        InputEvent::Key {
            key: Key::Escape,
            state: KeyState::Pressed,
            ..
        }
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::Modifiers;

    fn key(key: Key, state: KeyState) -> InputEvent {
        InputEvent::Key { key, state, modifiers: Modifiers::default(), code: 0, repeat: false }
    }

    #[test]
    fn only_escape_press_requests_exit() {
        assert!(is_escape_press(&key(Key::Escape, KeyState::Pressed)));
        assert!(!is_escape_press(&key(Key::Escape, KeyState::Released)));
        assert!(!is_escape_press(&key(Key::ArrowUp, KeyState::Pressed)));
    }

    #[test]
    fn default_config_matches_demo_window() {
        let config = RuntimeConfig::default();
        assert_eq!(config.initial_size, LogicalSize::new(640.0, 480.0));
        assert_eq!(config.view.initial_zoom, 100.0);
        assert!(config.exit_on_escape);
    }
}
