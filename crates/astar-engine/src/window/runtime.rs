use anyhow::{Context, Result};
use ouroboros::self_referencing;
use std::collections::HashMap;
use std::time::Instant;

use winit::application::ApplicationHandler;
use winit::dpi::LogicalSize;
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::window::{Theme, Window, WindowId};

use crate::core::{App as CoreApp, AppControl, FrameCtx, WindowCtx};
use crate::device::{Gpu, GpuInit};

/// Window/runtime configuration.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub title: String,
    pub initial_size: LogicalSize<f64>,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            title: "astar".to_string(),
            initial_size: LogicalSize::new(480.0, 480.0),
        }
    }
}

/// Runtime context passed to the application.
///
/// Commands are buffered and applied after the current callback returns.
#[derive(Debug, Default)]
pub struct RuntimeCtx {
    commands: Vec<Command>,
}

impl RuntimeCtx {
    /// Schedules a `RedrawRequested` for the window.
    pub fn request_redraw(&mut self, id: WindowId) {
        self.commands.push(Command::RequestRedraw(id));
    }

    pub fn set_title(&mut self, id: WindowId, title: impl Into<String>) {
        self.commands.push(Command::SetTitle(id, title.into()));
    }

    /// Forces window decorations to `theme`; `None` follows the system.
    pub fn set_theme(&mut self, id: WindowId, theme: Option<Theme>) {
        self.commands.push(Command::SetTheme(id, theme));
    }

    pub fn close_window(&mut self, id: WindowId) {
        self.commands.push(Command::CloseWindow(id));
    }

    pub fn exit(&mut self) {
        self.commands.push(Command::Exit);
    }

    #[cfg(test)]
    fn pending(&self) -> &[Command] {
        &self.commands
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Command {
    RequestRedraw(WindowId),
    SetTitle(WindowId, String),
    SetTheme(WindowId, Option<Theme>),
    CloseWindow(WindowId),
    Exit,
}

/// Entry point for the runtime.
pub struct Runtime;

impl Runtime {
    pub fn run<A>(initial: RuntimeConfig, gpu_init: GpuInit, app: A) -> Result<()>
    where
        A: 'static + CoreApp,
    {
        let event_loop = EventLoop::new().context("failed to create winit EventLoop")?;
        event_loop.set_control_flow(ControlFlow::Wait);

        let mut state = AppState::new(initial, gpu_init, app);

        event_loop
            .run_app(&mut state)
            .context("winit event loop terminated with error")?;

        Ok(())
    }
}

#[self_referencing]
struct WindowEntry {
    frame_index: u64,
    attached: bool,

    window: Window,

    #[borrows(window)]
    #[covariant]
    gpu: Gpu<'this>,
}

struct AppState<A>
where
    A: CoreApp + 'static,
{
    initial: RuntimeConfig,
    gpu_init: GpuInit,
    app: A,

    windows: HashMap<WindowId, WindowEntry>,
    exit_requested: bool,
}

impl<A> AppState<A>
where
    A: CoreApp + 'static,
{
    fn new(initial: RuntimeConfig, gpu_init: GpuInit, app: A) -> Self {
        Self {
            initial,
            gpu_init,
            app,
            windows: HashMap::new(),
            exit_requested: false,
        }
    }

    fn request_exit(&mut self) {
        self.exit_requested = true;
    }

    fn create_window_entry(
        &mut self,
        event_loop: &ActiveEventLoop,
        config: RuntimeConfig,
    ) -> Result<WindowId> {
        let attrs = Window::default_attributes()
            .with_title(config.title)
            .with_inner_size(config.initial_size);

        let window = event_loop
            .create_window(attrs)
            .context("failed to create window")?;

        let id = window.id();
        let gpu_init = self.gpu_init.clone();

        let entry = WindowEntryTryBuilder {
            frame_index: 0,
            attached: false,
            window,
            gpu_builder: |w| pollster::block_on(Gpu::new(w, gpu_init)),
        }
        .try_build()
        .context("GPU initialization failed for window")?;

        self.windows.insert(id, entry);
        Ok(id)
    }

    /// Notifies the app once per visible period; repeated calls are no-ops.
    fn attach(&mut self, id: WindowId, now: Instant) {
        let (app, windows) = (&mut self.app, &mut self.windows);
        let Some(entry) = windows.get_mut(&id) else { return };

        entry.with_mut(|fields| {
            if *fields.attached {
                return;
            }
            *fields.attached = true;
            app.on_attach(&WindowCtx { id, window: fields.window }, now);
            fields.window.request_redraw();
        });
    }

    fn detach(&mut self, id: WindowId) {
        let Some(entry) = self.windows.get_mut(&id) else { return };

        let was_attached = entry.with_attached_mut(|a| std::mem::replace(a, false));
        if was_attached {
            self.app.on_detach(id);
        }
    }

    fn destroy_window_entry(&mut self, id: WindowId) {
        self.detach(id);
        self.windows.remove(&id);
        log::debug!("window {id:?} destroyed");
    }

    fn apply_commands(&mut self, event_loop: &ActiveEventLoop, mut ctx: RuntimeCtx) {
        for cmd in ctx.commands.drain(..) {
            match cmd {
                Command::RequestRedraw(id) => {
                    if let Some(entry) = self.windows.get(&id) {
                        entry.with_window(|w| w.request_redraw());
                    }
                }
                Command::SetTitle(id, title) => {
                    if let Some(entry) = self.windows.get(&id) {
                        entry.with_window(|w| w.set_title(&title));
                    }
                }
                Command::SetTheme(id, theme) => {
                    if let Some(entry) = self.windows.get(&id) {
                        entry.with_window(|w| {
                            w.set_theme(theme);
                            w.request_redraw();
                        });
                    }
                }
                Command::CloseWindow(id) => self.destroy_window_entry(id),
                Command::Exit => self.request_exit(),
            }
        }

        if self.windows.is_empty() {
            self.request_exit();
        }

        if self.exit_requested {
            event_loop.exit();
        }
    }
}

impl<A> ApplicationHandler for AppState<A>
where
    A: CoreApp + 'static,
{
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if !self.windows.is_empty() {
            return;
        }

        let id = match self.create_window_entry(event_loop, self.initial.clone()) {
            Ok(id) => id,
            Err(e) => {
                log::error!("failed to create initial window: {e:#}");
                self.request_exit();
                event_loop.exit();
                return;
            }
        };

        self.attach(id, Instant::now());
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        if self.exit_requested {
            event_loop.exit();
            return;
        }

        let now = Instant::now();
        if self.app.next_deadline().is_some_and(|due| due <= now) {
            let mut runtime_ctx = RuntimeCtx::default();
            if self.app.on_deadline(now, &mut runtime_ctx) == AppControl::Exit {
                runtime_ctx.exit();
            }
            self.apply_commands(event_loop, runtime_ctx);
            if self.exit_requested {
                return;
            }
        }

        // Sleep until the next timer; events wake the loop earlier.
        match self.app.next_deadline() {
            Some(due) => event_loop.set_control_flow(ControlFlow::WaitUntil(due)),
            None => event_loop.set_control_flow(ControlFlow::Wait),
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

        let mut runtime_ctx = RuntimeCtx::default();
        let mut app_control = AppControl::Continue;

        {
            // Split borrows to avoid `self` capture inside `ouroboros` closures.
            let (app, windows) = (&mut self.app, &mut self.windows);

            let Some(entry) = windows.get_mut(&window_id) else {
                return;
            };

            entry.with_window(|window| {
                let wctx = WindowCtx { id: window_id, window };
                app_control = app.on_window_event(&wctx, &event, &mut runtime_ctx);
            });
        }

        if app_control == AppControl::Exit {
            runtime_ctx.exit();
            self.apply_commands(event_loop, runtime_ctx);
            return;
        }

        // Runtime-managed window lifecycle / resize / redraw handling.
        match &event {
            WindowEvent::CloseRequested => {
                self.destroy_window_entry(window_id);
            }

            WindowEvent::Occluded(true) => self.detach(window_id),
            WindowEvent::Occluded(false) => self.attach(window_id, Instant::now()),

            WindowEvent::Resized(new_size) => {
                if let Some(entry) = self.windows.get_mut(&window_id) {
                    entry.with_gpu_mut(|gpu| gpu.resize(*new_size));
                    runtime_ctx.request_redraw(window_id);
                }
            }

            WindowEvent::ScaleFactorChanged { .. } => {
                if let Some(entry) = self.windows.get_mut(&window_id) {
                    let new_size = entry.with_window(|w| w.inner_size());
                    entry.with_gpu_mut(|gpu| gpu.resize(new_size));
                    runtime_ctx.request_redraw(window_id);
                }
            }

            WindowEvent::ThemeChanged(_) => runtime_ctx.request_redraw(window_id),

            WindowEvent::RedrawRequested => {
                if let Some(entry) = self.windows.get_mut(&window_id) {
                    let app = &mut self.app;
                    entry.with_mut(|fields| {
                        let mut ctx = FrameCtx {
                            window: WindowCtx {
                                id: window_id,
                                window: fields.window,
                            },
                            gpu: fields.gpu,
                            runtime: &mut runtime_ctx,
                            frame_index: *fields.frame_index,
                        };

                        app_control = app.on_frame(&mut ctx);
                        *fields.frame_index += 1;
                    });
                }

                if app_control == AppControl::Exit {
                    runtime_ctx.exit();
                }
            }

            _ => {}
        }

        self.apply_commands(event_loop, runtime_ctx);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn commands_are_buffered_in_call_order() {
        let id = WindowId::from(7u64);
        let mut ctx = RuntimeCtx::default();
        ctx.set_title(id, "Analog Clock");
        ctx.set_theme(id, Some(Theme::Dark));
        ctx.request_redraw(id);

        assert_eq!(
            ctx.pending(),
            &[
                Command::SetTitle(id, "Analog Clock".to_string()),
                Command::SetTheme(id, Some(Theme::Dark)),
                Command::RequestRedraw(id),
            ]
        );
    }

    #[test]
    fn default_config_has_a_title() {
        assert!(!RuntimeConfig::default().title.is_empty());
    }
}
