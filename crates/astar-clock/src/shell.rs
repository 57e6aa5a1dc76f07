//! Window shell: owns the clock state and drives it from engine callbacks.

use std::time::Instant;

use winit::event::{ElementState, WindowEvent};

use astar_engine::core::{App, AppControl, FrameCtx, WindowCtx};
use astar_engine::render::SceneRenderer;
use astar_engine::scene::DrawList;
use astar_engine::text::{FontId, FontSystem};
use astar_engine::time::earliest;
use astar_engine::window::{RuntimeCtx, WindowId};

use crate::face::{ClockFace, RenderFrame};
use crate::menu::MenuAction;
use crate::options::ClockStyleOptions;
use crate::scheduler::RedrawScheduler;
use crate::theme::{Palette, ThemeController, ThemePreference};
use crate::time_source::{LocalClock, TimeSource};
use crate::title::{title_for, TitleUpdater};

/// Engine-facing state of the clock window.
pub struct ClockShell<C: TimeSource = LocalClock> {
    window: Option<WindowId>,
    /// Last known client width in logical pixels.
    width: f32,
    last_title: String,

    options: ClockStyleOptions,
    theme: ThemeController,
    scheduler: RedrawScheduler,
    title: TitleUpdater,

    face: ClockFace,
    fonts: FontSystem,
    scene: SceneRenderer,
    draw_list: DrawList,

    clock: C,
}

impl<C: TimeSource> ClockShell<C> {
    pub fn new(
        options: ClockStyleOptions,
        theme: ThemePreference,
        fonts: FontSystem,
        clock: C,
    ) -> Self {
        Self {
            window: None,
            width: 0.0,
            last_title: String::new(),
            scheduler: RedrawScheduler::new(options.smooth_seconds),
            options,
            theme: ThemeController::new(theme),
            title: TitleUpdater::new(),
            face: ClockFace::new(FontId::default()),
            fonts,
            scene: SceneRenderer::new(),
            draw_list: DrawList::new(),
            clock,
        }
    }

    pub fn options(&self) -> &ClockStyleOptions {
        &self.options
    }

    pub fn theme(&self) -> &ThemeController {
        &self.theme
    }

    pub fn scheduler(&self) -> &RedrawScheduler {
        &self.scheduler
    }

    /// Applies a menu action to the window `id`. Actions for any other
    /// window are ignored.
    pub fn apply(&mut self, action: MenuAction, id: WindowId, now: Instant, runtime: &mut RuntimeCtx) {
        if self.window != Some(id) {
            log::debug!("menu action {action:?} for unknown window {id:?} ignored");
            return;
        }

        match action {
            MenuAction::SetTheme(pref) => {
                if self.theme.set_theme(pref) {
                    runtime.set_theme(id, pref.window_theme());
                }
            }
            MenuAction::SetNumerals(style) => {
                if self.options.numeral_style != style {
                    log::info!("numerals: {}", style.name());
                    self.options.numeral_style = style;
                }
            }
            MenuAction::ToggleSmoothSeconds => {
                self.options.smooth_seconds = !self.options.smooth_seconds;
                log::info!("smooth seconds: {}", self.options.smooth_seconds);
                self.scheduler.set_smooth_seconds(self.options.smooth_seconds, now);
            }
            MenuAction::ToggleMinorTicks => {
                self.options.show_minor_ticks = !self.options.show_minor_ticks;
                log::info!("minor ticks: {}", self.options.show_minor_ticks);
            }
            MenuAction::Close => {
                runtime.close_window(id);
                return;
            }
        }

        runtime.request_redraw(id);
    }

    fn update_title(&mut self, id: WindowId, title: String, runtime: &mut RuntimeCtx) {
        if title == self.last_title {
            return;
        }
        log::debug!("title: {title}");
        runtime.set_title(id, title.clone());
        self.last_title = title;
    }
}

impl<C: TimeSource> App for ClockShell<C> {
    fn on_attach(&mut self, window: &WindowCtx<'_>, now: Instant) {
        self.window = Some(window.id);
        self.width = window.logical_size().0;

        self.scheduler.attach(now);
        self.title.attach(now);

        window.window.set_theme(self.theme.preference().window_theme());

        let title = title_for(self.width, self.clock.now());
        if title != self.last_title {
            window.window.set_title(&title);
            self.last_title = title;
        }
    }

    fn on_detach(&mut self, window_id: WindowId) {
        if self.window != Some(window_id) {
            return;
        }
        self.scheduler.detach();
        self.title.detach();
    }

    fn on_window_event(
        &mut self,
        window: &WindowCtx<'_>,
        event: &WindowEvent,
        runtime: &mut RuntimeCtx,
    ) -> AppControl {
        match event {
            WindowEvent::Resized(_) => {
                self.width = window.logical_size().0;
                self.title.on_resize(self.width, Instant::now());
            }
            WindowEvent::KeyboardInput { event, .. }
                if event.state == ElementState::Pressed && !event.repeat =>
            {
                if let Some(action) = MenuAction::from_key(&event.logical_key) {
                    self.apply(action, window.id, Instant::now(), runtime);
                }
            }
            WindowEvent::ThemeChanged(theme) => {
                log::debug!("host theme changed to {theme:?}");
            }
            _ => {}
        }
        AppControl::Continue
    }

    fn on_frame(&mut self, ctx: &mut FrameCtx<'_, '_>) -> AppControl {
        let theme = self.theme.effective_theme(ctx.window.theme());
        let frame = RenderFrame {
            bounds: ctx.window.logical_bounds(),
            now: self.clock.now(),
            options: &self.options,
            theme,
        };

        self.draw_list.clear();
        self.face.draw(&mut self.draw_list, &frame);

        let scene = &mut self.scene;
        let list = &mut self.draw_list;
        let fonts = &self.fonts;

        ctx.render(Palette::for_theme(theme).background, |rctx, target| {
            scene.render(rctx, target, list, fonts);
        })
    }

    fn next_deadline(&self) -> Option<Instant> {
        earliest(self.scheduler.next_due(), self.title.next_due())
    }

    fn on_deadline(&mut self, now: Instant, runtime: &mut RuntimeCtx) -> AppControl {
        let Some(id) = self.window else {
            return AppControl::Continue;
        };

        if self.scheduler.poll(now) {
            runtime.request_redraw(id);
        }

        if let Some(title) = self.title.poll(now, self.width, self.clock.now()) {
            self.update_title(id, title, runtime);
        }

        AppControl::Continue
    }
}
