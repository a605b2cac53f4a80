use anyhow::{Context, Result};
use ouroboros::self_referencing;

use winit::application::ApplicationHandler;
use winit::dpi::{LogicalSize, PhysicalSize};
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::window::{Window, WindowId};

use crate::device::{RenderSystem, SurfaceErrorAction, SystemInit};
use crate::render::RenderContext;

/// Window/runtime configuration.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub title: String,
    /// Initial inner width in logical pixels.
    pub width: f64,
    /// Initial inner height in logical pixels.
    pub height: f64,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            title: "kiln".to_string(),
            width: 1280.0,
            height: 720.0,
        }
    }
}

/// Control directive returned by app callbacks.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum AppControl {
    Continue,
    Exit,
}

/// Per-frame context handed to the application.
pub struct FrameCtx<'a> {
    /// Immediate context recording into the current frame.
    pub render: RenderContext<'a>,
    /// Current drawable size (physical pixels).
    pub size: PhysicalSize<u32>,
}

/// Application contract implemented by higher layers.
pub trait App {
    /// Called for window events.
    fn on_window_event(&mut self, event: &WindowEvent) -> AppControl {
        let _ = event;
        AppControl::Continue
    }

    /// Called once per rendered frame.
    fn on_frame(&mut self, ctx: &mut FrameCtx<'_>) -> AppControl;
}

/// Entry point for the single-window runtime.
pub struct Runtime;

impl Runtime {
    pub fn run<A>(config: RuntimeConfig, init: SystemInit, app: A) -> Result<()>
    where
        A: App + 'static,
    {
        let event_loop = EventLoop::new().context("failed to create winit EventLoop")?;
        let mut state = RuntimeState {
            config,
            init,
            app,
            window: None,
            exit_requested: false,
        };

        event_loop
            .run_app(&mut state)
            .context("winit event loop terminated with error")?;

        Ok(())
    }
}

#[self_referencing]
struct WindowEntry {
    window: Window,

    #[borrows(window)]
    #[covariant]
    system: RenderSystem<'this>,
}

struct RuntimeState<A>
where
    A: App + 'static,
{
    config: RuntimeConfig,
    init: SystemInit,
    app: A,

    window: Option<WindowEntry>,
    exit_requested: bool,
}

impl<A> ApplicationHandler for RuntimeState<A>
where
    A: App + 'static,
{
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let attrs = Window::default_attributes()
            .with_title(self.config.title.clone())
            .with_inner_size(LogicalSize::new(self.config.width, self.config.height));

        let window = match event_loop.create_window(attrs) {
            Ok(window) => window,
            Err(e) => {
                log::error!("failed to create window: {e}");
                self.exit_requested = true;
                event_loop.exit();
                return;
            }
        };

        let init = self.init.clone();
        let entry = WindowEntryBuilder {
            window,
            system_builder: |w| {
                pollster::block_on(RenderSystem::new(w, init))
                    .expect("render system initialization failed")
            },
        }
        .build();

        entry.with_window(|w| w.request_redraw());
        self.window = Some(entry);
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        if self.exit_requested {
            event_loop.exit();
            return;
        }

        event_loop.set_control_flow(ControlFlow::Wait);

        // Continuous redraw; invalidation-based redraw can come later.
        if let Some(entry) = &self.window {
            entry.with_window(|w| w.request_redraw());
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        if self.exit_requested {
            event_loop.exit();
            return;
        }

        if matches!(event, WindowEvent::CloseRequested) {
            self.window = None;
            self.exit_requested = true;
            event_loop.exit();
            return;
        }

        // Split borrows to avoid capturing `self` inside `ouroboros` closures.
        let (app, window) = (&mut self.app, &mut self.window);
        let Some(entry) = window.as_mut() else {
            return;
        };

        let mut exit = app.on_window_event(&event) == AppControl::Exit;

        match &event {
            WindowEvent::Resized(new_size) => {
                entry.with_system_mut(|system| system.resize(*new_size));
                entry.with_window(|w| w.request_redraw());
            }

            WindowEvent::ScaleFactorChanged { .. } => {
                let new_size = entry.with_window(|w| w.inner_size());
                entry.with_system_mut(|system| system.resize(new_size));
                entry.with_window(|w| w.request_redraw());
            }

            WindowEvent::RedrawRequested => {
                entry.with_system_mut(|system| {
                    match system.begin_frame() {
                        Ok(mut frame) => {
                            let size = system.size();

                            // Scope so the context releases the frame
                            // before submission.
                            {
                                let mut ctx = FrameCtx {
                                    render: system.immediate_context(&mut frame),
                                    size,
                                };
                                if app.on_frame(&mut ctx) == AppControl::Exit {
                                    exit = true;
                                }
                            }

                            system.submit(frame);
                        }
                        Err(err) => {
                            log::debug!("surface error: {err:?}");
                            match system.handle_surface_error(err) {
                                SurfaceErrorAction::Reconfigured
                                | SurfaceErrorAction::SkipFrame => {}
                                SurfaceErrorAction::Fatal => {
                                    log::error!("fatal surface error; exiting");
                                    exit = true;
                                }
                            }
                        }
                    }
                });
            }

            _ => {}
        }

        if exit {
            self.exit_requested = true;
            event_loop.exit();
        }
    }
}
