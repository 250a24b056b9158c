use std::collections::HashSet;
use std::num::NonZeroU32;
use std::path::PathBuf;
use std::rc::Rc;
use std::time::{Duration, Instant};

use anyhow::{Context, Result, anyhow};
use winit::application::ApplicationHandler;
use winit::dpi::LogicalSize;
use winit::event::{ElementState, KeyEvent, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::{Window, WindowId};

use grid_raycaster::renderer::render_frame;
use grid_raycaster::scaler::{ScaleLut, blit_nearest};
use grid_raycaster::{EngineConfig, Intent, Session};

struct App {
    window: Option<Rc<Window>>,
    surface: Option<softbuffer::Surface<Rc<Window>, Rc<Window>>>,
    session: Session,

    // HUD
    frame_counter: u32,
    last_fps_print: Instant,

    // Internal buffer at the configured screen size
    fb_small: Vec<u32>,
    fb_w: usize,
    fb_h: usize,

    scale_lut: ScaleLut,

    // Input and pacing
    keys_down: HashSet<KeyCode>,
    next_tick: Instant,
    tick_len: Duration,
}

impl App {
    fn new(session: Session) -> Self {
        let config = session.config();
        let (fb_w, fb_h) = (config.screen_width, config.screen_height);
        let tick_len = Duration::from_secs_f64(1.0 / config.tick_hz as f64);

        Self {
            window: None,
            surface: None,
            session,

            frame_counter: 0,
            last_fps_print: Instant::now(),

            fb_small: vec![0; fb_w * fb_h],
            fb_w,
            fb_h,

            scale_lut: ScaleLut::empty(),

            keys_down: HashSet::new(),
            next_tick: Instant::now(),
            tick_len,
        }
    }

    fn held(&self, a: KeyCode, b: KeyCode) -> bool {
        self.keys_down.contains(&a) || self.keys_down.contains(&b)
    }

    /// Translate held keys into walk/turn intents for the next update.
    fn apply_intents(&mut self) {
        let walk = Intent::from_keys(
            self.held(KeyCode::ArrowDown, KeyCode::KeyS),
            self.held(KeyCode::ArrowUp, KeyCode::KeyW),
        );
        let turn = Intent::from_keys(
            self.held(KeyCode::ArrowLeft, KeyCode::KeyA),
            self.held(KeyCode::ArrowRight, KeyCode::KeyD),
        );
        self.session.camera.walk = walk;
        self.session.camera.turn = turn;
    }

    fn tick(&mut self) {
        let now = Instant::now();
        if now < self.next_tick {
            return;
        }
        self.apply_intents();
        self.session.step();

        self.next_tick += self.tick_len;
        // Fell behind (paused, dragged window): don't try to catch up
        if self.next_tick < now {
            self.next_tick = now + self.tick_len;
        }
    }

    fn redraw(&mut self, id: WindowId) -> Result<()> {
        self.tick();

        let (window, surface) = match (&self.window, &mut self.surface) {
            (Some(w), Some(s)) if w.id() == id => (w, s),
            _ => return Ok(()),
        };

        let size = window.inner_size();
        let (Some(dw), Some(dh)) = (NonZeroU32::new(size.width), NonZeroU32::new(size.height))
        else {
            return Ok(()); // Minimized window, skip drawing
        };

        surface
            .resize(dw, dh)
            .map_err(|e| anyhow!("surface resize failed: {e}"))?;

        render_frame(&mut self.fb_small, self.fb_w, self.fb_h, &self.session);

        let mut buf = surface
            .buffer_mut()
            .map_err(|e| anyhow!("surface buffer unavailable: {e}"))?;
        if self.scale_lut.dst_size() != (dw.get() as usize, dh.get() as usize) {
            self.scale_lut = ScaleLut::new(dw.get() as usize, dh.get() as usize, self.fb_w, self.fb_h);
        }
        blit_nearest(&mut buf, &self.fb_small, &self.scale_lut);
        buf.present()
            .map_err(|e| anyhow!("surface present failed: {e}"))?;

        self.frame_counter += 1;
        let elapsed = self.last_fps_print.elapsed().as_secs_f32();
        if elapsed >= 1.0 {
            log::info!("FPS: {:.1}", self.frame_counter as f32 / elapsed);
            self.frame_counter = 0;
            self.last_fps_print = Instant::now();
        }
        Ok(())
    }

    fn create_window(&mut self, event_loop: &ActiveEventLoop) -> Result<()> {
        let attributes = Window::default_attributes()
            .with_title("Grid Raycaster")
            .with_inner_size(LogicalSize::new(self.fb_w as f64, self.fb_h as f64));

        let window = Rc::new(
            event_loop
                .create_window(attributes)
                .map_err(|e| anyhow!("create window: {e}"))?,
        );
        let context = softbuffer::Context::new(window.clone())
            .map_err(|e| anyhow!("softbuffer context: {e}"))?;
        let surface = softbuffer::Surface::new(&context, window.clone())
            .map_err(|e| anyhow!("softbuffer surface: {e}"))?;

        let size = window.inner_size();
        log::info!("Window created at {}x{}", size.width, size.height);
        self.scale_lut = ScaleLut::new(size.width as usize, size.height as usize, self.fb_w, self.fb_h);

        self.surface = Some(surface);
        self.window = Some(window);
        Ok(())
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }
        if let Err(e) = self.create_window(event_loop) {
            log::error!("{e:#}");
            event_loop.exit();
            return;
        }

        self.session.recast();
        self.next_tick = Instant::now();
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, id: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested => {
                log::info!("Close requested; stopping");
                event_loop.exit();
            }

            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(code),
                        state,
                        ..
                    },
                ..
            } => match state {
                ElementState::Pressed if code == KeyCode::Escape => event_loop.exit(),
                ElementState::Pressed => {
                    self.keys_down.insert(code);
                }
                ElementState::Released => {
                    self.keys_down.remove(&code);
                }
            },

            WindowEvent::RedrawRequested => {
                if let Err(e) = self.redraw(id) {
                    log::error!("{e:#}");
                    event_loop.exit();
                }
            }

            WindowEvent::Resized(new_size) => {
                log::debug!("Resized to {}x{}", new_size.width, new_size.height);
                self.scale_lut = ScaleLut::new(
                    new_size.width as usize,
                    new_size.height as usize,
                    self.fb_w,
                    self.fb_h,
                );
            }
            _ => (),
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        // Sleep until the next update is due, then redraw once
        if Instant::now() >= self.next_tick {
            if let Some(window) = &self.window {
                window.request_redraw();
            }
        }
        event_loop.set_control_flow(ControlFlow::WaitUntil(self.next_tick));
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = match std::env::args_os().nth(1).map(PathBuf::from) {
        Some(path) => EngineConfig::load(&path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => {
            log::info!("No config given; using defaults");
            EngineConfig::default()
        }
    };
    let session = Session::new(config).context("starting session")?;

    let event_loop = EventLoop::new().map_err(|e| anyhow!("event loop: {e}"))?;
    let mut app = App::new(session);
    event_loop
        .run_app(&mut app)
        .map_err(|e| anyhow!("event loop exited with error: {e}"))?;
    Ok(())
}
