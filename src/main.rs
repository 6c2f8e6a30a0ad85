use std::collections::HashSet;
use std::num::NonZeroU32;
use std::path::PathBuf;
use std::rc::Rc;
use std::time::{Duration, Instant};

use anyhow::Context as _;
use clap::Parser;
use winit::application::ApplicationHandler;
use winit::dpi::LogicalSize;
use winit::event::{ElementState, KeyEvent, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::{Window, WindowId};

use raycaster_engine::scaler::StretchLut;
use raycaster_engine::{Config, Engine, InputState, StepOutcome, TextureSet, WorldGrid};

/// Ticks run per redraw at most before the backlog is dropped.
const MAX_CATCH_UP: u32 = 5;

#[derive(Parser, Debug)]
#[command(name = "raycaster", about = "Grid raycaster renderer")]
struct Args {
    /// TOML config file; defaults are used when omitted
    #[arg(short, long)]
    config: Option<PathBuf>,
    /// Map file, overrides `map` from the config
    #[arg(short, long)]
    map: Option<PathBuf>,
}

struct App {
    window: Option<Rc<Window>>,
    surface: Option<softbuffer::Surface<Rc<Window>, Rc<Window>>>,
    engine: Engine,
    lut: Option<StretchLut>,
    window_size: (u32, u32),

    // Fixed-step clock
    tick: Duration,
    accumulator: Duration,
    last_tick: Instant,

    // Stats
    frame_counter: u32,
    last_fps_print: Instant,

    keys_down: HashSet<KeyCode>,
}

impl App {
    fn new(cfg: &Config, engine: Engine) -> Self {
        Self {
            window: None,
            surface: None,
            engine,
            lut: None,
            window_size: (cfg.window_width, cfg.window_height),
            tick: Duration::from_secs_f64(1.0 / cfg.tick_hz as f64),
            accumulator: Duration::ZERO,
            last_tick: Instant::now(),
            frame_counter: 0,
            last_fps_print: Instant::now(),
            keys_down: HashSet::new(),
        }
    }

    fn input(&self) -> InputState {
        let down = |codes: &[KeyCode]| codes.iter().any(|c| self.keys_down.contains(c));
        InputState {
            move_forward: down(&[KeyCode::KeyW, KeyCode::ArrowUp]),
            move_back: down(&[KeyCode::KeyS, KeyCode::ArrowDown]),
            strafe_left: down(&[KeyCode::KeyA]),
            strafe_right: down(&[KeyCode::KeyD]),
            rotate_left: down(&[KeyCode::KeyQ, KeyCode::ArrowLeft]),
            rotate_right: down(&[KeyCode::KeyE, KeyCode::ArrowRight]),
            quit: down(&[KeyCode::Escape]),
        }
    }

    /// Runs the fixed ticks owed since the last call. Returns false on quit.
    fn advance(&mut self) -> bool {
        let now = Instant::now();
        // Cap to avoid huge jumps if the app was paused
        self.accumulator += now.duration_since(self.last_tick).min(Duration::from_millis(100));
        self.last_tick = now;

        let input = self.input();
        let mut steps = 0;
        while self.accumulator >= self.tick {
            if self.engine.step(&input) == StepOutcome::Quit {
                return false;
            }
            self.accumulator -= self.tick;
            steps += 1;
            if steps == MAX_CATCH_UP {
                self.accumulator = Duration::ZERO;
                break;
            }
        }
        true
    }

    fn redraw(&mut self, id: WindowId) {
        let (window, surface) = match (&self.window, &mut self.surface) {
            (Some(w), Some(s)) if w.id() == id => (w, s),
            _ => return,
        };

        let size = window.inner_size();
        let (Some(w), Some(h)) = (NonZeroU32::new(size.width), NonZeroU32::new(size.height)) else {
            return; // Minimized window, skip drawing
        };
        if let Err(e) = surface.resize(w, h) {
            log::error!("surface resize failed: {e}");
            return;
        }
        let (dw, dh) = (size.width as usize, size.height as usize);

        let frame = self.engine.render();
        if !self.lut.as_ref().is_some_and(|l| l.matches(dw, dh, frame)) {
            log::debug!("stretch table {}x{} -> {dw}x{dh}", frame.width(), frame.height());
            self.lut = Some(StretchLut::new(dw, dh, frame.width(), frame.height()));
        }

        let mut buf = match surface.buffer_mut() {
            Ok(buf) => buf,
            Err(e) => {
                log::error!("surface buffer unavailable: {e}");
                return;
            }
        };
        if let Some(lut) = &self.lut {
            lut.stretch(&mut buf, frame);
        }
        if let Err(e) = buf.present() {
            log::error!("present failed: {e}");
        }

        self.frame_counter += 1;
        let now = Instant::now();
        let elapsed = now.duration_since(self.last_fps_print).as_secs_f32();
        if elapsed >= 1.0 {
            let actor = self.engine.actor();
            log::info!(
                "fps {:.1} pos ({:.0}, {:.0}) heading {:.1}°",
                self.frame_counter as f32 / elapsed,
                actor.x,
                actor.y,
                actor.heading().to_degrees()
            );
            self.frame_counter = 0;
            self.last_fps_print = now;
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        let (w, h) = self.window_size;
        let attributes = Window::default_attributes()
            .with_title("Raycaster")
            .with_inner_size(LogicalSize::new(w as f64, h as f64));

        let window = match event_loop.create_window(attributes) {
            Ok(w) => Rc::new(w),
            Err(e) => {
                log::error!("failed to create window: {e}");
                event_loop.exit();
                return;
            }
        };
        let surface = softbuffer::Context::new(window.clone())
            .and_then(|context| softbuffer::Surface::new(&context, window.clone()));
        match surface {
            Ok(s) => self.surface = Some(s),
            Err(e) => {
                log::error!("failed to create softbuffer surface: {e}");
                event_loop.exit();
                return;
            }
        }

        window.request_redraw();
        self.window = Some(window);
        self.last_tick = Instant::now();
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, id: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested => {
                log::info!("close requested; stopping");
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
                ElementState::Pressed => {
                    self.keys_down.insert(code);
                }
                ElementState::Released => {
                    self.keys_down.remove(&code);
                }
            },

            WindowEvent::RedrawRequested => {
                if !self.advance() {
                    log::info!("quit requested after {} ticks", self.engine.ticks());
                    event_loop.exit();
                    return;
                }
                self.redraw(id);
            }

            // Stretch table is rebuilt lazily on the next redraw
            WindowEvent::Resized(_) => self.lut = None,
            _ => (),
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let mut cfg = match &args.config {
        Some(path) => {
            log::info!("loading config from {}", path.display());
            Config::from_path(path).with_context(|| format!("loading {}", path.display()))?
        }
        None => Config::default(),
    };
    if let Some(map) = args.map {
        cfg.map = Some(map);
    }

    let grid = match &cfg.map {
        Some(path) => WorldGrid::load(path, cfg.tile_size)
            .with_context(|| format!("loading map {}", path.display()))?,
        None => WorldGrid::default_map(cfg.tile_size),
    };
    log::info!(
        "map {}x{} cells, tile {}, {} rays over {}°",
        grid.width(),
        grid.height(),
        cfg.tile_size,
        cfg.num_rays(),
        cfg.fov_degrees
    );

    let textures = TextureSet::from_bindings(cfg.default_material, &cfg.textures);
    let engine = Engine::new(&cfg, grid, textures);

    let event_loop = EventLoop::new().context("creating event loop")?;
    // Redraws are requested from about_to_wait, so Wait still runs every frame
    event_loop.set_control_flow(ControlFlow::Wait);

    let mut app = App::new(&cfg, engine);
    event_loop.run_app(&mut app).context("event loop")?;
    Ok(())
}
