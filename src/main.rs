//! Headless sandbox host.
//!
//! Loads the terrain texture array and every skybox cubemap from an asset
//! directory into an in-memory texture store, then flies the camera through
//! a scripted input sequence while the loads complete.
//!
//! Usage: `vista [ASSET_DIR] [OPTIONS_TOML]`

use std::cell::Cell;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::rc::Rc;
use std::sync::Arc;
use std::time::Duration;

use glam::Vec3;
use vista::assets::{
    AssetLoader, CubemapPaths, FileSource, LoadCallbacks, SkyboxCycle,
};
use vista::camera::{Camera, CameraUniform};
use vista::gpu::{TextureHandle, TextureSink, TextureStore, WrapMode};
use vista::input::{InputEvent, InputProcessor, KeyAction, KeyCode, MouseButton};
use vista::options::Options;
use vista::VistaError;
use web_time::Instant;

const TERRAIN_LAYERS: [&str; 6] = [
    "grass.png",
    "mud.png",
    "rock.png",
    "sand.png",
    "snow.png",
    "stone.png",
];

const SKYBOXES: [&str; 12] = [
    "arch3", "cave3", "dark", "hot", "rainbow", "sh", "skyast", "skyhsky",
    "skype", "sp2", "sp3", "tron",
];

const ICON: &str = "favicon-32x32.png";

const CLEAR_COLOR: [f32; 4] = [0.05, 0.05, 0.05, 1.0];
/// Shown once any load has failed.
const FAILED_CLEAR_COLOR: [f32; 4] = [1.0, 0.0, 0.0, 1.0];

const START_POSITION: Vec3 = Vec3::new(0.0, 2.5, 6.0);
/// Tilted down toward the terrain.
const START_PITCH: f32 = -15.0;

const FRAME: Duration = Duration::from_millis(16);
const ASPECT: f32 = 16.0 / 9.0;
const MAX_FRAMES: u32 = 1200;

/// Shared between the host and the load callbacks it registers.
#[derive(Default)]
struct LoadState {
    failed: Cell<bool>,
    terrain_ms: Cell<Option<f64>>,
    skyboxes_ms: Cell<Option<f64>>,
    skyboxes_loaded: Cell<usize>,
}

struct SandboxApp {
    camera: Camera,
    uniform: CameraUniform,
    input: InputProcessor,
    loader: AssetLoader,
    textures: TextureStore,
    skyboxes: Vec<TextureHandle>,
    cycle: SkyboxCycle,
    loads: Rc<LoadState>,
    started: Instant,
    debug_overlay: bool,
    memory_overlay: bool,
    running: bool,
}

impl SandboxApp {
    fn new(assets: &Path, options: &Options) -> Result<Self, VistaError> {
        let source = Arc::new(FileSource::new(assets));
        let mut loader = AssetLoader::new(source, options.loader.clone())?;
        let mut textures = TextureStore::new();
        let loads = Rc::new(LoadState::default());
        let started = Instant::now();

        let icon = textures.allocate("icon");
        let _ = loader.load_image(
            ICON,
            icon,
            (WrapMode::ClampToEdge, WrapMode::ClampToEdge),
            Self::callbacks(&loads, started, |_, _| {}),
        );

        let terrain = textures.allocate("terrain");
        let _ = loader.load_array_texture(
            "terrain",
            &TERRAIN_LAYERS,
            terrain,
            Self::callbacks(&loads, started, |loads, ms| {
                loads.terrain_ms.set(Some(ms));
            }),
        );

        let skyboxes = SKYBOXES
            .iter()
            .map(|name| {
                let target = textures.allocate(name);
                let _ = loader.load_cubemap(
                    *name,
                    &CubemapPaths::from_skybox(name, "png"),
                    target,
                    Self::callbacks(&loads, started, |loads, ms| {
                        let loaded = loads.skyboxes_loaded.get() + 1;
                        loads.skyboxes_loaded.set(loaded);
                        if loaded == SKYBOXES.len() {
                            loads.skyboxes_ms.set(Some(ms));
                        }
                    }),
                );
                target
            })
            .collect();

        let mut camera = Camera::new(Vec3::ZERO, &options.camera);
        camera.set_position(START_POSITION);
        camera.look_at_angles(options.camera.yaw, START_PITCH);

        Ok(Self {
            camera,
            uniform: CameraUniform::new(),
            input: InputProcessor::with_key_bindings(options.keybindings.clone()),
            loader,
            textures,
            skyboxes,
            cycle: SkyboxCycle::new(SKYBOXES.len()),
            loads,
            started,
            debug_overlay: false,
            memory_overlay: false,
            running: true,
        })
    }

    /// Success reports elapsed milliseconds; failure switches the clear color.
    fn callbacks(
        loads: &Rc<LoadState>,
        started: Instant,
        on_success: impl FnOnce(&LoadState, f64) + 'static,
    ) -> LoadCallbacks {
        let ok = Rc::clone(loads);
        let failed = Rc::clone(loads);
        LoadCallbacks::new(
            move || on_success(&ok, started.elapsed().as_secs_f64() * 1000.0),
            move || failed.failed.set(true),
        )
    }

    fn clear_color(&self) -> [f32; 4] {
        if self.loads.failed.get() {
            FAILED_CLEAR_COLOR
        } else {
            CLEAR_COLOR
        }
    }

    fn handle_event(&mut self, event: InputEvent) {
        if let Some(action) = self.input.handle_event(event, &mut self.camera) {
            self.apply(action);
        }
    }

    fn apply(&mut self, action: KeyAction) {
        match action {
            KeyAction::Quit => {
                self.camera.release_all();
                self.running = false;
            }
            KeyAction::ToggleDebugOverlay => {
                self.debug_overlay = !self.debug_overlay;
                log::info!("debug overlay {}", on_off(self.debug_overlay));
            }
            KeyAction::ToggleMemoryOverlay => {
                self.memory_overlay = !self.memory_overlay;
                log::info!("memory overlay {}", on_off(self.memory_overlay));
            }
            KeyAction::NextSkybox => {
                let _ = self.cycle.next();
                self.log_skybox();
            }
            KeyAction::PreviousSkybox => {
                let _ = self.cycle.previous();
                self.log_skybox();
            }
        }
    }

    fn log_skybox(&self) {
        let Some(index) = self.cycle.selected() else {
            return;
        };
        let ready = self.textures.is_initialized(self.skyboxes[index]);
        log::info!(
            "skybox '{}' selected ({})",
            SKYBOXES[index],
            if ready { "loaded" } else { "not loaded" }
        );
    }

    fn frame(&mut self, dt: f32) {
        let _ = self.loader.do_work(&mut self.textures);
        self.camera.update(dt);
        self.uniform.update_view_proj(&self.camera, ASPECT);

        if self.debug_overlay {
            log::debug!(
                "camera at {:?} yaw {:.1} pitch {:.1} zoom {:.1} clear {:?}",
                self.camera.position(),
                self.camera.yaw(),
                self.camera.pitch(),
                self.camera.zoom_level(),
                self.clear_color()
            );
        }
        if self.memory_overlay {
            log::debug!(
                "{} pending loads, {} texture bytes resident",
                self.loader.pending(),
                self.textures.resident_bytes()
            );
        }
    }

    fn run(&mut self) {
        let script = script();
        let mut last = Instant::now();
        let mut frame = 0;

        while self.running && frame < MAX_FRAMES {
            for (_, event) in script.iter().filter(|(at, _)| *at == frame) {
                self.handle_event(*event);
            }
            let now = Instant::now();
            let dt = now.duration_since(last).as_secs_f32();
            last = now;
            self.frame(dt);

            frame += 1;
            std::thread::sleep(FRAME);
        }

        // Give outstanding loads a chance to settle before reporting.
        let deadline = Instant::now() + Duration::from_secs(5);
        while self.loader.pending() > 0 && Instant::now() < deadline {
            let _ = self.loader.do_work(&mut self.textures);
            std::thread::sleep(FRAME);
        }
        self.report();
    }

    fn report(&self) {
        let stats = self.loader.stats();
        log::info!(
            "{} loads published, {} failed, {} still pending after {:.1} s",
            stats.published,
            stats.failed,
            self.loader.pending(),
            self.started.elapsed().as_secs_f32()
        );
        if let Some(ms) = self.loads.terrain_ms.get() {
            log::info!("terrain array loaded in {ms:.1} ms");
        }
        if let Some(ms) = self.loads.skyboxes_ms.get() {
            log::info!("all skyboxes loaded in {ms:.1} ms");
        }
        if self.loads.failed.get() {
            log::warn!("some assets failed to load; clear color {:?}", self.clear_color());
        }
        log::info!(
            "camera finished at {:?} facing {:?}",
            self.camera.position(),
            self.camera.direction()
        );
    }
}

fn on_off(enabled: bool) -> &'static str {
    if enabled {
        "on"
    } else {
        "off"
    }
}

/// Frame-stamped input events driving the camera.
fn script() -> Vec<(u32, InputEvent)> {
    let key_down = |key| InputEvent::KeyDown { key };
    let key_up = |key| InputEvent::KeyUp { key };
    let right = |pressed| InputEvent::MouseButton {
        button: MouseButton::Right,
        pressed,
    };

    let mut script = vec![
        (0, key_up(KeyCode::KeyH)),
        (1, key_down(KeyCode::KeyW)),
        (30, key_down(KeyCode::KeyD)),
        (60, key_up(KeyCode::KeyW)),
        (60, key_up(KeyCode::KeyD)),
        (70, InputEvent::CursorMoved { x: 640.0, y: 360.0 }),
        (71, right(true)),
    ];
    for step in 0..20 {
        let t = step as f32;
        script.push((
            72 + step,
            InputEvent::CursorMoved {
                x: 640.0 + t * 6.0,
                y: 360.0 - t * 2.0,
            },
        ));
    }
    script.extend([
        (93, right(false)),
        (100, InputEvent::Scroll { delta: 3.0 }),
        (110, key_down(KeyCode::KeyQ)),
        (130, key_up(KeyCode::KeyQ)),
        (140, key_up(KeyCode::KeyN)),
        (150, key_up(KeyCode::KeyR)),
        (160, key_up(KeyCode::KeyT)),
        (161, key_up(KeyCode::KeyT)),
        (170, key_up(KeyCode::KeyN)),
        (180, key_down(KeyCode::Escape)),
    ]);
    script
}

fn main() -> ExitCode {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let assets = args.next().map_or_else(|| PathBuf::from("assets"), PathBuf::from);
    let options = match args.next() {
        Some(path) => match Options::load(Path::new(&path)) {
            Ok(options) => options,
            Err(e) => {
                log::error!("failed to load options from {path}: {e}");
                return ExitCode::FAILURE;
            }
        },
        None => Options::default(),
    };

    log::info!("loading assets from {}", assets.display());
    let mut app = match SandboxApp::new(&assets, &options) {
        Ok(app) => app,
        Err(e) => {
            log::error!("failed to start: {e}");
            return ExitCode::FAILURE;
        }
    };
    app.run();
    ExitCode::SUCCESS
}
