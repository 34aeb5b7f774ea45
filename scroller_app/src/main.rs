//! Side-scroller demo
//!
//! Drives the renderer headlessly with a logical tick rate that deliberately
//! differs from the presentation rate: the simulation ticks at 20 Hz while
//! the main window is paced at 60 fps and a minimap render texture at 10 fps.
//! Time is simulated, so the run is instant and repeatable.
//!
//! Settings are read from `scroller.toml` in the working directory, or from
//! `scroller.ron` when only that file exists.

use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use render_core::core::ConfigError;
use render_core::foundation::logging;
use render_core::prelude::*;
use render_core::render::backends::headless::{CommandLog, HeadlessBackend, HeadlessWindowProvider};
use render_core::render::api::ImagePixel;
use render_core::render::{RenderObjectId, RenderSceneId, RenderTextureId};
use thiserror::Error;

const TICK: Duration = Duration::from_millis(50);
const FRAME_STEP: Duration = Duration::from_millis(1);
const RUN_TIME: Duration = Duration::from_secs(3);
const STAR_COUNT: usize = 48;
const SCROLL_SPEED: f32 = 0.4;
const CONFIG_PATHS: [&str; 2] = ["scroller.toml", "scroller.ron"];

#[derive(Error, Debug)]
enum ScrollerError {
    #[error("Render error: {0}")]
    Render(#[from] RenderError),

    #[error("Config error: {0}")]
    Config(#[from] ConfigError),
}

struct Star {
    object: RenderObjectId,
    x: f32,
    y: f32,
    speed: f32,
}

struct ScrollerApp {
    renderer: Renderer,
    log: CommandLog,
    scene: RenderSceneId,
    ship: RenderObjectId,
    stars: Vec<Star>,
    ship_angle: f32,
    minimap: RenderTextureId,
}

impl ScrollerApp {
    fn new(config: EngineConfig, start: Instant) -> Result<Self, ScrollerError> {
        log::info!("Creating scroller demo...");
        let log = CommandLog::new();
        let mut renderer = Renderer::with_config(
            Box::new(HeadlessBackend::new(log.clone())),
            Box::new(HeadlessWindowProvider::new(log.clone())),
            config,
        );

        let window = renderer.create_window(VideoMode::new(800, 600), "Scroller")?;
        renderer.set_window_visibility(window, true)?;
        renderer.set_window_desired_fps_at(window, 60.0, start)?;

        let minimap = renderer.create_render_texture(128, 96)?;
        renderer.set_target_desired_fps_at(minimap, 10.0, start)?;
        renderer.set_target_clear_colour(minimap, [0.0, 0.0, 0.2, 1.0])?;

        let quad = renderer.create_mesh(&MeshData::unit_quad())?;
        let star_texture = renderer.create_texture(&Image::from_pixel(2, 2, image_pixel(255)))?;
        let ship_texture = renderer.create_texture(&Image::from_pixel(8, 8, image_pixel(200)))?;
        let star_property = renderer.create_property(quad, star_texture)?;
        let ship_property = renderer.create_property(quad, ship_texture)?;

        let scene = renderer.create_scene()?;
        let program = renderer.create_default_program()?;

        let camera = renderer.create_camera()?;
        renderer.set_camera_orthographic(camera, -4.0, 4.0, -3.0, 3.0)?;
        let viewport = renderer.create_viewport()?;
        renderer.set_viewport_rect(viewport, 0, 0, 800, 600)?;
        renderer.create_stage(window, viewport, scene, camera, program)?;

        let map_camera = renderer.create_camera()?;
        renderer.set_camera_orthographic(map_camera, -8.0, 8.0, -6.0, 6.0)?;
        let map_viewport = renderer.create_viewport()?;
        renderer.set_viewport_rect(map_viewport, 0, 0, 128, 96)?;
        renderer.create_stage(minimap, map_viewport, scene, map_camera, program)?;

        let mut rng = StdRng::seed_from_u64(7);
        let mut stars = Vec::with_capacity(STAR_COUNT);
        for _ in 0..STAR_COUNT {
            let object = renderer.create_object(scene, star_property)?;
            let star = Star {
                object,
                x: rng.gen_range(-4.0..4.0),
                y: rng.gen_range(-3.0..3.0),
                speed: rng.gen_range(0.5..1.5) * SCROLL_SPEED,
            };
            renderer.set_object_position(scene, object, star.x, star.y, false)?;
            renderer.set_object_layer(scene, object, -0.5)?;
            stars.push(star);
        }

        let ship = renderer.create_object(scene, ship_property)?;
        renderer.set_object_layer(scene, ship, 0.5)?;

        Ok(Self {
            renderer,
            log,
            scene,
            ship,
            stars,
            ship_angle: 0.0,
            minimap,
        })
    }

    /// Advance the simulation by one tick covering `[tick_start, tick_start + TICK]`
    fn tick(&mut self, tick_start: Instant) -> Result<(), ScrollerError> {
        self.renderer.update_time(tick_start, tick_start + TICK);

        let dt = TICK.as_secs_f32();
        for star in &mut self.stars {
            star.x -= star.speed * dt;
            // Wrapping teleports the star instead of sliding it across the screen.
            let wrapped = star.x < -4.0;
            if wrapped {
                star.x += 8.0;
            }
            self.renderer
                .set_object_position(self.scene, star.object, star.x, star.y, !wrapped)?;
        }

        self.ship_angle += 0.6 * dt;
        self.renderer
            .set_object_rotation(self.scene, self.ship, self.ship_angle, true)?;
        Ok(())
    }

    fn run(&mut self, start: Instant) -> Result<(), ScrollerError> {
        log::info!("Running {:?} of simulated time", RUN_TIME);
        let mut next_tick = start;
        let mut now = start;
        while now < start + RUN_TIME {
            if now >= next_tick {
                self.tick(next_tick)?;
                next_tick += TICK;
            }
            self.renderer.step(now);
            now += FRAME_STEP;
        }
        self.renderer.flush();
        Ok(())
    }

    fn report(&self) {
        let stats = self.renderer.stats();
        let minimap_passes = self
            .renderer
            .render_texture(self.minimap)
            .map(|texture| self.log.texture_passes(texture.handle()))
            .unwrap_or_default();

        log::info!("Window frames:  {}", self.log.swaps("Scroller"));
        log::info!("Minimap frames: {}", minimap_passes);
        log::info!("Draw calls:     {}", self.log.draws().len());
        log::info!("Frame stats:    {:?}", stats);
    }
}

fn image_pixel(value: u8) -> ImagePixel {
    ImagePixel::from([value, value, value, 255])
}

/// First settings file present in `dir`, falling back to the TOML name
fn config_path(dir: &Path) -> PathBuf {
    CONFIG_PATHS
        .iter()
        .map(|name| dir.join(name))
        .find(|path| path.exists())
        .unwrap_or_else(|| dir.join(CONFIG_PATHS[0]))
}

fn main() -> Result<(), ScrollerError> {
    let config = EngineConfig::load_or_default(config_path(Path::new(".")))?;
    logging::init_with_filter(&config.log_filter);

    let start = Instant::now();
    let mut app = ScrollerApp::new(config, start)?;
    app.run(start)?;
    app.report();

    log::info!("Scroller demo finished");
    Ok(())
}
