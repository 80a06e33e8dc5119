use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use bsp_map::bsp::ExploreKind;
use bsp_map::{
    Angle, DriverConfig, FrameDriver, GridMapBuilder, MapModel, Mode, Pose, VisibilityScope,
};
use bsp_viz::{MacroquadScene, PlayerController, Viewport};
use clap::{Parser, ValueEnum};
use macroquad::prelude::*;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ModeArg {
    Live,
    Explore,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ScopeArg {
    CurrentLeaf,
    FieldOfView,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ExploreArg {
    Descend,
    Walk,
}

/// Interactive viewer for BSP map traversal.
#[derive(Debug, Parser)]
#[command(version, about)]
struct Args {
    /// Map model as JSON. A generated grid level is used when absent.
    #[arg(long)]
    map: Option<PathBuf>,

    /// Driver configuration as JSON.
    #[arg(long)]
    config: Option<PathBuf>,

    #[arg(long, value_enum)]
    mode: Option<ModeArg>,

    #[arg(long, value_enum)]
    scope: Option<ScopeArg>,

    #[arg(long, value_enum)]
    explore: Option<ExploreArg>,

    /// Delay between exploration steps in milliseconds.
    #[arg(long)]
    step_ms: Option<u64>,

    /// Field of view width in degrees.
    #[arg(long)]
    fov: Option<f64>,

    /// Columns of the generated grid level.
    #[arg(long, default_value_t = 6)]
    columns: usize,

    /// Rows of the generated grid level.
    #[arg(long, default_value_t = 4)]
    rows: usize,

    #[arg(long, default_value_t = 256.0)]
    cell_size: f64,
}

impl Args {
    fn driver_config(&self) -> Result<DriverConfig> {
        let mut config = match &self.config {
            Some(path) => serde_json::from_str(&read(path)?)
                .with_context(|| format!("parsing config {}", path.display()))?,
            None => DriverConfig::default(),
        };

        if let Some(mode) = self.mode {
            config.mode = match mode {
                ModeArg::Live => Mode::Live,
                ModeArg::Explore => Mode::Explore,
            };
        }
        if let Some(scope) = self.scope {
            config.scope = match scope {
                ScopeArg::CurrentLeaf => VisibilityScope::CurrentLeaf,
                ScopeArg::FieldOfView => VisibilityScope::FieldOfView,
            };
        }
        if let Some(explore) = self.explore {
            config.explore = match explore {
                ExploreArg::Descend => ExploreKind::Descend,
                ExploreArg::Walk => ExploreKind::Walk,
            };
        }
        if let Some(step_ms) = self.step_ms {
            config.step_interval_ms = step_ms;
        }
        if let Some(fov) = self.fov {
            config.fov_degrees = fov;
        }
        Ok(config)
    }

    /// Loads the level and picks a start pose inside it.
    fn level(&self) -> Result<(MapModel, Pose)> {
        match &self.map {
            Some(path) => {
                let map: MapModel = serde_json::from_str(&read(path)?)
                    .with_context(|| format!("parsing map {}", path.display()))?;
                let center = map.bounds().center();
                Ok((map, Pose::new(center.x, center.y, Angle::new(90.0))))
            }
            None => {
                anyhow::ensure!(
                    self.columns > 0 && self.rows > 0,
                    "grid needs at least one column and one row"
                );
                let builder = GridMapBuilder::new(self.columns, self.rows, self.cell_size);
                Ok((builder.build(), builder.start_pose()))
            }
        }
    }
}

fn read(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))
}

fn window_conf() -> Conf {
    Conf {
        window_title: "BSP Map Viewer".to_owned(),
        window_width: 1280,
        window_height: 800,
        ..Default::default()
    }
}

async fn run(args: Args) -> Result<()> {
    let config = args.driver_config()?;
    let (map, start) = args.level()?;
    map.validate().context("map failed validation")?;
    log::info!(
        "loaded map: {} vertexes, {} segs, {} subsectors, {} nodes",
        map.vertexes.len(),
        map.segs.len(),
        map.ssectors.len(),
        map.nodes.len()
    );

    let mut scene = MacroquadScene::new();
    let mut driver = FrameDriver::new(map, config);
    driver.show_map(&mut scene)?;
    let mut controller = PlayerController::new(start);

    let mut report = None;
    let mut error: Option<String> = None;

    loop {
        if is_key_pressed(KeyCode::Escape) {
            break;
        }
        if is_key_pressed(KeyCode::Tab) {
            let mode = driver.mode().toggled();
            driver.set_mode(mode, &mut scene);
        }
        if is_key_pressed(KeyCode::V) {
            let scope = driver.config().scope.toggled();
            driver.set_scope(scope);
        }

        let dt = get_frame_time();
        controller.update(dt);
        match driver.tick(controller.pose(), Duration::from_secs_f32(dt), &mut scene) {
            Ok(tick) => {
                report = Some(tick);
                error = None;
            }
            Err(err) => error = Some(err.to_string()),
        }

        clear_background(Color::from_rgba(20, 20, 30, 255));
        let viewport = Viewport::fit(driver.map().bounds(), screen_width(), screen_height(), 40.0);
        scene.draw(&viewport);
        controller.draw_ui(&driver, report, error.as_deref(), 25.0);

        next_frame().await
    }

    log::info!("viewer closed");
    Ok(())
}

#[macroquad::main(window_conf)]
async fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    if let Err(err) = run(args).await {
        log::error!("{err:#}");
        std::process::exit(1);
    }
}
