//! Per-tick orchestration: pose in, role-tagged geometry out.
//!
//! A [`FrameDriver`] owns the level and the bookkeeping needed to keep a
//! renderer's scene in sync with a moving pose. Each [`FrameDriver::tick`]
//! computes every scene change first and applies them only once the whole
//! computation succeeded, so a corrupt map never leaves a half-updated scene.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::bsp::{ExploreKind, ExploreStep, Exploration, Order};
use crate::map::MapModel;
use crate::scene::{Role, Scene, SceneOp, SceneUpdater, Shape};
use crate::{FieldOfView, Line, MapError, Pose};

/// How the traversal is tied to the render loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Mode {
    /// Full query once per tick, only the final result is shown.
    #[default]
    Live,
    /// One node per paced step, with partition markers.
    Explore,
}

impl Mode {
    pub fn toggled(self) -> Self {
        match self {
            Mode::Live => Mode::Explore,
            Mode::Explore => Mode::Live,
        }
    }
}

/// Which segments live mode displays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum VisibilityScope {
    /// Walls of the subsector containing the player.
    #[default]
    CurrentLeaf,
    /// Walls of every subsector, front to back, clipped to the view cone.
    FieldOfView,
}

impl VisibilityScope {
    pub fn toggled(self) -> Self {
        match self {
            VisibilityScope::CurrentLeaf => VisibilityScope::FieldOfView,
            VisibilityScope::FieldOfView => VisibilityScope::CurrentLeaf,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DriverConfig {
    pub mode: Mode,
    pub scope: VisibilityScope,
    pub explore: ExploreKind,
    /// Delay between two exploration steps.
    pub step_interval_ms: u64,
    pub fov_degrees: f64,
    pub fov_ray_length: f64,
    pub player_radius: f64,
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self {
            mode: Mode::Live,
            scope: VisibilityScope::CurrentLeaf,
            explore: ExploreKind::Descend,
            step_interval_ms: 1000,
            fov_degrees: 90.0,
            fov_ray_length: 1024.0,
            player_radius: 25.0,
        }
    }
}

impl DriverConfig {
    pub fn step_interval(&self) -> Duration {
        Duration::from_millis(self.step_interval_ms)
    }

    pub fn field_of_view(&self) -> FieldOfView {
        FieldOfView::new(self.fov_degrees, self.fov_ray_length)
    }
}

/// Fires once every `interval` of accumulated frame time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pacer {
    interval: Duration,
    elapsed: Duration,
}

impl Pacer {
    /// A pacer that is ready on its first `advance`.
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            elapsed: interval,
        }
    }

    /// Adds frame time and reports whether a step is due.
    ///
    /// Stays due until [`Pacer::reset`] is called.
    pub fn advance(&mut self, dt: Duration) -> bool {
        self.elapsed = self.elapsed.saturating_add(dt);
        self.elapsed >= self.interval
    }

    /// Starts waiting for the next interval.
    pub fn reset(&mut self) {
        self.elapsed = Duration::ZERO;
    }

    /// Makes the next `advance` due immediately.
    pub fn prime(&mut self) {
        self.elapsed = self.interval;
    }
}

/// What one tick did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickReport {
    /// Subsector containing the pose.
    pub leaf: usize,
    /// Segments currently shown under [`Role::VisibleSegments`].
    pub visible_segments: usize,
    /// Whether an exploration step was taken.
    pub stepped: bool,
}

struct Computed {
    ops: Vec<SceneOp>,
    exploration: Option<Exploration>,
    explored: Option<Vec<Line>>,
    shown: Option<usize>,
    stepped: bool,
}

pub struct FrameDriver<H> {
    map: MapModel,
    config: DriverConfig,
    fov: FieldOfView,
    updater: SceneUpdater<H>,
    exploration: Option<Exploration>,
    explored: Vec<Line>,
    pacer: Pacer,
    last_leaf: Option<usize>,
    shown: usize,
}

impl<H: Copy> FrameDriver<H> {
    pub fn new(map: MapModel, config: DriverConfig) -> Self {
        Self {
            fov: config.field_of_view(),
            pacer: Pacer::new(config.step_interval()),
            map,
            config,
            updater: SceneUpdater::new(),
            exploration: None,
            explored: Vec::new(),
            last_leaf: None,
            shown: 0,
        }
    }

    pub fn map(&self) -> &MapModel {
        &self.map
    }

    pub fn config(&self) -> &DriverConfig {
        &self.config
    }

    pub fn mode(&self) -> Mode {
        self.config.mode
    }

    pub fn exploration(&self) -> Option<&Exploration> {
        self.exploration.as_ref()
    }

    /// Upserts the full map outline.
    pub fn show_map<S: Scene<Handle = H>>(&mut self, scene: &mut S) -> Result<(), MapError> {
        let lines = self.map.line_def_lines()?;
        self.updater.upsert(scene, Role::Map, Shape::Lines(lines));
        Ok(())
    }

    /// Switches mode, dropping any exploration in progress.
    ///
    /// Leaving exploration removes its partition markers from the scene.
    pub fn set_mode<S: Scene<Handle = H>>(&mut self, mode: Mode, scene: &mut S) {
        if mode == self.config.mode {
            return;
        }
        log::debug!("switching to {mode:?} mode");
        self.config.mode = mode;
        self.exploration = None;
        self.explored.clear();
        self.pacer.prime();
        if mode == Mode::Live {
            for role in Role::PARTITION {
                self.updater.clear(scene, role);
            }
        }
    }

    pub fn set_scope(&mut self, scope: VisibilityScope) {
        self.config.scope = scope;
    }

    /// Runs one animation tick for `pose`, `dt` after the previous one.
    ///
    /// On error the scene and the driver state are left as they were.
    pub fn tick<S: Scene<Handle = H>>(
        &mut self,
        pose: &Pose,
        dt: Duration,
        scene: &mut S,
    ) -> Result<TickReport, MapError> {
        let mut pacer = self.pacer;
        let due = self.config.mode == Mode::Explore && pacer.advance(dt);

        let computed = self.compute(pose, due);
        let (leaf, computed) = match computed {
            Ok(result) => result,
            Err(err) => {
                log::warn!("tick failed, keeping previous scene: {err}");
                return Err(err);
            }
        };

        if self.last_leaf != Some(leaf) {
            log::debug!("viewpoint entered subsector {leaf}");
            self.last_leaf = Some(leaf);
        }
        self.pacer = pacer;
        if computed.stepped {
            self.pacer.reset();
        }
        if let Some(exploration) = computed.exploration {
            self.exploration = Some(exploration);
        }
        if let Some(explored) = computed.explored {
            self.explored = explored;
        }
        if let Some(shown) = computed.shown {
            self.shown = shown;
        }
        self.updater.apply(scene, computed.ops);

        Ok(TickReport {
            leaf,
            visible_segments: self.shown,
            stepped: computed.stepped,
        })
    }

    fn compute(&self, pose: &Pose, due: bool) -> Result<(usize, Computed), MapError> {
        let point = pose.position();
        let leaf = self.map.locate_leaf(point)?;

        let mut ops = vec![
            SceneOp::Upsert(
                Role::Player,
                Shape::Marker {
                    center: point,
                    radius: self.config.player_radius,
                },
            ),
            SceneOp::Upsert(Role::Fov, Shape::Lines(self.fov.rays(pose).to_vec())),
        ];

        let mut computed = match self.config.mode {
            Mode::Live => {
                let lines = self.visible_lines(pose, leaf)?;
                Computed {
                    shown: Some(lines.len()),
                    ops: vec![SceneOp::Upsert(Role::VisibleSegments, Shape::Lines(lines))],
                    exploration: None,
                    explored: None,
                    stepped: false,
                }
            }
            Mode::Explore if due => self.explore_step(pose)?,
            Mode::Explore => Computed {
                ops: Vec::new(),
                exploration: None,
                explored: None,
                shown: None,
                stepped: false,
            },
        };

        ops.append(&mut computed.ops);
        computed.ops = ops;
        Ok((leaf, computed))
    }

    fn visible_lines(&self, pose: &Pose, leaf: usize) -> Result<Vec<Line>, MapError> {
        match self.config.scope {
            VisibilityScope::CurrentLeaf => self.map.segment_lines(leaf),
            VisibilityScope::FieldOfView => {
                let mut lines = Vec::new();
                for subsector in self.map.ordered_leaves(pose.position(), Order::FrontToBack)? {
                    for line in self.map.segment_lines(subsector)? {
                        if self.fov.contains_line(pose, &line) {
                            lines.push(line);
                        }
                    }
                }
                Ok(lines)
            }
        }
    }

    fn explore_step(&self, pose: &Pose) -> Result<Computed, MapError> {
        let (mut exploration, mut explored) = match &self.exploration {
            Some(current) if !current.is_finished() => (current.clone(), self.explored.clone()),
            _ => {
                log::debug!("starting {:?} exploration from the root", self.config.explore);
                (
                    Exploration::new(&self.map, pose.position(), self.config.explore)?,
                    Vec::new(),
                )
            }
        };

        let mut ops = Vec::new();
        let mut shown = None;
        match exploration.step(&self.map)? {
            ExploreStep::Split(markers) => {
                ops.push(SceneOp::Upsert(
                    Role::PartitionLeft,
                    Shape::Lines(markers.left_box.outline()),
                ));
                ops.push(SceneOp::Upsert(
                    Role::PartitionRight,
                    Shape::Lines(markers.right_box.outline()),
                ));
                ops.push(SceneOp::Upsert(
                    Role::PartitionLine,
                    Shape::Lines(vec![markers.partition]),
                ));
            }
            ExploreStep::Leaf(subsector) => {
                explored.extend(self.map.segment_lines(subsector)?);
                shown = Some(explored.len());
                ops.push(SceneOp::Upsert(
                    Role::VisibleSegments,
                    Shape::Lines(explored.clone()),
                ));
            }
            ExploreStep::Finished => {}
        }

        Ok(Computed {
            ops,
            exploration: Some(exploration),
            explored: Some(explored),
            shown,
            stepped: true,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::map::tests::two_leaf_map;
    use crate::map::{GridMapBuilder, NodeRef};
    use crate::scene::MemoryScene;
    use crate::Angle;

    const NO_TIME: Duration = Duration::ZERO;

    fn explore_config(kind: ExploreKind) -> DriverConfig {
        DriverConfig {
            mode: Mode::Explore,
            explore: kind,
            ..Default::default()
        }
    }

    fn pose(x: f64, y: f64) -> Pose {
        Pose::new(x, y, Angle::new(0.0))
    }

    #[test]
    fn pacer_is_ready_first_then_waits() {
        let mut pacer = Pacer::new(Duration::from_millis(1000));
        assert!(pacer.advance(NO_TIME));
        pacer.reset();
        assert!(!pacer.advance(Duration::from_millis(600)));
        assert!(pacer.advance(Duration::from_millis(400)));
        // stays due until reset
        assert!(pacer.advance(NO_TIME));
    }

    #[test]
    fn config_defaults() {
        let config = DriverConfig::default();
        assert_eq!(config.step_interval(), Duration::from_secs(1));
        assert_eq!(config.field_of_view(), FieldOfView::new(90.0, 1024.0));
        assert_eq!(config.player_radius, 25.0);
    }

    #[test]
    fn config_from_partial_json() {
        let config: DriverConfig =
            serde_json::from_str(r#"{"mode": "explore", "scope": "field-of-view", "explore": "walk"}"#)
                .unwrap();
        assert_eq!(config.mode, Mode::Explore);
        assert_eq!(config.scope, VisibilityScope::FieldOfView);
        assert_eq!(config.explore, ExploreKind::Walk);
        assert_eq!(config.step_interval_ms, 1000);
    }

    #[test]
    fn show_map_upserts_once() {
        let mut driver = FrameDriver::new(two_leaf_map(), DriverConfig::default());
        let mut scene = MemoryScene::new();
        driver.show_map(&mut scene).unwrap();
        driver.show_map(&mut scene).unwrap();
        assert_eq!(scene.count(Role::Map), 1);
        assert_eq!(scene.lines(Role::Map).len(), 4);
    }

    #[test]
    fn live_ticks_do_not_leak_geometry() {
        let builder = GridMapBuilder::new(3, 3, 64.0);
        let mut driver = FrameDriver::new(builder.build(), DriverConfig::default());
        let mut scene = MemoryScene::new();

        let first = builder.cell_center(0, 0);
        let report = driver.tick(&pose(first.x, first.y), NO_TIME, &mut scene).unwrap();
        assert_eq!(report.leaf, builder.subsector_of_cell(0, 0));
        assert_eq!(report.visible_segments, 4);
        assert!(!report.stepped);

        let second = builder.cell_center(2, 1);
        let report = driver.tick(&pose(second.x, second.y), NO_TIME, &mut scene).unwrap();
        assert_eq!(report.leaf, builder.subsector_of_cell(2, 1));

        for role in [Role::Player, Role::Fov, Role::VisibleSegments] {
            assert_eq!(scene.count(role), 1, "{role}");
        }
        assert_eq!(
            scene.lines(Role::VisibleSegments),
            driver.map().segment_lines(report.leaf).unwrap().as_slice()
        );
        assert_eq!(
            scene.shape(Role::Player),
            Some(&Shape::Marker {
                center: second,
                radius: 25.0
            })
        );
        assert_eq!(scene.count(Role::PartitionLine), 0);
    }

    #[test]
    fn field_of_view_scope_clips_to_cone() {
        let builder = GridMapBuilder::new(3, 1, 64.0);
        let config = DriverConfig {
            scope: VisibilityScope::FieldOfView,
            ..Default::default()
        };
        let mut driver = FrameDriver::new(builder.build(), config);
        let mut scene = MemoryScene::new();

        let start = builder.start_pose();
        let facing_east = Pose::new(start.x, start.y, Angle::new(0.0));
        let report = driver.tick(&facing_east, NO_TIME, &mut scene).unwrap();

        // beyond the own room: looking down the corridor
        assert!(report.visible_segments > 4);
        let fov = driver.config().field_of_view();
        for line in scene.lines(Role::VisibleSegments) {
            assert!(fov.contains_line(&facing_east, line));
        }

        driver.set_scope(VisibilityScope::CurrentLeaf);
        let report = driver.tick(&facing_east, NO_TIME, &mut scene).unwrap();
        assert_eq!(report.visible_segments, 4);
    }

    #[test]
    fn failed_tick_keeps_scene() {
        let mut map = two_leaf_map();
        map.nodes[0].right_child = NodeRef::Leaf(9);
        let mut driver = FrameDriver::new(map, DriverConfig::default());
        let mut scene = MemoryScene::new();

        driver.tick(&pose(-5.0, 0.0), NO_TIME, &mut scene).unwrap();
        let before = scene.clone();

        assert!(driver.tick(&pose(5.0, 0.0), NO_TIME, &mut scene).is_err());
        assert_eq!(scene.lines(Role::VisibleSegments), before.lines(Role::VisibleSegments));
        assert_eq!(scene.shape(Role::Player), before.shape(Role::Player));
        assert_eq!(scene.len(), before.len());
        assert_eq!(scene.replaced(), before.replaced());
    }

    #[test]
    fn empty_map_fails_tick() {
        let mut driver = FrameDriver::new(MapModel::default(), DriverConfig::default());
        let mut scene = MemoryScene::new();
        assert_eq!(
            driver.tick(&pose(0.0, 0.0), NO_TIME, &mut scene),
            Err(MapError::EmptyTree)
        );
        assert!(scene.is_empty());
    }

    #[test]
    fn failed_tick_keeps_pacing() {
        let mut driver = FrameDriver::new(two_leaf_map(), explore_config(ExploreKind::Descend));
        let mut scene = MemoryScene::new();
        driver.tick(&pose(-5.0, 0.0), NO_TIME, &mut scene).unwrap();
        driver.tick(&pose(-5.0, 0.0), Duration::from_millis(300), &mut scene).unwrap();
        let before = driver.pacer;

        // the right side now points past the subsector list
        driver.map.nodes[0].right_child = NodeRef::Leaf(9);
        assert!(driver.tick(&pose(5.0, 0.0), Duration::from_millis(900), &mut scene).is_err());
        assert_eq!(driver.pacer, before);

        // the failed tick's time did not count towards the next step
        let report = driver.tick(&pose(-5.0, 0.0), Duration::from_millis(600), &mut scene).unwrap();
        assert!(!report.stepped);
    }

    #[test]
    fn exploration_is_paced_and_restarts() {
        let mut driver = FrameDriver::new(two_leaf_map(), explore_config(ExploreKind::Descend));
        let mut scene = MemoryScene::new();
        let here = pose(5.0, 0.0);
        let half = Duration::from_millis(500);

        // first step is immediate
        let report = driver.tick(&here, NO_TIME, &mut scene).unwrap();
        assert!(report.stepped);
        assert_eq!(scene.lines(Role::PartitionLine).len(), 1);
        assert_eq!(scene.lines(Role::PartitionLeft).len(), 4);
        assert_eq!(scene.lines(Role::PartitionRight).len(), 4);
        assert_eq!(scene.count(Role::VisibleSegments), 0);

        assert!(!driver.tick(&here, half, &mut scene).unwrap().stepped);
        let report = driver.tick(&here, half, &mut scene).unwrap();
        assert!(report.stepped);
        assert_eq!(report.visible_segments, 3);
        assert_eq!(
            scene.lines(Role::VisibleSegments),
            driver.map().segment_lines(1).unwrap().as_slice()
        );
        assert!(driver.exploration().is_some_and(Exploration::is_finished));

        // next paced step starts over from the root
        driver.tick(&here, Duration::from_secs(1), &mut scene).unwrap();
        assert!(driver.exploration().is_some_and(|e| !e.is_finished()));
        for role in Role::PARTITION {
            assert_eq!(scene.count(role), 1, "{role}");
        }
        // the previous result stays on screen until the next leaf
        assert_eq!(report.visible_segments, scene.lines(Role::VisibleSegments).len());
    }

    #[test]
    fn walk_accumulates_every_leaf() {
        let map = GridMapBuilder::new(2, 2, 64.0).build();
        let total_segs = map.segs.len();
        let node_count = map.nodes.len();
        let mut driver = FrameDriver::new(map, explore_config(ExploreKind::Walk));
        let mut scene = MemoryScene::new();
        let here = pose(10.0, 10.0);

        let mut steps = 0;
        while !driver.exploration().is_some_and(Exploration::is_finished) {
            assert!(driver.tick(&here, Duration::from_secs(1), &mut scene).unwrap().stepped);
            steps += 1;
        }
        assert_eq!(steps, node_count + 4);
        assert_eq!(scene.lines(Role::VisibleSegments).len(), total_segs);
        assert_eq!(scene.count(Role::VisibleSegments), 1);
    }

    #[test]
    fn switching_to_live_clears_partition_markers() {
        let mut driver = FrameDriver::new(two_leaf_map(), explore_config(ExploreKind::Descend));
        let mut scene = MemoryScene::new();
        driver.tick(&pose(-5.0, 0.0), NO_TIME, &mut scene).unwrap();
        assert_eq!(scene.count(Role::PartitionLine), 1);

        driver.set_mode(Mode::Live, &mut scene);
        assert!(driver.exploration().is_none());
        for role in Role::PARTITION {
            assert_eq!(scene.count(role), 0, "{role}");
        }

        let report = driver.tick(&pose(-5.0, 0.0), NO_TIME, &mut scene).unwrap();
        assert_eq!(report.leaf, 0);
        assert_eq!(report.visible_segments, 3);
    }
}
