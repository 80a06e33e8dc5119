//! Incremental scene updates keyed by display role.
//!
//! Every displayable group has exactly one [`Role`]. A [`SceneUpdater`]
//! remembers the handle of the object created for each role and replaces
//! that object's geometry on later updates, so repeated frames never pile up
//! duplicate draw objects.

use std::collections::HashMap;

use nalgebra::Point2;

use crate::Line;

/// Stable tag of a displayable group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Role {
    Map,
    Player,
    Fov,
    PartitionLeft,
    PartitionRight,
    PartitionLine,
    VisibleSegments,
}

impl Role {
    pub const ALL: [Role; 7] = [
        Role::Map,
        Role::Player,
        Role::Fov,
        Role::PartitionLeft,
        Role::PartitionRight,
        Role::PartitionLine,
        Role::VisibleSegments,
    ];

    /// The partition marker roles, cleared together when leaving exploration.
    pub const PARTITION: [Role; 3] = [Role::PartitionLeft, Role::PartitionRight, Role::PartitionLine];

    pub fn name(self) -> &'static str {
        match self {
            Role::Map => "map",
            Role::Player => "player",
            Role::Fov => "fov",
            Role::PartitionLeft => "partition-left",
            Role::PartitionRight => "partition-right",
            Role::PartitionLine => "partition-line",
            Role::VisibleSegments => "visible-segments",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Geometry of one display object.
#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    Lines(Vec<Line>),
    Marker { center: Point2<f64>, radius: f64 },
}

/// A retained-mode scene owned by the renderer.
pub trait Scene {
    type Handle: Copy;

    /// Adds a new object and returns its handle.
    fn insert(&mut self, role: Role, shape: Shape) -> Self::Handle;

    /// Replaces the geometry of an existing object in place.
    fn replace(&mut self, handle: Self::Handle, shape: Shape);

    fn remove(&mut self, handle: Self::Handle);
}

/// One pending change to the scene.
#[derive(Debug, Clone, PartialEq)]
pub enum SceneOp {
    Upsert(Role, Shape),
    Clear(Role),
}

/// Maps each role to the scene object currently displaying it.
#[derive(Debug, Clone)]
pub struct SceneUpdater<H> {
    handles: HashMap<Role, H>,
}

impl<H> Default for SceneUpdater<H> {
    fn default() -> Self {
        Self {
            handles: HashMap::new(),
        }
    }
}

impl<H: Copy> SceneUpdater<H> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates the object for `role` on first use, replaces its geometry after.
    pub fn upsert<S>(&mut self, scene: &mut S, role: Role, shape: Shape)
    where
        S: Scene<Handle = H>,
    {
        match self.handles.get(&role) {
            Some(&handle) => scene.replace(handle, shape),
            None => {
                let handle = scene.insert(role, shape);
                self.handles.insert(role, handle);
            }
        }
    }

    /// Removes the object for `role`, if any.
    pub fn clear<S>(&mut self, scene: &mut S, role: Role)
    where
        S: Scene<Handle = H>,
    {
        if let Some(handle) = self.handles.remove(&role) {
            scene.remove(handle);
        }
    }

    pub fn apply<S>(&mut self, scene: &mut S, ops: Vec<SceneOp>)
    where
        S: Scene<Handle = H>,
    {
        for op in ops {
            match op {
                SceneOp::Upsert(role, shape) => self.upsert(scene, role, shape),
                SceneOp::Clear(role) => self.clear(scene, role),
            }
        }
    }

    pub fn handle(&self, role: Role) -> Option<H> {
        self.handles.get(&role).copied()
    }

    /// Forgets every handle without touching the scene.
    ///
    /// Use after the renderer has rebuilt its scene from scratch.
    pub fn reset(&mut self) {
        self.handles.clear();
    }
}

/// Headless scene that keeps objects in memory.
///
/// Slots freed by [`Scene::remove`] are handed out again by the next insert.
#[derive(Debug, Clone, Default)]
pub struct MemoryScene {
    objects: Vec<Option<(Role, Shape)>>,
    free: Vec<usize>,
    replaced: usize,
}

impl MemoryScene {
    pub fn new() -> Self {
        Self::default()
    }

    /// Live objects in insertion slot order.
    pub fn iter(&self) -> impl Iterator<Item = (Role, &Shape)> {
        self.objects.iter().flatten().map(|(role, shape)| (*role, shape))
    }

    /// Number of live objects tagged with `role`.
    pub fn count(&self, role: Role) -> usize {
        self.iter().filter(|(tag, _)| *tag == role).count()
    }

    /// Total live objects.
    pub fn len(&self) -> usize {
        self.iter().count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Geometry of the first live object tagged with `role`.
    pub fn shape(&self, role: Role) -> Option<&Shape> {
        self.iter().find(|(tag, _)| *tag == role).map(|(_, shape)| shape)
    }

    /// Lines of the object tagged with `role`; empty for markers or absent roles.
    pub fn lines(&self, role: Role) -> &[Line] {
        match self.shape(role) {
            Some(Shape::Lines(lines)) => lines,
            _ => &[],
        }
    }

    /// How many in-place replacements have happened.
    pub fn replaced(&self) -> usize {
        self.replaced
    }
}

impl Scene for MemoryScene {
    type Handle = usize;

    fn insert(&mut self, role: Role, shape: Shape) -> usize {
        if let Some(handle) = self.free.pop() {
            self.objects[handle] = Some((role, shape));
            return handle;
        }
        self.objects.push(Some((role, shape)));
        self.objects.len() - 1
    }

    fn replace(&mut self, handle: usize, shape: Shape) {
        if let Some(Some((_, current))) = self.objects.get_mut(handle) {
            *current = shape;
            self.replaced += 1;
        }
    }

    fn remove(&mut self, handle: usize) {
        if let Some(slot) = self.objects.get_mut(handle) {
            if slot.take().is_some() {
                self.free.push(handle);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(x: f64) -> Line {
        Line::new(Point2::new(x, 0.0), Point2::new(x, 1.0))
    }

    #[test]
    fn second_upsert_replaces_first() {
        let mut scene = MemoryScene::new();
        let mut updater = SceneUpdater::new();

        updater.upsert(&mut scene, Role::VisibleSegments, Shape::Lines(vec![line(1.0)]));
        updater.upsert(&mut scene, Role::VisibleSegments, Shape::Lines(vec![line(2.0), line(3.0)]));

        assert_eq!(scene.count(Role::VisibleSegments), 1);
        assert_eq!(scene.lines(Role::VisibleSegments), &[line(2.0), line(3.0)]);
        assert_eq!(scene.replaced(), 1);
    }

    #[test]
    fn roles_are_independent() {
        let mut scene = MemoryScene::new();
        let mut updater = SceneUpdater::new();

        for role in Role::ALL {
            updater.upsert(&mut scene, role, Shape::Lines(Vec::new()));
            updater.upsert(&mut scene, role, Shape::Lines(vec![line(0.0)]));
        }
        assert_eq!(scene.len(), Role::ALL.len());
        for role in Role::ALL {
            assert_eq!(scene.count(role), 1, "{role}");
        }
    }

    #[test]
    fn clear_removes_and_next_upsert_recreates() {
        let mut scene = MemoryScene::new();
        let mut updater = SceneUpdater::new();
        let marker = Shape::Marker {
            center: Point2::new(1.0, 2.0),
            radius: 25.0,
        };

        updater.upsert(&mut scene, Role::Player, marker.clone());
        updater.clear(&mut scene, Role::Player);
        assert_eq!(scene.count(Role::Player), 0);
        assert_eq!(updater.handle(Role::Player), None);

        // clearing twice is a no-op
        updater.clear(&mut scene, Role::Player);

        updater.upsert(&mut scene, Role::Player, marker.clone());
        assert_eq!(scene.count(Role::Player), 1);
        assert_eq!(scene.shape(Role::Player), Some(&marker));
    }

    #[test]
    fn removed_slots_are_reused() {
        let mut scene = MemoryScene::new();
        let mut updater = SceneUpdater::new();
        updater.upsert(&mut scene, Role::Map, Shape::Lines(vec![line(0.0)]));

        for round in 0..50 {
            for role in Role::PARTITION {
                updater.upsert(&mut scene, role, Shape::Lines(vec![line(round as f64)]));
            }
            for role in Role::PARTITION {
                updater.clear(&mut scene, role);
            }
        }
        assert_eq!(scene.objects.len(), 1 + Role::PARTITION.len());
        assert_eq!(scene.len(), 1);
        assert_eq!(scene.lines(Role::Map), &[line(0.0)]);

        // removing twice must not hand the slot out twice
        let handle = scene.insert(Role::Fov, Shape::Lines(Vec::new()));
        scene.remove(handle);
        scene.remove(handle);
        let first = scene.insert(Role::Fov, Shape::Lines(Vec::new()));
        let second = scene.insert(Role::Player, Shape::Lines(Vec::new()));
        assert_ne!(first, second);
        assert_eq!(scene.iter().count(), 3);
    }

    #[test]
    fn apply_runs_ops_in_order() {
        let mut scene = MemoryScene::new();
        let mut updater = SceneUpdater::new();
        updater.apply(
            &mut scene,
            vec![
                SceneOp::Upsert(Role::PartitionLine, Shape::Lines(vec![line(1.0)])),
                SceneOp::Upsert(Role::PartitionLeft, Shape::Lines(vec![line(2.0)])),
                SceneOp::Clear(Role::PartitionLine),
                SceneOp::Upsert(Role::PartitionLeft, Shape::Lines(vec![line(3.0)])),
            ],
        );
        assert_eq!(scene.count(Role::PartitionLine), 0);
        assert_eq!(scene.lines(Role::PartitionLeft), &[line(3.0)]);
        assert_eq!(scene.len(), 1);
    }

    #[test]
    fn role_names_are_kebab_case() {
        assert_eq!(Role::PartitionLeft.name(), "partition-left");
        assert_eq!(Role::VisibleSegments.to_string(), "visible-segments");
    }
}
