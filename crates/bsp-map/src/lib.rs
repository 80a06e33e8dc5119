//! BSP visibility queries over classic FPS level data.
//!
//! The crate takes an already parsed level ([`MapModel`]) and a moving
//! [`Pose`], finds the subsector the pose is in, walks the tree front to
//! back, and keeps a renderer's scene in sync through role-tagged upserts.

mod angle;
pub mod bsp;
pub mod driver;
mod error;
mod fov;
pub mod map;
mod partition;
mod pose;
mod resolver;
pub mod scene;

pub use angle::{Angle, ANGLE_EPSILON};
pub use driver::{DriverConfig, FrameDriver, Mode, Pacer, TickReport, VisibilityScope};
pub use error::{Corruption, Lump, MapError};
pub use fov::FieldOfView;
pub use map::{
    is_subsector, to_subsector_index, GridMapBuilder, LineDef, MapModel, Node, NodeRef, Segment,
    Subsector, Vertex,
};
pub use partition::{BoundingBox, Line, Partition, Side};
pub use pose::Pose;
pub use scene::{MemoryScene, Role, Scene, SceneOp, SceneUpdater, Shape};
