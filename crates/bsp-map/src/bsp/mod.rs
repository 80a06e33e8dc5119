//! Binary Space Partitioning queries over a map's node array.
//!
//! This module answers two questions for a viewpoint:
//!
//! - Which subsector contains it ([`locate_leaf`], O(depth))
//! - In which order are the subsectors reached when walking the tree
//!   near-side first ([`traverse_ordered`], O(nodes))
//!
//! # Example
//!
//! ```
//! use bsp_map::bsp::CollectingVisitor;
//! use bsp_map::GridMapBuilder;
//! use nalgebra::Point2;
//!
//! let map = GridMapBuilder::new(4, 4, 64.0).build();
//! let eye = Point2::new(100.0, 100.0);
//!
//! let here = map.locate_leaf(eye).unwrap();
//!
//! let mut visitor = CollectingVisitor::new();
//! map.traverse_ordered(eye, &mut visitor).unwrap();
//! assert_eq!(visitor.subsectors()[0], here);
//! ```
//!
//! # Architecture
//!
//! - [`locate_leaf`] / [`ordered_leaves`]: the walks themselves, over `&[Node]`
//! - [`LeafVisitor`]: visitor trait for custom per-leaf behavior
//! - [`Exploration`]: the same walk split into externally paced steps
//!
//! The root is passed explicitly to the free functions; the methods on
//! [`MapModel`](crate::MapModel) use the last node, as stored by node
//! builders.

mod explore;
mod traverse;
mod visitor;

pub use explore::{ExploreKind, ExploreStep, Exploration, SplitMarkers};
pub use traverse::{locate_leaf, ordered_leaves, traverse_back_to_front, traverse_ordered, Order};
pub use visitor::{CollectingVisitor, FnVisitor, LeafVisitor};
