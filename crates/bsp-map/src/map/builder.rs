//! Generated levels for demos and tests.

use nalgebra::{Point2, Vector2};

use super::{LineDef, MapModel, Node, NodeRef, Segment, Subsector, Vertex};
use crate::{Angle, BoundingBox, Pose};

/// Builds a level made of a grid of square rooms, each room one subsector.
///
/// The tree splits the cell range in half along its longer axis until a
/// single cell remains. Vertical partitions point along +y and horizontal
/// ones along -x, so the lower-coordinate half is always the `Left` child.
/// Nodes are stored post-order: the root ends up last.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridMapBuilder {
    columns: usize,
    rows: usize,
    cell_size: f64,
    origin: Point2<f64>,
}

impl GridMapBuilder {
    /// # Panics
    /// Panics if `columns` or `rows` is zero.
    pub fn new(columns: usize, rows: usize, cell_size: f64) -> Self {
        assert!(columns > 0 && rows > 0, "grid needs at least one cell");
        Self {
            columns,
            rows,
            cell_size,
            origin: Point2::origin(),
        }
    }

    /// Moves the bottom-left corner of the grid.
    pub fn with_origin(mut self, origin: Point2<f64>) -> Self {
        self.origin = origin;
        self
    }

    pub fn cell_center(&self, column: usize, row: usize) -> Point2<f64> {
        self.origin
            + Vector2::new(
                (column as f64 + 0.5) * self.cell_size,
                (row as f64 + 0.5) * self.cell_size,
            )
    }

    /// Subsector index assigned to a cell.
    pub fn subsector_of_cell(&self, column: usize, row: usize) -> usize {
        row * self.columns + column
    }

    /// A pose in the middle of the bottom-left room, facing +y.
    pub fn start_pose(&self) -> Pose {
        let center = self.cell_center(0, 0);
        Pose::new(center.x, center.y, Angle::new(90.0))
    }

    fn vertex_index(&self, column: usize, row: usize) -> usize {
        row * (self.columns + 1) + column
    }

    fn corner(&self, column: usize, row: usize) -> Point2<f64> {
        self.origin + Vector2::new(column as f64, row as f64) * self.cell_size
    }

    fn bbox(&self, columns: (usize, usize), rows: (usize, usize)) -> BoundingBox {
        let low = self.corner(columns.0, rows.0);
        let high = self.corner(columns.1, rows.1);
        BoundingBox::new(high.y, low.y, low.x, high.x)
    }

    pub fn build(&self) -> MapModel {
        let mut vertexes = Vec::with_capacity((self.columns + 1) * (self.rows + 1));
        for row in 0..=self.rows {
            for column in 0..=self.columns {
                let p = self.corner(column, row);
                vertexes.push(Vertex::new(p.x, p.y));
            }
        }

        // every grid edge once, horizontal then vertical
        let mut line_defs = Vec::new();
        for row in 0..=self.rows {
            for column in 0..self.columns {
                line_defs.push(LineDef {
                    start_vertex: self.vertex_index(column, row),
                    end_vertex: self.vertex_index(column + 1, row),
                });
            }
        }
        for column in 0..=self.columns {
            for row in 0..self.rows {
                line_defs.push(LineDef {
                    start_vertex: self.vertex_index(column, row),
                    end_vertex: self.vertex_index(column, row + 1),
                });
            }
        }

        // four walls per room, counter-clockwise
        let mut segs = Vec::with_capacity(self.columns * self.rows * 4);
        let mut ssectors = Vec::with_capacity(self.columns * self.rows);
        for row in 0..self.rows {
            for column in 0..self.columns {
                let corners = [
                    self.vertex_index(column, row),
                    self.vertex_index(column + 1, row),
                    self.vertex_index(column + 1, row + 1),
                    self.vertex_index(column, row + 1),
                ];
                ssectors.push(Subsector {
                    first_seg: segs.len(),
                    seg_count: 4,
                });
                for i in 0..4 {
                    segs.push(Segment {
                        start_vertex: corners[i],
                        end_vertex: corners[(i + 1) % 4],
                    });
                }
            }
        }

        let mut nodes = Vec::new();
        self.split((0, self.columns), (0, self.rows), &mut nodes);

        MapModel::new(vertexes, line_defs, segs, ssectors, nodes)
    }

    fn split(&self, columns: (usize, usize), rows: (usize, usize), nodes: &mut Vec<Node>) -> NodeRef {
        let width = columns.1 - columns.0;
        let height = rows.1 - rows.0;
        if width == 1 && height == 1 {
            return NodeRef::Leaf(self.subsector_of_cell(columns.0, rows.0));
        }

        let (origin, change, low, high) = if width >= height {
            let mid = columns.0 + width / 2;
            (
                self.corner(mid, rows.0),
                Vector2::new(0.0, height as f64 * self.cell_size),
                ((columns.0, mid), rows),
                ((mid, columns.1), rows),
            )
        } else {
            let mid = rows.0 + height / 2;
            (
                self.corner(columns.1, mid),
                Vector2::new(-(width as f64) * self.cell_size, 0.0),
                (columns, (rows.0, mid)),
                (columns, (mid, rows.1)),
            )
        };

        let left_child = self.split(low.0, low.1, nodes);
        let right_child = self.split(high.0, high.1, nodes);
        nodes.push(Node {
            x_partition: origin.x,
            y_partition: origin.y,
            change_x_partition: change.x,
            change_y_partition: change.y,
            left_child,
            right_child,
            left_box: self.bbox(low.0, low.1),
            right_box: self.bbox(high.0, high.1),
        });
        NodeRef::Node(nodes.len() - 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Side;

    #[test]
    fn single_cell_has_no_nodes() {
        let map = GridMapBuilder::new(1, 1, 64.0).build();
        assert!(map.nodes.is_empty());
        assert_eq!(map.ssectors.len(), 1);
        assert_eq!(map.segs.len(), 4);
    }

    #[test]
    fn counts_match_grid() {
        let map = GridMapBuilder::new(3, 2, 64.0).build();
        assert_eq!(map.vertexes.len(), 4 * 3);
        assert_eq!(map.line_defs.len(), 3 * 3 + 4 * 2);
        assert_eq!(map.ssectors.len(), 6);
        assert_eq!(map.segs.len(), 24);
        // a full binary tree over n leaves has n - 1 interior nodes
        assert_eq!(map.nodes.len(), 5);
        assert_eq!(map.validate(), Ok(()));
    }

    #[test]
    fn bounds_follow_origin() {
        let map = GridMapBuilder::new(2, 3, 10.0)
            .with_origin(Point2::new(-100.0, 50.0))
            .build();
        assert_eq!((map.x_min, map.x_max), (-100.0, -80.0));
        assert_eq!((map.y_min, map.y_max), (50.0, 80.0));
    }

    #[test]
    fn child_boxes_sit_on_their_side() {
        let map = GridMapBuilder::new(5, 4, 32.0).build();
        for node in &map.nodes {
            assert_eq!(node.side_of(node.left_box.center()), Side::Left);
            assert_eq!(node.side_of(node.right_box.center()), Side::Right);
        }
    }

    #[test]
    fn start_pose_is_inside_first_room() {
        let builder = GridMapBuilder::new(3, 3, 64.0);
        let map = builder.build();
        let pose = builder.start_pose();
        assert_eq!(map.locate_leaf(pose.position()), Ok(builder.subsector_of_cell(0, 0)));
    }
}
