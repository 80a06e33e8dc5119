//! Turning subsector indices into wall geometry.

use crate::map::{MapModel, Segment};
use crate::{Corruption, Line, Lump, MapError};

impl MapModel {
    /// The segments owned by `subsector`, as a slice of `segs`.
    ///
    /// A caller-supplied index past the end is `OutOfRange`; a stored range
    /// running past the end of `segs` is corruption.
    pub fn segments_of(&self, subsector: usize) -> Result<&[Segment], MapError> {
        let range = self.stored_seg_range(subsector)?;
        Ok(&self.segs[range])
    }

    /// Map-space lines of the segments owned by `subsector`.
    pub fn segment_lines(&self, subsector: usize) -> Result<Vec<Line>, MapError> {
        self.segments_of(subsector)?
            .iter()
            .map(|seg| self.seg_line(seg))
            .collect()
    }

    pub(crate) fn seg_line(&self, seg: &Segment) -> Result<Line, MapError> {
        let start = self.vertex(seg.start_vertex, Lump::Segs)?;
        let end = self.vertex(seg.end_vertex, Lump::Segs)?;
        Ok(Line::new(start.point(), end.point()))
    }

    /// Map-space lines of every linedef, for drawing the full map.
    pub fn line_def_lines(&self) -> Result<Vec<Line>, MapError> {
        self.line_defs
            .iter()
            .map(|line| {
                let start = self.vertex(line.start_vertex, Lump::LineDefs)?;
                let end = self.vertex(line.end_vertex, Lump::LineDefs)?;
                Ok(Line::new(start.point(), end.point()))
            })
            .collect()
    }

    /// For each segment, the subsector whose range contains it.
    ///
    /// Segments not covered by any subsector map to `None`.
    pub fn segment_owners(&self) -> Result<Vec<Option<usize>>, MapError> {
        let mut owners = vec![None; self.segs.len()];
        for subsector in 0..self.ssectors.len() {
            for index in self.stored_seg_range(subsector)? {
                let owner = &mut owners[index];
                if let Some(other) = *owner {
                    return Err(Corruption::OverlappingSegments { subsector, other }.into());
                }
                *owner = Some(subsector);
            }
        }
        Ok(owners)
    }
}
