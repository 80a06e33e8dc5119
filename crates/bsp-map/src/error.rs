//! Error types for map queries.

use thiserror::Error;

/// Which sequence of the map model an index refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lump {
    Vertexes,
    LineDefs,
    Segs,
    SSectors,
    Nodes,
}

impl std::fmt::Display for Lump {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Lump::Vertexes => "vertex",
            Lump::LineDefs => "linedef",
            Lump::Segs => "segment",
            Lump::SSectors => "subsector",
            Lump::Nodes => "node",
        };
        f.write_str(name)
    }
}

/// A stored index or range inside the map model that violates its invariant.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Corruption {
    #[error("{owner} references {what} {index}, but only {len} exist")]
    BadReference {
        owner: Lump,
        what: Lump,
        index: usize,
        len: usize,
    },

    #[error("subsector {subsector} spans segments {first}..{end}, but only {len} exist")]
    SegmentRange {
        subsector: usize,
        first: usize,
        end: usize,
        len: usize,
    },

    #[error("subsector {subsector} shares segments with subsector {other}")]
    OverlappingSegments { subsector: usize, other: usize },

    #[error("node {node} reached twice while walking the tree")]
    Cycle { node: usize },

    #[error("subsector {subsector} is the child of more than one node")]
    SharedLeaf { subsector: usize },
}

/// Failure of a traversal or resolver call.
///
/// None of these are recoverable for the call that produced them: the map
/// model itself is invalid (or not loaded yet) and must be replaced.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MapError {
    #[error("BSP tree is empty: no nodes loaded")]
    EmptyTree,

    #[error("map corruption: {0}")]
    MapCorruption(#[from] Corruption),

    #[error("{what} {index} out of range (len {len})")]
    OutOfRange { what: Lump, index: usize, len: usize },
}

impl MapError {
    pub(crate) fn bad_reference(owner: Lump, what: Lump, index: usize, len: usize) -> Self {
        MapError::MapCorruption(Corruption::BadReference {
            owner,
            what,
            index,
            len,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn corruption_message_names_both_lumps() {
        let err = MapError::bad_reference(Lump::Nodes, Lump::SSectors, 7, 3);
        assert_eq!(
            err.to_string(),
            "map corruption: node references subsector 7, but only 3 exist"
        );
    }

    #[test]
    fn corruption_converts_into_map_error() {
        let err: MapError = Corruption::Cycle { node: 2 }.into();
        assert!(matches!(err, MapError::MapCorruption(Corruption::Cycle { node: 2 })));
    }
}
