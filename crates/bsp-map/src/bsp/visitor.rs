//! Visitor pattern for leaf traversal.
//!
//! Visitors receive subsector indices in traversal order without coupling
//! the walk to what is done with them.

/// Receives each subsector reached during an ordered traversal.
///
/// Common uses include:
/// - Collecting the visible leaves for a frame
/// - Feeding wall segments to a renderer in painter's order
pub trait LeafVisitor {
    /// Called once per subsector, in traversal order.
    fn visit(&mut self, subsector: usize);
}

/// A visitor that collects visited subsector indices.
#[derive(Debug, Default)]
pub struct CollectingVisitor {
    collected: Vec<usize>,
}

impl CollectingVisitor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn into_subsectors(self) -> Vec<usize> {
        self.collected
    }

    pub fn subsectors(&self) -> &[usize] {
        &self.collected
    }
}

impl LeafVisitor for CollectingVisitor {
    fn visit(&mut self, subsector: usize) {
        self.collected.push(subsector);
    }
}

/// A visitor that calls a closure for each subsector.
pub struct FnVisitor<F>
where
    F: FnMut(usize),
{
    func: F,
}

impl<F> FnVisitor<F>
where
    F: FnMut(usize),
{
    pub fn new(func: F) -> Self {
        Self { func }
    }
}

impl<F> LeafVisitor for FnVisitor<F>
where
    F: FnMut(usize),
{
    fn visit(&mut self, subsector: usize) {
        (self.func)(subsector);
    }
}
