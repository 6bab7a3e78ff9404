//! Projection strategies: how one axis of the view maps onto storage.
//!
//! A projection produces the ordered list of storage indices the view shows,
//! given the current storage length. `Identity` is what every view uses unless
//! told otherwise; filtering/sorting/reordering plug in here without touching
//! lookup or mutation logic.

/// Produces view index -> storage index for one axis.
pub trait Projection: std::fmt::Debug {
    fn project(&self, len: usize) -> Vec<usize>;
}

/// [0, 1, 2, ..., len-1]
#[derive(Debug, Clone, Copy, Default)]
pub struct Identity;

impl Projection for Identity {
    fn project(&self, len: usize) -> Vec<usize> {
        (0..len).collect()
    }
}

/// An explicit order. Entries that are out of range for the current storage
/// length are left in; the view drops them when it refreshes.
#[derive(Debug, Clone, Default)]
pub struct Fixed(pub Vec<usize>);

impl Projection for Fixed {
    fn project(&self, _len: usize) -> Vec<usize> {
        self.0.clone()
    }
}
