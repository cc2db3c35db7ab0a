//! Entity trait: a stored record addressed by a typed identifier.

/// Anything a store keeps under its own identifier.
pub trait Entity {
    /// Strongly-typed record identifier.
    type Id: Copy + Eq + core::hash::Hash + core::fmt::Debug;

    fn id(&self) -> Self::Id;
}
