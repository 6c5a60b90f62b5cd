//! The collective-communication capability consumed by the pipeline.
//!
//! Scatter, gather, and barrier are *collective* operations: every member
//! of the group must invoke each one the same number of times in the same
//! order. That symmetry is a caller obligation — a member that skips a
//! call leaves its peers blocked, and the channel layer cannot tell a slow
//! peer from a missing one. What *is* detected is a peer that has died
//! (dropped its endpoint): the survivors observe a disconnect and fail
//! instead of blocking forever.
//!
//! The trait is transport-agnostic on purpose. [`LocalGroup`] realizes it
//! with threads and channels; any transport that preserves the blocking,
//! symmetric contract is equivalent.
//!
//! [`LocalGroup`]: crate::group::LocalGroup

use thiserror::Error;

/// Rank of the coordinator. Root for both scatter and gather.
pub const ROOT: usize = 0;

/// Errors surfaced by collective operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum CollectiveError {
    /// A root-side buffer was passed by a non-root member, or omitted by
    /// the root.
    #[error("collective role mismatch: root buffer missing on the root or present on a worker")]
    RootMismatch,
    /// A buffer's length does not match the group's chunk geometry.
    #[error("chunk shape mismatch: expected {expected} elements, got {actual}")]
    ChunkMismatch { expected: usize, actual: usize },
    /// A group member dropped its endpoint mid-collective. Terminal for
    /// the whole group.
    #[error("a group member disconnected mid-collective")]
    Disconnected,
}

/// Collective communication among a fixed group of members.
///
/// One value of this capability exists per member; `rank` identifies the
/// member and rank [`ROOT`] is the coordinator.
pub trait Collective<T> {
    /// This member's rank in `0..group_size`.
    fn rank(&self) -> usize;

    /// Number of members in the group. Fixed for the group's lifetime.
    fn group_size(&self) -> usize;

    /// Whether this member is the coordinator.
    fn is_root(&self) -> bool {
        self.rank() == ROOT
    }

    /// Distribute equal chunks of the root's dataset to every member.
    ///
    /// The root passes `Some(data)` with exactly `chunk.len() *
    /// group_size` elements; every other member passes `None`. Each
    /// member's `chunk` receives the slice owned by its rank. Blocks until
    /// the chunk for this member is available.
    fn scatter(&self, root_data: Option<&[T]>, chunk: &mut [T]) -> Result<(), CollectiveError>;

    /// Collect every member's chunk into the root's buffer, contiguous by
    /// rank ascending.
    ///
    /// The root passes `Some(dest)` with exactly `chunk.len() *
    /// group_size` elements; every other member passes `None`. Blocks on
    /// the root until all chunks have arrived.
    fn gather(&self, chunk: &[T], root_dest: Option<&mut [T]>) -> Result<(), CollectiveError>;

    /// Block until every member of the group has called `barrier`.
    fn barrier(&self);
}
