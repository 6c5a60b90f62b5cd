//! Thread-backed realization of the collective capability.
//!
//! A [`LocalGroup`] runs one OS thread per member. Chunks move through
//! crossbeam channels (scatter: one channel per non-root member; gather:
//! one shared channel into the root) and barriers use
//! [`std::sync::Barrier`]. No memory is shared between members — each
//! chunk crosses the boundary by value, like a message over a transport.
//!
//! # Failure model
//!
//! Members do not fail independently. A member that returns an error or
//! panics drops its endpoint, which disconnects its channels; peers
//! blocked in `scatter` or `gather` observe
//! [`CollectiveError::Disconnected`] and unwind in turn. The group either
//! completes as a whole or fails as a whole. There is no retry.

use crate::collective::{Collective, CollectiveError, ROOT};

use crossbeam_channel::{self as cb};
use std::any::Any;
use std::fmt;
use std::sync::{Arc, Barrier};
use std::thread;

// ---------------------------------------------------------------------------
// GroupError
// ---------------------------------------------------------------------------

/// Errors from running a member group.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GroupError {
    #[error("group size must be nonzero")]
    EmptyGroup,
    /// A member returned an error. The cause is carried as text; the
    /// lowest-ranked failure wins when several members fail together.
    #[error("member {rank} failed: {error}")]
    MemberFailed { rank: usize, error: String },
    /// A member panicked. The panic payload is captured as text.
    #[error("member {rank} panicked: {message}")]
    MemberPanicked { rank: usize, message: String },
}

fn panic_message(payload: Box<dyn Any + Send>) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic payload".to_string()
    }
}

// ---------------------------------------------------------------------------
// LocalEndpoint
// ---------------------------------------------------------------------------

/// Role-specific channel ends held by one member.
enum Side<T> {
    Root {
        /// Senders to members `1..size`, indexed by `rank - 1`.
        scatter_tx: Vec<cb::Sender<Vec<T>>>,
        gather_rx: cb::Receiver<(usize, Vec<T>)>,
    },
    Member {
        scatter_rx: cb::Receiver<Vec<T>>,
        gather_tx: cb::Sender<(usize, Vec<T>)>,
    },
}

/// One member's handle on the group. Implements [`Collective`].
///
/// Dropping an endpoint mid-run disconnects the member from the group;
/// see the module docs for the consequences.
pub struct LocalEndpoint<T> {
    rank: usize,
    size: usize,
    barrier: Arc<Barrier>,
    side: Side<T>,
}

impl<T> fmt::Debug for LocalEndpoint<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LocalEndpoint")
            .field("rank", &self.rank)
            .field("size", &self.size)
            .finish()
    }
}

impl<T: Copy + Send> Collective<T> for LocalEndpoint<T> {
    fn rank(&self) -> usize {
        self.rank
    }

    fn group_size(&self) -> usize {
        self.size
    }

    fn scatter(&self, root_data: Option<&[T]>, chunk: &mut [T]) -> Result<(), CollectiveError> {
        let chunk_len = chunk.len();
        match (&self.side, root_data) {
            (Side::Root { scatter_tx, .. }, Some(data)) => {
                let expected = chunk_len * self.size;
                if data.len() != expected {
                    return Err(CollectiveError::ChunkMismatch {
                        expected,
                        actual: data.len(),
                    });
                }
                for (i, tx) in scatter_tx.iter().enumerate() {
                    let rank = i + 1;
                    let slice = &data[rank * chunk_len..(rank + 1) * chunk_len];
                    tx.send(slice.to_vec())
                        .map_err(|_| CollectiveError::Disconnected)?;
                }
                chunk.copy_from_slice(&data[..chunk_len]);
                Ok(())
            }
            (Side::Member { scatter_rx, .. }, None) => {
                let received = scatter_rx.recv().map_err(|_| CollectiveError::Disconnected)?;
                if received.len() != chunk_len {
                    return Err(CollectiveError::ChunkMismatch {
                        expected: chunk_len,
                        actual: received.len(),
                    });
                }
                chunk.copy_from_slice(&received);
                Ok(())
            }
            _ => Err(CollectiveError::RootMismatch),
        }
    }

    fn gather(&self, chunk: &[T], root_dest: Option<&mut [T]>) -> Result<(), CollectiveError> {
        let chunk_len = chunk.len();
        match (&self.side, root_dest) {
            (Side::Root { gather_rx, .. }, Some(dest)) => {
                let expected = chunk_len * self.size;
                if dest.len() != expected {
                    return Err(CollectiveError::ChunkMismatch {
                        expected,
                        actual: dest.len(),
                    });
                }
                dest[..chunk_len].copy_from_slice(chunk);
                for _ in 1..self.size {
                    let (rank, data) =
                        gather_rx.recv().map_err(|_| CollectiveError::Disconnected)?;
                    if data.len() != chunk_len {
                        return Err(CollectiveError::ChunkMismatch {
                            expected: chunk_len,
                            actual: data.len(),
                        });
                    }
                    dest[rank * chunk_len..(rank + 1) * chunk_len].copy_from_slice(&data);
                }
                Ok(())
            }
            (Side::Member { gather_tx, .. }, None) => gather_tx
                .send((self.rank, chunk.to_vec()))
                .map_err(|_| CollectiveError::Disconnected),
            _ => Err(CollectiveError::RootMismatch),
        }
    }

    fn barrier(&self) {
        self.barrier.wait();
    }
}

// ---------------------------------------------------------------------------
// LocalGroup
// ---------------------------------------------------------------------------

/// Factory and fork-join driver for a group of [`LocalEndpoint`]s.
pub struct LocalGroup;

impl LocalGroup {
    /// Build the endpoints of a `size`-member group, rank 0 first.
    pub fn endpoints<T: Send>(size: usize) -> Result<Vec<LocalEndpoint<T>>, GroupError> {
        if size == 0 {
            return Err(GroupError::EmptyGroup);
        }
        let barrier = Arc::new(Barrier::new(size));
        let (gather_tx, gather_rx) = cb::unbounded();
        let mut scatter_tx = Vec::with_capacity(size - 1);
        let mut members = Vec::with_capacity(size - 1);
        for rank in 1..size {
            let (tx, rx) = cb::unbounded();
            scatter_tx.push(tx);
            members.push(LocalEndpoint {
                rank,
                size,
                barrier: Arc::clone(&barrier),
                side: Side::Member {
                    scatter_rx: rx,
                    gather_tx: gather_tx.clone(),
                },
            });
        }
        // the root holds no gather sender: once every member endpoint is
        // gone, the root's receiver disconnects instead of blocking
        drop(gather_tx);

        let mut endpoints = Vec::with_capacity(size);
        endpoints.push(LocalEndpoint {
            rank: ROOT,
            size,
            barrier,
            side: Side::Root {
                scatter_tx,
                gather_rx,
            },
        });
        endpoints.extend(members);
        Ok(endpoints)
    }

    /// Spawn one thread per member, run `f` on each with its endpoint, and
    /// join them all.
    ///
    /// Results come back in rank order. If any member fails or panics, the
    /// lowest-ranked failure is returned and the rest are discarded — the
    /// group either completes as a whole or not at all.
    pub fn run<T, R, E, F>(size: usize, f: F) -> Result<Vec<R>, GroupError>
    where
        T: Copy + Send,
        R: Send,
        E: fmt::Display + Send,
        F: Fn(LocalEndpoint<T>) -> Result<R, E> + Send + Sync,
    {
        let endpoints = Self::endpoints::<T>(size)?;
        thread::scope(|scope| {
            let f = &f;
            let handles: Vec<_> = endpoints
                .into_iter()
                .map(|endpoint| {
                    let rank = endpoint.rank;
                    (rank, scope.spawn(move || f(endpoint)))
                })
                .collect();

            let mut results = Vec::with_capacity(size);
            let mut failure: Option<GroupError> = None;
            for (rank, handle) in handles {
                match handle.join() {
                    Ok(Ok(result)) => results.push(result),
                    Ok(Err(error)) => {
                        failure.get_or_insert(GroupError::MemberFailed {
                            rank,
                            error: error.to_string(),
                        });
                    }
                    Err(payload) => {
                        failure.get_or_insert(GroupError::MemberPanicked {
                            rank,
                            message: panic_message(payload),
                        });
                    }
                }
            }
            match failure {
                Some(err) => Err(err),
                None => Ok(results),
            }
        })
    }
}
