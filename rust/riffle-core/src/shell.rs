//! Gap-based (shell) insertion sort with optional fork-join parallelism.
//!
//! The gap sequence is `len/2, len/4, …, 1`. At a given gap value the
//! `gap` insertion passes — one per starting offset — touch disjoint index
//! residue classes, so they can run concurrently with no synchronization
//! beyond a full join before the next, smaller gap begins.
//!
//! # Thread model
//!
//! The parallel path uses scoped threads spawned and joined once per gap
//! level (blocking fork-join, no persistent workers). Each thread extracts
//! its residue classes from a shared read-only view, sorts them privately,
//! and the sorted classes are written back only after every thread has
//! joined. Threads therefore never write to shared memory at all; the
//! single write-back point after the join is the only combination step.
//!
//! Stability is not guaranteed: insertion sort over strided subsequences
//! reorders equal elements across residue classes. This is accepted.

use std::thread;

/// Inputs shorter than this are sorted sequentially regardless of the
/// configured thread count; fork-join setup costs more than it saves.
const PARALLEL_MIN_LEN: usize = 2048;

/// In-place sequential shell sort.
///
/// Idempotent on sorted input and a no-op for empty or single-element
/// slices.
pub fn sort_sequential<T: Ord + Copy>(data: &mut [T]) {
    let mut gap = data.len() / 2;
    while gap > 0 {
        insertion_pass(data, gap);
        gap /= 2;
    }
}

/// One full insertion pass at the given stride, covering every offset.
fn insertion_pass<T: Ord + Copy>(data: &mut [T], gap: usize) {
    for i in gap..data.len() {
        let cur = data[i];
        let mut j = i;
        while j >= gap && data[j - gap] > cur {
            data[j] = data[j - gap];
            j -= gap;
        }
        data[j] = cur;
    }
}

/// Extract the residue class starting at `offset` with stride `gap` and
/// return it insertion-sorted.
fn sorted_residue<T: Ord + Copy>(view: &[T], gap: usize, offset: usize) -> Vec<T> {
    let mut class: Vec<T> = view.iter().skip(offset).step_by(gap).copied().collect();
    for i in 1..class.len() {
        let cur = class[i];
        let mut j = i;
        while j > 0 && class[j - 1] > cur {
            class[j] = class[j - 1];
            j -= 1;
        }
        class[j] = cur;
    }
    class
}

/// Shell sorter with a fixed thread budget.
///
/// The thread count is configured once at construction; `sort` decides per
/// call whether the input is large enough to be worth forking for.
#[derive(Debug, Clone, Copy)]
pub struct ShellSorter {
    threads: usize,
}

impl ShellSorter {
    /// Create a sorter that may use up to `threads` threads per gap level.
    /// A count of zero is clamped to one.
    pub fn new(threads: usize) -> Self {
        Self {
            threads: threads.max(1),
        }
    }

    /// Single-threaded sorter.
    pub fn sequential() -> Self {
        Self::new(1)
    }

    pub fn threads(&self) -> usize {
        self.threads
    }

    /// Sort `data` ascending, in place.
    pub fn sort<T: Ord + Copy + Send + Sync>(&self, data: &mut [T]) {
        if data.len() < 2 {
            return;
        }
        if self.threads == 1 || data.len() < PARALLEL_MIN_LEN {
            sort_sequential(data);
            return;
        }
        let mut gap = data.len() / 2;
        while gap > 0 {
            if gap == 1 {
                // final pass is a single residue class; no point forking
                insertion_pass(data, 1);
            } else {
                self.parallel_gap_pass(data, gap);
            }
            gap /= 2;
        }
    }

    /// Run one gap level across up to `self.threads` scoped threads.
    ///
    /// Offsets `0..gap` are dealt round-robin to the threads. Each thread
    /// returns its privately sorted residue classes; write-back happens on
    /// the calling thread after the scope joins.
    fn parallel_gap_pass<T: Ord + Copy + Send + Sync>(&self, data: &mut [T], gap: usize) {
        let workers = self.threads.min(gap);
        let view: &[T] = data;
        let sorted: Vec<(usize, Vec<T>)> = thread::scope(|scope| {
            let handles: Vec<_> = (0..workers)
                .map(|worker| {
                    scope.spawn(move || {
                        let mut classes = Vec::new();
                        let mut offset = worker;
                        while offset < gap {
                            classes.push((offset, sorted_residue(view, gap, offset)));
                            offset += workers;
                        }
                        classes
                    })
                })
                .collect();
            handles
                .into_iter()
                .flat_map(|h| h.join().expect("sort worker panicked"))
                .collect()
        });
        for (offset, class) in sorted {
            for (k, value) in class.into_iter().enumerate() {
                data[offset + k * gap] = value;
            }
        }
    }
}
