//! K-way merge of contiguous sorted sections.
//!
//! The gathered buffer is treated as `count` sorted runs of exactly `size`
//! elements each. One cursor per section advances monotonically; every
//! output position takes the minimum value among active cursors, with ties
//! broken by the lowest section index so equal keys always emerge in a
//! reproducible order.
//!
//! Selection is a linear scan for small section counts (the common case —
//! sections correspond to group members) and a binary heap above
//! [`HEAP_SECTION_THRESHOLD`]. Both strategies emit the identical sequence.

use crate::error::{ConfigError, MergeError};
use std::cmp::Reverse;
use std::collections::BinaryHeap;

/// Above this many sections the scan over active cursors is replaced by a
/// binary heap.
const HEAP_SECTION_THRESHOLD: usize = 8;

/// Read cursor over one sorted section of the gathered buffer.
///
/// `next` never decreases and never exceeds `end`.
#[derive(Debug, Clone, Copy)]
struct SectionCursor {
    next: usize,
    end: usize,
}

impl SectionCursor {
    fn is_active(&self) -> bool {
        self.next < self.end
    }
}

fn section_cursors(count: usize, size: usize) -> Vec<SectionCursor> {
    (0..count)
        .map(|s| SectionCursor {
            next: s * size,
            end: (s + 1) * size,
        })
        .collect()
}

/// Merge `count` sorted sections of `size` elements each into one sorted
/// sequence.
///
/// The section geometry must cover `buffer` exactly; anything else is a
/// [`ConfigError::SectionMismatch`]. A single section degenerates to a
/// straight copy, and an empty buffer with zero sections is valid.
pub fn merge_sections<T: Ord + Copy>(
    buffer: &[T],
    count: usize,
    size: usize,
) -> Result<Vec<T>, MergeError> {
    let total = buffer.len();
    if count.checked_mul(size) != Some(total) {
        return Err(ConfigError::SectionMismatch { count, size, total }.into());
    }
    if total == 0 {
        return Ok(Vec::new());
    }
    if count == 1 {
        return Ok(buffer.to_vec());
    }
    if count > HEAP_SECTION_THRESHOLD {
        Ok(merge_heap(buffer, count, size))
    } else {
        merge_scan(buffer, count, size)
    }
}

/// Linear-scan selection: O(total × count) comparisons, which is fine when
/// `count` is the group size rather than anything input-sized.
fn merge_scan<T: Ord + Copy>(buffer: &[T], count: usize, size: usize) -> Result<Vec<T>, MergeError> {
    let total = buffer.len();
    let mut cursors = section_cursors(count, size);
    let mut merged = Vec::with_capacity(total);
    for written in 0..total {
        let mut winner: Option<usize> = None;
        for (section, cursor) in cursors.iter().enumerate() {
            if !cursor.is_active() {
                continue;
            }
            // strict `<` keeps the lowest section index on equal values
            let better = match winner {
                None => true,
                Some(w) => buffer[cursor.next] < buffer[cursors[w].next],
            };
            if better {
                winner = Some(section);
            }
        }
        let Some(w) = winner else {
            return Err(MergeError::CorruptPartition { written, total });
        };
        merged.push(buffer[cursors[w].next]);
        cursors[w].next += 1;
    }
    Ok(merged)
}

/// Heap selection, ordered by `(value, section)` so equal values pop in
/// ascending section order — identical tie-breaking to the scan.
fn merge_heap<T: Ord + Copy>(buffer: &[T], count: usize, size: usize) -> Vec<T> {
    let mut cursors = section_cursors(count, size);
    let mut heap: BinaryHeap<Reverse<(T, usize)>> = BinaryHeap::with_capacity(count);
    for (section, cursor) in cursors.iter().enumerate() {
        if cursor.is_active() {
            heap.push(Reverse((buffer[cursor.next], section)));
        }
    }
    let mut merged = Vec::with_capacity(buffer.len());
    while let Some(Reverse((value, section))) = heap.pop() {
        merged.push(value);
        let cursor = &mut cursors[section];
        cursor.next += 1;
        if cursor.is_active() {
            heap.push(Reverse((buffer[cursor.next], section)));
        }
    }
    merged
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn merges_two_sorted_sections() {
        let buffer = [1, 3, 5, 8, 2, 4, 7, 9];
        let merged = merge_sections(&buffer, 2, 4).unwrap();
        assert_eq!(merged, vec![1, 2, 3, 4, 5, 7, 8, 9]);
    }

    #[test]
    fn equal_values_emerge_in_section_order() {
        // sections [2,2,2], [1,1,1], [5,5,5]: value order dominates,
        // section index only separates equal values
        let buffer = [2, 2, 2, 1, 1, 1, 5, 5, 5];
        let merged = merge_sections(&buffer, 3, 3).unwrap();
        assert_eq!(merged, vec![1, 1, 1, 2, 2, 2, 5, 5, 5]);
    }

    #[test]
    fn single_section_is_a_straight_copy() {
        let buffer = [1, 2, 3, 4];
        assert_eq!(merge_sections(&buffer, 1, 4).unwrap(), vec![1, 2, 3, 4]);
    }

    #[test]
    fn empty_buffer_with_zero_sections_is_valid() {
        let buffer: [i32; 0] = [];
        assert_eq!(merge_sections(&buffer, 0, 0).unwrap(), Vec::<i32>::new());
        assert_eq!(merge_sections(&buffer, 4, 0).unwrap(), Vec::<i32>::new());
    }

    #[test]
    fn geometry_mismatch_is_a_config_error() {
        let buffer = [1, 2, 3, 4, 5, 6];
        let err = merge_sections(&buffer, 2, 2).unwrap_err();
        assert_eq!(
            err,
            MergeError::Config(ConfigError::SectionMismatch {
                count: 2,
                size: 2,
                total: 6
            })
        );
    }

    #[test]
    fn scan_reports_corrupt_sections_when_cursors_run_dry() {
        // drive the internal scan with a geometry that undercovers the
        // buffer; the public entry point rejects this before merging
        let buffer = [1, 2, 3, 4, 5, 6];
        let err = merge_scan(&buffer, 2, 2).unwrap_err();
        assert_eq!(
            err,
            MergeError::CorruptPartition {
                written: 4,
                total: 6
            }
        );
    }

    #[test]
    fn heap_path_matches_plain_sort() {
        // 12 sections of 4 elements: above the heap threshold
        let mut buffer = Vec::new();
        for s in 0..12 {
            let mut run: Vec<i32> = (0..4).map(|i| ((s * 7 + i * 13) % 19) as i32).collect();
            run.sort_unstable();
            buffer.extend(run);
        }
        let merged = merge_sections(&buffer, 12, 4).unwrap();
        let mut expected = buffer.clone();
        expected.sort_unstable();
        assert_eq!(merged, expected);
    }

    #[test]
    fn merge_is_multiset_union_of_sections() {
        let buffer = [0, 2, 4, 6, 1, 3, 5, 7, 0, 0, 9, 9];
        let merged = merge_sections(&buffer, 3, 4).unwrap();
        let mut expected = buffer.to_vec();
        expected.sort_unstable();
        assert_eq!(merged, expected);
    }
}
