//! Batch boundaries for splitting a roster across workers.

use std::ops::Range;

/// Split `total` records into at most `workers` contiguous ranges whose sizes differ by at most
/// one; the larger ranges come first.
///
/// # Example
/// ```
/// # use arkledger::parallel::batch_ranges;
/// assert_eq!(batch_ranges(10, 3), vec![0..4, 4..7, 7..10]);
/// ```
pub fn batch_ranges(total: usize, workers: usize) -> Vec<Range<usize>> {
    if total == 0 || workers == 0 {
        return Vec::new();
    }
    let batches = workers.min(total);
    let (base, larger) = (total / batches, total % batches);
    (0..batches)
        .scan(0, |start, index| {
            let len = base + usize::from(index < larger);
            let range = *start..*start + len;
            *start = range.end;
            Some(range)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ranges_cover_every_record_once() {
        let ranges = batch_ranges(103, 8);
        assert_eq!(ranges.len(), 8);
        assert_eq!(ranges.first().map(|r| r.start), Some(0));
        assert_eq!(ranges.last().map(|r| r.end), Some(103));
        assert!(ranges.windows(2).all(|pair| pair[0].end == pair[1].start));
        assert_eq!(ranges.iter().map(ExactSizeIterator::len).sum::<usize>(), 103);
    }

    #[test]
    fn small_roster_gets_one_record_per_batch() {
        assert_eq!(batch_ranges(3, 16), vec![0..1, 1..2, 2..3]);
    }

    #[test]
    fn empty_roster_or_no_workers() {
        assert!(batch_ranges(0, 4).is_empty());
        assert!(batch_ranges(12, 0).is_empty());
    }
}
