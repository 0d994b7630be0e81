//! Horizontal placement on the fixed rows.

/// x of the `slot`-th (0-indexed) of `count` evenly spaced nodes on a row.
/// The `count + 1` denominator keeps an empty row well defined.
pub fn row_x(slot: usize, count: usize) -> f64 {
    (slot + 1) as f64 / (count + 1) as f64
}

/// x of the `child`-th (0-indexed) of `siblings` low nodes under the mid node
/// in `parent_slot`. The sub-row is centered under its parent and spans less
/// than one slot, so neighbouring groups never overlap.
pub fn child_x(parent_slot: usize, child: usize, siblings: usize, mid_count: usize) -> f64 {
    if siblings <= 1 {
        return row_x(parent_slot, mid_count);
    }
    let k = (siblings + 1) as f64;
    let j = (child + 1) as f64;
    (parent_slot as f64 + 1.0 + j / k - 0.5) / (mid_count + 1) as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-12;

    #[test]
    fn test_row_x_even_spacing() {
        assert_eq!(row_x(0, 1), 0.5);
        assert!((row_x(0, 2) - 1.0 / 3.0).abs() < EPS);
        assert!((row_x(1, 2) - 2.0 / 3.0).abs() < EPS);
    }

    #[test]
    fn test_single_child_under_parent() {
        assert_eq!(child_x(2, 0, 1, 4), row_x(2, 4));
    }

    #[test]
    fn test_odd_group_centered() {
        let parent = row_x(1, 3);
        assert!((child_x(1, 1, 3, 3) - parent).abs() < EPS);
        let left = parent - child_x(1, 0, 3, 3);
        let right = child_x(1, 2, 3, 3) - parent;
        assert!((left - right).abs() < EPS);
    }

    #[test]
    fn test_groups_do_not_overlap() {
        let mids = 3;
        for siblings in 2..8 {
            for slot in 0..mids - 1 {
                let last = child_x(slot, siblings - 1, siblings, mids);
                let next_first = child_x(slot + 1, 0, siblings, mids);
                assert!(last < next_first, "siblings={siblings} slot={slot}");
            }
        }
    }
}
