//! Move-by-swap reordering shared by tabs and agenda items.

use serde::Deserialize;

#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum MoveDirection {
    Up,
    Down,
}

/// Request body for a move operation.
#[derive(Debug, Clone, Deserialize)]
pub struct MoveRequest {
    pub direction: MoveDirection,
}

/// Swap the item at `index` with its neighbour in `direction`.
///
/// Returns false (and leaves the slice untouched) at either end.
pub fn swap_adjacent<T>(items: &mut [T], index: usize, direction: MoveDirection) -> bool {
    let target = match direction {
        MoveDirection::Up if index > 0 => index - 1,
        MoveDirection::Down if index + 1 < items.len() => index + 1,
        _ => return false,
    };
    items.swap(index, target);
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_swap_up_and_down() {
        let mut items = vec!['a', 'b', 'c'];
        assert!(swap_adjacent(&mut items, 1, MoveDirection::Up));
        assert_eq!(items, vec!['b', 'a', 'c']);
        assert!(swap_adjacent(&mut items, 1, MoveDirection::Down));
        assert_eq!(items, vec!['b', 'c', 'a']);
    }

    #[test]
    fn test_swap_past_ends_is_noop() {
        let mut items = vec![1, 2];
        assert!(!swap_adjacent(&mut items, 0, MoveDirection::Up));
        assert!(!swap_adjacent(&mut items, 1, MoveDirection::Down));
        assert_eq!(items, vec![1, 2]);
    }
}
