use shakmaty::Square;

/// The 64 squares in the canonical enumeration order (a1, b1, ..., h8)
/// used for perturbation iteration and heatmap indexing.
pub fn all_squares() -> Vec<Square> {
    Square::ALL.to_vec()
}

/// (row, column) placement of a square on an 8x8 grid: row 0 is rank 1,
/// column 0 is file a. Total and injective over the 64 squares.
pub fn grid_index(square: Square) -> (usize, usize) {
    (square.rank() as usize, square.file() as usize)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_squares_covers_the_board() {
        assert_eq!(all_squares().len(), 64);
    }

    #[test]
    fn test_grid_index_corners() {
        assert_eq!(grid_index(Square::A1), (0, 0));
        assert_eq!(grid_index(Square::H1), (0, 7));
        assert_eq!(grid_index(Square::A8), (7, 0));
        assert_eq!(grid_index(Square::H8), (7, 7));
    }

    #[test]
    fn test_grid_index_is_injective() {
        let mut seen = std::collections::HashSet::new();
        for square in all_squares() {
            assert!(seen.insert(grid_index(square)));
        }
    }
}
