use rand::Rng;

use crate::snake::{Cell, Snake};

/// Random probes tried before falling back to enumerating free cells.
pub const MAX_REJECTION_ATTEMPTS: usize = 32;

/// Picks a cell uniformly at random among those not occupied by `snake`.
///
/// While the snake covers less than half of the board, a bounded number of
/// random probes is tried first. Otherwise, or when every probe lands on the
/// snake, the free cells are enumerated and one is drawn directly. Returns
/// `None` only when the snake covers the whole board.
#[must_use]
pub fn spawn_position<R: Rng + ?Sized>(
    rng: &mut R,
    grid_size: u16,
    snake: &Snake,
) -> Option<Cell> {
    let total_cells = usize::from(grid_size) * usize::from(grid_size);
    if snake.len() >= total_cells {
        return None;
    }

    if snake.len() * 2 < total_cells {
        for _ in 0..MAX_REJECTION_ATTEMPTS {
            let candidate = random_cell(rng, grid_size);
            if !snake.occupies(candidate) {
                return Some(candidate);
            }
        }
    }

    let candidates = free_cells(grid_size, snake);
    if candidates.is_empty() {
        return None;
    }

    let index = rng.gen_range(0..candidates.len());
    Some(candidates[index])
}

fn random_cell<R: Rng + ?Sized>(rng: &mut R, grid_size: u16) -> Cell {
    let limit = i32::from(grid_size);
    Cell {
        x: rng.gen_range(0..limit),
        y: rng.gen_range(0..limit),
    }
}

fn free_cells(grid_size: u16, snake: &Snake) -> Vec<Cell> {
    let limit = i32::from(grid_size);
    let mut candidates = Vec::new();

    for y in 0..limit {
        for x in 0..limit {
            let cell = Cell { x, y };
            if !snake.occupies(cell) {
                candidates.push(cell);
            }
        }
    }

    candidates
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::spawn_position;
    use crate::snake::{Cell, Snake};

    #[test]
    fn food_spawn_never_overlaps_snake() {
        let mut rng = StdRng::seed_from_u64(7);
        let snake = Snake::from_segments(vec![Cell::new(0, 0), Cell::new(1, 0), Cell::new(2, 0)])
            .expect("valid snake");

        for _ in 0..200 {
            let food = spawn_position(&mut rng, 6, &snake).expect("board has free cells");
            assert!(!snake.occupies(food));
            assert!(food.is_within_bounds(6));
        }
    }

    #[test]
    fn crowded_board_uses_remaining_free_cell() {
        let mut rng = StdRng::seed_from_u64(11);
        let snake = Snake::from_segments(vec![Cell::new(0, 0), Cell::new(1, 0), Cell::new(1, 1)])
            .expect("valid snake");

        for _ in 0..20 {
            assert_eq!(spawn_position(&mut rng, 2, &snake), Some(Cell::new(0, 1)));
        }
    }

    #[test]
    fn full_board_yields_no_food() {
        let mut rng = StdRng::seed_from_u64(3);
        let snake = Snake::from_segments(vec![
            Cell::new(0, 0),
            Cell::new(1, 0),
            Cell::new(1, 1),
            Cell::new(0, 1),
        ])
        .expect("valid snake");

        assert_eq!(spawn_position(&mut rng, 2, &snake), None);
    }

    #[test]
    fn sampling_reaches_every_free_cell() {
        let mut rng = StdRng::seed_from_u64(99);
        let snake = Snake::new(Cell::new(1, 1));
        let mut seen = HashSet::new();

        for _ in 0..500 {
            if let Some(cell) = spawn_position(&mut rng, 3, &snake) {
                seen.insert(cell);
            }
        }

        assert_eq!(seen.len(), 8);
        assert!(!seen.contains(&Cell::new(1, 1)));
    }
}
