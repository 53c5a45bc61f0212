use rand::Rng;
use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::ai::{MoveSelector, bitmask_to_positions};
use crate::board::Board;
use crate::types::Player;

/// Easy opponent: uniform choice over the legal moves.
pub struct RandomSelector {
    rng: StdRng,
}

impl RandomSelector {
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_os_rng(),
        }
    }

    #[cfg(test)]
    fn with_seed(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Default for RandomSelector {
    fn default() -> Self {
        Self::new()
    }
}

impl MoveSelector for RandomSelector {
    fn select_move(&mut self, board: &Board, player: Player) -> usize {
        let moves = bitmask_to_positions(board.legal_moves(player));
        debug_assert!(
            !moves.is_empty(),
            "select_move requires at least one legal move"
        );

        moves[self.rng.random_range(0..moves.len())]
    }
}
