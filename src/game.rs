use log::{debug, info};
use web_time::Instant;

use crate::ai::{self, MoveSelector};
use crate::board::{Board, NUM_SQUARES};
use crate::error::GameError;
use crate::types::{
    ComputerPly, Difficulty, GameResult, GameState, Player, Position, StatusMessage,
};

/// Turn state machine phases.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    PlayerToMove,
    ComputerToMove,
    GameOver,
}

/// One page-load game. The human always plays black, the computer white.
///
/// The instance is never reset in place; a new game is a new instance, so
/// stale references cannot observe a half-reinitialized board.
pub struct GameInstance {
    board: Board,
    current_player: Player,
    difficulty: Difficulty,
    phase: Phase,
    status: StatusMessage,
    flipped: Vec<u8>,
    selector: Box<dyn MoveSelector>,
}

impl GameInstance {
    pub fn new(difficulty: Difficulty) -> Self {
        Self::with_selector(difficulty, ai::selector_for(difficulty))
    }

    pub fn with_selector(difficulty: Difficulty, selector: Box<dyn MoveSelector>) -> Self {
        Self {
            board: Board::new(),
            current_player: Player::Black,
            difficulty,
            phase: Phase::PlayerToMove,
            status: StatusMessage::PlayerToMove,
            flipped: Vec::new(),
            selector,
        }
    }

    /// Applies the player's move at `(x, y)`. Any rejection leaves the
    /// game untouched.
    pub fn place(&mut self, x: u8, y: u8) -> Result<(), GameError> {
        match self.phase {
            Phase::GameOver => return Err(GameError::GameOver),
            Phase::ComputerToMove => return Err(GameError::NotPlayersTurn),
            Phase::PlayerToMove => {}
        }

        let pos = Position::new(x, y).ok_or(GameError::OutOfRange { x, y })?;
        let flips = self.board.place(pos.index(), Player::Black);
        if flips == 0 {
            return Err(GameError::IllegalMove { x, y });
        }

        self.flipped = bitmask_to_indices(flips);

        if self.neither_side_can_move() {
            self.finish();
        } else {
            self.phase = Phase::ComputerToMove;
            self.current_player = Player::White;
            self.status = StatusMessage::ComputerThinking;
        }

        Ok(())
    }

    /// Runs the computer's whole turn: one placement or pass, plus every
    /// follow-up placement forced by the human having no reply. Each step
    /// is reported in order so the presentation can pace the animation.
    ///
    /// The loop re-checks both sides' legal moves every iteration, so a
    /// stall discovered mid-chain still terminates the game.
    pub fn advance_computer(&mut self) -> Result<Vec<ComputerPly>, GameError> {
        match self.phase {
            Phase::GameOver => return Err(GameError::GameOver),
            Phase::PlayerToMove => return Err(GameError::NotComputersTurn),
            Phase::ComputerToMove => {}
        }

        let started = Instant::now();
        let mut plies = Vec::new();

        loop {
            let legal = self.board.legal_moves(Player::White);
            if legal == 0 {
                self.flipped.clear();
                if self.board.legal_moves(Player::Black) == 0 {
                    self.finish();
                } else {
                    self.phase = Phase::PlayerToMove;
                    self.current_player = Player::Black;
                    self.status = StatusMessage::ComputerPassed;
                }
                plies.push(ComputerPly {
                    placed: None,
                    flipped: Vec::new(),
                    status: self.status,
                });
                break;
            }

            let mv = self.selector.select_move(&self.board, Player::White);
            if mv >= NUM_SQUARES {
                return Err(GameError::OutOfRange {
                    x: (mv % 8) as u8,
                    y: (mv / 8) as u8,
                });
            }
            if (legal & (1u64 << mv)) == 0 {
                let pos = Position::from_index(mv as u8);
                return Err(GameError::IllegalMove { x: pos.x, y: pos.y });
            }

            let flips = self.board.place(mv, Player::White);
            self.flipped = bitmask_to_indices(flips);

            let player_can_move = self.board.legal_moves(Player::Black) != 0;
            let computer_can_move = self.board.legal_moves(Player::White) != 0;

            if !player_can_move && !computer_can_move {
                self.finish();
            } else if player_can_move {
                self.phase = Phase::PlayerToMove;
                self.current_player = Player::Black;
                self.status = StatusMessage::PlayerToMove;
            } else {
                // Human is stuck: auto-pass, the computer keeps the turn.
                self.status = StatusMessage::PlayerMustPass;
            }

            plies.push(ComputerPly {
                placed: Some(mv as u8),
                flipped: self.flipped.clone(),
                status: self.status,
            });

            if self.phase != Phase::ComputerToMove {
                break;
            }
        }

        debug!(
            "computer chain: {} plies in {:?}",
            plies.len(),
            started.elapsed()
        );
        Ok(plies)
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn current_player(&self) -> Player {
        self.current_player
    }

    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    pub fn is_game_over(&self) -> bool {
        self.phase == Phase::GameOver
    }

    /// Returns `(black_count, white_count)`.
    pub fn score(&self) -> (u8, u8) {
        self.board.count()
    }

    pub fn legal_positions(&self, player: Player) -> Vec<Position> {
        bitmask_to_indices(self.board.legal_moves(player))
            .into_iter()
            .map(Position::from_index)
            .collect()
    }

    pub fn to_game_state(&self) -> GameState {
        let (black_count, white_count) = self.board.count();
        GameState {
            board: self.board.to_array().to_vec(),
            current_player: self.current_player.as_u8(),
            black_count,
            white_count,
            is_game_over: self.phase == Phase::GameOver,
            accepts_input: self.phase == Phase::PlayerToMove,
            status: self.status,
            flipped: self.flipped.clone(),
        }
    }

    pub fn to_game_result(&self) -> Result<GameResult, GameError> {
        if self.phase != Phase::GameOver {
            return Err(GameError::GameInProgress);
        }

        let (black_count, white_count) = self.board.count();
        Ok(GameResult {
            winner: if black_count > white_count {
                Player::Black.as_u8()
            } else if white_count > black_count {
                Player::White.as_u8()
            } else {
                0
            },
            black_count,
            white_count,
        })
    }

    fn neither_side_can_move(&self) -> bool {
        self.board.legal_moves(Player::Black) == 0
            && self.board.legal_moves(Player::White) == 0
    }

    fn finish(&mut self) {
        self.phase = Phase::GameOver;
        let (black, white) = self.board.count();
        self.status = if black > white {
            StatusMessage::PlayerWins
        } else if white > black {
            StatusMessage::ComputerWins
        } else {
            StatusMessage::Draw
        };
        info!("game over: black {black}, white {white}");
    }

    #[cfg(test)]
    fn set_board_for_test(&mut self, board: Board, phase: Phase) {
        self.board = board;
        self.phase = phase;
        self.current_player = match phase {
            Phase::ComputerToMove => Player::White,
            _ => Player::Black,
        };
        self.status = StatusMessage::PlayerToMove;
        self.flipped.clear();
    }
}

fn bitmask_to_indices(mask: u64) -> Vec<u8> {
    let mut bits = mask;
    let mut out = Vec::new();

    while bits != 0 {
        out.push(bits.trailing_zeros() as u8);
        bits &= bits - 1;
    }

    out
}
