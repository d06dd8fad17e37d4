use rand::SeedableRng;
use rand::rngs::SmallRng;
use serde::{Deserialize, Serialize};

use crate::*;

/// Valid transitions:
/// - New -> InProgress (first reveal, which also generates the board)
/// - InProgress -> Loss
/// - InProgress -> Win
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// No board generated yet
    #[default]
    New,
    InProgress,
    Loss,
    Win,
}

impl GamePhase {
    pub const fn is_new(self) -> bool {
        matches!(self, Self::New)
    }

    pub const fn is_in_progress(self) -> bool {
        matches!(self, Self::InProgress)
    }

    /// Indicates the game has ended and no moves can be made anymore
    pub const fn is_finished(self) -> bool {
        matches!(self, Self::Loss | Self::Win)
    }
}

/// One game from the first click to a win or a loss, plus restarts.
///
/// Every action is checked against the current phase and the field bounds first; a rejected action returns an error
/// and leaves the session untouched, so a front-end may simply ignore errors.
#[derive(Clone, Debug)]
pub struct Session {
    config: FieldConfig,
    board: Board,
    phase: GamePhase,
    flag_policy: FlagPolicy,
    triggered_mine: Option<Position>,
    rng: SmallRng,
}

impl Session {
    pub fn new(config: FieldConfig, seed: u64) -> Self {
        Self {
            config,
            board: Board::placeholder(),
            phase: GamePhase::New,
            flag_policy: FlagPolicy::default(),
            triggered_mine: None,
            rng: SmallRng::seed_from_u64(seed),
        }
    }

    pub fn with_flag_policy(mut self, flag_policy: FlagPolicy) -> Self {
        self.flag_policy = flag_policy;
        self
    }

    pub fn config(&self) -> FieldConfig {
        self.config
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    pub fn flag_policy(&self) -> FlagPolicy {
        self.flag_policy
    }

    /// The mine whose reveal lost the game.
    pub fn triggered_mine(&self) -> Option<Position> {
        self.triggered_mine
    }

    /// How many mines have not been flagged yet, negative when over-flagged
    pub fn mines_left(&self) -> isize {
        (self.config.mines() as isize) - (self.board.flagged_count() as isize)
    }

    /// First click: generates a board keeping `position` safe, then reveals from it.
    pub fn start(&mut self, position: Position) -> Result<RevealOutcome> {
        self.check_phase(GamePhase::New)?;
        let position = self.config.validate(position)?;

        let board = generate(self.config, position, &mut self.rng);
        Ok(self.begin(board, position))
    }

    /// Like [`Session::start`], with the board coming from `generator`.
    ///
    /// The board must have the configured size and mine count, otherwise the session stays in
    /// [`GamePhase::New`] and [`GameError::LayoutMismatch`] is returned.
    pub fn start_with(
        &mut self,
        position: Position,
        generator: impl BoardGenerator,
    ) -> Result<RevealOutcome> {
        self.check_phase(GamePhase::New)?;
        let position = self.config.validate(position)?;

        let board = generator.generate(self.config);
        if board.size() != self.config.size() || board.mine_count() != self.config.mines() {
            log::warn!(
                "Generated {:?} board with {} mines, configured {:?} with {} mines",
                board.size(),
                board.mine_count(),
                self.config.size(),
                self.config.mines()
            );
            return Err(GameError::LayoutMismatch);
        }
        Ok(self.begin(board, position))
    }

    pub fn flag(&mut self, position: Position) -> Result<MarkOutcome> {
        self.check_phase(GamePhase::InProgress)?;
        let position = self.config.validate(position)?;

        let outcome = self.board.toggle_flag(position);
        if outcome.has_update() {
            log::debug!(
                "Flag at {:?} is now {}",
                position,
                self.board[position].flagged()
            );
        } else {
            log::trace!("Cannot flag revealed cell at {:?}", position);
        }
        Ok(outcome)
    }

    pub fn reveal(&mut self, position: Position) -> Result<RevealOutcome> {
        self.check_phase(GamePhase::InProgress)?;
        let position = self.config.validate(position)?;

        let cell = self.board[position];
        if cell.revealed() || cell.flagged() {
            log::trace!("Ignoring reveal of {:?} at {:?}", cell.view(), position);
            return Ok(RevealOutcome::NoChange);
        }
        Ok(self.open(position))
    }

    /// Chord: reveals the unflagged neighbours of a revealed cell once its flags account for all its mines.
    pub fn reveal_neighbours(&mut self, position: Position) -> Result<RevealOutcome> {
        self.check_phase(GamePhase::InProgress)?;
        let position = self.config.validate(position)?;

        if !self.board.can_chord_reveal(position) {
            log::trace!("Chord at {:?} not satisfied", position);
            return Ok(RevealOutcome::NoChange);
        }

        Ok(
            match self.board.chord_reveal_with(position, self.flag_policy) {
                RevealOutcome::HitMine => {
                    self.triggered_mine = self
                        .board
                        .neighbours(position)
                        .find(|&pos| self.board[pos].view() == CellView::Detonated);
                    self.finish(GamePhase::Loss);
                    RevealOutcome::HitMine
                }
                outcome => {
                    log::debug!("Chord at {:?}: {:?}", position, outcome);
                    self.settle(outcome)
                }
            },
        )
    }

    /// Drops the current board and goes back to [`GamePhase::New`].
    pub fn restart(&mut self) {
        log::debug!("Restarting from {:?}", self.phase);
        self.board = Board::placeholder();
        self.phase = GamePhase::New;
        self.triggered_mine = None;
    }

    fn begin(&mut self, board: Board, position: Position) -> RevealOutcome {
        self.board = board;
        self.triggered_mine = None;
        self.phase = GamePhase::InProgress;
        log::debug!("Game started at {:?}", position);

        if self.board[position].mined() {
            return self.detonate(position);
        }

        // the first flood only starts the game, winning needs a further move
        let revealed = self.board.flood_reveal_with(position, self.flag_policy);
        log::debug!("Revealed {} cells from {:?}", revealed, position);
        RevealOutcome::Revealed
    }

    fn open(&mut self, position: Position) -> RevealOutcome {
        if self.board[position].mined() {
            return self.detonate(position);
        }

        let revealed = self.board.flood_reveal_with(position, self.flag_policy);
        log::debug!("Revealed {} cells from {:?}", revealed, position);
        self.settle(RevealOutcome::Revealed)
    }

    fn detonate(&mut self, position: Position) -> RevealOutcome {
        self.board.reveal_cell(position);
        self.triggered_mine = Some(position);
        self.finish(GamePhase::Loss);
        RevealOutcome::HitMine
    }

    fn settle(&mut self, outcome: RevealOutcome) -> RevealOutcome {
        if self.board.is_won(&self.config) {
            self.finish(GamePhase::Win);
            RevealOutcome::Won
        } else {
            outcome
        }
    }

    fn finish(&mut self, phase: GamePhase) {
        log::debug!("Game ended: {:?}", phase);
        self.phase = phase;
    }

    fn check_phase(&self, expected: GamePhase) -> Result<()> {
        if self.phase == expected {
            Ok(())
        } else {
            log::trace!("Action needs {:?}, game is {:?}", expected, self.phase);
            Err(GameError::InvalidAction { phase: self.phase })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec::Vec;

    fn config(rows: Coord, columns: Coord, mines: CellCount) -> FieldConfig {
        FieldConfig::new(rows, columns, mines).unwrap()
    }

    fn preset(mines: &[(Coord, Coord)]) -> PresetGenerator {
        PresetGenerator::new(mines.iter().map(|&pos| Position::from(pos)))
    }

    fn started(config: FieldConfig, mines: &[(Coord, Coord)], start: (Coord, Coord)) -> Session {
        let mut session = Session::new(config, 0);
        session.start_with(start.into(), preset(mines)).unwrap();
        session
    }

    #[test]
    fn new_session_waits_for_first_click() {
        let session = Session::new(FieldConfig::BEGINNER, 1);

        assert_eq!(session.phase(), GamePhase::New);
        assert_eq!(session.board().size(), (1, 1));
        assert_eq!(session.mines_left(), 10);
    }

    #[test]
    fn start_generates_board_with_safe_first_click() {
        for seed in 0..32 {
            let mut session = Session::new(config(5, 5, 24), seed);
            let start = Position::new(2, 3);

            assert_eq!(session.start(start), Ok(RevealOutcome::Revealed));

            assert_eq!(session.phase(), GamePhase::InProgress);
            assert_eq!(session.board().size(), (5, 5));
            assert!(session.board()[start].revealed());
            assert!(!session.board()[start].mined());
        }
    }

    #[test]
    fn first_flood_clears_corner_mine_board() {
        let session = started(config(3, 3, 1), &[(2, 2)], (0, 0));

        assert_eq!(session.phase(), GamePhase::InProgress);
        assert_eq!(session.board().revealed_count(), 8);
        assert!(!session.board()[Position::new(2, 2)].revealed());
        assert!(session.board().is_won(&session.config()));
    }

    #[test]
    fn chord_after_clearing_start_wins() {
        let mut session = started(config(3, 3, 1), &[(2, 2)], (0, 0));

        let outcome = session.reveal_neighbours(Position::new(0, 0)).unwrap();

        assert_eq!(outcome, RevealOutcome::Won);
        assert_eq!(session.phase(), GamePhase::Win);
    }

    #[test]
    fn start_is_only_legal_once() {
        let mut session = started(config(3, 3, 1), &[(2, 2)], (0, 0));

        assert_eq!(
            session.start(Position::new(1, 1)),
            Err(GameError::InvalidAction {
                phase: GamePhase::InProgress
            })
        );
    }

    #[test]
    fn actions_before_start_are_rejected() {
        let mut session = Session::new(config(3, 3, 1), 0);

        let rejected = Err(GameError::InvalidAction {
            phase: GamePhase::New,
        });
        assert_eq!(session.reveal(Position::new(0, 0)), rejected);
        assert_eq!(session.reveal_neighbours(Position::new(0, 0)), rejected);
        assert_eq!(
            session.flag(Position::new(0, 0)),
            Err(GameError::InvalidAction {
                phase: GamePhase::New
            })
        );
        assert_eq!(session.phase(), GamePhase::New);
    }

    #[test]
    fn out_of_bounds_is_rejected_without_change() {
        let mut session = Session::new(config(3, 3, 1), 0);
        assert_eq!(
            session.start(Position::new(3, 0)),
            Err(GameError::InvalidCoords)
        );
        assert_eq!(session.phase(), GamePhase::New);

        let mut session = started(config(4, 4, 1), &[(0, 0)], (1, 1));
        let before = session.board().clone();
        assert_eq!(session.reveal(Position::new(0, 4)), Err(GameError::InvalidCoords));
        assert_eq!(session.board(), &before);
    }

    #[test]
    fn revealing_a_mine_loses_and_touches_only_that_cell() {
        let mut session = started(config(4, 4, 2), &[(0, 0), (3, 3)], (1, 1));
        let before = session.board().clone();

        let outcome = session.reveal(Position::new(3, 3)).unwrap();

        assert_eq!(outcome, RevealOutcome::HitMine);
        assert_eq!(session.phase(), GamePhase::Loss);
        assert_eq!(session.triggered_mine(), Some(Position::new(3, 3)));

        let changed: Vec<Position> = session
            .board()
            .iter()
            .filter(|&(pos, cell)| *cell != before[pos])
            .map(|(pos, _)| pos)
            .collect();
        assert_eq!(changed, [Position::new(3, 3)]);
        assert!(session.board()[Position::new(3, 3)].revealed());
    }

    #[test]
    fn finished_game_rejects_moves() {
        let mut session = started(config(4, 4, 2), &[(0, 0), (3, 3)], (1, 1));
        session.reveal(Position::new(0, 0)).unwrap();

        assert_eq!(
            session.reveal(Position::new(2, 2)),
            Err(GameError::InvalidAction {
                phase: GamePhase::Loss
            })
        );
        assert!(session.phase().is_finished());
    }

    #[test]
    fn reveal_ignores_flagged_and_revealed_cells() {
        let mut session = started(config(3, 3, 1), &[(0, 0)], (1, 1));
        session.flag(Position::new(2, 2)).unwrap();

        assert_eq!(session.reveal(Position::new(2, 2)), Ok(RevealOutcome::NoChange));
        assert_eq!(session.reveal(Position::new(1, 1)), Ok(RevealOutcome::NoChange));
        assert!(session.board()[Position::new(2, 2)].flagged());
    }

    #[test]
    fn revealing_last_safe_cell_wins() {
        // * . *
        // . . .
        let mut session = started(config(2, 3, 2), &[(0, 0), (0, 2)], (0, 1));

        assert_eq!(session.reveal(Position::new(1, 0)), Ok(RevealOutcome::Revealed));
        assert_eq!(session.reveal(Position::new(1, 1)), Ok(RevealOutcome::Revealed));
        assert_eq!(session.reveal(Position::new(1, 2)), Ok(RevealOutcome::Won));
        assert_eq!(session.phase(), GamePhase::Win);
    }

    #[test]
    fn mines_left_counts_flags() {
        let mut session = started(config(1, 3, 2), &[(0, 0), (0, 2)], (0, 1));

        assert_eq!(session.flag(Position::new(0, 0)), Ok(MarkOutcome::Changed));
        assert_eq!(session.mines_left(), 1);
    }

    #[test]
    fn flag_twice_restores_cell() {
        let mut session = started(config(3, 3, 1), &[(0, 0)], (1, 1));
        let before = session.board().clone();

        session.flag(Position::new(0, 0)).unwrap();
        assert_eq!(session.mines_left(), 0);
        session.flag(Position::new(0, 0)).unwrap();

        assert_eq!(session.board(), &before);
        assert_eq!(session.mines_left(), 1);
    }

    #[test]
    fn flagging_revealed_cell_is_noop() {
        let mut session = started(config(3, 3, 1), &[(0, 0)], (1, 1));

        assert_eq!(session.flag(Position::new(1, 1)), Ok(MarkOutcome::NoChange));
        assert!(!session.board()[Position::new(1, 1)].flagged());
    }

    #[test]
    fn chord_reveal_wins_when_flags_are_right() {
        let mut session = started(config(3, 3, 2), &[(0, 1), (2, 1)], (1, 1));
        session.flag(Position::new(0, 1)).unwrap();
        session.flag(Position::new(2, 1)).unwrap();

        assert_eq!(
            session.reveal_neighbours(Position::new(1, 1)),
            Ok(RevealOutcome::Won)
        );
        assert_eq!(session.phase(), GamePhase::Win);
    }

    #[test]
    fn unsatisfied_chord_changes_nothing() {
        let mut session = started(config(3, 3, 2), &[(0, 1), (2, 1)], (1, 1));
        session.flag(Position::new(0, 1)).unwrap();
        let before = session.board().clone();

        assert_eq!(
            session.reveal_neighbours(Position::new(1, 1)),
            Ok(RevealOutcome::NoChange)
        );
        assert_eq!(session.board(), &before);
        assert_eq!(session.phase(), GamePhase::InProgress);
    }

    #[test]
    fn chord_with_wrong_flag_loses() {
        let mut session = started(config(3, 3, 2), &[(0, 1), (2, 1)], (1, 1));
        session.flag(Position::new(0, 1)).unwrap();
        session.flag(Position::new(0, 0)).unwrap();

        assert_eq!(
            session.reveal_neighbours(Position::new(1, 1)),
            Ok(RevealOutcome::HitMine)
        );
        assert_eq!(session.phase(), GamePhase::Loss);
        assert_eq!(session.triggered_mine(), Some(Position::new(2, 1)));
        assert_eq!(
            session.board()[Position::new(0, 0)].final_view(),
            CellView::WrongFlag
        );
    }

    #[test]
    fn flag_policy_decides_whether_floods_cross_flags() {
        // * . . . .
        let mut sweeping = started(config(1, 5, 1), &[(0, 0)], (0, 1));
        sweeping.flag(Position::new(0, 3)).unwrap();
        assert_eq!(sweeping.reveal(Position::new(0, 4)), Ok(RevealOutcome::Won));

        let mut blocking = Session::new(config(1, 5, 1), 0).with_flag_policy(FlagPolicy::Block);
        blocking
            .start_with(Position::new(0, 1), preset(&[(0, 0)]))
            .unwrap();
        blocking.flag(Position::new(0, 3)).unwrap();

        assert_eq!(blocking.reveal(Position::new(0, 4)), Ok(RevealOutcome::Revealed));
        assert!(blocking.board()[Position::new(0, 3)].flagged());
        assert_eq!(blocking.flag_policy(), FlagPolicy::Block);
    }

    #[test]
    fn preset_mine_under_first_click_loses() {
        let mut session = Session::new(config(2, 2, 1), 0);

        let outcome = session.start_with(Position::new(0, 0), preset(&[(0, 0)]));

        assert_eq!(outcome, Ok(RevealOutcome::HitMine));
        assert_eq!(session.phase(), GamePhase::Loss);
    }

    #[test]
    fn start_with_rejects_board_not_matching_config() {
        let mut session = Session::new(config(1, 3, 1), 0);

        assert_eq!(
            session.start_with(Position::new(0, 0), preset(&[])),
            Err(GameError::LayoutMismatch)
        );
        assert_eq!(session.phase(), GamePhase::New);
        assert_eq!(session.board(), &Board::placeholder());

        struct Oversized;
        impl BoardGenerator for Oversized {
            fn generate(self, _config: FieldConfig) -> Board {
                Board::from_mines(2, 3, &[Position::new(1, 2)]).unwrap()
            }
        }
        assert_eq!(
            session.start_with(Position::new(0, 0), Oversized),
            Err(GameError::LayoutMismatch)
        );

        // the session is still usable and a matching layout can be won
        session
            .start_with(Position::new(0, 1), preset(&[(0, 2)]))
            .unwrap();
        assert_eq!(session.reveal(Position::new(0, 0)), Ok(RevealOutcome::Won));
        assert_eq!(session.phase(), GamePhase::Win);
    }

    #[test]
    fn restart_returns_to_new() {
        let mut session = started(config(4, 4, 2), &[(0, 0), (3, 3)], (1, 1));
        session.reveal(Position::new(0, 0)).unwrap();

        session.restart();

        assert_eq!(session.phase(), GamePhase::New);
        assert_eq!(session.board(), &Board::placeholder());
        assert_eq!(session.triggered_mine(), None);
        assert!(session.start(Position::new(2, 2)).is_ok());
    }
}
