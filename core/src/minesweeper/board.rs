use core::time::Duration;
use ndarray::Array2;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use web_time::Instant;

use super::*;

/// Valid transitions:
/// - AwaitingFirstMove -> InProgress
/// - InProgress -> Failed
/// - InProgress -> Completed
///
/// Only [`Board::reset`] leaves a finished state.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameStatus {
    /// No mines placed yet
    #[default]
    AwaitingFirstMove,
    InProgress,
    /// A mine was revealed
    Failed,
    /// Every safe cell was revealed
    Completed,
}

impl GameStatus {
    pub const fn is_awaiting_first_move(self) -> bool {
        matches!(self, Self::AwaitingFirstMove)
    }

    pub const fn is_finished(self) -> bool {
        matches!(self, Self::Failed | Self::Completed)
    }
}

/// Grid position to array index, coordinates are 1-based.
const fn nd((x, y): Coord2) -> [usize; 2] {
    [x as usize - 1, y as usize - 1]
}

/// A Minesweeper game from first move to finish.
#[derive(Clone, Debug)]
pub struct Board {
    config: GameConfig,
    cells: Array2<Cell>,
    revealed_safe_count: CellCount,
    flagged_count: CellCount,
    status: GameStatus,
    triggered_mine: Option<Coord2>,
    stopwatch: Stopwatch,
}

impl Board {
    pub fn new(config: GameConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::blank(config))
    }

    fn blank(config: GameConfig) -> Self {
        let (width, height) = config.size();
        Self {
            config,
            cells: Array2::default((usize::from(width), usize::from(height))),
            revealed_safe_count: 0,
            flagged_count: 0,
            status: GameStatus::default(),
            triggered_mine: None,
            stopwatch: Stopwatch::default(),
        }
    }

    /// Starts over with the same dimensions and mine count.
    pub fn reset(&mut self) {
        *self = Self::blank(self.config);
        log::debug!("Board reset to {:?}", self.config);
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn size(&self) -> Coord2 {
        self.config.size()
    }

    pub fn width(&self) -> Coord {
        self.config.width
    }

    pub fn height(&self) -> Coord {
        self.config.height
    }

    pub fn total_mines(&self) -> CellCount {
        self.config.mines
    }

    pub fn status(&self) -> GameStatus {
        self.status
    }

    pub fn is_finished(&self) -> bool {
        self.status.is_finished()
    }

    pub fn triggered_mine(&self) -> Option<Coord2> {
        self.triggered_mine
    }

    pub fn flagged_count(&self) -> CellCount {
        self.flagged_count
    }

    /// How many mines have not been flagged yet, negative when over-flagged.
    pub fn mines_remaining(&self) -> isize {
        (self.config.mines as isize) - (self.flagged_count as isize)
    }

    /// Time since the first move, frozen once the game ends.
    pub fn elapsed(&self) -> Duration {
        self.stopwatch.elapsed()
    }

    pub fn elapsed_at(&self, now: Instant) -> Duration {
        self.stopwatch.elapsed_at(now)
    }

    pub fn validate_coords(&self, coords: Coord2) -> Result<Coord2> {
        let (width, height) = self.size();
        if (1..=width).contains(&coords.0) && (1..=height).contains(&coords.1) {
            Ok(coords)
        } else {
            Err(GameError::InvalidCoords)
        }
    }

    pub fn cell(&self, coords: Coord2) -> Result<Cell> {
        let coords = self.validate_coords(coords)?;
        Ok(self.cells[nd(coords)])
    }

    /// All cells in row-major order with their positions.
    pub fn cells(&self) -> impl Iterator<Item = (Coord2, Cell)> + '_ {
        let (width, height) = self.size();
        (1..=height)
            .flat_map(move |y| (1..=width).map(move |x| (x, y)))
            .map(move |coords| (coords, self.cells[nd(coords)]))
    }

    /// In-bounds positions touching `coords`, excluding `coords` itself.
    pub fn neighbors(&self, coords: Coord2) -> Result<SmallVec<[Coord2; 8]>> {
        let coords = self.validate_coords(coords)?;
        Ok(self.iter_neighbors(coords).collect())
    }

    pub fn make_move(&mut self, coords: Coord2) -> Result<RevealOutcome> {
        self.make_move_at(coords, Instant::now())
    }

    /// Reveals `coords`, laying out the mines first if this is the opening move.
    pub fn make_move_at(&mut self, coords: Coord2, now: Instant) -> Result<RevealOutcome> {
        let coords = self.validate_coords(coords)?;
        self.check_not_finished()?;

        if self.status.is_awaiting_first_move() {
            self.place_mines(coords)?;
            self.status = GameStatus::InProgress;
            self.stopwatch.start(now);
            log::debug!("Game started at {:?}", coords);
        }

        Ok(self.reveal(coords, now))
    }

    pub fn flag(&mut self, coords: Coord2) -> Result<MarkOutcome> {
        use CellState::*;
        use MarkOutcome::*;

        let coords = self.validate_coords(coords)?;
        self.check_not_finished()?;

        let cell = &mut self.cells[nd(coords)];
        Ok(match cell.state {
            Hidden => {
                cell.state = Flagged;
                self.flagged_count += 1;
                Changed
            }
            Flagged => {
                cell.state = Hidden;
                self.flagged_count -= 1;
                Changed
            }
            Revealed => NoChange,
        })
    }

    fn place_mines(&mut self, start: Coord2) -> Result<()> {
        let positions = SafeStartPlacement::new(self.config.seed, start)
            .mine_positions(self.size(), self.config.mines)?;
        for coords in positions {
            self.cells[nd(coords)].mine = true;
        }

        let (width, height) = self.size();
        for y in 1..=height {
            for x in 1..=width {
                let coords = (x, y);
                if self.cells[nd(coords)].mine {
                    continue;
                }
                let count = self
                    .iter_neighbors(coords)
                    .filter(|&pos| self.cells[nd(pos)].mine)
                    .count();
                self.cells[nd(coords)].adjacent_mines = count as u8;
            }
        }
        Ok(())
    }

    fn reveal(&mut self, coords: Coord2, now: Instant) -> RevealOutcome {
        if !self.reveal_single_cell(coords) {
            return RevealOutcome::NoChange;
        }

        let cell = self.cells[nd(coords)];
        if cell.mine {
            self.triggered_mine = Some(coords);
            self.end_game(GameStatus::Failed, now);
            return RevealOutcome::HitMine;
        }
        log::debug!("Revealed {:?}, adjacent mines: {}", coords, cell.adjacent_mines);

        if cell.adjacent_mines == 0 {
            self.cascade(coords);
        }

        if self.all_safe_cells_revealed() {
            self.end_game(GameStatus::Completed, now);
            RevealOutcome::Won
        } else {
            RevealOutcome::Revealed
        }
    }

    /// Flood-reveals the zero region around `origin` and its numbered border.
    ///
    /// A cell's revealed state doubles as the visited marker, so each cell is pushed at
    /// most once.
    fn cascade(&mut self, origin: Coord2) {
        let mut to_visit = vec![origin];

        while let Some(center) = to_visit.pop() {
            for pos in self.iter_neighbors(center) {
                if self.reveal_single_cell(pos) && self.cells[nd(pos)].adjacent_mines == 0 {
                    log::trace!("Cascade continues from {:?}", pos);
                    to_visit.push(pos);
                }
            }
        }
    }

    /// Marks one cell revealed, clearing any flag. Returns false if it already was.
    fn reveal_single_cell(&mut self, coords: Coord2) -> bool {
        let cell = &mut self.cells[nd(coords)];
        match cell.state {
            CellState::Revealed => return false,
            CellState::Flagged => self.flagged_count -= 1,
            CellState::Hidden => {}
        }
        cell.state = CellState::Revealed;
        if !cell.mine {
            self.revealed_safe_count += 1;
        }
        true
    }

    /// True when the unrevealed cells are exactly the mines.
    fn all_safe_cells_revealed(&self) -> bool {
        self.revealed_safe_count == self.config.total_cells() - self.config.mines
    }

    fn end_game(&mut self, status: GameStatus, now: Instant) {
        if self.status.is_finished() {
            return;
        }

        self.status = status;
        self.stopwatch.stop(now);
        if matches!(status, GameStatus::Failed) {
            self.reveal_mines();
        }
        log::debug!("Game ended as {:?} after {:?}", status, self.stopwatch.elapsed_at(now));
    }

    fn reveal_mines(&mut self) {
        for cell in self.cells.iter_mut() {
            if !cell.mine {
                continue;
            }
            if cell.state == CellState::Flagged {
                self.flagged_count -= 1;
            }
            cell.state = CellState::Revealed;
        }
    }

    fn check_not_finished(&self) -> Result<()> {
        if self.status.is_finished() {
            Err(GameError::AlreadyEnded)
        } else {
            Ok(())
        }
    }

    fn iter_neighbors(&self, coords: Coord2) -> NeighborIter {
        NeighborIter::new(coords, self.size())
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::blank(GameConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn started(config: GameConfig, first: Coord2) -> Board {
        let mut board = Board::new(config).unwrap();
        board.make_move(first).unwrap();
        board
    }

    /// First seeded board whose opening move leaves the game running.
    fn in_progress(config: GameConfig, first: Coord2) -> Board {
        (0..)
            .map(|seed| started(config.with_seed(seed), first))
            .find(|board| board.status() == GameStatus::InProgress)
            .unwrap()
    }

    fn mines(board: &Board) -> Vec<Coord2> {
        board
            .cells()
            .filter(|(_, cell)| cell.is_mine())
            .map(|(coords, _)| coords)
            .collect()
    }

    fn unrevealed(board: &Board) -> Vec<Coord2> {
        board
            .cells()
            .filter(|(_, cell)| !cell.is_revealed())
            .map(|(coords, _)| coords)
            .collect()
    }

    #[test]
    fn new_board_is_hidden_and_mine_free() {
        let board = Board::new(GameConfig::new(4, 3, 2)).unwrap();

        assert_eq!(board.status(), GameStatus::AwaitingFirstMove);
        assert_eq!(board.cells().count(), 12);
        assert!(board.cells().all(|(_, cell)| cell == Cell::default()));
        assert_eq!(board.elapsed(), Duration::ZERO);
    }

    #[test]
    fn new_rejects_invalid_configuration() {
        assert_eq!(
            Board::new(GameConfig::new(0, 3, 0)).unwrap_err(),
            GameError::EmptyBoard
        );
        assert_eq!(
            Board::new(GameConfig::new(2, 2, 4)).unwrap_err(),
            GameError::TooManyMines
        );
    }

    #[test]
    fn neighbors_are_bounded_and_symmetric() {
        let board = Board::new(GameConfig::new(5, 4, 1)).unwrap();

        for (a, _) in board.cells() {
            let neighbors = board.neighbors(a).unwrap();
            assert!((3..=8).contains(&neighbors.len()));
            assert!(!neighbors.contains(&a));
            for &b in &neighbors {
                assert!(board.neighbors(b).unwrap().contains(&a));
            }
        }
        assert_eq!(board.neighbors((1, 1)).unwrap().len(), 3);
        assert_eq!(board.neighbors((3, 1)).unwrap().len(), 5);
        assert_eq!(board.neighbors((3, 2)).unwrap().len(), 8);
        assert_eq!(board.neighbors((6, 1)), Err(GameError::InvalidCoords));
    }

    #[test]
    fn first_move_neighborhood_is_mine_free() {
        for seed in 0..30 {
            let board = started(GameConfig::new(9, 9, 30).with_seed(seed), (5, 5));

            assert_eq!(mines(&board).len(), 30);
            assert!(!board.cell((5, 5)).unwrap().is_mine());
            for pos in board.neighbors((5, 5)).unwrap() {
                assert!(!board.cell(pos).unwrap().is_mine());
            }
        }
    }

    #[test]
    fn adjacent_counts_match_neighboring_mines() {
        let board = started(GameConfig::new(12, 10, 35).with_seed(11), (1, 1));

        for (coords, cell) in board.cells().filter(|(_, cell)| !cell.is_mine()) {
            let expected = board
                .neighbors(coords)
                .unwrap()
                .into_iter()
                .filter(|&pos| board.cell(pos).unwrap().is_mine())
                .count();
            assert_eq!(usize::from(cell.adjacent_mines()), expected);
        }
    }

    #[test]
    fn first_move_starts_game_and_timer() {
        let board = in_progress(GameConfig::new(8, 8, 20), (4, 4));

        assert_eq!(board.status(), GameStatus::InProgress);
        assert!(board.cell((4, 4)).unwrap().is_revealed());
        assert_eq!(board.cell((4, 4)).unwrap().adjacent_mines(), 0);
        assert!(board.stopwatch.is_running());
    }

    #[test]
    fn single_cell_board_completes_on_first_move() {
        let mut board = Board::new(GameConfig::new(1, 1, 0)).unwrap();

        assert_eq!(board.make_move((1, 1)).unwrap(), RevealOutcome::Won);
        assert_eq!(board.status(), GameStatus::Completed);
        assert!(!board.stopwatch.is_running());
    }

    #[test]
    fn dense_board_fails_first_move_without_mutating() {
        let mut board = Board::new(GameConfig::new(3, 3, 8)).unwrap();

        assert_eq!(board.make_move((2, 2)), Err(GameError::TooManyMines));
        assert_eq!(board.status(), GameStatus::AwaitingFirstMove);
        assert!(board.cells().all(|(_, cell)| cell == Cell::default()));
        assert_eq!(board.elapsed(), Duration::ZERO);
    }

    #[test]
    fn out_of_bounds_move_is_rejected() {
        let mut board = Board::new(GameConfig::new(3, 3, 1)).unwrap();

        assert_eq!(board.make_move((0, 1)), Err(GameError::InvalidCoords));
        assert_eq!(board.make_move((4, 1)), Err(GameError::InvalidCoords));
        assert_eq!(board.flag((1, 4)), Err(GameError::InvalidCoords));
        assert_eq!(GameError::InvalidCoords.kind(), ErrorKind::InvalidInput);
        assert_eq!(board.status(), GameStatus::AwaitingFirstMove);
    }

    #[test]
    fn cascade_reveals_zero_region_and_border_only() {
        // Corner start on a 5x1 strip: mines can only land at x = 3..=5.
        let mut board = Board::new(GameConfig::new(5, 1, 1).with_seed(0)).unwrap();
        board.make_move((1, 1)).unwrap();

        let mine_x = mines(&board)[0].0;
        for x in 1..=5 {
            let cell = board.cell((x, 1)).unwrap();
            assert_eq!(cell.is_revealed(), x < mine_x, "x = {x}, mine at {mine_x}");
        }
    }

    #[test]
    fn cascade_is_idempotent() {
        let mut board = in_progress(GameConfig::new(10, 10, 12), (5, 5));
        let before = unrevealed(&board);

        assert_eq!(board.make_move((5, 5)).unwrap(), RevealOutcome::NoChange);
        assert_eq!(unrevealed(&board), before);
    }

    #[test]
    fn completes_when_only_mines_remain_hidden() {
        let mut board = in_progress(GameConfig::new(6, 6, 6), (1, 1));
        let safe: Vec<_> = board
            .cells()
            .filter(|(_, cell)| !cell.is_mine())
            .map(|(coords, _)| coords)
            .collect();

        let all_mines = mines(&board);
        for coords in safe {
            if board.is_finished() {
                break;
            }
            let hidden = unrevealed(&board);
            assert!(hidden.len() > all_mines.len());
            assert!(all_mines.iter().all(|pos| hidden.contains(pos)));
            board.make_move(coords).unwrap();
        }

        assert_eq!(board.status(), GameStatus::Completed);
        assert_eq!(unrevealed(&board), mines(&board));
        assert!(!board.stopwatch.is_running());
    }

    #[test]
    fn revealing_a_mine_fails_and_shows_every_mine() {
        let mut board = in_progress(GameConfig::new(8, 8, 20), (8, 8));
        let all_mines = mines(&board);
        board.flag(all_mines[1]).unwrap();

        assert_eq!(board.make_move(all_mines[0]).unwrap(), RevealOutcome::HitMine);
        assert_eq!(board.status(), GameStatus::Failed);
        assert_eq!(board.triggered_mine(), Some(all_mines[0]));
        assert!(all_mines.iter().all(|&pos| {
            let cell = board.cell(pos).unwrap();
            cell.is_revealed() && !cell.is_flagged()
        }));
        assert_eq!(board.flagged_count(), 0);
        assert!(!board.stopwatch.is_running());
    }

    #[test]
    fn finished_board_rejects_moves_and_flags() {
        let mut board = Board::new(GameConfig::new(1, 1, 0)).unwrap();
        board.make_move((1, 1)).unwrap();

        assert_eq!(board.make_move((1, 1)), Err(GameError::AlreadyEnded));
        assert_eq!(board.flag((1, 1)), Err(GameError::AlreadyEnded));
        assert_eq!(GameError::AlreadyEnded.kind(), ErrorKind::InvalidState);
        assert_eq!(board.status(), GameStatus::Completed);
    }

    #[test]
    fn flag_toggle_is_its_own_inverse() {
        let mut board = Board::new(GameConfig::new(4, 4, 3)).unwrap();

        assert_eq!(board.flag((2, 3)).unwrap(), MarkOutcome::Changed);
        assert!(board.cell((2, 3)).unwrap().is_flagged());
        assert_eq!(board.mines_remaining(), 2);

        assert_eq!(board.flag((2, 3)).unwrap(), MarkOutcome::Changed);
        assert_eq!(board.cell((2, 3)).unwrap(), Cell::default());
        assert_eq!(board.mines_remaining(), 3);
    }

    #[test]
    fn revealed_cells_cannot_be_flagged() {
        let mut board = in_progress(GameConfig::new(6, 6, 10), (3, 3));

        assert_eq!(board.flag((3, 3)).unwrap(), MarkOutcome::NoChange);
        assert!(!board.cell((3, 3)).unwrap().is_flagged());
    }

    #[test]
    fn revealing_flagged_cell_clears_flag() {
        let mut board = Board::new(GameConfig::new(5, 5, 2).with_seed(4)).unwrap();
        board.flag((1, 1)).unwrap();

        board.make_move((1, 1)).unwrap();

        let cell = board.cell((1, 1)).unwrap();
        assert!(cell.is_revealed());
        assert!(!cell.is_flagged());
        assert_eq!(board.flagged_count(), 0);
    }

    #[test]
    fn reset_restores_initial_state() {
        let mut board = in_progress(GameConfig::new(7, 7, 9), (4, 4));
        let config = *board.config();
        let (mine, _) = board.cells().find(|(_, cell)| cell.is_mine()).unwrap();
        assert_eq!(board.flag(mine).unwrap(), MarkOutcome::Changed);
        assert_eq!(board.mines_remaining(), 8);

        board.reset();

        assert_eq!(board.status(), GameStatus::AwaitingFirstMove);
        assert_eq!(board.config(), &config);
        assert!(!board.cell(mine).unwrap().is_flagged());
        assert!(board.cells().all(|(_, cell)| cell == Cell::default()));
        assert_eq!(board.mines_remaining(), 9);
        assert_eq!(board.elapsed(), Duration::ZERO);
        assert_eq!(board.triggered_mine(), None);
    }

    #[test]
    fn elapsed_freezes_after_game_ends() {
        let t0 = Instant::now();
        let mut board = Board::new(GameConfig::new(1, 1, 0)).unwrap();

        board.make_move_at((1, 1), t0).unwrap();

        assert_eq!(board.elapsed_at(t0 + Duration::from_secs(30)), Duration::ZERO);
        assert_eq!(board.elapsed(), board.elapsed());
    }
}
