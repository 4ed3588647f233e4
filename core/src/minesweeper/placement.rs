use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use smallvec::SmallVec;

use crate::*;

/// Mine placement that keeps the first revealed cell and its neighbors clear.
///
/// Every other cell is equally likely to hold a mine. Positions are drawn with a
/// partial Fisher-Yates shuffle over the unprotected cells, so dense boards cost
/// the same as sparse ones.
#[derive(Clone, Debug, PartialEq)]
pub struct SafeStartPlacement {
    seed: Option<u64>,
    start: Coord2,
}

impl SafeStartPlacement {
    pub fn new(seed: Option<u64>, start: Coord2) -> Self {
        Self { seed, start }
    }

    /// Returns `mines` distinct 1-based positions on a board of `size`.
    ///
    /// Fails with [`GameError::TooManyMines`] when fewer than `mines` cells remain
    /// outside the protected neighborhood.
    pub fn mine_positions(&self, size: Coord2, mines: CellCount) -> Result<Vec<Coord2>> {
        let protected: SmallVec<[Coord2; 9]> = core::iter::once(self.start)
            .chain(NeighborIter::new(self.start, size))
            .collect();

        let (width, height) = size;
        let mut candidates: Vec<Coord2> = (1..=height)
            .flat_map(|y| (1..=width).map(move |x| (x, y)))
            .filter(|coords| !protected.contains(coords))
            .collect();

        let mines = usize::from(mines);
        if candidates.len() < mines {
            log::warn!(
                "Cannot keep first move at {:?} clear, requested {} mines but only {} cells are free",
                self.start,
                mines,
                candidates.len()
            );
            return Err(GameError::TooManyMines);
        }

        let mut rng = match self.seed {
            Some(seed) => SmallRng::seed_from_u64(seed),
            None => SmallRng::from_os_rng(),
        };
        for i in 0..mines {
            let j = rng.random_range(i..candidates.len());
            candidates.swap(i, j);
        }
        candidates.truncate(mines);

        log::debug!("Placed {} mines around start {:?}", mines, self.start);
        Ok(candidates)
    }
}
