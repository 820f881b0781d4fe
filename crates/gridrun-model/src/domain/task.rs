use std::fmt;

use serde::Serialize;

use crate::{Load, Seed, StationCount};

/// One point of the parameter grid: a single simulator run.
///
/// `index` is the position of the task in enumeration order and only serves
/// logging and tests; the simulator never sees it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SimTask {
    pub index: usize,
    pub stations: StationCount,
    pub load: Load,
    pub seed: Seed,
}

impl SimTask {
    pub fn new(index: usize, stations: StationCount, load: Load, seed: Seed) -> Self {
        Self {
            index,
            stations,
            load,
            seed,
        }
    }

    /// Parameter tuple without the enumeration index.
    #[inline]
    pub fn params(&self) -> (StationCount, Load, Seed) {
        (self.stations, self.load, self.seed)
    }
}

impl fmt::Display for SimTask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "#{} nStas={} load={} seed={}",
            self.index, self.stations, self.load, self.seed
        )
    }
}
