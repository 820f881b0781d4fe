use std::collections::HashSet;
use std::fmt::Display;
use std::hash::Hash;

use serde::{Deserialize, Serialize};

use crate::{Load, ModelError, Seed, StationCount};

/// Inclusive range of loads `from / scale ..= to / scale`.
///
/// The default covers `0.1 ..= 2.0` in steps of `0.1`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LoadRange {
    pub from: u32,
    pub to: u32,
    pub scale: u32,
}

impl Default for LoadRange {
    fn default() -> Self {
        Self {
            from: 1,
            to: 20,
            scale: 10,
        }
    }
}

impl LoadRange {
    /// Number of loads on the axis; a reversed range or zero scale is empty.
    pub fn len(&self) -> usize {
        if self.scale == 0 || self.from > self.to {
            return 0;
        }
        (self.to - self.from) as usize + 1
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Loads in ascending order.
    pub fn values(&self) -> impl Iterator<Item = Load> + use<> {
        let scale = self.scale;
        let (from, to) = if self.is_empty() {
            (1, 0)
        } else {
            (self.from, self.to)
        };
        (from..=to).filter_map(move |numer| Load::new(numer, scale).ok())
    }
}

/// The three axes of the simulation grid.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GridAxes {
    pub stations: Vec<StationCount>,
    pub loads: LoadRange,
    pub seeds: Vec<Seed>,
}

impl Default for GridAxes {
    fn default() -> Self {
        Self {
            stations: vec![5, 10, 20],
            loads: LoadRange::default(),
            seeds: vec![1, 2],
        }
    }
}

impl GridAxes {
    /// Size of the Cartesian product.
    pub fn task_count(&self) -> usize {
        self.stations.len() * self.loads.len() * self.seeds.len()
    }

    /// Rejects axes that would enumerate the same tuple twice.
    ///
    /// Empty axes are allowed and simply produce an empty grid.
    pub fn validate(&self) -> Result<(), ModelError> {
        if self.loads.scale == 0 {
            return Err(ModelError::ZeroDenominator);
        }
        ensure_unique("stations", &self.stations)?;
        ensure_unique("seeds", &self.seeds)
    }
}

fn ensure_unique<T>(axis: &'static str, values: &[T]) -> Result<(), ModelError>
where
    T: Eq + Hash + Display,
{
    let mut seen = HashSet::with_capacity(values.len());
    for value in values {
        if !seen.insert(value) {
            return Err(ModelError::DuplicateAxisValue {
                axis,
                value: value.to_string(),
            });
        }
    }
    Ok(())
}
