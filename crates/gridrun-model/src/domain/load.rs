use std::fmt;

use serde::Serialize;

use crate::ModelError;

/// Offered network load as an exact fraction `numer / denom`.
///
/// Grid points compare and hash on the fraction itself; the floating point value
/// only appears when the load is rendered for the simulator.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct Load {
    numer: u32,
    denom: u32,
}

impl Load {
    pub fn new(numer: u32, denom: u32) -> Result<Self, ModelError> {
        if denom == 0 {
            return Err(ModelError::ZeroDenominator);
        }
        Ok(Self { numer, denom })
    }

    /// Load expressed in tenths: `Load::tenths(3)` is `0.3`.
    #[inline]
    pub const fn tenths(numer: u32) -> Self {
        Self { numer, denom: 10 }
    }

    #[inline]
    pub fn as_f64(&self) -> f64 {
        f64::from(self.numer) / f64::from(self.denom)
    }
}

/// Shortest round-trip decimal that always carries a fractional part (`1.0`, `0.3`).
impl fmt::Display for Load {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self.as_f64())
    }
}
