//! Threshold Ladders
//!
//! Ordered (bound, result) tables. The first rung whose bound admits the
//! value wins; `otherwise` covers everything below the last rung, so every
//! ladder is a total function of its input.
//!
//! ```text
//!   value ──▶ rung 0 ──▶ rung 1 ──▶ ... ──▶ otherwise
//!               │          │
//!               ▼          ▼
//!             result     result
//! ```

/// Comparison a rung applies to the input value
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Bound<T> {
    /// Strictly greater than
    Above(T),
    /// Greater than or equal to
    AtLeast(T),
    /// Less than or equal to
    AtMost(T),
}

impl<T: PartialOrd> Bound<T> {
    pub fn admits(&self, value: &T) -> bool {
        match self {
            Self::Above(limit) => value > limit,
            Self::AtLeast(limit) => value >= limit,
            Self::AtMost(limit) => value <= limit,
        }
    }
}

/// An ordered, first-match-wins classification table
#[derive(Clone, Copy, Debug)]
pub struct Ladder<T: 'static, O: 'static> {
    rungs: &'static [(Bound<T>, O)],
    otherwise: O,
}

impl<T: PartialOrd, O: Copy> Ladder<T, O> {
    pub const fn new(rungs: &'static [(Bound<T>, O)], otherwise: O) -> Self {
        Self { rungs, otherwise }
    }

    pub fn classify(&self, value: &T) -> O {
        self.rungs
            .iter()
            .find(|(bound, _)| bound.admits(value))
            .map_or(self.otherwise, |(_, result)| *result)
    }

    pub fn rungs(&self) -> &'static [(Bound<T>, O)] {
        self.rungs
    }
}
