//! Scoring strategy implementations.
//!
//! Exactly two strategies exist and [`Strategy`] is the closed set of them;
//! [`Strategy::select`] picks one from the client's history.

pub mod cold_start;
pub mod personalized;

// Re-export for convenience
pub use cold_start::ColdStartStrategy;
pub use personalized::{CategoryAffinity, PersonalizedStrategy, PURCHASED_SCORE};

use crate::traits::AnalysisStrategy;
use crate::types::{AnalysisInput, ScoreMap};
use catalog::InteractionEvent;
use rand::RngCore;

/// The strategy chosen for one request
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Strategy {
    ColdStart(ColdStartStrategy),
    Personalized(PersonalizedStrategy),
}

impl Strategy {
    /// Personalized when the client has any history, cold-start otherwise
    pub fn select(history: &[InteractionEvent]) -> Self {
        if history.is_empty() {
            Strategy::ColdStart(ColdStartStrategy::default())
        } else {
            Strategy::Personalized(PersonalizedStrategy::default())
        }
    }

    /// Upper bound of the noise this strategy adds to a score
    pub fn noise(&self) -> f64 {
        match self {
            Strategy::ColdStart(s) => s.noise(),
            Strategy::Personalized(s) => s.noise(),
        }
    }
}

impl AnalysisStrategy for Strategy {
    fn name(&self) -> &'static str {
        match self {
            Strategy::ColdStart(s) => s.name(),
            Strategy::Personalized(s) => s.name(),
        }
    }

    fn analyze(&self, input: &AnalysisInput<'_>, rng: &mut dyn RngCore) -> ScoreMap {
        match self {
            Strategy::ColdStart(s) => s.analyze(input, rng),
            Strategy::Personalized(s) => s.analyze(input, rng),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use catalog::ActionKind;

    #[test]
    fn test_select_by_history_presence() {
        assert_eq!(Strategy::select(&[]).name(), "cold_start");

        let history = vec![InteractionEvent::new("c", "p", ActionKind::Review, 0)];
        let strategy = Strategy::select(&history);
        assert_eq!(strategy.name(), "personalized");
        assert_eq!(strategy.noise(), 0.01);
    }
}
