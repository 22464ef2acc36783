use thiserror::Error;

/// Malformed match descriptions, rejected before any graph is built.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum InvalidInput {
    #[error("need at least two rating groups, got {0}")]
    TooFewGroups(usize),
    #[error("rating group {0} has no members")]
    EmptyGroup(usize),
    #[error("got {ranks} ranks for {groups} rating groups")]
    RankCountMismatch { groups: usize, ranks: usize },
    #[error("member {member} of group {group} has weight {weight}; weights must be finite and positive")]
    InvalidWeight {
        group: usize,
        member: usize,
        weight: f64,
    },
}

/// Inference left the domain where the truncated-normal approximation holds,
/// which points to an unreasonable draw probability, beta, or prior.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum NumericalError {
    #[error("win truncation produced w = {0}, outside (0, 1)")]
    WinVarianceOutOfRange(f64),
    #[error("draw truncation denominator degenerated to {0}")]
    DegenerateDrawDenominator(f64),
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum RateError {
    #[error("invalid input: {0}")]
    Invalid(#[from] InvalidInput),
    #[error("numerical failure: {0}")]
    Numerical(#[from] NumericalError),
}

impl RateError {
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Invalid(_))
    }
}
