pub mod error;
pub mod factor_graph;
pub mod gaussian;
pub mod numerical;
pub mod rating;
pub mod true_skill;

pub use error::{InvalidInput, NumericalError, RateError};
pub use gaussian::Gaussian;
pub use rating::Rating;
pub use true_skill::{Convergence, TrueSkill};
