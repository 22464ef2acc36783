mod factors;
mod truncation;
mod variable;

pub use factors::{Factor, LikelihoodFactor, PriorFactor, SumFactor, TruncateFactor};
pub use truncation::{Outcome, v_draw, v_win, w_draw, w_win};
pub use variable::{Edge, EdgeId, VarId, Variable, Variables};

use crate::error::NumericalError;
use crate::gaussian::Gaussian;
use crate::rating::Rating;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct FactorId(pub usize);

/// A bipartite graph of variables and factors, addressed by index. Factors
/// reach their variables only through the edges they were built with.
#[derive(Clone, Debug, Default)]
pub struct FactorGraph {
    vars: Variables,
    factors: Vec<Factor>,
}

impl FactorGraph {
    pub fn add_variable(&mut self) -> VarId {
        self.vars.add_variable()
    }

    fn push(&mut self, factor: Factor) -> FactorId {
        self.factors.push(factor);
        FactorId(self.factors.len() - 1)
    }

    pub fn add_prior(&mut self, var: VarId, prior: Rating, sig_drift: f64) -> FactorId {
        let edge = self.vars.connect(var);
        self.push(Factor::Prior(PriorFactor {
            edge,
            prior,
            sig_drift,
        }))
    }

    pub fn add_likelihood(&mut self, mean: VarId, value: VarId, variance: f64) -> FactorId {
        let mean = self.vars.connect(mean);
        let value = self.vars.connect(value);
        self.push(Factor::Likelihood(LikelihoodFactor {
            mean,
            value,
            variance,
        }))
    }

    pub fn add_sum(&mut self, sum: VarId, terms: &[VarId], coeffs: Vec<f64>) -> FactorId {
        let sum = self.vars.connect(sum);
        let terms = terms.iter().map(|&var| self.vars.connect(var)).collect();
        self.push(Factor::Sum(SumFactor::new(sum, terms, coeffs)))
    }

    pub fn add_truncate(&mut self, var: VarId, outcome: Outcome, draw_margin: f64) -> FactorId {
        let edge = self.vars.connect(var);
        self.push(Factor::Truncate(TruncateFactor {
            edge,
            outcome,
            draw_margin,
        }))
    }

    pub fn factor(&self, id: FactorId) -> &Factor {
        &self.factors[id.0]
    }

    pub fn num_factors(&self) -> usize {
        self.factors.len()
    }

    pub fn variables(&self) -> &Variables {
        &self.vars
    }

    pub fn belief(&self, var: VarId) -> Gaussian {
        self.vars.belief(var)
    }

    pub fn down(&mut self, id: FactorId) -> f64 {
        self.factors[id.0].down(&mut self.vars)
    }

    pub fn up(&mut self, id: FactorId, index: usize) -> Result<f64, NumericalError> {
        self.factors[id.0].up(&mut self.vars, index)
    }
}
