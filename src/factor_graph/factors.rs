use super::truncation::Outcome;
use super::variable::{EdgeId, Variables};
use crate::error::NumericalError;
use crate::gaussian::Gaussian;
use crate::rating::Rating;

/// Anchors a skill variable at a player's prior rating, widened by the
/// skill drift expected since that rating was last updated.
#[derive(Clone, Debug)]
pub struct PriorFactor {
    pub edge: EdgeId,
    pub prior: Rating,
    pub sig_drift: f64,
}

/// Couples a skill with a noisy sample of it: `value ~ N(mean, variance)`.
#[derive(Clone, Debug)]
pub struct LikelihoodFactor {
    pub mean: EdgeId,
    pub value: EdgeId,
    pub variance: f64,
}

/// Constrains `sum = coeffs[0] * terms[0] + coeffs[1] * terms[1] + ...`
#[derive(Clone, Debug)]
pub struct SumFactor {
    pub sum: EdgeId,
    pub terms: Vec<EdgeId>,
    pub coeffs: Vec<f64>,
}

/// Observes the sign of a performance difference, up to the draw margin.
#[derive(Clone, Debug)]
pub struct TruncateFactor {
    pub edge: EdgeId,
    pub outcome: Outcome,
    pub draw_margin: f64,
}

impl PriorFactor {
    pub fn down(&self, vars: &mut Variables) -> f64 {
        let value = self.prior.with_noise(self.sig_drift).to_gaussian();
        vars.update_value(self.edge, value)
    }
}

impl LikelihoodFactor {
    fn send(&self, vars: &mut Variables, from: EdgeId, to: EdgeId) -> f64 {
        let msg = vars.excluding(from);
        let a = (self.variance * msg.pi + 1.).recip();
        vars.update_message(to, Gaussian::from_precision(a * msg.pi, a * msg.tau))
    }

    pub fn down(&self, vars: &mut Variables) -> f64 {
        self.send(vars, self.mean, self.value)
    }

    pub fn up(&self, vars: &mut Variables) -> f64 {
        self.send(vars, self.value, self.mean)
    }
}

impl SumFactor {
    pub fn new(sum: EdgeId, terms: Vec<EdgeId>, coeffs: Vec<f64>) -> Self {
        assert_eq!(terms.len(), coeffs.len());
        Self { sum, terms, coeffs }
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    // Sends to `target` the distribution of sum_i coeffs[i] * vals[i],
    // treating the vals as independent given everything but this factor.
    fn update(
        &self,
        vars: &mut Variables,
        target: EdgeId,
        vals: &[EdgeId],
        coeffs: &[f64],
    ) -> f64 {
        let mut pi_inv = 0.;
        let mut mu = 0.;
        for (&val, &coeff) in vals.iter().zip(coeffs) {
            let div = vars.excluding(val);
            mu += coeff * div.mu();
            if pi_inv == f64::INFINITY {
                continue;
            }
            if div.pi == 0. {
                pi_inv = f64::INFINITY;
            } else {
                pi_inv += coeff * coeff / div.pi;
            }
        }
        let pi = pi_inv.recip();
        vars.update_message(target, Gaussian::from_precision(pi, pi * mu))
    }

    pub fn down(&self, vars: &mut Variables) -> f64 {
        self.update(vars, self.sum, &self.terms, &self.coeffs)
    }

    /// Solves the constraint for `terms[index]` given the sum and the other terms.
    pub fn up(&self, vars: &mut Variables, index: usize) -> f64 {
        let coeff = self.coeffs[index];
        let coeffs: Vec<f64> = self
            .coeffs
            .iter()
            .enumerate()
            .map(|(i, &c)| {
                let p = if i == index { coeff.recip() } else { -c / coeff };
                if p.is_finite() { p } else { 0. }
            })
            .collect();
        let mut vals = self.terms.clone();
        vals[index] = self.sum;
        self.update(vars, self.terms[index], &vals, &coeffs)
    }
}

impl TruncateFactor {
    pub fn up(&self, vars: &mut Variables) -> Result<f64, NumericalError> {
        let div = vars.excluding(self.edge);
        let sqrt_pi = div.pi.sqrt();
        let diff = div.tau / sqrt_pi;
        let margin = self.draw_margin * sqrt_pi;
        let v = self.outcome.v(diff, margin);
        let w = self.outcome.w(diff, margin)?;
        let denom = 1. - w;
        let value = Gaussian::from_precision(div.pi / denom, (div.tau + sqrt_pi * v) / denom);
        Ok(vars.update_value(self.edge, value))
    }
}

/// The closed set of factor kinds. Each returns the size of the change it made,
/// and directions a kind has no use for are no-ops.
#[derive(Clone, Debug)]
pub enum Factor {
    Prior(PriorFactor),
    Likelihood(LikelihoodFactor),
    Sum(SumFactor),
    Truncate(TruncateFactor),
}

impl Factor {
    /// Propagates from skills towards the observed outcome.
    pub fn down(&self, vars: &mut Variables) -> f64 {
        match self {
            Self::Prior(f) => f.down(vars),
            Self::Likelihood(f) => f.down(vars),
            Self::Sum(f) => f.down(vars),
            Self::Truncate(_) => 0.,
        }
    }

    /// Propagates from the observed outcome back towards skills. `index` picks
    /// the term solved for by a `Sum` factor and is ignored by the others.
    pub fn up(&self, vars: &mut Variables, index: usize) -> Result<f64, NumericalError> {
        Ok(match self {
            Self::Prior(_) => 0.,
            Self::Likelihood(f) => f.up(vars),
            Self::Sum(f) => f.up(vars, index),
            Self::Truncate(f) => f.up(vars)?,
        })
    }
}
