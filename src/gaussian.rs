use overload::overload;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::ops;

/// A normal distribution in precision form: `pi` is the inverse variance and
/// `tau` is the precision-weighted mean. Products and quotients of densities
/// become sums and differences of these parameters.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Gaussian {
    pub pi: f64,
    pub tau: f64,
}

/// The flat density, carrying no evidence at all.
pub const FLAT: Gaussian = Gaussian { pi: 0., tau: 0. };

impl Gaussian {
    pub fn from_precision(pi: f64, tau: f64) -> Self {
        Self { pi, tau }
    }

    pub fn from_mu_sig(mu: f64, sig: f64) -> Self {
        let pi = sig.powi(-2);
        Self { pi, tau: pi * mu }
    }

    pub fn mu(&self) -> f64 {
        if self.pi == 0. { 0. } else { self.tau / self.pi }
    }

    pub fn sig(&self) -> f64 {
        if self.pi == 0. {
            f64::INFINITY
        } else {
            self.pi.recip().sqrt()
        }
    }
}

overload!((a: ?Gaussian) * (b: ?Gaussian) -> Gaussian {
    Gaussian {
        pi: a.pi + b.pi,
        tau: a.tau + b.tau,
    }
});

overload!((a: &mut Gaussian) *= (b: ?Gaussian) {
    a.pi += b.pi;
    a.tau += b.tau;
});

overload!((a: ?Gaussian) / (b: ?Gaussian) -> Gaussian {
    Gaussian {
        pi: a.pi - b.pi,
        tau: a.tau - b.tau,
    }
});

overload!((a: &mut Gaussian) /= (b: ?Gaussian) {
    a.pi -= b.pi;
    a.tau -= b.tau;
});

// Ordered by mean; distinct densities sharing a mean are incomparable,
// which keeps the ordering consistent with equality.
impl PartialOrd for Gaussian {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        if self == other {
            return Some(Ordering::Equal);
        }
        match self.mu().partial_cmp(&other.mu()) {
            Some(Ordering::Equal) => None,
            ord => ord,
        }
    }
}
