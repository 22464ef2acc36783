use crate::gaussian::Gaussian;
use serde::{Deserialize, Serialize};

/// A player's skill belief, plus the weight with which the player's
/// performance counts towards the team's (1 for full participation).
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Rating {
    pub mu: f64,
    pub sig: f64,
    #[serde(default = "full_weight")]
    pub weight: f64,
}

fn full_weight() -> f64 {
    1.
}

impl Rating {
    pub fn new(mu: f64, sig: f64) -> Self {
        Self {
            mu,
            sig,
            weight: full_weight(),
        }
    }

    pub fn with_weight(self, weight: f64) -> Self {
        Self { weight, ..self }
    }

    pub fn with_noise(self, sig_noise: f64) -> Self {
        Self {
            sig: self.sig.hypot(sig_noise),
            ..self
        }
    }

    pub fn to_gaussian(self) -> Gaussian {
        Gaussian::from_mu_sig(self.mu, self.sig)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_noise_widens_only_sig() {
        let rating = Rating::new(30., 3.).with_weight(0.5).with_noise(4.);
        assert_eq!(rating.mu, 30.);
        assert_eq!(rating.sig, 5.);
        assert_eq!(rating.weight, 0.5);
    }

    #[test]
    fn test_weight_defaults_when_missing() {
        let rating: Rating = serde_json::from_str(r#"{"mu": 20.0, "sig": 2.0}"#).unwrap();
        assert_eq!(rating, Rating::new(20., 2.));
    }
}
