//! TrueSkill details: https://www.microsoft.com/en-us/research/publication/trueskilltm-a-bayesian-skill-rating-system/

mod schedule;

pub use schedule::Convergence;

use crate::error::{InvalidInput, RateError};
use crate::numerical::standard_normal_cdf_inv;
use crate::rating::Rating;
use rayon::prelude::*;
use schedule::MatchGraph;
use serde::{Deserialize, Serialize};

/// The rating environment. Every match rated through it shares these constants.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrueSkill {
    // initial mean of new ratings
    pub mu: f64,
    // initial deviation of new ratings
    pub sig: f64,
    // performance deviation: a skill gap of beta wins about 76% of the time
    pub beta: f64,
    // skill drift added to every prior before a match
    pub tau: f64,
    // chance that two evenly matched teams draw
    pub draw_probability: f64,
    pub convergence: Convergence,
}

impl Default for TrueSkill {
    fn default() -> Self {
        let mu = 25.;
        let sig = mu / 3.;
        Self {
            mu,
            sig,
            beta: sig / 2.,
            tau: sig / 100.,
            draw_probability: 0.1,
            convergence: Convergence::default(),
        }
    }
}

fn validate(groups: &[Vec<Rating>], ranks: &[usize]) -> Result<(), InvalidInput> {
    if groups.len() < 2 {
        return Err(InvalidInput::TooFewGroups(groups.len()));
    }
    if ranks.len() != groups.len() {
        return Err(InvalidInput::RankCountMismatch {
            groups: groups.len(),
            ranks: ranks.len(),
        });
    }
    for (group, members) in groups.iter().enumerate() {
        if members.is_empty() {
            return Err(InvalidInput::EmptyGroup(group));
        }
        for (member, rating) in members.iter().enumerate() {
            if !rating.weight.is_finite() || rating.weight <= 0. {
                return Err(InvalidInput::InvalidWeight {
                    group,
                    member,
                    weight: rating.weight,
                });
            }
        }
    }
    Ok(())
}

impl TrueSkill {
    pub fn create_rating(&self) -> Rating {
        Rating::new(self.mu, self.sig)
    }

    /// A conservative skill estimate for leaderboards: zero for a brand new
    /// rating, approaching `mu` as the rating's deviation shrinks.
    pub fn expose(&self, rating: &Rating) -> f64 {
        let k = self.mu / self.sig;
        rating.mu - k * rating.sig
    }

    /// Half-width of the band of performance differences that counts as a draw
    /// in a comparison involving `num_players` players.
    pub fn draw_margin(&self, num_players: usize) -> f64 {
        standard_normal_cdf_inv((self.draw_probability + 1.) / 2.)
            * (num_players as f64).sqrt()
            * self.beta
    }

    /// Rates a match whose groups are listed from first place to last, with no ties.
    pub fn rate(&self, groups: &[Vec<Rating>]) -> Result<Vec<Vec<Rating>>, RateError> {
        let ranks: Vec<usize> = (0..groups.len()).collect();
        self.rate_with_ranks(groups, &ranks)
    }

    /// Rates a match in which `groups[i]` finished with rank `ranks[i]`. Lower
    /// ranks are better and equal ranks are draws. The result lines up with
    /// `groups`, whatever order the ranks are in.
    pub fn rate_with_ranks(
        &self,
        groups: &[Vec<Rating>],
        ranks: &[usize],
    ) -> Result<Vec<Vec<Rating>>, RateError> {
        validate(groups, ranks)?;

        let mut order: Vec<usize> = (0..groups.len()).collect();
        order.sort_by_key(|&i| ranks[i]);
        let sorted_groups: Vec<&[Rating]> = order.iter().map(|&i| groups[i].as_slice()).collect();
        let sorted_ranks: Vec<usize> = order.iter().map(|&i| ranks[i]).collect();

        tracing::debug!(
            "Rating {} groups with {} players",
            groups.len(),
            groups.iter().map(Vec::len).sum::<usize>()
        );
        let posterior = MatchGraph::new(self, &sorted_groups).infer(
            self,
            &sorted_groups,
            &sorted_ranks,
        )?;

        let mut result = vec![vec![]; groups.len()];
        for (&i, ratings) in order.iter().zip(posterior) {
            result[i] = ratings;
        }
        Ok(result)
    }

    /// Rates a single head-to-head game; returns the new ratings in argument order.
    pub fn rate_1v1(
        &self,
        winner: Rating,
        loser: Rating,
        drawn: bool,
    ) -> Result<(Rating, Rating), RateError> {
        let ranks = if drawn { [0, 0] } else { [0, 1] };
        let result = self.rate_with_ranks(&[vec![winner], vec![loser]], &ranks)?;
        Ok((result[0][0], result[1][0]))
    }

    /// Rates independent matches in parallel, one result per match.
    pub fn rate_many(
        &self,
        matches: &[Vec<Vec<Rating>>],
    ) -> Vec<Result<Vec<Vec<Rating>>, RateError>> {
        matches.par_iter().map(|groups| self.rate(groups)).collect()
    }
}
