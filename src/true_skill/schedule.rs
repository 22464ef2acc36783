use super::TrueSkill;
use crate::error::NumericalError;
use crate::factor_graph::{FactorGraph, FactorId, Outcome, VarId};
use crate::rating::Rating;
use serde::{Deserialize, Serialize};

/// Stopping rule for the iterative part of the schedule. Running out of
/// iterations is not an error: the latest estimate is used as is.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Convergence {
    pub max_iterations: usize,
    pub min_delta: f64,
}

impl Default for Convergence {
    fn default() -> Self {
        Self {
            max_iterations: 10,
            min_delta: 1e-3,
        }
    }
}

/// One match laid out as a factor graph, teams ordered best first:
/// skill -> performance -> team performance -> adjacent team difference.
pub(crate) struct MatchGraph {
    graph: FactorGraph,
    skill_vars: Vec<VarId>,
    rating_layer: Vec<FactorId>,
    perf_layer: Vec<FactorId>,
    team_perf_layer: Vec<FactorId>,
    team_perf_vars: Vec<VarId>,
    team_sizes: Vec<usize>,
    team_diff_layer: Vec<FactorId>,
    trunc_layer: Vec<FactorId>,
}

impl MatchGraph {
    pub fn new(env: &TrueSkill, groups: &[&[Rating]]) -> Self {
        let mut graph = FactorGraph::default();
        let mut skill_vars = vec![];
        let mut rating_layer = vec![];
        let mut perf_layer = vec![];
        let mut team_perf_layer = vec![];
        let mut team_perf_vars = vec![];
        let beta_sq = env.beta * env.beta;

        for group in groups {
            let mut perf_vars = Vec::with_capacity(group.len());
            for &rating in group.iter() {
                let skill = graph.add_variable();
                let perf = graph.add_variable();
                rating_layer.push(graph.add_prior(skill, rating, env.tau));
                perf_layer.push(graph.add_likelihood(skill, perf, beta_sq));
                skill_vars.push(skill);
                perf_vars.push(perf);
            }

            let team_perf = graph.add_variable();
            let weights = group.iter().map(|r| r.weight).collect();
            team_perf_layer.push(graph.add_sum(team_perf, &perf_vars, weights));
            team_perf_vars.push(team_perf);
        }

        Self {
            graph,
            skill_vars,
            rating_layer,
            perf_layer,
            team_perf_layer,
            team_perf_vars,
            team_sizes: groups.iter().map(|g| g.len()).collect(),
            team_diff_layer: vec![],
            trunc_layer: vec![],
        }
    }

    // Observations enter through the difference between each pair of adjacent teams
    fn add_comparisons(&mut self, env: &TrueSkill, ranks: &[usize]) {
        for i in 1..self.team_perf_vars.len() {
            let diff = self.graph.add_variable();
            let pair = &self.team_perf_vars[i - 1..=i];
            self.team_diff_layer
                .push(self.graph.add_sum(diff, pair, vec![1., -1.]));

            let num_players = self.team_sizes[i - 1] + self.team_sizes[i];
            let outcome = Outcome::between(ranks[i - 1], ranks[i]);
            let draw_margin = env.draw_margin(num_players);
            self.trunc_layer
                .push(self.graph.add_truncate(diff, outcome, draw_margin));
        }
    }

    // One forward and one backward sweep over the chain of team differences
    fn sweep(&mut self) -> Result<f64, NumericalError> {
        let graph = &mut self.graph;
        let diffs = &self.team_diff_layer;
        let truncs = &self.trunc_layer;
        let len = diffs.len();

        if len == 1 {
            graph.down(diffs[0]);
            return graph.up(truncs[0], 0);
        }

        let mut delta = 0f64;
        for z in 0..len - 1 {
            graph.down(diffs[z]);
            delta = delta.max(graph.up(truncs[z], 0)?);
            graph.up(diffs[z], 1)?;
        }
        for z in (1..len).rev() {
            graph.down(diffs[z]);
            delta = delta.max(graph.up(truncs[z], 0)?);
            graph.up(diffs[z], 0)?;
        }
        Ok(delta)
    }

    /// Runs message passing to convergence, then reads off the posterior skills
    /// of every player, grouped as in the input.
    pub fn infer(
        mut self,
        env: &TrueSkill,
        groups: &[&[Rating]],
        ranks: &[usize],
    ) -> Result<Vec<Vec<Rating>>, NumericalError> {
        // Nothing has been observed yet, so a single pass settles the priors
        for layer in [&self.rating_layer, &self.perf_layer, &self.team_perf_layer] {
            for &factor in layer {
                self.graph.down(factor);
            }
        }

        self.add_comparisons(env, ranks);

        let mut converged = false;
        for iteration in 0..env.convergence.max_iterations {
            let delta = self.sweep()?;
            tracing::trace!("Sweep {} changed beliefs by {}", iteration, delta);
            if delta <= env.convergence.min_delta {
                converged = true;
                break;
            }
        }
        if !converged {
            tracing::debug!(
                "Stopped after {} sweeps without reaching delta {}",
                env.convergence.max_iterations,
                env.convergence.min_delta
            );
        }

        let last = self.team_diff_layer.len() - 1;
        self.graph.up(self.team_diff_layer[0], 0)?;
        self.graph.up(self.team_diff_layer[last], 1)?;
        for (&factor, &size) in self.team_perf_layer.iter().zip(&self.team_sizes) {
            for index in 0..size {
                self.graph.up(factor, index)?;
            }
        }
        for &factor in &self.perf_layer {
            self.graph.up(factor, 0)?;
        }

        let mut skills = self.skill_vars.iter().map(|&var| self.graph.belief(var));
        Ok(groups
            .iter()
            .map(|group| {
                group
                    .iter()
                    .zip(skills.by_ref())
                    .map(|(prior, posterior)| Rating {
                        mu: posterior.mu(),
                        sig: posterior.sig(),
                        weight: prior.weight,
                    })
                    .collect()
            })
            .collect())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::factor_graph::Factor;

    #[test]
    fn test_graph_shape() {
        let env = TrueSkill::default();
        let teams = [
            vec![env.create_rating(), env.create_rating()],
            vec![env.create_rating()],
            vec![env.create_rating(); 3],
        ];
        let groups: Vec<&[Rating]> = teams.iter().map(Vec::as_slice).collect();
        let mut graph = MatchGraph::new(&env, &groups);
        graph.add_comparisons(&env, &[0, 1, 1]);

        assert_eq!(graph.rating_layer.len(), 6);
        assert_eq!(graph.perf_layer.len(), 6);
        assert_eq!(graph.team_perf_layer.len(), 3);
        assert_eq!(graph.team_diff_layer.len(), 2);
        assert_eq!(graph.trunc_layer.len(), 2);
        // skill + performance per player, one per team, one per difference
        assert_eq!(graph.graph.variables().len(), 6 * 2 + 3 + 2);

        let outcomes: Vec<_> = graph
            .trunc_layer
            .iter()
            .map(|&id| match graph.graph.factor(id) {
                Factor::Truncate(f) => (f.outcome, f.draw_margin),
                other => panic!("expected a truncation factor, got {:?}", other),
            })
            .collect();
        assert_eq!(outcomes[0], (Outcome::Win, env.draw_margin(3)));
        assert_eq!(outcomes[1], (Outcome::Draw, env.draw_margin(4)));
    }

    #[test]
    fn test_iteration_cap_is_not_an_error() {
        let env = TrueSkill {
            convergence: Convergence {
                max_iterations: 1,
                min_delta: 0.,
            },
            ..TrueSkill::default()
        };
        let teams = [
            vec![env.create_rating()],
            vec![env.create_rating()],
            vec![env.create_rating()],
        ];
        let groups: Vec<&[Rating]> = teams.iter().map(Vec::as_slice).collect();
        let result = MatchGraph::new(&env, &groups).infer(&env, &groups, &[0, 1, 2]);
        let result = result.unwrap();
        assert!(result[0][0].mu > result[1][0].mu);
        assert!(result[1][0].mu > result[2][0].mu);
    }
}
