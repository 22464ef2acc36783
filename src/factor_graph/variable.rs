use crate::gaussian::{FLAT, Gaussian};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct VarId(pub usize);

/// Each edge joins one variable to one factor; both endpoints refer to it by
/// the same index.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct EdgeId(pub usize);

#[derive(Clone, Debug)]
pub struct Variable {
    belief: Gaussian,
}

impl Variable {
    pub fn belief(&self) -> Gaussian {
        self.belief
    }

    // Overwrites the belief, returning how far it moved.
    pub fn revise(&mut self, belief: Gaussian) -> f64 {
        let pi_delta = (self.belief.pi - belief.pi).abs();
        let delta = if pi_delta.is_infinite() {
            0.
        } else {
            (self.belief.tau - belief.tau).abs().max(pi_delta.sqrt())
        };
        self.belief = belief;
        delta
    }
}

#[derive(Clone, Copy, Debug)]
pub struct Edge {
    pub var: VarId,
    pub message: Gaussian,
}

/// Variables together with the message most recently received along each
/// incident edge.
#[derive(Clone, Debug, Default)]
pub struct Variables {
    vars: Vec<Variable>,
    edges: Vec<Edge>,
}

impl Variables {
    pub fn add_variable(&mut self) -> VarId {
        self.vars.push(Variable { belief: FLAT });
        VarId(self.vars.len() - 1)
    }

    pub fn connect(&mut self, var: VarId) -> EdgeId {
        self.edges.push(Edge { var, message: FLAT });
        EdgeId(self.edges.len() - 1)
    }

    pub fn len(&self) -> usize {
        self.vars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }

    pub fn num_edges(&self) -> usize {
        self.edges.len()
    }

    pub fn belief(&self, var: VarId) -> Gaussian {
        self.vars[var.0].belief
    }

    pub fn edge(&self, edge: EdgeId) -> &Edge {
        &self.edges[edge.0]
    }

    pub fn message(&self, edge: EdgeId) -> Gaussian {
        self.edges[edge.0].message
    }

    /// The belief of the edge's variable with this edge's own message removed.
    pub fn excluding(&self, edge: EdgeId) -> Gaussian {
        let Edge { var, message } = self.edges[edge.0];
        self.vars[var.0].belief / message
    }

    /// Replaces the message along `edge`, swapping its old contribution to the
    /// belief for the new one.
    pub fn update_message(&mut self, edge: EdgeId, message: Gaussian) -> f64 {
        let Edge { var, message: old } = self.edges[edge.0];
        self.edges[edge.0].message = message;
        let var = &mut self.vars[var.0];
        let belief = var.belief / old * message;
        var.revise(belief)
    }

    /// Sets the variable's belief outright, and records whichever message along
    /// `edge` accounts for the jump so that it can later be divided out.
    pub fn update_value(&mut self, edge: EdgeId, value: Gaussian) -> f64 {
        let Edge { var, message: old } = self.edges[edge.0];
        let var = &mut self.vars[var.0];
        self.edges[edge.0].message = value * old / var.belief;
        var.revise(value)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_revise_reports_change() {
        let mut var = Variable { belief: FLAT };
        let delta = var.revise(Gaussian::from_precision(4., 3.));
        assert_eq!(delta, 3.);
        assert_eq!(var.belief(), Gaussian::from_precision(4., 3.));

        let delta = var.revise(Gaussian::from_precision(4., 3.5));
        assert_eq!(delta, 0.5);
    }

    #[test]
    fn test_revise_ignores_infinite_precision_jump() {
        let mut var = Variable { belief: FLAT };
        let delta = var.revise(Gaussian::from_precision(f64::INFINITY, 1.));
        assert_eq!(delta, 0.);
    }

    #[test]
    fn test_messages_compose_into_belief() {
        let mut vars = Variables::default();
        let x = vars.add_variable();
        let first = vars.connect(x);
        let second = vars.connect(x);
        assert_eq!(vars.len(), 1);
        assert_eq!(vars.num_edges(), 2);
        assert_eq!(vars.edge(second).var, x);

        let a = Gaussian::from_mu_sig(10., 2.);
        let b = Gaussian::from_mu_sig(14., 2.);
        vars.update_message(first, a);
        vars.update_message(second, b);
        assert_eq!(vars.belief(x), a * b);
        assert_eq!(vars.excluding(first), b);

        // Replacing a message only swaps that edge's contribution
        let c = Gaussian::from_mu_sig(0., 1.);
        vars.update_message(first, c);
        assert_eq!(vars.belief(x), c * b);
    }

    #[test]
    fn test_update_value_keeps_messages_consistent() {
        let mut vars = Variables::default();
        let x = vars.add_variable();
        let prior = vars.connect(x);
        let other = vars.connect(x);

        vars.update_message(other, Gaussian::from_mu_sig(5., 3.));
        let value = Gaussian::from_mu_sig(2., 1.);
        vars.update_value(prior, value);

        assert_eq!(vars.belief(x), value);
        let rebuilt = vars.message(prior) * vars.message(other);
        assert!((rebuilt.pi - value.pi).abs() < 1e-12);
        assert!((rebuilt.tau - value.tau).abs() < 1e-12);
    }
}
