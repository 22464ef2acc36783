//! Moment-matching corrections for a Gaussian truncated to the region consistent
//! with an observed result: `diff > margin` for a win, `|diff| <= margin` for a draw.
//! Arguments are scaled by the standard deviation of the difference.

use crate::error::NumericalError;
use crate::numerical::{standard_normal_cdf, standard_normal_pdf};
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    Win,
    Draw,
}

impl Outcome {
    pub fn between(rank: usize, next_rank: usize) -> Self {
        if rank == next_rank {
            Self::Draw
        } else {
            Self::Win
        }
    }

    pub fn v(self, diff: f64, draw_margin: f64) -> f64 {
        match self {
            Self::Win => v_win(diff, draw_margin),
            Self::Draw => v_draw(diff, draw_margin),
        }
    }

    pub fn w(self, diff: f64, draw_margin: f64) -> Result<f64, NumericalError> {
        match self {
            Self::Win => w_win(diff, draw_margin),
            Self::Draw => w_draw(diff, draw_margin),
        }
    }
}

fn usable(denom: f64) -> bool {
    denom != 0. && !denom.is_nan()
}

fn draw_bounds(diff: f64, draw_margin: f64) -> (f64, f64) {
    let abs_diff = diff.abs();
    (draw_margin - abs_diff, -draw_margin - abs_diff)
}

pub fn v_win(diff: f64, draw_margin: f64) -> f64 {
    let x = diff - draw_margin;
    let denom = standard_normal_cdf(x);
    if usable(denom) {
        standard_normal_pdf(x) / denom
    } else {
        -x
    }
}

pub fn w_win(diff: f64, draw_margin: f64) -> Result<f64, NumericalError> {
    let x = diff - draw_margin;
    let v = v_win(diff, draw_margin);
    let w = v * (v + x);
    if 0. < w && w < 1. {
        Ok(w)
    } else {
        Err(NumericalError::WinVarianceOutOfRange(w))
    }
}

pub fn v_draw(diff: f64, draw_margin: f64) -> f64 {
    let (a, b) = draw_bounds(diff, draw_margin);
    let denom = standard_normal_cdf(a) - standard_normal_cdf(b);
    let v = if usable(denom) {
        (standard_normal_pdf(b) - standard_normal_pdf(a)) / denom
    } else {
        a
    };
    if diff < 0. { -v } else { v }
}

pub fn w_draw(diff: f64, draw_margin: f64) -> Result<f64, NumericalError> {
    let (a, b) = draw_bounds(diff, draw_margin);
    let denom = standard_normal_cdf(a) - standard_normal_cdf(b);
    if !usable(denom) {
        return Err(NumericalError::DegenerateDrawDenominator(denom));
    }
    let v = v_draw(diff.abs(), draw_margin);
    Ok(v * v + (a * standard_normal_pdf(a) - b * standard_normal_pdf(b)) / denom)
}

#[cfg(test)]
mod test {
    use super::*;
    use claims::{assert_err, assert_gt, assert_lt, assert_ok};

    #[test]
    fn test_outcome_between_ranks() {
        assert_eq!(Outcome::between(0, 1), Outcome::Win);
        assert_eq!(Outcome::between(2, 2), Outcome::Draw);
    }

    #[test]
    fn test_win_at_zero() {
        // v(0, 0) = pdf(0) / cdf(0)
        let v = v_win(0., 0.);
        assert!((v - 2. * standard_normal_pdf(0.)).abs() < 1e-12);
        let w = assert_ok!(w_win(0., 0.));
        assert!((w - v * v).abs() < 1e-12);
    }

    #[test]
    fn test_win_correction_shrinks_with_margin_of_victory() {
        let close = v_win(0.1, 0.2);
        let blowout = v_win(3., 0.2);
        assert_gt!(close, blowout);
        assert_gt!(blowout, 0.);
        let w = assert_ok!(w_win(3., 0.2));
        assert_lt!(w, assert_ok!(w_win(0.1, 0.2)));
    }

    #[test]
    fn test_hopeless_upset_is_reported() {
        // cdf underflows, so the fallback v = -x makes w exactly zero
        assert_eq!(v_win(-40., 0.), 40.);
        assert_eq!(
            assert_err!(w_win(-40., 0.)),
            NumericalError::WinVarianceOutOfRange(0.)
        );
    }

    #[test]
    fn test_draw_is_odd_in_diff() {
        let v = v_draw(0.7, 0.5);
        assert!((v + v_draw(-0.7, 0.5)).abs() < 1e-12);
        assert_eq!(v_draw(0., 0.5), 0.);
        let w = assert_ok!(w_draw(0.7, 0.5));
        assert_eq!(assert_ok!(w_draw(-0.7, 0.5)), w);
        assert_gt!(w, 0.);
        assert_lt!(w, 1.);
    }

    #[test]
    fn test_draw_without_margin_is_degenerate() {
        assert_eq!(
            assert_err!(w_draw(0.3, 0.)),
            NumericalError::DegenerateDrawDenominator(0.)
        );
        assert_err!(Outcome::Draw.w(0.3, 0.));
    }

    #[test]
    fn test_dispatch_matches_free_functions() {
        assert_eq!(Outcome::Win.v(0.4, 0.1), v_win(0.4, 0.1));
        assert_eq!(Outcome::Draw.v(0.4, 0.1), v_draw(0.4, 0.1));
        assert_eq!(Outcome::Win.w(0.4, 0.1), w_win(0.4, 0.1));
    }
}
