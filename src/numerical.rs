use statrs::function::erf::{erfc, erfc_inv};
use std::f64::consts::{FRAC_2_SQRT_PI, SQRT_2};

pub fn standard_normal_pdf(z: f64) -> f64 {
    const NORMALIZE: f64 = 0.5 * FRAC_2_SQRT_PI / SQRT_2;
    NORMALIZE * (-0.5 * z * z).exp()
}

pub fn standard_normal_cdf(z: f64) -> f64 {
    0.5 * erfc(-z / SQRT_2)
    // Less numerically stable: 0.5 + 0.5 * statrs::function::erf::erf(z / SQRT_2)
}

pub fn standard_normal_cdf_inv(prob: f64) -> f64 {
    -SQRT_2 * erfc_inv(2. * prob)
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_standard_normal_values() {
        assert!((standard_normal_pdf(0.) - 0.398_942_280_401_432_7).abs() < 1e-12);
        assert!((standard_normal_cdf(0.) - 0.5).abs() < 1e-12);
        assert!((standard_normal_cdf(1.96) - 0.975).abs() < 1e-4);
        assert!((standard_normal_cdf_inv(0.975) - 1.96).abs() < 1e-3);
        assert!(standard_normal_cdf_inv(0.5).abs() < 1e-12);
    }

    #[test]
    fn test_cdf_inv_inverts_cdf() {
        for &z in &[-3., -1.2, -0.1, 0.3, 2.5] {
            let back = standard_normal_cdf_inv(standard_normal_cdf(z));
            assert!((back - z).abs() < 1e-8, "{} came back as {}", z, back);
        }
    }

    #[test]
    fn test_far_tail_underflows_to_zero() {
        assert_eq!(standard_normal_cdf(-40.), 0.);
    }
}
