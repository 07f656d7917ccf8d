//! Seeded synthetic data for envelope unit tests.
use ndarray::Array2;
use rand::{SeedableRng, rngs::StdRng};
use rand_distr::{Distribution, Normal};

/// `p` groups of `size` observations in `R^r`, indicator-coded in `X`.
///
/// Group `g` has mean `g · shift` along the first coordinate and standard
/// deviation `1 + g` along the second; remaining coordinates are unit noise
/// with a mild correlation to the first.
pub(crate) fn grouped_sample(seed: u64, r: usize, p: usize, size: usize, shift: f64) -> (Array2<f64>, Array2<f64>) {
    let mut rng = StdRng::seed_from_u64(seed);
    let normal = Normal::new(0.0, 1.0).unwrap();
    let n = p * size;
    let mut x = Array2::<f64>::zeros((n, p));
    let mut y = Array2::<f64>::zeros((n, r));
    for obs in 0..n {
        let g = obs % p;
        x[[obs, g]] = 1.0;
        let z: Vec<f64> = (0..r).map(|_| normal.sample(&mut rng)).collect();
        for k in 0..r {
            y[[obs, k]] = match k {
                0 => g as f64 * shift + z[0],
                1 => (1.0 + g as f64) * z[1],
                _ => z[k] + 0.3 * z[0],
            };
        }
    }
    (x, y)
}

/// Two groups of `size` observations in `R^3` with a one-dimensional
/// envelope `span(e_1)`.
///
/// Group means are `∓shift/2` along the first coordinate, where the group
/// variances are 0.5 and 3; the other coordinates are independent unit noise
/// in both groups.
pub(crate) fn enveloped_sample(seed: u64, size: usize, shift: f64) -> (Array2<f64>, Array2<f64>) {
    let mut rng = StdRng::seed_from_u64(seed);
    let normal = Normal::new(0.0, 1.0).unwrap();
    let sd = [0.5_f64.sqrt(), 3.0_f64.sqrt()];
    let n = 2 * size;
    let mut x = Array2::<f64>::zeros((n, 2));
    let mut y = Array2::<f64>::zeros((n, 3));
    for obs in 0..n {
        let g = obs % 2;
        x[[obs, g]] = 1.0;
        let sign = if g == 0 { -1.0 } else { 1.0 };
        y[[obs, 0]] = sign * 0.5 * shift + sd[g] * normal.sample(&mut rng);
        y[[obs, 1]] = normal.sample(&mut rng);
        y[[obs, 2]] = normal.sample(&mut rng);
    }
    (x, y)
}
