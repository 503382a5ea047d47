/// Gravitational load Love numbers `k_l` from Wahr, Molenaar & Bryan (1998), table 1.
const WAHR_1998_K: [(usize, f64); 21] = [
    (0, 0.000),
    (1, 0.027),
    (2, -0.303),
    (3, -0.194),
    (4, -0.132),
    (5, -0.104),
    (6, -0.089),
    (7, -0.081),
    (8, -0.076),
    (9, -0.072),
    (10, -0.069),
    (12, -0.064),
    (15, -0.058),
    (20, -0.051),
    (30, -0.040),
    (40, -0.033),
    (50, -0.027),
    (70, -0.020),
    (100, -0.014),
    (150, -0.010),
    (200, -0.007),
];

/// Returns `k_l` for degrees `0..=lmax`, linearly interpolated between table
/// entries and decaying as `1 / l` beyond degree 200.
pub fn wahr1998_k(lmax: usize) -> Vec<f64> {
    (0..=lmax).map(k_at).collect()
}

fn k_at(degree: usize) -> f64 {
    let (last_degree, last_k) = WAHR_1998_K[WAHR_1998_K.len() - 1];
    if degree > last_degree {
        return last_k * last_degree as f64 / degree as f64;
    }
    for pair in WAHR_1998_K.windows(2) {
        let (l0, k0) = pair[0];
        let (l1, k1) = pair[1];
        if degree == l0 {
            return k0;
        }
        if degree < l1 {
            let t = (degree - l0) as f64 / (l1 - l0) as f64;
            return k0 + t * (k1 - k0);
        }
    }
    last_k
}
