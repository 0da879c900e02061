/// Kullback-Leibler divergence KL(p || q) in nats. Inputs are expected to
/// be probability distributions over the same support; zero-probability
/// entries in `p` contribute nothing, and `q` is floored to keep the
/// ratio finite.
pub fn kl_divergence(p: &[f32], q: &[f32]) -> f32 {
    debug_assert_eq!(p.len(), q.len());

    let divergence = p
        .iter()
        .zip(q.iter())
        .filter(|(&p_i, _)| p_i > 0.0)
        .map(|(&p_i, &q_i)| p_i * (p_i / q_i.max(f32::MIN_POSITIVE)).ln())
        .sum::<f32>();

    divergence.max(0.0)
}

/// Harmonic mean of two non-negative terms. Zero whenever either term is
/// zero, which is what makes it suitable for combining factors that must
/// all be strong.
pub fn harmonic_mean(a: f32, b: f32) -> f32 {
    if a + b == 0.0 {
        0.0
    } else {
        2.0 * a * b / (a + b)
    }
}
