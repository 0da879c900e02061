// (exp(p-max_p))^(1/T) = exp((p-max_p)/T).
pub fn softmax(logits: &[f32], temperature: f32) -> Vec<f32> {
    if logits.is_empty() {
        return Vec::new();
    }

    let max_p = logits.iter().cloned().fold(f32::NEG_INFINITY, f32::max);

    // Every entry at -inf leaves no signal to weigh; fall back to uniform.
    if !max_p.is_finite() {
        return vec![1.0 / logits.len() as f32; logits.len()];
    }

    let weighted = logits
        .iter()
        .map(|&p| ((p - max_p) / temperature).exp())
        .collect::<Vec<_>>();
    let sum = weighted.iter().sum::<f32>();

    weighted.iter().map(|p| p / sum).collect()
}
