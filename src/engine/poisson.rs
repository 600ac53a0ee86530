/// Poisson probability mass for every goal count in `0..=max_goals`.
///
/// Uses the recurrence `p(k) = p(k-1) * lambda / k` starting from `e^-lambda`,
/// which avoids computing factorials. Mass beyond `max_goals` is left out; the
/// returned vector sums to less than 1 by exactly the omitted tail.
///
/// A zero rate degenerates to a point mass at 0.
pub fn pmf_table(lambda: f64, max_goals: u32) -> Vec<f64> {
    let len = max_goals as usize + 1;
    let mut out = Vec::with_capacity(len);
    out.push((-lambda).exp());
    for k in 1..len {
        let prev = out[k - 1];
        out.push(prev * lambda / k as f64);
    }
    out
}
