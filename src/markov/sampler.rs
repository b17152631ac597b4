use super::model::Successors;
use super::GenerationError;
use rand::distr::weighted::WeightedIndex;
use rand::distr::Distribution;
use rand::Rng;

/// Turn successor counts into sampling weights that sum to 1.
///
/// - `temperature <= 0` (or NaN): all mass on the most frequent word. Ties go
///   to the lexicographically smallest word.
/// - `temperature == 1`: the plain normalized frequencies.
/// - otherwise each probability is raised to `1 / temperature` and the result
///   renormalized. Lower values sharpen toward the mode, higher values flatten
///   toward uniform.
pub fn weights(
    successors: &Successors,
    temperature: f64,
) -> Result<Vec<(&str, f64)>, GenerationError> {
    let total: u64 = successors.values().map(|&count| u64::from(count)).sum();
    if total == 0 {
        return Err(GenerationError::InvariantViolation(
            "sampled an empty successor set".to_string(),
        ));
    }

    if !(temperature > 0.0) {
        let mut best: Option<(&str, u32)> = None;
        for (word, &count) in successors {
            if best.map_or(true, |(_, top)| count > top) {
                best = Some((word.as_str(), count));
            }
        }
        return Ok(successors
            .iter()
            .map(|(word, _)| {
                let mass = if best.map(|(top, _)| top) == Some(word.as_str()) { 1.0 } else { 0.0 };
                (word.as_str(), mass)
            })
            .collect());
    }

    let probabilities: Vec<(&str, f64)> = successors
        .iter()
        .map(|(word, &count)| (word.as_str(), count as f64 / total as f64))
        .collect();

    if temperature == 1.0 {
        return Ok(probabilities);
    }

    // Scale relative to the mode in log space so tiny temperatures cannot
    // underflow every weight to zero.
    let peak = probabilities
        .iter()
        .map(|&(_, p)| p.ln())
        .fold(f64::NEG_INFINITY, f64::max);
    let scaled: Vec<(&str, f64)> = probabilities
        .iter()
        .map(|&(word, p)| (word, ((p.ln() - peak) / temperature).exp()))
        .collect();
    let norm: f64 = scaled.iter().map(|&(_, w)| w).sum();

    Ok(scaled.into_iter().map(|(word, w)| (word, w / norm)).collect())
}

/// Draw one successor word according to [`weights`].
pub fn sample<'a, R: Rng + ?Sized>(
    successors: &'a Successors,
    temperature: f64,
    rng: &mut R,
) -> Result<&'a str, GenerationError> {
    let weighted = weights(successors, temperature)?;
    let index = WeightedIndex::new(weighted.iter().map(|&(_, w)| w))
        .map_err(|e| GenerationError::InvariantViolation(format!("bad sampling weights: {}", e)))?;
    Ok(weighted[index.sample(rng)].0)
}
