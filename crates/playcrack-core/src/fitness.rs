use crate::error::{PfResult, PlaycrackError};
use crate::ngrams::Ngrams;
use itertools::Itertools;

/// Scores how closely a candidate n-gram distribution tracks a frozen
/// reference distribution. Higher is closer; the score is the floored
/// inverse of the summed squared frequency differences.
pub struct EnglishFitness {
    reference: Ngrams,
}

impl EnglishFitness {
    pub fn new(reference: Ngrams) -> PfResult<Self> {
        if reference.is_empty() {
            return Err(PlaycrackError::EmptyDistribution("reference"));
        }
        Ok(Self { reference })
    }

    pub fn n(&self) -> usize {
        self.reference.n()
    }

    pub fn reference(&self) -> &Ngrams {
        &self.reference
    }

    /// Sums (ref_freq - cand_freq)^2 over every n-gram present in either
    /// table. Strings absent from both contribute zero, so this equals the
    /// sum over all 26^n letter strings. The union is sorted first: a fixed
    /// summation order keeps scores byte-identical across runs.
    pub fn fitness(&self, candidate: &Ngrams) -> PfResult<u64> {
        if candidate.is_empty() {
            return Err(PlaycrackError::EmptyDistribution("candidate"));
        }
        if candidate.n() != self.reference.n() {
            return Err(PlaycrackError::NgramLengthMismatch {
                expected: self.reference.n(),
                found: candidate.n(),
            });
        }

        let raw: f64 = self
            .reference
            .keys()
            .chain(candidate.keys())
            .unique()
            .sorted_unstable()
            .map(|gram| {
                let diff = self.reference.freq(gram) - candidate.freq(gram);
                diff * diff
            })
            .sum();

        if raw > 0.0 {
            // Saturates on identical-to-the-eye distributions where 1/raw
            // overflows u64.
            Ok((1.0 / raw).floor() as u64)
        } else {
            Ok(u64::MAX)
        }
    }

    /// Collects the candidate table from `text` and scores it. A text with
    /// fewer than n letters has no distribution and is an error.
    pub fn score_text(&self, text: &[u8]) -> PfResult<u64> {
        let mut collected = Ngrams::new(self.n())?;
        collected.collect(text)?;
        self.fitness(&collected)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::corpus::generate_table;

    const SAMPLE: &[u8] = b"It was a bright cold day in April, and the clocks \
        were striking thirteen. Winston Smith, his chin nuzzled into his \
        breast in an effort to escape the vile wind, slipped quickly through \
        the glass doors, though not quickly enough to prevent a swirl of \
        gritty dust from entering along with him.";

    #[test]
    fn identical_distributions_saturate() {
        let reference = generate_table(SAMPLE, 2).unwrap();
        let fitness = EnglishFitness::new(reference).unwrap();
        let candidate = generate_table(SAMPLE, 2).unwrap();
        assert_eq!(fitness.fitness(&candidate).unwrap(), u64::MAX);
    }

    #[test]
    fn closer_text_scores_higher() {
        let reference = generate_table(SAMPLE, 2).unwrap();
        let fitness = EnglishFitness::new(reference).unwrap();

        let english = fitness
            .score_text(b"the day was cold and the wind was bright")
            .unwrap();
        let noise = fitness.score_text(b"zqxzqwvkzqxjzqkwvxzqzzkw").unwrap();
        assert!(
            english > noise,
            "english {english} should outscore noise {noise}"
        );
    }

    #[test]
    fn empty_reference_is_rejected() {
        let empty = Ngrams::new(2).unwrap();
        assert!(matches!(
            EnglishFitness::new(empty),
            Err(PlaycrackError::EmptyDistribution("reference"))
        ));
    }

    #[test]
    fn empty_candidate_is_rejected() {
        let reference = generate_table(SAMPLE, 2).unwrap();
        let fitness = EnglishFitness::new(reference).unwrap();
        let empty = Ngrams::new(2).unwrap();
        assert!(matches!(
            fitness.fitness(&empty),
            Err(PlaycrackError::EmptyDistribution("candidate"))
        ));
        // score_text of a too-short text hits the same error.
        assert!(fitness.score_text(b"a").is_err());
    }

    #[test]
    fn window_mismatch_is_rejected() {
        let reference = generate_table(SAMPLE, 2).unwrap();
        let fitness = EnglishFitness::new(reference).unwrap();
        let trigrams = generate_table(SAMPLE, 3).unwrap();
        assert!(matches!(
            fitness.fitness(&trigrams),
            Err(PlaycrackError::NgramLengthMismatch {
                expected: 2,
                found: 3
            })
        ));
    }
}
