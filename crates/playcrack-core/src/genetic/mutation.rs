use crate::config::{GenerationParams, MutationType};
use crate::consts::KEY_LEN;
use crate::core_types::Genome;
use crate::error::{PfResult, PlaycrackError};
use fastrand::Rng;

/// Mutates every member in place. Elites must not be in `population` yet;
/// the generation step reinserts them afterwards.
pub fn mutate_population(
    population: &mut [Genome],
    params: &GenerationParams,
    rng: &mut Rng,
) -> PfResult<()> {
    match params.mutation_type {
        MutationType::Swap => {
            for genome in population.iter_mut() {
                swap_mutation(genome, rng);
            }
        }
        MutationType::Inversion => {
            for genome in population.iter_mut() {
                if rng.f64() < params.mutation_rate {
                    inversion_mutation(genome, rng);
                }
            }
        }
    }
    for genome in population.iter() {
        if !super::valid_genome(genome) {
            return Err(PlaycrackError::InvalidKey(
                "mutation produced a non-permutation".into(),
            ));
        }
    }
    Ok(())
}

/// Swaps two distinct positions chosen uniformly.
pub fn swap_mutation(genome: &mut Genome, rng: &mut Rng) {
    let a = rng.usize(0..KEY_LEN);
    let mut b = rng.usize(0..KEY_LEN);
    while b == a {
        b = rng.usize(0..KEY_LEN);
    }
    genome.swap(a, b);
}

/// Reverses `genome[start..end]` for distinct start and end (resampled
/// until they differ, then ordered).
pub fn inversion_mutation(genome: &mut Genome, rng: &mut Rng) {
    let mut start = rng.usize(0..KEY_LEN);
    let mut end = rng.usize(0..KEY_LEN);
    while end == start {
        end = rng.usize(0..KEY_LEN);
    }
    if start > end {
        std::mem::swap(&mut start, &mut end);
    }
    genome[start..end].reverse();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::key::reduced_alphabet;

    #[test]
    fn swap_changes_exactly_two_positions() {
        let mut rng = Rng::with_seed(11);
        for _ in 0..1000 {
            let original = reduced_alphabet(b'J');
            let mut mutated = original;
            swap_mutation(&mut mutated, &mut rng);
            let moved = original
                .iter()
                .zip(mutated.iter())
                .filter(|(a, b)| a != b)
                .count();
            assert_eq!(moved, 2);
        }
    }

    #[test]
    fn inversion_keeps_the_permutation() {
        let mut rng = Rng::with_seed(12);
        for _ in 0..1000 {
            let mut genome = reduced_alphabet(b'J');
            inversion_mutation(&mut genome, &mut rng);
            assert!(super::super::valid_genome(&genome));
        }
    }

    #[test]
    fn zero_rate_inversion_leaves_everything_alone() {
        let mut rng = Rng::with_seed(13);
        let params = GenerationParams {
            mutation_type: MutationType::Inversion,
            mutation_rate: 0.0,
            ..Default::default()
        };
        let mut population = vec![reduced_alphabet(b'J'); 20];
        mutate_population(&mut population, &params, &mut rng).unwrap();
        assert!(population.iter().all(|g| *g == reduced_alphabet(b'J')));
    }

    #[test]
    fn full_rate_inversion_touches_members() {
        let mut rng = Rng::with_seed(14);
        let params = GenerationParams {
            mutation_type: MutationType::Inversion,
            mutation_rate: 1.0,
            ..Default::default()
        };
        let mut population = vec![reduced_alphabet(b'J'); 20];
        mutate_population(&mut population, &params, &mut rng).unwrap();
        assert!(population.iter().any(|g| *g != reduced_alphabet(b'J')));
        assert!(population.iter().all(super::super::valid_genome));
    }
}
