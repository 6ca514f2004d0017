use crate::consts::KEY_LEN;
use crate::core_types::Genome;
use crate::error::{PfResult, PlaycrackError};
use fastrand::Rng;

/// Uniform crossover with order-preserving repair. Each position keeps the
/// first parent's letter on a fair coin flip; the gaps are then filled left
/// to right from the second parent, skipping letters already taken. Both
/// parents are permutations of the same 25 letters, so the walk over the
/// second parent always finds enough unused letters before running off the
/// end; hitting the end anyway means a corrupted parent and is a hard
/// error.
pub fn uniform_crossover(p1: &Genome, p2: &Genome, rng: &mut Rng) -> PfResult<Genome> {
    let mut child = [0u8; KEY_LEN];
    let mut filled = [false; KEY_LEN];
    let mut used = [false; 26];

    for i in 0..KEY_LEN {
        if rng.bool() {
            child[i] = p1[i];
            filled[i] = true;
            used[(p1[i] - b'A') as usize] = true;
        }
    }

    let mut donor = p2.iter();
    for i in 0..KEY_LEN {
        if filled[i] {
            continue;
        }
        let gene = loop {
            match donor.next() {
                Some(&g) if used[(g - b'A') as usize] => continue,
                Some(&g) => break g,
                None => {
                    return Err(PlaycrackError::InvalidKey(
                        "crossover exhausted the second parent".into(),
                    ))
                }
            }
        };
        child[i] = gene;
        used[(gene - b'A') as usize] = true;
    }

    if !super::valid_genome(&child) {
        return Err(PlaycrackError::InvalidKey(
            "crossover produced a non-permutation".into(),
        ));
    }
    Ok(child)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::key::reduced_alphabet;

    #[test]
    fn child_conserves_the_parent_letters() {
        let mut rng = Rng::with_seed(42);
        let p1 = reduced_alphabet(b'J');
        let mut p2 = p1;
        p2.reverse();

        let child = uniform_crossover(&p1, &p2, &mut rng).unwrap();

        let mut sorted_child = child;
        sorted_child.sort_unstable();
        assert_eq!(sorted_child, p1, "child lost or duplicated letters");

        // With seed 42 the child should actually mix the parents.
        assert_ne!(child, p1);
        assert_ne!(child, p2);
    }

    #[test]
    fn identical_parents_breed_identical_children() {
        let mut rng = Rng::with_seed(5);
        let p = reduced_alphabet(b'J');
        let child = uniform_crossover(&p, &p, &mut rng).unwrap();
        assert_eq!(child, p);
    }
}
