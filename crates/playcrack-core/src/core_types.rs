use crate::consts::KEY_LEN;

/// A candidate key: the 25 letters of a Playfair square in row-major order.
/// Always a permutation of the reduced alphabet.
pub type Genome = [u8; KEY_LEN];

/// An ordered set of candidate keys. Order carries no meaning except that
/// indices 0 and 1 hold the two parents right after selection.
pub type Population = Vec<Genome>;
