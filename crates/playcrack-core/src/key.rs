use crate::consts::{
    DEFAULT_DOUBLE_PAD, DEFAULT_EXTRA_PAD, DEFAULT_OMIT, DEFAULT_REPLACE, KEY_LEN, NOT_IN_SQUARE,
    SQUARE_SIDE,
};
use crate::core_types::Genome;
use crate::error::{PfResult, PlaycrackError};

/// Letter substitutions applied around the 25-letter square: which letter is
/// merged away, what replaces it, and which pads are used for doubled and
/// odd-length digrams.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SquareRules {
    pub omit: u8,
    pub replace: u8,
    pub double_pad: u8,
    pub extra_pad: u8,
}

impl Default for SquareRules {
    fn default() -> Self {
        Self {
            omit: DEFAULT_OMIT,
            replace: DEFAULT_REPLACE,
            double_pad: DEFAULT_DOUBLE_PAD,
            extra_pad: DEFAULT_EXTRA_PAD,
        }
    }
}

impl SquareRules {
    /// Normalizes the four special letters. Non-alphabetic inputs fall back
    /// to the defaults, the replacement is forced to differ from the omitted
    /// letter, and pads that collide with the omitted letter are mapped to
    /// the replacement so every special letter lands inside the alphabet.
    pub fn new(omit: char, replace: char, double_pad: char, extra_pad: char) -> Self {
        let omit = normalize(omit, DEFAULT_OMIT);
        let mut replace = normalize(replace, DEFAULT_REPLACE);
        if replace == omit {
            replace = if omit == b'I' { b'J' } else { b'I' };
        }
        let fix = |pad: u8| if pad == omit { replace } else { pad };
        Self {
            omit,
            replace,
            double_pad: fix(normalize(double_pad, DEFAULT_DOUBLE_PAD)),
            extra_pad: fix(normalize(extra_pad, DEFAULT_EXTRA_PAD)),
        }
    }
}

fn normalize(c: char, fallback: u8) -> u8 {
    if c.is_ascii_alphabetic() {
        (c as u8).to_ascii_uppercase()
    } else {
        fallback
    }
}

/// Uppercases a-z, maps the omitted letter to its replacement and drops
/// every other byte outside A-Z. Idempotent.
pub fn sanitize(text: &[u8], rules: &SquareRules) -> Vec<u8> {
    text.iter()
        .filter_map(|&c| {
            let upper = c.to_ascii_uppercase();
            if !upper.is_ascii_uppercase() {
                return None;
            }
            Some(if upper == rules.omit {
                rules.replace
            } else {
                upper
            })
        })
        .collect()
}

/// The 25 letters of the reduced alphabet in canonical order.
pub fn reduced_alphabet(omit: u8) -> Genome {
    let mut letters = [0u8; KEY_LEN];
    let mut i = 0;
    for c in b'A'..=b'Z' {
        if c == omit {
            continue;
        }
        letters[i] = c;
        i += 1;
    }
    letters
}

/// A Playfair key: a permutation of the reduced alphabet arranged as a 5x5
/// square in row-major order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Key {
    keyword: String,
    letters: Genome,
    place: [u8; 26],
    rules: SquareRules,
}

impl Key {
    /// Builds the square from a keyword under the default rules.
    pub fn new(keyword: &str) -> Self {
        Self::with_rules(keyword, SquareRules::default())
    }

    /// Builds the square from a keyword: sanitized keyword letters first
    /// (duplicates skipped), then the rest of the alphabet in canonical
    /// order. Total and deterministic for any input string.
    pub fn with_rules(keyword: &str, rules: SquareRules) -> Self {
        let mut letters = [0u8; KEY_LEN];
        let mut place = [NOT_IN_SQUARE; 26];
        let mut used = 0usize;

        for &c in &sanitize(keyword.as_bytes(), &rules) {
            let slot = &mut place[(c - b'A') as usize];
            if *slot == NOT_IN_SQUARE {
                *slot = used as u8;
                letters[used] = c;
                used += 1;
            }
        }
        for c in b'A'..=b'Z' {
            if c == rules.omit {
                continue;
            }
            let slot = &mut place[(c - b'A') as usize];
            if *slot == NOT_IN_SQUARE {
                *slot = used as u8;
                letters[used] = c;
                used += 1;
            }
        }
        debug_assert_eq!(used, KEY_LEN);

        Self {
            keyword: keyword.to_string(),
            letters,
            place,
            rules,
        }
    }

    /// Builds a key directly from 25 square letters, e.g. a genome produced
    /// by the genetic operators. Fails with `InvalidKey` unless the letters
    /// are a permutation of the reduced alphabet.
    pub fn from_square(letters: &Genome, rules: SquareRules) -> PfResult<Self> {
        let mut place = [NOT_IN_SQUARE; 26];
        for (i, &c) in letters.iter().enumerate() {
            if !c.is_ascii_uppercase() || c == rules.omit {
                return Err(PlaycrackError::InvalidKey(format!(
                    "byte 0x{c:02X} at position {i} is not a square letter"
                )));
            }
            let slot = &mut place[(c - b'A') as usize];
            if *slot != NOT_IN_SQUARE {
                return Err(PlaycrackError::InvalidKey(format!(
                    "letter {} appears twice",
                    c as char
                )));
            }
            *slot = i as u8;
        }
        Ok(Self {
            keyword: String::new(),
            letters: *letters,
            place,
            rules,
        })
    }

    /// The keyword as given at construction, not as it appears in the
    /// square. Empty for keys built from a raw square.
    pub fn keyword(&self) -> &str {
        &self.keyword
    }

    pub fn letters(&self) -> &Genome {
        &self.letters
    }

    pub fn rules(&self) -> &SquareRules {
        &self.rules
    }

    /// The square as rows, for display.
    pub fn rows(&self) -> impl Iterator<Item = &[u8]> {
        self.letters.chunks(SQUARE_SIDE)
    }

    /// Sanitizes text under this key's rules.
    pub fn sanitize(&self, text: &[u8]) -> Vec<u8> {
        sanitize(text, &self.rules)
    }

    /// Encrypts sanitized plaintext. Walks the text left to right forming
    /// digrams, inserting the double pad between repeated letters and the
    /// extra pad after an odd tail. A pad equal to the letter it pads is
    /// advanced to the next letter of the alphabet (wrapping, skipping the
    /// omitted letter), so no digram ever holds two equal letters.
    ///
    /// Call [`Key::sanitize`] first; a letter outside the square is a bug in
    /// the caller and panics.
    pub fn encrypt(&self, plain: &[u8]) -> Vec<u8> {
        let mut cipher = Vec::with_capacity(plain.len() + plain.len() / 2);
        let mut i = 0;
        while i < plain.len() {
            let a = plain[i];
            let (b, consumed) = match plain.get(i + 1) {
                None => (self.resolve_pad(self.rules.extra_pad, a), 1),
                Some(&next) if next == a => (self.resolve_pad(self.rules.double_pad, a), 1),
                Some(&next) => (next, 2),
            };
            cipher.extend_from_slice(&self.encrypt_digram(a, b));
            i += consumed;
        }
        cipher
    }

    /// Decrypts sanitized ciphertext. Pads inserted during encryption stay
    /// in the output; interpreting them is the caller's business. An odd
    /// trailing letter (never produced by [`Key::encrypt`]) is paired with
    /// the extra pad.
    pub fn decrypt(&self, cipher: &[u8]) -> Vec<u8> {
        let mut plain = Vec::with_capacity(cipher.len());
        let mut i = 0;
        while i < cipher.len() {
            let a = cipher[i];
            let b = match cipher.get(i + 1) {
                None => self.rules.extra_pad,
                Some(&next) => next,
            };
            plain.extend_from_slice(&self.decrypt_digram(a, b));
            i += 2;
        }
        plain
    }

    fn resolve_pad(&self, pad: u8, against: u8) -> u8 {
        if pad != against {
            return pad;
        }
        let mut next = pad;
        loop {
            next = if next == b'Z' { b'A' } else { next + 1 };
            if next != self.rules.omit {
                return next;
            }
        }
    }

    fn encrypt_digram(&self, a: u8, b: u8) -> [u8; 2] {
        let (a_row, a_col) = self.position(a);
        let (b_row, b_col) = self.position(b);
        if a_row == b_row {
            [
                self.at(a_row, (a_col + 1) % SQUARE_SIDE),
                self.at(b_row, (b_col + 1) % SQUARE_SIDE),
            ]
        } else if a_col == b_col {
            [
                self.at((a_row + 1) % SQUARE_SIDE, a_col),
                self.at((b_row + 1) % SQUARE_SIDE, b_col),
            ]
        } else {
            [self.at(a_row, b_col), self.at(b_row, a_col)]
        }
    }

    fn decrypt_digram(&self, a: u8, b: u8) -> [u8; 2] {
        let (a_row, a_col) = self.position(a);
        let (b_row, b_col) = self.position(b);
        if a_row == b_row {
            [
                self.at(a_row, (a_col + 4) % SQUARE_SIDE),
                self.at(b_row, (b_col + 4) % SQUARE_SIDE),
            ]
        } else if a_col == b_col {
            [
                self.at((a_row + 4) % SQUARE_SIDE, a_col),
                self.at((b_row + 4) % SQUARE_SIDE, b_col),
            ]
        } else {
            [self.at(a_row, b_col), self.at(b_row, a_col)]
        }
    }

    fn position(&self, letter: u8) -> (usize, usize) {
        let idx = letter
            .checked_sub(b'A')
            .filter(|&i| i < 26)
            .map(|i| self.place[i as usize])
            .unwrap_or(NOT_IN_SQUARE);
        if idx == NOT_IN_SQUARE {
            panic!(
                "letter 0x{letter:02X} is not in the square; sanitize the text before the codec"
            );
        }
        ((idx as usize) / SQUARE_SIDE, (idx as usize) % SQUARE_SIDE)
    }

    #[inline]
    fn at(&self, row: usize, col: usize) -> u8 {
        self.letters[row * SQUARE_SIDE + col]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keyword_square_matches_textbook_layout() {
        let key = Key::new("playfair example");
        let rows: Vec<&[u8]> = key.rows().collect();
        assert_eq!(rows[0], b"PLAYF");
        assert_eq!(rows[1], b"IREXM");
        assert_eq!(rows[2], b"BCDGH");
        assert_eq!(rows[3], b"KNOQS");
        assert_eq!(rows[4], b"TUVWZ");
        assert_eq!(key.keyword(), "playfair example");
    }

    #[test]
    fn empty_keyword_yields_canonical_square() {
        let key = Key::new("");
        assert_eq!(key.letters(), &reduced_alphabet(b'J'));
    }

    #[test]
    fn textbook_encryption() {
        let key = Key::new("playfair example");
        let plain = key.sanitize(b"Hide the gold in the tree stump");
        assert_eq!(plain, b"HIDETHEGOLDINTHETREESTUMP".to_vec());
        let cipher = key.encrypt(&plain);
        assert_eq!(cipher, b"BMODZBXDNABEKUDMUIXMMOUVIF".to_vec());
    }

    #[test]
    fn double_letter_gets_padded() {
        let key = Key::new("playfair example");
        let cipher = key.encrypt(b"HELLO");
        assert_eq!(cipher.len(), 6);
        assert_eq!(key.decrypt(&cipher), b"HELXLO".to_vec());
    }

    #[test]
    fn odd_tail_gets_padded() {
        let key = Key::new("playfair example");
        let cipher = key.encrypt(b"CAT");
        assert_eq!(cipher.len(), 4);
        assert_eq!(key.decrypt(&cipher), b"CATX".to_vec());
    }

    #[test]
    fn pad_never_collides_with_padded_letter() {
        let key = Key::new("");
        // Both the double pad and the extra pad default to X, so XX forces
        // the pad to advance to Y in both positions.
        let cipher = key.encrypt(b"XX");
        assert_eq!(cipher.len(), 4);
        assert_eq!(key.decrypt(&cipher), b"XYXY".to_vec());
    }

    #[test]
    fn omitted_letter_never_reappears() {
        let key = Key::new("jungle");
        let plain = key.sanitize(b"Jazz on a June journey");
        assert!(!plain.contains(&b'J'));
        let decrypted = key.decrypt(&key.encrypt(&plain));
        assert!(!decrypted.contains(&b'J'), "J leaked through the codec");
    }

    #[test]
    fn sanitize_is_idempotent() {
        let rules = SquareRules::default();
        let once = sanitize(b"Hide the gold... in the TREE stump, Joe!", &rules);
        let twice = sanitize(&once, &rules);
        assert_eq!(once, twice);
    }

    #[test]
    fn replacement_always_differs_from_omitted() {
        let rules = SquareRules::new('Q', 'q', 'X', 'X');
        assert_eq!(rules.omit, b'Q');
        assert_eq!(rules.replace, b'I');

        let rules = SquareRules::new('I', 'I', 'X', 'X');
        assert_eq!(rules.omit, b'I');
        assert_eq!(rules.replace, b'J');
    }

    #[test]
    fn pads_are_normalized_into_the_alphabet() {
        // Omitting X pushes both pads onto the replacement letter.
        let rules = SquareRules::new('X', 'I', 'X', 'X');
        assert_eq!(rules.double_pad, b'I');
        assert_eq!(rules.extra_pad, b'I');
    }

    #[test]
    fn from_square_rejects_duplicates_and_foreign_letters() {
        let rules = SquareRules::default();
        let mut genome = reduced_alphabet(b'J');
        genome[3] = genome[4];
        assert!(Key::from_square(&genome, rules).is_err());

        let mut genome = reduced_alphabet(b'J');
        genome[0] = b'J';
        assert!(Key::from_square(&genome, rules).is_err());

        let genome = reduced_alphabet(b'J');
        assert!(Key::from_square(&genome, rules).is_ok());
    }

    #[test]
    #[should_panic(expected = "sanitize the text")]
    fn unsanitized_input_is_a_caller_bug() {
        let key = Key::new("");
        key.encrypt(b"a b");
    }
}
