/// Side length of the key square.
pub const SQUARE_SIDE: usize = 5;

/// Number of letters in a key square (5 * 5).
pub const KEY_LEN: usize = 25;

/// The value used in the letter -> position map for letters outside the
/// square (the omitted letter).
pub const NOT_IN_SQUARE: u8 = 255;

/// Letter merged away from the 26-letter alphabet by default.
pub const DEFAULT_OMIT: u8 = b'J';

/// Letter substituted for the omitted one during sanitization.
pub const DEFAULT_REPLACE: u8 = b'I';

/// Default pad inserted between a doubled digram pair.
pub const DEFAULT_DOUBLE_PAD: u8 = b'X';

/// Default pad appended to an odd-length message.
pub const DEFAULT_EXTRA_PAD: u8 = b'X';

/// Widest n-gram window the collector accepts.
pub const MAX_NGRAM: usize = 13;

/// Window width above which fitness evaluation gets impractically slow.
pub const NGRAM_WARN_THRESHOLD: usize = 5;
