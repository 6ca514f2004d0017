use crate::consts::{MAX_NGRAM, NGRAM_WARN_THRESHOLD};
use crate::error::{PfResult, PlaycrackError};
use std::collections::HashMap;
use std::collections::HashSet;
use std::fs::File;
use std::io::{BufReader, Read, Write};
use std::path::Path;
use tracing::warn;

/// A sliding n-gram frequency table: counts per n-letter string plus the
/// running total of windows seen.
#[derive(Debug, Clone)]
pub struct Ngrams {
    n: usize,
    counts: HashMap<String, u64>,
    total: u64,
}

impl Ngrams {
    pub fn new(n: usize) -> PfResult<Self> {
        if n == 0 || n > MAX_NGRAM {
            return Err(PlaycrackError::InvalidParameters(format!(
                "n-gram window must be 1..={MAX_NGRAM}, got {n}"
            )));
        }
        if n > NGRAM_WARN_THRESHOLD {
            warn!("n-gram window {} is large; scoring will be slow", n);
        }
        Ok(Self {
            n,
            counts: HashMap::new(),
            total: 0,
        })
    }

    pub fn n(&self) -> usize {
        self.n
    }

    pub fn total(&self) -> u64 {
        self.total
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    pub fn count(&self, gram: &str) -> u64 {
        self.counts.get(gram).copied().unwrap_or(0)
    }

    /// Normalized frequency of `gram`, 0.0 when absent. Meaningless until
    /// at least one window has been counted.
    pub fn freq(&self, gram: &str) -> f64 {
        debug_assert!(self.total > 0, "freq queried on an empty table");
        match self.counts.get(gram) {
            Some(&count) => count as f64 / self.total as f64,
            None => 0.0,
        }
    }

    /// Iteration order is the map's own; callers needing a stable order
    /// must sort.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.counts.keys().map(String::as_str)
    }

    /// Drops all counts so the table can be reused for another text.
    pub fn clear(&mut self) {
        self.counts.clear();
        self.total = 0;
    }

    /// Streams a byte source through a rolling window of the last n
    /// alphabetic characters, uppercased. Non-letters are skipped without
    /// breaking the window. The first n-1 letters only fill the window;
    /// every letter after that counts one n-gram. Accumulates on top of any
    /// existing counts.
    pub fn collect<R: Read>(&mut self, source: R) -> PfResult<()> {
        let n = self.n;
        // Circular buffer; `head` is the slot the next letter lands in,
        // which is also the logical start of the current window.
        let mut window = vec![0u8; n];
        let mut head = 0usize;
        let mut seen = 0usize;

        for byte in BufReader::new(source).bytes() {
            let c = byte?;
            if !c.is_ascii_alphabetic() {
                continue;
            }
            window[head] = c.to_ascii_uppercase();
            head = (head + 1) % n;
            seen += 1;
            if seen < n {
                continue;
            }
            let mut gram = String::with_capacity(n);
            for i in 0..n {
                gram.push(window[(head + i) % n] as char);
            }
            *self.counts.entry(gram).or_insert(0) += 1;
            self.total += 1;
        }
        Ok(())
    }

    /// Writes the table as `<NGRAM> <COUNT>` lines in map-iteration order.
    pub fn write_table<W: Write>(&self, out: &mut W) -> PfResult<()> {
        for (gram, count) in &self.counts {
            writeln!(out, "{gram} {count}")?;
        }
        Ok(())
    }

    pub fn write_file<P: AsRef<Path>>(&self, path: P) -> PfResult<()> {
        let mut file = File::create(path)?;
        self.write_table(&mut file)
    }
}

/// Reads a reference table: one `<NGRAM> <COUNT>` entry per line, empty
/// lines and lines starting with `/` skipped. Entry order is irrelevant and
/// duplicate n-grams sum. Use [`validate_table`] for the strict check.
pub fn read_table<R: Read>(source: R, n: usize) -> PfResult<Ngrams> {
    let mut grams = Ngrams::new(n)?;
    let mut rdr = table_reader(source);
    for record in rdr.records() {
        let record = record?;
        let (gram, count) = parse_entry(&record, n)?;
        *grams.counts.entry(gram).or_insert(0) += count;
        grams.total += count;
    }
    Ok(grams)
}

pub fn read_table_file<P: AsRef<Path>>(path: P, n: usize) -> PfResult<Ngrams> {
    read_table(File::open(path)?, n)
}

/// Strict validator: rejects any malformed line and any duplicate n-gram.
pub fn validate_table<R: Read>(source: R, n: usize) -> PfResult<()> {
    let mut seen: HashSet<String> = HashSet::new();
    let mut rdr = table_reader(source);
    for record in rdr.records() {
        let record = record?;
        let (gram, _) = parse_entry(&record, n)?;
        if !seen.insert(gram.clone()) {
            return Err(PlaycrackError::MalformedInput(format!(
                "duplicate n-gram {gram:?}{}",
                at_line(&record)
            )));
        }
    }
    Ok(())
}

pub fn validate_table_file<P: AsRef<Path>>(path: P, n: usize) -> PfResult<()> {
    validate_table(File::open(path)?, n)
}

fn table_reader<R: Read>(source: R) -> csv::Reader<R> {
    csv::ReaderBuilder::new()
        .delimiter(b' ')
        .comment(Some(b'/'))
        .has_headers(false)
        // Field counts are checked in parse_entry so a short or long line
        // reports as MalformedInput instead of a reader error.
        .flexible(true)
        .from_reader(source)
}

fn parse_entry(record: &csv::StringRecord, n: usize) -> PfResult<(String, u64)> {
    if record.len() != 2 {
        return Err(PlaycrackError::MalformedInput(format!(
            "expected `<ngram> <count>`, got {} fields{}",
            record.len(),
            at_line(record)
        )));
    }
    let gram = &record[0];
    if gram.len() != n || !gram.bytes().all(|b| b.is_ascii_uppercase()) {
        return Err(PlaycrackError::MalformedInput(format!(
            "{:?} is not an uppercase {n}-gram{}",
            gram,
            at_line(record)
        )));
    }
    let count: u64 = record[1].parse().map_err(|_| {
        PlaycrackError::MalformedInput(format!(
            "{:?} is not a count{}",
            &record[1],
            at_line(record)
        ))
    })?;
    Ok((gram.to_string(), count))
}

fn at_line(record: &csv::StringRecord) -> String {
    match record.position() {
        Some(pos) => format!(" on line {}", pos.line()),
        None => String::new(),
    }
}
