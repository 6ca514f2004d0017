use crate::error::PfResult;
use crate::ngrams::Ngrams;
use std::fs::File;
use std::path::Path;
use tracing::info;

/// Streams a raw text corpus into an n-gram table, in memory.
pub fn generate_table(content: &[u8], n: usize) -> PfResult<Ngrams> {
    let mut grams = Ngrams::new(n)?;
    grams.collect(content)?;
    Ok(grams)
}

/// Builds a reference table from a raw text file and writes it in the
/// `<NGRAM> <COUNT>` format. Returns the number of windows counted.
pub fn build_reference<P: AsRef<Path>, Q: AsRef<Path>>(
    input: P,
    output: Q,
    n: usize,
) -> PfResult<u64> {
    let mut grams = Ngrams::new(n)?;
    grams.collect(File::open(input.as_ref())?)?;
    grams.write_file(output.as_ref())?;
    info!(
        "Collected {} windows ({} distinct {}-grams) into {:?}",
        grams.total(),
        grams.keys().count(),
        n,
        output.as_ref()
    );
    Ok(grams.total())
}
