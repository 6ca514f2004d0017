pub mod config;
pub mod consts;
pub mod core_types;
pub mod corpus;
pub mod error;
pub mod fitness;
pub mod genetic;
pub mod key;
pub mod ngrams;

pub use error::{PfResult, PlaycrackError};
