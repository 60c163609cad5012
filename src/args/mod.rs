//! CLI argument types and parsing helpers.
mod cli;
mod convert;
pub(crate) mod parsers;
mod types;

#[cfg(test)]
mod test_support;
#[cfg(test)]
mod tests;

pub use cli::LoadArgs;
pub use types::{OutputFormat, PercentileMode, PositiveU64};

pub(crate) use parsers::parse_header;
