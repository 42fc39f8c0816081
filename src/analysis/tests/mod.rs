//! Unit tests for the analysis pipeline

#[cfg(test)]
mod threshold_tests;
#[cfg(test)]
mod extractor_tests;
