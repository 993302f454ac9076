// src/config.rs

/// How normalized descriptions of one kind are combined
#[derive(clap::ValueEnum, Clone, Debug, Copy, Default, PartialEq, Eq)]
pub enum AggregationMode {
    /// Drop repeated descriptions
    #[default]
    Dedup,
    /// Mask the parts that vary between components of one refactoring, then dedup
    Wildcard,
}

/// Settings shared by every batch of a run
#[derive(Debug, Clone)]
pub struct Config {
    /// Files whose name ends with this count as source files
    pub source_suffix: String,
    pub aggregation: AggregationMode,
    /// Drop unknown or malformed descriptions instead of aborting the run
    pub skip_unknown: bool,
    pub explain: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            source_suffix: ".java".to_string(),
            aggregation: AggregationMode::default(),
            skip_unknown: false,
            explain: false,
        }
    }
}
