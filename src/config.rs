use std::fmt;
use std::thread;

use clap::ValueEnum;
use serde::Serialize;

pub const DEFAULT_MAX_DEPTH: usize = 64;

/// Wire format of an input file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Format {
    /// ASN.1 BER circuit-switched call data records.
    Voz,
    /// Diameter accounting messages.
    Volte,
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Format::Voz => "voz",
            Format::Volte => "volte",
        })
    }
}

/// What to do with an AVP whose flags miss the expected V/M/P bits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum FlagPolicy {
    /// Drop the AVP and keep decoding the message.
    #[default]
    SkipAvp,
    /// Fail the whole message.
    AbortBlock,
    /// Accept the AVP; reserved bits still cause it to be skipped.
    Ignore,
}

/// Per-buffer decode options. Worker count belongs to the [`Scheduler`](crate::Scheduler).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecodeConfig {
    pub format: Format,
    /// Bound on nested TLVs / grouped AVPs per block.
    pub max_depth: usize,
    pub flag_policy: FlagPolicy,
}

impl DecodeConfig {
    pub fn new(format: Format) -> Self {
        Self {
            format,
            max_depth: DEFAULT_MAX_DEPTH,
            flag_policy: FlagPolicy::default(),
        }
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth.max(1);
        self
    }

    pub fn with_flag_policy(mut self, flag_policy: FlagPolicy) -> Self {
        self.flag_policy = flag_policy;
        self
    }
}

pub fn default_workers() -> usize {
    thread::available_parallelism().map_or(1, |n| n.get())
}
