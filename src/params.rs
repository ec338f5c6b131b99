// src/params.rs
use std::path::PathBuf;

use crate::preprocess::StepSpec;

pub const BASE_URL: &str = "https://tekstovi.net";

pub const DEFAULT_OUT_DIR: &str = "out";
pub const SINGERS_SUBDIR: &str = "singers";

pub const DEFAULT_NUM_SINGERS: u32 = 10_000;
pub const DEFAULT_NUM_WORKERS: usize = 32;

/// Line prefixes dropped by the tokenizer unless overridden:
/// refrain markers ("ref.") and stage directions ("(...)").
pub const DEFAULT_SKIP_PREFIXES: &[&str] = &["ref.", "("];

#[derive(Clone)]
pub struct Params {
    pub out: PathBuf,                 // output directory (one file per singer)
    pub num_singers: u32,             // id range [0, num_singers)
    pub num_workers: usize,           // upper bound on in-flight singer tasks
    pub one_singer: Option<u32>,      // harvest a single id
    pub ids_filter: Option<Vec<u32>>, // filter subset of singer ids
    pub base_url: String,             // site root; catalog pages live at {base}/2,{id},0.html
    pub steps: Vec<StepSpec>,         // preprocessing pipeline, applied in order
    pub skip_prefixes: Vec<String>,   // default removable-line prefixes for tokenize/filter
    pub quiet: bool,                  // suppress per-singer progress lines
}

impl Params {
    pub fn new() -> Self {
        Self {
            out: PathBuf::from(DEFAULT_OUT_DIR).join(SINGERS_SUBDIR),
            num_singers: DEFAULT_NUM_SINGERS,
            num_workers: DEFAULT_NUM_WORKERS,
            one_singer: None,
            ids_filter: None,
            base_url: BASE_URL.to_string(),
            steps: vec![StepSpec::Lowercase, StepSpec::Tokenize],
            skip_prefixes: DEFAULT_SKIP_PREFIXES.iter().map(|s| s.to_string()).collect(),
            quiet: false,
        }
    }
}

impl Default for Params {
    fn default() -> Self {
        Self::new()
    }
}
