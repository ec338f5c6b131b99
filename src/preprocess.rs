// src/preprocess.rs
//
// Pure text transforms applied to each harvested song before it is written
// out. Every step is total: no failure modes, no side effects, text in,
// text out. Steps never mutate shared state, so one pipeline instance is
// safely shared read-only across all worker threads.

/// Default boundary tokens for the corpus. Injected into `Tokenize` via its
/// constructor; override with `Tokenize::with_tokens` when a downstream
/// vocabulary needs different markers.
pub const START_OF_SONG: &str = "<SOS>";
pub const END_OF_SONG: &str = "<EOS>";
pub const START_OF_VERSE: &str = "<SOV>";
pub const END_OF_VERSE: &str = "<EOV>";

/// One text transform. `apply` must be pure and total.
pub trait PreprocessingStep: Send + Sync {
    fn apply(&self, text: &str) -> String;
}

/// Unicode lowercasing.
pub struct Lowercase;

impl PreprocessingStep for Lowercase {
    fn apply(&self, text: &str) -> String {
        text.to_lowercase()
    }
}

/// Removes every occurrence of a fixed literal substring (not a pattern).
pub struct RemoveSubstring {
    target: String,
}

impl RemoveSubstring {
    pub fn new(target: impl Into<String>) -> Self {
        Self { target: target.into() }
    }
}

impl PreprocessingStep for RemoveSubstring {
    fn apply(&self, text: &str) -> String {
        if self.target.is_empty() {
            return text.to_string();
        }
        text.replace(&self.target, "")
    }
}

/// Drops whitespace-only lines and lines starting with one of the configured
/// prefixes; the survivors are rejoined with no added separator.
///
/// The prefix test runs on the line as originally read, untrimmed — unlike
/// `Tokenize`, which trims each line before testing. A line that is indented
/// past its marker therefore survives this filter.
pub struct FilterLines {
    prefixes: Vec<String>,
}

impl FilterLines {
    pub fn new(prefixes: Vec<String>) -> Self {
        Self { prefixes }
    }

    fn is_removable(&self, line: &str) -> bool {
        whitespace_only(line) || self.prefixes.iter().any(|p| line.starts_with(p.as_str()))
    }
}

impl PreprocessingStep for FilterLines {
    fn apply(&self, text: &str) -> String {
        text.split('\n')
            .filter(|line| !self.is_removable(line))
            .collect()
    }
}

/// Appends a single trailing newline.
pub struct PadNewline;

impl PreprocessingStep for PadNewline {
    fn apply(&self, text: &str) -> String {
        let mut out = String::with_capacity(text.len() + 1);
        out.push_str(text);
        out.push('\n');
        out
    }
}

/// Wraps a whole song in boundary tokens and normalizes its lines.
///
/// Output shape: `SOS SOV \n`, then each kept line trimmed and followed by
/// `\n`, then `EOV EOS` with no trailing newline. Lines that trim to nothing
/// or start with a removable prefix are dropped. The whole document counts
/// as a single verse; the verse tokens exist in the vocabulary for later
/// segmentation but this step never splits.
pub struct Tokenize {
    prefixes: Vec<String>,
    sos: String,
    eos: String,
    sov: String,
    eov: String,
}

impl Tokenize {
    pub fn new(prefixes: Vec<String>) -> Self {
        Self::with_tokens(
            prefixes,
            START_OF_SONG,
            END_OF_SONG,
            START_OF_VERSE,
            END_OF_VERSE,
        )
    }

    pub fn with_tokens(
        prefixes: Vec<String>,
        sos: impl Into<String>,
        eos: impl Into<String>,
        sov: impl Into<String>,
        eov: impl Into<String>,
    ) -> Self {
        Self {
            prefixes,
            sos: sos.into(),
            eos: eos.into(),
            sov: sov.into(),
            eov: eov.into(),
        }
    }

    fn is_removable(&self, trimmed: &str) -> bool {
        trimmed.is_empty() || self.prefixes.iter().any(|p| trimmed.starts_with(p.as_str()))
    }
}

impl PreprocessingStep for Tokenize {
    fn apply(&self, text: &str) -> String {
        let mut out = String::with_capacity(text.len() + 32);
        out.push_str(&self.sos);
        out.push_str(&self.sov);
        out.push('\n');

        for line in text.split('\n') {
            let line = line.trim();
            if self.is_removable(line) {
                continue;
            }
            out.push_str(line);
            out.push('\n');
        }

        out.push_str(&self.eov);
        out.push_str(&self.eos);
        out
    }
}

fn whitespace_only(line: &str) -> bool {
    line.chars().all(char::is_whitespace)
}

/// Declarative form of a step, as parsed from `--steps`. Turned into live
/// steps by [`build_pipeline`]; separate from the steps themselves so that
/// `--skip-prefix` can arrive on the command line in any order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StepSpec {
    Lowercase,
    RemoveSubstring(String),
    /// `None` means "use the run's default skip prefixes".
    FilterLines(Option<Vec<String>>),
    PadNewline,
    Tokenize,
}

/// Ordered chain of steps applied left to right. Built once at startup and
/// shared read-only by every worker.
pub struct Pipeline {
    steps: Vec<Box<dyn PreprocessingStep>>,
}

impl Pipeline {
    pub fn new(steps: Vec<Box<dyn PreprocessingStep>>) -> Self {
        Self { steps }
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Left fold of the steps over the input. Order is caller-specified and
    /// load-bearing: removal-before-tokenize and tokenize-before-removal are
    /// different pipelines.
    pub fn apply(&self, text: &str) -> String {
        let mut out = text.to_string();
        for step in &self.steps {
            out = step.apply(&out);
        }
        out
    }
}

/// Instantiate a pipeline from parsed step specs. `skip_prefixes` feeds the
/// steps that filter lines and did not carry an explicit prefix list.
pub fn build_pipeline(specs: &[StepSpec], skip_prefixes: &[String]) -> Pipeline {
    let steps = specs
        .iter()
        .map(|spec| -> Box<dyn PreprocessingStep> {
            match spec {
                StepSpec::Lowercase => Box::new(Lowercase),
                StepSpec::RemoveSubstring(target) => Box::new(RemoveSubstring::new(target.clone())),
                StepSpec::FilterLines(prefixes) => Box::new(FilterLines::new(
                    prefixes.clone().unwrap_or_else(|| skip_prefixes.to_vec()),
                )),
                StepSpec::PadNewline => Box::new(PadNewline),
                StepSpec::Tokenize => Box::new(Tokenize::new(skip_prefixes.to_vec())),
            }
        })
        .collect();
    Pipeline::new(steps)
}
