// src/cli.rs
use std::{env, path::PathBuf};

use crate::params::Params;
use crate::preprocess::StepSpec;
use crate::progress::Progress;
use crate::runner;
use crate::worker::SingerOutcome;

pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    let mut params = Params::new();
    parse_cli(&mut params)?;

    let mut progress = ConsoleProgress { quiet: params.quiet };
    let summary = runner::run(&params, Some(&mut progress))?;

    println!(
        "{} done, {} empty, {} failed ({} files in {})",
        summary.done,
        summary.empty,
        summary.failed,
        summary.files_written.len(),
        params.out.display()
    );
    if summary.failed > 0 {
        // Non-zero exit so batch callers notice, but only after the full
        // id range has settled.
        return Err(format!("{} singer task(s) failed", summary.failed).into());
    }
    Ok(())
}

/// Prints one line per settled singer task.
struct ConsoleProgress {
    quiet: bool,
}

impl Progress for ConsoleProgress {
    fn begin(&mut self, total: usize) {
        if !self.quiet {
            println!("Submitting {} singer tasks...", total);
        }
    }

    fn log(&mut self, msg: &str) {
        println!("{}", msg);
    }

    fn singer_done(&mut self, id: u32, outcome: &SingerOutcome) {
        match outcome {
            SingerOutcome::Empty => {
                if !self.quiet {
                    println!("[{}] empty", id);
                }
            }
            SingerOutcome::Done { path, songs_written, songs_skipped } => {
                if !self.quiet {
                    println!(
                        "[{}] done: {} ({} songs, {} skipped)",
                        id,
                        path.display(),
                        songs_written,
                        songs_skipped
                    );
                }
            }
            SingerOutcome::Failed(reason) => {
                eprintln!("[{}] failed: {}", id, reason);
            }
        }
    }
}

fn parse_cli(params: &mut Params) -> Result<(), Box<dyn std::error::Error>> {
    let mut args = env::args().skip(1);
    let mut skip_prefixes: Option<Vec<String>> = None;

    while let Some(a) = args.next() {
        match a.as_str() {
            "-o" | "--out" => {
                params.out = PathBuf::from(args.next().ok_or("Missing output directory")?);
            }
            "-n" | "--singers" => {
                params.num_singers = args.next().ok_or("Missing value for --singers")?.parse()?;
            }
            "-w" | "--workers" => {
                let v: usize = args.next().ok_or("Missing value for --workers")?.parse()?;
                if v == 0 {
                    return Err("Worker count must be at least 1".into());
                }
                params.num_workers = v;
            }
            "-s" | "--singer" => {
                params.one_singer = Some(args.next().ok_or("Missing singer id")?.parse()?);
            }
            "--ids" => {
                let v = args.next().ok_or("Missing value for --ids")?;
                params.ids_filter = Some(parse_ids_list(&v)?);
            }
            "--base-url" => {
                params.base_url = args.next().ok_or("Missing value for --base-url")?;
            }
            "--steps" => {
                let v = args.next().ok_or("Missing value for --steps")?;
                params.steps = parse_steps(&v)?;
            }
            "--skip-prefix" => {
                let v = args.next().ok_or("Missing value for --skip-prefix")?;
                skip_prefixes.get_or_insert_with(Vec::new).push(v);
            }
            "-q" | "--quiet" => params.quiet = true,
            "-h" | "--help" => {
                eprintln!("{}", include_str!("cli_help.txt"));
                std::process::exit(0);
            }
            _ => return Err(format!("Unknown arg: {}", a).into()),
        }
    }

    // Any --skip-prefix replaces the default set wholesale.
    if let Some(prefixes) = skip_prefixes {
        params.skip_prefixes = prefixes;
    }
    Ok(())
}

/// "3,7,100-120" -> sorted, deduped id list.
fn parse_ids_list(s: &str) -> Result<Vec<u32>, Box<dyn std::error::Error>> {
    let mut out = Vec::new();
    for part in s.split(',') {
        let part = part.trim();
        if part.is_empty() {
            continue;
        }
        if let Some(dash) = part.find('-') {
            let a: u32 = part[..dash].trim().parse()?;
            let b: u32 = part[dash + 1..].trim().parse()?;
            if a > b {
                return Err(format!("Invalid range: {}", part).into());
            }
            out.extend(a..=b);
        } else {
            out.push(part.parse()?);
        }
    }
    out.sort_unstable();
    out.dedup();
    Ok(out)
}

/// "lowercase,remove=ref.,tokenize" -> ordered step specs.
fn parse_steps(s: &str) -> Result<Vec<StepSpec>, Box<dyn std::error::Error>> {
    let mut steps = Vec::new();
    for part in s.split(',') {
        let part = part.trim();
        if part.is_empty() {
            continue;
        }
        let step = match part.split_once('=') {
            None => match part {
                "lowercase" => StepSpec::Lowercase,
                "filter" => StepSpec::FilterLines(None),
                "pad-newline" => StepSpec::PadNewline,
                "tokenize" => StepSpec::Tokenize,
                other => return Err(format!("Unknown step: {}", other).into()),
            },
            Some(("remove", target)) => {
                if target.is_empty() {
                    return Err("remove= needs a substring".into());
                }
                StepSpec::RemoveSubstring(target.to_string())
            }
            Some(("filter", list)) => StepSpec::FilterLines(Some(
                list.split(';')
                    .filter(|p| !p.is_empty())
                    .map(|p| p.to_string())
                    .collect(),
            )),
            Some((other, _)) => return Err(format!("Unknown step: {}", other).into()),
        };
        steps.push(step);
    }
    if steps.is_empty() {
        return Err("Empty --steps spec".into());
    }
    Ok(steps)
}
