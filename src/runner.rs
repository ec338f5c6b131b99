// src/runner.rs
//
// Coordinator for the singer-id fan-out: one task per id, submitted in
// numeric order to a pool bounded at `num_workers` threads. Tasks report
// through an mpsc channel drained on the calling thread, which doubles as
// the wait-all barrier: the channel closes once every task has settled.

use std::error::Error;
use std::path::PathBuf;
use std::sync::{mpsc, Arc};

use crate::file::ensure_directory;
use crate::net::{Fetch, HttpClient};
use crate::params::Params;
use crate::preprocess::{build_pipeline, Pipeline};
use crate::progress::Progress;
use crate::worker::{HarvestWorker, SingerOutcome};

/// Summary of what a run produced. Every submitted id appears in exactly
/// one bucket.
#[derive(Default)]
pub struct RunSummary {
    pub files_written: Vec<PathBuf>,
    pub done: usize,
    pub empty: usize,
    pub failed: usize,
    pub failures: Vec<(u32, String)>,
}

impl RunSummary {
    fn record(&mut self, id: u32, outcome: SingerOutcome) {
        match outcome {
            SingerOutcome::Done { path, .. } => {
                self.files_written.push(path);
                self.done += 1;
            }
            SingerOutcome::Empty => self.empty += 1,
            SingerOutcome::Failed(reason) => {
                self.failed += 1;
                self.failures.push((id, reason));
            }
        }
    }

    pub fn settled(&self) -> usize {
        self.done + self.empty + self.failed
    }
}

/// Top-level runner: build the real HTTP client and harvest.
/// `progress` can be None (no UI updates) or Some(&mut impl Progress).
pub fn run(
    params: &Params,
    progress: Option<&mut dyn Progress>,
) -> Result<RunSummary, Box<dyn Error>> {
    run_harvest(params, Arc::new(HttpClient::new()), progress)
}

/// Harvest over an arbitrary transport. Seam used by tests to run the whole
/// coordinator against a canned site.
pub fn run_harvest(
    params: &Params,
    fetch: Arc<dyn Fetch>,
    mut progress: Option<&mut dyn Progress>,
) -> Result<RunSummary, Box<dyn Error>> {
    let ids = select_ids(params);
    let mut summary = RunSummary::default();

    if ids.is_empty() {
        if let Some(p) = progress.as_deref_mut() {
            p.log("No singer ids to process (after filtering).");
        }
        return Ok(summary);
    }

    ensure_directory(&params.out)?;

    // Built once, shared read-only by every worker. Steps are pure, so no
    // locking is needed around the pipeline.
    let pipeline: Arc<Pipeline> = Arc::new(build_pipeline(&params.steps, &params.skip_prefixes));

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(params.num_workers)
        .thread_name(|i| format!("harvest-{i}"))
        .build()?;

    if let Some(p) = progress.as_deref_mut() {
        p.begin(ids.len());
    }
    log::info!(
        "harvesting {} singer ids with {} workers into {}",
        ids.len(),
        params.num_workers,
        params.out.display()
    );

    let (tx, rx) = mpsc::channel::<(u32, SingerOutcome)>();
    for &id in &ids {
        let tx = tx.clone();
        let fetch = Arc::clone(&fetch);
        let pipeline = Arc::clone(&pipeline);
        let base_url = params.base_url.clone();
        let out_dir = params.out.clone();
        pool.spawn(move || {
            let worker = HarvestWorker::new(id, &base_url, &out_dir, &pipeline, fetch.as_ref());
            // A dropped receiver just means nobody is listening any more.
            let _ = tx.send((id, worker.run()));
        });
    }
    drop(tx);

    // Wait-all barrier: iteration ends when the last task's sender drops.
    for (id, outcome) in rx {
        if let Some(p) = progress.as_deref_mut() {
            p.singer_done(id, &outcome);
        }
        summary.record(id, outcome);
    }

    if let Some(p) = progress {
        p.finish();
    }
    log::info!(
        "run complete: {} done, {} empty, {} failed",
        summary.done,
        summary.empty,
        summary.failed
    );
    Ok(summary)
}

/// The id set for this run, in numeric submission order.
fn select_ids(params: &Params) -> Vec<u32> {
    let mut ids: Vec<u32> = if let Some(one) = params.one_singer {
        vec![one]
    } else {
        (0..params.num_singers).collect()
    };

    if let Some(filter) = &params.ids_filter {
        // Intersect with filter. Filter is assumed sorted; if not, sort first.
        let mut f = filter.clone();
        f.sort_unstable();
        ids.retain(|id| f.binary_search(id).is_ok());
    }

    ids
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::preprocess::StepSpec;

    fn params_for(n: u32) -> Params {
        let mut p = Params::new();
        p.num_singers = n;
        p.steps = vec![StepSpec::Tokenize];
        p
    }

    #[test]
    fn select_ids_full_range() {
        assert_eq!(select_ids(&params_for(4)), vec![0, 1, 2, 3]);
    }

    #[test]
    fn select_ids_one_singer() {
        let mut p = params_for(100);
        p.one_singer = Some(42);
        assert_eq!(select_ids(&p), vec![42]);
    }

    #[test]
    fn select_ids_filter_intersects() {
        let mut p = params_for(10);
        p.ids_filter = Some(vec![7, 3, 99]);
        assert_eq!(select_ids(&p), vec![3, 7]);
    }

    #[test]
    fn summary_buckets_every_outcome() {
        let mut s = RunSummary::default();
        s.record(0, SingerOutcome::Empty);
        s.record(
            1,
            SingerOutcome::Done { path: PathBuf::from("x"), songs_written: 2, songs_skipped: 0 },
        );
        s.record(2, SingerOutcome::Failed("boom".into()));
        assert_eq!(s.settled(), 3);
        assert_eq!(s.files_written, vec![PathBuf::from("x")]);
        assert_eq!(s.failures, vec![(2, "boom".to_string())]);
    }
}
