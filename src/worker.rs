// src/worker.rs
//
// One worker per singer id, run once to a terminal state. Songs within a
// singer are fetched strictly in catalog order with no sub-parallelism, so
// the output file needs no synchronization: it is owned by this worker for
// the duration of the run.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::catalog::{self, CatalogPage};
use crate::error::ScrapeError;
use crate::file::singer_output_path;
use crate::net::Fetch;
use crate::preprocess::Pipeline;

/// Terminal state of one singer task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SingerOutcome {
    /// The id maps to no content on the site. No file was created.
    Empty,
    /// Catalog harvested to completion.
    Done {
        path: PathBuf,
        songs_written: usize,
        songs_skipped: usize,
    },
    /// The task aborted on a fault. Sibling singers are unaffected.
    Failed(String),
}

pub struct HarvestWorker<'a> {
    singer_id: u32,
    base_url: &'a str,
    out_dir: &'a Path,
    pipeline: &'a Pipeline,
    fetch: &'a dyn Fetch,
}

impl<'a> HarvestWorker<'a> {
    pub fn new(
        singer_id: u32,
        base_url: &'a str,
        out_dir: &'a Path,
        pipeline: &'a Pipeline,
        fetch: &'a dyn Fetch,
    ) -> Self {
        Self { singer_id, base_url, out_dir, pipeline, fetch }
    }

    /// Run to a terminal state. Faults are contained here: they become
    /// `Failed`, never a panic or a crash of the pool.
    pub fn run(&self) -> SingerOutcome {
        match self.harvest() {
            Ok(outcome) => outcome,
            Err(e) => {
                log::warn!("singer {}: {}", self.singer_id, e);
                SingerOutcome::Failed(e.to_string())
            }
        }
    }

    fn harvest(&self) -> Result<SingerOutcome, ScrapeError> {
        let page = CatalogPage::fetch(self.fetch, self.base_url, self.singer_id)?;

        // Existence probe: ids are dense in the URL scheme but sparse in
        // content, so a missing caption is the common case, not a fault.
        let Some(singer_name) = page.singer_name() else {
            log::debug!("singer {}: no catalog caption", self.singer_id);
            return Ok(SingerOutcome::Empty);
        };

        let path = singer_output_path(self.out_dir, &singer_name, self.singer_id);
        let mut out = BufWriter::new(File::create(&path)?);

        let mut songs_written = 0usize;
        let mut songs_skipped = 0usize;
        for url in page.song_urls() {
            match catalog::fetch_song(self.fetch, &url)? {
                Some(song) => {
                    out.write_all(self.pipeline.apply(&song).as_bytes())?;
                    songs_written += 1;
                }
                None => {
                    // Dead or placeholder link; keep walking the catalog.
                    log::debug!("singer {}: no lyric at {}", self.singer_id, url);
                    songs_skipped += 1;
                }
            }
        }
        out.flush()?;

        log::info!(
            "singer {} ({}): {} songs written, {} skipped -> {}",
            self.singer_id,
            singer_name,
            songs_written,
            songs_skipped,
            path.display()
        );
        Ok(SingerOutcome::Done { path, songs_written, songs_skipped })
    }
}
