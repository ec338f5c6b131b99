// tests/harvest.rs
//
// Coordinator-level tests: the whole fan-out run against a canned site,
// no network involved.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

use lyric_scrape::error::ScrapeError;
use lyric_scrape::net::Fetch;
use lyric_scrape::params::Params;
use lyric_scrape::preprocess::StepSpec;
use lyric_scrape::progress::Progress;
use lyric_scrape::runner;
use lyric_scrape::worker::SingerOutcome;

const BASE: &str = "https://site.test";

/// Canned-page transport: URL -> body. Unknown URLs yield a bare page with
/// no catalog caption, i.e. "this id has no content". URLs in the `failing`
/// set yield a transport-level fault instead.
struct FakeSite {
    pages: HashMap<String, String>,
    failing: Vec<String>,
}

impl FakeSite {
    fn new() -> Self {
        Self { pages: HashMap::new(), failing: Vec::new() }
    }

    fn singer(mut self, id: u32, name: &str, songs: &[(&str, Option<&str>)]) -> Self {
        let items: String = songs
            .iter()
            .map(|(href, _)| format!(r#"<li class="artLyrList"><a href="{href}">s</a></li>"#))
            .collect();
        self.pages.insert(
            format!("{BASE}/2,{id},0.html"),
            format!(r#"<html><body><h2 class="lyricCapt">{name}</h2><ul>{items}</ul></body></html>"#),
        );
        for (href, lyric) in songs {
            let body = match lyric {
                Some(text) => format!(r#"<html><body><p class="lyric">{text}</p></body></html>"#),
                None => "<html><body><p>placeholder</p></body></html>".to_string(),
            };
            self.pages.insert(format!("{BASE}{href}"), body);
        }
        self
    }

    fn failing_catalog(mut self, id: u32) -> Self {
        self.failing.push(format!("{BASE}/2,{id},0.html"));
        self
    }
}

impl Fetch for FakeSite {
    fn get(&self, url: &str) -> Result<String, ScrapeError> {
        if self.failing.iter().any(|u| u == url) {
            return Err(ScrapeError::Status { status: 500, url: url.to_string() });
        }
        Ok(self
            .pages
            .get(url)
            .cloned()
            .unwrap_or_else(|| "<html><body></body></html>".to_string()))
    }
}

/// Records every callback so tests can assert on the coordinator contract.
#[derive(Default)]
struct Recorder {
    begun_with: Option<usize>,
    settled: Vec<(u32, SingerOutcome)>,
    finished: bool,
}

impl Progress for Recorder {
    fn begin(&mut self, total: usize) {
        self.begun_with = Some(total);
    }
    fn singer_done(&mut self, id: u32, outcome: &SingerOutcome) {
        self.settled.push((id, outcome.clone()));
    }
    fn finish(&mut self) {
        self.finished = true;
    }
}

fn params(out: PathBuf, num_singers: u32, num_workers: usize) -> Params {
    let mut p = Params::new();
    p.out = out;
    p.num_singers = num_singers;
    p.num_workers = num_workers;
    p.base_url = BASE.to_string();
    p.steps = vec![StepSpec::Lowercase, StepSpec::Tokenize];
    p
}

#[test]
fn end_to_end_single_live_singer() {
    let site = FakeSite::new().singer(
        42,
        "Test",
        &[("/1,42,1.html", Some("Hello\nworld")), ("/1,42,2.html", None)],
    );
    let dir = tempfile::tempdir().unwrap();
    let p = params(dir.path().to_path_buf(), 50, 4);

    let summary = runner::run_harvest(&p, Arc::new(site), None).unwrap();

    assert_eq!(summary.done, 1);
    assert_eq!(summary.empty, 49);
    assert_eq!(summary.failed, 0);
    assert_eq!(summary.settled(), 50);

    let expected = dir.path().join("Test_42.txt");
    assert_eq!(summary.files_written, vec![expected.clone()]);
    // One wrapped block for the live song; the dead link contributes nothing.
    let contents = std::fs::read_to_string(expected).unwrap();
    assert_eq!(contents, "<SOS><SOV>\nhello\nworld\n<EOV><EOS>");
    // Exactly one file in the output directory.
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);
}

#[test]
fn every_task_settles_with_small_pool() {
    // P < N: 3 workers over 12 ids. The run must return only after all 12
    // tasks reach a terminal state, whatever order they finish in.
    let site = FakeSite::new()
        .singer(2, "Dva", &[("/1,2,1.html", Some("pesma"))])
        .singer(9, "Devet", &[("/1,9,1.html", Some("druga"))]);
    let dir = tempfile::tempdir().unwrap();
    let p = params(dir.path().to_path_buf(), 12, 3);

    let mut rec = Recorder::default();
    let summary = runner::run_harvest(&p, Arc::new(site), Some(&mut rec)).unwrap();

    assert_eq!(rec.begun_with, Some(12));
    assert!(rec.finished);
    assert_eq!(summary.settled(), 12);
    assert_eq!(summary.done, 2);
    assert_eq!(summary.empty, 10);

    let mut ids: Vec<u32> = rec.settled.iter().map(|(id, _)| *id).collect();
    ids.sort_unstable();
    assert_eq!(ids, (0..12).collect::<Vec<u32>>());
}

#[test]
fn one_failing_singer_does_not_sink_the_rest() {
    let site = FakeSite::new()
        .singer(1, "Ok", &[("/1,1,1.html", Some("tekst"))])
        .failing_catalog(3);
    let dir = tempfile::tempdir().unwrap();
    let p = params(dir.path().to_path_buf(), 6, 2);

    let summary = runner::run_harvest(&p, Arc::new(site), None).unwrap();

    assert_eq!(summary.done, 1);
    assert_eq!(summary.failed, 1);
    assert_eq!(summary.empty, 4);
    assert_eq!(summary.failures.len(), 1);
    assert_eq!(summary.failures[0].0, 3);
    assert!(summary.failures[0].1.contains("500"));
}

#[test]
fn ids_filter_limits_the_run() {
    let site = FakeSite::new().singer(5, "Pet", &[("/1,5,1.html", Some("x"))]);
    let dir = tempfile::tempdir().unwrap();
    let mut p = params(dir.path().to_path_buf(), 100, 2);
    p.ids_filter = Some(vec![4, 5, 6]);

    let mut rec = Recorder::default();
    let summary = runner::run_harvest(&p, Arc::new(site), Some(&mut rec)).unwrap();

    assert_eq!(rec.begun_with, Some(3));
    assert_eq!(summary.settled(), 3);
    assert_eq!(summary.done, 1);
}

#[test]
fn empty_output_dir_stays_empty_when_no_singer_exists() {
    let site = FakeSite::new();
    let dir = tempfile::tempdir().unwrap();
    let p = params(dir.path().to_path_buf(), 8, 4);

    let summary = runner::run_harvest(&p, Arc::new(site), None).unwrap();
    assert_eq!(summary.empty, 8);
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
}
