// src/catalog.rs
//
// Page-layout contract for the lyric site. A singer's catalog lives at
// {base}/2,{id},0.html; the caption element carries the display name, each
// `.artLyrList` entry links one song page, and a song page holds its text
// in a single `.lyric` element. Nothing here discovers structure — the
// selectors ARE the contract.

use scraper::{ElementRef, Html, Selector};

use crate::error::ScrapeError;
use crate::net::Fetch;

const CAPTION_SELECTOR: &str = ".lyricCapt";
const ENTRY_SELECTOR: &str = ".artLyrList";
const LINK_SELECTOR: &str = "a";
const LYRIC_SELECTOR: &str = ".lyric";

pub fn catalog_url(base_url: &str, singer_id: u32) -> String {
    format!("{}/2,{},0.html", base_url.trim_end_matches('/'), singer_id)
}

/// One fetched and parsed singer catalog page. Ephemeral: constructed per
/// fetch, owned by a single worker, discarded once the song URLs are drained.
pub struct CatalogPage {
    doc: Html,
    base_url: String,
    caption: Selector,
    entry: Selector,
    link: Selector,
}

impl CatalogPage {
    /// Fetch and parse the catalog page for `singer_id`.
    pub fn fetch(
        fetch: &dyn Fetch,
        base_url: &str,
        singer_id: u32,
    ) -> Result<Self, ScrapeError> {
        let url = catalog_url(base_url, singer_id);
        let body = fetch.get(&url)?;
        Self::from_html(&body, base_url)
    }

    /// Parse an already-fetched document. Fixture entry point for tests.
    pub fn from_html(body: &str, base_url: &str) -> Result<Self, ScrapeError> {
        Ok(Self {
            doc: Html::parse_document(body),
            base_url: base_url.trim_end_matches('/').to_string(),
            caption: selector(CAPTION_SELECTOR)?,
            entry: selector(ENTRY_SELECTOR)?,
            link: selector(LINK_SELECTOR)?,
        })
    }

    /// Display name from the catalog caption. `None` means this id has no
    /// content on the site — the normal probe result for gaps in the id
    /// space, not a fault.
    pub fn singer_name(&self) -> Option<String> {
        self.doc
            .select(&self.caption)
            .next()
            .map(|el| element_text(&el))
            .filter(|name| !name.is_empty())
    }

    pub fn has_content(&self) -> bool {
        self.singer_name().is_some()
    }

    /// Song-page URLs in document order, resolved against the base URL.
    /// Lazy and single-pass: each URL is produced as the caller advances,
    /// nothing is buffered, and re-scanning requires a fresh parse.
    pub fn song_urls(&self) -> impl Iterator<Item = String> + '_ {
        self.doc.select(&self.entry).filter_map(|entry| {
            entry
                .select(&self.link)
                .next()
                .and_then(|a| a.value().attr("href"))
                .map(|href| resolve_url(&self.base_url, href))
        })
    }
}

/// Fetch one song page and pull out its lyric text, trimmed. `Ok(None)`
/// means the page has no lyric element — a dead or placeholder link, skipped
/// by the caller rather than surfaced as an error.
pub fn fetch_song(fetch: &dyn Fetch, url: &str) -> Result<Option<String>, ScrapeError> {
    let body = fetch.get(url)?;
    let doc = Html::parse_document(&body);
    let lyric = selector(LYRIC_SELECTOR)?;
    Ok(doc
        .select(&lyric)
        .next()
        .map(|el| element_text(&el))
        .filter(|text| !text.is_empty()))
}

fn element_text(el: &ElementRef) -> String {
    el.text().collect::<String>().trim().to_string()
}

fn resolve_url(base_url: &str, href: &str) -> String {
    if href.starts_with("http://") || href.starts_with("https://") {
        href.to_string()
    } else if href.starts_with('/') {
        format!("{base_url}{href}")
    } else {
        format!("{base_url}/{href}")
    }
}

fn selector(css: &str) -> Result<Selector, ScrapeError> {
    Selector::parse(css).map_err(|e| ScrapeError::Parse(format!("bad selector {css}: {e}")))
}
