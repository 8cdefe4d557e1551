//! Following `next` links across paged listings.

use reqwest::Url;
use std::collections::HashSet;
use tracing::{debug, warn};

use super::errors::RsysApiError;

/// Resolve a `next` href against the session endpoint.
///
/// Relative hrefs are joined onto the endpoint. Absolute hrefs must share
/// the endpoint's origin so the auth token never leaves the account's host.
pub fn resolve_next_url(endpoint: &Url, href: &str) -> Result<Url, RsysApiError> {
    let href = href.trim();
    let url = endpoint
        .join(href)
        .map_err(|e| RsysApiError::InvalidUrl(format!("cannot resolve next href '{href}': {e}")))?;

    if url.origin() != endpoint.origin() {
        return Err(RsysApiError::InvalidResponse(format!(
            "next href '{href}' points outside the API endpoint {endpoint}"
        )));
    }

    Ok(url)
}

/// Tracks the pages visited by one walk over a listing
#[derive(Debug)]
pub struct PageGuard {
    seen: HashSet<String>,
    pages: u32,
    max_pages: Option<u32>,
}

impl PageGuard {
    pub fn new(max_pages: Option<u32>) -> Self {
        Self {
            seen: HashSet::new(),
            pages: 0,
            max_pages,
        }
    }

    /// Record a page about to be fetched.
    ///
    /// Returns `Ok(false)` once the page budget is spent, and an error when
    /// the listing links back to a page already fetched.
    pub fn admit(&mut self, url: &Url) -> Result<bool, RsysApiError> {
        if let Some(max) = self.max_pages {
            if self.pages >= max {
                warn!("Stopping pagination after {} pages", max);
                return Ok(false);
            }
        }

        if !self.seen.insert(url.as_str().to_string()) {
            return Err(RsysApiError::InvalidResponse(format!(
                "pagination loop: {url} was already fetched"
            )));
        }

        self.pages += 1;
        debug!(page = self.pages, %url, "fetching page");
        Ok(true)
    }

    /// Pages admitted so far
    pub const fn pages(&self) -> u32 {
        self.pages
    }
}
