//! Paged listings returned by Responsys.
//!
//! Listing endpoints return at most 200 records plus a `links` array; the
//! `next` link, when present, addresses the following page.

use serde::de::DeserializeOwned;
use serde::Serialize;

use super::link::{next_href, Link};

/// A single page of a Responsys listing
pub trait Page: DeserializeOwned + Serialize + Default + Send + 'static {
    /// Record type of the listing
    type Item;

    /// Records on this page
    fn items(&self) -> &[Self::Item];

    /// Links attached to this page
    fn links(&self) -> &[Link];

    /// Consume `next`: append its records and take over its links
    fn absorb(&mut self, next: Self);

    /// Href of the following page, if any
    fn next_href(&self) -> Option<&str> {
        next_href(self.links())
    }

    /// Number of records on this page
    fn len(&self) -> usize {
        self.items().len()
    }

    /// Whether this page carries no records
    fn is_empty(&self) -> bool {
        self.items().is_empty()
    }
}
