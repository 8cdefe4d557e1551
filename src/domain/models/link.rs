use serde::{Deserialize, Serialize};

/// Relation name Responsys uses for the following page of a listing
pub const REL_NEXT: &str = "next";

/// Hypermedia link attached to Responsys resources and listings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Link {
    /// Link relation (`self`, `next`, `prev`, or an operation name)
    #[serde(default)]
    pub rel: String,

    /// Target, usually a path relative to the API endpoint
    #[serde(default)]
    pub href: String,

    /// HTTP method of the related operation
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub method: Option<String>,
}

/// Href of the first `next` link, if any
pub fn next_href(links: &[Link]) -> Option<&str> {
    links
        .iter()
        .find(|link| link.rel == REL_NEXT)
        .map(|link| link.href.as_str())
        .filter(|href| !href.trim().is_empty())
}
