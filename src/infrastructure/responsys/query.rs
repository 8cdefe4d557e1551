//! Query-string construction for Responsys listing endpoints.

use reqwest::Url;

use super::errors::RsysApiError;
use crate::domain::models::CampaignType;

/// Largest page Responsys returns for listing endpoints
pub const MAX_PAGE_SIZE: u32 = 200;

/// Ordered query parameters.
///
/// Values are percent-encoded when applied; empty values are dropped so an
/// unset filter never reaches the API as `status=`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryParams {
    pairs: Vec<(String, String)>,
}

impl QueryParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a parameter
    #[must_use]
    pub fn param(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        let value = value.to_string();
        if !value.is_empty() {
            self.pairs.push((key.into(), value));
        }
        self
    }

    /// Add a parameter only when `value` is set
    #[must_use]
    pub fn param_opt<V: ToString>(self, key: impl Into<String>, value: Option<V>) -> Self {
        match value {
            Some(value) => self.param(key, value),
            None => self,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Key/value pairs in insertion order
    pub fn pairs(&self) -> &[(String, String)] {
        &self.pairs
    }

    /// Append the parameters to `url`'s query
    pub fn apply(&self, url: &mut Url) {
        if self.pairs.is_empty() {
            return;
        }
        url.query_pairs_mut()
            .extend_pairs(self.pairs.iter().map(|(k, v)| (k.as_str(), v.as_str())));
    }

    /// Encoded query string without the leading `?`
    pub fn to_query_string(&self) -> String {
        let Ok(mut url) = Url::parse("http://query.invalid/") else {
            return String::new();
        };
        self.apply(&mut url);
        url.query().unwrap_or_default().to_string()
    }
}

fn validate_page(limit: u32) -> Result<(), RsysApiError> {
    if limit == 0 || limit > MAX_PAGE_SIZE {
        return Err(RsysApiError::InvalidRequest(format!(
            "limit must be between 1 and {MAX_PAGE_SIZE}, got {limit}"
        )));
    }
    Ok(())
}

/// Parameters of `GET /campaigns`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CampaignQuery {
    pub limit: u32,
    pub offset: u32,
    pub campaign_type: CampaignType,
}

impl Default for CampaignQuery {
    fn default() -> Self {
        Self {
            limit: MAX_PAGE_SIZE,
            offset: 0,
            campaign_type: CampaignType::Email,
        }
    }
}

impl CampaignQuery {
    /// First page of the given channel
    pub fn first_page(campaign_type: CampaignType, limit: u32) -> Self {
        Self {
            limit,
            offset: 0,
            campaign_type,
        }
    }

    /// Validated query parameters
    pub fn to_params(&self) -> Result<QueryParams, RsysApiError> {
        validate_page(self.limit)?;
        Ok(QueryParams::new()
            .param("limit", self.limit)
            .param("offset", self.offset)
            .param("type", self.campaign_type))
    }
}

/// Parameters of `GET /programs`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgramQuery {
    pub limit: u32,
    pub offset: u32,
    pub status: Option<String>,
}

impl Default for ProgramQuery {
    fn default() -> Self {
        Self {
            limit: MAX_PAGE_SIZE,
            offset: 0,
            status: None,
        }
    }
}

impl ProgramQuery {
    /// First page, optionally filtered by status
    pub fn first_page(status: Option<&str>, limit: u32) -> Self {
        Self {
            limit,
            offset: 0,
            status: status.map(str::to_string),
        }
    }

    /// Validated query parameters
    pub fn to_params(&self) -> Result<QueryParams, RsysApiError> {
        validate_page(self.limit)?;
        Ok(QueryParams::new()
            .param("limit", self.limit)
            .param("offset", self.offset)
            .param_opt("status", self.status.as_deref().map(str::trim)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_campaign_query_string() {
        let params = CampaignQuery::default().to_params().unwrap();
        assert_eq!(params.to_query_string(), "limit=200&offset=0&type=email");

        let params = CampaignQuery {
            limit: 50,
            offset: 100,
            campaign_type: CampaignType::MessageCenter,
        }
        .to_params()
        .unwrap();
        assert_eq!(
            params.to_query_string(),
            "limit=50&offset=100&type=message_center"
        );
    }

    #[test]
    fn test_program_query_omits_empty_status() {
        let unset = ProgramQuery::default().to_params().unwrap();
        assert_eq!(unset.to_query_string(), "limit=200&offset=0");

        let blank = ProgramQuery::first_page(Some("  "), 200).to_params().unwrap();
        assert_eq!(blank.to_query_string(), "limit=200&offset=0");

        let running = ProgramQuery::first_page(Some("RUNNING"), 10)
            .to_params()
            .unwrap();
        assert_eq!(running.to_query_string(), "limit=10&offset=0&status=RUNNING");
    }

    #[test]
    fn test_limit_out_of_range() {
        let too_big = CampaignQuery {
            limit: 201,
            ..Default::default()
        };
        assert!(matches!(
            too_big.to_params(),
            Err(RsysApiError::InvalidRequest(_))
        ));

        let zero = ProgramQuery {
            limit: 0,
            ..Default::default()
        };
        assert!(zero.to_params().is_err());
    }

    #[test]
    fn test_values_are_encoded() {
        let params = QueryParams::new()
            .param("q", "a&b=c d")
            .param_opt::<u32>("missing", None);
        assert_eq!(params.to_query_string(), "q=a%26b%3Dc+d");
        assert_eq!(params.pairs().len(), 1);
    }

    #[test]
    fn test_apply_keeps_existing_query() {
        let mut url = Url::parse("https://api.example.com/rest/api/v1.3/campaigns?x=1").unwrap();
        QueryParams::new().param("limit", 5).apply(&mut url);
        assert_eq!(url.query(), Some("x=1&limit=5"));

        let mut bare = Url::parse("https://api.example.com/rest").unwrap();
        QueryParams::new().apply(&mut bare);
        assert_eq!(bare.as_str(), "https://api.example.com/rest");
    }
}
