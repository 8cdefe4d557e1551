use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;

use super::link::Link;
use super::page::Page;

/// Channel of a Responsys campaign, as accepted by the `type` query parameter
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CampaignType {
    #[default]
    Email,
    Push,
    MessageCenter,
    Sms,
    Mms,
}

impl CampaignType {
    /// Value sent on the wire
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Email => "email",
            Self::Push => "push",
            Self::MessageCenter => "message_center",
            Self::Sms => "sms",
            Self::Mms => "mms",
        }
    }
}

impl fmt::Display for CampaignType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CampaignType {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "email" => Ok(Self::Email),
            "push" => Ok(Self::Push),
            "message_center" | "messagecenter" => Ok(Self::MessageCenter),
            "sms" => Ok(Self::Sms),
            "mms" => Ok(Self::Mms),
            _ => Err(anyhow::anyhow!("Invalid campaign type: {s}")),
        }
    }
}

/// Campaign object and its properties.
///
/// Only the commonly used properties are typed; the rest of the record is
/// kept in `extra` so nothing returned by the API is dropped.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Campaign {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,

    pub name: String,

    /// Channel reported by the API (e.g. `EMAIL`)
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub campaign_type: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub folder_name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub purpose: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_date: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub modified_date: Option<String>,

    /// Related API operations for this campaign
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub links: Vec<Link>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// One page of `GET /campaigns`, sorted by campaign id ascending
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CampaignPage {
    #[serde(default)]
    pub campaigns: Vec<Campaign>,

    #[serde(default)]
    pub links: Vec<Link>,
}

impl Page for CampaignPage {
    type Item = Campaign;

    fn items(&self) -> &[Campaign] {
        &self.campaigns
    }

    fn links(&self) -> &[Link] {
        &self.links
    }

    fn absorb(&mut self, next: Self) {
        self.campaigns.extend(next.campaigns);
        self.links = next.links;
    }
}
