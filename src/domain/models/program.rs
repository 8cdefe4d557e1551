use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::link::Link;
use super::page::Page;

/// Program orchestration and its metadata, draft or published
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Program {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,

    pub name: String,

    /// Program status (e.g. `RUNNING`, `DRAFT`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_date: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub modified_date: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub links: Vec<Link>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// One page of `GET /programs`, sorted by program id ascending
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProgramPage {
    #[serde(default)]
    pub programs: Vec<Program>,

    #[serde(default)]
    pub links: Vec<Link>,
}

impl Page for ProgramPage {
    type Item = Program;

    fn items(&self) -> &[Program] {
        &self.programs
    }

    fn links(&self) -> &[Link] {
        &self.links
    }

    fn absorb(&mut self, next: Self) {
        self.programs.extend(next.programs);
        self.links = next.links;
    }
}
