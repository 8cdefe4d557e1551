pub mod auth;
pub mod campaign;
pub mod config;
pub mod link;
pub mod page;
pub mod program;

pub use auth::{AuthSession, LoginResponse, TOKEN_LIFETIME_SECS};
pub use campaign::{Campaign, CampaignPage, CampaignType};
pub use config::{
    Config, LoggingConfig, PaginationConfig, RateLimitConfig, RequestConfig, ResponsysConfig,
};
pub use link::{next_href, Link, REL_NEXT};
pub use page::Page;
pub use program::{Program, ProgramPage};
