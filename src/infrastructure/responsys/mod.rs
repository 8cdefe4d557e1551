pub mod client;
pub mod errors;
pub mod pagination;
pub mod query;
pub mod rate_limiter;
pub mod retry;

pub use client::{ResponsysClient, ResponsysClientConfig};
pub use errors::RsysApiError;
pub use pagination::{resolve_next_url, PageGuard};
pub use query::{CampaignQuery, ProgramQuery, QueryParams, MAX_PAGE_SIZE};
pub use rate_limiter::TokenBucketRateLimiter;
pub use retry::RetryPolicy;
