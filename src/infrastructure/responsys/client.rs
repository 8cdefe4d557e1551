use super::errors::RsysApiError;
use super::pagination::{resolve_next_url, PageGuard};
use super::query::{CampaignQuery, ProgramQuery, QueryParams};
use super::rate_limiter::TokenBucketRateLimiter;
use super::retry::RetryPolicy;
use crate::domain::models::{
    AuthSession, Campaign, CampaignPage, CampaignType, Config, LoginResponse, Page,
    ProgramPage, TOKEN_LIFETIME_SECS,
};
use crate::domain::ports::MarketingApi;
use crate::infrastructure::logging::{redact_token, SecretScrubber};
use async_trait::async_trait;
use chrono::Utc;
use futures::stream::{self, Stream, StreamExt, TryStreamExt};
use reqwest::{header, Client as ReqwestClient, RequestBuilder, Url};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tokio::sync::RwLock;
use tracing::{debug, info, instrument, warn};

/// Configuration for the Responsys HTTP client
#[derive(Debug, Clone)]
pub struct ResponsysClientConfig {
    /// Login host for the account's pod
    pub login_base_url: String,

    /// REST API version used in resource paths
    pub api_version: String,

    /// Request timeout in seconds
    pub request_timeout_secs: f64,

    /// Total attempts per API call
    pub times_to_try: u32,

    /// Wait after the first failed attempt in milliseconds
    pub initial_backoff_ms: u64,

    /// Maximum wait between attempts in milliseconds
    pub max_backoff_ms: u64,

    /// Status codes accepted as success
    pub target_status_codes: Vec<u16>,

    /// Rate limit in requests per second
    pub rate_limit_rps: f64,

    /// Requests allowed back to back
    pub burst_size: u32,

    /// Records requested per page when walking a whole listing
    pub page_size: u32,

    /// Stop following `next` links after this many pages
    pub max_pages: Option<u32>,

    /// Refresh the token automatically before it expires
    pub auto_refresh: bool,

    /// How long before expiry an automatic refresh happens, in seconds
    pub refresh_margin_secs: u64,
}

impl Default for ResponsysClientConfig {
    fn default() -> Self {
        Self::from(&Config::default())
    }
}

impl From<&Config> for ResponsysClientConfig {
    fn from(config: &Config) -> Self {
        Self {
            login_base_url: config.responsys.login_base_url.clone(),
            api_version: config.responsys.api_version.clone(),
            request_timeout_secs: config.request.request_timeout_secs,
            times_to_try: config.request.times_to_try,
            initial_backoff_ms: config.request.wait_before_next_attempt_ms,
            max_backoff_ms: config.request.max_wait_ms,
            target_status_codes: config.request.target_status_codes.clone(),
            rate_limit_rps: config.rate_limit.requests_per_second,
            burst_size: config.rate_limit.burst_size,
            page_size: config.pagination.page_size,
            max_pages: config.pagination.max_pages,
            auto_refresh: config.responsys.auto_refresh,
            refresh_margin_secs: config.responsys.refresh_margin_secs,
        }
    }
}

/// Where the next page of a listing comes from
enum Cursor {
    Start {
        resource: &'static str,
        params: QueryParams,
    },
    Next(String),
    Done,
}

/// HTTP client for the Responsys REST API
///
/// Holds the authenticated session (token and endpoint) obtained by
/// [`password_login`](Self::password_login) and applies it to every
/// following call. Each HTTP attempt goes through the rate limiter and the
/// try-request policy.
pub struct ResponsysClient {
    http_client: ReqwestClient,
    login_base_url: Url,
    base_resource_path: String,
    session: RwLock<Option<AuthSession>>,
    rate_limiter: TokenBucketRateLimiter,
    retry_policy: RetryPolicy,
    scrubber: SecretScrubber,
    page_size: u32,
    max_pages: Option<u32>,
    auto_refresh: bool,
    refresh_margin: chrono::Duration,
}

impl ResponsysClient {
    /// Create a new Responsys API client
    ///
    /// # Example
    /// ```no_run
    /// use rsys::infrastructure::responsys::{ResponsysClient, ResponsysClientConfig};
    ///
    /// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
    /// let client = ResponsysClient::new(ResponsysClientConfig::default())?;
    /// client.password_login("user", "secret").await?;
    /// let limits = client.get_throttle_limits().await?;
    /// println!("{limits}");
    /// # Ok(())
    /// # }
    /// ```
    pub fn new(config: ResponsysClientConfig) -> Result<Self, RsysApiError> {
        let login_base_url = Url::parse(config.login_base_url.trim()).map_err(|e| {
            RsysApiError::InvalidUrl(format!(
                "invalid login base URL '{}': {}",
                config.login_base_url, e
            ))
        })?;

        let timeout = Duration::try_from_secs_f64(config.request_timeout_secs)
            .ok()
            .filter(|t| !t.is_zero())
            .ok_or_else(|| {
                RsysApiError::InvalidRequest(format!(
                    "request timeout must be positive, got {}",
                    config.request_timeout_secs
                ))
            })?;

        info!(
            "Initializing Responsys client: login_base_url={}, api_version={}, rate_limit={} rps, timeout={:?}",
            login_base_url, config.api_version, config.rate_limit_rps, timeout
        );

        let http_client = ReqwestClient::builder()
            .pool_max_idle_per_host(10)
            .timeout(timeout)
            .tcp_nodelay(true)
            .user_agent(concat!("rsys/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(RsysApiError::NetworkError)?;

        Ok(Self {
            http_client,
            login_base_url,
            base_resource_path: format!("/rest/api/{}/", config.api_version.trim_matches('/')),
            session: RwLock::new(None),
            rate_limiter: TokenBucketRateLimiter::new(config.rate_limit_rps, config.burst_size),
            retry_policy: RetryPolicy::new(
                config.times_to_try,
                config.initial_backoff_ms,
                config.max_backoff_ms,
                config.target_status_codes,
            ),
            scrubber: SecretScrubber::new(),
            page_size: config.page_size,
            max_pages: config.max_pages,
            auto_refresh: config.auto_refresh,
            refresh_margin: chrono::Duration::seconds(
                i64::try_from(config.refresh_margin_secs)
                    .unwrap_or(TOKEN_LIFETIME_SECS)
                    .min(TOKEN_LIFETIME_SECS),
            ),
        })
    }

    // Authentication

    /// Authenticate with user name and password and store the session
    ///
    /// All other calls use the returned token and endpoint.
    #[instrument(skip(self, password))]
    pub async fn password_login(
        &self,
        user_name: &str,
        password: &str,
    ) -> Result<LoginResponse, RsysApiError> {
        info!("Logging in to Responsys");

        let url = self.auth_url()?;
        let form = [
            ("user_name", user_name),
            ("password", password),
            ("auth_type", "password"),
        ];

        let login: LoginResponse = self
            .send(|| self.http_client.post(url.clone()).form(&form))
            .await?;

        let session = self.open_session(login.clone())?;
        *self.session.write().await = Some(session);
        Ok(login)
    }

    /// Exchange the current token for a new one before it expires
    ///
    /// The session write lock is held for the whole exchange, so concurrent
    /// callers wait for the new token instead of reusing the old one.
    #[instrument(skip(self))]
    pub async fn refresh_token(&self) -> Result<LoginResponse, RsysApiError> {
        let mut guard = self.session.write().await;
        let current = guard.as_ref().ok_or(RsysApiError::NotAuthenticated)?;

        let refreshed = self.exchange_token(current.auth_token()).await?;
        let login = refreshed.login.clone();
        *guard = Some(refreshed);
        Ok(login)
    }

    /// Last stored authentication response
    pub async fn last_login_response(&self) -> Option<LoginResponse> {
        self.session.read().await.as_ref().map(|s| s.login.clone())
    }

    /// Token used for API requests
    pub async fn auth_token(&self) -> Option<String> {
        self.session
            .read()
            .await
            .as_ref()
            .map(|s| s.auth_token().to_string())
    }

    /// Endpoint obtained at login
    pub async fn endpoint(&self) -> Option<Url> {
        self.session.read().await.as_ref().map(|s| s.endpoint.clone())
    }

    /// Current session, if logged in
    pub async fn session(&self) -> Option<AuthSession> {
        self.session.read().await.clone()
    }

    // API throttle

    /// API throttling limits for the Responsys account
    #[instrument(skip(self))]
    pub async fn get_throttle_limits(&self) -> Result<serde_json::Value, RsysApiError> {
        let session = self.session_for_call().await?;
        let url = join_endpoint(&session.endpoint, "/rest/api/ratelimit")?;
        self.authorized_get(&session, url).await
    }

    // Campaigns

    /// Campaign object and its properties
    #[instrument(skip(self))]
    pub async fn fetch_campaign(&self, campaign_name: &str) -> Result<Campaign, RsysApiError> {
        if campaign_name.trim().is_empty() {
            return Err(RsysApiError::InvalidRequest(
                "campaign name cannot be empty".to_string(),
            ));
        }

        let session = self.session_for_call().await?;
        let mut url = self.resource_url(&session, "campaigns")?;
        url.path_segments_mut()
            .map_err(|()| RsysApiError::InvalidUrl("endpoint cannot have path segments".into()))?
            .pop_if_empty()
            .push(campaign_name);

        self.authorized_get(&session, url).await
    }

    /// One page of campaigns (at most 200), sorted by id ascending
    #[instrument(skip(self))]
    pub async fn fetch_campaigns(
        &self,
        query: &CampaignQuery,
    ) -> Result<CampaignPage, RsysApiError> {
        let params = query.to_params()?;
        self.fetch_first(Cursor::Start {
            resource: "campaigns",
            params,
        })
        .await
    }

    /// The page after `page`, or `None` on the last page
    pub async fn fetch_next_campaigns(
        &self,
        page: &CampaignPage,
    ) -> Result<Option<CampaignPage>, RsysApiError> {
        self.fetch_next(page).await
    }

    /// Stream of campaign pages, starting at `query` and following `next` links
    pub fn campaign_pages(
        &self,
        query: CampaignQuery,
    ) -> impl Stream<Item = Result<CampaignPage, RsysApiError>> + '_ {
        match query.to_params() {
            Ok(params) => self
                .page_stream(Cursor::Start {
                    resource: "campaigns",
                    params,
                })
                .left_stream(),
            Err(err) => stream::once(async move { Err(err) }).right_stream(),
        }
    }

    /// Every campaign of `campaign_type`, all pages merged
    #[instrument(skip(self))]
    pub async fn fetch_all_campaigns(
        &self,
        campaign_type: CampaignType,
    ) -> Result<CampaignPage, RsysApiError> {
        let query = CampaignQuery::first_page(campaign_type, self.page_size);
        let merged = collect_pages(self.campaign_pages(query)).await?;
        info!(campaigns = merged.len(), "Fetched all campaigns");
        Ok(merged)
    }

    // Programs

    /// One page of programs (at most 200), sorted by id ascending
    #[instrument(skip(self))]
    pub async fn fetch_programs(&self, query: &ProgramQuery) -> Result<ProgramPage, RsysApiError> {
        let params = query.to_params()?;
        self.fetch_first(Cursor::Start {
            resource: "programs",
            params,
        })
        .await
    }

    /// The page after `page`, or `None` on the last page
    pub async fn fetch_next_programs(
        &self,
        page: &ProgramPage,
    ) -> Result<Option<ProgramPage>, RsysApiError> {
        self.fetch_next(page).await
    }

    /// Stream of program pages, starting at `query` and following `next` links
    pub fn program_pages(
        &self,
        query: ProgramQuery,
    ) -> impl Stream<Item = Result<ProgramPage, RsysApiError>> + '_ {
        match query.to_params() {
            Ok(params) => self
                .page_stream(Cursor::Start {
                    resource: "programs",
                    params,
                })
                .left_stream(),
            Err(err) => stream::once(async move { Err(err) }).right_stream(),
        }
    }

    /// Every program, optionally filtered by status, all pages merged
    #[instrument(skip(self))]
    pub async fn fetch_all_programs(
        &self,
        status: Option<&str>,
    ) -> Result<ProgramPage, RsysApiError> {
        let query = ProgramQuery::first_page(status, self.page_size);
        let merged = collect_pages(self.program_pages(query)).await?;
        info!(programs = merged.len(), "Fetched all programs");
        Ok(merged)
    }

    // Internals

    fn auth_url(&self) -> Result<Url, RsysApiError> {
        join_endpoint(
            &self.login_base_url,
            &format!("{}auth/token", self.base_resource_path),
        )
    }

    fn resource_url(&self, session: &AuthSession, resource: &str) -> Result<Url, RsysApiError> {
        join_endpoint(
            &session.endpoint,
            &format!("{}{}", self.base_resource_path, resource),
        )
    }

    /// Trade `token` for a new session. Callers hold the session write lock.
    async fn exchange_token(&self, token: &str) -> Result<AuthSession, RsysApiError> {
        info!("Refreshing Responsys auth token");

        let url = self.auth_url()?;
        let form = [("auth_type", "token")];

        let login: LoginResponse = self
            .send(|| {
                self.http_client
                    .post(url.clone())
                    .header(header::AUTHORIZATION, token)
                    .form(&form)
            })
            .await?;

        self.open_session(login)
    }

    fn open_session(&self, login: LoginResponse) -> Result<AuthSession, RsysApiError> {
        let session =
            AuthSession::from_login(login, Utc::now()).map_err(RsysApiError::InvalidResponse)?;

        info!(
            "Authenticated: endpoint={}, token={}",
            session.endpoint,
            redact_token(session.auth_token())
        );
        if let Ok(raw) = serde_json::to_string(&session.login) {
            debug!("last_login_response = {}", self.scrubber.scrub_message(&raw));
        }

        Ok(session)
    }

    /// Current session for a data call, refreshed first when close to expiry
    async fn session_for_call(&self) -> Result<AuthSession, RsysApiError> {
        let session = self
            .session
            .read()
            .await
            .clone()
            .ok_or(RsysApiError::NotAuthenticated)?;

        if !self.auto_refresh || !session.needs_refresh(Utc::now(), self.refresh_margin) {
            return Ok(session);
        }

        let mut guard = self.session.write().await;
        let current = guard.as_ref().ok_or(RsysApiError::NotAuthenticated)?;

        // Someone else refreshed while this call waited for the lock
        if current.acquired_at != session.acquired_at
            || !current.needs_refresh(Utc::now(), self.refresh_margin)
        {
            return Ok(current.clone());
        }

        info!(
            "Auth token expires at {}, refreshing before the call",
            current.expires_at()
        );
        let refreshed = self.exchange_token(current.auth_token()).await?;
        *guard = Some(refreshed.clone());
        Ok(refreshed)
    }

    async fn fetch_first<P: Page>(&self, cursor: Cursor) -> Result<P, RsysApiError> {
        let session = self.session_for_call().await?;
        let url = self.cursor_url(&session, cursor)?;
        match url {
            Some(url) => self.authorized_get(&session, url).await,
            None => Ok(P::default()),
        }
    }

    async fn fetch_next<P: Page>(&self, page: &P) -> Result<Option<P>, RsysApiError> {
        let Some(href) = page.next_href() else {
            return Ok(None);
        };
        let session = self.session_for_call().await?;
        let url = resolve_next_url(&session.endpoint, href)?;
        self.authorized_get(&session, url).await.map(Some)
    }

    fn cursor_url(&self, session: &AuthSession, cursor: Cursor) -> Result<Option<Url>, RsysApiError> {
        match cursor {
            Cursor::Start { resource, params } => {
                let mut url = self.resource_url(session, resource)?;
                params.apply(&mut url);
                Ok(Some(url))
            }
            Cursor::Next(href) => resolve_next_url(&session.endpoint, &href).map(Some),
            Cursor::Done => Ok(None),
        }
    }

    fn page_stream<P: Page>(
        &self,
        start: Cursor,
    ) -> impl Stream<Item = Result<P, RsysApiError>> + '_ {
        let guard = PageGuard::new(self.max_pages);
        stream::try_unfold((start, guard), move |(cursor, guard)| {
            self.next_page(cursor, guard)
        })
    }

    async fn next_page<P: Page>(
        &self,
        cursor: Cursor,
        mut guard: PageGuard,
    ) -> Result<Option<(P, (Cursor, PageGuard))>, RsysApiError> {
        if matches!(cursor, Cursor::Done) {
            return Ok(None);
        }

        let session = self.session_for_call().await?;
        let Some(url) = self.cursor_url(&session, cursor)? else {
            return Ok(None);
        };
        if !guard.admit(&url)? {
            return Ok(None);
        }

        let page: P = self.authorized_get(&session, url).await?;
        let cursor = page
            .next_href()
            .map_or(Cursor::Done, |href| Cursor::Next(href.to_string()));

        Ok(Some((page, (cursor, guard))))
    }

    async fn authorized_get<T: DeserializeOwned>(
        &self,
        session: &AuthSession,
        url: Url,
    ) -> Result<T, RsysApiError> {
        debug!("GET {}", url);
        let token = session.auth_token();
        self.send(|| {
            self.http_client
                .get(url.clone())
                .header(header::AUTHORIZATION, token)
                .header(header::CONTENT_TYPE, "application/json")
        })
        .await
    }

    /// Run a request under the try-request policy and parse the JSON body
    async fn send<T, F>(&self, build: F) -> Result<T, RsysApiError>
    where
        T: DeserializeOwned,
        F: Fn() -> RequestBuilder,
    {
        let build = &build;
        let body = self
            .retry_policy
            .execute(move || self.attempt(build))
            .await?;

        serde_json::from_str(&body).map_err(|e| {
            RsysApiError::InvalidResponse(format!("unexpected response body: {e}"))
        })
    }

    /// A single attempt: rate limit, send, check the status against the targets
    async fn attempt<F>(&self, build: &F) -> Result<String, RsysApiError>
    where
        F: Fn() -> RequestBuilder,
    {
        self.rate_limiter.acquire().await;

        let response = build().send().await?;
        let status = response.status();
        debug!("Response status: {}", status);

        let body = response.text().await?;
        if self.retry_policy.accepts(status) {
            return Ok(body);
        }

        warn!(
            "Targeted status code was not returned: {} {}",
            status,
            self.scrubber.scrub_message(&body)
        );
        Err(RsysApiError::from_status(status, &body))
    }
}

fn join_endpoint(base: &Url, path: &str) -> Result<Url, RsysApiError> {
    base.join(path)
        .map_err(|e| RsysApiError::InvalidUrl(format!("cannot join '{path}' onto {base}: {e}")))
}

/// Merge a stream of pages into one page holding every record
async fn collect_pages<P, S>(pages: S) -> Result<P, RsysApiError>
where
    P: Page,
    S: Stream<Item = Result<P, RsysApiError>>,
{
    let merged = pages
        .try_fold(None::<P>, |acc, page| async move {
            Ok::<_, RsysApiError>(Some(match acc {
                Some(mut merged) => {
                    merged.absorb(page);
                    merged
                }
                None => page,
            }))
        })
        .await?;

    Ok(merged.unwrap_or_default())
}

#[async_trait]
impl MarketingApi for ResponsysClient {
    async fn throttle_limits(&self) -> anyhow::Result<serde_json::Value> {
        Ok(self.get_throttle_limits().await?)
    }

    async fn all_campaigns(&self, campaign_type: CampaignType) -> anyhow::Result<CampaignPage> {
        Ok(self.fetch_all_campaigns(campaign_type).await?)
    }

    async fn all_programs(&self, status: Option<&str>) -> anyhow::Result<ProgramPage> {
        Ok(self.fetch_all_programs(status).await?)
    }
}
