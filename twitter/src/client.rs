//! HTTP client for the Twitter API v2, bearer-token authenticated.

use std::time::Duration;

use serde::de::DeserializeOwned;
use tracing::debug;

use taskgate_types::{ScanOutcome, ScanWindow, TwitterUserId, WalletAddress};

use crate::error::TwitterError;
use crate::types::{ListResponse, TweetEntry, UserEntry};

/// Default timeout for Twitter requests.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Default connection timeout.
const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

/// Default Twitter API base URL.
const DEFAULT_BASE_URL: &str = "https://api.twitter.com";

/// Entries examined per follower/liker/retweeter scan before giving up.
pub const DEFAULT_COLLECTION_SCAN_CAP: usize = 100;

/// Recent tweets examined per quote/reply/proof scan before giving up.
pub const DEFAULT_TIMELINE_SCAN_CAP: usize = 50;

/// Page size for list endpoints (the v2 maximum).
const COLLECTION_PAGE_LIMIT: usize = 100;

/// Page size for timeline reads.
const TIMELINE_PAGE_LIMIT: usize = 50;

/// Client for verifying Twitter actions.
pub struct TwitterClient {
    http_client: reqwest::Client,
    base_url: String,
    bearer_token: String,
    collection_scan_cap: usize,
    timeline_scan_cap: usize,
}

impl TwitterClient {
    /// Create a client against the public Twitter API.
    pub fn new(bearer_token: impl Into<String>) -> Self {
        Self::with_base_url(bearer_token, DEFAULT_BASE_URL)
    }

    /// Create a client against a custom base URL (tests, proxies).
    pub fn with_base_url(bearer_token: impl Into<String>, base_url: impl Into<String>) -> Self {
        let http_client = reqwest::Client::builder()
            .timeout(DEFAULT_TIMEOUT)
            .connect_timeout(DEFAULT_CONNECT_TIMEOUT)
            .build()
            .unwrap_or_default();
        Self {
            http_client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            bearer_token: bearer_token.into(),
            collection_scan_cap: DEFAULT_COLLECTION_SCAN_CAP,
            timeline_scan_cap: DEFAULT_TIMELINE_SCAN_CAP,
        }
    }

    /// Override the scan caps (entries examined before `Inconclusive`).
    pub fn with_scan_caps(mut self, collection: usize, timeline: usize) -> Self {
        self.collection_scan_cap = collection;
        self.timeline_scan_cap = timeline;
        self
    }

    /// Does `user_id` follow `target_user_id`? Scans the user's following list.
    pub async fn verify_follow(
        &self,
        user_id: &TwitterUserId,
        target_user_id: &TwitterUserId,
    ) -> Result<ScanOutcome, TwitterError> {
        let path = format!("/2/users/{user_id}/following");
        self.scan_users(&path, target_user_id, "follow").await
    }

    /// Did `user_id` like `tweet_id`? Scans the tweet's liking users.
    pub async fn verify_like(
        &self,
        user_id: &TwitterUserId,
        tweet_id: &str,
    ) -> Result<ScanOutcome, TwitterError> {
        let path = format!("/2/tweets/{tweet_id}/liking_users");
        self.scan_users(&path, user_id, "like").await
    }

    /// Did `user_id` retweet `tweet_id`? Scans the tweet's retweeters.
    pub async fn verify_retweet(
        &self,
        user_id: &TwitterUserId,
        tweet_id: &str,
    ) -> Result<ScanOutcome, TwitterError> {
        let path = format!("/2/tweets/{tweet_id}/retweeted_by");
        self.scan_users(&path, user_id, "retweet").await
    }

    /// Did `user_id` quote `tweet_id`? Scans the user's recent timeline.
    pub async fn verify_quote(
        &self,
        user_id: &TwitterUserId,
        tweet_id: &str,
    ) -> Result<ScanOutcome, TwitterError> {
        self.scan_timeline(user_id, "quote", |tweet| {
            tweet.references("quoted", tweet_id)
        })
        .await
    }

    /// Did `user_id` reply to `tweet_id`? Scans the user's recent timeline.
    pub async fn verify_comment(
        &self,
        user_id: &TwitterUserId,
        tweet_id: &str,
    ) -> Result<ScanOutcome, TwitterError> {
        self.scan_timeline(user_id, "comment", |tweet| {
            tweet.references("replied_to", tweet_id)
        })
        .await
    }

    /// Look for a proof tweet in the user's recent timeline: one whose text
    /// contains both the wallet address (case-insensitively) and the
    /// one-time verification code.
    pub async fn find_proof_tweet(
        &self,
        user_id: &TwitterUserId,
        wallet: &WalletAddress,
        verification_code: &str,
    ) -> Result<ScanOutcome, TwitterError> {
        let wallet_needle = wallet.as_str().to_lowercase();
        self.scan_timeline(user_id, "link proof", move |tweet| {
            let text = tweet.text.to_lowercase();
            text.contains(&wallet_needle) && tweet.text.contains(verification_code)
        })
        .await
    }

    /// Capped cursor scan over a user-list endpoint, looking for `needle`.
    async fn scan_users(
        &self,
        path: &str,
        needle: &TwitterUserId,
        action: &'static str,
    ) -> Result<ScanOutcome, TwitterError> {
        let mut window = ScanWindow::new(self.collection_scan_cap);
        let mut token: Option<String> = None;
        loop {
            let mut url = format!("{path}?max_results={COLLECTION_PAGE_LIMIT}");
            if let Some(t) = &token {
                url.push_str(&format!("&pagination_token={t}"));
            }
            let page: ListResponse<UserEntry> = self
                .get_json(&url)
                .await
                .map_err(TwitterError::verifying(action))?;

            if let Some(outcome) = window.consume(
                &page.data,
                |user| user.id == needle.0,
                page.meta.next_token.as_deref(),
            ) {
                debug!(%needle, action, scanned = window.scanned(), ?outcome, "user scan finished");
                return Ok(outcome);
            }
            token = page.meta.next_token;
        }
    }

    /// Capped cursor scan over a user's recent tweets.
    async fn scan_timeline(
        &self,
        user_id: &TwitterUserId,
        action: &'static str,
        matches: impl Fn(&TweetEntry) -> bool,
    ) -> Result<ScanOutcome, TwitterError> {
        let mut window = ScanWindow::new(self.timeline_scan_cap);
        let mut token: Option<String> = None;
        loop {
            let mut url = format!(
                "/2/users/{user_id}/tweets?max_results={TIMELINE_PAGE_LIMIT}\
                 &tweet.fields=referenced_tweets"
            );
            if let Some(t) = &token {
                url.push_str(&format!("&pagination_token={t}"));
            }
            let page: ListResponse<TweetEntry> = self
                .get_json(&url)
                .await
                .map_err(TwitterError::verifying(action))?;

            if let Some(outcome) =
                window.consume(&page.data, &matches, page.meta.next_token.as_deref())
            {
                debug!(user = %user_id, action, scanned = window.scanned(), ?outcome,
                       "timeline scan finished");
                return Ok(outcome);
            }
            token = page.meta.next_token;
        }
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, TwitterError> {
        let url = format!("{}{path}", self.base_url);
        let response = self
            .http_client
            .get(&url)
            .bearer_auth(&self.bearer_token)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    TwitterError::Unreachable(format!("request timed out: {e}"))
                } else if e.is_connect() {
                    TwitterError::Unreachable(format!("connection failed: {e}"))
                } else {
                    TwitterError::RequestFailed(e.to_string())
                }
            })?;

        if !response.status().is_success() {
            return Err(TwitterError::RequestFailed(format!(
                "HTTP status {}",
                response.status()
            )));
        }

        response
            .json::<T>()
            .await
            .map_err(|e| TwitterError::InvalidResponse(format!("failed to parse response: {e}")))
    }
}
