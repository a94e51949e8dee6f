//! HTTP client for the Neynar v2 API.

use std::time::Duration;

use serde::de::DeserializeOwned;
use tracing::debug;

use taskgate_types::{Fid, ScanOutcome, ScanWindow, WalletAddress};

use crate::error::NeynarError;
use crate::types::{
    BulkUsersResponse, Cast, CastsResponse, ConversationResponse, FollowingResponse, NeynarUser,
    ReactionsResponse,
};

/// Default timeout for Neynar requests.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Default connection timeout.
const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

/// Default Neynar API base URL.
const DEFAULT_BASE_URL: &str = "https://api.neynar.com";

/// Entries examined per follow/reaction scan before giving up.
pub const DEFAULT_COLLECTION_SCAN_CAP: usize = 100;

/// Recent casts examined per quote scan before giving up.
pub const DEFAULT_TIMELINE_SCAN_CAP: usize = 50;

/// Page size requested from collection endpoints (Neynar's maximum).
const COLLECTION_PAGE_LIMIT: usize = 100;

/// Page size requested from the user-casts feed.
const TIMELINE_PAGE_LIMIT: usize = 50;

/// Which reaction a cast-reaction scan is looking for.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ReactionKind {
    Like,
    Recast,
}

impl ReactionKind {
    /// Value of `reaction_type` in the reactions feed.
    fn wire_name(&self) -> &'static str {
        match self {
            ReactionKind::Like => "like",
            ReactionKind::Recast => "recast",
        }
    }

    /// Value for the `types` query parameter.
    fn query_name(&self) -> &'static str {
        match self {
            ReactionKind::Like => "likes",
            ReactionKind::Recast => "recasts",
        }
    }
}

/// Client for verifying Farcaster actions through Neynar.
pub struct NeynarClient {
    http_client: reqwest::Client,
    base_url: String,
    api_key: String,
    collection_scan_cap: usize,
    timeline_scan_cap: usize,
}

impl NeynarClient {
    /// Create a client against the public Neynar API.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self::with_base_url(api_key, DEFAULT_BASE_URL)
    }

    /// Create a client against a custom base URL (tests, proxies).
    pub fn with_base_url(api_key: impl Into<String>, base_url: impl Into<String>) -> Self {
        let http_client = reqwest::Client::builder()
            .timeout(DEFAULT_TIMEOUT)
            .connect_timeout(DEFAULT_CONNECT_TIMEOUT)
            .build()
            .unwrap_or_default();
        Self {
            http_client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
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

    /// Fetch a user's profile by fid.
    pub async fn user_by_fid(&self, fid: Fid) -> Result<NeynarUser, NeynarError> {
        let resp: BulkUsersResponse = self
            .get_json(&format!("/v2/farcaster/user/bulk?fids={fid}"))
            .await?;
        resp.users
            .into_iter()
            .find(|u| u.fid == fid.0)
            .ok_or(NeynarError::UnknownFid(fid.0))
    }

    /// All wallets associated with a fid: the custody address plus every
    /// verified eth address. Entries that are not valid EVM addresses are
    /// skipped.
    pub async fn linked_addresses(&self, fid: Fid) -> Result<Vec<WalletAddress>, NeynarError> {
        let user = self.user_by_fid(fid).await?;
        let mut addresses = Vec::new();
        if let Some(custody) = &user.custody_address {
            if let Ok(addr) = WalletAddress::parse(custody) {
                addresses.push(addr);
            }
        }
        for raw in &user.verified_addresses.eth_addresses {
            if let Ok(addr) = WalletAddress::parse(raw) {
                if !addresses.contains(&addr) {
                    addresses.push(addr);
                }
            }
        }
        Ok(addresses)
    }

    /// Does `fid` follow `target`? Scans the fid's following list.
    pub async fn verify_follow(&self, fid: Fid, target: Fid) -> Result<ScanOutcome, NeynarError> {
        let mut window = ScanWindow::new(self.collection_scan_cap);
        let mut cursor: Option<String> = None;
        loop {
            let mut path = format!(
                "/v2/farcaster/following?fid={fid}&limit={COLLECTION_PAGE_LIMIT}"
            );
            if let Some(c) = &cursor {
                path.push_str(&format!("&cursor={c}"));
            }
            let page: FollowingResponse = self
                .get_json(&path)
                .await
                .map_err(NeynarError::verifying("follow"))?;

            if let Some(outcome) = window.consume(
                &page.users,
                |entry| entry.user.fid == target.0,
                page.next.cursor.as_deref(),
            ) {
                debug!(fid = fid.0, target = target.0, scanned = window.scanned(), ?outcome,
                       "follow scan finished");
                return Ok(outcome);
            }
            cursor = page.next.cursor;
        }
    }

    /// Did `fid` leave the given reaction on `cast_hash`? Scans the cast's
    /// reaction feed of that kind.
    pub async fn verify_reaction(
        &self,
        kind: ReactionKind,
        fid: Fid,
        cast_hash: &str,
    ) -> Result<ScanOutcome, NeynarError> {
        let action = kind.wire_name();
        let mut window = ScanWindow::new(self.collection_scan_cap);
        let mut cursor: Option<String> = None;
        loop {
            let mut path = format!(
                "/v2/farcaster/reactions/cast?hash={cast_hash}&types={}&limit={COLLECTION_PAGE_LIMIT}",
                kind.query_name()
            );
            if let Some(c) = &cursor {
                path.push_str(&format!("&cursor={c}"));
            }
            let page: ReactionsResponse = self
                .get_json(&path)
                .await
                .map_err(NeynarError::verifying(action))?;

            if let Some(outcome) = window.consume(
                &page.reactions,
                |r| r.user.fid == fid.0 && r.reaction_type == action,
                page.next.cursor.as_deref(),
            ) {
                debug!(fid = fid.0, cast_hash, action, scanned = window.scanned(), ?outcome,
                       "reaction scan finished");
                return Ok(outcome);
            }
            cursor = page.next.cursor;
        }
    }

    /// Did `fid` quote `cast_hash`? Scans the fid's recent casts for one
    /// that references the target hash and carries its own text.
    pub async fn verify_quote(&self, fid: Fid, cast_hash: &str) -> Result<ScanOutcome, NeynarError> {
        let mut window = ScanWindow::new(self.timeline_scan_cap);
        let mut cursor: Option<String> = None;
        loop {
            let mut path = format!(
                "/v2/farcaster/feed/user/casts?fid={fid}&limit={TIMELINE_PAGE_LIMIT}"
            );
            if let Some(c) = &cursor {
                path.push_str(&format!("&cursor={c}"));
            }
            let page: CastsResponse = self
                .get_json(&path)
                .await
                .map_err(NeynarError::verifying("quote"))?;

            if let Some(outcome) = window.consume(
                &page.casts,
                |cast| {
                    cast.parent_hash.as_deref() == Some(cast_hash) && !cast.text.trim().is_empty()
                },
                page.next.cursor.as_deref(),
            ) {
                debug!(fid = fid.0, cast_hash, scanned = window.scanned(), ?outcome,
                       "quote scan finished");
                return Ok(outcome);
            }
            cursor = page.next.cursor;
        }
    }

    /// Did `fid` reply to `cast_hash`? Fetches the cast's conversation and
    /// walks the reply tree for a reply authored by the fid.
    pub async fn verify_comment(
        &self,
        fid: Fid,
        cast_hash: &str,
    ) -> Result<ScanOutcome, NeynarError> {
        let path = format!(
            "/v2/farcaster/cast/conversation?identifier={cast_hash}&type=hash&reply_depth=2"
        );
        let resp: ConversationResponse = self
            .get_json(&path)
            .await
            .map_err(NeynarError::verifying("comment"))?;

        let found = replies_contain_author(&resp.conversation.cast.direct_replies, fid.0);
        debug!(fid = fid.0, cast_hash, found, "comment lookup finished");
        if found {
            Ok(ScanOutcome::Confirmed)
        } else {
            Ok(ScanOutcome::NotFound)
        }
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, NeynarError> {
        let url = format!("{}{path}", self.base_url);
        let response = self
            .http_client
            .get(&url)
            .header("x-api-key", &self.api_key)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    NeynarError::Unreachable(format!("request timed out: {e}"))
                } else if e.is_connect() {
                    NeynarError::Unreachable(format!("connection failed: {e}"))
                } else {
                    NeynarError::RequestFailed(e.to_string())
                }
            })?;

        if !response.status().is_success() {
            return Err(NeynarError::RequestFailed(format!(
                "HTTP status {}",
                response.status()
            )));
        }

        response
            .json::<T>()
            .await
            .map_err(|e| NeynarError::InvalidResponse(format!("failed to parse response: {e}")))
    }
}

/// Depth-first search of a reply tree for any cast authored by `fid`.
fn replies_contain_author(replies: &[Cast], fid: u64) -> bool {
    replies
        .iter()
        .any(|r| r.author.fid == fid || replies_contain_author(&r.direct_replies, fid))
}
