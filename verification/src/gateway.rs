//! Seams between the orchestrator and the outside world.
//!
//! The orchestrator depends only on these traits; production wiring
//! implements them over the Neynar client, the Twitter client, and the
//! EVM task marker, while tests substitute deterministic mocks.

use async_trait::async_trait;
use serde::Serialize;

use taskgate_chain::{EvmTaskMarker, MarkReceipt};
use taskgate_farcaster::{NeynarClient, ReactionKind};
use taskgate_twitter::TwitterClient;
use taskgate_types::{Fid, ScanOutcome, TaskId, TwitterUserId, WalletAddress};

use crate::error::VerificationError;
use crate::request::{FarcasterActionSpec, TwitterActionSpec};

/// Farcaster profile summary served by the user-proxy route.
#[derive(Clone, Debug, Serialize)]
pub struct FarcasterProfile {
    pub fid: u64,
    pub username: Option<String>,
    pub display_name: Option<String>,
    pub pfp_url: Option<String>,
    pub follower_count: u64,
    pub following_count: u64,
    pub custody_address: Option<String>,
    pub verified_addresses: Vec<String>,
}

/// Farcaster-side questions the orchestrator asks.
#[async_trait]
pub trait FarcasterGateway: Send + Sync {
    /// Custody plus verified wallets for a fid, normalized.
    async fn linked_addresses(&self, fid: Fid) -> Result<Vec<WalletAddress>, VerificationError>;

    /// Did the fid perform the action?
    async fn verify_action(
        &self,
        fid: Fid,
        action: &FarcasterActionSpec,
    ) -> Result<ScanOutcome, VerificationError>;

    /// Profile lookup for the proxy route.
    async fn user_profile(&self, fid: Fid) -> Result<FarcasterProfile, VerificationError>;
}

/// Twitter-side questions the orchestrator asks.
#[async_trait]
pub trait TwitterGateway: Send + Sync {
    /// Did the user perform the action?
    async fn verify_action(
        &self,
        user_id: &TwitterUserId,
        action: &TwitterActionSpec,
    ) -> Result<ScanOutcome, VerificationError>;

    /// Is there a recent tweet containing both the wallet and the code?
    async fn find_proof_tweet(
        &self,
        user_id: &TwitterUserId,
        wallet: &WalletAddress,
        verification_code: &str,
    ) -> Result<ScanOutcome, VerificationError>;
}

/// The on-chain write the orchestrator performs on success.
#[async_trait]
pub trait TaskMarker: Send + Sync {
    async fn mark_task_verified(
        &self,
        user: &WalletAddress,
        task: TaskId,
    ) -> Result<MarkReceipt, VerificationError>;
}

#[async_trait]
impl FarcasterGateway for NeynarClient {
    async fn linked_addresses(&self, fid: Fid) -> Result<Vec<WalletAddress>, VerificationError> {
        Ok(NeynarClient::linked_addresses(self, fid).await?)
    }

    async fn verify_action(
        &self,
        fid: Fid,
        action: &FarcasterActionSpec,
    ) -> Result<ScanOutcome, VerificationError> {
        let outcome = match action {
            FarcasterActionSpec::Follow { target_fid } => {
                self.verify_follow(fid, *target_fid).await?
            }
            FarcasterActionSpec::Like { cast_hash } => {
                self.verify_reaction(ReactionKind::Like, fid, cast_hash).await?
            }
            FarcasterActionSpec::Recast { cast_hash } => {
                self.verify_reaction(ReactionKind::Recast, fid, cast_hash).await?
            }
            FarcasterActionSpec::Quote { cast_hash } => self.verify_quote(fid, cast_hash).await?,
            FarcasterActionSpec::Comment { cast_hash } => {
                self.verify_comment(fid, cast_hash).await?
            }
        };
        Ok(outcome)
    }

    async fn user_profile(&self, fid: Fid) -> Result<FarcasterProfile, VerificationError> {
        let user = self.user_by_fid(fid).await?;
        Ok(FarcasterProfile {
            fid: user.fid,
            username: user.username,
            display_name: user.display_name,
            pfp_url: user.pfp_url,
            follower_count: user.follower_count,
            following_count: user.following_count,
            custody_address: user.custody_address,
            verified_addresses: user.verified_addresses.eth_addresses,
        })
    }
}

#[async_trait]
impl TwitterGateway for TwitterClient {
    async fn verify_action(
        &self,
        user_id: &TwitterUserId,
        action: &TwitterActionSpec,
    ) -> Result<ScanOutcome, VerificationError> {
        let outcome = match action {
            TwitterActionSpec::Follow { target_user_id } => {
                self.verify_follow(user_id, target_user_id).await?
            }
            TwitterActionSpec::Like { tweet_id } => self.verify_like(user_id, tweet_id).await?,
            TwitterActionSpec::Retweet { tweet_id } => {
                self.verify_retweet(user_id, tweet_id).await?
            }
            TwitterActionSpec::Quote { tweet_id } => self.verify_quote(user_id, tweet_id).await?,
            TwitterActionSpec::Comment { tweet_id } => {
                self.verify_comment(user_id, tweet_id).await?
            }
        };
        Ok(outcome)
    }

    async fn find_proof_tweet(
        &self,
        user_id: &TwitterUserId,
        wallet: &WalletAddress,
        verification_code: &str,
    ) -> Result<ScanOutcome, VerificationError> {
        Ok(TwitterClient::find_proof_tweet(self, user_id, wallet, verification_code).await?)
    }
}

#[async_trait]
impl TaskMarker for EvmTaskMarker {
    async fn mark_task_verified(
        &self,
        user: &WalletAddress,
        task: TaskId,
    ) -> Result<MarkReceipt, VerificationError> {
        EvmTaskMarker::mark_task_verified(self, user, task)
            .await
            .map_err(VerificationError::from)
    }
}
