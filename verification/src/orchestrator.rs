//! `verify_and_mark_task` — the end-to-end verification workflow.

use std::sync::Arc;

use tracing::{info, warn};

use taskgate_store::{LinkageStore, VerificationRecord, VerificationStore};
use taskgate_types::{Fid, ScanOutcome, TwitterUserId, WalletAddress};
use taskgate_utils::unix_timestamp_secs;

use crate::error::VerificationError;
use crate::gateway::{FarcasterGateway, FarcasterProfile, TaskMarker, TwitterGateway};
use crate::request::{SocialAction, VerifyRequest};

/// Why a request was rejected without an on-chain write.
///
/// These are expected outcomes, distinct from [`VerificationError`]s; the
/// HTTP layer turns them into structured `success:false` payloads rather
/// than error status codes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum VerifyFailure {
    /// The (wallet, task) pair already succeeded in this store's lifetime.
    AlreadyVerified,
    /// The claimed wallet is not associated with the claimed social identity.
    NotLinked {
        detail: String,
        /// True when the caller can fix this by running the linking flow
        /// (Twitter); false for Farcaster, where linkage is on-protocol.
        requires_linkage: bool,
    },
    /// The collection was scanned to exhaustion and the action is not there.
    ActionNotPerformed { action: String },
    /// The scan cap was hit first: the action may exist beyond the window.
    Inconclusive { action: String, scanned: usize },
}

impl VerifyFailure {
    /// Human-readable error string for the wire contract.
    pub fn message(&self) -> String {
        match self {
            VerifyFailure::AlreadyVerified => "Task already verified".to_string(),
            VerifyFailure::NotLinked { detail, .. } => detail.clone(),
            VerifyFailure::ActionNotPerformed { action } => {
                format!("{action} not verified")
            }
            VerifyFailure::Inconclusive { action, scanned } => format!(
                "{action} inconclusive: not found within the first {scanned} entries"
            ),
        }
    }

    pub fn requires_linkage(&self) -> bool {
        matches!(
            self,
            VerifyFailure::NotLinked {
                requires_linkage: true,
                ..
            }
        )
    }
}

/// Outcome of `verify_and_mark_task`.
#[derive(Clone, Debug)]
pub enum VerifyResult {
    /// Action confirmed and marked on-chain.
    Verified { tx_hash: String, block_number: u64 },
    /// Structured rejection; nothing was written anywhere.
    Rejected(VerifyFailure),
}

/// Outcome of the Twitter linking flow.
#[derive(Clone, Debug)]
pub enum LinkResult {
    /// Proof tweet found; linkage recorded.
    Linked,
    /// Proof tweet not found (or beyond the scanned window).
    Rejected(VerifyFailure),
}

/// Ties the stores, the platform gateways, and the on-chain marker into
/// the single linear per-request flow: idempotence check, linkage check,
/// action verification, chain write, record.
pub struct Orchestrator {
    verifications: Arc<dyn VerificationStore>,
    linkages: Arc<dyn LinkageStore>,
    farcaster: Arc<dyn FarcasterGateway>,
    twitter: Arc<dyn TwitterGateway>,
    marker: Arc<dyn TaskMarker>,
}

impl Orchestrator {
    pub fn new(
        verifications: Arc<dyn VerificationStore>,
        linkages: Arc<dyn LinkageStore>,
        farcaster: Arc<dyn FarcasterGateway>,
        twitter: Arc<dyn TwitterGateway>,
        marker: Arc<dyn TaskMarker>,
    ) -> Self {
        Self {
            verifications,
            linkages,
            farcaster,
            twitter,
            marker,
        }
    }

    /// Run the full verification pipeline for one claimed action.
    ///
    /// The idempotence check consults only the injected store, never the
    /// contract: after a store wipe a previously verified task will reach
    /// the chain again and the contract must reject the duplicate.
    pub async fn verify_and_mark_task(
        &self,
        request: &VerifyRequest,
    ) -> Result<VerifyResult, VerificationError> {
        let wallet = &request.user_address;
        let task = request.task_id;

        if let Some(record) = self.verifications.get(wallet, task)? {
            if record.verified {
                info!(%wallet, %task, "repeat verification short-circuited");
                return Ok(VerifyResult::Rejected(VerifyFailure::AlreadyVerified));
            }
        }

        if let Some(failure) = self.check_linkage(wallet, &request.action).await? {
            warn!(%wallet, %task, error = %failure.message(), "linkage check rejected");
            return Ok(VerifyResult::Rejected(failure));
        }

        let outcome = match &request.action {
            SocialAction::Farcaster { fid, action } => {
                self.farcaster.verify_action(*fid, action).await?
            }
            SocialAction::Twitter { user_id, action } => {
                self.twitter.verify_action(user_id, action).await?
            }
        };

        let action = request.action.describe();
        match outcome {
            ScanOutcome::Confirmed => {}
            ScanOutcome::NotFound => {
                info!(%wallet, %task, %action, "action not performed");
                return Ok(VerifyResult::Rejected(VerifyFailure::ActionNotPerformed {
                    action,
                }));
            }
            ScanOutcome::Inconclusive { scanned } => {
                info!(%wallet, %task, %action, scanned, "scan inconclusive");
                return Ok(VerifyResult::Rejected(VerifyFailure::Inconclusive {
                    action,
                    scanned,
                }));
            }
        }

        let receipt = self.marker.mark_task_verified(wallet, task).await?;

        self.verifications.put(
            wallet,
            task,
            VerificationRecord {
                verified: true,
                tx_hash: receipt.tx_hash.clone(),
                verified_at_secs: unix_timestamp_secs(),
            },
        )?;

        info!(%wallet, %task, %action, tx = %receipt.tx_hash, "task verified and marked");
        Ok(VerifyResult::Verified {
            tx_hash: receipt.tx_hash,
            block_number: receipt.block_number,
        })
    }

    /// Link a Twitter account to a wallet via the proof-tweet flow: the
    /// user must have tweeted both the wallet address and the one-time
    /// code from their account.
    pub async fn link_twitter(
        &self,
        user_id: &TwitterUserId,
        wallet: &WalletAddress,
        verification_code: &str,
    ) -> Result<LinkResult, VerificationError> {
        let outcome = self
            .twitter
            .find_proof_tweet(user_id, wallet, verification_code)
            .await?;

        match outcome {
            ScanOutcome::Confirmed => {
                self.linkages.put(user_id, wallet.clone())?;
                info!(user = %user_id, %wallet, "twitter account linked");
                Ok(LinkResult::Linked)
            }
            ScanOutcome::NotFound => {
                Ok(LinkResult::Rejected(VerifyFailure::ActionNotPerformed {
                    action: "proof tweet".to_string(),
                }))
            }
            ScanOutcome::Inconclusive { scanned } => {
                Ok(LinkResult::Rejected(VerifyFailure::Inconclusive {
                    action: "proof tweet".to_string(),
                    scanned,
                }))
            }
        }
    }

    /// Profile proxy for the frontend.
    pub async fn farcaster_profile(
        &self,
        fid: Fid,
    ) -> Result<FarcasterProfile, VerificationError> {
        self.farcaster.user_profile(fid).await
    }

    async fn check_linkage(
        &self,
        wallet: &WalletAddress,
        action: &SocialAction,
    ) -> Result<Option<VerifyFailure>, VerificationError> {
        match action {
            SocialAction::Farcaster { fid, .. } => {
                let linked = self.farcaster.linked_addresses(*fid).await?;
                if linked.contains(wallet) {
                    Ok(None)
                } else {
                    Ok(Some(VerifyFailure::NotLinked {
                        detail: format!(
                            "wallet {wallet} is not a custody or verified address of fid {fid}"
                        ),
                        requires_linkage: false,
                    }))
                }
            }
            SocialAction::Twitter { user_id, .. } => match self.linkages.get(user_id)? {
                None => Ok(Some(VerifyFailure::NotLinked {
                    detail: format!("no wallet linked to twitter user {user_id}"),
                    requires_linkage: true,
                })),
                Some(linked) if &linked != wallet => Ok(Some(VerifyFailure::NotLinked {
                    detail: format!(
                        "twitter user {user_id} is linked to a different wallet"
                    ),
                    requires_linkage: true,
                })),
                Some(_) => Ok(None),
            },
        }
    }
}
