//! A fully-validated verification request.
//!
//! The HTTP layer builds these after field validation; by the time a
//! request reaches the orchestrator every identifier has parsed.

use taskgate_types::{Fid, Platform, TaskId, TwitterUserId, WalletAddress};

/// The social action a task requires, with its platform-specific
/// parameters.
#[derive(Clone, Debug)]
pub enum SocialAction {
    Farcaster {
        fid: Fid,
        action: FarcasterActionSpec,
    },
    Twitter {
        user_id: TwitterUserId,
        action: TwitterActionSpec,
    },
}

#[derive(Clone, Debug)]
pub enum FarcasterActionSpec {
    Follow { target_fid: Fid },
    Like { cast_hash: String },
    Recast { cast_hash: String },
    Quote { cast_hash: String },
    Comment { cast_hash: String },
}

#[derive(Clone, Debug)]
pub enum TwitterActionSpec {
    Follow { target_user_id: TwitterUserId },
    Like { tweet_id: String },
    Retweet { tweet_id: String },
    Quote { tweet_id: String },
    Comment { tweet_id: String },
}

impl SocialAction {
    pub fn platform(&self) -> Platform {
        match self {
            SocialAction::Farcaster { .. } => Platform::Farcaster,
            SocialAction::Twitter { .. } => Platform::Twitter,
        }
    }

    /// Short "platform action" label used in rejection messages and logs.
    pub fn describe(&self) -> String {
        match self {
            SocialAction::Farcaster { action, .. } => {
                format!("farcaster {}", action.name())
            }
            SocialAction::Twitter { action, .. } => {
                format!("twitter {}", action.name())
            }
        }
    }
}

impl FarcasterActionSpec {
    pub fn name(&self) -> &'static str {
        match self {
            FarcasterActionSpec::Follow { .. } => "follow",
            FarcasterActionSpec::Like { .. } => "like",
            FarcasterActionSpec::Recast { .. } => "recast",
            FarcasterActionSpec::Quote { .. } => "quote",
            FarcasterActionSpec::Comment { .. } => "comment",
        }
    }
}

impl TwitterActionSpec {
    pub fn name(&self) -> &'static str {
        match self {
            TwitterActionSpec::Follow { .. } => "follow",
            TwitterActionSpec::Like { .. } => "like",
            TwitterActionSpec::Retweet { .. } => "retweet",
            TwitterActionSpec::Quote { .. } => "quote",
            TwitterActionSpec::Comment { .. } => "comment",
        }
    }
}

/// One claimed action, bound to the wallet and task it should unlock.
#[derive(Clone, Debug)]
pub struct VerifyRequest {
    pub user_address: WalletAddress,
    pub task_id: TaskId,
    pub action: SocialAction,
}
