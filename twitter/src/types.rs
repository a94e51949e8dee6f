//! Wire types for the Twitter API v2 surface we consume.

use serde::Deserialize;

/// Envelope every v2 list endpoint shares: `data` + `meta.next_token`.
#[derive(Debug, Deserialize)]
pub(crate) struct ListResponse<T> {
    #[serde(default)]
    pub data: Vec<T>,
    #[serde(default)]
    pub meta: ListMeta,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct ListMeta {
    #[serde(default)]
    pub next_token: Option<String>,
}

/// A user object from a followers/liking/retweeting list. Only the id
/// matters for membership checks; the rest of the object is ignored.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct UserEntry {
    pub id: String,
}

/// A tweet from a user timeline, with the references needed to recognize
/// quotes and replies.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct TweetEntry {
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub referenced_tweets: Vec<TweetReference>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct TweetReference {
    #[serde(rename = "type")]
    pub kind: String,
    pub id: String,
}

impl TweetEntry {
    /// Does this tweet reference `tweet_id` with the given relation
    /// (`"quoted"` or `"replied_to"`)?
    pub fn references(&self, kind: &str, tweet_id: &str) -> bool {
        self.referenced_tweets
            .iter()
            .any(|r| r.kind == kind && r.id == tweet_id)
    }
}
