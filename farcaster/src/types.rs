//! Wire types for the Neynar v2 API surface we consume.

use serde::Deserialize;

/// A Farcaster user profile as returned by `/v2/farcaster/user/bulk`.
#[derive(Clone, Debug, Deserialize)]
pub struct NeynarUser {
    pub fid: u64,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub pfp_url: Option<String>,
    #[serde(default)]
    pub follower_count: u64,
    #[serde(default)]
    pub following_count: u64,
    #[serde(default)]
    pub custody_address: Option<String>,
    #[serde(default)]
    pub verified_addresses: VerifiedAddresses,
}

/// Addresses the user has verified on-protocol.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct VerifiedAddresses {
    #[serde(default)]
    pub eth_addresses: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct BulkUsersResponse {
    pub users: Vec<NeynarUser>,
}

/// Cursor envelope used by every paginated Neynar endpoint.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct NextCursor {
    #[serde(default)]
    pub cursor: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct FollowingResponse {
    #[serde(default)]
    pub users: Vec<FollowEntry>,
    #[serde(default)]
    pub next: NextCursor,
}

/// The following feed wraps each followed user in an envelope object.
#[derive(Debug, Deserialize)]
pub(crate) struct FollowEntry {
    pub user: UserStub,
}

#[derive(Clone, Debug, Deserialize)]
pub(crate) struct UserStub {
    pub fid: u64,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ReactionsResponse {
    #[serde(default)]
    pub reactions: Vec<Reaction>,
    #[serde(default)]
    pub next: NextCursor,
}

#[derive(Debug, Deserialize)]
pub(crate) struct Reaction {
    pub reaction_type: String,
    pub user: UserStub,
}

#[derive(Debug, Deserialize)]
pub(crate) struct CastsResponse {
    #[serde(default)]
    pub casts: Vec<Cast>,
    #[serde(default)]
    pub next: NextCursor,
}

#[derive(Clone, Debug, Deserialize)]
pub(crate) struct Cast {
    #[serde(default)]
    pub parent_hash: Option<String>,
    #[serde(default)]
    pub text: String,
    pub author: UserStub,
    #[serde(default)]
    pub direct_replies: Vec<Cast>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ConversationResponse {
    pub conversation: Conversation,
}

#[derive(Debug, Deserialize)]
pub(crate) struct Conversation {
    pub cast: Cast,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_bulk_response_parses() {
        let json = r#"{
            "users": [{
                "fid": 1000,
                "username": "alice",
                "display_name": "Alice",
                "follower_count": 12,
                "following_count": 34,
                "custody_address": "0xAbCd000000000000000000000000000000001234",
                "verified_addresses": {
                    "eth_addresses": ["0x1111000000000000000000000000000000001111"],
                    "sol_addresses": []
                }
            }]
        }"#;
        let resp: BulkUsersResponse = serde_json::from_str(json).unwrap();
        assert_eq!(resp.users.len(), 1);
        let user = &resp.users[0];
        assert_eq!(user.fid, 1000);
        assert_eq!(user.verified_addresses.eth_addresses.len(), 1);
    }

    #[test]
    fn following_response_parses_with_cursor() {
        let json = r#"{
            "users": [{"object": "follow", "user": {"fid": 2000, "username": "bob"}}],
            "next": {"cursor": "eyJwYWdlIjoyfQ"}
        }"#;
        let resp: FollowingResponse = serde_json::from_str(json).unwrap();
        assert_eq!(resp.users[0].user.fid, 2000);
        assert_eq!(resp.next.cursor.as_deref(), Some("eyJwYWdlIjoyfQ"));
    }

    #[test]
    fn reactions_response_parses_with_null_cursor() {
        let json = r#"{
            "reactions": [{"reaction_type": "like", "user": {"fid": 7}}],
            "next": {"cursor": null}
        }"#;
        let resp: ReactionsResponse = serde_json::from_str(json).unwrap();
        assert_eq!(resp.reactions[0].reaction_type, "like");
        assert!(resp.next.cursor.is_none());
    }

    #[test]
    fn conversation_response_parses_nested_replies() {
        let json = r#"{
            "conversation": {
                "cast": {
                    "hash": "0xcast",
                    "text": "root",
                    "author": {"fid": 1},
                    "direct_replies": [
                        {"hash": "0xr1", "text": "gm", "author": {"fid": 1000},
                         "direct_replies": []}
                    ]
                }
            }
        }"#;
        let resp: ConversationResponse = serde_json::from_str(json).unwrap();
        assert_eq!(resp.conversation.cast.direct_replies.len(), 1);
        assert_eq!(resp.conversation.cast.direct_replies[0].author.fid, 1000);
    }

    #[test]
    fn missing_next_defaults_to_no_cursor() {
        let json = r#"{"casts": []}"#;
        let resp: CastsResponse = serde_json::from_str(json).unwrap();
        assert!(resp.casts.is_empty());
        assert!(resp.next.cursor.is_none());
    }
}
