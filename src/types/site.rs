//! Store records for ring members and their status posts.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::types::{SiteId, StatusId};

/// A member of the webring as stored in the `site` table.
///
/// `next` and `previous` are mutual inverses and, together, form a single
/// cycle spanning every site (valid or not). They are `None` only transiently,
/// inside the insert transaction, before the splice completes.
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, Deserialize)]
pub struct Site {
    pub id: SiteId,
    /// Normalized URL: any trailing slash is stripped before storage.
    pub url: String,
    pub email: String,
    /// Argon2id hash in PHC string format (salt embedded).
    pub password_hash: String,
    pub next: Option<SiteId>,
    pub previous: Option<SiteId>,
    /// Whether this site appears in traversal and listing output. Invalid
    /// sites stay physically linked in the cycle; traversal skips over them.
    pub valid: bool,
    /// Unix seconds.
    pub created_at: i64,
}

impl Site {
    /// Returns true if this site is its own neighbor in both directions,
    /// i.e. it is the sole member of the ring.
    pub fn is_self_looped(&self) -> bool {
        self.next == Some(self.id) && self.previous == Some(self.id)
    }
}

/// A status post, as stored in the `status` table. Append-only.
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, Deserialize)]
pub struct StatusRecord {
    pub id: StatusId,
    pub site: SiteId,
    pub status: String,
    /// Unix seconds.
    pub created_at: i64,
}
