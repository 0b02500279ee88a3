//! Valid-neighbor traversal over the ring.
//!
//! Starting from a given site, the walk steps along `next` (or `previous`)
//! links until it meets a valid site. An invalid neighbor does not end the
//! walk; the walk continues *from that neighbor*, so the result for a ring
//! A -> B -> C with B invalid is C.
//!
//! The walk is iterative and carries a step bound equal to the ring size.
//! A ring whose members are all invalid is a genuine cycle with no valid
//! node; without the bound the walk would never terminate.

use sqlx::sqlite::SqlitePool;
use tracing::debug;

use super::RingError;
use crate::store;
use crate::types::{Site, SiteId};

/// Which neighbor link a walk follows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Direction {
    Forward,
    Backward,
}

impl Direction {
    fn neighbor(self, site: &Site) -> Option<SiteId> {
        match self {
            Direction::Forward => site.next,
            Direction::Backward => site.previous,
        }
    }
}

/// Finds the first valid site reached by following `next` links from
/// `start`.
///
/// Returns `None` if `start` does not exist, a link points at a missing row,
/// a link is unset, or a full lap of the ring finds no valid site. A valid
/// `start` is itself a legitimate result once the walk wraps all the way
/// around.
pub async fn find_next_valid(
    pool: &SqlitePool,
    start: SiteId,
) -> Result<Option<Site>, RingError> {
    walk(pool, start, Direction::Forward).await
}

/// Symmetric to [`find_next_valid`], following `previous` links.
pub async fn find_previous_valid(
    pool: &SqlitePool,
    start: SiteId,
) -> Result<Option<Site>, RingError> {
    walk(pool, start, Direction::Backward).await
}

async fn walk(
    pool: &SqlitePool,
    start: SiteId,
    direction: Direction,
) -> Result<Option<Site>, RingError> {
    // One step per ring member covers the whole cycle from any start.
    let bound = store::ring_len(pool).await?;

    let Some(mut current) = store::site_by_id(pool, start).await? else {
        return Ok(None);
    };

    for _ in 0..bound {
        let Some(neighbor_id) = direction.neighbor(&current) else {
            return Ok(None);
        };
        let Some(neighbor) = store::site_by_id(pool, neighbor_id).await? else {
            return Ok(None);
        };
        if neighbor.valid {
            return Ok(Some(neighbor));
        }
        current = neighbor;
    }

    debug!(start = %start, ?direction, "traversal exhausted ring without a valid site");
    Ok(None)
}
