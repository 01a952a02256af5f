// Match-lifecycle API seam

use futures::future::BoxFuture;

use super::types::{CreateMatch, MatchId, MatchRecord, UpdateMatch, UpdateMatchResponse};

/// The backend collaborator that owns match records and ratings
///
/// Calls are async so an HTTP client can sit behind the same trait as the
/// in-process ledger. Implementations must be shareable with the reporter
/// thread.
pub trait MatchApi: Send + Sync {
    /// Create a match record; fails if a player id is unknown
    fn create_match(&self, request: CreateMatch) -> BoxFuture<'_, anyhow::Result<MatchRecord>>;

    /// Store the final score and return updated ratings for human players
    fn update_match(
        &self,
        id: MatchId,
        request: UpdateMatch,
    ) -> BoxFuture<'_, anyhow::Result<UpdateMatchResponse>>;
}
