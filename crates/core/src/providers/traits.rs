use async_trait::async_trait;

use crate::errors::CoreError;
use crate::models::query::{MovementFilter, MovementPage};

/// Where a user's raw movements come from (database, API, fixture).
///
/// Implementations own ownership checks, date filtering and ordering; the
/// metrics engine only ever sees the finished page.
#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
pub trait MovementSource: Send + Sync {
    /// Human-readable name of this source (for logs/errors).
    fn name(&self) -> &str;

    /// List one user's movements matching `filter`.
    ///
    /// Date bounds are inclusive. With `filter.limit == 0` everything is
    /// returned on a single page.
    async fn fetch_movements(
        &self,
        user_id: i64,
        filter: &MovementFilter,
    ) -> Result<MovementPage, CoreError>;
}
