use crate::storage::BucketTable;

/// Shared application state / 应用共享状态
///
/// Built once at startup; requests only read it.
pub struct AppState {
    pub buckets: BucketTable,
}

impl AppState {
    pub fn new(buckets: BucketTable) -> Self {
        Self { buckets }
    }
}
