use async_trait::async_trait;

use crate::core::Result;

pub const DEFAULT_PAGE_LIMIT: u32 = 20;
pub const MAX_PAGE_LIMIT: u32 = 100;

/// Window over a listing, already clamped to `1..=MAX_PAGE_LIMIT` rows
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    limit: u32,
    offset: u32,
}

impl Page {
    pub fn new(limit: Option<u32>, offset: Option<u32>) -> Self {
        Self {
            limit: limit.unwrap_or(DEFAULT_PAGE_LIMIT).clamp(1, MAX_PAGE_LIMIT),
            offset: offset.unwrap_or(0),
        }
    }

    pub fn limit(&self) -> u32 {
        self.limit
    }

    pub fn offset(&self) -> u32 {
        self.offset
    }
}

impl Default for Page {
    fn default() -> Self {
        Self::new(None, None)
    }
}

/// Storage for an entity FabricOps owns, keyed by `ID`.
///
/// Deleted entities must disappear from `find_by_id`, `list`, `update` and a
/// second `delete`; the latter two report `NotFound`.
#[async_trait]
pub trait Repository<T, ID>: Send + Sync {
    /// Persist a new entity, returning it with its assigned ID
    async fn create(&self, entity: T) -> Result<T>;

    async fn find_by_id(&self, id: ID) -> Result<Option<T>>;

    async fn update(&self, id: ID, entity: T) -> Result<T>;

    async fn delete(&self, id: ID) -> Result<()>;

    /// Live entities in ID order
    async fn list(&self, page: Page) -> Result<Vec<T>>;
}
