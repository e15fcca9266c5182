//! In-memory item store.
//! Owns item validation, field whitelisting and the list-query pipeline.

pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use logging::{default_log_level, init_logging, logging_status};
pub use model::fields::{AllowedFields, ItemField, ItemPatch};
pub use model::item::{Item, ItemId, ItemValidationError, ItemValidationErrors};
pub use repo::item_repo::{
    InMemoryItemRepository, ItemListQuery, ItemPage, ItemRepository, ListMeta, RepoError,
    RepoResult, SortDir, SortField, DEFAULT_PAGE, DEFAULT_PAGE_SIZE, STATUS_BAD_REQUEST,
    STATUS_CREATED, STATUS_INTERNAL_ERROR, STATUS_NOT_FOUND, STATUS_OK,
};
pub use service::item_service::{ItemResponse, ItemService, ResponseData};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
