//! Item use-case service.
//!
//! # Responsibility
//! - Expose the create/list/get/update/delete/soft-delete/reset API.
//! - Report every outcome as an `ItemResponse` instead of an error.
//!
//! # Invariants
//! - Callers must check `ok` before reading `data`.
//! - Status codes are informational (201/200/400/404/500); no transport is bound.

use crate::model::fields::{AllowedFields, ItemPatch};
use crate::model::item::Item;
use crate::repo::item_repo::{
    ItemListQuery, ItemRepository, ListMeta, RepoError, RepoResult, STATUS_CREATED, STATUS_OK,
};
use serde::Serialize;
use serde_json::Value;

/// Payload carried by a successful response.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ResponseData {
    Item(Item),
    Items(Vec<Item>),
}

/// Result envelope returned by every service call.
///
/// Serializes to `{ ok, status, meta?, data?, errors?, error? }`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ItemResponse {
    pub ok: bool,
    pub status: u16,
    /// Present on list responses only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta: Option<ListMeta>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<ResponseData>,
    /// Validation messages (status 400).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<String>>,
    /// Single failure message (status 404 or 500).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ItemResponse {
    fn item(status: u16, item: Item) -> Self {
        Self {
            ok: true,
            status,
            meta: None,
            data: Some(ResponseData::Item(item)),
            errors: None,
            error: None,
        }
    }

    fn page(meta: ListMeta, items: Vec<Item>) -> Self {
        Self {
            ok: true,
            status: STATUS_OK,
            meta: Some(meta),
            data: Some(ResponseData::Items(items)),
            errors: None,
            error: None,
        }
    }

    fn failure(err: RepoError) -> Self {
        let status = err.status();
        let (errors, error) = match err {
            RepoError::Validation(errors) => (Some(errors.messages()), None),
            other => (None, Some(other.to_string())),
        };
        Self {
            ok: false,
            status,
            meta: None,
            data: None,
            errors,
            error,
        }
    }

    fn from_result(status: u16, result: RepoResult<Item>) -> Self {
        match result {
            Ok(item) => Self::item(status, item),
            Err(err) => Self::failure(err),
        }
    }

    /// The single item carried by this response, if any.
    pub fn item_data(&self) -> Option<&Item> {
        match &self.data {
            Some(ResponseData::Item(item)) => Some(item),
            _ => None,
        }
    }

    /// The item list carried by this response, if any.
    pub fn items_data(&self) -> Option<&[Item]> {
        match &self.data {
            Some(ResponseData::Items(items)) => Some(items),
            _ => None,
        }
    }
}

/// Use-case service wrapper over an item repository.
pub struct ItemService<R: ItemRepository> {
    repo: R,
    allowed_fields: AllowedFields,
}

impl<R: ItemRepository> ItemService<R> {
    /// Creates a service that accepts every writable field.
    pub fn new(repo: R) -> Self {
        Self::with_allowed_fields(repo, AllowedFields::default())
    }

    /// Creates a service with a default whitelist for create/update payloads.
    pub fn with_allowed_fields(repo: R, allowed_fields: AllowedFields) -> Self {
        Self {
            repo,
            allowed_fields,
        }
    }

    pub fn repository(&self) -> &R {
        &self.repo
    }

    /// Creates one item. `201` with the record, or `400` with messages.
    pub fn create(&mut self, payload: &Value) -> ItemResponse {
        let allowed = self.allowed_fields.clone();
        self.create_with_fields(payload, &allowed)
    }

    /// Same as `create`, with a per-call whitelist.
    pub fn create_with_fields(&mut self, payload: &Value, allowed: &AllowedFields) -> ItemResponse {
        let patch = ItemPatch::from_payload(payload, allowed);
        ItemResponse::from_result(STATUS_CREATED, self.repo.create_item(&patch))
    }

    /// Lists one page of items. Always `200`.
    pub fn list(&self, query: &ItemListQuery) -> ItemResponse {
        let page = self.repo.list_items(query);
        ItemResponse::page(page.meta, page.items)
    }

    /// Lists using loose parameters; see `ItemListQuery::from_json`.
    pub fn list_with_params(&self, params: &Value) -> ItemResponse {
        self.list(&ItemListQuery::from_json(params))
    }

    /// Gets one item. `200` with the record, or `404`.
    pub fn get_by_id(&self, id: &str) -> ItemResponse {
        ItemResponse::from_result(STATUS_OK, self.repo.get_item(id))
    }

    /// Shallow-merges the payload into an item. `200`, `404` or `400`.
    pub fn update(&mut self, id: &str, payload: &Value) -> ItemResponse {
        let allowed = self.allowed_fields.clone();
        self.update_with_fields(id, payload, &allowed)
    }

    /// Same as `update`, with a per-call whitelist.
    pub fn update_with_fields(
        &mut self,
        id: &str,
        payload: &Value,
        allowed: &AllowedFields,
    ) -> ItemResponse {
        let patch = ItemPatch::from_payload(payload, allowed);
        ItemResponse::from_result(STATUS_OK, self.repo.update_item(id, &patch))
    }

    /// Removes an item permanently and returns it. `200` or `404`.
    pub fn delete(&mut self, id: &str) -> ItemResponse {
        ItemResponse::from_result(STATUS_OK, self.repo.delete_item(id))
    }

    /// Marks an item inactive and returns it. `200` or `404`.
    pub fn soft_delete(&mut self, id: &str) -> ItemResponse {
        ItemResponse::from_result(STATUS_OK, self.repo.soft_delete_item(id))
    }

    /// Clears the underlying store. Meant for test setup.
    pub fn reset(&mut self) {
        self.repo.reset();
    }
}
