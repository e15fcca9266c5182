//! Item repository contract and in-memory implementation.
//!
//! # Responsibility
//! - Provide CRUD APIs over one ordered item collection.
//! - Run the list pipeline: filter, search, sort, paginate.
//!
//! # Invariants
//! - Insertion order is the default iteration order.
//! - Failed writes leave both the collection and the id sequence untouched.
//! - Sorting is stable: equal keys keep their relative order.

use crate::model::fields::ItemPatch;
use crate::model::item::{Item, ItemId, ItemValidationErrors};
use log::debug;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::cmp::Ordering;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub const STATUS_OK: u16 = 200;
pub const STATUS_CREATED: u16 = 201;
pub const STATUS_BAD_REQUEST: u16 = 400;
pub const STATUS_NOT_FOUND: u16 = 404;
pub const STATUS_INTERNAL_ERROR: u16 = 500;

pub const DEFAULT_PAGE: usize = 1;
pub const DEFAULT_PAGE_SIZE: usize = 10;

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for item writes and lookups.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RepoError {
    Validation(ItemValidationErrors),
    /// Carries the id exactly as the caller sent it.
    NotFound(String),
    /// Every id up to `u64::MAX` has been handed out; only `reset` recovers.
    IdsExhausted,
}

impl RepoError {
    /// HTTP-like status code for transport layers.
    pub fn status(&self) -> u16 {
        match self {
            Self::Validation(_) => STATUS_BAD_REQUEST,
            Self::NotFound(_) => STATUS_NOT_FOUND,
            Self::IdsExhausted => STATUS_INTERNAL_ERROR,
        }
    }
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::NotFound(id) => write!(f, "item not found: {id}"),
            Self::IdsExhausted => write!(f, "item id sequence exhausted"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::NotFound(_) | Self::IdsExhausted => None,
        }
    }
}

impl From<ItemValidationErrors> for RepoError {
    fn from(value: ItemValidationErrors) -> Self {
        Self::Validation(value)
    }
}

/// Sort key for list queries.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SortField {
    /// Creation order.
    #[default]
    #[serde(rename = "id")]
    Id,
    /// Unicode code-point order (Rust `str` ordering), not UTF-16 unit order.
    #[serde(rename = "nome")]
    Name,
    /// Items without a price always sort last.
    #[serde(rename = "preco")]
    Price,
}

impl SortField {
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "id" => Some(Self::Id),
            "nome" => Some(Self::Name),
            "preco" => Some(Self::Price),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDir {
    #[default]
    Asc,
    Desc,
}

impl SortDir {
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "asc" => Some(Self::Asc),
            "desc" => Some(Self::Desc),
            _ => None,
        }
    }

    fn apply(self, ordering: Ordering) -> Ordering {
        match self {
            Self::Asc => ordering,
            Self::Desc => ordering.reverse(),
        }
    }
}

/// Query options for listing items.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemListQuery {
    /// Case-insensitive substring matched against `name`. Blank means no search.
    pub q: Option<String>,
    /// Exact match on `active` when set.
    pub active: Option<bool>,
    pub sort_by: SortField,
    pub sort_dir: SortDir,
    /// 1-based; clamped into `[1, total_pages]`.
    pub page: usize,
    /// `0` falls back to `DEFAULT_PAGE_SIZE`.
    pub page_size: usize,
}

impl Default for ItemListQuery {
    fn default() -> Self {
        Self {
            q: None,
            active: None,
            sort_by: SortField::default(),
            sort_dir: SortDir::default(),
            page: DEFAULT_PAGE,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl ItemListQuery {
    /// Parses loose query parameters (`q`, `ativo`, `sortBy`, `sortDir`,
    /// `page`, `pageSize`).
    ///
    /// Never fails: missing or ill-typed values fall back to defaults.
    pub fn from_json(params: &Value) -> Self {
        let defaults = Self::default();
        Self {
            q: params.get("q").and_then(Value::as_str).map(str::to_owned),
            active: params.get("ativo").and_then(Value::as_bool),
            sort_by: params
                .get("sortBy")
                .and_then(Value::as_str)
                .and_then(SortField::from_key)
                .unwrap_or(defaults.sort_by),
            sort_dir: params
                .get("sortDir")
                .and_then(Value::as_str)
                .and_then(SortDir::from_key)
                .unwrap_or(defaults.sort_dir),
            page: positive_usize(params.get("page")).unwrap_or(defaults.page),
            page_size: positive_usize(params.get("pageSize")).unwrap_or(defaults.page_size),
        }
    }

    fn effective_page_size(&self) -> usize {
        if self.page_size == 0 {
            DEFAULT_PAGE_SIZE
        } else {
            self.page_size
        }
    }

    fn search_term(&self) -> Option<String> {
        self.q
            .as_deref()
            .filter(|q| !q.trim().is_empty())
            .map(str::to_lowercase)
    }
}

fn positive_usize(value: Option<&Value>) -> Option<usize> {
    let value = value?;
    if let Some(number) = value.as_u64() {
        return (number > 0).then(|| usize::try_from(number).unwrap_or(usize::MAX));
    }
    // Integral floats such as `2.0` count as integers; `as` saturates past `usize::MAX`.
    let number = value
        .as_f64()
        .filter(|number| number.is_finite() && number.fract() == 0.0 && *number > 0.0)?;
    Some(number as usize)
}

/// Pagination metadata echoed with every list result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListMeta {
    /// Matches after filtering, before pagination.
    pub total: usize,
    /// Page actually returned after clamping.
    pub page: usize,
    pub page_size: usize,
    pub total_pages: usize,
    pub sort_by: SortField,
    pub sort_dir: SortDir,
    pub q: Option<String>,
    #[serde(rename = "ativo")]
    pub active: Option<bool>,
}

/// One page of list results.
#[derive(Debug, Clone, PartialEq)]
pub struct ItemPage {
    pub items: Vec<Item>,
    pub meta: ListMeta,
}

/// Repository interface for item CRUD operations.
///
/// Ids are taken as strings and matched exactly against the canonical form.
pub trait ItemRepository {
    fn create_item(&mut self, patch: &ItemPatch) -> RepoResult<Item>;
    fn list_items(&self, query: &ItemListQuery) -> ItemPage;
    fn get_item(&self, id: &str) -> RepoResult<Item>;
    fn update_item(&mut self, id: &str, patch: &ItemPatch) -> RepoResult<Item>;
    fn delete_item(&mut self, id: &str) -> RepoResult<Item>;
    fn soft_delete_item(&mut self, id: &str) -> RepoResult<Item>;
    /// Clears every item and restarts ids at `"1"`.
    fn reset(&mut self);
}

/// Vector-backed item store.
///
/// Not synchronized: hosts sharing one store across threads must wrap it
/// in their own lock.
#[derive(Debug, Clone)]
pub struct InMemoryItemRepository {
    items: Vec<Item>,
    /// `None` once the id sequence is exhausted.
    next_id: Option<ItemId>,
}

impl Default for InMemoryItemRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryItemRepository {
    pub fn new() -> Self {
        Self {
            items: Vec::new(),
            next_id: Some(ItemId::FIRST),
        }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Items in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Item> {
        self.items.iter()
    }

    fn position(&self, id: &str) -> RepoResult<usize> {
        ItemId::parse(id)
            .and_then(|parsed| self.items.iter().position(|item| item.id == parsed))
            .ok_or_else(|| RepoError::NotFound(id.to_string()))
    }
}

impl ItemRepository for InMemoryItemRepository {
    fn create_item(&mut self, patch: &ItemPatch) -> RepoResult<Item> {
        let id = self.next_id.ok_or(RepoError::IdsExhausted)?;
        let item = Item::from_patch(id, patch).inspect_err(|err| {
            debug!(
                "event=item_create module=store status=invalid errors={}",
                err.as_slice().len()
            );
        })?;

        self.next_id = id.next();
        self.items.push(item.clone());
        debug!(
            "event=item_create module=store status=ok id={} total={}",
            item.id,
            self.items.len()
        );
        Ok(item)
    }

    fn list_items(&self, query: &ItemListQuery) -> ItemPage {
        let term = query.search_term();
        let mut matches: Vec<&Item> = self
            .items
            .iter()
            .filter(|item| query.active.map_or(true, |active| item.active == active))
            .filter(|item| {
                term.as_deref()
                    .map_or(true, |term| item.name.to_lowercase().contains(term))
            })
            .collect();

        // `sort_by` is stable, which keeps insertion order on ties.
        matches.sort_by(|a, b| compare_items(a, b, query.sort_by, query.sort_dir));

        let page_size = query.effective_page_size();
        let total = matches.len();
        let total_pages = total.div_ceil(page_size).max(1);
        let page = query.page.clamp(1, total_pages);
        let start = (page - 1) * page_size;
        let items: Vec<Item> = matches
            .into_iter()
            .skip(start)
            .take(page_size)
            .cloned()
            .collect();

        debug!(
            "event=item_list module=store status=ok total={} page={} returned={}",
            total,
            page,
            items.len()
        );

        ItemPage {
            items,
            meta: ListMeta {
                total,
                page,
                page_size,
                total_pages,
                sort_by: query.sort_by,
                sort_dir: query.sort_dir,
                q: query.q.clone(),
                active: query.active,
            },
        }
    }

    fn get_item(&self, id: &str) -> RepoResult<Item> {
        let index = self.position(id)?;
        Ok(self.items[index].clone())
    }

    fn update_item(&mut self, id: &str, patch: &ItemPatch) -> RepoResult<Item> {
        let index = self.position(id)?;
        let updated = self.items[index].merge(patch).inspect_err(|err| {
            debug!(
                "event=item_update module=store status=invalid id={} errors={}",
                id,
                err.as_slice().len()
            );
        })?;

        self.items[index] = updated.clone();
        debug!("event=item_update module=store status=ok id={id}");
        Ok(updated)
    }

    fn delete_item(&mut self, id: &str) -> RepoResult<Item> {
        let index = self.position(id)?;
        // `Vec::remove` shifts the tail, preserving the order of the rest.
        let removed = self.items.remove(index);
        debug!(
            "event=item_delete module=store status=ok id={} total={}",
            removed.id,
            self.items.len()
        );
        Ok(removed)
    }

    fn soft_delete_item(&mut self, id: &str) -> RepoResult<Item> {
        let index = self.position(id)?;
        let item = &mut self.items[index];
        item.soft_delete();
        debug!("event=item_soft_delete module=store status=ok id={}", item.id);
        Ok(item.clone())
    }

    fn reset(&mut self) {
        self.items.clear();
        self.next_id = Some(ItemId::FIRST);
        debug!("event=store_reset module=store status=ok");
    }
}

fn compare_items(a: &Item, b: &Item, sort_by: SortField, sort_dir: SortDir) -> Ordering {
    match sort_by {
        SortField::Id => sort_dir.apply(a.id.cmp(&b.id)),
        SortField::Name => sort_dir.apply(a.name.cmp(&b.name)),
        SortField::Price => match (a.price, b.price) {
            (None, None) => Ordering::Equal,
            (None, Some(_)) => Ordering::Greater,
            (Some(_), None) => Ordering::Less,
            (Some(x), Some(y)) => sort_dir.apply(x.partial_cmp(&y).unwrap_or(Ordering::Equal)),
        },
    }
}
