use item_store_core::{
    AllowedFields, InMemoryItemRepository, ItemField, ItemListQuery, ItemPatch, ItemRepository,
    ItemValidationError, RepoError,
};
use serde_json::{json, Value};

fn patch(payload: Value) -> ItemPatch {
    ItemPatch::from_payload(&payload, &AllowedFields::default())
}

fn seeded_store() -> InMemoryItemRepository {
    let mut repo = InMemoryItemRepository::new();
    repo.create_item(&patch(json!({ "nome": "Produto A", "preco": 100 })))
        .unwrap();
    repo.create_item(&patch(json!({ "nome": "Produto B", "preco": 50 })))
        .unwrap();
    repo.create_item(&patch(json!({ "nome": "Café Especial", "preco": 30 })))
        .unwrap();
    repo
}

fn listed_ids(repo: &InMemoryItemRepository, query: &ItemListQuery) -> Vec<String> {
    repo.list_items(query)
        .items
        .into_iter()
        .map(|item| item.id.to_string())
        .collect()
}

#[test]
fn create_assigns_sequential_ids_and_defaults_active() {
    let mut repo = InMemoryItemRepository::new();

    let first = repo.create_item(&patch(json!({ "nome": "A" }))).unwrap();
    let second = repo
        .create_item(&patch(json!({ "nome": "B", "ativo": false })))
        .unwrap();

    assert_eq!(first.id.to_string(), "1");
    assert_eq!(second.id.to_string(), "2");
    assert!(first.active);
    assert!(!second.active);
    assert_eq!(repo.len(), 2);
}

#[test]
fn failed_create_leaves_store_and_sequence_untouched() {
    let mut repo = InMemoryItemRepository::new();

    let err = repo
        .create_item(&patch(json!({ "preco": -1 })))
        .unwrap_err();
    match err {
        RepoError::Validation(errors) => {
            assert!(errors.contains(ItemValidationError::MissingName));
            assert!(errors.contains(ItemValidationError::InvalidPrice));
        }
        other => panic!("unexpected error: {other}"),
    }
    assert!(repo.is_empty());

    let created = repo.create_item(&patch(json!({ "nome": "A" }))).unwrap();
    assert_eq!(created.id.to_string(), "1");
}

#[test]
fn create_drops_unknown_fields_and_caller_ids() {
    let mut repo = InMemoryItemRepository::new();

    let created = repo
        .create_item(&patch(json!({ "id": "42", "nome": "A", "cor": "azul" })))
        .unwrap();
    assert_eq!(created.id.to_string(), "1");
    assert!(repo.get_item("42").is_err());
}

#[test]
fn create_respects_custom_whitelist() {
    let mut repo = InMemoryItemRepository::new();
    let only_name = AllowedFields::only([ItemField::Name]);

    let created = repo
        .create_item(&ItemPatch::from_payload(
            &json!({ "nome": "A", "preco": -10, "ativo": false }),
            &only_name,
        ))
        .unwrap();
    assert_eq!(created.price, None);
    assert!(created.active);
}

#[test]
fn get_by_id_matches_exact_string_ids() {
    let mut repo = InMemoryItemRepository::new();
    repo.create_item(&patch(json!({ "nome": "A" }))).unwrap();
    repo.create_item(&patch(json!({ "nome": "B" }))).unwrap();

    assert_eq!(repo.get_item("1").unwrap().name, "A");
    assert_eq!(repo.get_item("2").unwrap().name, "B");
    assert_eq!(
        repo.get_item("99").unwrap_err(),
        RepoError::NotFound("99".to_string())
    );
    assert!(matches!(repo.get_item("01"), Err(RepoError::NotFound(_))));
    assert!(matches!(repo.get_item(""), Err(RepoError::NotFound(_))));
}

#[test]
fn update_changes_only_patched_fields_and_keeps_position() {
    let mut repo = seeded_store();

    let updated = repo
        .update_item("2", &patch(json!({ "preco": 59.9 })))
        .unwrap();
    assert_eq!(updated.name, "Produto B");
    assert_eq!(updated.price, Some(59.9));
    assert!(updated.active);

    assert_eq!(repo.get_item("2").unwrap(), updated);
    assert_eq!(listed_ids(&repo, &ItemListQuery::default()), ["1", "2", "3"]);
}

#[test]
fn update_with_invalid_candidate_keeps_stored_record() {
    let mut repo = seeded_store();
    let before = repo.get_item("1").unwrap();

    let err = repo
        .update_item("1", &patch(json!({ "nome": "", "preco": 10 })))
        .unwrap_err();
    assert_eq!(err.status(), 400);
    assert_eq!(repo.get_item("1").unwrap(), before);
}

#[test]
fn update_cannot_change_id_and_reports_missing_items() {
    let mut repo = seeded_store();

    let updated = repo
        .update_item("2", &patch(json!({ "id": "9", "nome": "Renamed" })))
        .unwrap();
    assert_eq!(updated.id.to_string(), "2");

    let err = repo
        .update_item("9", &patch(json!({ "nome": "X" })))
        .unwrap_err();
    assert_eq!(err, RepoError::NotFound("9".to_string()));
    assert_eq!(err.status(), 404);
    assert_eq!(err.to_string(), "item not found: 9");
}

#[test]
fn soft_delete_keeps_item_but_hides_it_from_active_listing() {
    let mut repo = seeded_store();

    let deleted = repo.soft_delete_item("1").unwrap();
    assert!(!deleted.active);
    assert_eq!(repo.len(), 3);
    assert!(!repo.get_item("1").unwrap().active);

    let active_only = ItemListQuery {
        active: Some(true),
        ..ItemListQuery::default()
    };
    assert_eq!(listed_ids(&repo, &active_only), ["2", "3"]);

    repo.soft_delete_item("1").unwrap();
    assert_eq!(repo.len(), 3);
    assert!(matches!(
        repo.soft_delete_item("7"),
        Err(RepoError::NotFound(_))
    ));
}

#[test]
fn delete_removes_permanently_and_preserves_order() {
    let mut repo = seeded_store();
    repo.create_item(&patch(json!({ "nome": "Produto D" })))
        .unwrap();

    let removed = repo.delete_item("3").unwrap();
    assert_eq!(removed.name, "Café Especial");
    assert!(matches!(repo.get_item("3"), Err(RepoError::NotFound(_))));
    assert_eq!(listed_ids(&repo, &ItemListQuery::default()), ["1", "2", "4"]);
    assert!(matches!(repo.delete_item("3"), Err(RepoError::NotFound(_))));

    let next = repo.create_item(&patch(json!({ "nome": "E" }))).unwrap();
    assert_eq!(next.id.to_string(), "5");
}

#[test]
fn reset_clears_items_and_restarts_ids() {
    let mut repo = seeded_store();

    repo.reset();
    assert!(repo.is_empty());

    let created = repo.create_item(&patch(json!({ "nome": "X" }))).unwrap();
    assert_eq!(created.id.to_string(), "1");
    assert_eq!(repo.len(), 1);
}

#[test]
fn stores_are_independent() {
    let mut left = seeded_store();
    let mut right = InMemoryItemRepository::new();

    let created = right.create_item(&patch(json!({ "nome": "Solo" }))).unwrap();
    assert_eq!(created.id.to_string(), "1");

    left.delete_item("1").unwrap();
    assert_eq!(right.get_item("1").unwrap().name, "Solo");
    assert_eq!(left.len(), 2);
}
