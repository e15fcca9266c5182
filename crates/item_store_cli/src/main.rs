//! CLI smoke entry point.
//!
//! # Responsibility
//! - Run a fixed CRUD scenario against a fresh item store.
//! - Print every result envelope as pretty JSON for quick manual checks.
//!
//! Usage: `item_store_cli [ABSOLUTE_LOG_DIR]`

use item_store_core::{
    core_version, default_log_level, init_logging, InMemoryItemRepository, ItemListQuery,
    ItemResponse, ItemService, SortDir, SortField,
};
use serde_json::json;
use std::process::ExitCode;

fn main() -> ExitCode {
    if let Some(log_dir) = std::env::args().nth(1) {
        if let Err(err) = init_logging(default_log_level(), &log_dir) {
            eprintln!("failed to initialize logging: {err}");
            return ExitCode::FAILURE;
        }
    }

    println!("item_store_core version={}", core_version());

    let mut service = ItemService::new(InMemoryItemRepository::new());

    section("CREATE");
    print_response(&service.create(&json!({ "nome": "Produto A", "preco": 100 })));
    print_response(&service.create(&json!({ "nome": "Produto B", "preco": 50 })));
    print_response(&service.create(&json!({ "nome": "Café Especial", "preco": 30 })));

    section("LIST q=pro sortBy=preco asc");
    let query = ItemListQuery {
        q: Some("pro".to_string()),
        sort_by: SortField::Price,
        sort_dir: SortDir::Asc,
        ..ItemListQuery::default()
    };
    print_response(&service.list(&query));

    section("GET id=2");
    print_response(&service.get_by_id("2"));

    section("UPDATE id=2");
    print_response(&service.update("2", &json!({ "preco": 59.9 })));

    section("SOFT DELETE id=1");
    print_response(&service.soft_delete("1"));

    section("DELETE id=3");
    print_response(&service.delete("3"));

    section("FINAL STATE");
    let items: Vec<_> = service.repository().iter().collect();
    match serde_json::to_string_pretty(&items) {
        Ok(text) => println!("{text}"),
        Err(err) => {
            log::error!("event=cli_render module=cli status=error error={err}");
            return ExitCode::FAILURE;
        }
    }

    ExitCode::SUCCESS
}

fn section(title: &str) {
    println!("\n== {title} ==");
}

fn print_response(response: &ItemResponse) {
    match serde_json::to_string_pretty(response) {
        Ok(text) => println!("{text}"),
        Err(err) => eprintln!("failed to render response: {err}"),
    }
}
