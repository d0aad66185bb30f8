//! End-to-end resolution scenarios over a fully wired context.

use lingodb_commons::{ConverterRegistry, LocalizationConfig};
use lingodb_core::AppContext;
use lingodb_store::InMemoryBackend;
use std::sync::Arc;
use tempfile::TempDir;

fn context(config: LocalizationConfig) -> AppContext {
    AppContext::new(
        config,
        Arc::new(InMemoryBackend::new()),
        ConverterRegistry::new(),
    )
    .unwrap()
}

#[test]
fn fallback_tiers_end_to_end() {
    let ctx = context(LocalizationConfig::default());
    let admin = ctx.admin();
    admin
        .update_resource_string("Today", "Resources", "", "Today is great", None)
        .unwrap();
    admin
        .update_resource_string("Today", "Resources", "de", "Heute", None)
        .unwrap();

    let manager = ctx.registry().get_or_create("Resources");

    // es-mx has no row at all: invariant fallback
    assert_eq!(
        manager.get_string("Today", "es-mx").unwrap().as_deref(),
        Some("Today is great")
    );
    // de-de falls back to the language prefix
    assert_eq!(
        manager.get_string("Today", "de-de").unwrap().as_deref(),
        Some("Heute")
    );
    // de is an exact match
    assert_eq!(
        manager.get_string("Today", "de").unwrap().as_deref(),
        Some("Heute")
    );
}

#[test]
fn edits_become_visible_after_reload() {
    let ctx = context(LocalizationConfig::default());
    let admin = ctx.admin();
    admin
        .update_resource_string("Today", "Resources", "de", "Heute", None)
        .unwrap();

    let manager = ctx.registry().get_or_create("Resources");
    assert_eq!(
        manager.get_string("Today", "de").unwrap().as_deref(),
        Some("Heute")
    );

    // an edit alone does not reach the cached reader
    admin
        .update_resource_string("Today", "Resources", "de", "Heute!", None)
        .unwrap();
    assert_eq!(
        manager.get_string("Today", "de").unwrap().as_deref(),
        Some("Heute")
    );

    // the explicit reload broadcast does
    admin.reload();
    assert_eq!(
        manager.get_string("Today", "de").unwrap().as_deref(),
        Some("Heute!")
    );
}

#[test]
fn admin_round_trip_through_resx() {
    let dir = TempDir::new().unwrap();
    let ctx = context(LocalizationConfig {
        resx_base_folder: dir.path().to_string_lossy().into_owned(),
        ..LocalizationConfig::default()
    });
    let admin = ctx.admin();
    admin
        .update_resource_string("Today", "Resources", "", "Today is great", None)
        .unwrap();
    admin
        .update_resource_string("Today", "Resources", "de", "Heute", None)
        .unwrap();

    ctx.resx().export(None, None).unwrap();
    admin.delete_resource_set("Resources").unwrap();
    ctx.resx().import(None).unwrap();
    admin.reload();

    let manager = ctx.registry().get_or_create("Resources");
    assert_eq!(
        manager.get_string("Today", "de-de").unwrap().as_deref(),
        Some("Heute")
    );
    assert_eq!(
        manager.get_string("Today", "fr").unwrap().as_deref(),
        Some("Today is great")
    );
}

#[test]
fn cascade_delete_then_resolution_misses() {
    let ctx = context(LocalizationConfig::default());
    let admin = ctx.admin();
    admin
        .update_resource_string("Today", "Resources", "", "Today", None)
        .unwrap();
    admin
        .update_resource_string("Today", "Resources", "de", "Heute", None)
        .unwrap();

    // deleting without a locale cascades all variants
    assert!(admin.delete_resource("Today", "Resources", None).unwrap());
    admin.reload();

    let manager = ctx.registry().get_or_create("Resources");
    assert!(manager.get_value("Today", "de").unwrap().is_none());
}
