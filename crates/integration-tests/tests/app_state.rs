//! Stores wired through `AppState`, as the application does at startup.

#![allow(clippy::unwrap_used)]

use tavola_core::{ProductId, TenantId};
use tavola_integration_tests::{product, reload};
use tavola_storefront::tenant::parse_url;
use tavola_storefront::{
    AppError, AppState, Favorite, FileStorage, StateError, StorefrontConfig, TenantDirectory,
};

fn state(dir: &std::path::Path) -> AppState<FileStorage> {
    let config = StorefrontConfig {
        data_dir: dir.to_path_buf(),
        ..StorefrontConfig::default()
    };
    AppState::builder(config, TenantDirectory::builtin().unwrap())
        .with_cart(reload(dir))
        .with_favorites(reload(dir))
        .build()
}

#[test]
fn test_visit_from_qr_code() {
    let dir = tempfile::tempdir().unwrap();
    let mut state = state(dir.path());

    let url = parse_url(
        "https://tavola.app/?merchant=pizzeria-rossi&table=4",
        &state.config().base_url,
    )
    .unwrap();
    let tenant_id = state
        .resolver()
        .resolve_from_url(&url)
        .map(|r| r.tenant.id.clone())
        .unwrap();
    assert_eq!(state.resolver().resolve_table_number(&url), Some(4));

    state.cart_mut().unwrap().add(product(1, "Margherita", 850));
    state
        .favorites_mut()
        .unwrap()
        .toggle(Favorite::product(product(7, "Tiramisù", 600), Some(tenant_id)));

    let reloaded = crate::state(dir.path());
    assert_eq!(reloaded.cart().unwrap().count(), 1);
    let favorites = reloaded.favorites().unwrap();
    assert_eq!(favorites.list_by_tenant(&TenantId::from("m1")).len(), 1);
}

#[test]
fn test_cart_and_favorites_share_a_directory() {
    let dir = tempfile::tempdir().unwrap();
    let mut state = state(dir.path());
    state.cart_mut().unwrap().add(product(1, "Margherita", 850));
    state.favorites_mut().unwrap().toggle(ProductId::new(1));

    assert!(dir.path().join("cart.json").exists());
    assert!(dir.path().join("favorites.json").exists());

    state.cart_mut().unwrap().clear();
    assert!(state.favorites().unwrap().is_favorite(ProductId::new(1)));
}

#[test]
fn test_unmounted_store_is_a_configuration_error() {
    let state: AppState<FileStorage> =
        AppState::builder(StorefrontConfig::default(), TenantDirectory::builtin().unwrap())
            .build();

    let err = state.favorites().unwrap_err();
    assert_eq!(err, StateError::NotConfigured("favorites"));

    let app_err = AppError::from(err);
    assert_eq!(app_err.exit_code(), 78);
}
