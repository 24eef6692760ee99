//! Kitchen directory: CRUD, search, nearest and top-rated queries

mod common;

use common::{Harness, UNKNOWN_ADDRESS};
use kitchenmap_core::{ErrorKind, NearestOutcome};
use kitchenmap_storage::{GeoPoint, KitchenPatch, NewKitchen, NewRating};
use pretty_assertions::assert_eq;

#[tokio::test]
async fn test_nearest_to_columbia() {
    let h = Harness::new();
    let (a, b, c) = h.seed_three().await;

    let outcome = h.kitchens.nearest_kitchens("Columbia University", 1).await.unwrap();
    let NearestOutcome::Ranked { origin, kitchens } = outcome else {
        panic!("expected a ranking");
    };
    assert_eq!(origin.formatted_address, "Columbia University");
    assert_eq!(kitchens.len(), 1);
    assert_eq!(kitchens[0].kitchen.id, a.id);
    assert!(kitchens[0].distance_km < 1.0);

    let NearestOutcome::Ranked { kitchens, .. } = h
        .kitchens
        .nearest_kitchens("Columbia University", 10)
        .await
        .unwrap()
    else {
        panic!("expected a ranking");
    };
    let ids: Vec<i64> = kitchens.iter().map(|k| k.kitchen.id).collect();
    assert_eq!(ids, vec![a.id, b.id, c.id]);
}

#[tokio::test]
async fn test_columbia_prefers_uptown_kitchen() {
    let h = Harness::new();
    let a = h.add("KitchenA", "Uptown", 40.81, -73.96).await;
    h.add("KitchenB", "Downtown", 40.71, -74.01).await;

    let NearestOutcome::Ranked { kitchens, .. } =
        h.kitchens.nearest_kitchens("Columbia University", 1).await.unwrap()
    else {
        panic!("expected a ranking");
    };
    let ids: Vec<i64> = kitchens.iter().map(|k| k.kitchen.id).collect();
    assert_eq!(ids, vec![a.id]);
}

#[tokio::test]
async fn test_unresolvable_address_is_not_an_empty_ranking() {
    let h = Harness::new();
    h.seed_three().await;

    let outcome = h.kitchens.nearest_kitchens(UNKNOWN_ADDRESS, 3).await.unwrap();
    assert_eq!(outcome, NearestOutcome::AddressNotFound);
}

#[tokio::test]
async fn test_nearest_argument_checks() {
    let h = Harness::new();

    // Empty table
    let err = h.kitchens.nearest_kitchens("Columbia University", 3).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::NoData);

    h.seed_three().await;
    let err = h.kitchens.nearest_kitchens("   ", 3).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::InvalidInput);
    let err = h.kitchens.nearest_kitchens("Columbia University", -1).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::InvalidInput);

    let NearestOutcome::Ranked { kitchens, .. } =
        h.kitchens.nearest_kitchens("Columbia University", 0).await.unwrap()
    else {
        panic!("expected a ranking");
    };
    assert!(kitchens.is_empty());
}

#[tokio::test]
async fn test_uncoordinated_kitchens_are_excluded() {
    let h = Harness::new();
    let (a, _, _) = h.seed_three().await;
    let lost = h
        .kitchens
        .add_kitchen(NewKitchen::new("Unmapped Pantry", UNKNOWN_ADDRESS))
        .await
        .unwrap();
    assert_eq!(lost.location, None);

    let NearestOutcome::Ranked { kitchens, .. } =
        h.kitchens.nearest_kitchens("Columbia University", 10).await.unwrap()
    else {
        panic!("expected a ranking");
    };
    assert_eq!(kitchens.len(), 3);
    assert_eq!(kitchens[0].kitchen.id, a.id);
    assert!(kitchens.iter().all(|k| k.kitchen.id != lost.id));
}

#[tokio::test]
async fn test_add_kitchen_geocodes_address() {
    let h = Harness::new();
    let kitchen = h
        .kitchens
        .add_kitchen(NewKitchen::new("Broadway Kitchen", "  2920 Broadway "))
        .await
        .unwrap();

    assert_eq!(kitchen.address, "2920 Broadway");
    assert_eq!(kitchen.location, Some(GeoPoint::new(40.8086, -73.9630)));
}

#[tokio::test]
async fn test_add_kitchen_validation() {
    let h = Harness::new();
    h.seed_three().await;

    let err = h
        .kitchens
        .add_kitchen(NewKitchen::new("KitchenA", "elsewhere"))
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Conflict);

    let err = h
        .kitchens
        .add_kitchen(NewKitchen::new(" ", "somewhere"))
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::InvalidInput);

    let err = h
        .kitchens
        .add_kitchen(NewKitchen::new("Long Address", "x".repeat(201)))
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::InvalidInput);
}

#[tokio::test]
async fn test_update_kitchen() {
    let h = Harness::new();
    let (a, b, _) = h.seed_three().await;

    let patch = KitchenPatch {
        address: Some("Times Square".to_string()),
        contact_phone: Some("(212) 555-0100".to_string()),
        operating_hours: Some("   ".to_string()),
        ..Default::default()
    };
    let updated = h.kitchens.update_kitchen(a.id, patch).await.unwrap();

    assert_eq!(updated.address, "Times Square");
    assert_eq!(updated.location, Some(GeoPoint::new(40.7580, -73.9855)));
    assert_eq!(updated.contact_phone.as_deref(), Some("(212) 555-0100"));
    assert_eq!(updated.operating_hours, None);
    assert_eq!(updated.name, "KitchenA");

    let rename = KitchenPatch {
        name: Some(b.name.clone()),
        ..Default::default()
    };
    let err = h.kitchens.update_kitchen(a.id, rename).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::Conflict);

    let err = h
        .kitchens
        .update_kitchen(999, KitchenPatch::default())
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::NotFound);
}

#[tokio::test]
async fn test_unresolved_new_address_drops_coordinate() {
    let h = Harness::new();
    let (a, b, _) = h.seed_three().await;
    assert!(a.location.is_some());

    let patch = KitchenPatch {
        address: Some(UNKNOWN_ADDRESS.to_string()),
        ..Default::default()
    };
    let updated = h.kitchens.update_kitchen(a.id, patch).await.unwrap();
    assert_eq!(updated.address, UNKNOWN_ADDRESS);
    assert_eq!(updated.location, None);

    let stored = h.kitchens.get_kitchen(a.id).await.unwrap();
    assert_eq!(stored.location, None);

    let NearestOutcome::Ranked { kitchens, .. } =
        h.kitchens.nearest_kitchens("Columbia University", 10).await.unwrap()
    else {
        panic!("expected a ranking");
    };
    assert_eq!(kitchens.len(), 2);
    assert_eq!(kitchens[0].kitchen.id, b.id);
    assert!(kitchens.iter().all(|k| k.kitchen.id != a.id));
}

#[tokio::test]
async fn test_unchanged_address_keeps_coordinate() {
    let h = Harness::new();
    let (a, _, _) = h.seed_three().await;

    let patch = KitchenPatch {
        address: Some(a.address.clone()),
        operational_status: Some("OPERATIONAL".to_string()),
        ..Default::default()
    };
    let updated = h.kitchens.update_kitchen(a.id, patch).await.unwrap();
    assert_eq!(updated.location, a.location);
}

#[tokio::test]
async fn test_search_by_name_fragment() {
    let h = Harness::new();
    h.seed_three().await;
    h.add("Bowery Mission", "227 Bowery", 40.7222, -73.9929).await;

    let found = h.kitchens.search_kitchens("kitchen").await.unwrap();
    assert_eq!(found.len(), 3);

    let found = h.kitchens.search_kitchens("MISSION").await.unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].name, "Bowery Mission");

    assert!(h.kitchens.search_kitchens("pantry").await.unwrap().is_empty());

    let err = h.kitchens.search_kitchens(" ").await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::InvalidInput);

    let by_name = h.kitchens.get_kitchen_by_name("Bowery Mission").await.unwrap();
    assert_eq!(by_name.address, "227 Bowery");
    let err = h.kitchens.get_kitchen_by_name("Nope").await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::NotFound);
}

#[tokio::test]
async fn test_top_rated_puts_unrated_last() {
    let h = Harness::new();
    let (a, b, c) = h.seed_three().await;
    h.aggregator.add_rating(NewRating::new(b.id, 5)).await.unwrap();
    h.aggregator.add_rating(NewRating::new(c.id, 3)).await.unwrap();

    let top = h.kitchens.top_rated_kitchens(10).await.unwrap();
    let ids: Vec<i64> = top.iter().map(|k| k.id).collect();
    assert_eq!(ids, vec![b.id, c.id, a.id]);

    let top = h.kitchens.top_rated_kitchens(1).await.unwrap();
    assert_eq!(top.len(), 1);
    assert_eq!(top[0].id, b.id);

    let err = h.kitchens.top_rated_kitchens(-2).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::InvalidInput);
}

#[tokio::test]
async fn test_delete_kitchen_removes_its_ratings() {
    let h = Harness::new();
    let (a, b, _) = h.seed_three().await;
    h.aggregator.add_rating(NewRating::new(a.id, 5)).await.unwrap();
    h.aggregator.add_rating(NewRating::new(a.id, 2)).await.unwrap();
    h.aggregator.add_rating(NewRating::new(b.id, 4)).await.unwrap();

    assert_eq!(h.kitchens.delete_kitchen(a.id).await.unwrap(), 2);

    let err = h.kitchens.get_kitchen(a.id).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::NotFound);
    assert_eq!(h.aggregator.list_ratings().await.unwrap().len(), 1);

    let err = h.kitchens.delete_kitchen(a.id).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::NotFound);
}
