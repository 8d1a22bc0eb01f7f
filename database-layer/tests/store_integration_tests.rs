// Integration tests against a live PostgreSQL instance.
//
// Run with: DATABASE_URL=postgres://... cargo test -p database-layer -- --ignored

use database_layer::{
    DatabaseError, DatabasePool, Existence, GeoPoint, GeographicRepository, PoolSettings,
    RecordLocator, SequenceGenerator, Store, Subscriber,
};
use std::collections::HashSet;

// =============================================================================
// HELPER FUNCTIONS
// =============================================================================

async fn test_pool() -> DatabasePool {
    let url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set for integration tests");
    let db = DatabasePool::connect(&url, &PoolSettings::default()).await.unwrap();
    db.run_migrations().await.unwrap();
    db
}

fn unique_suffix() -> String {
    let nanos = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    format!("{}", nanos % 1_000_000_000)
}

async fn seed_entity(db: &DatabasePool, entity: &str, last_code: &str) {
    sqlx::query(
        "INSERT INTO icare_elementid_lookup (entity_name, starting_code, last_code) VALUES ($1, $2, $2)",
    )
    .bind(entity)
    .bind(last_code)
    .execute(db.pool())
    .await
    .unwrap();
}

async fn seed_store(db: &DatabasePool, store_id: &str, mobile: &str, lat: f64, lon: f64) {
    sqlx::query(
        r#"
        INSERT INTO tbl_store (store_id, store_name, mobile, latitude, longitude, delivery_options)
        VALUES ($1, $2, $3, $4, $5, 'Home Delivery')
        "#,
    )
    .bind(store_id)
    .bind(format!("Store {store_id}"))
    .bind(mobile)
    .bind(lat)
    .bind(lon)
    .execute(db.pool())
    .await
    .unwrap();
}

// =============================================================================
// SEQUENTIAL ID GENERATOR
// =============================================================================

#[tokio::test]
#[ignore] // Requires database connection
async fn test_issue_next_id_persists_code() {
    let db = test_pool().await;
    let entity = format!("TESTDOC{}", unique_suffix());
    seed_entity(&db, &entity, "ICDOC0099").await;

    let generator = SequenceGenerator::new(db.pool().clone());
    assert_eq!(generator.issue_next_id(&entity).await.unwrap(), "ICDOC0100");
    assert_eq!(generator.issue_next_id(&entity).await.unwrap(), "ICDOC0101");

    let stored: String = sqlx::query_scalar(
        "SELECT last_code FROM icare_elementid_lookup WHERE entity_name = $1",
    )
    .bind(&entity)
    .fetch_one(db.pool())
    .await
    .unwrap();
    assert_eq!(stored, "ICDOC0101");
}

#[tokio::test]
#[ignore] // Requires database connection
async fn test_unknown_entity_is_not_found() {
    let db = test_pool().await;
    let generator = SequenceGenerator::new(db.pool().clone());
    let err = generator
        .issue_next_id(&format!("MISSING{}", unique_suffix()))
        .await
        .unwrap_err();
    assert!(matches!(err, DatabaseError::SequenceNotFound(_)));
}

#[tokio::test]
#[ignore] // Requires database connection
async fn test_concurrent_issue_yields_distinct_codes() {
    let db = test_pool().await;
    let entity = format!("TESTCONC{}", unique_suffix());
    seed_entity(&db, &entity, "ICC0000").await;

    let mut handles = Vec::new();
    for _ in 0..16 {
        let generator = SequenceGenerator::new(db.pool().clone());
        let entity = entity.clone();
        handles.push(tokio::spawn(async move { generator.issue_next_id(&entity).await }));
    }

    let mut codes = HashSet::new();
    for handle in handles {
        codes.insert(handle.await.unwrap().unwrap());
    }
    assert_eq!(codes.len(), 16);
    assert!(codes.contains("ICC0001"));
    assert!(codes.contains("ICC0016"));
}

// =============================================================================
// RECORD LOCATOR
// =============================================================================

#[tokio::test]
#[ignore] // Requires database connection
async fn test_exists_returns_sentinel_then_record() {
    let db = test_pool().await;
    let locator = RecordLocator::new(db.pool().clone());
    let suffix = unique_suffix();
    let mobile = format!("7{:0>9}", suffix);

    let before = locator.exists::<Subscriber>("mobile", &mobile).await.unwrap();
    assert!(before.is_unique());

    sqlx::query("INSERT INTO tbl_subscriber (subscriber_id, first_name, mobile) VALUES ($1, 'Asha', $2)")
        .bind(format!("ICSUB{suffix}"))
        .bind(&mobile)
        .execute(db.pool())
        .await
        .unwrap();

    match locator.exists::<Subscriber>("mobile", &mobile).await.unwrap() {
        Existence::Existing(subscriber) => assert_eq!(subscriber.first_name, "Asha"),
        Existence::Unique => panic!("subscriber should exist"),
    }
    assert!(locator.get_one::<Subscriber>("mobile", &mobile).await.unwrap().is_some());
    assert_eq!(locator.get_all::<Subscriber>("mobile", &mobile).await.unwrap().len(), 1);
}

// =============================================================================
// PROXIMITY SEARCH
// =============================================================================

#[tokio::test]
#[ignore] // Requires database connection
async fn test_search_nearby_filters_and_orders() {
    let db = test_pool().await;
    let suffix = unique_suffix();
    // Remote spot so stores from other tests stay out of range
    let origin = GeoPoint::new(-45.0, -150.0).unwrap();
    let km_per_degree = database_layer::EARTH_RADIUS_KM.to_radians();

    let near = format!("61{:0>8}", suffix);
    let mid = format!("62{:0>8}", suffix);
    let far = format!("63{:0>8}", suffix);
    seed_store(&db, &format!("NEAR{suffix}"), &near, -45.0 + 1.0 / km_per_degree, -150.0).await;
    seed_store(&db, &format!("MID{suffix}"), &mid, -45.0 + 4.9 / km_per_degree, -150.0).await;
    seed_store(&db, &format!("FAR{suffix}"), &far, -45.0 + 5.1 / km_per_degree, -150.0).await;

    let repo = GeographicRepository::new(db.pool().clone());
    let found: Vec<_> = repo
        .search_nearby(origin, 5.0)
        .await
        .unwrap()
        .into_iter()
        .filter(|s| [&near, &mid, &far].contains(&&s.mobile))
        .collect();

    let mobiles: Vec<&str> = found.iter().map(|s| s.mobile.as_str()).collect();
    assert_eq!(mobiles, vec![near.as_str(), mid.as_str()]);
    assert!(found.windows(2).all(|w| w[0].distance_km <= w[1].distance_km));

    let store = RecordLocator::new(db.pool().clone())
        .get_one::<Store>("mobile", &near)
        .await
        .unwrap()
        .unwrap();
    assert!(store.offers_home_delivery());
}

#[tokio::test]
#[ignore] // Requires database connection
async fn test_search_nearby_empty_is_not_error() {
    let db = test_pool().await;
    let repo = GeographicRepository::new(db.pool().clone());
    // Middle of the South Pacific, nothing seeded there
    let stores = repo
        .search_nearby(GeoPoint::new(-48.8767, -123.3933).unwrap(), 0.5)
        .await
        .unwrap();
    assert!(stores.is_empty());
}
