mod support;

use std::sync::Arc;

use inkbridge_core::{
    CatalogKind, ConfigError, ExportError, ExporterConfig, IdScheme, SessionKind, StatInkExporter,
    Transport, session_uuid,
};
use support::{
    ABILITY_PATH, BATTLE_PATH, FakeStatInk, SALMON_WEAPON_PATH, STAGE_PATH, Yielding, config,
    exporter, session,
};

const TURF: &str = include_str!("fixtures/versus_turf.json");
const RANKED: &str = include_str!("fixtures/versus_ranked.json");
const COOP: &str = include_str!("fixtures/coop_regular.json");

const BATTLE_UUIDS: &str = "/api/v3/s3s/uuid-list?lobby=adaptive";
const SALMON_UUIDS: &str = "/api/v3/salmon/uuid-list";

#[tokio::test]
async fn catalogs_are_fetched_once_per_exporter() {
    let fake = FakeStatInk::with_catalogs();
    let exporter = exporter(&fake);
    let turf = session(TURF);
    let ranked = session(RANKED);
    let coop = session(COOP);

    let (a, b, c) = tokio::join!(
        exporter.map_session(&turf),
        exporter.map_session(&ranked),
        exporter.map_session(&coop),
    );
    assert!(a.is_ok() && b.is_ok() && c.is_ok());
    exporter.map_session(&turf).await.unwrap();

    assert_eq!(fake.count("GET", STAGE_PATH), 1);
    assert_eq!(fake.count("GET", ABILITY_PATH), 1);
    assert_eq!(fake.count("GET", SALMON_WEAPON_PATH), 1);
}

#[tokio::test]
async fn catalog_fetches_never_overlap_across_categories() {
    let fake = FakeStatInk::with_catalogs();
    fake.respond("GET", "/api/v3/weapon", 200, "[]");
    fake.respond("GET", "/api/v3/special", 200, "[]");
    let transport = Yielding::new(Arc::clone(&fake));
    let exporter =
        StatInkExporter::new(&config(), Arc::clone(&transport) as Arc<dyn Transport>).unwrap();
    let catalog = exporter.catalog();

    let (stage, weapon, ability, special, salmon) = tokio::join!(
        catalog.get_stage(),
        catalog.get_weapon(),
        catalog.get_ability(),
        catalog.get_special(),
        catalog.get_salmon_weapon(),
    );
    assert!(stage.is_ok() && weapon.is_ok() && ability.is_ok());
    assert!(special.is_ok() && salmon.is_ok());

    assert_eq!(transport.peak(), 1);
    assert_eq!(fake.requests().len(), 5);
}

#[tokio::test]
async fn every_catalog_table_is_cached_by_kind() {
    let fake = FakeStatInk::with_catalogs();
    fake.respond(
        "GET",
        "/api/v3/weapon",
        200,
        r#"[{ "key": "sshooter", "name": { "en_US": "Splattershot" }, "aliases": ["40"] }]"#,
    );
    fake.respond(
        "GET",
        "/api/v3/special",
        200,
        r#"[{ "key": "nicedama", "name": { "en_US": "Booyah Bomb" } }]"#,
    );
    let exporter = exporter(&fake);
    let catalog = exporter.catalog();

    let weapons = catalog.get_weapon().await.unwrap();
    assert_eq!(weapons[0].key, "sshooter");
    assert_eq!(weapons[0].aliases, vec!["40"]);
    let specials = catalog.get_special().await.unwrap();
    assert_eq!(specials[0].name.get("en_US").map(String::as_str), Some("Booyah Bomb"));
    catalog.get_weapon().await.unwrap();
    catalog.table(CatalogKind::Special).await.unwrap();

    assert_eq!(fake.count("GET", "/api/v3/weapon"), 1);
    assert_eq!(fake.count("GET", "/api/v3/special"), 1);
    assert_eq!(catalog.get_stage().await.unwrap().len(), 2);
    assert_eq!(
        catalog.resolve_stage_key(12).await.unwrap().as_deref(),
        Some("mahimahi")
    );
    assert_eq!(catalog.resolve_stage_key(99).await.unwrap(), None);
    assert_eq!(
        catalog.resolve_salmon_weapon_key("スプラシューター").await.unwrap().as_deref(),
        Some("sshooter")
    );
    assert_eq!(catalog.resolve_ability_key("Nope").await.unwrap(), None);
}

#[tokio::test]
async fn failed_catalog_fetch_is_retried_by_next_caller() {
    let fake = FakeStatInk::with_catalogs();
    fake.fail_once("GET", STAGE_PATH);
    let exporter = exporter(&fake);
    let turf = session(TURF);

    let err = exporter.map_session(&turf).await.unwrap_err();
    assert!(matches!(err, ExportError::Transport(_)));
    assert!(exporter.map_session(&turf).await.is_ok());
    assert_eq!(fake.count("GET", STAGE_PATH), 2);
}

#[tokio::test]
async fn catalog_http_error_carries_status() {
    let fake = FakeStatInk::with_catalogs();
    fake.respond("GET", ABILITY_PATH, 503, "maintenance");
    let err = exporter(&fake)
        .map_session(&session(TURF))
        .await
        .unwrap_err();
    let ExportError::Api(api) = err else {
        panic!("expected an API error");
    };
    assert_eq!(api.status, 503);
    assert_eq!(api.raw, "maintenance");
    assert!(api.body.is_none());
    assert!(api.url.ends_with(ABILITY_PATH));
}

#[test]
fn dedup_matches_every_uuid_scheme() {
    let fake = FakeStatInk::new();
    let exporter = exporter(&fake);
    let ids: Vec<String> = ["0", "1", "2", "3"]
        .iter()
        .map(|n| {
            let mut coop = session(COOP);
            if let inkbridge_core::Session::Coop(c) = &mut coop {
                let raw = format!(
                    "CoopHistoryDetail-u-abcdefghijklmnopqrst:20230101T12121{n}_89abcdef-0123-4567-89ab-cdef0123456{n}"
                );
                c.detail.id = base64_encode(&raw);
            }
            coop.native_id().to_string()
        })
        .collect();
    let uploaded = vec![
        session_uuid(SessionKind::Coop, &ids[0], IdScheme::Canonical).unwrap(),
        session_uuid(SessionKind::Coop, &ids[1], IdScheme::TailKeyed).unwrap(),
        session_uuid(SessionKind::Coop, &ids[2], IdScheme::FullKeyed).unwrap(),
    ];
    fake.respond(
        "GET",
        SALMON_UUIDS,
        200,
        &serde_json::to_string(&uploaded).unwrap(),
    );

    let remaining = tokio_test::block_on(exporter.not_uploaded(SessionKind::Coop, &ids)).unwrap();
    assert_eq!(remaining, vec![ids[3].clone()]);
    assert_eq!(fake.count("GET", SALMON_UUIDS), 1);
    assert_eq!(fake.count("GET", BATTLE_UUIDS), 0);
}

#[test]
fn battle_dedup_uses_adaptive_list() {
    let fake = FakeStatInk::new();
    let exporter = exporter(&fake);
    let id = session(TURF).native_id().to_string();
    let uploaded = vec![session_uuid(SessionKind::Battle, &id, IdScheme::Canonical).unwrap()];
    fake.respond(
        "GET",
        BATTLE_UUIDS,
        200,
        &serde_json::to_string(&uploaded).unwrap(),
    );
    let remaining =
        tokio_test::block_on(exporter.not_uploaded(SessionKind::Battle, &[id])).unwrap();
    assert!(remaining.is_empty());
}

#[tokio::test]
async fn embedded_error_fails_even_on_200() {
    let fake = FakeStatInk::with_catalogs();
    fake.respond(
        "POST",
        BATTLE_PATH,
        200,
        r#"{ "error": { "stage": ["unknown stage"] } }"#,
    );
    let err = exporter(&fake)
        .export_game(&session(TURF))
        .await
        .unwrap_err();
    let ExportError::Api(api) = err else {
        panic!("expected an API error");
    };
    assert_eq!(api.status, 200);
    assert!(api.body.as_ref().is_some_and(|body| body.get("error").is_some()));
    assert!(api.to_string().contains("unknown stage"));
}

#[tokio::test]
async fn rejected_upload_keeps_raw_text() {
    let fake = FakeStatInk::with_catalogs();
    fake.respond("POST", BATTLE_PATH, 400, "Bad Request");
    let err = exporter(&fake)
        .export_game(&session(TURF))
        .await
        .unwrap_err();
    let ExportError::Api(api) = err else {
        panic!("expected an API error");
    };
    assert_eq!(api.status, 400);
    assert_eq!(api.raw, "Bad Request");
    assert!(api.body.is_none());
}

#[tokio::test]
async fn accepted_upload_without_url_is_an_error() {
    let fake = FakeStatInk::with_catalogs();
    fake.respond("POST", BATTLE_PATH, 201, r#"{ "id": "x" }"#);
    let err = exporter(&fake)
        .export_game(&session(TURF))
        .await
        .unwrap_err();
    assert!(matches!(err, ExportError::Api(ref api) if api.status == 201));
}

#[test]
fn exporter_rejects_bad_configuration() {
    let transport: Arc<dyn Transport> = FakeStatInk::new();
    let short = ExporterConfig {
        api_key: Some("short".to_string()),
        ..ExporterConfig::default()
    };
    assert!(matches!(
        StatInkExporter::new(&short, Arc::clone(&transport)),
        Err(ConfigError::ApiKeyLength { len: 5 })
    ));
    assert!(matches!(
        StatInkExporter::new(&ExporterConfig::default(), Arc::clone(&transport)),
        Err(ConfigError::MissingApiKey)
    ));
    let ftp = ExporterConfig {
        endpoint: "ftp://stat.ink".to_string(),
        ..support::config()
    };
    assert!(matches!(
        StatInkExporter::new(&ftp, transport),
        Err(ConfigError::Endpoint { .. })
    ));
}

fn base64_encode(raw: &str) -> String {
    use base64::Engine as _;
    base64::engine::general_purpose::STANDARD.encode(raw)
}
