//! End-to-end provider tests against a scripted API.

mod common;

use assert_matches::assert_matches;
use chrono::NaiveDate;
use tokio_util::sync::CancellationToken;

use common::*;
use tubemeta::library::{LibraryItem, StaticLibrary};
use tubemeta::metadata::providers::youtube::PROVIDER_ID_KEY;
use tubemeta::metadata::MetadataProvider;
use tubemeta::Error;
use tubemeta_common::{PersonInfo, PersonRole};

#[tokio::test]
async fn resolves_and_maps_video() {
    let h = TestHarness::new(ScriptedApi::new(vec![success(vec![video(
        "T",
        "D",
        "2020-01-02T00:00:00Z",
        "C",
    )])]));

    let result = h
        .provider
        .get_metadata(TITLE, &CancellationToken::new())
        .await;

    assert!(result.has_metadata);
    let item = result.item.unwrap();
    assert_eq!(item.title, "T");
    assert_eq!(item.overview.as_deref(), Some("D"));
    assert_eq!(item.production_year, Some(2020));
    assert_eq!(item.premiere_date, NaiveDate::from_ymd_opt(2020, 1, 2));
    assert_eq!(item.provider_ids[PROVIDER_ID_KEY], VIDEO_ID);
    assert_eq!(
        result.people,
        vec![PersonInfo {
            name: "C".into(),
            role: PersonRole::Director,
        }]
    );

    assert_eq!(h.api.calls(), 1);
    assert!(h.record_path().exists());
}

#[tokio::test]
async fn second_lookup_is_served_from_cache() {
    let h = TestHarness::new(ScriptedApi::new(vec![success(vec![video(
        "T",
        "D",
        "2020-01-02T00:00:00Z",
        "C",
    )])]));
    let cancel = CancellationToken::new();

    let first = h.provider.get_metadata(TITLE, &cancel).await;
    let second = h.provider.get_metadata(TITLE, &cancel).await;

    assert_eq!(first, second);
    assert_eq!(h.api.calls(), 1);
}

#[tokio::test]
async fn missing_video_is_empty() {
    let h = TestHarness::new(ScriptedApi::new(vec![success(Vec::new())]));

    let result = h
        .provider
        .try_get_metadata(TITLE, &CancellationToken::new())
        .await
        .unwrap();

    assert!(!result.has_metadata);
    assert!(result.item.is_none());
    assert!(result.people.is_empty());
    assert!(!h.record_path().exists());
}

#[tokio::test]
async fn file_without_token_skips_fetch() {
    let library = StaticLibrary::new(vec![LibraryItem::new(
        "Holiday",
        "/media/home/Holiday.mkv",
    )]);
    let h = TestHarness::with_library(ScriptedApi::new(Vec::new()), library);

    let result = h
        .provider
        .try_get_metadata("Holiday", &CancellationToken::new())
        .await
        .unwrap();

    assert!(!result.has_metadata);
    assert_eq!(h.api.calls(), 0);
}

#[tokio::test]
async fn unknown_title_is_reported_then_swallowed() {
    let h = TestHarness::with_library(ScriptedApi::new(Vec::new()), StaticLibrary::default());
    let cancel = CancellationToken::new();

    let err = h
        .provider
        .try_get_metadata("Nowhere", &cancel)
        .await
        .unwrap_err();
    assert_matches!(err, Error::LibraryLookupEmpty { ref title } if title == "Nowhere");

    let result = h.provider.get_metadata("Nowhere", &cancel).await;
    assert!(!result.has_metadata);
    assert_eq!(h.api.calls(), 0);
}

#[tokio::test]
async fn cancelled_lookup_is_empty() {
    let h = TestHarness::new(ScriptedApi::new(vec![success(vec![video(
        "T",
        "D",
        "2020-01-02T00:00:00Z",
        "C",
    )])]));
    let cancel = CancellationToken::new();
    cancel.cancel();

    let err = h
        .provider
        .try_get_metadata(TITLE, &cancel)
        .await
        .unwrap_err();
    assert!(err.is_cancelled());

    let result = h.provider.get_metadata(TITLE, &cancel).await;
    assert!(!result.has_metadata);
    assert!(!h.record_path().exists());
}

#[tokio::test]
async fn stale_record_survives_failed_refresh() {
    let h = TestHarness::new(ScriptedApi::new(vec![server_error()]));
    h.seed_record(&video("Old", "", "2019-06-01T12:00:00Z", ""), THREE_DAYS);

    let result = h
        .provider
        .get_metadata(TITLE, &CancellationToken::new())
        .await;

    assert!(result.has_metadata);
    let item = result.item.unwrap();
    assert_eq!(item.title, "Old");
    assert_eq!(item.overview, None);
    assert_eq!(item.production_year, Some(2019));
    assert!(result.people.is_empty());
    assert_eq!(h.api.calls(), 1);
}

#[tokio::test]
async fn deleted_video_is_empty_despite_stale_record() {
    let h = TestHarness::new(ScriptedApi::new(vec![success(Vec::new())]));
    h.seed_record(&video("Old", "D", "2019-06-01T12:00:00Z", "C"), THREE_DAYS);

    let result = h
        .provider
        .try_get_metadata(TITLE, &CancellationToken::new())
        .await
        .unwrap();

    assert!(!result.has_metadata);
    assert!(result.item.is_none());
    assert_eq!(h.api.calls(), 1);
    assert!(h.record_path().exists());
}

#[test]
fn provider_identity() {
    let h = TestHarness::new(ScriptedApi::new(Vec::new()));
    assert_eq!(h.provider.name(), "YouTube Metadata");
    assert!(h.provider.is_available());
}
