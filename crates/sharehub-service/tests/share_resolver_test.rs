//! Integration tests for share creation, resolution, and propagation.

mod helpers;

use helpers::{TestApp, ctx, user};
use sharehub_core::error::ErrorKind;
use sharehub_core::traits::FileSystem;
use sharehub_entity::share::{NewShareRecord, ShareOutcome};

fn record(owner: &str, to: &str, source: &str, target: &str) -> NewShareRecord {
    NewShareRecord {
        owner_id: user(owner),
        shared_with: user(to),
        source: source.to_string(),
        target: target.to_string(),
        is_writeable: false,
    }
}

#[tokio::test]
async fn test_resolve_file_inside_shared_folder() {
    let app = TestApp::new();
    app.share("alice", "/alice/files/Docs", &["bob"], true).await;

    let resolved = app
        .resolver
        .resolve_source(&ctx("bob"), "/bob/files/Share/Docs/notes.txt")
        .await
        .unwrap()
        .expect("notes.txt should be covered by Docs");

    assert_eq!(resolved.source, "/alice/files/Docs/notes.txt");
    assert_eq!(resolved.owner_id, user("alice"));
    assert_eq!(resolved.covering_target, "/bob/files/Share/Docs");
    assert!(resolved.is_writeable);
    assert!(resolved.inherited);
    assert_eq!(app.store.len().await, 1);
}

#[tokio::test]
async fn test_exact_match_returns_source_verbatim() {
    let app = TestApp::new();
    app.share("alice", "/alice/files/Docs", &["bob"], false).await;

    let resolved = app
        .resolver
        .resolve_source(&ctx("bob"), "/bob//files/Share/Docs/")
        .await
        .unwrap()
        .expect("exact target should resolve");

    assert_eq!(resolved.source, "/alice/files/Docs");
    assert!(!resolved.inherited);
    assert!(!resolved.is_writeable);
}

#[tokio::test]
async fn test_suffix_substitution_for_deep_paths() {
    let app = TestApp::new();
    app.share("alice", "/alice/files/Photos", &["bob"], false).await;

    for suffix in ["/2023", "/2023/summer", "/2023/summer/beach.jpg"] {
        let target = format!("/bob/files/Share/Photos{suffix}");
        assert_eq!(
            app.source_of("bob", &target).await,
            Some(format!("/alice/files/Photos{suffix}"))
        );
    }
}

#[tokio::test]
async fn test_nearest_ancestor_wins() {
    let app = TestApp::new();
    app.share("alice", "/alice/files/A", &["bob"], false).await;
    app.share("carol", "/carol/files/A/B", &["bob"], true)
        .await;
    // carol's share lands at /bob/files/Share/A/B, nested inside alice's folder.

    let resolved = app
        .resolver
        .resolve_source(&ctx("bob"), "/bob/files/Share/A/B/c.txt")
        .await
        .unwrap()
        .expect("covered");
    assert_eq!(resolved.source, "/carol/files/A/B/c.txt");
    assert_eq!(resolved.owner_id, user("carol"));
    assert!(resolved.is_writeable);

    assert_eq!(
        app.source_of("bob", "/bob/files/Share/A/other.txt").await,
        Some("/alice/files/A/other.txt".to_string())
    );
}

#[tokio::test]
async fn test_walk_never_reaches_user_root() {
    let app = TestApp::new();
    // A record sitting exactly at bob's storage root must never cover anything.
    app.store
        .import([record("alice", "bob", "/alice/files/Docs", "/bob/files").into_record()])
        .await;

    assert_eq!(app.source_of("bob", "/bob/files/Photos/a.jpg").await, None);
    assert!(
        app.resolver
            .resolve_ancestor(&ctx("bob"), "/bob/files/Photos")
            .await
            .unwrap()
            .is_none()
    );
    assert!(
        app.resolver
            .resolve_ancestor(&ctx("bob"), "/bob/files")
            .await
            .unwrap()
            .is_none()
    );
}

#[tokio::test]
async fn test_resolution_is_scoped_to_requester() {
    let app = TestApp::new();
    app.share("alice", "/alice/files/Docs", &["bob"], true).await;

    assert_eq!(
        app.source_of("carol", "/bob/files/Share/Docs/notes.txt").await,
        None
    );
    assert!(
        !app.resolver
            .is_writeable(&ctx("carol"), "/bob/files/Share/Docs/notes.txt")
            .await
            .unwrap()
    );
}

#[tokio::test]
async fn test_unshared_path_is_not_writeable() {
    let app = TestApp::new();
    assert!(
        !app.resolver
            .is_writeable(&ctx("bob"), "/bob/files/Share/Nothing")
            .await
            .unwrap()
    );
}

#[tokio::test]
async fn test_set_writeable_round_trip() {
    let app = TestApp::new();
    app.share("alice", "/alice/files/Docs", &["bob"], true).await;
    let bob = ctx("bob");

    assert!(app.resolver.is_writeable(&bob, "/bob/files/Share/Docs").await.unwrap());
    assert!(
        app.resolver
            .is_writeable(&bob, "/bob/files/Share/Docs/sub/file.txt")
            .await
            .unwrap()
    );

    let affected = app
        .resolver
        .set_writeable(&ctx("alice"), "/alice/files/Docs", &[user("bob")], false)
        .await
        .unwrap();
    assert_eq!(affected, 1);

    assert!(!app.resolver.is_writeable(&bob, "/bob/files/Share/Docs").await.unwrap());
    assert!(
        !app.resolver
            .is_writeable(&bob, "/bob/files/Share/Docs/sub/file.txt")
            .await
            .unwrap()
    );
}

#[tokio::test]
async fn test_set_writeable_only_touches_named_recipient() {
    let app = TestApp::new();
    app.share("alice", "/alice/files/Docs", &["bob", "carol"], true)
        .await;

    app.resolver
        .set_writeable(&ctx("alice"), "/alice/files/Docs", &[user("bob")], false)
        .await
        .unwrap();

    assert!(
        !app.resolver
            .is_writeable(&ctx("bob"), "/bob/files/Share/Docs")
            .await
            .unwrap()
    );
    assert!(
        app.resolver
            .is_writeable(&ctx("carol"), "/carol/files/Share/Docs")
            .await
            .unwrap()
    );
}

#[tokio::test]
async fn test_move_target_preserves_resolution() {
    let app = TestApp::new();
    app.share("alice", "/alice/files/Docs", &["bob"], false).await;
    app.share("alice", "/alice/files/Docs/Sub", &["bob"], true)
        .await;

    let before = app.source_of("bob", "/bob/files/Share/Docs/x").await;
    let before_nested = app.source_of("bob", "/bob/files/Share/Docs/Sub/y").await;

    let moved = app
        .resolver
        .move_target(&ctx("bob"), "/bob/files/Share/Docs", "/bob/files/Work/Docs")
        .await
        .unwrap();
    assert_eq!(moved, 2);

    assert_eq!(app.source_of("bob", "/bob/files/Work/Docs/x").await, before);
    assert_eq!(
        app.source_of("bob", "/bob/files/Work/Docs/Sub/y").await,
        before_nested
    );
    assert_eq!(app.source_of("bob", "/bob/files/Share/Docs/x").await, None);
}

#[tokio::test]
async fn test_move_target_does_not_touch_sibling_prefixes() {
    let app = TestApp::new();
    app.share("alice", "/alice/files/Docs", &["bob"], false).await;
    app.share("alice", "/alice/files/Docs2", &["bob"], false).await;

    app.resolver
        .move_target(&ctx("bob"), "/bob/files/Share/Docs", "/bob/files/Archive")
        .await
        .unwrap();

    assert_eq!(
        app.source_of("bob", "/bob/files/Share/Docs2").await,
        Some("/alice/files/Docs2".to_string())
    );
}

#[tokio::test]
async fn test_move_source_keeps_recipients_consistent() {
    let app = TestApp::new();
    app.share("alice", "/alice/files/Docs", &["bob", "carol"], false)
        .await;

    let moved = app
        .resolver
        .move_source(&ctx("alice"), "/alice/files/Docs", "/alice/files/Archive/Docs")
        .await
        .unwrap();
    assert_eq!(moved, 2);

    assert_eq!(
        app.source_of("bob", "/bob/files/Share/Docs/a.txt").await,
        Some("/alice/files/Archive/Docs/a.txt".to_string())
    );
    assert_eq!(
        app.source_of("carol", "/carol/files/Share/Docs").await,
        Some("/alice/files/Archive/Docs".to_string())
    );
}

#[tokio::test]
async fn test_move_source_scoped_to_owner() {
    let app = TestApp::new();
    app.share("alice", "/alice/files/Docs", &["bob"], false).await;

    let err = app
        .resolver
        .move_source(&ctx("mallory"), "/alice/files/Docs", "/mallory/files/Docs")
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Validation);
    assert_eq!(
        app.source_of("bob", "/bob/files/Share/Docs").await,
        Some("/alice/files/Docs".to_string())
    );
}

#[tokio::test]
async fn test_pull_out_of_folder_materializes_record() {
    let app = TestApp::new();
    app.share("alice", "/alice/files/Docs", &["bob"], true).await;

    let record = app
        .resolver
        .pull_out_of_folder(
            &ctx("bob"),
            "/bob/files/Share/Docs/report.pdf",
            "/bob/files/Reports/report.pdf",
        )
        .await
        .unwrap();

    assert_eq!(record.source, "/alice/files/Docs/report.pdf");
    assert_eq!(record.owner_id, user("alice"));
    assert_eq!(record.shared_with, user("bob"));
    assert!(record.is_writeable);

    let resolved = app
        .resolver
        .resolve_source(&ctx("bob"), "/bob/files/Reports/report.pdf")
        .await
        .unwrap()
        .expect("pulled-out item resolves");
    assert_eq!(resolved.source, "/alice/files/Docs/report.pdf");
    assert!(!resolved.inherited);
    assert!(resolved.is_writeable);
}

#[tokio::test]
async fn test_pull_out_of_unshared_folder_fails() {
    let app = TestApp::new();

    let err = app
        .resolver
        .pull_out_of_folder(&ctx("bob"), "/bob/files/Loose/a.txt", "/bob/files/a.txt")
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::NotShared);
}

#[tokio::test]
async fn test_unshare_from_self_leaves_owner_view() {
    let app = TestApp::new();
    app.share("alice", "/alice/files/Docs", &["bob", "carol"], false)
        .await;

    let removed = app
        .resolver
        .unshare_from_self(&ctx("bob"), "/bob/files/Share/Docs")
        .await
        .unwrap();
    assert_eq!(removed, 1);

    assert_eq!(app.source_of("bob", "/bob/files/Share/Docs/x").await, None);
    assert_eq!(
        app.source_of("carol", "/carol/files/Share/Docs/x").await,
        Some("/alice/files/Docs/x".to_string())
    );

    let owned = app.resolver.list_owned_shares(&ctx("alice")).await.unwrap();
    assert_eq!(owned.len(), 1);
    assert_eq!(owned[0].shared_with, user("carol"));
    assert_eq!(owned[0].source, "/alice/files/Docs");
    assert!(app.fs.exists("/alice/files/Docs").await.unwrap());
}

#[tokio::test]
async fn test_unshare_removes_nested_records_for_named_recipients() {
    let app = TestApp::new();
    app.share("alice", "/alice/files/Docs", &["bob", "carol"], false)
        .await;
    app.share("alice", "/alice/files/Docs/Sub", &["bob"], true)
        .await;

    let removed = app
        .resolver
        .unshare(&ctx("alice"), "/alice/files/Docs", &[user("bob")])
        .await
        .unwrap();
    assert_eq!(removed, 2);

    assert_eq!(app.source_of("bob", "/bob/files/Share/Docs/Sub").await, None);
    assert!(app.source_of("carol", "/carol/files/Share/Docs").await.is_some());
}

#[tokio::test]
async fn test_list_owned_shares_is_explicit_only() {
    let app = TestApp::new();
    app.share("alice", "/alice/files/Docs", &["bob"], true).await;
    app.share("alice", "/alice/files/Photos", &["bob"], false).await;
    app.share("carol", "/carol/files/Music", &["bob"], false).await;

    let owned = app.resolver.list_owned_shares(&ctx("alice")).await.unwrap();
    let sources: Vec<&str> = owned.iter().map(|s| s.source.as_str()).collect();
    assert_eq!(sources, vec!["/alice/files/Docs", "/alice/files/Photos"]);
    assert!(owned[0].is_writeable);
    assert!(!owned[1].is_writeable);
}

#[tokio::test]
async fn test_list_within_folder() {
    let app = TestApp::new();
    app.share("alice", "/alice/files/Docs", &["bob"], false).await;
    app.share("alice", "/alice/files/Docs/Sub", &["bob"], true)
        .await;
    app.share("carol", "/carol/files/Music", &["bob"], false).await;

    let nested = app
        .resolver
        .list_within_folder(&ctx("bob"), "/bob/files/Share/Docs/")
        .await
        .unwrap();
    assert_eq!(nested.len(), 1);
    assert_eq!(nested[0].target, "/bob/files/Share/Docs/Sub");
    assert_eq!(nested[0].source, "/alice/files/Docs/Sub");
    assert_eq!(nested[0].owner_id, user("alice"));

    let everything = app
        .resolver
        .list_within_folder(&ctx("bob"), "/bob/files")
        .await
        .unwrap();
    assert_eq!(everything.len(), 3);
}

#[tokio::test]
async fn test_create_rejects_missing_or_unreadable_source() {
    let app = TestApp::new();

    let err = app
        .resolver
        .create(&ctx("alice"), "/alice/files/Ghost", &[user("bob")], false, false)
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Validation);

    app.fs.add("/alice/files/Secret");
    app.fs.deny_read("/alice/files/Secret");
    let err = app
        .resolver
        .create(&ctx("alice"), "/alice/files/Secret", &[user("bob")], false, false)
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Validation);
    assert!(app.store.is_empty().await);
}

#[tokio::test]
async fn test_create_rejects_source_outside_owner_files() {
    let app = TestApp::new();
    app.fs.add("/bob/files/Docs");

    let err = app
        .resolver
        .create(&ctx("alice"), "/bob/files/Docs", &[user("carol")], false, false)
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Validation);
}

#[tokio::test]
async fn test_create_duplicate_target_conflicts() {
    let app = TestApp::new();
    app.share("alice", "/alice/files/Docs", &["bob"], false).await;
    app.fs.add("/carol/files/Docs");

    let err = app
        .resolver
        .create(&ctx("carol"), "/carol/files/Docs", &[user("bob")], false, false)
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Conflict);
    assert_eq!(app.store.len().await, 1);
}

#[tokio::test]
async fn test_create_targets_per_recipient() {
    let app = TestApp::new();
    app.fs.add("/alice/files/Projects/2024");

    let outcome = app
        .resolver
        .create(
            &ctx("alice"),
            "/alice/files/Projects/2024/",
            &[user("bob"), user("carol")],
            true,
            false,
        )
        .await
        .unwrap();

    let ShareOutcome::Shared { records } = outcome else {
        panic!("expected records, got {outcome:?}");
    };
    let targets: Vec<&str> = records.iter().map(|r| r.target.as_str()).collect();
    assert_eq!(
        targets,
        vec![
            "/bob/files/Share/Projects/2024",
            "/carol/files/Share/Projects/2024"
        ]
    );
    assert!(records.iter().all(|r| r.source == "/alice/files/Projects/2024"));
}

#[tokio::test]
async fn test_create_public_link_persists_nothing() {
    let app = TestApp::new();
    app.fs.add("/alice/files/Docs");

    let outcome = app
        .resolver
        .create(&ctx("alice"), "/alice/files/Docs", &[], false, true)
        .await
        .unwrap();

    let ShareOutcome::PublicLink(link) = outcome else {
        panic!("expected a public link, got {outcome:?}");
    };
    assert_eq!(link.source, "/alice/files/Docs");
    assert_eq!(link.token.len(), 64);
    assert!(app.store.is_empty().await);
}

#[tokio::test]
async fn test_create_requires_recipients() {
    let app = TestApp::new();
    app.fs.add("/alice/files/Docs");

    let err = app
        .resolver
        .create(&ctx("alice"), "/alice/files/Docs", &[], false, false)
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Validation);
}

#[tokio::test]
async fn test_move_target_rejects_paths_outside_requester_files() {
    let app = TestApp::new();
    app.share("alice", "/alice/files/Docs", &["bob"], false).await;
    app.share("alice", "/alice/files/Docs/Sub", &["bob"], false)
        .await;
    let bob = ctx("bob");

    for new_target in ["/", "/bob", "/bob/files", "/carol/files/Docs"] {
        let err = app
            .resolver
            .move_target(&bob, "/bob/files/Share/Docs", new_target)
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Validation, "moving to {new_target}");
    }

    let err = app
        .resolver
        .move_target(&bob, "/", "/bob/files/Moved")
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Validation);

    let nested = app
        .resolver
        .list_within_folder(&bob, "/bob/files/Share/Docs")
        .await
        .unwrap();
    assert_eq!(nested.len(), 1);
    assert_eq!(nested[0].target, "/bob/files/Share/Docs/Sub");
    assert_eq!(
        app.source_of("bob", "/bob/files/Share/Docs/Sub/x").await,
        Some("/alice/files/Docs/Sub/x".to_string())
    );
}

#[tokio::test]
async fn test_move_source_rejects_paths_outside_owner_files() {
    let app = TestApp::new();
    app.share("alice", "/alice/files/Docs", &["bob"], false).await;
    let alice = ctx("alice");

    for (old, new) in [
        ("/alice/files/Docs", "/"),
        ("/alice/files/Docs", "/alice/files"),
        ("/", "/alice/files/Docs"),
    ] {
        let err = app.resolver.move_source(&alice, old, new).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Validation, "moving {old} to {new}");
    }

    assert_eq!(
        app.source_of("bob", "/bob/files/Share/Docs").await,
        Some("/alice/files/Docs".to_string())
    );
}

#[tokio::test]
async fn test_pull_out_rejects_target_outside_requester_files() {
    let app = TestApp::new();
    app.share("alice", "/alice/files/Docs", &["bob"], false).await;

    let err = app
        .resolver
        .pull_out_of_folder(&ctx("bob"), "/bob/files/Share/Docs/a.txt", "/carol/files/a.txt")
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Validation);
    assert_eq!(app.store.len().await, 1);
}

#[tokio::test]
async fn test_duplicate_records_surface_as_ambiguous() {
    let app = TestApp::new();
    app.store
        .import([
            record("alice", "bob", "/alice/files/Docs", "/bob/files/Share/Docs").into_record(),
            record("carol", "bob", "/carol/files/Docs", "/bob/files/Share/Docs").into_record(),
        ])
        .await;
    let bob = ctx("bob");

    let err = app
        .resolver
        .resolve_source(&bob, "/bob/files/Share/Docs")
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::AmbiguousMatch);

    let err = app
        .resolver
        .resolve_source(&bob, "/bob/files/Share/Docs/notes.txt")
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::AmbiguousMatch);

    let err = app
        .resolver
        .is_writeable(&bob, "/bob/files/Share/Docs/notes.txt")
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::AmbiguousMatch);
}
