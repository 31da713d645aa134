use chrono::{TimeZone, Utc};
use uuid::Uuid;

use duelog::db::models::{
    CoinFace, Initiative, InitiativeMethod, MatchResult, NewDeck, NewMatch, NewProject, NewTag,
    TagRef, TurnOrder,
};
use duelog::{Database, StoreError};

fn temp_db_path() -> std::path::PathBuf {
    std::env::temp_dir().join(format!("duelog-test-{}.sqlite3", Uuid::new_v4()))
}

fn new_match(project_id: &str, tags: Vec<TagRef>) -> NewMatch {
    NewMatch {
        project_id: project_id.to_string(),
        played_at: Utc.timestamp_opt(1_700_000_000, 0).unwrap(),
        result: MatchResult::Win,
        turn_order: TurnOrder::First,
        initiative: Initiative {
            method: InitiativeMethod::Coin,
            value: Some(CoinFace::Heads),
        },
        rating: Some(1500.0),
        my_deck_id: None,
        my_deck_name: "Sky Striker".to_string(),
        op_deck_name: "Branded".to_string(),
        tags,
        note: None,
    }
}

#[tokio::test]
async fn tags_flat_stays_in_sync_through_writes() {
    let db = Database::new(temp_db_path()).unwrap();

    let record = db
        .add_match(new_match(
            "p1",
            vec![
                TagRef {
                    tag_id: None,
                    tag_name: "aggro".to_string(),
                },
                TagRef {
                    tag_id: None,
                    tag_name: String::new(),
                },
                TagRef {
                    tag_id: None,
                    tag_name: "aggro".to_string(),
                },
            ],
        ))
        .await
        .unwrap();
    assert_eq!(record.tags_flat, vec!["aggro"]);

    let mut edited = record.clone();
    edited.tags.push(TagRef {
        tag_id: None,
        tag_name: "control".to_string(),
    });
    // stale derived field on purpose; the store must recompute it
    edited.tags_flat.clear();
    let updated = db.update_match(edited).await.unwrap();
    assert_eq!(updated.tags_flat, vec!["aggro", "control"]);

    let fetched = db.get_match(&record.id).await.unwrap().unwrap();
    assert_eq!(fetched.tags_flat, vec!["aggro", "control"]);
}

#[tokio::test]
async fn deleting_a_tag_cascades_without_losing_names() {
    let db = Database::new(temp_db_path()).unwrap();

    let tag = db
        .add_tag(NewTag {
            name: "meta".to_string(),
            color: None,
            description: None,
        })
        .await
        .unwrap();

    let tagged = db
        .add_match(new_match(
            "p1",
            vec![TagRef {
                tag_id: Some(tag.id.clone()),
                tag_name: tag.name.clone(),
            }],
        ))
        .await
        .unwrap();
    let untagged = db.add_match(new_match("p1", Vec::new())).await.unwrap();

    db.delete_tag(&tag.id).await.unwrap();

    let after = db.get_match(&tagged.id).await.unwrap().unwrap();
    assert_eq!(after.tags.len(), 1);
    assert_eq!(after.tags[0].tag_id, None);
    assert_eq!(after.tags[0].tag_name, "meta");
    assert_eq!(after.tags_flat, vec!["meta"]);
    assert!(after.updated_at > tagged.updated_at);

    // matches with no matching reference are not rewritten
    let untouched = db.get_match(&untagged.id).await.unwrap().unwrap();
    assert_eq!(untouched.updated_at, untagged.updated_at);

    assert!(db.list_tags().await.unwrap().is_empty());
}

#[tokio::test]
async fn renaming_a_tag_leaves_match_snapshots_alone() {
    let db = Database::new(temp_db_path()).unwrap();

    let tag = db
        .add_tag(NewTag {
            name: "stall".to_string(),
            color: None,
            description: None,
        })
        .await
        .unwrap();
    let record = db
        .add_match(new_match(
            "p1",
            vec![TagRef {
                tag_id: Some(tag.id.clone()),
                tag_name: tag.name.clone(),
            }],
        ))
        .await
        .unwrap();

    let renamed = db.rename_tag(&tag.id, "control".to_string()).await.unwrap();
    assert_eq!(renamed.name, "control");

    let after = db.get_match(&record.id).await.unwrap().unwrap();
    assert_eq!(after.tags[0].tag_name, "stall");
    assert_eq!(after.tags_flat, vec!["stall"]);
}

#[tokio::test]
async fn reopening_at_the_same_version_writes_nothing() {
    let path = temp_db_path();

    let db = Database::new(path.clone()).unwrap();
    let meta_first = db.get_meta().await.unwrap();
    drop(db);

    let db = Database::new(path).unwrap();
    let meta_second = db.get_meta().await.unwrap();

    assert_eq!(meta_first.schema_version, meta_second.schema_version);
    assert_eq!(meta_first.created_at, meta_second.created_at);
    assert_eq!(meta_first.updated_at, meta_second.updated_at);
}

#[tokio::test]
async fn refuses_a_database_from_the_future() {
    let path = temp_db_path();
    {
        let conn = rusqlite::Connection::open(&path).unwrap();
        conn.pragma_update(None, "user_version", 99).unwrap();
    }

    assert!(Database::new(path).is_err());
}

#[tokio::test]
async fn soft_delete_hides_restore_brings_back() {
    let db = Database::new(temp_db_path()).unwrap();

    let record = db.add_match(new_match("p1", Vec::new())).await.unwrap();
    db.set_match_deleted(&record.id, true).await.unwrap();

    assert!(db.list_matches_by_project("p1").await.unwrap().is_empty());
    let all = db.list_all_matches_by_project("p1").await.unwrap();
    assert_eq!(all.len(), 1);
    assert!(all[0].deleted);

    db.set_match_deleted(&record.id, false).await.unwrap();
    assert_eq!(db.list_matches_by_project("p1").await.unwrap().len(), 1);
}

#[tokio::test]
async fn project_listings_sort_by_played_at() {
    let db = Database::new(temp_db_path()).unwrap();

    for (i, secs) in [300i64, 100, 200].iter().enumerate() {
        let mut input = new_match("p1", Vec::new());
        input.played_at = Utc.timestamp_opt(1_700_000_000 + secs, 0).unwrap();
        input.op_deck_name = format!("opponent-{i}");
        db.add_match(input).await.unwrap();
    }

    let listed = db.list_matches_by_project("p1").await.unwrap();
    let instants: Vec<_> = listed.iter().map(|m| m.played_at).collect();
    let mut sorted = instants.clone();
    sorted.sort();
    assert_eq!(instants, sorted);
}

#[tokio::test]
async fn tag_name_lookup_uses_the_flat_index() {
    let db = Database::new(temp_db_path()).unwrap();

    let tag = db
        .add_tag(NewTag {
            name: "otk".to_string(),
            color: None,
            description: None,
        })
        .await
        .unwrap();
    let record = db
        .add_match(new_match(
            "p1",
            vec![TagRef {
                tag_id: Some(tag.id.clone()),
                tag_name: tag.name.clone(),
            }],
        ))
        .await
        .unwrap();
    db.add_match(new_match("p1", Vec::new())).await.unwrap();

    let hits = db.list_matches_by_tag_name("otk").await.unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].id, record.id);

    // names survive tag deletion, so the index keeps answering
    db.delete_tag(&tag.id).await.unwrap();
    assert_eq!(db.list_matches_by_tag_name("otk").await.unwrap().len(), 1);
}

#[tokio::test]
async fn updates_on_missing_records_report_not_found() {
    let db = Database::new(temp_db_path()).unwrap();

    let ghost = db.add_match(new_match("p1", Vec::new())).await.unwrap();
    let mut missing = ghost.clone();
    missing.id = "no-such-id".to_string();

    let err = db.update_match(missing).await.unwrap_err();
    assert!(matches!(
        err.downcast_ref::<StoreError>(),
        Some(StoreError::NotFound { .. })
    ));

    let err = db
        .set_match_deleted("no-such-id", true)
        .await
        .unwrap_err();
    assert!(matches!(
        err.downcast_ref::<StoreError>(),
        Some(StoreError::NotFound { .. })
    ));

    let err = db
        .rename_tag("no-such-id", "x".to_string())
        .await
        .unwrap_err();
    assert!(matches!(
        err.downcast_ref::<StoreError>(),
        Some(StoreError::NotFound { .. })
    ));
}

#[tokio::test]
async fn deck_edits_never_touch_match_snapshots() {
    let db = Database::new(temp_db_path()).unwrap();

    let deck = db
        .add_deck(NewDeck {
            name: "Sky Striker".to_string(),
            color: Some("#7aa2f7".to_string()),
            labels: vec!["control".to_string()],
            favorite: true,
            note: None,
        })
        .await
        .unwrap();

    let mut input = new_match("p1", Vec::new());
    input.my_deck_id = Some(deck.id.clone());
    input.my_deck_name = deck.name.clone();
    let record = db.add_match(input).await.unwrap();

    let mut renamed = deck.clone();
    renamed.name = "Azamina".to_string();
    db.update_deck(renamed).await.unwrap();
    db.delete_deck(&deck.id).await.unwrap();

    let after = db.get_match(&record.id).await.unwrap().unwrap();
    assert_eq!(after.my_deck_name, "Sky Striker");
    assert_eq!(after.my_deck_id, Some(deck.id));
}

#[tokio::test]
async fn projects_create_list_and_hard_delete() {
    let db = Database::new(temp_db_path()).unwrap();

    let project = db
        .add_project(NewProject {
            name: "Season 30".to_string(),
            description: String::new(),
            period: None,
        })
        .await
        .unwrap();
    let record = db.add_match(new_match(&project.id, Vec::new())).await.unwrap();

    db.delete_project(&project.id).await.unwrap();
    assert!(db.list_projects().await.unwrap().is_empty());

    // matches survive project deletion
    let orphan = db.get_match(&record.id).await.unwrap().unwrap();
    assert_eq!(orphan.project_id, project.id);
}
