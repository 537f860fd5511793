mod common;

use common::{create_user, set_timestamps, setup};
use uuid::Uuid;
use versehub_core::{
    NewTag, PoemListQuery, PoemPatch, PoemService, PoemServiceError, PoemValidationError,
    SqlitePoemRepository, SqliteTagRepository, TagRepository,
};

#[test]
fn create_poem_defaults_to_published_with_empty_tags() {
    let conn = setup();
    let author = create_user(&conn, "alice");
    let service = PoemService::new(SqlitePoemRepository::try_new(&conn).unwrap());

    let poem = service
        .create_poem(author, "  Sonnet 18  ", "Shall I compare thee")
        .unwrap();
    assert_eq!(poem.title, "Sonnet 18");
    assert_eq!(poem.author_id, author);
    assert_eq!(poem.author_username, "alice");
    assert!(poem.is_published);
    assert!(poem.tags.is_empty());
    assert_eq!(poem.created_at, poem.updated_at);
    assert_eq!(poem.to_string(), "Sonnet 18 (alice)");
}

#[test]
fn create_poem_rejects_blank_fields_and_unknown_author() {
    let conn = setup();
    let author = create_user(&conn, "alice");
    let service = PoemService::new(SqlitePoemRepository::try_new(&conn).unwrap());

    let err = service.create_poem(author, "   ", "body").unwrap_err();
    assert!(matches!(
        err,
        PoemServiceError::InvalidInput(PoemValidationError::EmptyTitle)
    ));

    let err = service.create_poem(author, "Title", " ").unwrap_err();
    assert!(matches!(
        err,
        PoemServiceError::InvalidInput(PoemValidationError::EmptyContent)
    ));

    let ghost = Uuid::new_v4();
    let err = service.create_poem(ghost, "Title", "body").unwrap_err();
    assert!(matches!(err, PoemServiceError::AuthorNotFound(id) if id == ghost));
}

#[test]
fn update_refreshes_updated_at_but_keeps_created_at() {
    let conn = setup();
    let author = create_user(&conn, "alice");
    let service = PoemService::new(SqlitePoemRepository::try_new(&conn).unwrap());
    let poem = service.create_poem(author, "Draft", "first words").unwrap();
    set_timestamps(&conn, poem.id, 1_000, 1_000);

    let updated = service
        .update_poem(
            poem.id,
            PoemPatch {
                content: Some("second words".to_string()),
                ..PoemPatch::default()
            },
        )
        .unwrap();
    assert_eq!(updated.title, "Draft");
    assert_eq!(updated.content, "second words");
    assert_eq!(updated.created_at, 1_000);
    assert!(updated.updated_at > 1_000);
}

#[test]
fn empty_patch_is_a_no_op() {
    let conn = setup();
    let author = create_user(&conn, "alice");
    let service = PoemService::new(SqlitePoemRepository::try_new(&conn).unwrap());
    let poem = service.create_poem(author, "Fixed", "words").unwrap();
    set_timestamps(&conn, poem.id, 1_000, 1_500);

    let same = service.update_poem(poem.id, PoemPatch::default()).unwrap();
    assert_eq!(same.updated_at, 1_500);

    let err = service
        .update_poem(Uuid::new_v4(), PoemPatch::default())
        .unwrap_err();
    assert!(matches!(err, PoemServiceError::PoemNotFound(_)));
}

#[test]
fn list_is_newest_first_and_filters_unpublished() {
    let conn = setup();
    let author = create_user(&conn, "alice");
    let other = create_user(&conn, "bob");
    let service = PoemService::new(SqlitePoemRepository::try_new(&conn).unwrap());

    let old = service.create_poem(author, "Old", "x").unwrap();
    let new = service.create_poem(other, "New", "y").unwrap();
    let hidden = service
        .create_poem_with_visibility(author, "Hidden", "z", false)
        .unwrap();
    set_timestamps(&conn, old.id, 1_000, 1_000);
    set_timestamps(&conn, new.id, 3_000, 3_000);
    set_timestamps(&conn, hidden.id, 2_000, 2_000);

    let all = service.list_poems(&PoemListQuery::default()).unwrap();
    let ids: Vec<_> = all.iter().map(|poem| poem.id).collect();
    assert_eq!(ids, vec![new.id, hidden.id, old.id]);

    let published: Vec<_> = service
        .list_published()
        .unwrap()
        .into_iter()
        .map(|poem| poem.id)
        .collect();
    assert_eq!(published, vec![new.id, old.id]);

    let by_author: Vec<_> = service
        .list_poems(&PoemListQuery {
            author_id: Some(author),
            ..PoemListQuery::default()
        })
        .unwrap()
        .into_iter()
        .map(|poem| poem.id)
        .collect();
    assert_eq!(by_author, vec![hidden.id, old.id]);
}

#[test]
fn set_published_toggles_visibility() {
    let conn = setup();
    let author = create_user(&conn, "alice");
    let service = PoemService::new(SqlitePoemRepository::try_new(&conn).unwrap());
    let poem = service.create_poem(author, "Shy", "words").unwrap();

    let hidden = service.set_published(poem.id, false).unwrap();
    assert!(!hidden.is_published);
    assert!(service.list_published().unwrap().is_empty());

    let shown = service.set_published(poem.id, true).unwrap();
    assert!(shown.is_published);
}

#[test]
fn set_poem_tags_replaces_full_set_and_refreshes_updated_at() {
    let conn = setup();
    let author = create_user(&conn, "alice");
    let tags = SqliteTagRepository::try_new(&conn).unwrap();
    let elegy = tags.create_tag(&NewTag::new("elegy")).unwrap();
    let sonnet = tags.create_tag(&NewTag::new("sonnet")).unwrap();
    let haiku = tags.create_tag(&NewTag::new("haiku")).unwrap();

    let service = PoemService::new(SqlitePoemRepository::try_new(&conn).unwrap());
    let poem = service.create_poem(author, "Tagged", "words").unwrap();
    set_timestamps(&conn, poem.id, 1_000, 1_000);

    let first = service
        .set_poem_tags(poem.id, &[sonnet.id, elegy.id, sonnet.id])
        .unwrap();
    let names: Vec<_> = first.tags.iter().map(|tag| tag.name.as_str()).collect();
    assert_eq!(names, vec!["elegy", "sonnet"]);
    assert!(first.updated_at > 1_000);

    let replaced = service.set_poem_tags(poem.id, &[haiku.id]).unwrap();
    assert_eq!(replaced.tags, vec![haiku.clone()]);

    let filtered = service
        .list_poems(&PoemListQuery {
            tag: Some("haiku".to_string()),
            ..PoemListQuery::default()
        })
        .unwrap();
    assert_eq!(filtered.len(), 1);
    assert_eq!(filtered[0].id, poem.id);

    let cleared = service.set_poem_tags(poem.id, &[]).unwrap();
    assert!(cleared.tags.is_empty());
}

#[test]
fn set_poem_tags_with_unknown_tag_keeps_previous_set() {
    let conn = setup();
    let author = create_user(&conn, "alice");
    let tags = SqliteTagRepository::try_new(&conn).unwrap();
    let elegy = tags.create_tag(&NewTag::new("elegy")).unwrap();

    let service = PoemService::new(SqlitePoemRepository::try_new(&conn).unwrap());
    let poem = service.create_poem(author, "Tagged", "words").unwrap();
    service.set_poem_tags(poem.id, &[elegy.id]).unwrap();

    let err = service
        .set_poem_tags(poem.id, &[elegy.id, 9_999])
        .unwrap_err();
    assert!(matches!(err, PoemServiceError::TagNotFound(9_999)));

    let loaded = service.get_poem(poem.id).unwrap().unwrap();
    assert_eq!(loaded.tags, vec![elegy]);
}

#[test]
fn delete_poem_then_get_returns_none() {
    let conn = setup();
    let author = create_user(&conn, "alice");
    let service = PoemService::new(SqlitePoemRepository::try_new(&conn).unwrap());
    let poem = service.create_poem(author, "Gone", "words").unwrap();

    service.delete_poem(poem.id).unwrap();
    assert!(service.get_poem(poem.id).unwrap().is_none());

    let err = service.delete_poem(poem.id).unwrap_err();
    assert!(matches!(err, PoemServiceError::PoemNotFound(id) if id == poem.id));
}

#[test]
fn set_poem_tags_joins_transaction_opened_by_caller() {
    let conn = setup();
    let author = create_user(&conn, "alice");
    let tags = SqliteTagRepository::try_new(&conn).unwrap();
    let elegy = tags.create_tag(&NewTag::new("elegy")).unwrap();
    let ode = tags.create_tag(&NewTag::new("ode")).unwrap();

    let service = PoemService::new(SqlitePoemRepository::try_new(&conn).unwrap());
    let poem = service.create_poem(author, "Batch", "words").unwrap();

    conn.execute_batch("BEGIN;").unwrap();
    service.set_poem_tags(poem.id, &[elegy.id]).unwrap();
    let err = service.set_poem_tags(poem.id, &[ode.id, 9_999]).unwrap_err();
    assert!(matches!(err, PoemServiceError::TagNotFound(9_999)));
    conn.execute_batch("COMMIT;").unwrap();

    let loaded = service.get_poem(poem.id).unwrap().unwrap();
    assert_eq!(loaded.tags, vec![elegy]);
}
