mod common;

use common::setup;
use versehub_core::{
    NewTag, RepoError, SqliteTagRepository, TagRepository, TagService, TagServiceError,
    TagValidationError, DEFAULT_TAG_COLOR,
};

#[test]
fn elegy_tag_is_unique_by_name() {
    let conn = setup();
    let service = TagService::new(SqliteTagRepository::try_new(&conn).unwrap());

    let elegy = service.create_tag("elegy", None).unwrap();
    assert_eq!(elegy.name, "elegy");
    assert_eq!(elegy.color, DEFAULT_TAG_COLOR);

    let err = service.create_tag("elegy", Some("#112233")).unwrap_err();
    assert!(matches!(err, TagServiceError::DuplicateName(name) if name == "elegy"));
    assert_eq!(service.list_tags().unwrap().len(), 1);
}

#[test]
fn repository_reports_duplicate_name() {
    let conn = setup();
    let repo = SqliteTagRepository::try_new(&conn).unwrap();
    repo.create_tag(&NewTag::new("ode")).unwrap();

    let err = repo.create_tag(&NewTag::new("ode")).unwrap_err();
    assert!(matches!(err, RepoError::DuplicateTagName(name) if name == "ode"));
}

#[test]
fn names_are_case_sensitive() {
    let conn = setup();
    let service = TagService::new(SqliteTagRepository::try_new(&conn).unwrap());
    service.create_tag("Elegy", None).unwrap();
    service.create_tag("elegy", None).unwrap();

    let names: Vec<_> = service
        .list_tags()
        .unwrap()
        .into_iter()
        .map(|tag| tag.name)
        .collect();
    assert_eq!(names, vec!["Elegy".to_string(), "elegy".to_string()]);
}

#[test]
fn malformed_color_is_rejected() {
    let conn = setup();
    let service = TagService::new(SqliteTagRepository::try_new(&conn).unwrap());

    let err = service.create_tag("ballad", Some("red")).unwrap_err();
    assert!(matches!(
        err,
        TagServiceError::InvalidTag(TagValidationError::InvalidColor(_))
    ));

    let repo = SqliteTagRepository::try_new(&conn).unwrap();
    let err = repo
        .create_tag(&NewTag::new("ballad").with_color("#12345"))
        .unwrap_err();
    assert!(matches!(err, RepoError::TagValidation(_)));
    assert!(repo.get_tag_by_name("ballad").unwrap().is_none());
}

#[test]
fn custom_color_round_trips_and_lookup_by_name_trims() {
    let conn = setup();
    let service = TagService::new(SqliteTagRepository::try_new(&conn).unwrap());
    let created = service.create_tag("  limerick ", Some("#FF8800")).unwrap();
    assert_eq!(created.name, "limerick");

    let loaded = service.get_tag_by_name("limerick ").unwrap().unwrap();
    assert_eq!(loaded, created);
    assert_eq!(loaded.color, "#FF8800");
    assert_eq!(service.get_tag(created.id).unwrap(), Some(created));
}

#[test]
fn delete_tag_reports_missing_rows() {
    let conn = setup();
    let service = TagService::new(SqliteTagRepository::try_new(&conn).unwrap());
    let tag = service.create_tag("villanelle", None).unwrap();

    service.delete_tag(tag.id).unwrap();
    assert!(service.get_tag(tag.id).unwrap().is_none());
    assert!(matches!(
        service.delete_tag(tag.id).unwrap_err(),
        TagServiceError::TagNotFound(id) if id == tag.id
    ));
}
