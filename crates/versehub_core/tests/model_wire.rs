use uuid::Uuid;
use versehub_core::{NewTag, Poem, Viewer, DEFAULT_TAG_COLOR};

#[test]
fn viewer_reports_authentication() {
    let id = Uuid::new_v4();
    assert!(!Viewer::Anonymous.is_authenticated());
    assert!(Viewer::Authenticated(id).is_authenticated());
    assert_eq!(Viewer::Authenticated(id).user_id(), Some(id));
    assert_eq!(Viewer::from(None::<Uuid>), Viewer::Anonymous);
    assert_eq!(Viewer::from(Some(id)), Viewer::Authenticated(id));
}

#[test]
fn viewer_serialization_uses_tagged_shape() {
    let id = Uuid::parse_str("11111111-2222-4333-8444-555555555555").unwrap();

    let json = serde_json::to_value(Viewer::Authenticated(id)).unwrap();
    assert_eq!(json["kind"], "authenticated");
    assert_eq!(json["user_id"], id.to_string());

    let anonymous = serde_json::to_value(Viewer::Anonymous).unwrap();
    assert_eq!(anonymous["kind"], "anonymous");

    let decoded: Viewer = serde_json::from_value(json).unwrap();
    assert_eq!(decoded, Viewer::Authenticated(id));
}

#[test]
fn poem_serialization_uses_snake_case_fields() {
    let author = Uuid::new_v4();
    let poem = Poem::new(author, "Title", "Body");

    let json = serde_json::to_value(&poem).unwrap();
    assert_eq!(json["author_id"], author.to_string());
    assert_eq!(json["is_published"], true);
    assert_eq!(json["title"], "Title");
}

#[test]
fn new_tag_default_color_serializes() {
    let json = serde_json::to_value(NewTag::new("elegy")).unwrap();
    assert_eq!(json["name"], "elegy");
    assert_eq!(json["color"], DEFAULT_TAG_COLOR);
}
