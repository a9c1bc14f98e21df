use super::FieldShape;

#[test]
fn signature_ignores_request_order() {
    let a = FieldShape::new().leaf("title").leaf("id");
    let b = FieldShape::new().leaf("id").leaf("title");

    assert_eq!(a.signature(), b.signature());
    insta::assert_snapshot!(a.signature(), @r#"{"id":true,"title":true}"#);
}

#[test]
fn repeated_fields_merge_nested_shapes() {
    let mut shape = FieldShape::new()
        .nested("frontmatter", FieldShape::new().leaf("title"))
        .leaf("author");
    shape.insert("frontmatter", Some(FieldShape::new().leaf("date")));
    shape.insert("author", Some(FieldShape::new().leaf("name")));
    shape.insert("frontmatter", None);

    insta::assert_snapshot!(
        shape.signature(),
        @r#"{"author":{"name":true},"frontmatter":{"date":true,"title":true}}"#
    );
    assert!(shape.contains("author"));
    assert!(shape.sub("author").is_some_and(|s| s.contains("name")));
    assert_eq!(shape.len(), 2);
}

#[test]
fn empty_shape() {
    let shape = FieldShape::new();
    assert!(shape.is_empty());
    assert_eq!(shape.signature(), "{}");
    assert!(shape.sub("missing").is_none());
}
