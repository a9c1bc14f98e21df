use crate::utils::{edit_distance, find_similar, lower_first, to_camel_case, to_pascal_case, upper_first};

#[test]
fn pascal_case_from_snake() {
    assert_eq!(to_pascal_case("foo_bar"), "FooBar");
    assert_eq!(to_pascal_case("foo"), "Foo");
    assert_eq!(to_pascal_case("_foo"), "Foo");
    assert_eq!(to_pascal_case("foo_"), "Foo");
}

#[test]
fn pascal_case_keeps_inner_case() {
    assert_eq!(to_pascal_case("coverImage"), "CoverImage");
    assert_eq!(to_pascal_case("PostsJson"), "PostsJson");
}

#[test]
fn pascal_case_from_kebab() {
    assert_eq!(to_pascal_case("foo-bar"), "FooBar");
    assert_eq!(to_pascal_case("foo-bar-baz"), "FooBarBaz");
}

#[test]
fn first_letter_helpers() {
    assert_eq!(upper_first("query"), "Query");
    assert_eq!(upper_first(""), "");
    assert_eq!(lower_first("PostsJson"), "postsJson");
}

#[test]
fn camel_case_splits_words() {
    assert_eq!(to_camel_case("IndexQuery"), "indexQuery");
    assert_eq!(to_camel_case("index_query"), "indexQuery");
    assert_eq!(to_camel_case("--index--query--"), "indexQuery");
    assert_eq!(to_camel_case("XMLHttpRequest"), "xmlHttpRequest");
    assert_eq!(to_camel_case("Page2Query"), "page2Query");
}

#[test]
fn edit_distance_counts_single_edits() {
    assert_eq!(edit_distance("", "abc"), 3);
    assert_eq!(edit_distance("abc", ""), 3);
    assert_eq!(edit_distance("kitten", "sitting"), 3);
    assert_eq!(edit_distance("onCreateNode", "onCreateNode"), 0);
}

#[test]
fn similar_name_within_distance() {
    let apis = ["onCreateNode", "onCreatePage", "createPages"];
    assert_eq!(find_similar("onCreateNod", &apis, 3), Some("onCreateNode"));
    assert_eq!(find_similar("createPage", &apis, 3), Some("createPages"));
    assert_eq!(find_similar("somethingElse", &apis, 3), None);
}
