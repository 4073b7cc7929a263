use super::*;

fn client() -> BackendClient {
    BackendClient::new("http://localhost:5000/", BackendClientOptions::default()).unwrap()
}

#[test]
fn resolve_joins_paths_onto_base() {
    let c = client();
    assert_eq!(c.base(), "http://localhost:5000");
    assert_eq!(c.resolve("/api/book"), "http://localhost:5000/api/book");
    assert_eq!(c.resolve("search"), "http://localhost:5000/search");
}

#[test]
fn resolve_keeps_absolute_urls() {
    let c = client();
    assert_eq!(c.resolve("https://x/img.png"), "https://x/img.png");
}

#[test]
fn floor_char_boundary_never_splits_a_char() {
    let s = "ёёё";
    assert_eq!(floor_char_boundary(s, 3), 2);
    assert_eq!(floor_char_boundary("abc", 200), 3);
}
