use tunedrop::utils::*;

#[test]
fn test_tokenize_preserves_order() {
    let tokens: Vec<&str> =
        tokenize("check this\thttps://open.spotify.com/track/abc123  out\n").collect();
    assert_eq!(
        tokens,
        vec!["check", "this", "https://open.spotify.com/track/abc123", "out"]
    );
}

#[test]
fn test_tokenize_empty() {
    assert_eq!(tokenize("").count(), 0);
    assert_eq!(tokenize("   \n ").count(), 0);
}

#[test]
fn test_page_offsets() {
    assert_eq!(page_offsets(250, 100), vec![0, 100, 200]);
    assert_eq!(page_offsets(200, 100), vec![0, 100]);
    assert_eq!(page_offsets(1, 100), vec![0]);
    assert!(page_offsets(0, 100).is_empty());
}

#[test]
fn test_page_offsets_zero_page_size() {
    assert!(page_offsets(10, 0).is_empty());
}

#[test]
fn test_track_uri() {
    assert_eq!(track_uri("abc123"), "spotify:track:abc123");
}

#[test]
fn test_playlist_url() {
    assert_eq!(
        playlist_url("1T3VM24iUb9tRu63wo4oJX"),
        "https://open.spotify.com/playlist/1T3VM24iUb9tRu63wo4oJX"
    );
}

#[test]
fn test_escape_markdown() {
    assert_eq!(escape_markdown("plain"), "plain");
    assert_eq!(
        escape_markdown("snake_case *bold* `code` [x](y)"),
        "snake\\_case \\*bold\\* \\`code\\` \\[x\\]\\(y\\)"
    );
    assert_eq!(
        escape_markdown("2024-03-01 ~ #1 + a=b | {c}. Hey! > \\"),
        "2024\\-03\\-01 \\~ \\#1 \\+ a\\=b \\| \\{c\\}\\. Hey\\! \\> \\\\"
    );
}

#[test]
fn test_escape_link_url() {
    assert_eq!(
        escape_link_url("https://open.spotify.com/playlist/a-b_c"),
        "https://open.spotify.com/playlist/a-b_c"
    );
    assert_eq!(escape_link_url("https://x/(a)\\"), "https://x/(a\\)\\\\");
}
