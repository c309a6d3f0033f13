mod common;

use std::sync::Arc;

use common::{ALBUMS, FakeMusicService, RecordingSink, SINGLES, playlists};
use tunedrop::{
    dispatch::{Destination, Dispatcher, MessageRef, render_album, render_track},
    link::Link,
    sync::{AppendOutcome, SyncEngine},
    types::{AlbumSummary, ArtistRef, TrackDetails},
};

const SOURCE: MessageRef = MessageRef {
    chat_id: -10042,
    message_id: 7,
};

async fn dispatcher(remote: &Arc<FakeMusicService>) -> Dispatcher<FakeMusicService, RecordingSink> {
    let engine = SyncEngine::bootstrap(Arc::clone(remote), &playlists())
        .await
        .unwrap();
    remote.clear_calls();
    Dispatcher::new(Arc::new(engine), RecordingSink::default(), playlists())
}

#[tokio::test]
async fn test_track_link_is_added_and_answered() {
    let remote = Arc::new(FakeMusicService::new());
    let dispatcher = dispatcher(&remote).await;

    let results = dispatcher
        .handle(SOURCE, "check this https://open.spotify.com/track/abc123 out")
        .await;

    let outcomes: Vec<_> = results.iter().map(|r| r.outcome()).collect();
    assert_eq!(
        outcomes,
        vec![
            Some(AppendOutcome::NotALink),
            Some(AppendOutcome::NotALink),
            Some(AppendOutcome::AddedTrack),
            Some(AppendOutcome::NotALink),
        ]
    );
    assert_eq!(remote.appended(SINGLES), vec!["abc123".to_string()]);
    assert_eq!(dispatcher.sink().reactions(), vec!["❤".to_string()]);

    let replies = dispatcher.sink().replies();
    assert_eq!(replies.len(), 1);
    assert!(replies[0].text.contains("Song abc123"));
    assert!(replies[0].text.contains("\\-\\-\\- added to [Singles]"));
    assert_eq!(
        replies[0].preview_url.as_deref(),
        Some("https://img.example/abc123")
    );
}

#[tokio::test]
async fn test_same_message_twice_is_duplicate() {
    let remote = Arc::new(FakeMusicService::new());
    let dispatcher = dispatcher(&remote).await;
    let text = "check this https://open.spotify.com/track/abc123 out";

    dispatcher.handle(SOURCE, text).await;
    let appends_after_first = remote.append_count();
    let results = dispatcher.handle(SOURCE, text).await;

    assert_eq!(results[2].outcome(), Some(AppendOutcome::DuplicateTrack));
    assert_eq!(remote.append_count(), appends_after_first);
    assert_eq!(
        dispatcher.sink().reactions(),
        vec!["❤".to_string(), "🙈".to_string()]
    );
    assert!(dispatcher.sink().replies()[1]
        .text
        .contains("\\-\\-\\- already added to [Singles]"));
}

#[tokio::test]
async fn test_album_link_is_answered_with_album_details() {
    let remote = Arc::new(FakeMusicService::new());
    remote.set_album("lp1", vec!["x".into(), "y".into()]);
    let dispatcher = dispatcher(&remote).await;

    let results = dispatcher
        .handle(SOURCE, "https://open.spotify.com/album/lp1?si=abc")
        .await;

    assert_eq!(results[0].link, Link::Album("lp1".to_string()));
    assert_eq!(results[0].outcome(), Some(AppendOutcome::AddedAlbum));
    assert_eq!(remote.appended(ALBUMS), vec!["x", "y"]);

    let replies = dispatcher.sink().replies();
    assert!(replies[0].text.starts_with("*Album*: _LP lp1_ by The Band \\- 2023\\-11\\-10"));
    assert!(replies[0].text.contains("[Albums](https://open.spotify.com/playlist/albums-playlist)"));
}

#[tokio::test]
async fn test_tokens_are_processed_in_order() {
    let remote = Arc::new(FakeMusicService::new());
    remote.set_album("lp", vec!["shared".into(), "other".into()]);
    let dispatcher = dispatcher(&remote).await;

    let results = dispatcher
        .on_message(
            "https://open.spotify.com/album/lp https://open.spotify.com/album/lp \
             https://open.spotify.com/track/t1 https://open.spotify.com/track/t1",
        )
        .await;

    let outcomes: Vec<_> = results.iter().map(|r| r.outcome()).collect();
    assert_eq!(
        outcomes,
        vec![
            Some(AppendOutcome::AddedAlbum),
            Some(AppendOutcome::DuplicateAlbum),
            Some(AppendOutcome::AddedTrack),
            Some(AppendOutcome::DuplicateTrack),
        ]
    );
    // on_message never talks to the chat
    assert!(dispatcher.sink().replies().is_empty());
    assert!(dispatcher.sink().reactions().is_empty());
}

#[tokio::test]
async fn test_plain_text_gets_no_reply() {
    let remote = Arc::new(FakeMusicService::new());
    let dispatcher = dispatcher(&remote).await;

    dispatcher.handle(SOURCE, "no links here, just chatting").await;

    assert!(dispatcher.sink().replies().is_empty());
    assert!(dispatcher.sink().reactions().is_empty());
    assert!(remote.calls().is_empty());
}

#[tokio::test]
async fn test_failed_admission_is_skipped_and_next_token_continues() {
    let remote = Arc::new(FakeMusicService::new());
    remote.fail_append("bad");
    let dispatcher = dispatcher(&remote).await;

    let results = dispatcher
        .handle(
            SOURCE,
            "https://open.spotify.com/track/bad https://open.spotify.com/track/good",
        )
        .await;

    assert!(results[0].result.is_err());
    assert_eq!(results[1].outcome(), Some(AppendOutcome::AddedTrack));
    assert_eq!(dispatcher.sink().replies().len(), 1);
    assert_eq!(dispatcher.sink().reactions(), vec!["❤".to_string()]);
}

#[tokio::test]
async fn test_reply_degrades_without_metadata() {
    let remote = Arc::new(FakeMusicService::new());
    remote.fail_metadata();
    let dispatcher = dispatcher(&remote).await;

    dispatcher
        .handle(SOURCE, "https://open.spotify.com/track/abc")
        .await;

    let replies = dispatcher.sink().replies();
    assert_eq!(replies.len(), 1);
    assert!(replies[0].text.starts_with("*Track*: abc"));
    assert_eq!(replies[0].preview_url, None);
    assert_eq!(dispatcher.sink().reactions(), vec!["❤".to_string()]);
}

#[test]
fn test_render_escapes_markdown() {
    let destination = Destination {
        label: "my_list",
        url: "https://open.spotify.com/playlist/p".to_string(),
        duplicate: true,
    };

    let reply = render_track("id_1", None, &destination);
    assert_eq!(
        reply.text,
        "*Track*: id\\_1\n\n\\-\\-\\- already added to [my\\_list](https://open.spotify.com/playlist/p)\\-\\-\\-"
    );

    let reply = render_album("a", None, &destination);
    assert!(reply.text.starts_with("*Album*: a\n\n"));
}

#[test]
fn test_render_escapes_names_inside_entities() {
    let destination = Destination {
        label: "Singles (2024)",
        url: "https://open.spotify.com/playlist/p".to_string(),
        duplicate: false,
    };
    let track = TrackDetails {
        id: "t".to_string(),
        name: "snake_case *live*".to_string(),
        artists: vec![ArtistRef {
            name: "A.B.".to_string(),
        }],
        album: AlbumSummary {
            name: "[Deluxe]".to_string(),
            release_date: "2024".to_string(),
            images: Vec::new(),
        },
    };

    let reply = render_track("t", Some(&track), &destination);

    assert_eq!(
        reply.text,
        "*Track*: _snake\\_case \\*live\\*_ by A\\.B\\.\n\n\
         \\-\\-\\- added to [Singles \\(2024\\)](https://open.spotify.com/playlist/p)\\-\\-\\-\n\n\
         *Album*: \\[Deluxe\\] \\- 2024"
    );
}
