use std::{sync::Arc, time::Duration};

use tokio::time::sleep;

use crate::{
    config::{self, PlaylistIds},
    debug,
    dispatch::{Dispatcher, dispatchable},
    error, info,
    spotify::SpotifyClient,
    success,
    sync::SyncEngine,
    telegram::{self, TelegramClient},
    utils, warning,
};

const POLL_ERROR_BACKOFF: Duration = Duration::from_secs(5);

pub async fn listen() {
    let playlists = super::load_playlists();
    let remote = super::connect_spotify().await;

    let pb = utils::spinner("Loading playlist snapshots...");
    let engine = match SyncEngine::bootstrap(remote, &playlists).await {
        Ok(engine) => engine,
        Err(e) => {
            pb.finish_and_clear();
            error!("Cannot load playlists, refusing to start: {}", e);
        }
    };
    pb.finish_and_clear();

    let (singles, albums) = engine.snapshot_sizes().await;
    success!(
        "Loaded {} singles and {} album tracks",
        singles,
        albums
    );

    serve(Arc::new(engine), playlists).await;
}

/// Long-polls the chat and dispatches messages one at a time until Ctrl-C.
pub(crate) async fn serve(engine: Arc<SyncEngine<SpotifyClient>>, playlists: PlaylistIds) {
    let token = match config::telegram_token() {
        Ok(token) => token,
        Err(e) => error!("Invalid configuration: {}", e),
    };
    let timeout = match config::remote_timeout() {
        Ok(timeout) => timeout,
        Err(e) => error!("Invalid configuration: {}", e),
    };
    let client = match TelegramClient::new(&config::telegram_apiurl(), &token, timeout) {
        Ok(client) => client,
        Err(e) => error!("Cannot create Telegram client: {}", e),
    };

    let dispatcher = Dispatcher::new(engine, client, playlists);
    let shutdown = tokio::signal::ctrl_c();
    tokio::pin!(shutdown);

    info!("Listening for links...");
    let mut offset: Option<i64> = None;
    loop {
        let updates = tokio::select! {
            _ = &mut shutdown => break,
            updates = dispatcher.sink().get_updates(offset) => updates,
        };

        let updates = match updates {
            Ok(updates) => updates,
            Err(e) => {
                warning!("Failed to fetch updates: {}", e);
                sleep(POLL_ERROR_BACKOFF).await;
                continue;
            }
        };

        offset = telegram::next_offset(offset, &updates);
        for update in updates {
            let Some((to, text)) = dispatchable(&update) else {
                continue;
            };

            debug!("parsing message {}", to.message_id);
            dispatcher.handle(to, text).await;
        }
    }

    info!("Shutting down");
}
