use tabled::Table;

use crate::{error, sync::SyncEngine, types::PlaylistTableRow, utils};

pub async fn info() {
    let playlists = super::load_playlists();
    let remote = super::connect_spotify().await;

    let pb = utils::spinner("Loading playlist snapshots...");
    let engine = match SyncEngine::bootstrap(remote, &playlists).await {
        Ok(engine) => engine,
        Err(e) => {
            pb.finish_and_clear();
            error!("Cannot load playlists: {}", e);
        }
    };
    pb.finish_and_clear();

    let (singles, albums) = engine.snapshot_sizes().await;
    let rows = vec![
        PlaylistTableRow {
            playlist: playlists.singles_name.clone(),
            id: playlists.singles.clone(),
            tracks: singles,
        },
        PlaylistTableRow {
            playlist: playlists.albums_name.clone(),
            id: playlists.albums.clone(),
            tracks: albums,
        },
    ];

    println!("{}", Table::new(rows));
}
