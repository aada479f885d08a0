//! Song store contract tests
//!
//! The same scenarios run against both store implementations.

use std::sync::Arc;

use chrono::{DateTime, TimeZone, Utc};
use songmark_api::models::{Rating, Song, SongInput};
use songmark_api::store::{MemorySongStore, SongStore, SqliteSongStore};
use songmark_common::db::{init_database, init_memory_database};

fn ts(day: u32, hour: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 5, day, hour, 0, 0).unwrap()
}

fn new_song(id: &str) -> Song {
    let input = SongInput {
        id: Some(id.to_string()),
        name: "Tàu Anh Qua Núi".to_string(),
        performers: vec!["Thái Thanh".to_string()],
        ..Default::default()
    };
    Song::create(input, String::new(), ts(1, 0)).unwrap()
}

async fn stores() -> Vec<Arc<dyn SongStore>> {
    let pool = init_memory_database().await.unwrap();
    vec![
        Arc::new(SqliteSongStore::new(pool)),
        Arc::new(MemorySongStore::new()),
    ]
}

#[tokio::test]
async fn rating_twice_appends_both_scores() {
    for store in stores().await {
        store.create(new_song("s1")).await.unwrap();

        store.rate("s1", Rating::new(5).unwrap(), ts(2, 10)).await.unwrap();
        let rated = store
            .rate("s1", Rating::new(3).unwrap(), ts(2, 11))
            .await
            .unwrap()
            .unwrap();

        assert_eq!(rated.scores, vec![5, 3], "{} store", store.kind());
        assert_eq!(rated.sing_count, 2, "{} store", store.kind());
        assert_eq!(rated.last_sung_at, Some(ts(2, 11)), "{} store", store.kind());
        assert_eq!(rated.last_update, ts(2, 11), "{} store", store.kind());

        let stored = store.get("s1").await.unwrap().unwrap();
        assert_eq!(stored, rated);
    }
}

#[tokio::test]
async fn concurrent_ratings_are_not_lost() {
    for store in stores().await {
        store.create(new_song("s1")).await.unwrap();

        let mut handles = Vec::new();
        for i in 0..20u32 {
            let store = Arc::clone(&store);
            handles.push(tokio::spawn(async move {
                let rating = Rating::new((i % 5 + 1) as i64).unwrap();
                store.rate("s1", rating, ts(3, 0)).await.unwrap();
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        let song = store.get("s1").await.unwrap().unwrap();
        assert_eq!(song.scores.len(), 20, "{} store", store.kind());
        assert_eq!(song.sing_count, 20, "{} store", store.kind());
    }
}

#[tokio::test]
async fn full_record_survives_storage() {
    for store in stores().await {
        let mut song = new_song("full");
        song.author = "Phạm Duy".to_string();
        song.image = "https://example.com/cover.jpg".to_string();
        song.lyric = "Tàu anh qua núi\nTàu em qua đồi...".to_string();
        song.ref_urls = vec!["https://youtu.be/abc123".to_string()];
        song.categories = vec!["Dân Ca".to_string()];
        song.tags = vec!["Classic".to_string(), "Núi".to_string()];
        song.scores = vec![4, 5];
        song.sing_count = 2;
        song.last_sung_at = Some(ts(4, 20));
        song.priority = -3;

        store.create(song.clone()).await.unwrap();
        assert_eq!(store.get("full").await.unwrap(), Some(song));
    }
}

#[tokio::test]
async fn sqlite_store_persists_across_pools() {
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("songmark.db");

    {
        let store = SqliteSongStore::new(init_database(&db_path).await.unwrap());
        store.create(new_song("kept")).await.unwrap();
        store.rate("kept", Rating::new(4).unwrap(), ts(5, 0)).await.unwrap();
        store.pool().close().await;
    }

    let store = SqliteSongStore::new(init_database(&db_path).await.unwrap());
    let song = store.get("kept").await.unwrap().unwrap();
    assert_eq!(song.scores, vec![4]);
    assert_eq!(song.sing_count, 1);
}

#[tokio::test]
async fn current_time_is_returned_unchanged_by_every_store() {
    for store in stores().await {
        let input = SongInput {
            id: Some("now".to_string()),
            name: "Đêm Đông".to_string(),
            ..Default::default()
        };
        let song = Song::create(input, String::new(), songmark_common::time::now()).unwrap();

        let created = store.create(song.clone()).await.unwrap();
        assert_eq!(created, song, "{} store", store.kind());

        let at = songmark_common::time::now();
        let rated = store
            .rate("now", Rating::new(4).unwrap(), at)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(rated.last_sung_at, Some(at), "{} store", store.kind());
        assert_eq!(rated.last_update, at, "{} store", store.kind());
    }
}
