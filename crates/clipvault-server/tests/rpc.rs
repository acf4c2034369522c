//! End-to-end tests over HTTP JSON-RPC

use std::net::SocketAddr;
use std::sync::Arc;

use clipvault_client::ClipvaultClient;
use clipvault_core::{Angle, Apparatus, ClipFilters, ClipId, ClipMetaUpdate, OwnerId, PageRequest};
use clipvault_rpc::{codes, FinalizeUploadRequest};
use clipvault_server::{ClipvaultServer, ServerConfig};
use clipvault_store::MemoryStore;

fn owner(id: &str) -> OwnerId {
    OwnerId::new(id).unwrap()
}

async fn start(config: ServerConfig) -> ClipvaultServer {
    let config = config.with_addr(SocketAddr::from(([127, 0, 0, 1], 0)));
    let mut server = ClipvaultServer::with_store(config, Arc::new(MemoryStore::new()));
    server.start().await.unwrap();
    server
}

async fn client_for(server: &ClipvaultServer, who: &str) -> ClipvaultClient {
    ClipvaultClient::connect(server.url().unwrap())
        .await
        .unwrap()
        .with_caller(owner(who))
}

async fn upload(client: &ClipvaultClient, tags: &[&str], angle: Option<Angle>) -> ClipId {
    let ticket = client.prepare_upload("video/mp4", 2048).await.unwrap();
    let mut request = FinalizeUploadRequest::new(ticket.object_key, 2048);
    request.tags = tags.iter().map(|t| t.to_string()).collect();
    request.angle = angle;
    client.finalize_upload(request).await.unwrap().id
}

#[tokio::test]
async fn test_upload_list_and_search() {
    let mut server = start(ServerConfig::default()).await;
    let client = client_for(&server, "u1").await;

    let older = upload(&client, &["handstand", "drill"], Some(Angle::Front)).await;
    let newer = upload(&client, &["press"], Some(Angle::Side)).await;

    let all = client
        .list_clips(ClipFilters::new(), PageRequest::first(10))
        .await
        .unwrap();
    assert_eq!(all.page.iter().map(|c| c.id).collect::<Vec<_>>(), vec![newer, older]);
    assert!(all.is_done);

    let fronts = client
        .list_clips(ClipFilters::new().with_angle(Angle::Front), PageRequest::first(10))
        .await
        .unwrap();
    assert_eq!(fronts.page.len(), 1);
    assert_eq!(fronts.page[0].id, older);

    let found = client.search_clips("Handstand!", None, None).await.unwrap();
    assert_eq!(found.results.len(), 1);
    assert_eq!(found.results[0].id, older);
    assert!(found.is_done);

    let blank = client.search_clips("   ", None, None).await.unwrap();
    assert!(blank.results.is_empty());
    assert!(blank.is_done);

    server.stop().await.unwrap();
}

#[tokio::test]
async fn test_paging_through_listing() {
    let mut server = start(ServerConfig::default()).await;
    let client = client_for(&server, "u1").await;
    for _ in 0..5 {
        upload(&client, &["rep"], None).await;
    }

    let first = client
        .list_clips(ClipFilters::new(), PageRequest::first(2))
        .await
        .unwrap();
    assert_eq!(first.page.len(), 2);
    assert!(!first.is_done);

    let mut seen = first.page.len();
    let mut cursor = first.continue_cursor;
    while let Some(next) = cursor {
        let page = client
            .list_clips(ClipFilters::new(), PageRequest::after(2, next))
            .await
            .unwrap();
        seen += page.page.len();
        cursor = if page.is_done { None } else { page.continue_cursor };
    }
    assert_eq!(seen, 5);

    server.stop().await.unwrap();
}

#[tokio::test]
async fn test_other_owners_see_not_found() {
    let mut server = start(ServerConfig::default()).await;
    let alice = client_for(&server, "alice").await;
    let bob = client_for(&server, "bob").await;

    let clip_id = upload(&alice, &["handstand"], None).await;

    let err = bob.get_clip(clip_id).await.unwrap_err();
    assert!(err.is_not_found());
    let missing = bob.get_clip(ClipId::new()).await.unwrap_err();
    assert_eq!(err.to_string(), missing.to_string());

    let update = ClipMetaUpdate {
        apparatus: Some(Some(Apparatus::Rings)),
        ..Default::default()
    };
    assert!(bob.update_clip_meta(clip_id, update).await.unwrap_err().is_not_found());
    assert!(bob.delete_clip(clip_id).await.unwrap_err().is_not_found());

    let clip = alice.get_clip(clip_id).await.unwrap();
    assert_eq!(clip.apparatus, None);

    let listed = bob
        .list_clips(ClipFilters::new(), PageRequest::first(10))
        .await
        .unwrap();
    assert!(listed.page.is_empty());

    server.stop().await.unwrap();
}

#[tokio::test]
async fn test_sessions_round_trip() {
    let mut server = start(ServerConfig::default()).await;
    let client = client_for(&server, "u1").await;

    let session = client.create_session("Monday").await.unwrap();
    let clip_id = upload(&client, &[], None).await;
    let update = ClipMetaUpdate {
        session_id: Some(Some(session.id)),
        favorite: Some(true),
        ..Default::default()
    };
    client.update_clip_meta(clip_id, update).await.unwrap();

    let renamed = client.rename_session(session.id, "Tuesday").await.unwrap();
    assert_eq!(renamed.name, "Tuesday");
    assert_eq!(client.list_sessions().await.unwrap(), vec![renamed]);

    client.delete_session(session.id).await.unwrap();
    assert!(client.list_sessions().await.unwrap().is_empty());

    let clip = client.get_clip(clip_id).await.unwrap();
    assert_eq!(clip.session_id, Some(session.id));
    assert!(clip.favorite);

    server.stop().await.unwrap();
}

#[tokio::test]
async fn test_validation_and_identity_errors() {
    let mut server = start(ServerConfig::default()).await;
    let client = client_for(&server, "u1").await;

    let err = client.prepare_upload("image/png", 10).await.unwrap_err();
    assert_eq!(err.code(), Some(codes::VALIDATION));

    let err = client.prepare_upload("video/mp4", u64::MAX).await.unwrap_err();
    assert_eq!(err.code(), Some(codes::VALIDATION));
    assert!(err.to_string().contains("byte limit"));

    let anonymous = ClipvaultClient::connect(server.url().unwrap()).await.unwrap();
    let err = anonymous.list_sessions().await.unwrap_err();
    assert_eq!(err.code(), Some(codes::UNAUTHENTICATED));

    server.stop().await.unwrap();
}

#[tokio::test]
async fn test_dev_identity_fills_anonymous_requests() {
    let config = ServerConfig::default().with_dev_identity(owner("dev"));
    let mut server = start(config).await;

    let anonymous = ClipvaultClient::connect(server.url().unwrap()).await.unwrap();
    let session = anonymous.create_session("Scratch").await.unwrap();
    assert_eq!(session.owner, owner("dev"));

    let dev = client_for(&server, "dev").await;
    assert_eq!(dev.list_sessions().await.unwrap(), vec![session]);

    server.stop().await.unwrap();
}
