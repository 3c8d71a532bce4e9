//! Cluster Integration Tests
//!
//! Starts real nodes on ephemeral localhost ports and checks routing, remote
//! fetches and the local fallback when a peer is unreachable.

use peercache::peers::protocol::FetchRequest;
use peercache::{
    Error, Group, GetterFn, GroupRegistry, HttpPool, PeerGetter, PeerPicker, peer_router,
};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::net::TcpListener;

struct TestNode {
    addr: String,
    pool: Arc<HttpPool>,
    group: Arc<Group>,
    loads: Arc<AtomicUsize>,
}

async fn bind() -> (TcpListener, String) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = format!("http://{}", listener.local_addr().unwrap());
    (listener, addr)
}

/// Address nobody listens on.
async fn dead_addr() -> String {
    let (listener, addr) = bind().await;
    drop(listener);
    addr
}

fn start_node(listener: TcpListener, addr: &str, peers: &[String]) -> TestNode {
    let loads = Arc::new(AtomicUsize::new(0));
    let counter = loads.clone();

    let registry = GroupRegistry::new();
    let group = registry.new_group(
        "scores",
        2 << 10,
        GetterFn(move |key: String| {
            let counter = counter.clone();
            async move {
                counter.fetch_add(1, Ordering::SeqCst);
                Ok::<_, anyhow::Error>(format!("value-of-{}", key).into_bytes())
            }
        }),
    );

    let pool = HttpPool::new(addr);
    pool.set(peers);
    group
        .register_peers(pool.clone() as Arc<dyn PeerPicker>)
        .unwrap();

    let app = peer_router(pool.clone(), registry);
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    TestNode {
        addr: addr.to_string(),
        pool,
        group,
        loads,
    }
}

fn key_owned_by(pool: &HttpPool, owner: &str) -> String {
    (0..10_000)
        .map(|i| format!("key-{}", i))
        .find(|key| pool.owner_of(key).as_deref() == Some(owner))
        .expect("some key should land on every peer")
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_remote_owner_serves_the_value() {
    // ARRANGE: two nodes that know each other
    let (listener_a, addr_a) = bind().await;
    let (listener_b, addr_b) = bind().await;
    let peers = vec![addr_a.clone(), addr_b.clone()];
    let a = start_node(listener_a, &addr_a, &peers);
    let b = start_node(listener_b, &addr_b, &peers);

    let key = key_owned_by(&a.pool, &b.addr);

    // ACT
    let value = a.group.get(&key).await.unwrap();

    // ASSERT
    assert_eq!(value.as_str(), format!("value-of-{}", key));
    assert_eq!(a.loads.load(Ordering::SeqCst), 0, "node A must not load a key it does not own");
    assert_eq!(b.loads.load(Ordering::SeqCst), 1);
    assert!(b.group.cache().get(&key).is_some(), "owner caches the value");
    assert!(a.group.cache().get(&key).is_none(), "remote answers are not cached by the caller");

    // A second lookup is served from B's cache
    a.group.get(&key).await.unwrap();
    assert_eq!(b.loads.load(Ordering::SeqCst), 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_owned_key_is_loaded_locally() {
    let (listener_a, addr_a) = bind().await;
    let (listener_b, addr_b) = bind().await;
    let peers = vec![addr_a.clone(), addr_b.clone()];
    let a = start_node(listener_a, &addr_a, &peers);
    let b = start_node(listener_b, &addr_b, &peers);

    let key = key_owned_by(&a.pool, &a.addr);

    a.group.get(&key).await.unwrap();

    assert_eq!(a.loads.load(Ordering::SeqCst), 1);
    assert_eq!(b.loads.load(Ordering::SeqCst), 0);
    assert!(a.group.cache().get(&key).is_some());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_unreachable_peer_falls_back_to_local_load() {
    // ARRANGE: node A believes a dead node owns part of the keyspace
    let (listener_a, addr_a) = bind().await;
    let dead = dead_addr().await;
    let a = start_node(listener_a, &addr_a, &[addr_a.clone(), dead.clone()]);

    let key = key_owned_by(&a.pool, &dead);

    // ACT
    let value = a.group.get(&key).await.unwrap();

    // ASSERT
    assert_eq!(value.as_str(), format!("value-of-{}", key));
    assert_eq!(a.loads.load(Ordering::SeqCst), 1);
    assert!(a.group.cache().get(&key).is_some(), "local loads are cached");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_peer_getter_reports_bad_status() {
    let (listener_a, addr_a) = bind().await;
    let (listener_b, addr_b) = bind().await;
    let peers = vec![addr_a.clone(), addr_b.clone()];
    let a = start_node(listener_a, &addr_a, &peers);
    let _b = start_node(listener_b, &addr_b, &peers);

    let key = key_owned_by(&a.pool, &addr_b);
    let peer = a.pool.pick_peer(&key).unwrap();

    let ok = peer.get(&FetchRequest::new("scores", key.as_str())).await.unwrap();
    assert_eq!(ok.value, format!("value-of-{}", key).into_bytes());

    let err = peer
        .get(&FetchRequest::new("missing", key.as_str()))
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Peer(ref msg) if msg.contains("404")), "{}", err);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_peer_endpoint_status_codes() {
    let (listener, addr) = bind().await;
    let _node = start_node(listener, &addr, &[addr.clone()]);
    let client = reqwest::Client::new();

    let cases = [
        ("/elsewhere", 404, None),
        ("/_peercache/scores", 400, Some("bad request")),
        ("/_peercache/missing/Tom", 404, Some("no such group: missing")),
        ("/_peercache/scores/Tom", 200, None),
    ];

    for (path, status, body) in cases {
        let response = client
            .get(format!("{}{}", addr, path))
            .send()
            .await
            .unwrap();
        assert_eq!(response.status().as_u16(), status, "GET {}", path);
        if let Some(body) = body {
            assert_eq!(response.text().await.unwrap(), body);
        }
    }
}
