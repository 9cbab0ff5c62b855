//! Multi-node agreement, event fan-out liveness, and persistence recovery.

use parking_lot::Mutex;
use shared_bus::{EventBus, LedgerEvent};
use shared_crypto::Keypair;
use sl_02_chain_state::{load_chain, BlockStateStore, ChainState, Clock, FixedClock, MemoryStore};
use sl_05_gossip::{InMemoryTransport, Node};
use sl_08_consensus::{
    start_cluster, ChainBlockBuilder, ConsensusService, Ed25519Signer, Finalizer, MessageSigner,
};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use crate::support;

fn cluster_transports(
    transport: &Arc<InMemoryTransport>,
    ids: &[&str],
) -> HashMap<String, Arc<Node>> {
    let mut transports = HashMap::new();
    for id in ids {
        let node = Arc::new(Node::new(*id, transport.clone()));
        transport.register(&node);
        transports.insert(id.to_string(), node);
    }
    transports
}

#[tokio::test]
async fn test_four_nodes_agree_on_the_same_block() {
    let ids = ["n1", "n2", "n3", "n4"];
    let peers: Vec<String> = ids.iter().map(|s| s.to_string()).collect();
    let transport = Arc::new(InMemoryTransport::new());
    let transports = cluster_transports(&transport, &ids);

    let chain = Arc::new(ChainState::new(Arc::new(FixedClock(1000))).expect("chain"));
    let builder = Arc::new(ChainBlockBuilder::new(
        Arc::clone(&chain),
        Arc::new(FixedClock(2000)),
    ));

    // Record the hash each node finalizes instead of committing.
    let finalized: Arc<Mutex<HashMap<String, String>>> = Arc::new(Mutex::new(HashMap::new()));
    let mut finalizers: HashMap<String, Finalizer> = HashMap::new();
    for id in ids {
        let sink = Arc::clone(&finalized);
        let id_owned = id.to_string();
        finalizers.insert(
            id.to_string(),
            Arc::new(move |block| {
                sink.lock().insert(id_owned.clone(), block.hash.clone());
            }),
        );
    }

    let runtimes = start_cluster(transports, peers, builder, finalizers, None, 1)
        .expect("cluster");

    let keypair = Keypair::generate();
    let wallet = support::provisioned_wallet("user-1", &keypair);
    runtimes["n2"]
        .node()
        .propose_block(vec![support::wallet_tx(&wallet, 5000)])
        .expect("propose");

    for _ in 0..200 {
        if finalized.lock().len() == 4 {
            break;
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }

    let committed = finalized.lock().clone();
    assert_eq!(committed.len(), 4, "every correct node finalizes");
    let hashes: std::collections::HashSet<&String> = committed.values().collect();
    assert_eq!(hashes.len(), 1, "all nodes commit the same block");

    for runtime in runtimes.values() {
        runtime.stop();
    }
}

#[tokio::test]
async fn test_forged_consensus_message_rejected() {
    // A shared development signer: every node id verifies under the same key.
    let signer = Arc::new(Ed25519Signer::new(Keypair::generate()));
    for id in ["n1", "n2"] {
        signer.register(id, signer.public_key_base64());
    }

    let forged = {
        let keypair = Keypair::generate();
        let wallet = support::provisioned_wallet("user-1", &keypair);
        let block = sl_02_chain_state::build_block(
            1,
            "genesis",
            vec![support::wallet_tx(&wallet, 5000)],
            2000,
        )
        .expect("block");
        sl_08_consensus::ConsensusMessage {
            kind: sl_08_consensus::MessageKind::PrePrepare,
            view: 0,
            sequence: 1,
            block,
            sender_id: "n1".into(),
            signature: "Zm9yZ2Vk".into(), // present but not valid
        }
    };

    // Verification fails: the signer rejects the forged signature.
    let digest = forged.digest().expect("digest");
    assert!(!signer.verify("n1", &digest, &forged.signature));

    // A properly signed digest passes.
    let signature = signer.sign(&digest).expect("sign");
    assert!(signer.verify("n1", &digest, &signature));
}

#[tokio::test]
async fn test_slow_subscriber_never_blocks_publisher() {
    let bus = Arc::new(EventBus::new());
    let (_slow_id, mut slow) = bus.subscribe(1);
    let (_fast_id, mut fast) = bus.subscribe(200);

    let publisher = {
        let bus = Arc::clone(&bus);
        tokio::spawn(async move {
            for i in 0..100 {
                bus.publish(LedgerEvent::error(format!("event-{i}")));
            }
        })
    };

    // The publisher finishes promptly even though one subscriber is full.
    tokio::time::timeout(Duration::from_secs(1), publisher)
        .await
        .expect("publisher must not block")
        .expect("publisher task");

    let mut fast_count = 0;
    while let Ok(Some(_)) = fast.try_recv() {
        fast_count += 1;
    }
    assert_eq!(fast_count, 100, "fast subscriber sees everything");

    let mut slow_count = 0;
    while let Ok(Some(_)) = slow.try_recv() {
        slow_count += 1;
    }
    assert!(slow_count <= 1, "slow subscriber holds at most its buffer");
}

#[tokio::test]
async fn test_commit_persists_and_recovers() {
    let clock: Arc<dyn Clock> = Arc::new(FixedClock(1000));
    let store: Arc<dyn BlockStateStore> = Arc::new(MemoryStore::new());

    {
        let chain = Arc::new(load_chain(Arc::clone(&store), Arc::clone(&clock)).expect("load"));
        let bus = Arc::new(EventBus::new());
        chain.set_bus(Arc::clone(&bus));

        let transport = Arc::new(InMemoryTransport::new());
        let transports = cluster_transports(&transport, &["n1"]);
        let service = ConsensusService::start(
            Arc::clone(&chain),
            Some(bus),
            transports,
            vec!["n1".into()],
            None,
            0,
        )
        .expect("service");

        let keypair = Keypair::generate();
        let wallet = support::provisioned_wallet("user-1", &keypair);
        service
            .propose("n1", vec![support::wallet_tx(&wallet, 5000)])
            .expect("propose");

        for _ in 0..200 {
            if chain.latest().index >= 1 {
                break;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        assert_eq!(chain.latest().index, 1);
        service.stop();
    }

    // A fresh process: the log rebuilds the same chain and registries.
    let recovered = load_chain(Arc::clone(&store), clock).expect("recover");
    assert_eq!(recovered.blocks().len(), 2);
    let wallet = recovered.wallet_by_user("user-1").expect("wallet");
    assert_eq!(wallet.block_index, 1);
    assert!(recovered.validate_chain());
}

#[tokio::test]
async fn test_builder_links_blocks_through_consensus() {
    // Two sequential proposals extend the chain without gaps.
    let chain = Arc::new(ChainState::new(Arc::new(FixedClock(1000))).expect("chain"));
    let transport = Arc::new(InMemoryTransport::new());
    let transports = cluster_transports(&transport, &["n1"]);

    let service = ConsensusService::start(
        Arc::clone(&chain),
        None,
        transports,
        vec!["n1".into()],
        None,
        0,
    )
    .expect("service");

    let keypair = Keypair::generate();
    let wallet = support::provisioned_wallet("user-1", &keypair);
    chain.register_wallet(wallet.clone());

    service
        .propose("n1", vec![support::wallet_tx(&wallet, 5000)])
        .expect("first");
    service
        .propose(
            "n1",
            vec![support::contribution_tx("user-1", "0xuser-1", &keypair, 6000)],
        )
        .expect("second");

    for _ in 0..200 {
        if chain.latest().index >= 2 {
            break;
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }

    let blocks = chain.blocks();
    assert_eq!(blocks.len(), 3);
    assert_eq!(blocks[2].prev_hash, blocks[1].hash);
    assert!(chain.validate_chain());

    service.stop();
}
