//! # StoryLedger Node Runtime
//!
//! The dev-node entry point: loads configuration, opens storage, rebuilds
//! the chain, boots an in-process validator cluster over the gossip layer,
//! and streams commit events to the log until interrupted.
//!
//! ```text
//! storage ──▶ load_chain ──▶ ChainState ◀── finalize ── PBFT nodes
//!                                │                          ▲
//!                                ▼ events                   │ gossip
//!                            EventBus              InMemoryTransport
//! ```

mod adapters;
mod config;

use anyhow::Result;
use shared_bus::EventBus;
use sl_02_chain_state::{load_chain, BlockStateStore, MemoryStore, SystemClock};
use sl_05_gossip::{InMemoryTransport, Node};
use sl_08_consensus::ConsensusService;
use sl_14_sharding::ShardedProposer;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{info, warn, Level};
use tracing_subscriber::FmtSubscriber;

use crate::adapters::{RocksDbStore, ServiceProposer};
use crate::config::NodeConfig;

#[tokio::main]
async fn main() -> Result<()> {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let config = NodeConfig::from_env();
    info!(
        node = %config.node_id,
        cluster = ?config.cluster_nodes,
        fault_tolerance = config.fault_tolerance,
        data_dir = config.data_dir.as_deref().unwrap_or("<memory>"),
        "booting dev node"
    );

    let store: Arc<dyn BlockStateStore> = match config.data_dir.as_deref() {
        Some(path) => Arc::new(RocksDbStore::open(path)?),
        None => {
            warn!("no data dir configured, using in-memory storage");
            Arc::new(MemoryStore::new())
        }
    };

    let clock = Arc::new(SystemClock);
    let chain = Arc::new(load_chain(store, clock)?);
    info!(height = chain.latest().index, "chain ready");

    let bus = Arc::new(EventBus::new());
    chain.set_bus(Arc::clone(&bus));

    // One gossip node per cluster id, routed through an in-process
    // transport: the dev node hosts the whole cluster in one process.
    let transport = Arc::new(InMemoryTransport::new());
    let mut transports: HashMap<String, Arc<Node>> = HashMap::new();
    for id in &config.cluster_nodes {
        let node = Arc::new(Node::new(id.clone(), transport.clone()));
        transport.register(&node);
        transports.insert(id.clone(), node);
    }

    let service = Arc::new(ConsensusService::start(
        Arc::clone(&chain),
        Some(Arc::clone(&bus)),
        transports,
        config.cluster_nodes.clone(),
        None,
        config.fault_tolerance,
    )?);

    let proposer = ShardedProposer::new(
        Arc::new(ServiceProposer::new(Arc::clone(&service))),
        config.node_id.clone(),
        config.remote_nodes(),
    );
    info!(nodes = ?proposer.nodes(), "proposer ready");

    spawn_event_logger(&bus);

    if std::env::var("SL_SEED_DEMO").is_ok_and(|v| v == "1") {
        seed_demo_wallet(&chain, &proposer)?;
    }

    info!("node is running; press Ctrl+C to stop");
    tokio::signal::ctrl_c().await?;

    info!("shutting down");
    service.stop();
    bus.close();

    Ok(())
}

/// Provision one demo wallet and submit it through the sharded proposer, so
/// a freshly booted cluster commits a block without any external client.
fn seed_demo_wallet(
    chain: &Arc<sl_02_chain_state::ChainState>,
    proposer: &ShardedProposer,
) -> Result<()> {
    let keypair = shared_crypto::Keypair::generate();
    let wallet = shared_types::Wallet {
        address: "0xdemo".into(),
        user_id: "demo-user".into(),
        public_key: keypair.public_key_base64(),
        private_key_encrypted: "demo-only".into(),
        created_at: chain.clock().now_unix(),
        block_index: 0,
    };

    let tx = sl_02_chain_state::create_wallet_transaction(&wallet, chain.clock().as_ref())?;
    chain.register_wallet(wallet.clone());
    chain.enqueue_transaction(tx);

    proposer
        .propose(&wallet.user_id, Vec::new())
        .map_err(|err| anyhow::anyhow!("demo proposal failed: {err}"))?;

    info!(user = %wallet.user_id, "demo wallet submitted");
    Ok(())
}

/// Mirror every bus event into the structured log.
fn spawn_event_logger(bus: &Arc<EventBus>) {
    let (_id, mut events) = bus.subscribe(64);
    tokio::spawn(async move {
        while let Some(event) = events.recv().await {
            info!(kind = %event.kind, data = %event.data, "ledger event");
        }
    });
}