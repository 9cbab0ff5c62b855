//! # Node Runtimes
//!
//! A running PBFT node attached to the gossip network: the node itself, its
//! gossip handler, and the background pump that drains the transport's
//! inbound queue. Pumps root at a shutdown watch channel; stopping cancels
//! without waiting for in-flight finalize callbacks to drain.

use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::watch;
use tracing::debug;

use sl_05_gossip::{handle_incoming, Node};

use crate::adapters::{GossipConsensusNetwork, PbftGossipHandler};
use crate::domain::ConsensusError;
use crate::node::{PbftConfig, PbftNode};
use crate::ports::{BlockBuilder, Finalizer, MessageSigner};

/// Parameters required to spin up one consensus participant.
pub struct BootstrapOptions {
    pub node_id: String,
    pub peers: Vec<String>,
    pub fault_tolerance: usize,
    pub transport: Arc<Node>,
    pub signer: Option<Arc<dyn MessageSigner>>,
    pub builder: Arc<dyn BlockBuilder>,
    pub finalize: Finalizer,
}

/// A running PBFT node with its message pump.
pub struct NodeRuntime {
    node: Arc<PbftNode>,
    handler: Arc<PbftGossipHandler>,
    shutdown: watch::Sender<bool>,
}

impl NodeRuntime {
    /// The PBFT node this runtime drives.
    pub fn node(&self) -> Arc<PbftNode> {
        Arc::clone(&self.node)
    }

    /// The gossip handler feeding the node.
    pub fn handler(&self) -> Arc<PbftGossipHandler> {
        Arc::clone(&self.handler)
    }

    /// Cancel the background pump. Idempotent; in-flight work is not
    /// awaited.
    pub fn stop(&self) {
        let _ = self.shutdown.send(true);
    }
}

/// Create a PBFT node tied into the gossip system, without starting a pump.
pub fn bootstrap_node(
    opts: &BootstrapOptions,
) -> Result<(Arc<PbftNode>, Arc<PbftGossipHandler>), ConsensusError> {
    let network = Arc::new(GossipConsensusNetwork::new(Arc::clone(&opts.transport)));

    let node_id = if opts.node_id.is_empty() {
        opts.transport.id().to_string()
    } else {
        opts.node_id.clone()
    };

    let node = Arc::new(PbftNode::new(PbftConfig {
        id: node_id,
        peers: opts.peers.clone(),
        fault_tolerance: opts.fault_tolerance,
        network,
        signer: opts.signer.clone(),
        builder: Arc::clone(&opts.builder),
        finalize: Arc::clone(&opts.finalize),
    })?);

    let handler = Arc::new(PbftGossipHandler::new(Arc::clone(&node)));
    Ok((node, handler))
}

/// Bootstrap a PBFT node and launch its gossip message pump.
///
/// Must be called within a tokio runtime.
pub fn start_node(opts: BootstrapOptions) -> Result<NodeRuntime, ConsensusError> {
    opts.transport.discover_peers(&opts.peers);

    let (node, handler) = bootstrap_node(&opts)?;

    let (shutdown, mut shutdown_rx) = watch::channel(false);
    let pump_transport = Arc::clone(&opts.transport);
    let pump_handler = Arc::clone(&handler);
    let pump_id = node.id().to_string();

    tokio::spawn(async move {
        loop {
            tokio::select! {
                changed = shutdown_rx.changed() => {
                    if changed.is_err() || *shutdown_rx.borrow() {
                        break;
                    }
                }
                message = pump_transport.recv() => {
                    match message {
                        Some(message) => handle_incoming(pump_handler.as_ref(), message),
                        None => break,
                    }
                }
            }
        }
        debug!(node = %pump_id, "message pump stopped");
    });

    Ok(NodeRuntime {
        node,
        handler,
        shutdown,
    })
}

/// Bootstrap multiple PBFT nodes and launch their message pumps.
///
/// Each transport needs a matching finalizer; a partial failure stops every
/// runtime already started.
pub fn start_cluster(
    transports: HashMap<String, Arc<Node>>,
    peers: Vec<String>,
    builder: Arc<dyn BlockBuilder>,
    mut finalizers: HashMap<String, Finalizer>,
    signer: Option<Arc<dyn MessageSigner>>,
    fault_tolerance: usize,
) -> Result<HashMap<String, NodeRuntime>, ConsensusError> {
    if transports.is_empty() {
        return Err(ConsensusError::TransportsRequired);
    }
    if finalizers.len() != transports.len() {
        return Err(ConsensusError::FinalizerMissing {
            id: "cluster".into(),
        });
    }

    let mut runtimes: HashMap<String, NodeRuntime> = HashMap::new();

    for (id, transport) in transports {
        let Some(finalize) = finalizers.remove(&id) else {
            stop_runtimes(&runtimes);
            return Err(ConsensusError::FinalizerMissing { id });
        };

        let runtime = match start_node(BootstrapOptions {
            node_id: id.clone(),
            peers: peers.clone(),
            fault_tolerance,
            transport,
            signer: signer.clone(),
            builder: Arc::clone(&builder),
            finalize,
        }) {
            Ok(runtime) => runtime,
            Err(err) => {
                stop_runtimes(&runtimes);
                return Err(err);
            }
        };

        runtimes.insert(id, runtime);
    }

    Ok(runtimes)
}

fn stop_runtimes(runtimes: &HashMap<String, NodeRuntime>) {
    for runtime in runtimes.values() {
        runtime.stop();
    }
}
