//! # PBFT Node
//!
//! The per-validator protocol state machine. One mutex guards the monotonic
//! sequence counter and the per-sequence instances; the finalize callback is
//! always invoked with that mutex released so it can re-enter chain state
//! freely.

use parking_lot::Mutex;
use shared_types::{Block, Transaction};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tracing::{debug, warn};

use crate::domain::{ConsensusError, ConsensusMessage, MessageKind};
use crate::ports::{BlockBuilder, ConsensusNetwork, Finalizer, MessageSigner};

/// Dependencies required by a PBFT node.
///
/// `peers` lists every validator in the cluster, including this node.
pub struct PbftConfig {
    pub id: String,
    pub peers: Vec<String>,
    pub fault_tolerance: usize,
    pub network: Arc<dyn ConsensusNetwork>,
    pub signer: Option<Arc<dyn MessageSigner>>,
    pub builder: Arc<dyn BlockBuilder>,
    pub finalize: Finalizer,
}

struct Instance {
    block: Block,
    pre_prepare: Option<ConsensusMessage>,
    prepares: HashSet<String>,
    commits: HashSet<String>,
    fired: bool,
}

impl Instance {
    fn new(block: Block) -> Self {
        Self {
            block,
            pre_prepare: None,
            prepares: HashSet::new(),
            commits: HashSet::new(),
            fired: false,
        }
    }
}

struct NodeState {
    sequence: u64,
    instances: HashMap<u64, Instance>,
}

/// A single validator participating in PBFT consensus.
pub struct PbftNode {
    id: String,
    fault_tolerance: usize,
    network: Arc<dyn ConsensusNetwork>,
    signer: Option<Arc<dyn MessageSigner>>,
    builder: Arc<dyn BlockBuilder>,
    finalize: Finalizer,
    state: Mutex<NodeState>,
}

impl PbftNode {
    /// Construct a node, rejecting unusable configurations eagerly.
    ///
    /// The fault tolerance must satisfy `3f + 1 <= n` for the cluster size
    /// `n` (the peer list counting this node, minimum one), otherwise a
    /// quorum of `2f + 1` correct nodes cannot exist.
    pub fn new(config: PbftConfig) -> Result<Self, ConsensusError> {
        if config.id.is_empty() {
            return Err(ConsensusError::MissingNodeId);
        }

        let cluster_size = config.peers.len().max(1);
        if 3 * config.fault_tolerance + 1 > cluster_size {
            return Err(ConsensusError::InvalidFaultTolerance {
                fault_tolerance: config.fault_tolerance,
                cluster_size,
            });
        }

        Ok(Self {
            id: config.id,
            fault_tolerance: config.fault_tolerance,
            network: config.network,
            signer: config.signer,
            builder: config.builder,
            finalize: config.finalize,
            state: Mutex::new(NodeState {
                sequence: 0,
                instances: HashMap::new(),
            }),
        })
    }

    /// The validator identifier.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Votes needed to advance a phase: `2f + 1`, counting self.
    pub fn quorum_size(&self) -> usize {
        2 * self.fault_tolerance + 1
    }

    /// Begin consensus for the provided transactions.
    ///
    /// Builds a block against the chain head, allocates a fresh sequence,
    /// broadcasts a signed PRE_PREPARE, and feeds that message into the
    /// local handler so this node contributes its own PREPARE and COMMIT.
    pub fn propose_block(&self, transactions: Vec<Transaction>) -> Result<(), ConsensusError> {
        let block = self.builder.build_block(transactions)?;

        let sequence = {
            let mut state = self.state.lock();
            state.sequence += 1;
            let sequence = state.sequence;
            state
                .instances
                .insert(sequence, Instance::new(block.clone()));
            sequence
        };

        let mut message = ConsensusMessage {
            kind: MessageKind::PrePrepare,
            view: 0,
            sequence,
            block,
            sender_id: self.id.clone(),
            signature: String::new(),
        };

        self.sign_message(&mut message)?;
        self.network.broadcast(&self.id, &message)?;

        debug!(node = %self.id, sequence, "proposal broadcast");

        // Process our own message so the round progresses locally.
        self.handle_pre_prepare(message);
        Ok(())
    }

    /// Route an inbound consensus message to the appropriate handler.
    pub fn handle_message(&self, message: ConsensusMessage) {
        match message.kind {
            MessageKind::PrePrepare => self.handle_pre_prepare(message),
            MessageKind::Prepare => self.handle_prepare(message),
            MessageKind::Commit => self.handle_commit(message),
            MessageKind::ViewChange => {
                debug!(node = %self.id, sender = %message.sender_id, "view change ignored");
            }
        }
    }

    fn handle_pre_prepare(&self, message: ConsensusMessage) {
        if !self.verify_message(&message) {
            return;
        }

        {
            let mut state = self.state.lock();
            let instance = state
                .instances
                .entry(message.sequence)
                .or_insert_with(|| Instance::new(message.block.clone()));

            // Only the first pre-prepare per sequence counts.
            if instance.pre_prepare.is_some() {
                return;
            }
            instance.pre_prepare = Some(message.clone());
        }

        let mut prepare = ConsensusMessage {
            kind: MessageKind::Prepare,
            view: message.view,
            sequence: message.sequence,
            block: message.block,
            sender_id: self.id.clone(),
            signature: String::new(),
        };

        if self.sign_message(&mut prepare).is_err() {
            return;
        }

        if let Err(err) = self.network.broadcast(&self.id, &prepare) {
            warn!(node = %self.id, sequence = prepare.sequence, error = %err, "prepare broadcast failed");
        }
        self.handle_prepare(prepare);
    }

    fn handle_prepare(&self, message: ConsensusMessage) {
        if !self.verify_message(&message) {
            return;
        }

        let emit_commit = {
            let mut state = self.state.lock();
            let Some(instance) = state.instances.get_mut(&message.sequence) else {
                return;
            };
            if instance.pre_prepare.is_none() {
                return;
            }
            if instance.block.hash != message.block.hash {
                return;
            }
            if !instance.prepares.insert(message.sender_id.clone()) {
                return;
            }

            // The +1 counts the local pre-prepare as this node's vote.
            instance.prepares.len() + 1 >= self.quorum_size()
        };

        if !emit_commit {
            return;
        }

        let mut commit = ConsensusMessage {
            kind: MessageKind::Commit,
            view: message.view,
            sequence: message.sequence,
            block: message.block,
            sender_id: self.id.clone(),
            signature: String::new(),
        };

        if self.sign_message(&mut commit).is_ok() {
            if let Err(err) = self.network.broadcast(&self.id, &commit) {
                warn!(node = %self.id, sequence = commit.sequence, error = %err, "commit broadcast failed");
            }
        }
        self.handle_commit(commit);
    }

    fn handle_commit(&self, message: ConsensusMessage) {
        if !self.verify_message(&message) {
            return;
        }

        let fire = {
            let mut state = self.state.lock();
            let Some(instance) = state.instances.get_mut(&message.sequence) else {
                return;
            };
            if instance.pre_prepare.is_none() {
                return;
            }
            if instance.block.hash != message.block.hash {
                return;
            }
            if !instance.commits.insert(message.sender_id.clone()) {
                return;
            }

            if instance.commits.len() >= self.quorum_size() && !instance.fired {
                instance.fired = true;
                Some(instance.block.clone())
            } else {
                None
            }
        };

        if let Some(block) = fire {
            debug!(node = %self.id, sequence = message.sequence, index = block.index, "quorum reached, finalizing");
            (self.finalize)(block);
        }
    }

    fn sign_message(&self, message: &mut ConsensusMessage) -> Result<(), ConsensusError> {
        let Some(signer) = self.signer.as_ref() else {
            return Ok(());
        };

        let digest = message.digest()?;
        message.signature = signer
            .sign(&digest)
            .map_err(|message| ConsensusError::Signer { message })?;
        Ok(())
    }

    fn verify_message(&self, message: &ConsensusMessage) -> bool {
        let Some(signer) = self.signer.as_ref() else {
            return true;
        };
        if message.signature.is_empty() {
            return true;
        }

        let Ok(digest) = message.digest() else {
            return false;
        };

        let verified = signer.verify(&message.sender_id, &digest, &message.signature);
        if !verified {
            debug!(node = %self.id, sender = %message.sender_id, kind = %message.kind, "signature verification failed, message dropped");
        }
        verified
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex as PlMutex;
    use sl_02_chain_state::build_block;
    use sl_05_gossip::TransportError;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Network that records every broadcast instead of sending it.
    #[derive(Default)]
    struct RecordingNetwork {
        broadcasts: PlMutex<Vec<ConsensusMessage>>,
    }

    impl ConsensusNetwork for RecordingNetwork {
        fn broadcast(
            &self,
            _sender: &str,
            message: &ConsensusMessage,
        ) -> Result<(), TransportError> {
            self.broadcasts.lock().push(message.clone());
            Ok(())
        }

        fn send(
            &self,
            _sender: &str,
            _recipient: &str,
            message: &ConsensusMessage,
        ) -> Result<(), TransportError> {
            self.broadcasts.lock().push(message.clone());
            Ok(())
        }
    }

    struct StubBuilder;

    impl BlockBuilder for StubBuilder {
        fn build_block(&self, transactions: Vec<Transaction>) -> Result<Block, ConsensusError> {
            if transactions.is_empty() {
                return Err(ConsensusError::EmptyTransactions);
            }
            Ok(build_block(1, "genesis-hash", transactions, 1000)?)
        }
    }

    /// Signer whose verify result is fixed, for drop-policy tests.
    struct StaticSigner {
        accept: bool,
    }

    impl MessageSigner for StaticSigner {
        fn sign(&self, _data: &[u8]) -> Result<String, String> {
            Ok("sig".into())
        }
        fn verify(&self, _sender: &str, _data: &[u8], _signature: &str) -> bool {
            self.accept
        }
    }

    fn sample_tx() -> Transaction {
        Transaction {
            tx_id: "tx".into(),
            kind: "note".into(),
            data: serde_json::json!({"n": 1}),
            timestamp: 1,
            signature: String::new(),
        }
    }

    fn node_with(
        peers: &[&str],
        fault_tolerance: usize,
        signer: Option<Arc<dyn MessageSigner>>,
    ) -> (Arc<PbftNode>, Arc<RecordingNetwork>, Arc<AtomicUsize>) {
        let network = Arc::new(RecordingNetwork::default());
        let fired = Arc::new(AtomicUsize::new(0));
        let finalize_count = Arc::clone(&fired);

        let node = PbftNode::new(PbftConfig {
            id: "n1".into(),
            peers: peers.iter().map(|p| p.to_string()).collect(),
            fault_tolerance,
            network: network.clone(),
            signer,
            builder: Arc::new(StubBuilder),
            finalize: Arc::new(move |_block| {
                finalize_count.fetch_add(1, Ordering::SeqCst);
            }),
        })
        .unwrap();

        (Arc::new(node), network, fired)
    }

    #[test]
    fn test_construction_rejects_empty_id() {
        let network = Arc::new(RecordingNetwork::default());
        let result = PbftNode::new(PbftConfig {
            id: String::new(),
            peers: vec![],
            fault_tolerance: 0,
            network,
            signer: None,
            builder: Arc::new(StubBuilder),
            finalize: Arc::new(|_| {}),
        });
        assert!(matches!(result, Err(ConsensusError::MissingNodeId)));
    }

    #[test]
    fn test_construction_rejects_unsafe_fault_tolerance() {
        let network = Arc::new(RecordingNetwork::default());
        let result = PbftNode::new(PbftConfig {
            id: "n1".into(),
            peers: vec!["n1".into(), "n2".into(), "n3".into()],
            fault_tolerance: 1, // needs 3f+1 = 4 nodes
            network,
            signer: None,
            builder: Arc::new(StubBuilder),
            finalize: Arc::new(|_| {}),
        });
        assert!(matches!(
            result,
            Err(ConsensusError::InvalidFaultTolerance {
                fault_tolerance: 1,
                cluster_size: 3
            })
        ));
    }

    #[test]
    fn test_single_node_proposal_finalizes_immediately() {
        let (node, network, fired) = node_with(&["n1"], 0, None);

        node.propose_block(vec![sample_tx()]).unwrap();

        // Quorum of one: the self-votes carry the round to completion.
        assert_eq!(fired.load(Ordering::SeqCst), 1);

        let kinds: Vec<MessageKind> =
            network.broadcasts.lock().iter().map(|m| m.kind).collect();
        assert_eq!(
            kinds,
            vec![
                MessageKind::PrePrepare,
                MessageKind::Prepare,
                MessageKind::Commit
            ]
        );
    }

    #[test]
    fn test_four_node_round_requires_quorum() {
        // f=1, quorum = 3.
        let (node, _network, fired) = node_with(&["n1", "n2", "n3", "n4"], 1, None);

        node.propose_block(vec![sample_tx()]).unwrap();
        assert_eq!(fired.load(Ordering::SeqCst), 0);

        let block = build_block(1, "genesis-hash", vec![sample_tx()], 1000).unwrap();
        let vote = |kind: MessageKind, sender: &str| ConsensusMessage {
            kind,
            view: 0,
            sequence: 1,
            block: block.clone(),
            sender_id: sender.into(),
            signature: String::new(),
        };

        // Two remote prepares: with the local pre-prepare that is quorum,
        // so the node emits its own commit (commit count becomes 1).
        node.handle_message(vote(MessageKind::Prepare, "n2"));
        node.handle_message(vote(MessageKind::Prepare, "n3"));
        assert_eq!(fired.load(Ordering::SeqCst), 0);

        // Two remote commits reach the 2f+1 = 3 threshold.
        node.handle_message(vote(MessageKind::Commit, "n2"));
        assert_eq!(fired.load(Ordering::SeqCst), 0);
        node.handle_message(vote(MessageKind::Commit, "n3"));
        assert_eq!(fired.load(Ordering::SeqCst), 1);

        // Extra commits never re-fire.
        node.handle_message(vote(MessageKind::Commit, "n4"));
        assert_eq!(fired.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_duplicate_votes_ignored() {
        let (node, _network, fired) = node_with(&["n1", "n2", "n3", "n4"], 1, None);
        node.propose_block(vec![sample_tx()]).unwrap();

        let block = build_block(1, "genesis-hash", vec![sample_tx()], 1000).unwrap();
        let commit = ConsensusMessage {
            kind: MessageKind::Commit,
            view: 0,
            sequence: 1,
            block,
            sender_id: "n2".into(),
            signature: String::new(),
        };

        // The same sender voting repeatedly cannot reach quorum.
        for _ in 0..5 {
            node.handle_message(commit.clone());
        }
        assert_eq!(fired.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_mismatched_block_hash_ignored() {
        let (node, _network, fired) = node_with(&["n1"], 0, None);
        node.propose_block(vec![sample_tx()]).unwrap();
        assert_eq!(fired.load(Ordering::SeqCst), 1);

        // A commit for a different block at the same sequence is dropped.
        let other = build_block(1, "other-parent", vec![sample_tx()], 2000).unwrap();
        node.handle_message(ConsensusMessage {
            kind: MessageKind::Commit,
            view: 0,
            sequence: 1,
            block: other,
            sender_id: "n9".into(),
            signature: String::new(),
        });
        assert_eq!(fired.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_failed_signature_drops_message() {
        let signer: Arc<dyn MessageSigner> = Arc::new(StaticSigner { accept: false });
        let (node, _network, fired) = node_with(&["n1"], 0, Some(signer));

        let block = build_block(1, "genesis-hash", vec![sample_tx()], 1000).unwrap();
        node.handle_message(ConsensusMessage {
            kind: MessageKind::PrePrepare,
            view: 0,
            sequence: 1,
            block,
            sender_id: "n2".into(),
            signature: "bogus".into(),
        });

        // The pre-prepare never installed, so nothing can progress.
        assert_eq!(fired.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_unsigned_messages_pass_without_signer() {
        let (node, _network, fired) = node_with(&["n1"], 0, None);
        let block = build_block(1, "genesis-hash", vec![sample_tx()], 1000).unwrap();

        node.handle_message(ConsensusMessage {
            kind: MessageKind::PrePrepare,
            view: 0,
            sequence: 7,
            block,
            sender_id: "n2".into(),
            signature: String::new(),
        });

        // Development mode: the peer's pre-prepare drives a full local round.
        assert_eq!(fired.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_view_change_is_ignored() {
        let (node, network, fired) = node_with(&["n1"], 0, None);
        node.handle_message(ConsensusMessage {
            kind: MessageKind::ViewChange,
            view: 1,
            sequence: 1,
            block: Block::default(),
            sender_id: "n2".into(),
            signature: String::new(),
        });

        assert_eq!(fired.load(Ordering::SeqCst), 0);
        assert!(network.broadcasts.lock().is_empty());
    }

    #[test]
    fn test_empty_proposal_rejected() {
        let (node, _network, _fired) = node_with(&["n1"], 0, None);
        assert!(matches!(
            node.propose_block(Vec::new()),
            Err(ConsensusError::EmptyTransactions)
        ));
    }
}
