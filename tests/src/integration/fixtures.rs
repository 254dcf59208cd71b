//! Shared harness: a VM over in-memory collaborators with a settable clock.

use async_trait::async_trait;
use parking_lot::Mutex;
use shared_types::{EngineMessage, FixedTimeSource, Timestamp};
use std::sync::Arc;
use tokio::sync::mpsc;
use vmsdk_builder::BuilderConfig;
use vmsdk_chain::{Block, ChainConfig, InMemoryBlockDatabase};
use vmsdk_gossiper::{AppSender, NoopGossiper};
use vmsdk_vm::{CountingMempool, Vm, VmConfig};

/// Wall-clock second the harness starts at
pub const GENESIS_TIME: Timestamp = 1_700_000_000;

/// AppSender that keeps every payload
#[derive(Default)]
pub struct RecordingSender {
    sent: Mutex<Vec<Vec<u8>>>,
}

impl RecordingSender {
    /// Payloads sent so far
    pub fn sent(&self) -> Vec<Vec<u8>> {
        self.sent.lock().clone()
    }
}

#[async_trait]
impl AppSender for RecordingSender {
    async fn send_app_gossip(&self, payload: Vec<u8>) -> vmsdk_gossiper::Result<()> {
        self.sent.lock().push(payload);
        Ok(())
    }
}

/// VM plus handles on every collaborator
pub struct Harness {
    /// VM under test
    pub vm: Arc<Vm>,
    /// Engine side of the builder signal channel
    pub engine_rx: mpsc::Receiver<EngineMessage>,
    /// Backing block database
    pub db: Arc<InMemoryBlockDatabase>,
    /// Mempool depth
    pub mempool: Arc<CountingMempool>,
    /// Wall clock seen by the builder and verifier
    pub clock: Arc<FixedTimeSource>,
}

impl Harness {
    /// Harness with the given builder and chain configuration
    pub fn new(builder: BuilderConfig, chain: ChainConfig) -> Self {
        let config = VmConfig {
            builder,
            chain,
            genesis_timestamp: GENESIS_TIME,
        };
        let db = Arc::new(InMemoryBlockDatabase::new());
        let mempool = Arc::new(CountingMempool::new());
        let clock = Arc::new(FixedTimeSource::new(GENESIS_TIME));
        let (vm, engine_rx) = Vm::new(config, db.clone(), mempool.clone(), clock.clone())
            .expect("vm construction");
        vm.add_accepted_listener(mempool.clone())
            .expect("listener before start");
        Self {
            vm: Arc::new(vm),
            engine_rx,
            db,
            mempool,
            clock,
        }
    }

    /// Manual builder, default chain sizing
    pub fn manual() -> Self {
        Self::new(BuilderConfig::manual(), ChainConfig::default())
    }

    /// Start with a gossiper that does nothing
    pub fn start(&self) {
        self.vm
            .start(Arc::new(NoopGossiper::new()), Arc::new(RecordingSender::default()))
            .expect("start");
    }

    /// Do what the engine does after a build signal: build, verify, prefer
    /// and accept one block.
    pub async fn produce_block(&self) -> Arc<Block> {
        let built = self.vm.build_block().await.expect("build");
        let block = self.vm.verify(built).expect("verify");
        self.vm.set_preference(&block.id()).expect("prefer");
        self.vm.accept(&block.id()).expect("accept");
        block
    }
}
