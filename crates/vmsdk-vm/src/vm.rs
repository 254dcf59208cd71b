//! # VM
//!
//! Owns one chain's block store, builder and accepted processor, and exposes
//! the verify/accept/reject surface the consensus engine drives.
//!
//! ## Lifecycle
//!
//! 1. [`Vm::new`] loads (or creates) the last accepted block and returns the
//!    engine's inbound channel alongside the VM.
//! 2. [`Vm::start`] spawns the builder loop, the accepted processor and the
//!    gossiper.
//! 3. [`Vm::shutdown`] flips the stop signal and waits for all three.

use crate::config::VmConfig;
use crate::error::{Result, VmError};
use crate::ports::Mempool;
use async_trait::async_trait;
use parking_lot::{Mutex, RwLock};
use prometheus::Registry;
use shared_types::{BlockId, EngineMessage, NodeId, TimeSource};
use std::sync::Arc;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tracing::{debug, error, info};
use vmsdk_builder::{new_builder, Builder, BuilderError, BuilderVm, TipSnapshot};
use vmsdk_chain::{
    AcceptedListener, AcceptedProcessor, Block, BlockDatabase, BlockLifecycleApi, BlockStatus,
    BlockStore, ChainError, ChainMetrics,
};
use vmsdk_gossiper::{AppSender, Gossiper};

/// Capacity of the engine's inbound channel
const ENGINE_CHANNEL_CAPACITY: usize = 1;

/// State the builder reads through [`BuilderVm`]
struct Shared {
    engine_tx: mpsc::Sender<EngineMessage>,
    mempool: Arc<dyn Mempool>,
    store: Arc<BlockStore>,
    preferred: RwLock<BlockId>,
    stop_tx: watch::Sender<bool>,
}

#[async_trait]
impl BuilderVm for Shared {
    fn engine_sender(&self) -> &mpsc::Sender<EngineMessage> {
        &self.engine_tx
    }

    async fn mempool_len(&self) -> usize {
        self.mempool.len().await
    }

    async fn preferred_block(&self) -> vmsdk_builder::Result<TipSnapshot> {
        let id = *self.preferred.read();
        let block = self
            .store
            .get_block(&id)
            .map_err(|e| BuilderError::TipUnavailable(e.to_string()))?;
        Ok(TipSnapshot {
            height: block.height(),
            timestamp: block.timestamp(),
            window: *block.window(),
        })
    }

    fn stop_signal(&self) -> watch::Receiver<bool> {
        self.stop_tx.subscribe()
    }
}

struct Tasks {
    builder: JoinHandle<()>,
    processor: JoinHandle<vmsdk_chain::Result<u64>>,
    gossip: JoinHandle<()>,
}

/// A running chain as seen by the consensus engine
pub struct Vm {
    shared: Arc<Shared>,
    builder: Arc<dyn Builder>,
    clock: Arc<dyn TimeSource>,
    registry: Registry,
    last_accepted: RwLock<Arc<Block>>,
    processor: Mutex<Option<AcceptedProcessor>>,
    gossiper: RwLock<Option<Arc<dyn Gossiper>>>,
    tasks: Mutex<Option<Tasks>>,
}

impl Vm {
    /// Build a VM over `database`.
    ///
    /// If the database has no last accepted block, a genesis block stamped
    /// `config.genesis_timestamp` is written first. Returns the receiving
    /// end of the engine channel the builder signals on.
    pub fn new(
        config: VmConfig,
        database: Arc<dyn BlockDatabase>,
        mempool: Arc<dyn Mempool>,
        clock: Arc<dyn TimeSource>,
    ) -> Result<(Self, mpsc::Receiver<EngineMessage>)> {
        config.validate()?;

        let registry = Registry::new();
        let metrics = ChainMetrics::register(&registry)?;
        let (store, accepted_rx) = BlockStore::new(
            &config.chain,
            Arc::clone(&database),
            Arc::clone(&clock),
            metrics.clone(),
        )?;
        let store = Arc::new(store);

        let last_accepted = Arc::new(load_last_accepted(database.as_ref(), &config)?);
        store.prime_accepted(Arc::clone(&last_accepted));

        let (engine_tx, engine_rx) = mpsc::channel(ENGINE_CHANNEL_CAPACITY);
        let (stop_tx, _) = watch::channel(false);
        let shared = Arc::new(Shared {
            engine_tx,
            mempool,
            store,
            preferred: RwLock::new(last_accepted.id()),
            stop_tx,
        });

        let builder = new_builder(
            Arc::clone(&shared) as Arc<dyn BuilderVm>,
            config.builder.clone(),
            Arc::clone(&clock),
        )?;
        let processor = AcceptedProcessor::new(accepted_rx, metrics);

        info!(
            last_accepted = %last_accepted.id(),
            height = last_accepted.height(),
            mode = ?config.builder.mode,
            "vm initialized"
        );

        let vm = Self {
            shared,
            builder,
            clock,
            registry,
            last_accepted: RwLock::new(last_accepted),
            processor: Mutex::new(Some(processor)),
            gossiper: RwLock::new(None),
            tasks: Mutex::new(None),
        };
        Ok((vm, engine_rx))
    }

    /// Register a consumer of accepted blocks. Only valid before `start`.
    pub fn add_accepted_listener(&self, listener: Arc<dyn AcceptedListener>) -> Result<()> {
        let mut slot = self.processor.lock();
        let processor = slot.take().ok_or(VmError::AlreadyStarted)?;
        *slot = Some(processor.with_listener(listener));
        Ok(())
    }

    /// Receiver that observes `true` once shutdown begins. Gossipers are
    /// built with this before being passed to [`Vm::start`].
    pub fn stop_signal(&self) -> watch::Receiver<bool> {
        self.shared.stop_tx.subscribe()
    }

    /// Spawn the builder loop, accepted processor and gossiper.
    ///
    /// Must be called from inside a tokio runtime.
    pub fn start(&self, gossiper: Arc<dyn Gossiper>, sender: Arc<dyn AppSender>) -> Result<()> {
        let processor = self.processor.lock().take().ok_or(VmError::AlreadyStarted)?;
        *self.gossiper.write() = Some(Arc::clone(&gossiper));

        let builder = Arc::clone(&self.builder);
        let tasks = Tasks {
            builder: tokio::spawn(async move { builder.run().await }),
            processor: tokio::spawn(processor.run(self.stop_signal())),
            gossip: tokio::spawn(async move { gossiper.run(sender).await }),
        };
        *self.tasks.lock() = Some(tasks);

        info!("vm started");
        Ok(())
    }

    /// Stop every background task and wait for them.
    ///
    /// Safe to call more than once and before `start`. Returns the accepted
    /// processor's error if a listener failed.
    pub async fn shutdown(&self) -> Result<()> {
        info!("shutting down vm");
        self.shared.stop_tx.send_replace(true);

        let tasks = self.tasks.lock().take();
        let Some(tasks) = tasks else {
            return Ok(());
        };

        self.builder.done().await;
        if let Some(gossiper) = self.gossiper() {
            gossiper.done().await;
        }
        join_loop("builder", tasks.builder).await?;
        join_loop("gossiper", tasks.gossip).await?;

        match tasks.processor.await {
            Ok(Ok(processed)) => {
                info!(processed, "vm stopped");
                Ok(())
            }
            Ok(Err(e)) => Err(e.into()),
            Err(e) => Err(VmError::Task(format!("accepted processor: {}", e))),
        }
    }

    /// Assemble a child of the preferred block from the current mempool.
    ///
    /// The builder is told a build was attempted whether or not this
    /// succeeds.
    pub async fn build_block(&self) -> Result<Block> {
        let result = self.assemble_block().await;
        self.builder.handle_generate_block();
        if let Err(e) = &result {
            error!(error = %e, "failed to build block");
        }
        result
    }

    async fn assemble_block(&self) -> Result<Block> {
        let parent_id = *self.shared.preferred.read();
        let parent = self.shared.store.get_block(&parent_id)?;
        let timestamp = self.clock.now().max(parent.timestamp());
        let included = self.shared.mempool.len().await as u64;

        let block = Block::child(&parent, timestamp, parent.unit_price(), included)?;
        debug!(
            block = %block.id(),
            height = block.height(),
            txs = included,
            window_sum = block.window().sum(),
            "built block"
        );
        Ok(block)
    }

    /// Decode a block received from the network
    pub fn parse_block(&self, bytes: &[u8]) -> Result<Block> {
        Ok(Block::from_bytes(bytes)?)
    }

    /// Validate `block` and hold it until decided
    pub fn verify(&self, block: Block) -> Result<Arc<Block>> {
        Ok(self.shared.store.verify(block)?)
    }

    /// Finalize a verified block and advance the last accepted pointer.
    ///
    /// The block and the last accepted id are durable once the store
    /// accepts. A full accepted queue only means listeners will not see the
    /// block (as does a closed queue after shutdown); the error is returned
    /// so the host can raise the alarm. Any
    /// other failure leaves the block verified and the pointer unchanged.
    pub fn accept(&self, id: &BlockId) -> Result<Arc<Block>> {
        match self.shared.store.accept(id) {
            Ok(block) => {
                self.advance_last_accepted(Arc::clone(&block));
                Ok(block)
            }
            Err(
                e @ (ChainError::AcceptedQueueFull { .. } | ChainError::AcceptedQueueClosed),
            ) => {
                if let Ok(block) = self.shared.store.get_block(id) {
                    self.advance_last_accepted(block);
                }
                Err(e.into())
            }
            Err(e) => Err(e.into()),
        }
    }

    fn advance_last_accepted(&self, block: Arc<Block>) {
        info!(block = %block.id(), height = block.height(), "accepted block");
        *self.last_accepted.write() = block;
    }

    /// Discard a verified block
    pub fn reject(&self, id: &BlockId) -> Result<Arc<Block>> {
        let block = self.shared.store.reject(id)?;
        debug!(block = %id, height = block.height(), "rejected block");
        Ok(block)
    }

    /// Make `id` the parent of the next built block
    pub fn set_preference(&self, id: &BlockId) -> Result<()> {
        let block = self.shared.store.get_block(id)?;
        *self.shared.preferred.write() = *id;
        debug!(block = %id, height = block.height(), "set preference");
        Ok(())
    }

    /// Current preferred block id
    pub fn preferred(&self) -> BlockId {
        *self.shared.preferred.read()
    }

    /// Last block accepted by this VM
    pub fn last_accepted(&self) -> Arc<Block> {
        Arc::clone(&self.last_accepted.read())
    }

    /// Look a block up across the verified set, cache and database
    pub fn get_block(&self, id: &BlockId) -> Result<Arc<Block>> {
        Ok(self.shared.store.get_block(id)?)
    }

    /// Lifecycle position of `id`
    pub fn status(&self, id: &BlockId) -> Result<BlockStatus> {
        Ok(self.shared.store.status(id)?)
    }

    /// Ask the engine to build now, bypassing the time policy
    pub fn trigger_build(&self) {
        self.builder.trigger_build();
    }

    /// Push newly arrived local transactions to peers
    pub async fn gossip_pending(&self) -> Result<()> {
        let gossiper = self.gossiper().ok_or(VmError::NotStarted)?;
        Ok(gossiper.trigger_gossip().await?)
    }

    /// Forward a peer's gossip message
    pub async fn app_gossip(&self, node_id: NodeId, payload: Vec<u8>) -> Result<()> {
        let gossiper = self.gossiper().ok_or(VmError::NotStarted)?;
        Ok(gossiper.handle_app_gossip(node_id, payload).await?)
    }

    /// Registry holding the chain metrics
    pub fn metrics_registry(&self) -> &Registry {
        &self.registry
    }

    /// Block store, for read paths that bypass the VM
    pub fn store(&self) -> Arc<BlockStore> {
        Arc::clone(&self.shared.store)
    }

    fn gossiper(&self) -> Option<Arc<dyn Gossiper>> {
        self.gossiper.read().clone()
    }
}

fn load_last_accepted(database: &dyn BlockDatabase, config: &VmConfig) -> Result<Block> {
    if let Some(id) = database.last_accepted()? {
        return Ok(database.get_block(&id)?);
    }
    let genesis = Block::genesis(config.genesis_timestamp)?;
    database.put_block(&genesis)?;
    database.set_last_accepted(&genesis.id())?;
    info!(genesis = %genesis.id(), timestamp = genesis.timestamp(), "created genesis block");
    Ok(genesis)
}

async fn join_loop(name: &str, handle: JoinHandle<()>) -> Result<()> {
    handle
        .await
        .map_err(|e| VmError::Task(format!("{}: {}", name, e)))
}
