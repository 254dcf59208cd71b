//! Inbound ports (driving side - API)

use async_trait::async_trait;

/// Primary port: the four-operation builder contract.
///
/// Callers hold `Arc<dyn Builder>` and never depend on which variant runs.
#[async_trait]
pub trait Builder: Send + Sync {
    /// Run the scheduling loop until the VM's stop signal fires.
    ///
    /// Variants without a loop return immediately.
    async fn run(&self);

    /// Record that a build attempt just finished, successful or not.
    ///
    /// Must be called immediately after every build so minimum spacing holds.
    fn handle_generate_block(&self);

    /// Tell the engine there is work pending, without blocking.
    ///
    /// A signal that cannot be delivered right now is dropped.
    fn trigger_build(&self);

    /// Wait until the scheduling loop has exited.
    ///
    /// Any number of tasks may wait, any number of times.
    async fn done(&self);
}
