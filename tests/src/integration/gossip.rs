//! # Gossip Flows
//!
//! A gossiper built on the VM's stop signal: started by `Vm::start`, fed
//! through the VM, and stopped by `Vm::shutdown`.

#[cfg(test)]
mod tests {
    use super::super::fixtures::{Harness, RecordingSender};
    use async_trait::async_trait;
    use parking_lot::Mutex;
    use shared_types::NodeId;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;
    use tokio::sync::{watch, Notify};
    use vmsdk_gossiper::{AppSender, GossipError, Gossiper, Result};

    /// Sends a marker payload on every trigger while running
    struct EchoGossiper {
        stop: watch::Receiver<bool>,
        sender: Mutex<Option<Arc<dyn AppSender>>>,
        running: Notify,
        finished: AtomicBool,
        exited: Notify,
        received: Mutex<Vec<(NodeId, Vec<u8>)>>,
    }

    impl EchoGossiper {
        fn new(stop: watch::Receiver<bool>) -> Self {
            Self {
                stop,
                sender: Mutex::new(None),
                running: Notify::new(),
                finished: AtomicBool::new(false),
                exited: Notify::new(),
                received: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl Gossiper for EchoGossiper {
        async fn run(&self, sender: Arc<dyn AppSender>) {
            *self.sender.lock() = Some(sender);
            self.running.notify_one();
            let mut stop = self.stop.clone();
            let _ = stop.wait_for(|stopped| *stopped).await;
            self.finished.store(true, Ordering::SeqCst);
            self.exited.notify_waiters();
        }

        async fn trigger_gossip(&self) -> Result<()> {
            let sender = self.sender.lock().clone();
            match sender {
                Some(sender) => sender.send_app_gossip(b"pending".to_vec()).await,
                None => Err(GossipError::Send("not running".into())),
            }
        }

        async fn handle_app_gossip(&self, node_id: NodeId, payload: Vec<u8>) -> Result<()> {
            if payload.is_empty() {
                return Err(GossipError::InvalidPayload {
                    node: node_id,
                    reason: "empty".into(),
                });
            }
            self.received.lock().push((node_id, payload));
            Ok(())
        }

        async fn done(&self) {
            let exited = self.exited.notified();
            if self.finished.load(Ordering::SeqCst) {
                return;
            }
            exited.await;
        }
    }

    #[tokio::test]
    async fn test_gossip_runs_until_vm_shutdown() {
        let h = Harness::manual();
        let gossiper = Arc::new(EchoGossiper::new(h.vm.stop_signal()));
        let sender = Arc::new(RecordingSender::default());

        h.vm.start(gossiper.clone(), sender.clone()).unwrap();
        gossiper.running.notified().await;

        h.vm.gossip_pending().await.unwrap();
        h.vm.gossip_pending().await.unwrap();
        assert_eq!(sender.sent(), vec![b"pending".to_vec(), b"pending".to_vec()]);

        h.vm.shutdown().await.unwrap();
        assert!(gossiper.finished.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn test_peer_gossip_forwarded_and_validated() {
        let h = Harness::manual();
        let gossiper = Arc::new(EchoGossiper::new(h.vm.stop_signal()));
        h.vm.start(gossiper.clone(), Arc::new(RecordingSender::default()))
            .unwrap();

        let peer = NodeId([7; 32]);
        h.vm.app_gossip(peer, vec![1, 2]).await.unwrap();
        let err = h.vm.app_gossip(peer, Vec::new()).await.unwrap_err();
        assert!(err.to_string().contains("empty"));

        assert_eq!(*gossiper.received.lock(), vec![(peer, vec![1, 2])]);
        h.vm.shutdown().await.unwrap();
    }
}
