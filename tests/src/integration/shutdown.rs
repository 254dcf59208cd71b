//! # Shutdown Flows
//!
//! Stop is observed by every background task, queued accepted blocks still
//! reach listeners, and repeated or concurrent shutdowns are harmless.

#[cfg(test)]
mod tests {
    use super::super::fixtures::Harness;
    use std::sync::Arc;
    use std::time::Duration;
    use tokio::time::timeout;
    use vmsdk_builder::BuilderConfig;
    use vmsdk_chain::{BlockDatabase, ChainConfig};

    #[tokio::test]
    async fn test_queued_blocks_processed_on_shutdown() {
        let h = Harness::manual();
        h.start();

        let mut last = None;
        for _ in 0..20 {
            last = Some(h.produce_block().await.id());
        }
        h.vm.shutdown().await.unwrap();

        assert_eq!(h.db.len(), 21);
        assert_eq!(h.db.last_accepted().unwrap(), last);
        assert_eq!(h.vm.store().metrics().accepted_processed.get(), 20);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_concurrent_shutdowns_all_return() {
        let h = Harness::new(BuilderConfig::default(), ChainConfig::default());
        h.start();

        let handles: Vec<_> = (0..4)
            .map(|_| {
                let vm = Arc::clone(&h.vm);
                tokio::spawn(async move { vm.shutdown().await })
            })
            .collect();

        for handle in handles {
            timeout(Duration::from_secs(5), handle)
                .await
                .expect("shutdown hung")
                .unwrap()
                .unwrap();
        }
        assert!(*h.vm.stop_signal().borrow());
    }

    #[tokio::test]
    async fn test_accept_after_shutdown_reports_closed_queue() {
        let h = Harness::manual();
        h.start();
        h.vm.shutdown().await.unwrap();

        let built = h.vm.build_block().await.unwrap();
        let block = h.vm.verify(built).unwrap();
        let err = h.vm.accept(&block.id()).unwrap_err();
        assert!(err.to_string().contains("closed"));

        // Durable even though no listener will see it.
        assert_eq!(h.vm.last_accepted().id(), block.id());
        assert_eq!(h.db.last_accepted().unwrap(), Some(block.id()));
    }
}
