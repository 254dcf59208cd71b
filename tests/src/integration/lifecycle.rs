//! # Block Lifecycle Flows
//!
//! `Unknown → Verified → {Accepted | Rejected}` driven through the VM the
//! way the consensus engine drives it, with the accepted processor running.

#[cfg(test)]
mod tests {
    use super::super::fixtures::Harness;
    use shared_types::EngineMessage;
    use vmsdk_builder::BuilderConfig;
    use vmsdk_chain::{Block, BlockDatabase, BlockHeader, BlockStatus, ChainConfig, ChainError};
    use vmsdk_window::Window;
    use vmsdk_vm::VmError;

    #[tokio::test]
    async fn test_cache_capacity_three_evicts_oldest() {
        let h = Harness::new(
            BuilderConfig::manual(),
            ChainConfig {
                accepted_cache_capacity: 3,
                ..ChainConfig::default()
            },
        );
        h.start();

        let mut ids = Vec::new();
        for _ in 0..4 {
            ids.push(h.produce_block().await.id());
        }
        h.vm.shutdown().await.unwrap();

        let store = h.vm.store();
        let (a, rest) = ids.split_first().unwrap();
        assert!(!store.accepted_cache_contains(a));
        for id in rest {
            assert!(store.accepted_cache_contains(id));
        }

        let reads = h.db.reads();
        for id in rest {
            h.vm.get_block(id).unwrap();
        }
        assert_eq!(h.db.reads(), reads);

        assert_eq!(h.vm.get_block(a).unwrap().id(), *a);
        assert_eq!(h.db.reads(), reads + 1);
    }

    #[tokio::test]
    async fn test_engine_loop_builds_chain() {
        let mut h = Harness::manual();
        h.start();

        for expected_height in 1..=5u64 {
            h.mempool.add(2);
            h.vm.trigger_build();
            assert_eq!(h.engine_rx.recv().await, Some(EngineMessage::PendingTxs));

            let block = h.produce_block().await;
            assert_eq!(block.height(), expected_height);
            // Earlier blocks may not have drained the pool yet.
            assert!(block.unit_cost() >= 2);
        }
        h.vm.shutdown().await.unwrap();

        let tip = h.vm.last_accepted();
        assert_eq!(tip.height(), 5);
        assert_eq!(h.db.last_accepted().unwrap(), Some(tip.id()));
        assert_eq!(h.db.len(), 6);
        assert_eq!(h.mempool.pending(), 0);
    }

    #[tokio::test]
    async fn test_competing_children_one_accepted() {
        let h = Harness::manual();
        h.start();

        let first = h.vm.build_block().await.unwrap();
        h.mempool.add(1);
        let second = h.vm.build_block().await.unwrap();
        assert_ne!(first.id(), second.id());
        assert_eq!(first.parent(), second.parent());

        let first = h.vm.verify(first).unwrap();
        let second = h.vm.verify(second).unwrap();
        assert_eq!(h.vm.store().verified_len(), 2);

        h.vm.accept(&second.id()).unwrap();
        h.vm.reject(&first.id()).unwrap();

        assert_eq!(h.vm.status(&second.id()).unwrap(), BlockStatus::Accepted);
        assert_eq!(h.vm.status(&first.id()).unwrap(), BlockStatus::Unknown);
        assert_eq!(h.vm.store().verified_len(), 0);
        h.vm.shutdown().await.unwrap();
    }

    #[tokio::test]
    async fn test_queue_full_surfaces_but_block_is_accepted() {
        // Never started: nothing drains the queue.
        let h = Harness::new(
            BuilderConfig::manual(),
            ChainConfig {
                accepted_queue_capacity: 1,
                ..ChainConfig::default()
            },
        );

        h.produce_block().await;
        let built = h.vm.build_block().await.unwrap();
        let block = h.vm.verify(built).unwrap();
        h.vm.set_preference(&block.id()).unwrap();

        let err = h.vm.accept(&block.id()).unwrap_err();
        assert!(matches!(
            err,
            VmError::Chain(ChainError::AcceptedQueueFull { capacity: 1 })
        ));
        assert_eq!(h.vm.last_accepted().id(), block.id());
        assert_eq!(h.vm.status(&block.id()).unwrap(), BlockStatus::Accepted);
    }

    #[tokio::test]
    async fn test_network_block_round_trip() {
        let producer = Harness::manual();
        let follower = Harness::manual();
        assert_eq!(
            producer.vm.last_accepted().id(),
            follower.vm.last_accepted().id()
        );

        producer.mempool.add(3);
        let built = producer.vm.build_block().await.unwrap();
        let bytes = built.to_bytes().unwrap();

        let parsed = follower.vm.parse_block(&bytes).unwrap();
        let verified = follower.vm.verify(parsed).unwrap();
        assert_eq!(verified.id(), built.id());
        follower.vm.accept(&verified.id()).unwrap();
        assert_eq!(follower.vm.last_accepted().id(), built.id());
    }

    #[tokio::test]
    async fn test_block_with_unknown_parent_rejected() {
        let producer = Harness::manual();
        let follower = Harness::manual();

        producer.produce_block().await;
        let second = producer.vm.build_block().await.unwrap();
        assert_eq!(second.window().last(), 2);

        let err = follower.vm.verify(second).unwrap_err();
        assert!(matches!(
            err,
            VmError::Chain(ChainError::ParentNotFound { .. })
        ));
    }

    #[tokio::test]
    async fn test_forged_window_rejected_at_verify() {
        let h = Harness::manual();
        let genesis = h.vm.last_accepted();

        // Claims no blocks were produced this second.
        let forged = Block::new(BlockHeader {
            parent: genesis.id(),
            height: 1,
            timestamp: genesis.timestamp(),
            window: Window::zero(),
            unit_price: 0,
            unit_cost: 0,
        })
        .unwrap();

        let err = h.vm.verify(forged).unwrap_err();
        assert!(matches!(
            err,
            VmError::Chain(ChainError::InvalidBlock { .. })
        ));
        assert_eq!(h.vm.store().verified_len(), 0);
    }
}
