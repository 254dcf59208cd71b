//! # Scheduling Flows
//!
//! The time builder reading real chain state through the VM: the rate check
//! sees the windows that block production wrote into headers.

#[cfg(test)]
mod tests {
    use super::super::fixtures::Harness;
    use shared_types::EngineMessage;
    use std::time::Duration;
    use tokio::time::sleep;
    use vmsdk_builder::BuilderConfig;
    use vmsdk_chain::ChainConfig;

    fn time_builder(build_interval_ms: u64, check_interval_ms: u64) -> Harness {
        Harness::new(
            BuilderConfig {
                build_interval_ms,
                check_interval_ms,
                ..BuilderConfig::default()
            },
            ChainConfig::default(),
        )
    }

    #[tokio::test(start_paused = true)]
    async fn test_full_second_suppresses_until_clock_moves() {
        let mut h = time_builder(200, 200);
        h.start();

        h.produce_block().await;
        h.produce_block().await;
        assert_eq!(h.vm.last_accepted().window().last(), 2);

        h.mempool.add(1);
        sleep(Duration::from_secs(1)).await;
        assert!(h.engine_rx.try_recv().is_err(), "target reached this second");

        h.clock.advance(1);
        sleep(Duration::from_millis(250)).await;
        assert_eq!(h.engine_rx.try_recv().unwrap(), EngineMessage::PendingTxs);

        h.vm.shutdown().await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn test_one_block_this_second_still_suppresses_at_target_two() {
        let mut h = time_builder(200, 200);
        h.start();

        // The candidate would be the second block this second.
        h.produce_block().await;
        h.mempool.add(1);
        sleep(Duration::from_secs(1)).await;
        assert!(h.engine_rx.try_recv().is_err());

        h.vm.shutdown().await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn test_no_signal_within_build_interval() {
        let mut h = time_builder(1_000, 100);
        h.clock.advance(100);
        h.start();

        h.vm.build_block().await.unwrap();
        h.mempool.add(1);

        sleep(Duration::from_millis(500)).await;
        assert!(h.engine_rx.try_recv().is_err(), "built 500ms ago");

        sleep(Duration::from_millis(600)).await;
        assert_eq!(h.engine_rx.try_recv().unwrap(), EngineMessage::PendingTxs);

        h.vm.shutdown().await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn test_unread_engine_channel_holds_one_signal() {
        let mut h = time_builder(0, 100);
        h.clock.advance(100);
        h.mempool.add(10);
        h.start();

        sleep(Duration::from_secs(2)).await;

        assert_eq!(h.engine_rx.try_recv().unwrap(), EngineMessage::PendingTxs);
        assert!(h.engine_rx.try_recv().is_err());
        h.vm.shutdown().await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn test_stale_tip_window_is_ignored() {
        let mut h = time_builder(200, 200);
        h.start();
        for _ in 0..5 {
            h.produce_block().await;
        }
        assert_eq!(h.vm.last_accepted().window().last(), 5);

        // A full minute later the tip window has rolled out entirely.
        h.clock.advance(60);
        h.mempool.add(1);
        sleep(Duration::from_millis(450)).await;
        assert_eq!(h.engine_rx.try_recv().unwrap(), EngineMessage::PendingTxs);

        h.vm.shutdown().await.unwrap();
    }
}
