//! # Metrics Exposition
//!
//! The VM's registry rendered through the telemetry crate's text encoder.

#[cfg(test)]
mod tests {
    use super::super::fixtures::Harness;
    use vmsdk_telemetry::{encode_metrics, TelemetryConfig};

    #[tokio::test]
    async fn test_lifecycle_counters_exported() {
        let h = Harness::manual();
        h.start();

        h.produce_block().await;
        h.produce_block().await;
        let built = h.vm.build_block().await.unwrap();
        let doomed = h.vm.verify(built).unwrap();
        h.vm.reject(&doomed.id()).unwrap();
        h.vm.shutdown().await.unwrap();

        let text = encode_metrics(h.vm.metrics_registry()).unwrap();
        assert!(text.contains("vmsdk_blocks_verified_total 3"));
        assert!(text.contains("vmsdk_blocks_accepted_total 2"));
        assert!(text.contains("vmsdk_blocks_rejected_total 1"));
        assert!(text.contains("vmsdk_accepted_blocks_processed_total 2"));
        assert!(text.contains("vmsdk_verified_blocks 0"));
    }

    #[test]
    fn test_config_from_process_style_lookup() {
        let config = TelemetryConfig::from_lookup(|key| match key {
            "VMSDK_SERVICE_NAME" => Some("vm-node".to_string()),
            "RUST_LOG" => Some("vmsdk_chain=debug".to_string()),
            _ => None,
        });
        assert_eq!(config.service_name, "vm-node");
        assert_eq!(config.log_level, "vmsdk_chain=debug");
    }
}
