//! # Full Node Rounds
//!
//! Drives `NodeRuntime` end to end and checks the exported chain against
//! the coordinator's final ledger.

#[cfg(test)]
mod tests {
    use bfl_04_coordinator::{
        load_chain_file, verify_chain_records, ChainRecord, ExportError, LedgerApi,
    };
    use node_runtime::aggregator::WeightSummaryConsumer;
    use node_runtime::config::NodeConfig;
    use node_runtime::miner::MinerOutcome;
    use node_runtime::NodeRuntime;
    use shared_types::{Difficulty, HashHex, MinerId};
    use std::collections::HashSet;
    use std::sync::Arc;

    fn config(rounds: u64, miners: usize) -> NodeConfig {
        NodeConfig::from_toml_str(&format!(
            r#"
            [system]
            num_clients = 8
            num_miners = {miners}
            rounds = {rounds}
            payload_bytes = 16
            seed = 2024

            [miner]
            difficulty = "00"
            h = 2
            delta = 0.5
            nd = 4
            t_wait_ms = 50
            readiness_poll_ms = 5
            "#
        ))
        .unwrap()
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_rounds_then_export_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("chain.json");

        let consumer = Arc::new(WeightSummaryConsumer::new());
        let mut runtime = NodeRuntime::new(config(4, 3), consumer.clone()).unwrap();
        let reports = runtime.run().await.unwrap();
        assert_eq!(reports.len(), 4);
        assert_eq!(reports.last().unwrap().canonical_height, 4);

        let written = runtime.export_to(&path).await.unwrap();
        let chain = runtime.handle().canonical_chain().await.unwrap();
        assert_eq!(written, chain.len());

        let records = load_chain_file(&path).unwrap();
        verify_chain_records(&records, &Difficulty::from_prefix("00").unwrap()).unwrap();
        for (record, block) in records.iter().zip(&chain) {
            assert_eq!(record, &ChainRecord::from(block.as_ref()));
        }
        assert_eq!(records[0].producer_id, -1);
        assert_eq!(records[0].content_hash, chain[0].content_hash.to_hex());
        for record in &records[1..] {
            // Every client's update reached every pool before sealing.
            assert_eq!(record.num_updates, 8);
            let unique: HashSet<_> = record.origin_ids.iter().collect();
            assert_eq!(unique.len(), 8);
        }

        let summaries = consumer.summaries();
        assert_eq!(summaries.len(), 4);
        assert_eq!(summaries[3].tip_hash, chain[4].content_hash);

        let coordinator = runtime.shutdown().await.unwrap();
        assert_eq!(coordinator.canonical_chain(), chain);
        // Three miners sealed on the same predecessor every round.
        assert_eq!(coordinator.metrics().get_attached(), 12);
        assert_eq!(coordinator.ledger().block_count(), 13);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_stale_search_cancellation_enabled() {
        let mut config = config(3, 3);
        config.miner.cancel_stale_searches = true;
        config.miner.cancel_check_interval = 16;

        let mut runtime = NodeRuntime::new(config, Arc::new(WeightSummaryConsumer::new())).unwrap();
        let reports = runtime.run().await.unwrap();

        for report in &reports {
            let mut attached = 0;
            for miner in &report.miners {
                match &miner.outcome {
                    MinerOutcome::Submitted { outcome, .. } => {
                        assert!(outcome.is_attached());
                        attached += 1;
                    }
                    MinerOutcome::Cancelled { .. } => {}
                }
            }
            // The first block of the round always lands.
            assert!(attached >= 1);
            assert_eq!(report.canonical_height, report.round);
        }
        runtime.shutdown().await.unwrap();
    }

    #[tokio::test]
    async fn test_tampered_export_fails_verification() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("chain.json");

        let mut runtime =
            NodeRuntime::new(config(2, 1), Arc::new(WeightSummaryConsumer::new())).unwrap();
        runtime.run().await.unwrap();
        runtime.export_to(&path).await.unwrap();

        let mut records = load_chain_file(&path).unwrap();
        let difficulty = Difficulty::from_prefix("00").unwrap();
        verify_chain_records(&records, &difficulty).unwrap();
        assert_eq!(records[1].producer_id, MinerId(0).export_id());

        records[2].predecessor_hash = records[0].content_hash.clone();
        assert!(matches!(
            verify_chain_records(&records, &difficulty),
            Err(ExportError::BrokenLink { index: 2 })
        ));
        runtime.shutdown().await.unwrap();
    }
}
