//! # Block State Flows
//!
//! Each block executes against its own [`vmsdk_tstate::TState`] overlay;
//! only accepted blocks reach the shared database.

#[cfg(test)]
mod tests {
    use super::super::fixtures::Harness;
    use std::sync::Arc;
    use vmsdk_tstate::{Database, InMemoryDatabase, StateError, TState};

    /// Apply a balance transfer, failing (and undoing) on overdraft
    async fn transfer(state: &TState, from: &[u8], to: &[u8], amount: u64) -> Result<(), StateError> {
        let checkpoint = state.checkpoint();
        let result = async {
            let from_balance = read_balance(state, from).await?;
            let to_balance = read_balance(state, to).await?;
            state.insert(from, &from_balance.saturating_sub(amount).to_be_bytes()).await?;
            state.insert(to, &(to_balance + amount).to_be_bytes()).await?;
            if from_balance < amount {
                return Err(StateError::Backend("insufficient balance".into()));
            }
            Ok(())
        }
        .await;
        if result.is_err() {
            state.rollback(checkpoint)?;
        }
        result
    }

    async fn read_balance(state: &dyn Database, key: &[u8]) -> Result<u64, StateError> {
        match state.get_value(key).await {
            Ok(bytes) => {
                let mut buf = [0u8; 8];
                buf.copy_from_slice(&bytes[..8]);
                Ok(u64::from_be_bytes(buf))
            }
            Err(e) if e.is_not_found() => Ok(0),
            Err(e) => Err(e),
        }
    }

    #[tokio::test]
    async fn test_accepted_block_state_committed_rejected_discarded() {
        let h = Harness::manual();
        let db = Arc::new(InMemoryDatabase::new());
        db.insert(b"alice", &100u64.to_be_bytes()).await.unwrap();

        // Two competing blocks, each with its own overlay.
        let accepted_state = TState::new(db.clone());
        transfer(&accepted_state, b"alice", b"bob", 30).await.unwrap();
        assert!(transfer(&accepted_state, b"alice", b"carol", 500).await.is_err());
        let accepted = h.vm.verify(h.vm.build_block().await.unwrap()).unwrap();

        let rejected_state = TState::new(db.clone());
        transfer(&rejected_state, b"alice", b"dave", 70).await.unwrap();
        h.mempool.add(1);
        let rejected = h.vm.verify(h.vm.build_block().await.unwrap()).unwrap();

        h.vm.accept(&accepted.id()).unwrap();
        accepted_state.commit().await.unwrap();
        h.vm.reject(&rejected.id()).unwrap();
        drop(rejected_state);

        assert_eq!(read_balance(db.as_ref(), b"alice").await.unwrap(), 70);
        assert_eq!(read_balance(db.as_ref(), b"bob").await.unwrap(), 30);
        assert_eq!(read_balance(db.as_ref(), b"carol").await.unwrap(), 0);
        assert_eq!(read_balance(db.as_ref(), b"dave").await.unwrap(), 0);
    }
}
