//! Deploy Flow Example
//!
//! Walks through what a challenge deployment script does with tidewait,
//! against a simulated node:
//! - Loading `.env` and the per-chain env file
//! - Retrying a flaky transaction submission
//! - Polling until the receipt is observable
//! - Bounding a slow status query with a timeout
//! - Batching a deduplicated participant list
//!
//! Run with: cargo run --example deploy_flow

use std::convert::Infallible;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tidewait::config::EnvLoader;
use tidewait::prelude::*;

/// Stand-in for a remote node: drops the first submissions and mines the
/// transaction a few blocks later.
#[derive(Debug, Default)]
struct SimulatedNode {
    submissions: AtomicU32,
    blocks: AtomicU32,
}

impl SimulatedNode {
    async fn submit(&self, call: &str) -> Result<String, String> {
        let n = self.submissions.fetch_add(1, Ordering::SeqCst);
        if n < 2 {
            Err(format!("{}: nonce too low", call))
        } else {
            Ok(format!("0x{:064x}", n))
        }
    }

    async fn receipt(&self, _tx: &str) -> Option<u32> {
        let block = self.blocks.fetch_add(1, Ordering::SeqCst);
        (block >= 3).then_some(block)
    }

    async fn current_cycle(&self) -> Result<u64, Infallible> {
        tokio::time::sleep(Duration::from_secs(5)).await;
        Ok(4)
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .init();

    println!("Deploy Flow Example");
    println!("===================\n");

    let env = EnvLoader::from_current_dir()?.load()?;
    println!("chain: {:?}, env files: {:?}\n", env.chain, env.files);

    let node = Arc::new(SimulatedNode::default());

    // Submit createChallenge, retrying dropped submissions.
    let tx = retry_with_backoff(
        || node.submit("createChallenge"),
        RetryOptions::new(RetryPolicy::constant(Duration::from_millis(200)).with_max_attempts(5))
            .with_label("createChallenge"),
    )
    .await
    .map_err(|e| e.to_string())?;
    println!("submitted: {}", tx);

    // Wait until the receipt shows up.
    let receipt = poll_until(
        || node.receipt(&tx),
        PollOptions::new()
            .with_interval(Duration::from_millis(100))
            .with_max_attempts(50)
            .with_label("createChallenge receipt"),
    )
    .await;
    match receipt {
        PollOutcome::Satisfied { value, attempts } => {
            println!("mined in block {:?} after {} polls", value, attempts)
        }
        PollOutcome::Exhausted { attempts, .. } => {
            println!("still pending after {} polls", attempts)
        }
    }

    // A status query that is too slow falls back to "unknown".
    let cycle = with_timeout(
        node.current_cycle(),
        TimeoutOptions::new(Duration::from_millis(500), 0),
    )
    .await?;
    println!("current cycle (0 = unknown): {}", cycle);

    // Participants arrive with duplicates; the contract takes 2 per call.
    let participants = ["0xa1", "0xb2", "0xa1", "0xc3", "0xd4", "0xb2"];
    let batches = chunk(&dedupe(&participants), 2)?;
    for (i, batch) in batches.iter().enumerate() {
        run_with_hooks(
            || println!("  participate batch {}: {:?}", i, batch),
            || println!("  unlocking signer"),
            || println!("  locking signer"),
        );
    }

    Ok(())
}
