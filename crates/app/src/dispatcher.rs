//! Command dispatcher — bounded queue drained by a fixed worker pool.
//!
//! Apply/undo operations enqueue per-channel `set` commands and return
//! without waiting for delivery. Workers perform the remote call with a
//! fixed timeout; a failed or timed-out command is logged and dropped,
//! never aborting the enclosing operation or blocking other commands.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{Mutex, mpsc};
use tokio::task::JoinHandle;

use serde_json::Value;

use crate::ports::ChannelEndpoint;

/// A pending remote mutation.
#[derive(Debug, Clone, PartialEq)]
pub struct Command {
    /// Endpoint topic addressing one channel of one thing.
    pub topic: String,
    /// Method to invoke (always `"set"` today).
    pub method: String,
    /// Opaque payload to apply.
    pub payload: Value,
}

/// Derive the endpoint topic for a thing's channel.
#[must_use]
pub fn channel_topic(thing_id: &str, channel_id: &str) -> String {
    format!("devices/{thing_id}/channels/{channel_id}")
}

/// Dispatcher tuning knobs.
#[derive(Debug, Clone)]
pub struct DispatcherConfig {
    /// Number of concurrent workers draining the queue.
    pub workers: usize,
    /// Capacity of the pending-command queue.
    pub queue_depth: usize,
    /// Per-call timeout for remote `set` invocations.
    pub call_timeout: Duration,
}

impl Default for DispatcherConfig {
    fn default() -> Self {
        Self {
            workers: 10,
            queue_depth: 64,
            call_timeout: Duration::from_secs(10),
        }
    }
}

/// Handle to a running worker pool.
///
/// Cheap to share behind the scene service; dropping the handle closes the
/// queue and lets workers drain what is left and exit.
pub struct CommandDispatcher {
    tx: mpsc::Sender<Command>,
    workers: Vec<JoinHandle<()>>,
}

impl CommandDispatcher {
    /// Start `config.workers` workers draining a bounded queue against
    /// `endpoint`.
    pub fn spawn<E>(endpoint: E, config: &DispatcherConfig) -> Self
    where
        E: ChannelEndpoint + 'static,
    {
        let (tx, rx) = mpsc::channel::<Command>(config.queue_depth.max(1));
        let rx = Arc::new(Mutex::new(rx));
        let endpoint = Arc::new(endpoint);

        let workers = (0..config.workers.max(1))
            .map(|worker| {
                let rx = Arc::clone(&rx);
                let endpoint = Arc::clone(&endpoint);
                let call_timeout = config.call_timeout;
                tokio::spawn(async move {
                    loop {
                        // The lock is only held while waiting for the next
                        // command; execution happens after release so the
                        // pool stays concurrent.
                        let command = { rx.lock().await.recv().await };
                        let Some(Command {
                            topic,
                            method,
                            payload,
                        }) = command
                        else {
                            break;
                        };

                        match tokio::time::timeout(call_timeout, endpoint.set(&topic, payload))
                            .await
                        {
                            Ok(Ok(())) => {
                                tracing::debug!(worker, %topic, %method, "command delivered");
                            }
                            Ok(Err(err)) => {
                                tracing::warn!(worker, %topic, %method, error = %err, "command failed");
                            }
                            Err(_) => {
                                tracing::warn!(worker, %topic, %method, "command timed out");
                            }
                        }
                    }
                    tracing::debug!(worker, "dispatch worker stopped");
                })
            })
            .collect();

        Self { tx, workers }
    }

    /// Enqueue a command, waiting for queue capacity when full.
    ///
    /// The wait is bounded by the pool draining the queue; against a closed
    /// queue the command is logged and dropped rather than blocking the
    /// caller.
    pub async fn enqueue(&self, command: Command) {
        if let Err(err) = self.tx.send(command).await {
            tracing::warn!(topic = %err.0.topic, "dispatch queue closed, command dropped");
        }
    }

    /// Close the queue and wait for workers to drain it and exit.
    pub async fn shutdown(self) {
        drop(self.tx);
        for handle in self.workers {
            let _ = handle.await;
        }
    }
}
