use crate::client::{Deliver, DeliveryOutcome};
use std::collections::VecDeque;
use std::mem;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{self, Duration, Instant};
use tracing::{debug, error, warn};

/// One pending webhook delivery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueuedMessage {
    pub webhook_url: String,
    pub body: String,
    pub enqueued_at_epoch: i64,
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum EnqueueError {
    #[error("message body is empty")]
    EmptyBody,
    #[error("webhook url is empty")]
    EmptyWebhookUrl,
    #[error("delivery worker is gone")]
    WorkerGone,
}

/// Producer-side handle to the delivery pipeline. Enqueueing never blocks
/// and never drops a well-formed message; malformed requests are rejected
/// here, before they reach the queue.
#[derive(Debug, Clone)]
pub struct QueueHandle {
    tx: mpsc::UnboundedSender<QueuedMessage>,
}

impl QueueHandle {
    pub fn enqueue(
        &self,
        webhook_url: String,
        body: String,
        now_epoch: i64,
    ) -> Result<(), EnqueueError> {
        if body.trim().is_empty() {
            error!("enqueue rejected: message body is empty");
            return Err(EnqueueError::EmptyBody);
        }

        if webhook_url.trim().is_empty() {
            error!("enqueue rejected: webhook url is empty");
            return Err(EnqueueError::EmptyWebhookUrl);
        }

        let message = QueuedMessage {
            webhook_url,
            body,
            enqueued_at_epoch: now_epoch,
        };

        self.tx
            .send(message)
            .map_err(|_| EnqueueError::WorkerGone)
    }
}

#[cfg(test)]
pub(crate) fn test_channel() -> (QueueHandle, mpsc::UnboundedReceiver<QueuedMessage>) {
    let (tx, rx) = mpsc::unbounded_channel();
    (QueueHandle { tx }, rx)
}

/// Health of the delivery connection, owned exclusively by the worker task.
#[derive(Debug)]
struct DeliveryState {
    connection_healthy: bool,
    retrying: bool,
    last_failed: Option<QueuedMessage>,
}

impl Default for DeliveryState {
    fn default() -> Self {
        Self {
            connection_healthy: true,
            retrying: false,
            last_failed: None,
        }
    }
}

/// The delivery state machine. A single spawned task owns all three queues
/// and the connection state, so promotion and drain can never race: at most
/// one drain cycle exists at any time.
///
/// Queue roles: `incoming` collects new messages, `in_flight` is the batch
/// being drained, `error_requeue` holds the remainder of a drain abandoned
/// after a failure. Promotion moves a whole queue into `in_flight` by
/// ownership transfer, failed remainders ahead of newer messages.
struct DeliveryWorker<D> {
    client: D,
    rx: mpsc::UnboundedReceiver<QueuedMessage>,
    incoming: VecDeque<QueuedMessage>,
    in_flight: VecDeque<QueuedMessage>,
    error_requeue: VecDeque<QueuedMessage>,
    state: DeliveryState,
    queue_interval: Duration,
    sleep_interval: Duration,
    closed: bool,
}

/// Spawns the delivery worker and returns the producer handle plus the task
/// handle. Aborting the task discards any undelivered messages.
pub fn spawn_pipeline<D>(
    client: D,
    queue_interval: Duration,
    sleep_interval: Duration,
) -> (QueueHandle, JoinHandle<()>)
where
    D: Deliver + 'static,
{
    let (tx, rx) = mpsc::unbounded_channel();
    let worker = DeliveryWorker {
        client,
        rx,
        incoming: VecDeque::new(),
        in_flight: VecDeque::new(),
        error_requeue: VecDeque::new(),
        state: DeliveryState::default(),
        queue_interval,
        sleep_interval,
        closed: false,
    };

    let handle = tokio::spawn(worker.run());
    (QueueHandle { tx }, handle)
}

impl<D: Deliver> DeliveryWorker<D> {
    async fn run(mut self) {
        loop {
            if !self.state.connection_healthy {
                self.recover().await;
                continue;
            }

            if self.in_flight.is_empty() && !self.promote() {
                if self.closed {
                    break;
                }
                match self.rx.recv().await {
                    Some(message) => self.incoming.push_back(message),
                    None => self.closed = true,
                }
                continue;
            }

            self.drain_one().await;
        }
    }

    /// Moves the next ready queue into `in_flight`. Previously-failed
    /// messages take priority over newly-enqueued ones so a temporary outage
    /// cannot starve them behind fresh traffic.
    fn promote(&mut self) -> bool {
        if !self.in_flight.is_empty() {
            return true;
        }

        if !self.error_requeue.is_empty() {
            self.in_flight = mem::take(&mut self.error_requeue);
            return true;
        }

        if !self.incoming.is_empty() {
            self.in_flight = mem::take(&mut self.incoming);
            return true;
        }

        false
    }

    async fn drain_one(&mut self) {
        let Some(message) = self.in_flight.front().cloned() else {
            return;
        };

        let outcome = self.client.send(&message).await;
        // Removed after the attempt completes, success or not, so the same
        // cycle can never resend it.
        self.in_flight.pop_front();
        let healthy = outcome.is_healthy();
        self.apply_outcome(message, outcome);

        if !healthy {
            // Abandon the cycle; the remainder retries ahead of anything
            // enqueued after the failure.
            let remainder = mem::take(&mut self.in_flight);
            self.error_requeue.extend(remainder);
            return;
        }

        self.pause(self.queue_interval).await;
    }

    /// Degraded mode: hold all promotion, sleep, then retry the single most
    /// recently failed message. Health is re-evaluated from that retry's
    /// outcome, whatever it is.
    async fn recover(&mut self) {
        if !self.state.retrying {
            self.state.retrying = true;
            warn!(
                sleep_seconds = self.sleep_interval.as_secs_f64(),
                pending = self.incoming.len() + self.error_requeue.len(),
                "webhook connection unhealthy; retrying last failed message after sleep"
            );
        }

        self.pause(self.sleep_interval).await;

        match self.state.last_failed.take() {
            Some(failed) => {
                let outcome = self.client.send(&failed).await;
                self.apply_outcome(failed, outcome);
                // The retry is a send like any other: the next one, even from
                // a freshly promoted cycle, keeps the minimum spacing.
                self.pause(self.queue_interval).await;
            }
            None => self.state.connection_healthy = true,
        }

        self.state.retrying = false;
    }

    fn apply_outcome(&mut self, message: QueuedMessage, outcome: DeliveryOutcome) {
        match outcome {
            DeliveryOutcome::Success => {
                debug!(webhook_url = %message.webhook_url, "webhook delivered");
                self.state.connection_healthy = true;
            }
            DeliveryOutcome::RateLimited => {
                error!(
                    webhook_url = %message.webhook_url,
                    "webhook rate limited; increase queue_interval_seconds to avoid this"
                );
                self.state.connection_healthy = false;
                self.state.last_failed = Some(message);
            }
            DeliveryOutcome::Error { status, detail } => {
                error!(
                    webhook_url = %message.webhook_url,
                    status = ?status,
                    detail = %detail,
                    "webhook delivery failed"
                );
                self.state.connection_healthy = false;
                self.state.last_failed = Some(message);
            }
        }
    }

    /// Sleeps for `duration` while still absorbing new enqueues into
    /// `incoming`. Messages arriving mid-drain never join the active batch.
    async fn pause(&mut self, duration: Duration) {
        let deadline = Instant::now() + duration;
        loop {
            if self.closed {
                time::sleep_until(deadline).await;
                return;
            }

            tokio::select! {
                _ = time::sleep_until(deadline) => return,
                message = self.rx.recv() => match message {
                    Some(message) => self.incoming.push_back(message),
                    None => self.closed = true,
                },
            }
        }
    }
}
