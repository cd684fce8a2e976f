//! Relays live game-server events to Discord webhooks.
//!
//! The host constructs a [`Notifier`] from a [`NotifierConfig`] and calls
//! [`Notifier::notify`] with typed [`NotificationEvent`] values as things
//! happen in the world. Classification, dedup, formatting, queueing, and
//! rate-limit backoff all happen behind that one call; nothing in this crate
//! blocks the host's event loop.

pub mod client;
pub mod clock;
pub mod dedup;
pub mod dispatcher;
pub mod formatter;
pub mod queue;

pub use notify_core::config::{EventSettings, GlobalSettings, NotifierConfig};
pub use notify_core::event::{EventKind, NotificationEvent, Position};
pub use notify_core::grid::{GridLocator, WorldGrid};
pub use notify_core::templates::{DefaultTemplates, TemplateSource};

use crate::client::WebhookClient;
use crate::clock::{Clock, SystemClock};
use crate::dispatcher::EventDispatcher;
use crate::queue::spawn_pipeline;
use anyhow::{Context, Result};
use std::sync::Arc;
use tokio::task::JoinHandle;
use tokio::time::Duration;

/// Owned notifier instance: the event dispatcher plus its delivery worker.
pub struct Notifier {
    dispatcher: EventDispatcher,
    worker: JoinHandle<()>,
}

impl Notifier {
    /// Builds the webhook client, spawns the delivery worker, and wires the
    /// dispatcher with the built-in template catalog and map grid. Must be
    /// called from within a tokio runtime.
    pub fn spawn(config: NotifierConfig) -> Result<Self> {
        Self::spawn_with(
            config,
            Arc::new(DefaultTemplates),
            Arc::new(SystemClock),
        )
    }

    /// As [`Notifier::spawn`], with host-provided localization and clock.
    pub fn spawn_with(
        config: NotifierConfig,
        templates: Arc<dyn TemplateSource>,
        clock: Arc<dyn Clock>,
    ) -> Result<Self> {
        let client = WebhookClient::new(
            config.global.webhook_username.clone(),
            config.global.webhook_avatar_url.clone(),
        )
        .context("initialize webhook client")?;

        let queue_interval = Duration::try_from_secs_f64(config.global.queue_interval_seconds)
            .context("queue_interval_seconds must be a non-negative finite number")?;
        let sleep_interval = Duration::try_from_secs_f64(config.global.sleep_interval_seconds)
            .context("sleep_interval_seconds must be a non-negative finite number")?;

        let (queue, worker) = spawn_pipeline(client, queue_interval, sleep_interval);

        let grid = Arc::new(WorldGrid::new(config.global.grid_world_size));
        let dispatcher = EventDispatcher::new(Arc::new(config), templates, grid, clock, queue);

        Ok(Self { dispatcher, worker })
    }

    /// Hands one event to the pipeline. Never blocks; all failures are
    /// logged, none propagate.
    pub fn notify(&self, event: NotificationEvent) {
        self.dispatcher.notify(event);
    }

    /// Stops the delivery worker. Undelivered queue contents are discarded;
    /// nothing is persisted across restarts.
    pub async fn shutdown(self) {
        drop(self.dispatcher);
        self.worker.abort();
        let _ = self.worker.await;
    }
}
