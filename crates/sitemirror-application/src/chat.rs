//! Chat: one-shot load/send plus a cancellable polling task.
//!
//! Each poll replaces the whole message list. The server gives messages no
//! id, so there is nothing to diff or deduplicate against.

use sitemirror_core::Result;
use sitemirror_core::decode::{ChatDecoder, HtmlDecoder};
use sitemirror_core::mirror::ChatMessage;
use sitemirror_core::validation::normalize_chat_message;
use sitemirror_interaction::ApiClient;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;

#[derive(Clone)]
pub struct ChatService {
    client: ApiClient,
}

impl ChatService {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    pub async fn load(&self) -> Result<Vec<ChatMessage>> {
        let html = self.client.get_chat().await?;
        Ok(ChatDecoder.decode(&html))
    }

    /// Sends `text` (trimmed) and returns the reloaded list.
    ///
    /// Blank input sends nothing and returns `Ok(None)`.
    pub async fn send(&self, text: &str) -> Result<Option<Vec<ChatMessage>>> {
        let Some(message) = normalize_chat_message(text) else {
            return Ok(None);
        };
        self.client.send_chat_message(message).await?;
        self.load().await.map(Some)
    }
}

/// Latest state published by a running poller.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ChatFeed {
    pub messages: Vec<ChatMessage>,
    /// Set when a poll fails after the first successful load; cleared by
    /// the next success.
    pub last_error: Option<String>,
    pub loaded: bool,
}

/// Starts chat polling tasks.
#[derive(Clone)]
pub struct ChatPoller {
    service: ChatService,
    interval: Duration,
}

impl ChatPoller {
    pub fn new(service: ChatService, interval: Duration) -> Self {
        Self { service, interval }
    }

    /// Spawns the polling task. The first poll runs immediately.
    ///
    /// Must be called inside a tokio runtime.
    pub fn start(&self) -> ChatPollHandle {
        let token = CancellationToken::new();
        let (tx, rx) = watch::channel(ChatFeed::default());
        let tx = Arc::new(tx);

        let task = tokio::spawn(poll_loop(
            self.service.clone(),
            self.interval,
            token.clone(),
            Arc::clone(&tx),
        ));
        tracing::info!("[ChatPoller] Started ({}s interval)", self.interval.as_secs());

        ChatPollHandle {
            service: self.service.clone(),
            token,
            tx,
            rx,
            task: Some(task),
        }
    }
}

async fn poll_loop(
    service: ChatService,
    period: Duration,
    token: CancellationToken,
    tx: Arc<watch::Sender<ChatFeed>>,
) {
    let mut ticker = tokio::time::interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            biased;
            _ = token.cancelled() => break,
            _ = ticker.tick() => {}
        }

        let result = tokio::select! {
            biased;
            _ = token.cancelled() => break,
            result = service.load() => result,
        };
        if token.is_cancelled() {
            break;
        }

        let loaded = tx.borrow().loaded;
        match result {
            Ok(messages) => tx.send_modify(|feed| {
                feed.messages = messages;
                feed.last_error = None;
                feed.loaded = true;
            }),
            Err(e) if loaded => {
                tracing::warn!("[ChatPoller] Poll failed: {}", e);
                tx.send_modify(|feed| {
                    feed.last_error = Some(format!("Failed to load messages: {e}"));
                });
            }
            Err(e) => tracing::debug!("[ChatPoller] Initial load failed: {}", e),
        }
    }

    tracing::info!("[ChatPoller] Stopped");
}

/// Owner of a running poller. Dropping it cancels the task.
pub struct ChatPollHandle {
    service: ChatService,
    token: CancellationToken,
    tx: Arc<watch::Sender<ChatFeed>>,
    rx: watch::Receiver<ChatFeed>,
    task: Option<JoinHandle<()>>,
}

impl ChatPollHandle {
    /// Snapshot of the current feed.
    pub fn feed(&self) -> ChatFeed {
        self.rx.borrow().clone()
    }

    /// A receiver for awaiting feed changes.
    pub fn subscribe(&self) -> watch::Receiver<ChatFeed> {
        self.rx.clone()
    }

    pub fn is_running(&self) -> bool {
        !self.token.is_cancelled()
    }

    /// Sends a message and publishes the reloaded list right away instead of
    /// waiting for the next tick. Returns `false` for blank input.
    pub async fn send_message(&self, text: &str) -> Result<bool> {
        let Some(messages) = self.service.send(text).await? else {
            return Ok(false);
        };
        if self.is_running() {
            self.tx.send_modify(|feed| {
                feed.messages = messages;
                feed.last_error = None;
                feed.loaded = true;
            });
        }
        Ok(true)
    }

    /// Cancels polling and waits for the task to finish.
    pub async fn stop(mut self) {
        self.token.cancel();
        if let Some(task) = self.task.take()
            && let Err(e) = task.await
        {
            tracing::warn!("[ChatPoller] Task ended abnormally: {}", e);
        }
    }
}

impl Drop for ChatPollHandle {
    fn drop(&mut self) {
        self.token.cancel();
    }
}
