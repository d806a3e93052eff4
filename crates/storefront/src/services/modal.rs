//! Confirmation modal channel.
//!
//! A caller opens a confirmation and awaits its [`ConfirmHandle`]; the UI
//! observes the displayed request and answers with [`ModalService::confirm`]
//! or [`ModalService::cancel`]. Each request owns its own answer slot, so an
//! answer is never delivered to more than one caller. Opening a new request
//! while one is displayed supersedes it, and the superseded caller receives
//! `false`.

use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex, PoisonError};
use std::task::{Context, Poll};

use serde::{Deserialize, Serialize};
use tokio::sync::oneshot;

use crate::observable::{Observable, Subscription};

/// Content of a confirmation dialog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfirmModalRequest {
    pub title: String,
    pub message: String,
    pub confirm_label: String,
    pub cancel_label: String,
    /// Render the confirm action as destructive.
    pub danger: bool,
}

impl ConfirmModalRequest {
    /// A request with the default "Confirm" and "Cancel" labels.
    #[must_use]
    pub fn new(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            message: message.into(),
            confirm_label: "Confirm".to_string(),
            cancel_label: "Cancel".to_string(),
            danger: false,
        }
    }

    #[must_use]
    pub fn confirm_label(mut self, label: impl Into<String>) -> Self {
        self.confirm_label = label.into();
        self
    }

    #[must_use]
    pub fn cancel_label(mut self, label: impl Into<String>) -> Self {
        self.cancel_label = label.into();
        self
    }

    /// Mark the action as destructive.
    #[must_use]
    pub const fn danger(mut self) -> Self {
        self.danger = true;
        self
    }
}

/// Resolves to the user's answer for one confirmation request.
///
/// Resolves exactly once: `true` on confirm, `false` on cancel, when the
/// request is superseded, or when the service is dropped.
#[derive(Debug)]
#[must_use = "the answer is only observed by awaiting the handle"]
pub struct ConfirmHandle {
    answer: oneshot::Receiver<bool>,
}

impl Future for ConfirmHandle {
    type Output = bool;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<bool> {
        Pin::new(&mut self.answer)
            .poll(cx)
            .map(|answer| answer.unwrap_or(false))
    }
}

/// Broadcasts confirmation requests and routes answers back to the caller.
#[derive(Debug, Clone, Default)]
pub struct ModalService {
    inner: Arc<ModalServiceInner>,
}

#[derive(Debug, Default)]
struct ModalServiceInner {
    displayed: Observable<Option<ConfirmModalRequest>>,
    pending: Mutex<Option<oneshot::Sender<bool>>>,
}

impl ModalService {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Display `request` and return a handle resolving to the answer.
    pub fn open_confirm(&self, request: ConfirmModalRequest) -> ConfirmHandle {
        let (tx, rx) = oneshot::channel();
        let superseded = self
            .inner
            .pending
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .replace(tx);
        if let Some(previous) = superseded {
            tracing::debug!("Confirmation superseded by a newer request");
            let _ = previous.send(false);
        }

        tracing::debug!(title = %request.title, "Opening confirmation");
        self.inner.displayed.set(Some(request));
        ConfirmHandle { answer: rx }
    }

    /// Answer the displayed request with `true`.
    ///
    /// Returns whether a request was pending.
    pub fn confirm(&self) -> bool {
        self.answer(true)
    }

    /// Answer the displayed request with `false`.
    ///
    /// Returns whether a request was pending.
    pub fn cancel(&self) -> bool {
        self.answer(false)
    }

    /// The request currently displayed, if any.
    #[must_use]
    pub fn current(&self) -> Option<ConfirmModalRequest> {
        self.inner.displayed.get()
    }

    /// Subscribe to the displayed request. `None` means the modal is closed.
    #[must_use = "dropping the subscription unsubscribes immediately"]
    pub fn subscribe<F>(&self, callback: F) -> Subscription
    where
        F: Fn(&Option<ConfirmModalRequest>) + Send + Sync + 'static,
    {
        self.inner.displayed.subscribe(callback)
    }

    fn answer(&self, answer: bool) -> bool {
        let pending = self
            .inner
            .pending
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        let Some(tx) = pending else {
            return false;
        };
        self.inner.displayed.set(None);
        // The caller may have stopped waiting
        let _ = tx.send(answer);
        true
    }
}
