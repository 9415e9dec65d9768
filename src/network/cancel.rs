// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Exactly-once cancellation tokens
//!
//! A token is handed out when a request is issued. Any number of callers may
//! cancel it from any thread; the wrapped cancel action runs at most once.

use std::fmt;
use std::sync::Arc;

use parking_lot::Mutex;

/// Placeholder description for tokens without a request handle
pub const EMPTY_REQUEST_DESCRIPTION: &str = "Empty Request";

/// Something that can be cancelled
pub trait Cancellable: Send + Sync {
    /// Request cancellation. Idempotent.
    fn cancel(&self);

    /// Whether cancellation has been requested
    fn is_canceled(&self) -> bool;
}

/// A live, cancelable request owned by the transport
pub trait RequestHandle: Send + Sync {
    /// Forward cancellation to the transport
    fn cancel(&self);

    /// Debug representation of the request, if the transport provides one
    fn debug_description(&self) -> Option<String> {
        None
    }
}

type CancelAction = Box<dyn Fn() + Send + Sync>;

/// Token guarding a cancel action with an exactly-once guarantee
pub struct CancellationToken {
    action: CancelAction,
    handle: Option<Arc<dyn RequestHandle>>,
    canceled: Mutex<bool>,
}

impl CancellationToken {
    /// Create a token around an arbitrary cancel action
    ///
    /// Used when no request handle exists yet.
    pub fn new<F>(action: F) -> Self
    where
        F: Fn() + Send + Sync + 'static,
    {
        Self {
            action: Box::new(action),
            handle: None,
            canceled: Mutex::new(false),
        }
    }

    /// Create a token that cancels a live request handle
    pub fn from_handle(handle: Arc<dyn RequestHandle>) -> Self {
        let target = Arc::clone(&handle);
        Self {
            action: Box::new(move || target.cancel()),
            handle: Some(handle),
            canceled: Mutex::new(false),
        }
    }

    /// Cancel the request
    ///
    /// The first caller to observe the token uncanceled flips the flag and
    /// runs the action while holding the lock. The guard is released on every
    /// exit path, including a panicking action.
    pub fn cancel(&self) {
        let mut canceled = self.canceled.lock();
        if *canceled {
            return;
        }
        *canceled = true;
        tracing::debug!(request = %self.debug_description(), "Cancelling request");
        (self.action)();
    }

    /// Whether the token has been cancelled
    pub fn is_canceled(&self) -> bool {
        *self.canceled.lock()
    }

    /// The wrapped request handle, if any
    pub fn handle(&self) -> Option<&Arc<dyn RequestHandle>> {
        self.handle.as_ref()
    }

    /// Debug description of the wrapped request
    pub fn debug_description(&self) -> String {
        self.handle
            .as_ref()
            .and_then(|handle| handle.debug_description())
            .unwrap_or_else(|| EMPTY_REQUEST_DESCRIPTION.to_string())
    }
}

impl Cancellable for CancellationToken {
    fn cancel(&self) {
        CancellationToken::cancel(self)
    }

    fn is_canceled(&self) -> bool {
        CancellationToken::is_canceled(self)
    }
}

impl fmt::Debug for CancellationToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.debug_description())
    }
}
