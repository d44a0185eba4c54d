use std::sync::{Arc, RwLock};

use tracing::warn;

use crate::engine::events::{
    rewrite_request_headers, rewrite_response_headers, RequestDetails, RequestHeadersResult,
    ResponseDetails, ResponseHeadersResult,
};
use crate::engine::RewriteContext;

/// The host's interception API: where the two header listeners are registered
pub trait InterceptionHost: Send + Sync {
    /// Register the request and response listeners, both bound to `context`
    fn add_listeners(&self, context: Arc<RewriteContext>);

    /// Unregister both listeners
    fn remove_listeners(&self);
}

/// Minimal host keeping the registered context and dispatching events to it.
///
/// Events that arrive while nothing is registered pass through untouched.
#[derive(Debug, Default)]
pub struct ListenerRegistry {
    attached: RwLock<Option<Arc<RewriteContext>>>,
}

impl ListenerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_attached(&self) -> bool {
        self.current().is_some()
    }

    fn current(&self) -> Option<Arc<RewriteContext>> {
        match self.attached.read() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    pub fn on_before_send_headers(&self, details: RequestDetails) -> RequestHeadersResult {
        match self.current() {
            Some(ctx) => rewrite_request_headers(&ctx, details),
            None => RequestHeadersResult { request_headers: details.request_headers },
        }
    }

    pub fn on_headers_received(&self, details: ResponseDetails) -> ResponseHeadersResult {
        match self.current() {
            Some(ctx) => rewrite_response_headers(&ctx, details),
            None => ResponseHeadersResult { response_headers: details.response_headers },
        }
    }

    fn set(&self, value: Option<Arc<RewriteContext>>) {
        match self.attached.write() {
            Ok(mut guard) => *guard = value,
            Err(poisoned) => {
                warn!("Listener registry lock poisoned, recovering");
                *poisoned.into_inner() = value;
            }
        }
    }
}

impl InterceptionHost for ListenerRegistry {
    fn add_listeners(&self, context: Arc<RewriteContext>) {
        self.set(Some(context));
    }

    fn remove_listeners(&self) {
        self.set(None);
    }
}

impl<H: InterceptionHost + ?Sized> InterceptionHost for Arc<H> {
    fn add_listeners(&self, context: Arc<RewriteContext>) {
        (**self).add_listeners(context)
    }

    fn remove_listeners(&self) {
        (**self).remove_listeners()
    }
}
