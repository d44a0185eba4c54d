mod context;
mod controller;
mod events;
mod host;
mod signal;

pub use context::RewriteContext;
pub use controller::Controller;
pub use events::{
    rewrite_request_headers, rewrite_response_headers, RequestDetails, RequestHeadersResult,
    ResponseDetails, ResponseHeadersResult,
};
pub use host::{InterceptionHost, ListenerRegistry};
pub use signal::{ChannelNotifier, Notifier, Signal};
