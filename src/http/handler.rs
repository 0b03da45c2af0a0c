use std::panic::{self, AssertUnwindSafe};

use bytes::Bytes;

use crate::http::message::{Headers, Message};
use crate::http::status::INTERNAL_SERVER_ERROR;

/// Application callback invoked once per parsed request.
///
/// The handler fills in `response` (status, headers, payload) and must not
/// keep references to either message past the call. It does no I/O of its
/// own, so it runs inline on the connection's task.
///
/// Any `Fn(&Message, &mut Message)` closure is a handler:
///
/// ```
/// # use wicket::http::handler::Handler;
/// # use wicket::http::message::Message;
/// fn assert_handler<H: Handler>(_: H) {}
///
/// assert_handler(|_req: &Message, resp: &mut Message| {
///     resp.status = 200;
///     resp.payload = "hi".into();
/// });
/// ```
pub trait Handler: Send + Sync + 'static {
    fn handle(&self, request: &Message, response: &mut Message);
}

impl<F> Handler for F
where
    F: Fn(&Message, &mut Message) + Send + Sync + 'static,
{
    fn handle(&self, request: &Message, response: &mut Message) {
        self(request, response)
    }
}

/// Runs the handler, turning a panic into an empty 500 response.
///
/// Returns `false` if the handler panicked.
pub(crate) fn invoke<H: Handler + ?Sized>(
    handler: &H,
    request: &Message,
    response: &mut Message,
) -> bool {
    let outcome = panic::catch_unwind(AssertUnwindSafe(|| handler.handle(request, response)));

    if outcome.is_err() {
        response.status = INTERNAL_SERVER_ERROR;
        response.reason.clear();
        response.headers = Headers::new();
        response.payload = Bytes::new();
        return false;
    }

    true
}
