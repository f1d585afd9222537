//! Handler scope tracking.
//!
//! The dispatcher polls every handler inside this scope. A panic raised while
//! the scope is active is caught by the dispatcher and normalized, so the
//! process panic hook (`lifecycle::panic_hook`) leaves it alone.

use std::cell::Cell;
use std::future::Future;
use std::pin::pin;

use futures_util::future::poll_fn;

thread_local! {
    static HANDLER_DEPTH: Cell<usize> = const { Cell::new(0) };
}

/// True while a handler is being polled on this thread.
pub fn in_handler() -> bool {
    HANDLER_DEPTH.with(|depth| depth.get() > 0)
}

struct Scope;

impl Scope {
    fn enter() -> Self {
        HANDLER_DEPTH.with(|depth| depth.set(depth.get() + 1));
        Scope
    }
}

impl Drop for Scope {
    fn drop(&mut self) {
        HANDLER_DEPTH.with(|depth| depth.set(depth.get().saturating_sub(1)));
    }
}

/// Drive `future` to completion with the handler scope entered during each poll.
pub async fn scoped<F: Future>(future: F) -> F::Output {
    let mut future = pin!(future);
    poll_fn(|cx| {
        let _scope = Scope::enter();
        future.as_mut().poll(cx)
    })
    .await
}
