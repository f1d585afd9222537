//! Process panic hook.
//!
//! Handler panics are caught by the dispatcher and logged once by the error
//! normalizer, so the hook writes nothing for them. Any other panic becomes an
//! `error` record. With a silent logger the previous hook runs instead.

use std::panic;
use std::sync::Arc;

use serde_json::json;

use crate::error::failure::panic_text;
use crate::observability::{metadata, Logger};
use crate::routing::unwind;

/// Replace the process panic hook. Chains to the hook it replaces.
pub fn install_panic_hook(logger: Arc<Logger>) {
    let previous = panic::take_hook();
    panic::set_hook(Box::new(move |info| {
        if unwind::in_handler() {
            return;
        }
        if logger.is_silent() {
            previous(info);
            return;
        }

        let location = info
            .location()
            .map(|location| location.to_string())
            .unwrap_or_default();
        logger.error_with(
            "Unhandled panic",
            metadata(json!({
                "panic": panic_text(info.payload()),
                "location": location,
            })),
        );
    }));
}
