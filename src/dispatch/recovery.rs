//! Panic recovery for handler futures.
//!
//! A panicking handler must not take down the process or any other in-flight
//! call. The panic is captured, logged and converted to a `Handler` error.

use crate::types::{Error, Result};
use futures::FutureExt;
use std::any::Any;
use std::future::Future;
use std::panic::AssertUnwindSafe;

/// Await `future`, converting a panic into `Error::Handler`.
///
/// # Example
/// ```
/// use aidis_core::dispatch::with_recovery;
///
/// # tokio_test::block_on(async {
/// let result: aidis_core::Result<u32> = with_recovery(async { Ok(42) }, "answer").await;
/// assert_eq!(result.unwrap(), 42);
/// # });
/// ```
pub async fn with_recovery<Fut, T>(future: Fut, operation_name: &str) -> Result<T>
where
    Fut: Future<Output = Result<T>>,
{
    match AssertUnwindSafe(future).catch_unwind().await {
        Ok(result) => result,
        Err(payload) => {
            let panic_msg = extract_panic_message(payload.as_ref());
            tracing::error!(
                operation = operation_name,
                panic = %panic_msg,
                "Handler panicked"
            );
            Err(Error::handler(format!(
                "Panic in {}: {}",
                operation_name, panic_msg
            )))
        }
    }
}

fn extract_panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "Unknown panic (no message)".to_string()
    }
}
