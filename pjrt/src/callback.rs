//! Bridges a single PJRT callback invocation into a Rust future.
//!
//! PJRT signals completion of an asynchronous operation (`PJRT_Event_OnReady`,
//! and the various two-phase host/device transfer calls) by invoking a
//! `extern "C"` callback exactly once with a `PJRT_Error*` (null on success).
//! [`CallbackBridge`] pairs that single invocation with a value already known
//! at call time (`T`) and a [`tokio::sync::oneshot`] sender, so the Rust side
//! can simply `.await` a future instead of polling.
//!
//! This mirrors `pjrt::detail::CallbackUserData<DataType>` from the C++
//! implementation this crate's API is modeled after: a promise/future pair
//! carried across the FFI boundary as a raw pointer, reclaimed and fulfilled
//! inside the callback.

use std::ffi::c_void;

use tokio::sync::oneshot;

use crate::context::Context;
use crate::error::{Error, Result};

/// Heap-allocated state passed across the FFI boundary as a callback's
/// `user_arg`. Reclaimed with `Box::from_raw` inside the single guaranteed
/// callback invocation.
pub(crate) struct CallbackBridge<T> {
    context: Context,
    function: &'static str,
    sender: oneshot::Sender<Result<T>>,
    payload: T,
}

impl<T> CallbackBridge<T> {
    /// Creates a bridge paired with a receiver the caller awaits. `function`
    /// names the PJRT entry point this bridge is attached to, used only for
    /// error messages. `payload` is the value produced if the operation
    /// succeeds (e.g. the `Vec<u8>` a host-copy already wrote into).
    pub(crate) fn new(
        context: Context,
        function: &'static str,
        payload: T,
    ) -> (Box<Self>, oneshot::Receiver<Result<T>>) {
        let (sender, receiver) = oneshot::channel();
        (
            Box::new(Self {
                context,
                function,
                sender,
                payload,
            }),
            receiver,
        )
    }

    /// Leaks this bridge as an opaque pointer suitable for a callback's
    /// `user_arg` field. Must be paired with exactly one call to
    /// [`CallbackBridge::fulfill`].
    pub(crate) fn into_raw(self: Box<Self>) -> *mut c_void {
        Box::into_raw(self) as *mut c_void
    }

    /// Reclaims a bridge from a callback's `user_arg` and resolves its
    /// future with `err` (null meaning success). Consumes the raw pointer;
    /// must be called at most once per pointer produced by `into_raw`.
    ///
    /// # Safety
    /// `user_arg` must be a pointer produced by `CallbackBridge::<T>::into_raw`
    /// for the same `T`, not yet reclaimed.
    pub(crate) unsafe fn fulfill(user_arg: *mut c_void, err: *mut pjrt_sys::PJRT_Error) {
        let bridge = unsafe { Box::from_raw(user_arg as *mut Self) };
        let result = bridge.context.check_error(bridge.function, err);
        let value = result.map(|_| bridge.payload);
        // The receiver may already be gone if the caller dropped the future;
        // that's not an error for the plugin-facing side of this bridge.
        let _ = bridge.sender.send(value);
    }
}

/// The `extern "C"` trampoline registered as a PJRT callback's function
/// pointer. Monomorphized per `T`, so each instantiation is a distinct,
/// FFI-safe function item.
pub(crate) extern "C" fn on_complete<T>(err: *mut pjrt_sys::PJRT_Error, user_arg: *mut c_void) {
    unsafe { CallbackBridge::<T>::fulfill(user_arg, err) };
}

/// Awaits the receiver side of a [`CallbackBridge`], collapsing a dropped
/// sender (which would only happen if the plugin never calls back) into an
/// internal-error `Result`.
pub(crate) async fn await_bridge<T>(receiver: oneshot::Receiver<Result<T>>) -> Result<T> {
    match receiver.await {
        Ok(result) => result,
        Err(_) => Err(Error::InvalidArgument(
            "PJRT callback was dropped before completion".to_string(),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn fulfills_with_payload_on_null_error() {
        // Exercises the channel plumbing directly; context.check_error is
        // covered by context.rs's own tests.
        let (sender, receiver) = oneshot::channel::<Result<u32>>();
        sender.send(Ok(7)).unwrap();
        assert_eq!(await_bridge(receiver).await.unwrap(), 7);
    }

    #[tokio::test]
    async fn dropped_sender_surfaces_as_error() {
        let (sender, receiver) = oneshot::channel::<Result<u32>>();
        drop(sender);
        assert!(await_bridge(receiver).await.is_err());
    }
}
