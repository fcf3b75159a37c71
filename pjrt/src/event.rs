//! Completion signal for asynchronous PJRT operations.
//!
//! `PJRT_Event` tracks completion of an asynchronous device operation (a
//! buffer transfer, a device copy, an execution). [`Event`] owns one and
//! offers both a blocking [`Event::wait`] and an async [`Event::into_future`],
//! the latter built on [`crate::callback::CallbackBridge`] instead of the
//! poll/waker loop the teacher implements directly on `Event`: PJRT only
//! ever invokes `PJRT_Event_OnReady`'s callback once, which is exactly the
//! shape a one-shot channel models, and matches how the original C++
//! (`CallbackUserData<DataType>`, a `std::promise`/`std::future` pair) wires
//! the same callback into something awaitable.

use pjrt_sys::{
    PJRT_Event, PJRT_Event_Await_Args, PJRT_Event_Destroy_Args, PJRT_Event_Error_Args,
    PJRT_Event_OnReady_Args,
};

use crate::callback::{await_bridge, on_complete, CallbackBridge};
use crate::context::Context;
use crate::error::Result;

/// A completion signal for an asynchronous PJRT operation.
pub struct Event {
    context: Context,
    ptr: *mut PJRT_Event,
}

impl Event {
    pub(crate) fn wrap(context: &Context, ptr: *mut PJRT_Event) -> Self {
        assert!(!ptr.is_null());
        Self {
            context: context.clone(),
            ptr,
        }
    }

    /// Blocks the current thread until the operation completes. A
    /// successful await can still have failed: `Event_Error` reports the
    /// operation's actual completion status and must be checked too.
    pub fn wait(self) -> Result<()> {
        let mut await_args = PJRT_Event_Await_Args::new();
        await_args.event = self.ptr;
        self.context.PJRT_Event_Await(await_args)?;

        let mut error_args = PJRT_Event_Error_Args::new();
        error_args.event = self.ptr;
        self.context.PJRT_Event_Error(error_args).map(|_| ())
    }

    /// Registers a one-shot callback and returns a future that resolves
    /// when PJRT invokes it.
    pub async fn into_future(self) -> Result<()> {
        self.resolve_with(()).await
    }

    /// Like [`Event::into_future`], but fulfills the bridge with `payload`
    /// instead of `()` — used where the caller already has the value the
    /// completion should carry (e.g. the freshly-wrapped output `Buffer`s
    /// of an `execute` call), so it doesn't need a second bridge type.
    pub(crate) async fn resolve_with<T>(self, payload: T) -> Result<T> {
        let (bridge, receiver) = CallbackBridge::new(self.context.clone(), "PJRT_Event_OnReady", payload);
        let mut args = PJRT_Event_OnReady_Args::new();
        args.event = self.ptr;
        args.user_arg = bridge.into_raw();
        args.callback = Some(on_complete::<T>);
        self.context.PJRT_Event_OnReady(args)?;
        await_bridge(receiver).await
    }
}

impl Drop for Event {
    fn drop(&mut self) {
        let mut args = PJRT_Event_Destroy_Args::new();
        args.event = self.ptr;
        if let Err(err) = self.context.PJRT_Event_Destroy(args) {
            log::warn!("PJRT_Event_Destroy failed: {err}");
        }
    }
}

#[cfg(test)]
mod tests {
    // `Event` cannot be constructed without a live plugin handle, so its
    // behavior is covered by the integration tests under `pjrt/tests/`.
}
