//! An [`Executable`] loaded onto one device and ready to run.
//!
//! Grounded on the teacher's `LoadedExecutable` (`wrap`, `call_execute`'s
//! flat argument/output array construction, `Drop`), simplified to spec.md
//! §4.6's single-device execution: no multi-device `argument_lists`/
//! `output_lists` fan-out, no `ExecuteOptions` builder (every collective
//! callback slot is null, matching `examples/original_source/main.cpp`'s
//! `exec_options`).

use std::mem::MaybeUninit;

use pjrt_sys::{
    PJRT_Buffer, PJRT_Event, PJRT_ExecuteOptions, PJRT_LoadedExecutable,
    PJRT_LoadedExecutable_Destroy_Args, PJRT_LoadedExecutable_Execute_Args,
    PJRT_LoadedExecutable_GetExecutable_Args,
};

use crate::buffer::Buffer;
use crate::context::Context;
use crate::device::DeviceView;
use crate::error::Result;
use crate::event::Event;
use crate::executable::Executable;

/// A compiled program loaded onto a device and ready to execute.
pub struct LoadedExecutable {
    context: Context,
    ptr: *mut PJRT_LoadedExecutable,
}

impl std::fmt::Debug for LoadedExecutable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoadedExecutable").finish()
    }
}

impl LoadedExecutable {
    pub(crate) fn wrap(context: &Context, ptr: *mut PJRT_LoadedExecutable) -> Self {
        assert!(!ptr.is_null());
        Self {
            context: context.clone(),
            ptr,
        }
    }

    /// The transient, device-agnostic `Executable` this was loaded from —
    /// used internally to learn the output count before execution.
    pub fn executable(&self) -> Result<Executable> {
        let mut args = PJRT_LoadedExecutable_GetExecutable_Args::new();
        args.loaded_executable = self.ptr;
        let args = self.context.PJRT_LoadedExecutable_GetExecutable(args)?;
        Ok(Executable::wrap(&self.context, args.executable))
    }

    /// Runs this executable on `device` with `arguments`, returning a
    /// future that resolves to the output buffers once the device
    /// completion event fires.
    ///
    /// Output buffer handles exist as soon as the call returns (step 5 of
    /// spec.md §4.6); the future only gates *reading* their contents, not
    /// their existence — so errors in wrapping them are reported eagerly,
    /// before the future is even constructed.
    pub async fn execute(&self, device: &DeviceView, arguments: &[&Buffer]) -> Result<Vec<Buffer>> {
        let (event, outputs) = self.call_execute(device, arguments)?;
        event.resolve_with(outputs).await
    }

    /// Blocking counterpart to [`LoadedExecutable::execute`].
    pub fn execute_sync(&self, device: &DeviceView, arguments: &[&Buffer]) -> Result<Vec<Buffer>> {
        let (event, outputs) = self.call_execute(device, arguments)?;
        event.wait()?;
        Ok(outputs)
    }

    fn call_execute(
        &self,
        device: &DeviceView,
        arguments: &[&Buffer],
    ) -> Result<(Event, Vec<Buffer>)> {
        let num_outputs = self.executable()?.num_outputs()?;

        let mut argument_ptrs: Vec<*mut PJRT_Buffer> =
            arguments.iter().map(|buffer| buffer.ptr()).collect();
        let argument_lists: [*const *mut PJRT_Buffer; 1] = [argument_ptrs.as_mut_ptr()];

        let mut output_ptrs: Vec<MaybeUninit<*mut PJRT_Buffer>> =
            vec![MaybeUninit::uninit(); num_outputs];
        let output_lists: [*mut *mut PJRT_Buffer; 1] =
            [output_ptrs.as_mut_ptr() as *mut *mut PJRT_Buffer];

        let mut complete_events: [MaybeUninit<*mut PJRT_Event>; 1] = [MaybeUninit::uninit()];

        let mut raw_options = PJRT_ExecuteOptions::new();
        raw_options.launch_id = 0;

        let mut args = PJRT_LoadedExecutable_Execute_Args::new();
        args.executable = self.ptr;
        args.options = &mut raw_options as *mut PJRT_ExecuteOptions;
        args.argument_lists = argument_lists.as_ptr();
        args.num_devices = 1;
        args.num_args = arguments.len();
        args.output_lists = output_lists.as_ptr();
        args.device_complete_events = complete_events.as_mut_ptr() as *mut *mut PJRT_Event;
        args.execute_device = device.ptr;

        self.context.PJRT_LoadedExecutable_Execute(args)?;

        let event_ptr = unsafe { complete_events[0].assume_init() };
        let event = Event::wrap(&self.context, event_ptr);

        // Output handles exist synchronously once the call above succeeds;
        // wrapping them still queries each one's shape/type, which can
        // itself fail the way any other Context call can.
        let outputs = output_ptrs
            .into_iter()
            .map(|ptr| Buffer::wrap(&self.context, unsafe { ptr.assume_init() }))
            .collect::<Result<Vec<_>>>()?;
        debug_assert_eq!(outputs.len(), num_outputs);

        Ok((event, outputs))
    }

    /// Destroys this loaded executable, surfacing any error instead of
    /// logging and swallowing it as `Drop` must.
    pub fn destroy(mut self) -> Result<()> {
        self.destroy_inner()
    }

    fn destroy_inner(&mut self) -> Result<()> {
        if self.ptr.is_null() {
            return Ok(());
        }
        let mut args = PJRT_LoadedExecutable_Destroy_Args::new();
        args.executable = self.ptr;
        self.ptr = std::ptr::null_mut();
        self.context
            .PJRT_LoadedExecutable_Destroy(args)
            .map(|_| ())
    }
}

impl Drop for LoadedExecutable {
    fn drop(&mut self) {
        if let Err(err) = self.destroy_inner() {
            log::warn!("PJRT_LoadedExecutable_Destroy failed: {err}");
        }
    }
}

#[cfg(test)]
mod tests {
    // `LoadedExecutable` cannot be constructed without a live plugin
    // handle; its behavior is covered by the integration tests under
    // `pjrt/tests/`.
}
