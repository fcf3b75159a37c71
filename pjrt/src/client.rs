//! The PJRT client: owns addressable devices, compiles programs, and
//! transfers data to the device.
//!
//! Grounded on the teacher's `Client`/`Api::create_client` (construction
//! with every key-value-store callback null, since this crate has no
//! distributed-runtime story), `Api::compile` (the `PJRT_Client_Compile`
//! call), and `host_buffer.rs`'s `call_copy_to` (the
//! `PJRT_Client_BufferFromHostBuffer` two-event shape — a
//! `done_with_host_buffer` event the wrapper awaits before handing back
//! the buffer, matching `examples/original_source/main.cpp`'s
//! `bfhh_args`).

use std::borrow::Cow;
use std::ffi::c_void;

use pjrt_sys::{
    PJRT_Client, PJRT_Client_BufferFromHostBuffer_Args, PJRT_Client_Compile_Args,
    PJRT_Client_Create_Args, PJRT_Client_Destroy_Args, PJRT_Client_Devices_Args,
    PJRT_Client_PlatformName_Args,
    PJRT_HostBufferSemantics_PJRT_HostBufferSemantics_kImmutableUntilTransferCompletes,
};

use crate::buffer::Buffer;
use crate::compile_options::CompileOptions;
use crate::context::Context;
use crate::device::DeviceView;
use crate::error::{Error, Result};
use crate::loaded_executable::LoadedExecutable;
use crate::program::Program;
use crate::ty::Type;
use crate::utils;

/// A PJRT client: the root handle for devices, compilation, and data
/// transfer within one loaded plugin.
pub struct Client {
    context: Context,
    ptr: *mut PJRT_Client,
}

impl std::fmt::Debug for Client {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Client")
            .field("platform_name", &self.platform_name().unwrap_or_default())
            .finish()
    }
}

impl Client {
    /// Creates a client with no distributed key-value store and no
    /// plugin-specific creation options.
    pub fn new(context: &Context) -> Result<Self> {
        let args = PJRT_Client_Create_Args::new();
        let args = context.PJRT_Client_Create(args)?;
        Ok(Self {
            context: context.clone(),
            ptr: args.client,
        })
    }

    pub fn platform_name(&self) -> Result<Cow<'_, str>> {
        let mut args = PJRT_Client_PlatformName_Args::new();
        args.client = self.ptr;
        let args = self.context.PJRT_Client_PlatformName(args)?;
        Ok(utils::str_from_raw(args.platform_name, args.platform_name_size))
    }

    fn devices(&self) -> Result<Vec<DeviceView>> {
        let mut args = PJRT_Client_Devices_Args::new();
        args.client = self.ptr;
        let args = self.context.PJRT_Client_Devices(args)?;
        let raw = unsafe { std::slice::from_raw_parts(args.devices, args.num_devices) };
        Ok(raw
            .iter()
            .map(|ptr| DeviceView::wrap(&self.context, *ptr))
            .collect())
    }

    pub fn num_devices(&self) -> Result<usize> {
        Ok(self.devices()?.len())
    }

    pub fn device(&self, index: usize) -> Result<DeviceView> {
        let devices = self.devices()?;
        devices.get(index).cloned().ok_or_else(|| {
            Error::InvalidArgument(format!(
                "device index {index} out of range (client has {} devices)",
                devices.len()
            ))
        })
    }

    /// Compiles `code` (StableHLO text), returning a `LoadedExecutable`.
    /// Emits the program with format tag `"mlir"`. Compile options are the
    /// fixed, hard-coded blob `CompileOptions::hard_coded` ships — not a
    /// caller-supplied parameter (spec.md §9 open question #2).
    pub fn compile_from_stablehlo_string(&self, code: impl Into<Vec<u8>>) -> Result<LoadedExecutable> {
        let program = Program::stablehlo(code);
        let options = CompileOptions::hard_coded();
        let encoded_options = options.encode();

        let mut args = PJRT_Client_Compile_Args::new();
        args.client = self.ptr;
        args.program = &program.prog as *const _;
        args.compile_options = encoded_options.as_ptr() as *const i8;
        args.compile_options_size = encoded_options.len();

        let args = self.context.PJRT_Client_Compile(args)?;
        Ok(LoadedExecutable::wrap(&self.context, args.executable))
    }

    /// Starts an asynchronous host-to-device transfer of `data`, laid out
    /// densely according to `shape`. Scalars pass `shape = &[]`, reported
    /// to the plugin as `num_dims = 0` — never coerced to `[1]`.
    ///
    /// The host buffer must remain valid and unmodified until the returned
    /// future resolves (`kImmutableUntilTransferCompletes` semantics).
    pub async fn transfer_to_device<T: Type>(
        &self,
        data: &[T::ElemType],
        shape: &[i64],
        device: &DeviceView,
    ) -> Result<Buffer> {
        let mut args = PJRT_Client_BufferFromHostBuffer_Args::new();
        args.client = self.ptr;
        args.data = data.as_ptr() as *const c_void;
        args.type_ = T::PRIMITIVE_TYPE as pjrt_sys::PJRT_Buffer_Type;
        args.dims = shape.as_ptr();
        args.num_dims = shape.len();
        args.host_buffer_semantics =
            PJRT_HostBufferSemantics_PJRT_HostBufferSemantics_kImmutableUntilTransferCompletes
                as pjrt_sys::PJRT_HostBufferSemantics;
        args.device = device.ptr;

        let args = self.context.PJRT_Client_BufferFromHostBuffer(args)?;
        let buffer = Buffer::wrap(&self.context, args.buffer)?;
        let event = crate::event::Event::wrap(&self.context, args.done_with_host_buffer);
        event.resolve_with(buffer).await
    }

    /// Destroys this client, surfacing any error instead of logging and
    /// swallowing it as `Drop` must. Every `LoadedExecutable`, `Buffer`,
    /// and `DeviceView` derived from this client must be dropped first.
    pub fn destroy(mut self) -> Result<()> {
        self.destroy_inner()
    }

    fn destroy_inner(&mut self) -> Result<()> {
        if self.ptr.is_null() {
            return Ok(());
        }
        let mut args = PJRT_Client_Destroy_Args::new();
        args.client = self.ptr;
        self.ptr = std::ptr::null_mut();
        self.context.PJRT_Client_Destroy(args).map(|_| ())
    }
}

impl Drop for Client {
    fn drop(&mut self) {
        if let Err(err) = self.destroy_inner() {
            log::warn!("PJRT_Client_Destroy failed: {err}");
        }
    }
}

#[cfg(test)]
mod tests {
    // `Client` cannot be constructed without a live plugin handle; its
    // behavior is covered by the integration tests under `pjrt/tests/`.
}
