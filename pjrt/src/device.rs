//! Non-owning handles to PJRT devices.
//!
//! A device's lifetime is owned by the [`crate::Client`] that enumerated
//! it, not by the caller, so [`DeviceView`] borrows nothing and destroys
//! nothing on drop — it's a plain, movable, `Copy`-able pointer pair plus
//! the [`Context`] needed to call back into the plugin. Grounded on the
//! teacher's `Device` (same wrap/ptr shape), trimmed to the subset of
//! `PJRT_Device_*` this crate calls.

use pjrt_sys::{PJRT_Device, PJRT_Device_GetDescription_Args, PJRT_DeviceDescription_ToString_Args};

use crate::context::Context;
use crate::error::Result;
use crate::utils;

/// A device enumerated from a [`crate::Client`]. Does not own the
/// underlying PJRT handle; valid for as long as the client that produced
/// it is alive.
#[derive(Clone)]
pub struct DeviceView {
    context: Context,
    pub(crate) ptr: *mut PJRT_Device,
}

impl std::fmt::Debug for DeviceView {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DeviceView")
            .field("description", &self.description().unwrap_or_default())
            .finish()
    }
}

impl DeviceView {
    pub(crate) fn wrap(context: &Context, ptr: *mut PJRT_Device) -> Self {
        assert!(!ptr.is_null());
        Self {
            context: context.clone(),
            ptr,
        }
    }

    /// A human-readable description of this device (platform-specific; for
    /// the CPU plugin this is typically something like `"CPU"`).
    pub fn description(&self) -> Result<String> {
        let mut args = PJRT_Device_GetDescription_Args::new();
        args.device = self.ptr;
        let args = self.context.PJRT_Device_GetDescription(args)?;

        let mut to_string_args = PJRT_DeviceDescription_ToString_Args::new();
        to_string_args.device_description = args.device_description;
        let to_string_args = self
            .context
            .PJRT_DeviceDescription_ToString(to_string_args)?;

        Ok(utils::str_from_raw(to_string_args.to_string, to_string_args.to_string_size).into_owned())
    }
}

#[cfg(test)]
mod tests {
    // `DeviceView` cannot be constructed without a live plugin handle; its
    // behavior is covered by the integration tests under `pjrt/tests/`.
}
