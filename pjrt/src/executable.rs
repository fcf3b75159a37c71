//! A compiled, device-agnostic program: the transient result of
//! `Client::compile_from_stablehlo_string`, queried for output shape
//! metadata and then discarded once a [`crate::LoadedExecutable`] has been
//! built from it.
//!
//! Grounded on the teacher's `Executable` (`wrap`, `num_outputs`,
//! `output_dims`'s flat-array slicing), trimmed to the two accessors
//! spec.md §4.5 names — fingerprint, cost analysis, serialization, and the
//! rest of the teacher's metadata surface have no spec counterpart.

use pjrt_sys::{
    PJRT_Executable, PJRT_Executable_Destroy_Args, PJRT_Executable_NumOutputs_Args,
    PJRT_Executable_OutputDimensions_Args,
};

use crate::context::Context;
use crate::error::Result;

/// A compiled program, not yet loaded onto any device. Exclusive owner of
/// its handle; destroyed on drop or via the explicit [`Executable::destroy`].
pub struct Executable {
    context: Context,
    ptr: *mut PJRT_Executable,
}

impl std::fmt::Debug for Executable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Executable")
            .field("num_outputs", &self.num_outputs().unwrap_or(0))
            .finish()
    }
}

impl Executable {
    pub(crate) fn wrap(context: &Context, ptr: *mut PJRT_Executable) -> Self {
        assert!(!ptr.is_null());
        Self {
            context: context.clone(),
            ptr,
        }
    }

    pub fn num_outputs(&self) -> Result<usize> {
        let mut args = PJRT_Executable_NumOutputs_Args::new();
        args.executable = self.ptr;
        let args = self.context.PJRT_Executable_NumOutputs(args)?;
        Ok(args.num_outputs)
    }

    /// Per-output dimensions. The plugin reports these as a flat `dims`
    /// array plus a `dim_sizes` array giving each output's rank; this
    /// slices the flat array back into one `Vec<i64>` per output.
    #[allow(clippy::needless_range_loop)]
    pub fn output_dimensions(&self) -> Result<Vec<Vec<i64>>> {
        let mut args = PJRT_Executable_OutputDimensions_Args::new();
        args.executable = self.ptr;
        let args = self.context.PJRT_Executable_OutputDimensions(args)?;

        let dim_sizes = unsafe { std::slice::from_raw_parts(args.dim_sizes, args.num_outputs) };
        let mut out = Vec::with_capacity(args.num_outputs);
        let mut offset = 0usize;
        for i in 0..args.num_outputs {
            let dims = unsafe { std::slice::from_raw_parts(args.dims.add(offset), dim_sizes[i]) };
            out.push(dims.to_vec());
            offset += dim_sizes[i];
        }
        Ok(out)
    }

    /// Destroys this executable, surfacing any error instead of logging and
    /// swallowing it as `Drop` must.
    pub fn destroy(mut self) -> Result<()> {
        self.destroy_inner()
    }

    fn destroy_inner(&mut self) -> Result<()> {
        if self.ptr.is_null() {
            return Ok(());
        }
        let mut args = PJRT_Executable_Destroy_Args::new();
        args.executable = self.ptr;
        self.ptr = std::ptr::null_mut();
        self.context.PJRT_Executable_Destroy(args).map(|_| ())
    }
}

impl Drop for Executable {
    fn drop(&mut self) {
        if let Err(err) = self.destroy_inner() {
            log::warn!("PJRT_Executable_Destroy failed: {err}");
        }
    }
}

#[cfg(test)]
mod tests {
    // `Executable` cannot be constructed without a live plugin handle; its
    // behavior is covered by the integration tests under `pjrt/tests/`.
}
