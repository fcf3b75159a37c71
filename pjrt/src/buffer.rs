//! A buffer holding data on a PJRT device.
//!
//! `Buffer` is a move-only owner of a `PJRT_Buffer` handle: unlike
//! [`crate::Context`] (shared) or [`crate::device::DeviceView`]
//! (non-owning), a buffer is destroyed exactly once, either by `Drop` or by
//! the explicit fallible [`Buffer::destroy`]. Shape and element type are
//! queried once at construction and cached, since PJRT buffers don't change
//! shape after creation.
//!
//! Grounded on the teacher's `Buffer` (`wrap`/`dims`/`primitive_type`,
//! the two-call `PJRT_Buffer_ToHostBuffer` pattern in `call_copy_to_host`),
//! simplified to a single flat, typed host representation (`Vec<T::ElemType>`)
//! in place of the teacher's `HostBuffer`/`MemoryLayout` machinery.

use std::ffi::c_void;
use std::ptr;

use pjrt_sys::{
    PJRT_Buffer, PJRT_Buffer_Destroy_Args, PJRT_Buffer_Dimensions_Args,
    PJRT_Buffer_ElementType_Args, PJRT_Buffer_ToHostBuffer_Args,
};

use crate::context::Context;
use crate::error::{Error, Result};
use crate::event::Event;
use crate::ty::{PrimitiveType, Type};

/// A buffer holding data on a PJRT device.
pub struct Buffer {
    context: Context,
    ptr: *mut PJRT_Buffer,
    shape: Vec<i64>,
    primitive_type: PrimitiveType,
}

impl std::fmt::Debug for Buffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Buffer")
            .field("primitive_type", &self.primitive_type)
            .field("shape", &self.shape)
            .finish()
    }
}

impl Buffer {
    pub(crate) fn wrap(context: &Context, ptr: *mut PJRT_Buffer) -> Result<Self> {
        assert!(!ptr.is_null());

        let mut type_args = PJRT_Buffer_ElementType_Args::new();
        type_args.buffer = ptr;
        let type_args = context.PJRT_Buffer_ElementType(type_args)?;
        let primitive_type = PrimitiveType::try_from(type_args.type_)?;

        let mut dims_args = PJRT_Buffer_Dimensions_Args::new();
        dims_args.buffer = ptr;
        let dims_args = context.PJRT_Buffer_Dimensions(dims_args)?;
        let shape = if dims_args.num_dims == 0 {
            Vec::new()
        } else {
            unsafe { std::slice::from_raw_parts(dims_args.dims, dims_args.num_dims) }.to_vec()
        };

        Ok(Self {
            context: context.clone(),
            ptr,
            shape,
            primitive_type,
        })
    }

    pub(crate) fn ptr(&self) -> *mut PJRT_Buffer {
        self.ptr
    }

    /// The buffer's shape, queried once at construction.
    pub fn shape(&self) -> &[i64] {
        &self.shape
    }

    pub fn primitive_type(&self) -> PrimitiveType {
        self.primitive_type
    }

    fn check_type<T: Type>(&self) -> Result<()> {
        if self.primitive_type != T::PRIMITIVE_TYPE {
            return Err(Error::InvalidArgument(format!(
                "buffer holds {:?}, requested host type {:?}",
                self.primitive_type,
                T::PRIMITIVE_TYPE
            )));
        }
        Ok(())
    }

    fn call_copy_to_host(&self) -> Result<(PJRT_Buffer_ToHostBuffer_Args, Vec<u8>)> {
        let mut args = PJRT_Buffer_ToHostBuffer_Args::new();
        args.src = self.ptr;
        // First call with a null destination to learn how many bytes to
        // allocate, then a second call to actually fill them.
        args = self.context.PJRT_Buffer_ToHostBuffer(args)?;
        let mut buf: Vec<u8> = vec![0; args.dst_size];
        args.dst = buf.as_mut_ptr() as *mut c_void;
        args = self.context.PJRT_Buffer_ToHostBuffer(args)?;
        Ok((args, buf))
    }

    fn bytes_to_elems<T: Type>(bytes: Vec<u8>) -> Vec<T::ElemType> {
        let length = bytes.len() / T::SIZE;
        let capacity = bytes.capacity() / T::SIZE;
        let ptr = bytes.as_ptr() as *mut T::ElemType;
        let elems = unsafe { Vec::from_raw_parts(ptr, length, capacity) };
        std::mem::forget(bytes);
        elems
    }

    /// Copies this buffer's contents to the host, asynchronously.
    pub async fn to_host<T: Type>(&self) -> Result<Vec<T::ElemType>> {
        self.check_type::<T>()?;
        let (args, bytes) = self.call_copy_to_host()?;
        let event = Event::wrap(&self.context, args.event);
        event.into_future().await?;
        Ok(Self::bytes_to_elems::<T>(bytes))
    }

    /// Copies this buffer's contents to the host, blocking.
    pub fn to_host_sync<T: Type>(&self) -> Result<Vec<T::ElemType>> {
        self.check_type::<T>()?;
        let (args, bytes) = self.call_copy_to_host()?;
        let event = Event::wrap(&self.context, args.event);
        event.wait()?;
        Ok(Self::bytes_to_elems::<T>(bytes))
    }

    /// Destroys this buffer, surfacing any error instead of logging and
    /// swallowing it as `Drop` must.
    pub fn destroy(mut self) -> Result<()> {
        self.destroy_inner()
    }

    fn destroy_inner(&mut self) -> Result<()> {
        if self.ptr.is_null() {
            return Ok(());
        }
        let mut args = PJRT_Buffer_Destroy_Args::new();
        args.buffer = self.ptr;
        self.ptr = ptr::null_mut();
        self.context.PJRT_Buffer_Destroy(args).map(|_| ())
    }
}

impl Drop for Buffer {
    fn drop(&mut self) {
        if let Err(err) = self.destroy_inner() {
            log::warn!("PJRT_Buffer_Destroy failed: {err}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ty::F32;

    #[test]
    fn bytes_to_elems_reinterprets_in_place() {
        let bytes = 1.5f32.to_ne_bytes().to_vec();
        let elems = Buffer::bytes_to_elems::<F32>(bytes);
        assert_eq!(elems, vec![1.5f32]);
    }
}
