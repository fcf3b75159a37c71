#![deny(unused_must_use)]

//! Safe, resource-managed Rust bindings to the PJRT plugin C API.
//!
//! ## Architecture
//!
//! - [`Context`] loads a plugin shared library, resolves `GetPjrtApi`,
//!   validates its advertised ABI version, and runs `PJRT_Plugin_Initialize`.
//!   Every other type holds a clone of it, so the plugin's function table
//!   outlives everything built on top of it.
//! - [`Client`] is the root handle for devices, compilation, and data
//!   transfer within one loaded plugin.
//! - [`DeviceView`] is a non-owning handle to one addressable device.
//! - [`Program`] frames a compile call's StableHLO source; compile options
//!   are an internal, hard-coded blob (see `compile_options.rs`), not a
//!   caller-supplied parameter.
//! - [`Executable`] is the transient, device-agnostic result of compiling a
//!   program; [`LoadedExecutable`] is the same program loaded onto a device
//!   and ready to run.
//! - [`Buffer`] owns device-resident data and can be read back to the host.
//! - [`Event`] bridges a PJRT completion callback to a Rust future via
//!   [`tokio::sync::oneshot`], internally through the crate-private
//!   `CallbackBridge<T>`.
//!
//! ## Thread safety
//!
//! [`Context`] is `Send + Sync`: the PJRT function table it loads is
//! read-only once obtained, and the PJRT C API contract requires plugins to
//! tolerate being called from multiple threads. Every other handle
//! ([`Client`], [`DeviceView`], [`Buffer`], [`Executable`],
//! [`LoadedExecutable`], [`Event`]) wraps a raw pointer with no internal
//! locking and is meant to be used from a single thread at a time, the way
//! the plugin itself expects operations on one handle to be serialized.

mod utils;

mod error;
pub use error::{Error, ErrorCode, Result};

mod ty;
pub use ty::{ElemType, PrimitiveType, Type, F32, F64, I16, I32, I64, I8, U16, U32, U64, U8};

mod callback;

mod context;
pub use context::{Context, Version};

mod event;
pub use event::Event;

mod device;
pub use device::DeviceView;

mod buffer;
pub use buffer::Buffer;

mod executable;
pub use executable::Executable;

mod loaded_executable;
pub use loaded_executable::LoadedExecutable;

mod client;
pub use client::Client;

mod program;
pub use program::{Program, ProgramFormat};

mod compile_options;

// Unit tests live alongside each module in `#[cfg(test)] mod tests`
// blocks; feature-gated integration tests against a real plugin live
// under `pjrt/tests/` (see that directory's module docs).
