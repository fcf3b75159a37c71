//! Raw, unsafe bindings to the PJRT C plugin API.
//!
//! This crate is generated glue: `bindings.rs` (the struct/function-pointer
//! layout of `PJRT_Api` and every `PJRT_*_Args` struct) comes from `bindgen`
//! running over the vendored PJRT C header at build time. `pjrt` (the sibling
//! crate in this workspace) is the safe layer built on top; nothing in here
//! should be used directly outside of it.

#![allow(non_upper_case_globals)]
#![allow(non_camel_case_types)]
#![allow(non_snake_case)]
#![allow(dead_code)]

include!(concat!(env!("OUT_DIR"), "/bindings.rs"));
include!("structs.rs");
