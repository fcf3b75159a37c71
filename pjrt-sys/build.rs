use std::env;
use std::path::PathBuf;

// `wrapper.h` and `include/pjrt_c_api.h` are vendored from the PJRT C API
// headers (https://github.com/openxla/xla/tree/main/xla/pjrt/c). Like the
// plugin shared library itself, the C header is an external collaborator of
// this crate, not something generated here — see DESIGN.md.
fn main() {
    let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap());
    let include = PathBuf::from("include");

    println!("cargo:rerun-if-changed=wrapper.h");
    println!("cargo:rerun-if-changed={}", include.display());

    let bindings = bindgen::Builder::default()
        .header("wrapper.h")
        .clang_arg(format!("-I{}", include.display()))
        .parse_callbacks(Box::new(bindgen::CargoCallbacks::new()))
        .derive_default(true)
        .generate()
        .expect("unable to generate bindings");

    bindings
        .write_to_file(out_dir.join("bindings.rs"))
        .expect("unable to write bindings!");
}
