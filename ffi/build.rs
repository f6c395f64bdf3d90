//! Generate `include/books_ffi.h` for C, Swift and JNI hosts.

use std::path::PathBuf;

fn main() {
    println!("cargo:rerun-if-changed=src");
    println!("cargo:rerun-if-changed=build.rs");

    let crate_dir = PathBuf::from(std::env::var("CARGO_MANIFEST_DIR").unwrap_or_else(|_| ".".to_string()));
    let header = crate_dir.join("include").join("books_ffi.h");

    let generated = cbindgen::Builder::new()
        .with_crate(&crate_dir)
        .with_language(cbindgen::Language::C)
        .with_include_guard("BOOKS_FFI_H")
        .with_documentation(true)
        .generate();

    let bindings = match generated {
        Ok(bindings) => bindings,
        Err(e) => {
            println!("cargo:warning=books_ffi.h not generated: {e}");
            return;
        }
    };

    if let Some(dir) = header.parent() {
        if let Err(e) = std::fs::create_dir_all(dir) {
            println!("cargo:warning=books_ffi.h not written: cannot create {}: {e}", dir.display());
            return;
        }
    }
    // `false` means the header on disk already matched.
    if bindings.write_to_file(&header) {
        println!("cargo:warning=books_ffi.h regenerated at {}", header.display());
    }
}
