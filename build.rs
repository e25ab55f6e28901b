//! Purpose: Compile the in-tree Atlas C engine for Rust FFI.
//! Role: Cargo build-script; configures `cc` inputs/includes and rebuild triggers.
//! Invariants: `cargo:rerun-if-changed` covers every C source and header.
//! Invariants: Produces an `atlas` object library linked into the Rust crate.
//! Invariants: Uses only Cargo-provided env vars (e.g. `CARGO_MANIFEST_DIR`).
use std::env;
use std::path::PathBuf;

fn main() {
    let manifest_dir = PathBuf::from(env::var("CARGO_MANIFEST_DIR").expect("CARGO_MANIFEST_DIR"));
    let c_dir = manifest_dir.join("c");

    println!("cargo:rerun-if-changed=c/atlas.c");
    println!("cargo:rerun-if-changed=c/atlas.h");

    cc::Build::new()
        .include(&c_dir)
        .file(c_dir.join("atlas.c"))
        .flag_if_supported("-std=c11")
        .compile("atlas");
}
