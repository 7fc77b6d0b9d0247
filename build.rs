// Stages static/ into dist/ so the dev server (and wasm-pack's pkg/) share one root.
use std::{fs, path::Path};

use fs_extra::dir::{copy, CopyOptions};

fn main() {
    println!("cargo:rerun-if-changed=static");

    let static_dir = Path::new("static");
    if !static_dir.exists() {
        println!("cargo:warning=static/ missing, nothing to stage");
        return;
    }

    // keep a previously built pkg/ in place; only page assets are refreshed
    let out_dir = Path::new("dist");
    if let Err(e) = fs::create_dir_all(out_dir) {
        println!("cargo:warning=cannot create dist/: {e}");
        return;
    }

    let options = CopyOptions::new().overwrite(true).content_only(true);
    if let Err(e) = copy(static_dir, out_dir, &options) {
        println!("cargo:warning=copying static/ to dist/ failed: {e}");
    }
}
