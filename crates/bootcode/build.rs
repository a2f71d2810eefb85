use std::env;

fn main() {
    bootcode_build::emit_target_cfgs();

    let target = env::var("TARGET").unwrap_or_default();
    if bootcode_build::classify(&target).is_none() {
        // Host build: only the portable sequencing logic and its tests.
        return;
    }

    println!("cargo::rerun-if-changed=bootcode.x");
    bootcode_build::install_linker_fragment("bootcode.x", include_bytes!("bootcode.x"));
}
