//! Build-script support shared by the bootcode crates.
//!
//! Cargo does not propagate custom cfgs between crates, so every crate that
//! compiles profile-specific code calls [`emit_target_cfgs`] from its own
//! `build.rs`. The cfgs it emits are:
//!
//! - `arm_profile = "a" | "r" | "m"`
//! - `arm_isa = "a64" | "a32" | "t32"`
//! - `arm_arch = "6" | "7" | "8"`
//! - `arm_strict_align` when the target cannot perform unaligned accesses
//!
//! Host triples emit none of them, which leaves only the portable logic.

mod profile;

pub use profile::{classify, Isa, Profile, TargetProfile};

use std::env;
use std::fs;
use std::path::PathBuf;

const CHECK_CFGS: &[&str] = &[
    r#"cfg(arm_profile, values("a", "r", "m"))"#,
    r#"cfg(arm_isa, values("a64", "a32", "t32"))"#,
    r#"cfg(arm_arch, values("6", "7", "8"))"#,
    "cfg(arm_strict_align)",
];

pub fn emit_check_cfgs() {
    for cfg in CHECK_CFGS {
        println!("cargo::rustc-check-cfg={cfg}");
    }
}

pub fn emit_target_cfgs() {
    println!("cargo::rerun-if-env-changed=TARGET");
    println!("cargo::rerun-if-env-changed=CARGO_CFG_TARGET_FEATURE");
    emit_check_cfgs();

    let target = env::var("TARGET").unwrap_or_default();
    let features = env::var("CARGO_CFG_TARGET_FEATURE").unwrap_or_default();

    let Some(profile) = classify(&target) else {
        return;
    };
    for cfg in profile.cfgs(&features) {
        println!("cargo::rustc-cfg={cfg}");
    }
}

/// Copy a linker script fragment into `OUT_DIR` and put it on the search path,
/// so the final link can `INCLUDE` it by name.
pub fn install_linker_fragment(name: &str, contents: &[u8]) {
    let out = PathBuf::from(env::var_os("OUT_DIR").expect("OUT_DIR is set by cargo"));
    fs::write(out.join(name), contents).unwrap_or_else(|e| panic!("writing {name}: {e}"));
    println!("cargo::rustc-link-search={}", out.display());
}
