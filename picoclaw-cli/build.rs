//! Build script to embed build information shown by `picoclaw status`.
//!
//! Emits the short git commit (when built from a checkout), the cargo
//! profile and the target triple as compile-time environment variables.

use std::process::Command;

fn main() {
    let commit = Command::new("git")
        .args(["rev-parse", "--short", "HEAD"])
        .output()
        .ok()
        .filter(|output| output.status.success())
        .map(|output| String::from_utf8_lossy(&output.stdout).trim().to_string())
        .unwrap_or_default();

    let profile = std::env::var("PROFILE").unwrap_or_default();
    let target = std::env::var("TARGET").unwrap_or_default();

    println!("cargo::rustc-env=PICOCLAW_GIT_COMMIT={commit}");
    println!("cargo::rustc-env=PICOCLAW_BUILD_PROFILE={profile}");
    println!("cargo::rustc-env=PICOCLAW_BUILD_TARGET={target}");

    println!("cargo::rerun-if-changed=Cargo.toml");
}
