//! Build script for the recipe scaler
//!
//! Embeds a build counter and timestamp. The counter lives in OUT_DIR, so it
//! survives incremental rebuilds and resets on `cargo clean`.

use std::env;
use std::fs;
use std::path::PathBuf;

fn main() {
    println!("cargo:rerun-if-changed=src");

    let out_dir = env::var_os("OUT_DIR").map(PathBuf::from).unwrap_or_else(|| PathBuf::from("."));
    let counter_path = out_dir.join("build_number.txt");

    let previous: u64 = fs::read_to_string(&counter_path)
        .ok()
        .and_then(|s| s.trim().parse().ok())
        .unwrap_or(0);
    let build_number = previous + 1;

    // A failed write only means the counter does not advance next time
    let _ = fs::write(&counter_path, build_number.to_string());

    let timestamp = chrono::Utc::now().format("%Y-%m-%dT%H:%M:%SZ").to_string();

    println!("cargo:rustc-env=RECIPE_SCALER_BUILD_NUMBER={}", build_number);
    println!("cargo:rustc-env=RECIPE_SCALER_BUILD_TIMESTAMP={}", timestamp);
}
