//! Build script for locating ONNX Runtime and providing installation guidance.
//!
//! `ort` downloads a prebuilt runtime by default; this script only reports
//! when a system runtime has been requested and where it is expected.

use std::env;
use std::path::Path;

fn main() {
    println!("cargo:rerun-if-changed=build.rs");

    check_onnxruntime();

    // Print detected environment
    println!(
        "cargo:rustc-env=BUILD_TARGET={}",
        env::var("TARGET").unwrap_or_default()
    );
}

fn check_onnxruntime() {
    println!("cargo:rerun-if-env-changed=ORT_STRATEGY");
    println!("cargo:rerun-if-env-changed=ORT_LIB_LOCATION");

    match env::var("ORT_STRATEGY").as_deref() {
        Ok("system") => match env::var("ORT_LIB_LOCATION") {
            Ok(location) if Path::new(&location).exists() => {
                println!("cargo:warning=Using system ONNX Runtime from {location}");
            }
            Ok(location) => {
                println!("cargo:warning=ORT_LIB_LOCATION does not exist: {location}");
                println!("cargo:warning=Point it at the directory containing libonnxruntime");
            }
            Err(_) => {
                println!("cargo:warning=ORT_STRATEGY=system requires ORT_LIB_LOCATION to be set");
                println!("cargo:warning=On Ubuntu: download a release from github.com/microsoft/onnxruntime");
            }
        },
        Ok(other) => println!("cargo:warning=ONNX Runtime strategy: {other}"),
        Err(_) => {}
    }
}
