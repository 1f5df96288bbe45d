use std::{env, error::Error, fs, path::Path};

// Same checks and types as the library, so a record accepted here is
// accepted again by `Config::validate` at boot.
#[allow(dead_code)]
#[path = "src/constants.rs"]
mod constants;
#[allow(dead_code)]
#[path = "src/config/error.rs"]
mod error;
#[allow(dead_code)]
#[path = "src/config/file.rs"]
mod file;
#[allow(dead_code)]
#[path = "src/config/rules.rs"]
mod rules;
#[allow(dead_code)]
#[path = "src/config/types.rs"]
mod types;

use constants::CONFIG_PATH_ENV;
use file::{EnvSecrets, RawConfig};

fn main() -> Result<(), Box<dyn Error>> {
    let manifest_dir = env::var("CARGO_MANIFEST_DIR")?;
    let path = file::config_path(Path::new(&manifest_dir));

    // Tell Cargo to rerun if the config or its location changes
    println!("cargo:rerun-if-changed={}", path.display());
    println!("cargo:rerun-if-env-changed={}", CONFIG_PATH_ENV);

    let raw = RawConfig::load(&path)?;
    for name in raw.secret_names() {
        println!("cargo:rerun-if-env-changed={}", name);
    }

    // Fail the build rather than flash a device with a bad record
    let settings = raw
        .resolve(&EnvSecrets)
        .map_err(|e| format!("{}: {}", path.display(), e))?;

    let out_dir = env::var("OUT_DIR")?;
    let dest_path = Path::new(&out_dir).join("config.rs");
    fs::write(dest_path, settings.to_rust_const())?;

    // Firmware link script, only when building for the chip
    if env::var("TARGET").is_ok_and(|target| target.contains("xtensa")) {
        println!("cargo:rustc-link-arg-bins=-Tlinkall.x");
    }

    Ok(())
}
