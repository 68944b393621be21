use std::env;
use std::fs;
use std::path::Path;

fn main() {
    println!("cargo:rerun-if-changed=config.toml");

    // Get the output directory from cargo
    let Ok(out_dir) = env::var("OUT_DIR") else {
        return;
    };

    // Copy config.toml next to the built executable
    let config_path = Path::new("config.toml");
    let Some(target_dir) = Path::new(&out_dir).ancestors().nth(3) else {
        return;
    };
    let dest_path = target_dir.join("config.toml");

    if let Err(e) = fs::copy(config_path, &dest_path) {
        println!("cargo:warning=could not copy config.toml: {}", e);
    }
}
