use std::env;
use std::fs;
use std::path::Path;

fn main() {
    // Drop a config template next to the build output
    let out_dir = env::var("OUT_DIR").unwrap_or_else(|_| "./".to_string());
    let template_path = Path::new(&out_dir).join("../../../flvkit.template.toml");

    let template = include_str!("flvkit.template.toml");

    let _ = fs::write(template_path, template);
    println!("cargo:rerun-if-changed=build.rs");
    println!("cargo:rerun-if-changed=flvkit.template.toml");
}
