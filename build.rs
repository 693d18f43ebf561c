fn main() {
    // Release builds pass the version in, eg: VERSION=v1.2.0 cargo build --release
    let version = std::env::var("VERSION").unwrap_or_else(|_| "v0.0.0".to_string());
    println!("cargo:rustc-env=VERSION={}", version);
    println!("cargo:rerun-if-env-changed=VERSION");
}
