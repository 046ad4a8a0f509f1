fn main() {
    let assets = std::env::var("STYLEBOOK_ASSETS").unwrap_or_else(|_| "CONFIG".to_string());

    println!("cargo:rustc-check-cfg=cfg(STYLEBOOK_ASSETS, values(\"CONFIG\", \"STATIC\", \"MANIFEST\"))");

    println!("cargo:rustc-cfg=STYLEBOOK_ASSETS=\"{}\"", assets);

    println!("cargo:rerun-if-env-changed=STYLEBOOK_ASSETS");
}
