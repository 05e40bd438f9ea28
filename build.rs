fn main() {
    // Baked-in config override document (see `config::SystemConfig::from_json`).
    println!("cargo:rerun-if-env-changed=IRRIGATOR_CONFIG");

    #[cfg(feature = "espidf")]
    embuild::espidf::sysenv::output();
}
