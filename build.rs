fn main() {
    // Propagate ESP-IDF include paths and link args only when the espidf
    // feature (and thus esp-idf-sys) is enabled; host-target test builds
    // have no ESP-IDF toolchain environment to forward.
    if std::env::var_os("CARGO_FEATURE_ESPIDF").is_some() {
        embuild::espidf::sysenv::output();
    }
}
