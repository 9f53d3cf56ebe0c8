fn main() {
    // ESP-IDF build environment propagation. Host-target builds (tests)
    // disable the espidf feature and skip this entirely.
    #[cfg(feature = "espidf")]
    embuild::espidf::sysenv::output();
}
