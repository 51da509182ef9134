fn main() {
    println!("cargo:rerun-if-changed=config/flower.json");

    #[cfg(feature = "espidf")]
    embuild::espidf::sysenv::output();
}
