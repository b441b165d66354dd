fn main() {
    println!("cargo:rerun-if-env-changed=GASWATCH_CONFIG_JSON");
    println!("cargo:rerun-if-env-changed=GASWATCH_WIFI_SSID");
    println!("cargo:rerun-if-env-changed=GASWATCH_WIFI_PASS");

    #[cfg(feature = "espidf")]
    embuild::espidf::sysenv::output();
}
