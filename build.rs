use std::env;

fn main() {
    println!("cargo:rerun-if-changed=build.rs");

    // Host builds only compile the library and its simulation tests
    let target = env::var("TARGET").unwrap_or_default();
    if !target.contains("avr") {
        return;
    }

    // Configure for ATtiny13A
    println!("cargo:rustc-link-arg=-mmcu=attiny13a");
    println!("cargo:warning=Building firefly for ATtiny13A");
}
