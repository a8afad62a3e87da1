#[cfg(target_os = "windows")]
fn main() {
    use winresource::WindowsResource;

    let mut res = WindowsResource::new();

    // The icon is optional: builds from a bare checkout still embed version info.
    if std::path::Path::new("res/synthriders-rpc.ico").exists() {
        res.set_icon("res/synthriders-rpc.ico");
    }

    res.set("FileDescription", "Synth Riders Discord RPC")
        .set("ProductName", "Synth Riders Discord RPC")
        .set("OriginalFilename", "synthriders-rpc.exe")
        .set("FileVersion", env!("CARGO_PKG_VERSION"))
        .set("ProductVersion", env!("CARGO_PKG_VERSION"))
        .compile()
        .expect("Failed to embed version resource");
}

#[cfg(not(target_os = "windows"))]
fn main() {}
