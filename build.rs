fn main() {
    // The headless host has nothing to generate; only the webview host needs
    // the tauri context (config, icons, frontend assets).
    #[cfg(feature = "desktop")]
    tauri_build::build();
}
