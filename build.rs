fn main() {
    // Only the desktop shell needs Tauri's generated context.
    #[cfg(feature = "desktop")]
    tauri_build::build();
}
