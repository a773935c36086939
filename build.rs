fn main() {
    // Emits OUT_DIR/built.rs with the git commit hash consumed by `built_info`.
    if let Err(err) = built::write_built_file() {
        panic!("Failed to acquire build-time information: {err}");
    }
}
