//! # Voxel Box Engine Entry Point
//!
//! Runs a headless streaming session through the library's `run()` function.
//!
//! ## Usage
//!
//! ```bash
//! RUST_LOG=info cargo run --release -- --frames 16
//! ```

fn main() {
    if voxel_box_engine::run().is_err() {
        std::process::exit(1);
    }
}
