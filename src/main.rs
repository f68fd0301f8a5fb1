//! # Voxel Sandbox Entry Point
//!
//! Runs the headless demo from the library's `run()` function.
//!
//! ## Usage
//!
//! ```bash
//! RUST_LOG=info cargo run --release -- [settings.json]
//! ```

fn main() {
    voxel_sandbox::run();
}
