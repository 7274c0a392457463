//! # Headless Simulation Entry Point
//!
//! Runs the simulation core without a renderer: a fixed number of 60 Hz
//! frames against the null sink, logging a session summary at the end.
//! Useful for smoke-testing terrain generation, streaming, and the frame
//! loop from the command line.
//!
//! ## Usage
//!
//! ```bash
//! RUST_LOG=info cargo run --release
//! ```

fn main() {
    voxelworld::run_headless(4, 600);
}
