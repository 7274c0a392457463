#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]
#![warn(rustdoc::invalid_rust_codeblocks)]

//! # Voxel World
//!
//! The deterministic simulation core of a browser voxel-world game, built
//! with Rust and designed to be embedded behind a thin rendering and UI
//! host (including WebAssembly hosts).
//!
//! This crate owns everything with real algorithmic content: procedural
//! chunked terrain, voxel storage and meshing, player movement and
//! collision, entity AI, and the frame loop tying them together.
//! Rendering, networking, and persistence services stay outside and talk
//! to the core through narrow interfaces.
//!
//! ## Key Modules
//!
//! * `voxels` - Block materials, chunk storage, terrain generation, and the world
//! * `meshing` - Mesh descriptions and the render sink the core publishes into
//! * `player` - Movement integration, collision sampling, and the camera
//! * `entities` - Non-player entities and their behavior profiles
//! * `input` - Buffering of asynchronous input into per-frame snapshots
//! * `inventory` - Item storage and the item registry
//! * `simulation` - The per-frame orchestrator and session save/load
//!
//! ## Architecture
//!
//! The core is single-threaded and frame-driven: the host calls
//! [`Simulation::tick`] once per rendered frame and every state transition
//! runs synchronously inside that call. Chunk generation and meshing block
//! the frame that triggers them; streaming is throttled to bound the cost.
//!
//! ## Usage
//!
//! ```rust
//! use voxelworld::meshing::NullRenderSink;
//! use voxelworld::Simulation;
//!
//! let mut sink = NullRenderSink;
//! let mut simulation = Simulation::new(2, &mut sink);
//!
//! // Host frame loop
//! simulation.tick(&mut sink);
//! ```

use log::info;

pub mod entities;
pub mod input;
pub mod inventory;
pub mod meshing;
pub mod player;
pub mod simulation;
pub mod voxels;

pub use simulation::Simulation;

/// Runs a headless session for smoke-testing and profiling.
///
/// Initializes the logger from `RUST_LOG`, creates a session with the
/// given streaming radius, advances it by fixed 60 Hz steps, and logs a
/// summary. No renderer is attached; every mesh goes to the null sink.
pub fn run_headless(render_distance: i32, frames: u32) {
    let mut log_builder = env_logger::Builder::new();
    log_builder
        .target(env_logger::Target::Stdout)
        .parse_env("RUST_LOG")
        .init();

    info!("starting headless session");
    let mut sink = meshing::NullRenderSink;
    let mut simulation = Simulation::new(render_distance, &mut sink);

    let dt = 1.0 / 60.0;
    for _ in 0..frames {
        simulation.advance(dt, &mut sink);
    }

    let position = simulation.player().position();
    info!(
        "simulated {frames} frames; player at ({:.1}, {:.1}, {:.1}), {} chunks resident, {} entities",
        position.x,
        position.y,
        position.z,
        simulation.world().loaded_chunk_count(),
        simulation.entities().len()
    );
}
