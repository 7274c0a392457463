//! # Meshing Module
//!
//! This module defines the mesh *description* types the simulation hands to
//! the embedding renderer, and the sink trait through which meshes and
//! entity visuals are published.
//!
//! ## Ownership
//!
//! The simulation never owns a GPU resource. Chunks and entities produce
//! plain vertex/index buffers; the renderer registers them under the chunk
//! or entity identity and owns their lifetime. Eviction and removal are
//! communicated through the same sink, which is the only resource-release
//! path in the core.

use cgmath::Point3;

use crate::entities::EntityKind;
use crate::voxels::block::block_side::BlockSide;
use crate::voxels::block::block_type::BlockType;
use crate::voxels::block::{atlas_tile, atlas_uv_rect};
use crate::voxels::chunk::ChunkKey;

/// A single vertex of a chunk mesh.
///
/// The layout is `#[repr(C)]` and `Pod` so the embedding renderer can
/// upload the vertex buffer without copying or repacking.
#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Vertex {
    /// Position in chunk-local space; the renderer places the mesh at the
    /// chunk's world origin.
    pub position: [f32; 3],
    /// Outward face normal, shared by the four vertices of a face.
    pub normal: [f32; 3],
    /// Texture atlas coordinates.
    pub uv: [f32; 2],
}

/// A renderable mesh description: vertices plus triangle indices.
#[derive(Clone, Debug, Default)]
pub struct MeshData {
    /// Vertex buffer, four vertices per emitted face.
    pub vertices: Vec<Vertex>,
    /// Index buffer, two triangles per emitted face.
    pub indices: Vec<u32>,
}

impl MeshData {
    /// Whether the mesh contains no geometry.
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// The number of quad faces emitted into this mesh.
    pub fn face_count(&self) -> usize {
        self.vertices.len() / 4
    }

    /// Emits one face of the voxel at chunk-local `(x, y, z)`.
    ///
    /// Appends four vertices sharing the face normal, a UV quad selected
    /// from the texture atlas by material and face role, and the two
    /// triangles (0,1,2) and (0,2,3).
    pub fn push_face(&mut self, x: i32, y: i32, z: i32, side: BlockSide, block: BlockType) {
        let base = self.vertices.len() as u32;
        let (nx, ny, nz) = side.normal();
        let normal = [nx as f32, ny as f32, nz as f32];

        let (u_min, v_min, u_max, v_max) = atlas_uv_rect(atlas_tile(block, side.role()));
        let uvs = [[u_min, v_max], [u_max, v_max], [u_max, v_min], [u_min, v_min]];

        for (corner, uv) in side.corners().iter().zip(uvs) {
            self.vertices.push(Vertex {
                position: [
                    x as f32 + corner[0],
                    y as f32 + corner[1],
                    z as f32 + corner[2],
                ],
                normal,
                uv,
            });
        }

        self.indices
            .extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
    }
}

/// The opaque renderer the simulation publishes into.
///
/// Implementations own every registered resource; the core only issues
/// add/update/remove calls keyed by chunk or entity identity and never
/// reads back.
pub trait RenderSink {
    /// Registers or replaces the mesh of a chunk.
    fn upsert_chunk_mesh(&mut self, key: ChunkKey, mesh: &MeshData);

    /// Releases the mesh of an evicted or reloaded chunk.
    fn remove_chunk_mesh(&mut self, key: ChunkKey);

    /// Registers or moves an entity visual.
    fn upsert_entity(&mut self, id: &str, kind: EntityKind, position: Point3<f32>, yaw: f32);

    /// Releases an entity visual.
    fn remove_entity(&mut self, id: &str);

    /// Shows or hides the player avatar (visible only in third person).
    fn set_avatar_visible(&mut self, visible: bool);
}

/// A sink that discards everything, for headless runs and tests.
pub struct NullRenderSink;

impl RenderSink for NullRenderSink {
    fn upsert_chunk_mesh(&mut self, _key: ChunkKey, _mesh: &MeshData) {}
    fn remove_chunk_mesh(&mut self, _key: ChunkKey) {}
    fn upsert_entity(&mut self, _id: &str, _kind: EntityKind, _position: Point3<f32>, _yaw: f32) {}
    fn remove_entity(&mut self, _id: &str) {}
    fn set_avatar_visible(&mut self, _visible: bool) {}
}
