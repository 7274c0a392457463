//! # Chunk Meshing
//!
//! Builds the visible-face mesh description of a chunk. The pass is a full
//! rebuild over every voxel; edits never patch a mesh incrementally.

use super::{Chunk, CHUNK_SIZE, WORLD_HEIGHT};
use crate::meshing::MeshData;
use crate::voxels::block::block_side::BlockSide;
use crate::voxels::block::block_type::BlockType;

impl Chunk {
    /// Builds the chunk's mesh description with per-voxel face culling.
    ///
    /// For each non-air voxel, a face is emitted only when the neighboring
    /// cell is air or lies outside this chunk's local range; cross-chunk
    /// neighbors always count as visible, so boundary seams stay correct
    /// without reading other chunks. The world rebuilds edge-adjacent
    /// chunks after boundary edits to drop faces that become hidden.
    pub fn build_mesh(&self) -> MeshData {
        let mut mesh = MeshData::default();

        for x in 0..CHUNK_SIZE {
            for y in 0..WORLD_HEIGHT {
                for z in 0..CHUNK_SIZE {
                    let block = self.get_block(x, y, z);
                    if block == BlockType::AIR {
                        continue;
                    }

                    for side in BlockSide::all() {
                        let (dx, dy, dz) = side.normal();
                        let (nx, ny, nz) = (x + dx, y + dy, z + dz);
                        let visible = !Self::in_range(nx, ny, nz)
                            || self.get_block(nx, ny, nz) == BlockType::AIR;
                        if visible {
                            mesh.push_face(x, y, z, side, block);
                        }
                    }
                }
            }
        }

        mesh
    }
}
