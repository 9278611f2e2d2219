//! # Voxel World
//!
//! This module contains the data side of the engine: block types, chunks and the
//! world that holds them.
//!
//! ## Architecture
//!
//! * **Block**: Defines individual voxel types and their properties
//! * **Chunk**: A 16x16 column of blocks spanning the world height, stored in lazily allocated sections
//! * **Neighborhood**: A borrowed 3x3 view of chunks used by the meshers to look across chunk borders
//! * **World**: Owns the resident chunks and tracks outstanding generation requests
//! * **Tasks**: Chunk generation on the worker pool
//!
//! ## Data Flow
//!
//! 1. The engine asks the world to begin generating chunks near the camera
//! 2. Generation tasks fill chunks on worker threads
//! 3. Results are inserted into the world on the main thread
//! 4. Chunks whose 3x3 neighborhood is complete are handed to the mesh manager
//!
//! ## Thread Safety
//!
//! * Chunks are shared with worker threads through `MtResource` handles
//! * Meshing holds read locks for a whole pass; block edits take the write lock

pub mod block;
pub mod chunk;
pub mod neighborhood;
pub mod tasks;
pub mod world;
