//! # Core Module
//!
//! Concurrency primitives shared by the engine. Chunk data is handed between the
//! main thread and the worker pool through `MtResource`, a reference-counted
//! read-write locked container.
//!
//! ## Usage
//! ```rust
//! use voxel_box_engine::core::MtResource;
//!
//! let counter = MtResource::new(0);
//! *counter.get_mut() += 1;
//! assert_eq!(*counter.get(), 1);
//! ```

pub mod mt_resource;

pub use mt_resource::MtResource;
