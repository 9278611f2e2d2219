//! # Voxel Task System
//!
//! This module contains tasks related to voxel world generation. Generation runs
//! on the worker pool so the main thread only ever inserts finished chunks.

pub mod chunk_generation_task;

pub use chunk_generation_task::ChunkGenerationTask;
