// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Mesh Ingest
//!
//! Parallel, memory-mapped importer for large Wavefront OBJ meshes and ASCII
//! PLY point clouds. A file is mapped once, split into line-aligned chunks,
//! scanned on a rayon pool and merged back in file order. Malformed lines are
//! logged and skipped rather than failing the import.
//!
//! The [`geometry`] module adds analytics over the imported points: an
//! approximate bounding sphere, k-d tree distance statistics and a convex hull.

pub mod cli;
pub mod config;
pub mod error;
pub mod geometry;
pub mod io;

pub use config::IngestConfig;
pub use error::{ExportError, FormatError, GeometryError, ImportError, ImportResult, ResourceError};
pub use geometry::{estimate_bounding_sphere, MergedGeometry, Mesh, Sphere};
pub use io::{import_obj, import_ply_points, ImportOptions, MapBackend};
