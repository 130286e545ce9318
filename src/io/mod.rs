// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! I/O module - mapping, chunked scanning, importing, and exporting

pub mod chunk;
pub mod cursor;
pub mod obj;
pub mod orchestrator;
pub mod ply;
pub mod region;

mod compare;
mod export;
mod importer;

pub use chunk::{partition, ByteRange};
pub use compare::{compare_count_with_tolerance, compare_geometry, GeometryComparison};
pub use export::{
    export_obj, export_points_ply, export_polylines_obj, export_sampled_points_ply, export_vtk,
};
pub use importer::{
    has_extension, import_obj, import_ply_points, scan_obj_bytes, ImportOptions, ImportReport,
    ObjImport, PointCloudImport,
};
pub use region::{FileRegion, MapBackend};
