// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Fork/join execution of chunk scanners using rayon

use super::chunk::ByteRange;
use super::obj::ChunkResult;
use super::ply::PointChunk;
use crate::error::ImportError;
use crate::geometry::MergedGeometry;
use nalgebra::Point3;
use rayon::prelude::*;
use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use tracing::debug;

/// Hardware threads available to this process, at least 1
pub fn available_parallelism() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1)
}

/// Chunk and thread counts for one import
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WorkPlan {
    pub chunks: usize,
    pub workers: usize,
}

impl WorkPlan {
    /// Parallel imports default to one chunk per hardware thread; sequential
    /// imports default to a single chunk and always use a single worker.
    pub fn new(parallel: bool, requested_chunks: Option<usize>) -> Self {
        let hardware = available_parallelism();
        let chunks = requested_chunks
            .unwrap_or(if parallel { hardware } else { 1 })
            .max(1);
        let workers = if parallel { hardware.min(chunks) } else { 1 };
        Self { chunks, workers }
    }
}

/// Run `scan` once per chunk on a pool of `workers` threads.
///
/// The results come back indexed by chunk position. Every task is joined
/// before anything is returned, including when one of them panicked; such a
/// panic is reported as [`ImportError::WorkerFailed`] for the lowest failing
/// chunk.
pub fn run_chunks<T, F>(
    data: &[u8],
    chunks: &[ByteRange],
    workers: usize,
    scan: F,
) -> Result<Vec<T>, ImportError>
where
    T: Send,
    F: Fn(&[u8], ByteRange) -> T + Sync,
{
    let workers = workers.clamp(1, chunks.len().max(1));
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(workers)
        .thread_name(|i| format!("ingest-worker-{i}"))
        .build()?;

    debug!("scanning {} chunk(s) on {} worker(s)", chunks.len(), workers);

    let outcomes: Vec<std::thread::Result<T>> = pool.install(|| {
        chunks
            .par_iter()
            .with_max_len(1)
            .map(|&range| panic::catch_unwind(AssertUnwindSafe(|| scan(data, range))))
            .collect()
    });

    outcomes
        .into_iter()
        .enumerate()
        .map(|(chunk, outcome)| {
            outcome.map_err(|payload| ImportError::WorkerFailed {
                chunk,
                message: panic_message(payload.as_ref()),
            })
        })
        .collect()
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "worker panicked".to_string()
    }
}

/// Concatenate OBJ chunk results in chunk order.
///
/// With `record_chunk_ids`, also returns the originating chunk of every
/// merged vertex, parallel to `vertices`.
pub fn merge_obj_chunks(
    results: Vec<ChunkResult>,
    record_chunk_ids: bool,
) -> (MergedGeometry, Option<Vec<u32>>) {
    let vertex_total = results.iter().map(|r| r.vertices.len()).sum();
    let polygon_total = results.iter().map(|r| r.polygons.len()).sum();

    let mut merged = MergedGeometry::with_capacity(vertex_total, polygon_total);
    let mut chunk_ids = record_chunk_ids.then(|| Vec::with_capacity(vertex_total));

    for (chunk, result) in results.into_iter().enumerate() {
        if let Some(ids) = chunk_ids.as_mut() {
            ids.extend(std::iter::repeat(chunk as u32).take(result.vertices.len()));
        }
        merged.extend(result.vertices, result.normals, result.polygons);
    }

    (merged, chunk_ids)
}

/// Concatenate point chunks in chunk order.
pub fn merge_point_chunks(results: Vec<PointChunk>) -> Vec<Point3<f32>> {
    let total = results.iter().map(|r| r.points.len()).sum();
    let mut points = Vec::with_capacity(total);
    for result in results {
        points.extend(result.points);
    }
    points
}
