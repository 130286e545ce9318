// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Ingest configuration system

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::io::{ImportOptions, MapBackend};

/// Default config file looked up by [`IngestConfig::load`]
pub const CONFIG_FILE: &str = "mesh-ingest.toml";

/// Ingest configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IngestConfig {
    /// Scan chunks on several threads
    pub parallel: bool,
    /// Chunk count; hardware parallelism when unset
    pub chunks: Option<usize>,
    /// How the file is brought into memory
    pub backend: MapBackend,
    /// Return the originating chunk of every vertex
    pub record_chunk_ids: bool,
    /// Neighbour count for mean nearest-neighbour distance
    pub neighbors: usize,
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            parallel: true,
            chunks: None, // Auto-detect
            backend: MapBackend::Auto,
            record_chunk_ids: false,
            neighbors: 6,
        }
    }
}

impl IngestConfig {
    /// Load configuration from file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {:?}", path.as_ref()))?;
        let config: IngestConfig = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {:?}", path.as_ref()))?;
        Ok(config)
    }

    /// Load configuration with environment variable overrides
    pub fn load() -> Result<Self> {
        let mut config = if PathBuf::from(CONFIG_FILE).exists() {
            Self::from_file(CONFIG_FILE)?
        } else {
            Self::default()
        };
        config.apply_overrides(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    /// Apply `MESH_INGEST_*` overrides read through `lookup`.
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<()> {
        if let Some(parallel) = lookup("MESH_INGEST_PARALLEL") {
            self.parallel = parallel
                .parse()
                .with_context(|| format!("MESH_INGEST_PARALLEL is not a boolean: {parallel}"))?;
        }

        if let Some(chunks) = lookup("MESH_INGEST_CHUNKS") {
            self.chunks = Some(
                chunks
                    .parse()
                    .with_context(|| format!("MESH_INGEST_CHUNKS is not a count: {chunks}"))?,
            );
        }

        if let Some(backend) = lookup("MESH_INGEST_BACKEND") {
            match backend.parse::<MapBackend>() {
                Ok(b) => self.backend = b,
                Err(_) => bail!("MESH_INGEST_BACKEND must be auto, mmap or buffered: {backend}"),
            }
        }

        Ok(())
    }

    /// Save configuration to file
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let content = toml::to_string_pretty(self).context("Failed to serialize config")?;
        std::fs::write(path.as_ref(), content)
            .with_context(|| format!("Failed to write config file: {:?}", path.as_ref()))?;
        Ok(())
    }

    /// Options for the import entry points
    pub fn import_options(&self) -> ImportOptions {
        ImportOptions {
            parallel: self.parallel,
            chunks: self.chunks,
            backend: self.backend,
            record_chunk_ids: self.record_chunk_ids,
        }
    }
}
