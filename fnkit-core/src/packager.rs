// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! Deployment archive builder.
//!
//! Zips the function source directory into an in-memory blob ready to be
//! uploaded. Entry names are relative to the source directory, use `/` as
//! separator, and are emitted in sorted order so identical trees produce
//! identical archives. Hidden entries (names starting with `.`) are left
//! out, along with everything beneath a hidden directory.

use std::fs::File;
use std::io::{self, Cursor};
use std::path::Path;

use walkdir::WalkDir;
use zip::write::FileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::error::{FnkitError, FnkitResult};

/// Builds a deployment archive from a source directory.
pub trait Packager {
    fn build(&self, source_dir: &Path) -> FnkitResult<Vec<u8>>;
}

/// Deflate-compressed zip packager.
#[derive(Debug, Clone, Copy, Default)]
pub struct ZipPackager;

impl ZipPackager {
    pub fn new() -> Self {
        Self
    }
}

fn is_hidden(name: &std::ffi::OsStr) -> bool {
    name.to_string_lossy().starts_with('.')
}

fn archive_error(err: impl std::fmt::Display) -> FnkitError {
    FnkitError::Archive {
        message: err.to_string(),
    }
}

impl Packager for ZipPackager {
    fn build(&self, source_dir: &Path) -> FnkitResult<Vec<u8>> {
        if !source_dir.is_dir() {
            return Err(archive_error(format!(
                "source directory {} does not exist",
                source_dir.display()
            )));
        }

        let mut buffer = Cursor::new(Vec::new());
        let mut zip = ZipWriter::new(&mut buffer);
        let options = FileOptions::default().compression_method(CompressionMethod::Deflated);
        let mut files = 0usize;

        let walker = WalkDir::new(source_dir)
            .min_depth(1)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|entry| entry.depth() == 0 || !is_hidden(entry.file_name()));

        for entry in walker {
            let entry = entry.map_err(archive_error)?;
            let relative = entry
                .path()
                .strip_prefix(source_dir)
                .map_err(archive_error)?;
            let name = relative
                .components()
                .map(|c| c.as_os_str().to_string_lossy())
                .collect::<Vec<_>>()
                .join("/");

            if entry.file_type().is_dir() {
                zip.add_directory(name, options).map_err(archive_error)?;
            } else {
                zip.start_file(name, options).map_err(archive_error)?;
                let mut file =
                    File::open(entry.path()).map_err(|e| FnkitError::io("reading source file", e))?;
                io::copy(&mut file, &mut zip).map_err(|e| FnkitError::io("compressing source file", e))?;
                files += 1;
            }
        }

        zip.finish().map_err(archive_error)?;
        drop(zip);

        let archive = buffer.into_inner();
        tracing::debug!(
            source = %source_dir.display(),
            files,
            bytes = archive.len(),
            "Deployment archive built"
        );
        Ok(archive)
    }
}
