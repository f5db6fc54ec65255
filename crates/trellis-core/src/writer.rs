use crate::CoreError;
use serde::Serialize;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::debug;
use trellis_manifest::{ManifestDescriptor, ManifestSet};

pub const DOCUMENT_SEPARATOR: &str = "---\n";

/// What a completed write produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WriteSummary {
    pub manifests: usize,
    pub bytes: usize,
    /// blake3 of the exact bytes written, hex encoded.
    pub digest: String,
}

/// Render one manifest as a YAML document, without separator.
pub fn render(manifest: &ManifestDescriptor) -> Result<String, CoreError> {
    let marshal_error = |reason: String| CoreError::Marshal {
        name: manifest.name().to_string(),
        reason,
    };
    manifest.check().map_err(|e| marshal_error(e.to_string()))?;
    serde_yaml::to_string(manifest).map_err(|e| marshal_error(e.to_string()))
}

/// Write every manifest of `manifests`, in order, each followed by `---`.
///
/// Stops at the first manifest that fails to render; documents already
/// written to `sink` stay there. Use [`write_manifests_to_path`] when a
/// partial result must never become visible.
pub fn write_manifests<W: Write>(
    manifests: ManifestSet,
    sink: &mut W,
) -> Result<WriteSummary, CoreError> {
    let mut hasher = blake3::Hasher::new();
    let mut count = 0;
    let mut bytes = 0;

    for manifest in manifests {
        let document = render(&manifest)?;
        for chunk in [document.as_bytes(), DOCUMENT_SEPARATOR.as_bytes()] {
            sink.write_all(chunk)?;
            hasher.update(chunk);
            bytes += chunk.len();
        }
        count += 1;
        debug!("wrote {} {}", manifest.kind(), manifest.name());
    }
    sink.flush()?;

    Ok(WriteSummary {
        manifests: count,
        bytes,
        digest: hasher.finalize().to_hex().to_string(),
    })
}

/// Write the stream to `dest` atomically: the file appears complete or not
/// at all.
pub fn write_manifests_to_path(
    manifests: ManifestSet,
    dest: &Path,
) -> Result<WriteSummary, CoreError> {
    let io_error = |source: std::io::Error| CoreError::Io {
        path: dest.to_path_buf(),
        source,
    };
    let dir = dest
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .map_or_else(|| PathBuf::from("."), Path::to_path_buf);

    let tmp = NamedTempFile::new_in(&dir).map_err(io_error)?;
    let mut out = BufWriter::new(tmp);
    let summary = write_manifests(manifests, &mut out)?;
    let tmp = out.into_inner().map_err(|e| io_error(e.into_error()))?;
    tmp.as_file().sync_all().map_err(io_error)?;
    tmp.persist(dest).map_err(|e| io_error(e.error))?;

    debug!(
        "wrote {} manifests ({} bytes) to {}",
        summary.manifests,
        summary.bytes,
        dest.display()
    );
    Ok(summary)
}
