//! Upload store response types.

use serde::Serialize;

/// Largest accepted upload: 20 MiB.
pub const MAX_UPLOAD_BYTES: usize = 20 * 1024 * 1024;

/// Public URL prefix under which uploads are served.
pub const UPLOAD_URL_PREFIX: &str = "/uploads/";

/// Map an allow-listed MIME type to the file extension we store it under.
pub fn extension_for(mime: &str) -> Option<&'static str> {
    match mime {
        "image/jpeg" => Some("jpg"),
        "image/png" => Some("png"),
        "image/webp" => Some("webp"),
        _ => None,
    }
}

/// A file in the upload directory that no content record references.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrphanFile {
    pub name: String,
    pub url: String,
}

/// Dry-run result of the orphan sweep.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrphanPreview {
    pub used_count: usize,
    pub total_files: usize,
    pub orphan_count: usize,
    pub orphans: Vec<OrphanFile>,
}

/// Outcome of an orphan sweep.
///
/// `failed` lists URLs whose removal errored; the sweep carries on past them.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SweepReport {
    pub used_count: usize,
    pub total_files: usize,
    pub orphan_count: usize,
    pub deleted: usize,
    pub failed: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct UploadResponse {
    pub ok: bool,
    pub url: String,
}
