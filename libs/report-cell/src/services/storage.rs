use std::borrow::Cow;

use crate::models::{Report, ReportError};

const OBJECT_MARKERS: [&str; 4] = [
    "/object/public/",
    "/object/sign/",
    "/object/authenticated/",
    "/object/",
];

/// Object path of a report file inside `bucket`, whether `file_url` holds a
/// bare path or a public, signed or authenticated storage URL.
pub fn resolve_storage_path(file_url: &str, bucket: &str) -> Result<String, ReportError> {
    let mut path = file_url.split(['?', '#']).next().unwrap_or_default();

    if let Some((idx, marker)) = OBJECT_MARKERS
        .iter()
        .find_map(|marker| path.find(marker).map(|idx| (idx, *marker)))
    {
        path = &path[idx + marker.len()..];
    }

    let path = path.trim_start_matches('/');
    let path = path
        .strip_prefix(bucket)
        .and_then(|rest| rest.strip_prefix('/'))
        .unwrap_or(path);

    let decoded = urlencoding::decode(path).unwrap_or(Cow::Borrowed(path));
    let decoded = decoded.trim_matches('/');

    if decoded.is_empty() {
        return Err(ReportError::MissingFile);
    }
    Ok(decoded.to_string())
}

/// Local file name for a downloaded report: the title with unsafe
/// characters replaced and the first 8 characters of the report id appended,
/// keeping the stored file's extension (pdf if none).
pub fn download_file_name(report: &Report, object_path: &str) -> String {
    let mut stem = String::with_capacity(report.title.len());
    for c in report.title.trim().chars() {
        if c.is_alphanumeric() || c == '-' || c == '_' {
            stem.push(c);
        } else if !stem.ends_with('_') {
            stem.push('_');
        }
    }
    let stem = match stem.trim_matches('_') {
        "" => "report",
        trimmed => trimmed,
    };
    let id = report.id.simple().to_string();
    let short_id = &id[..8];

    let extension = object_path
        .rsplit('/')
        .next()
        .and_then(|name| name.rsplit_once('.'))
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .filter(|ext| !ext.is_empty() && ext.chars().all(|c| c.is_ascii_alphanumeric()))
        .unwrap_or_else(|| "pdf".to_string());

    format!("{}-{}.{}", stem, short_id, extension)
}
