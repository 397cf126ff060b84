//! Links to files served from object storage behind the `/media` proxy.

/// Buckets the backend stores uploads in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bucket {
    Projects,
    Avatars,
    Documents,
}

impl Bucket {
    pub fn as_str(&self) -> &'static str {
        match self {
            Bucket::Projects => "projects",
            Bucket::Avatars => "avatars",
            Bucket::Documents => "documents",
        }
    }
}

/// Builds the public URL of a stored file.
///
/// Empty paths yield an empty string and absolute (`http…`, `blob:`) paths are returned
/// untouched; otherwise a single leading `/` is stripped and the result is
/// `<media_url>/<bucket>/<path>`.
pub fn storage_url(media_url: &str, path: Option<&str>, bucket: Bucket) -> String {
    let path = match path {
        Some(p) if !p.is_empty() => p,
        _ => return String::new(),
    };
    if path.starts_with("http") || path.starts_with("blob:") {
        return path.to_string();
    }
    let clean = path.strip_prefix('/').unwrap_or(path);
    format!(
        "{}/{}/{}",
        media_url.trim_end_matches('/'),
        bucket.as_str(),
        clean
    )
}
