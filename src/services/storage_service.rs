use std::env;

const DEFAULT_BUCKET: &str = "images";

/// Rewrites relative storage paths into public object URLs. Catalog rows
/// store whatever was uploaded, which is sometimes a bare bucket path and
/// sometimes a full URL copied in by an admin.
#[derive(Debug, Clone)]
pub struct ImageUrlResolver {
    base_url: String,
    bucket: String,
}

impl ImageUrlResolver {
    pub fn new(base_url: impl Into<String>, bucket: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            bucket: bucket.into(),
        }
    }

    pub fn from_env() -> Self {
        let base_url = env::var("SUPABASE_URL").unwrap_or_default();
        let bucket = env::var("SUPABASE_STORAGE_BUCKET").unwrap_or_else(|_| DEFAULT_BUCKET.to_string());

        Self::new(base_url, bucket)
    }

    /// Absolute URLs pass through untouched; anything else is treated as a
    /// path inside the public bucket.
    pub fn resolve(&self, path: &str) -> String {
        if path.starts_with("http://") || path.starts_with("https://") {
            return path.to_string();
        }

        let trimmed = path.trim_start_matches('/');
        format!(
            "{}/storage/v1/object/public/{}/{}",
            self.base_url.trim_end_matches('/'),
            self.bucket,
            trimmed
        )
    }
}
