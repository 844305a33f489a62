use std::path::PathBuf;

/// Pure string rewrite from remote URL to local path: the remote root prefix
/// becomes the local root, the elided segment is flattened out, and URLs
/// carrying the excluded marker in their sub-path are dropped entirely.
pub struct PathMapper {
    pub remote_root: String,
    pub local_root: PathBuf,
    pub elided_segment: &'static str,
    pub excluded_marker: &'static str,
}

impl PathMapper {
    pub fn map(&self, url: &str) -> Option<PathBuf> {
        let rel = url.strip_prefix(&self.remote_root)?;
        let rel = rel.replace(self.elided_segment, "");
        if rel.contains(self.excluded_marker) {
            return None;
        }
        let mut path = self.local_root.clone();
        for segment in rel.split('/').filter(|s| !s.is_empty()) {
            path.push(segment);
        }
        Some(path)
    }
}
