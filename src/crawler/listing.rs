use std::collections::HashSet;

#[derive(Debug, PartialEq)]
pub enum LinkKind {
    Directory,
    DataFile,
    Other,
}

/// Classify a raw href from a listing page. Directory links carry a trailing
/// slash; data files are recognised by extension; everything else (parent
/// links, index pages, readmes) is ignored.
pub fn classify(href: &str, extensions: &[&str]) -> LinkKind {
    if href.ends_with('/') {
        LinkKind::Directory
    } else if extensions.iter().any(|ext| href.ends_with(ext)) {
        LinkKind::DataFile
    } else {
        LinkKind::Other
    }
}

/// Everything the crawl discovered: directory URLs in first-visit order and
/// file URLs in discovery order.
#[derive(Debug, PartialEq)]
pub struct Listing {
    pub root: String,
    dirs: Vec<String>,
    seen: HashSet<String>,
    files: Vec<String>,
}

impl Listing {
    pub fn new(root: &str) -> Self {
        Listing {
            root: root.to_string(),
            dirs: Vec::new(),
            seen: HashSet::from([root.to_string()]),
            files: Vec::new(),
        }
    }

    /// Records a directory URL. Returns true the first time a URL is seen,
    /// false on any repeat (including the root itself).
    pub fn visit(&mut self, url: &str) -> bool {
        if self.seen.contains(url) {
            return false;
        }
        self.seen.insert(url.to_string());
        self.dirs.push(url.to_string());
        true
    }

    pub fn add_file(&mut self, url: String) {
        self.files.push(url);
    }

    pub fn dirs(&self) -> &[String] {
        &self.dirs
    }

    pub fn files(&self) -> &[String] {
        &self.files
    }
}
