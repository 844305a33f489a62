use std::path::PathBuf;
use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};
use thiserror::Error;
use tokio::time::sleep;

use crate::crawler::Listing;
use crate::fetcher::{FetchError, UrlFetcher};

mod path_map;
mod report;

pub use path_map::PathMapper;
pub use report::{FailedDownload, MirrorReport};

#[derive(Error, Debug, Clone, PartialEq)]
pub enum DownloadError {
    #[error(transparent)]
    Fetch(#[from] FetchError),
    #[error("write failed: {0}")]
    Write(String),
}

#[derive(Error, Debug)]
pub enum MirrorError {
    #[error("could not create {path}: {source}")]
    CreateDir {
        path: PathBuf,
        source: std::io::Error,
    },
}

enum Outcome {
    Written,
    Excluded,
}

/// Recreates the crawled tree on disk and downloads every file into it,
/// strictly one at a time. Failed downloads get a cooldown and one retry in
/// a second pass over the whole failure list.
pub struct Mirror<T: UrlFetcher> {
    pub fetcher: T,
    pub mapper: PathMapper,
    pub cooldown: Duration,
}

impl<T: UrlFetcher> Mirror<T> {
    #[tracing::instrument(skip_all)]
    pub async fn run(&self, listing: &Listing) -> Result<MirrorReport, MirrorError> {
        println!("Creating folder architecture");
        self.materialize_dirs(listing)?;

        let mut report = MirrorReport::new();

        println!("Downloading data");
        let bar = progress_bar(listing.files().len() as u64);
        for url in listing.files() {
            match self.download_one(url).await {
                Ok(Outcome::Written) => report.downloaded += 1,
                Ok(Outcome::Excluded) => report.skipped += 1,
                Err(error) => {
                    tracing::warn!("download failed, will retry: {} ({})", url, error);
                    report.record_failure(url.clone(), error);
                    sleep(self.cooldown).await;
                }
            }
            bar.inc(1);
        }
        bar.finish();

        let failed = report.take_failures();
        if !failed.is_empty() {
            tracing::info!("Retrying {} failed downloads", failed.len());
            let bar = progress_bar(failed.len() as u64);
            for fail in failed {
                match self.download_one(&fail.url).await {
                    Ok(Outcome::Written) => report.recovered += 1,
                    Ok(Outcome::Excluded) => report.skipped += 1,
                    Err(error) => {
                        tracing::warn!("giving up on {} ({})", fail.url, error);
                        report.record_failure(fail.url, error);
                    }
                }
                bar.inc(1);
            }
            bar.finish();
        }

        report.finish();
        Ok(report)
    }

    fn materialize_dirs(&self, listing: &Listing) -> Result<(), MirrorError> {
        create_dir(self.mapper.local_root.clone())?;
        for dir in listing.dirs() {
            // The elided top-level container flattens to its parent and must
            // not become a literal directory.
            if dir.ends_with(self.mapper.elided_segment) {
                continue;
            }
            if let Some(path) = self.mapper.map(dir) {
                create_dir(path)?;
            }
        }
        Ok(())
    }

    async fn download_one(&self, url: &str) -> Result<Outcome, DownloadError> {
        let Some(path) = self.mapper.map(url) else {
            tracing::debug!("Excluded from mirror: {}", url);
            return Ok(Outcome::Excluded);
        };
        let bytes = self.fetcher.fetch_bytes(url).await?;
        tokio::fs::write(&path, &bytes)
            .await
            .map_err(|err| DownloadError::Write(err.to_string()))?;
        Ok(Outcome::Written)
    }
}

fn create_dir(path: PathBuf) -> Result<(), MirrorError> {
    std::fs::create_dir_all(&path).map_err(|source| MirrorError::CreateDir { path, source })
}

fn progress_bar(len: u64) -> ProgressBar {
    let bar = ProgressBar::new(len);
    bar.set_style(
        ProgressStyle::default_bar()
            .template("{bar:40} {pos}/{len} ({eta})")
            .unwrap()
            .progress_chars("=>-"),
    );
    bar
}

#[cfg(test)]
mod tests {
    use std::collections::{HashMap, VecDeque};
    use std::path::Path;
    use std::sync::{Arc, Mutex};

    use super::*;

    type Bytes = Result<Vec<u8>, FetchError>;

    #[derive(Debug, Clone)]
    pub enum Responses {
        Always(Bytes),
        Exhaustable(VecDeque<Bytes>),
    }

    #[derive(Clone)]
    pub struct MockFetcher {
        files: Arc<Mutex<HashMap<String, Responses>>>,
    }

    impl MockFetcher {
        pub fn new(files: HashMap<String, Responses>) -> Self {
            MockFetcher {
                files: Arc::new(Mutex::new(files)),
            }
        }
    }

    impl UrlFetcher for MockFetcher {
        async fn fetch_text(&self, _url: &str) -> Result<String, FetchError> {
            unimplemented!("the mirror only fetches bytes")
        }

        async fn fetch_bytes(&self, url: &str) -> Bytes {
            match self.files.lock().unwrap().get_mut(url) {
                Some(Responses::Always(resp)) => resp.clone(),
                Some(Responses::Exhaustable(queue)) => match queue.pop_front() {
                    Some(resp) => resp,
                    None => Err(FetchError::Status(404)),
                },
                None => Err(FetchError::Status(404)),
            }
        }
    }

    fn mirror(fetcher: MockFetcher, root: &str, dest: &Path) -> Mirror<MockFetcher> {
        Mirror {
            fetcher,
            mapper: PathMapper {
                remote_root: root.to_string(),
                local_root: dest.to_path_buf(),
                elided_segment: "DRLL/",
                excluded_marker: "ftp",
            },
            cooldown: Duration::ZERO,
        }
    }

    fn listing(root: &str, dirs: &[&str], files: &[&str]) -> Listing {
        let mut listing = Listing::new(root);
        for dir in dirs {
            listing.visit(&format!("{root}{dir}"));
        }
        for file in files {
            listing.add_file(format!("{root}{file}"));
        }
        listing
    }

    #[tokio::test]
    async fn mirrors_files_into_the_mapped_tree() {
        let root = "https://example.com/root/";
        let fetcher = MockFetcher::new(HashMap::from([
            (
                format!("{root}root.tif"),
                Responses::Always(Ok(b"root bytes".to_vec())),
            ),
            (
                format!("{root}a/cube.nc"),
                Responses::Always(Ok(b"cube bytes".to_vec())),
            ),
        ]));
        let dest = tempfile::tempdir().unwrap();
        let mirror = mirror(fetcher, root, dest.path());

        let listing = listing(root, &["a/"], &["root.tif", "a/cube.nc"]);
        let report = mirror.run(&listing).await.unwrap();

        assert_eq!(report.downloaded, 2);
        assert!(report.failed.is_empty());
        assert_eq!(
            std::fs::read(dest.path().join("root.tif")).unwrap(),
            b"root bytes"
        );
        assert_eq!(
            std::fs::read(dest.path().join("a").join("cube.nc")).unwrap(),
            b"cube bytes"
        );
    }

    #[tokio::test]
    async fn retry_pass_recovers_a_transient_failure() {
        let root = "https://example.com/root/";
        let fetcher = MockFetcher::new(HashMap::from([(
            format!("{root}a/field.tif"),
            Responses::Exhaustable(VecDeque::from([
                Err(FetchError::Request("connection reset".to_string())),
                Ok(b"field bytes".to_vec()),
            ])),
        )]));
        let dest = tempfile::tempdir().unwrap();
        let mirror = mirror(fetcher, root, dest.path());

        let listing = listing(root, &["a/"], &["a/field.tif"]);
        let report = mirror.run(&listing).await.unwrap();

        assert_eq!(report.downloaded, 0);
        assert_eq!(report.recovered, 1);
        assert!(report.failed.is_empty());
        assert_eq!(
            std::fs::read(dest.path().join("a").join("field.tif")).unwrap(),
            b"field bytes"
        );
    }

    #[tokio::test]
    async fn permanent_failure_is_reported_and_left_absent() {
        let root = "https://example.com/root/";
        let fetcher = MockFetcher::new(HashMap::from([(
            format!("{root}gone.tif"),
            Responses::Always(Err(FetchError::Status(500))),
        )]));
        let dest = tempfile::tempdir().unwrap();
        let mirror = mirror(fetcher, root, dest.path());

        let listing = listing(root, &[], &["gone.tif"]);
        let report = mirror.run(&listing).await.unwrap();

        assert_eq!(report.downloaded, 0);
        assert_eq!(
            report.failed,
            vec![FailedDownload {
                url: format!("{root}gone.tif"),
                error: DownloadError::Fetch(FetchError::Status(500)),
            }]
        );
        assert!(!dest.path().join("gone.tif").exists());
    }

    #[tokio::test]
    async fn excluded_urls_are_skipped_without_failing() {
        let root = "https://example.com/root/";
        let fetcher = MockFetcher::new(HashMap::new());
        let dest = tempfile::tempdir().unwrap();
        let mirror = mirror(fetcher, root, dest.path());

        let listing = listing(root, &[], &["ftp-internal/secret.tif"]);
        let report = mirror.run(&listing).await.unwrap();

        assert_eq!(report.skipped, 1);
        assert!(report.failed.is_empty());
    }

    #[tokio::test]
    async fn directory_creation_is_idempotent() {
        let root = "https://example.com/root/";
        let fetcher = MockFetcher::new(HashMap::new());
        let dest = tempfile::tempdir().unwrap();
        let mirror = mirror(fetcher, root, dest.path());

        let listing = listing(root, &["a/", "a/b/"], &[]);
        mirror.materialize_dirs(&listing).unwrap();
        mirror.materialize_dirs(&listing).unwrap();

        assert!(dest.path().join("a").join("b").is_dir());
    }

    #[tokio::test]
    async fn elided_container_does_not_become_a_directory() {
        let root = "https://example.com/root/";
        let fetcher = MockFetcher::new(HashMap::new());
        let dest = tempfile::tempdir().unwrap();
        let mirror = mirror(fetcher, root, dest.path());

        let listing = listing(root, &["DRLL/", "a/"], &[]);
        mirror.materialize_dirs(&listing).unwrap();

        assert!(!dest.path().join("DRLL").exists());
        assert!(dest.path().join("a").is_dir());
    }
}
