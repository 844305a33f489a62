use crate::fetcher::FetchError;
use crate::index_scraper::LinkScraper;

mod listing;

pub use listing::{classify, LinkKind, Listing};

/// Walks the directory listing graph with an explicit work stack
/// (depth-first) instead of recursing per page, so traversal depth never
/// touches the call stack.
pub struct Crawler<T: LinkScraper> {
    pub scraper: T,
    pub extensions: &'static [&'static str],
}

impl<T: LinkScraper> Crawler<T> {
    #[tracing::instrument(skip(self))]
    pub async fn crawl(&self, root: &str) -> Result<Listing, FetchError> {
        tracing::info!("Beginning crawl");
        let mut listing = Listing::new(root);
        let mut pending = vec![root.to_string()];

        while let Some(site) = pending.pop() {
            let hrefs = match self.scraper.scrape_links(&site).await {
                Ok(hrefs) => hrefs,
                Err(FetchError::Status(code)) => {
                    // An error page carries no listing; skip the directory
                    // rather than abort the whole crawl.
                    tracing::warn!("status {} at {}, skipping directory", code, site);
                    continue;
                }
                Err(err) => return Err(err),
            };
            for href in hrefs {
                // Listing pages link relative to the directory they index.
                // Parent, absolute and cross-host links fall outside the
                // tree being mirrored.
                if href.starts_with('/') || href.starts_with('.') || href.starts_with("http") {
                    tracing::debug!("Ignoring non-relative link {:?}", href);
                    continue;
                }
                match classify(&href, self.extensions) {
                    LinkKind::Directory => {
                        let subsite = format!("{site}{href}");
                        if listing.visit(&subsite) {
                            pending.push(subsite);
                        }
                    }
                    LinkKind::DataFile => listing.add_file(format!("{site}{href}")),
                    LinkKind::Other => {}
                }
            }
        }

        tracing::info!(
            "Finished crawl: {} directories, {} files",
            listing.dirs().len(),
            listing.files().len()
        );
        Ok(listing)
    }
}
