use std::future::Future;

use scraper::{Html, Selector};

use crate::fetcher::{FetchError, UrlFetcher};

/// Extracts the raw href values from a directory listing page, in document
/// order.
pub trait LinkScraper {
    fn scrape_links(
        &self,
        url: &str,
    ) -> impl Future<Output = Result<Vec<String>, FetchError>> + Send;
}

#[derive(Clone, Debug)]
pub struct IndexPage<T = reqwest::Client> {
    fetcher: T,
}

impl<T: UrlFetcher> IndexPage<T> {
    pub fn new(fetcher: T) -> Self {
        IndexPage { fetcher }
    }
}

impl<T: UrlFetcher + Send + Sync> LinkScraper for IndexPage<T> {
    #[tracing::instrument(skip(self))]
    fn scrape_links(
        &self,
        url: &str,
    ) -> impl Future<Output = Result<Vec<String>, FetchError>> + Send {
        async move {
            let text = self.fetcher.fetch_text(url).await?;
            let html = Html::parse_document(&text);
            let hrefs = html
                .select(&Selector::parse("a").unwrap())
                .filter_map(|a| a.attr("href"))
                .map(|href| href.to_string())
                .collect::<Vec<_>>();
            tracing::info!("Found {} links", hrefs.len());
            tracing::debug!("Links {:?}", hrefs);
            Ok(hrefs)
        }
    }
}
