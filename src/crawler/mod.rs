use std::collections::HashSet;
use std::future::Future;
use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tokio::time::{sleep, Duration};
use tracing::warn;

use crate::config::Config;
use crate::crawler::models::PropertyRecord;

mod fetcher;
pub mod models;
pub mod parser;
pub mod service;

/// Runs `op` over every item with at most `workers` in flight, collecting
/// successful results in completion order. A failed or panicked item is
/// logged and skipped; nothing escapes the batch.
pub async fn dispatch<I, T, F, Fut>(items: Vec<I>, workers: usize, op: F) -> Vec<T>
where
    I: Send + 'static,
    T: Send + 'static,
    F: Fn(I) -> Fut + Clone + Send + 'static,
    Fut: Future<Output = Result<T>> + Send + 'static,
{
    let semaphore = Arc::new(Semaphore::new(workers.max(1)));
    let mut tasks = JoinSet::new();

    for item in items {
        let semaphore = Arc::clone(&semaphore);
        let op = op.clone();
        tasks.spawn(async move {
            let _permit = semaphore.acquire().await?;
            op(item).await
        });
    }

    let mut results = Vec::new();
    while let Some(joined) = tasks.join_next().await {
        match joined {
            Ok(Ok(value)) => results.push(value),
            Ok(Err(e)) => warn!(error = %e, "item failed, skipping"),
            Err(e) => warn!(error = %e, "worker panicked, skipping"),
        }
    }
    results
}

fn search_url(base_url: &str, page: u32) -> String {
    format!("{base_url}?countries=BE&priceType=SALE_PRICE&page={page}&orderBy=relevance")
}

/// Fans out over the configured page range and returns every listing URL
/// found, unfiltered. Order across pages is unspecified.
pub async fn collect_page_links(cfg: &Config) -> Vec<String> {
    let client = fetcher::build_client();
    let pages: Vec<u32> = (cfg.start_page..=cfg.end_page).collect();
    let base_url = cfg.base_url.clone();
    let delay_ms = cfg.delay_ms;

    let per_page = dispatch(pages, cfg.max_workers, move |page| {
        let client = client.clone();
        let url = search_url(&base_url, page);
        async move {
            if delay_ms > 0 {
                sleep(Duration::from_millis(delay_ms)).await;
            }
            let html = fetcher::fetch_html(&client, &url)
                .await
                .with_context(|| format!("fetching results page {page}"))?;
            Ok(parser::extract_listing_links(&html))
        }
    })
    .await;

    per_page.into_iter().flatten().collect()
}

/// Keeps the candidates that are neither project listings nor already known,
/// in original order. Project listings are rejected before the membership
/// test, so they never pass even when absent from the known set.
pub fn filter_new_links(candidates: &[String], known: &HashSet<String>) -> Vec<String> {
    candidates
        .iter()
        .filter(|link| !parser::is_project_listing(link))
        .filter(|link| !known.contains(link.trim()))
        .cloned()
        .collect()
}

/// Fans the full extraction pipeline out over the link set. Each worker
/// fetches one page, parses both embedded and table data, and normalizes
/// them into a record; failures and project listings produce no record.
pub async fn collect_properties(cfg: &Config, links: Vec<String>) -> Vec<PropertyRecord> {
    let client = fetcher::build_client();
    let delay_ms = cfg.delay_ms;

    let results = dispatch(links, cfg.max_workers, move |link| {
        let client = client.clone();
        async move {
            if parser::is_project_listing(&link) {
                return Ok(None);
            }
            if delay_ms > 0 {
                sleep(Duration::from_millis(delay_ms)).await;
            }
            let html = fetcher::fetch_html(&client, &link)
                .await
                .with_context(|| format!("fetching listing {link}"))?;
            let embedded = parser::parse_embedded_data(&html);
            let table = parser::parse_details_table(&html);
            Ok(Some(parser::build_record(&link, &embedded, &table)))
        }
    })
    .await;

    results.into_iter().flatten().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::bail;

    #[tokio::test]
    async fn dispatch_isolates_failures() {
        let items = vec![1, 2, 3, 4, 5];
        let results = dispatch(items, 2, |n| async move {
            if n % 2 == 0 {
                bail!("boom on {n}");
            }
            Ok(n * 10)
        })
        .await;

        let mut results = results;
        results.sort();
        assert_eq!(results, vec![10, 30, 50]);
    }

    #[tokio::test]
    async fn dispatch_survives_panics() {
        let results = dispatch(vec![1, 2, 3], 3, |n| async move {
            if n == 2 {
                panic!("worker died");
            }
            Ok(n)
        })
        .await;
        assert_eq!(results.len(), 2);
    }

    #[tokio::test]
    async fn dispatch_handles_empty_batch() {
        let results: Vec<u32> = dispatch(Vec::new(), 4, |n: u32| async move { Ok(n) }).await;
        assert!(results.is_empty());
    }

    #[test]
    fn search_url_is_one_based_template() {
        let url = search_url("https://example.be/en/search/house-and-apartment/for-sale", 1);
        assert!(url.contains("page=1"));
        assert!(url.contains("countries=BE"));
        assert!(url.contains("priceType=SALE_PRICE"));
    }

    #[test]
    fn filter_rejects_known_and_project_links() {
        let project =
            "https://x.be/en/classified/real-estate-project/for-sale/ghent/9000/1".to_string();
        let seen = "https://x.be/en/classified/house/for-sale/liege/4000/2".to_string();
        let fresh = "https://x.be/en/classified/house/for-sale/namur/5000/3".to_string();

        let known: HashSet<String> = [seen.clone()].into_iter().collect();
        let candidates = vec![project.clone(), seen, fresh.clone()];

        assert_eq!(filter_new_links(&candidates, &known), vec![fresh]);
    }

    #[test]
    fn filter_rejects_projects_even_when_already_known() {
        let project =
            "https://x.be/en/classified/real-estate-project/for-sale/ghent/9000/1".to_string();
        let known: HashSet<String> = [project.clone()].into_iter().collect();
        assert!(filter_new_links(&[project], &known).is_empty());
    }

    #[test]
    fn filter_is_idempotent_against_grown_set() {
        let fresh = "https://x.be/en/classified/house/for-sale/namur/5000/3".to_string();
        let candidates = vec![fresh.clone()];

        let known: HashSet<String> = HashSet::new();
        let accepted = filter_new_links(&candidates, &known);
        assert_eq!(accepted, vec![fresh.clone()]);

        // Second pass with the accepted links persisted: nothing new.
        let known: HashSet<String> = accepted.into_iter().collect();
        assert!(filter_new_links(&candidates, &known).is_empty());
    }
}
