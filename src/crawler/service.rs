use std::collections::HashSet;

use tracing::info;

use crate::config::Config;
use crate::crawler;
use crate::storage::links::LinkStore;
use crate::storage::records::RecordStore;

pub struct ScrapingService {
    cfg: Config,
    links: LinkStore,
    records: RecordStore,
}

impl ScrapingService {
    pub fn new(cfg: Config) -> Self {
        let links = LinkStore::new(&cfg.links_path);
        let records = RecordStore::new(&cfg.output_path);
        Self { cfg, links, records }
    }

    pub async fn run(&self) -> anyhow::Result<()> {
        info!(
            start_page = self.cfg.start_page,
            end_page = self.cfg.end_page,
            workers = self.cfg.max_workers,
            "Collecting listing links"
        );

        let discovered = crawler::collect_page_links(&self.cfg).await;
        info!(count = discovered.len(), "Collected candidate links");

        // Snapshot once, append once; no per-item writes.
        let existing = self.links.load()?;
        let known: HashSet<String> = existing.iter().cloned().collect();
        let accepted = crawler::filter_new_links(&discovered, &known);
        self.links.append(&accepted)?;
        info!(new_links = accepted.len(), "Appended new links");

        let all_links = self.links.load()?;
        info!(count = all_links.len(), "Extracting property records");

        let records = crawler::collect_properties(&self.cfg, all_links).await;
        info!(records = records.len(), "Extraction finished");

        self.records.write(&records)?;
        info!(path = %self.cfg.output_path.display(), "Wrote property data");
        Ok(())
    }
}
