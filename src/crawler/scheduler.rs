//! Round-based crawl scheduler
//!
//! The crawl proceeds in strictly sequential rounds. Each round takes
//! a snapshot of the registry, fans out one bounded worker per
//! unvisited link, and drains them all before deciding anything. A
//! worker fetches its page, localizes the page's assets, registers
//! newly discovered links, and marks its own link visited. After the
//! round drains, the unvisited count is recomputed over the full
//! registry (links discovered mid-round included); the crawl converges
//! when that count reaches zero, or aborts on the first fetch failure.

use crate::config::Config;
use crate::crawler::assets::{AssetLocalizer, PageProcessor};
use crate::crawler::fetcher::{build_http_client, fetch};
use crate::crawler::parser::{extract_new_links, parse_page};
use crate::state::LinkRegistry;
use crate::KagamiError;
use reqwest::Client;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use url::Url;

/// Per-round progress, exposed for external display
///
/// The scheduler itself performs no console I/O.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoundStats {
    /// 1-based round index
    pub round: usize,

    /// Total links known to the registry after the round
    pub known: usize,

    /// Links still unvisited after the round
    pub unvisited: usize,
}

/// Summary of a converged crawl
#[derive(Debug, Clone)]
pub struct CrawlReport {
    /// Stats for every completed round, in order
    pub rounds: Vec<RoundStats>,

    /// Pages visited over the whole crawl
    pub pages_visited: usize,
}

impl CrawlReport {
    /// Number of rounds the crawl took to converge
    pub fn round_count(&self) -> usize {
        self.rounds.len()
    }
}

/// Drives repeated rounds of parallel per-link work until a full round
/// discovers no unvisited link
pub struct CrawlScheduler {
    client: Client,
    registry: Arc<LinkRegistry>,
    localizer: Arc<AssetLocalizer>,
    root: PathBuf,
    page_permits: Arc<Semaphore>,
}

impl CrawlScheduler {
    /// Creates a scheduler mirroring into `root` with the given tuning
    pub fn new(config: &Config, root: PathBuf) -> Result<Self, KagamiError> {
        let client = build_http_client(&config.http)?;
        let localizer = Arc::new(AssetLocalizer::new(
            client.clone(),
            root.clone(),
            config.workers.asset_workers,
        ));

        Ok(Self {
            client,
            registry: Arc::new(LinkRegistry::new()),
            localizer,
            root,
            page_permits: Arc::new(Semaphore::new(config.workers.page_workers)),
        })
    }

    /// The registry owned by this crawl
    pub fn registry(&self) -> &Arc<LinkRegistry> {
        &self.registry
    }

    /// Runs the crawl to convergence or abort
    pub async fn run(&self, seed: &Url) -> Result<CrawlReport, KagamiError> {
        self.run_with_progress(seed, |_| {}).await
    }

    /// Runs the crawl, invoking `on_round` after every completed round.
    ///
    /// Terminates in exactly one of two ways: `Ok` once every known
    /// link has been visited (Converged), or the first worker error
    /// (Aborted). On abort, files already written remain on disk and
    /// no cleanup occurs.
    pub async fn run_with_progress<F>(
        &self,
        seed: &Url,
        mut on_round: F,
    ) -> Result<CrawlReport, KagamiError>
    where
        F: FnMut(&RoundStats),
    {
        if seed.scheme() != "http" && seed.scheme() != "https" {
            return Err(KagamiError::InvalidSeed(format!(
                "seed URL must be http(s), got scheme '{}'",
                seed.scheme()
            )));
        }

        self.registry.try_register(seed.as_str());
        tracing::info!("Starting crawl from {}", seed);

        let mut rounds = Vec::new();
        let mut round = 0;

        // The first round always runs; progress is only measured after
        // at least one full pass.
        loop {
            round += 1;
            self.run_round(round).await?;

            let stats = RoundStats {
                round,
                known: self.registry.len(),
                unvisited: self.registry.count_unvisited(),
            };
            tracing::info!(
                "Round {}: {} links known, {} unvisited",
                stats.round,
                stats.known,
                stats.unvisited
            );
            on_round(&stats);

            let converged = stats.unvisited == 0;
            rounds.push(stats);
            if converged {
                break;
            }
        }

        let pages_visited = self.registry.len();
        tracing::info!(
            "Crawl converged after {} rounds, {} pages visited",
            rounds.len(),
            pages_visited
        );

        Ok(CrawlReport {
            rounds,
            pages_visited,
        })
    }

    /// Fans out one worker per unvisited link in a registry snapshot
    /// and drains them all.
    ///
    /// In-flight siblings are never cancelled: on failure the round
    /// finishes draining, then the first error propagates and the
    /// crawl stops issuing new rounds.
    async fn run_round(&self, round: usize) -> Result<(), KagamiError> {
        let snapshot = self.registry.snapshot();
        let mut workers = JoinSet::new();

        for (url, state) in snapshot {
            if state.is_visited() {
                continue;
            }

            let url = Url::parse(&url)?;
            let client = self.client.clone();
            let registry = Arc::clone(&self.registry);
            let processor = PageProcessor::new(Arc::clone(&self.localizer), self.root.clone());
            let permits = Arc::clone(&self.page_permits);

            workers.spawn(async move {
                let _permit = permits.acquire_owned().await?;
                visit_link(&client, &processor, &registry, &url).await
            });
        }

        tracing::debug!("Round {}: dispatched {} workers", round, workers.len());

        let mut first_error: Option<KagamiError> = None;
        while let Some(joined) = workers.join_next().await {
            match joined {
                Ok(Ok(())) => {}
                Ok(Err(e)) if first_error.is_none() => first_error = Some(e),
                Ok(Err(e)) => tracing::debug!("Further worker failure: {}", e),
                Err(join_err) if first_error.is_none() => first_error = Some(join_err.into()),
                Err(join_err) => tracing::debug!("Worker panicked: {}", join_err),
            }
        }

        match first_error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}

/// One unit of work: fetch a page, localize its assets, register its
/// links, mark it visited.
///
/// A `FetchError` here is not caught locally; it surfaces to the
/// scheduler and terminates the entire crawl.
async fn visit_link(
    client: &Client,
    processor: &PageProcessor,
    registry: &LinkRegistry,
    url: &Url,
) -> Result<(), KagamiError> {
    // Cheap no-op if another path already visited this URL.
    if registry.is_visited(url.as_str()) {
        return Ok(());
    }

    tracing::debug!("Visiting {}", url);
    let body = fetch(client, url).await?;
    let body = String::from_utf8_lossy(&body).into_owned();
    let page = parse_page(&body);

    processor.process(url, &page).await?;

    for link in extract_new_links(&page.anchors, url, registry) {
        if registry.try_register(link.as_str()) {
            tracing::trace!("Discovered {}", link);
        }
    }

    registry.mark_visited(url.as_str());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn scheduler(root: &std::path::Path) -> CrawlScheduler {
        CrawlScheduler::new(&Config::default(), root.to_path_buf()).unwrap()
    }

    async fn mount_page(server: &MockServer, route: &str, body: String) {
        Mock::given(method("GET"))
            .and(path(route))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string(body)
                    .insert_header("content-type", "text/html"),
            )
            .mount(server)
            .await;
    }

    #[tokio::test]
    async fn rejects_non_http_seed() {
        let root = tempfile::tempdir().unwrap();
        let scheduler = scheduler(root.path());
        let seed = Url::parse("file:///etc/passwd").unwrap();
        let err = scheduler.run(&seed).await.unwrap_err();
        assert!(matches!(err, KagamiError::InvalidSeed(_)));
    }

    #[tokio::test]
    async fn single_page_converges_in_one_round() {
        let server = MockServer::start().await;
        mount_page(&server, "/index.html", "<html><body>leaf</body></html>".into()).await;

        let root = tempfile::tempdir().unwrap();
        let scheduler = scheduler(root.path());
        let seed = Url::parse(&format!("{}/index.html", server.uri())).unwrap();

        let report = scheduler.run(&seed).await.unwrap();
        assert_eq!(report.round_count(), 1);
        assert_eq!(report.pages_visited, 1);
        assert_eq!(scheduler.registry().count_unvisited(), 0);
        assert!(root.path().join("index.html").is_file());
    }

    #[tokio::test]
    async fn cycle_terminates() {
        let server = MockServer::start().await;
        mount_page(
            &server,
            "/a.html",
            format!(r#"<html><body><a href="{}/b.html">b</a></body></html>"#, server.uri()),
        )
        .await;
        mount_page(
            &server,
            "/b.html",
            format!(r#"<html><body><a href="{}/a.html">a</a></body></html>"#, server.uri()),
        )
        .await;

        let root = tempfile::tempdir().unwrap();
        let scheduler = scheduler(root.path());
        let seed = Url::parse(&format!("{}/a.html", server.uri())).unwrap();

        let report = scheduler.run(&seed).await.unwrap();
        assert_eq!(report.pages_visited, 2);
        assert_eq!(scheduler.registry().count_unvisited(), 0);
    }

    #[tokio::test]
    async fn failed_page_aborts_the_crawl() {
        let server = MockServer::start().await;
        mount_page(
            &server,
            "/index.html",
            format!(r#"<html><body><a href="{}/broken.html">x</a></body></html>"#, server.uri()),
        )
        .await;
        Mock::given(method("GET"))
            .and(path("/broken.html"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let root = tempfile::tempdir().unwrap();
        let scheduler = scheduler(root.path());
        let seed = Url::parse(&format!("{}/index.html", server.uri())).unwrap();

        let err = scheduler.run(&seed).await.unwrap_err();
        match err {
            KagamiError::Fetch(fetch_err) => {
                assert!(fetch_err.url().ends_with("/broken.html"));
                assert!(fetch_err.is_transient());
            }
            other => panic!("expected fetch error, got {:?}", other),
        }

        // Work done before the abort stays on disk.
        assert!(root.path().join("index.html").is_file());
    }

    #[tokio::test]
    async fn progress_callback_sees_every_round() {
        let server = MockServer::start().await;
        mount_page(
            &server,
            "/one.html",
            format!(r#"<html><body><a href="{}/two.html">2</a></body></html>"#, server.uri()),
        )
        .await;
        mount_page(&server, "/two.html", "<html><body>end</body></html>".into()).await;

        let root = tempfile::tempdir().unwrap();
        let scheduler = scheduler(root.path());
        let seed = Url::parse(&format!("{}/one.html", server.uri())).unwrap();

        let mut seen = Vec::new();
        let report = scheduler
            .run_with_progress(&seed, |stats| seen.push(*stats))
            .await
            .unwrap();

        assert_eq!(seen.len(), report.round_count());
        assert_eq!(seen.first().map(|s| s.round), Some(1));
        assert_eq!(seen.last().map(|s| s.unvisited), Some(0));
        // Known-link counts never shrink across rounds.
        assert!(seen.windows(2).all(|w| w[0].known <= w[1].known));
    }
}
