//! Asset localization and per-page processing
//!
//! An asset (stylesheet, script, image) is localized by resolving its
//! reference to an absolute URL, mapping that URL to a path under the
//! output root, and fetching+writing it unless a file is already
//! present. Filesystem presence is the only "already downloaded"
//! signal; an existing file is trusted as complete, with no checksum
//! or re-validation.

use crate::crawler::fetcher::fetch;
use crate::crawler::parser::ParsedPage;
use crate::url::{is_persistable_page, local_path, resolve_reference};
use crate::KagamiError;
use reqwest::Client;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::fs;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use url::Url;

/// The asset classes a page can reference
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssetKind {
    /// `<link rel="stylesheet">` or `<link rel="shortcut ...">`
    Stylesheet,

    /// `<img src>`
    Image,

    /// `<script src>`
    Script,
}

/// Downloads assets into the mirror tree, once each
pub struct AssetLocalizer {
    client: Client,
    root: PathBuf,
    permits: Arc<Semaphore>,
}

impl AssetLocalizer {
    /// Creates a localizer writing under `root`, with at most
    /// `asset_workers` concurrent asset fetches across all pages
    pub fn new(client: Client, root: PathBuf, asset_workers: usize) -> Self {
        Self {
            client,
            root,
            permits: Arc::new(Semaphore::new(asset_workers)),
        }
    }

    /// Localizes one resource reference from a page.
    ///
    /// Script references are skipped entirely, before resolution, when
    /// empty or containing the literal substring "http". The substring
    /// check is meant to exclude externally hosted scripts; it also
    /// drops any local path containing "http".
    pub async fn localize(
        &self,
        base: &Url,
        reference: &str,
        kind: AssetKind,
    ) -> Result<(), KagamiError> {
        if kind == AssetKind::Script && (reference.is_empty() || reference.contains("http")) {
            tracing::debug!("Skipping script reference: {}", reference);
            return Ok(());
        }

        let absolute = match resolve_reference(base, reference) {
            Some(url) => url,
            None => {
                tracing::debug!("Skipping unresolvable reference: {}", reference);
                return Ok(());
            }
        };

        let target = local_path(&self.root, &absolute);

        // Idempotent skip: a file at the target path is complete.
        if fs::metadata(&target).await.is_ok() {
            tracing::trace!("Already localized: {}", absolute);
            return Ok(());
        }

        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent).await?;
        }

        let _permit = self.permits.acquire().await?;

        tracing::debug!("Localizing {:?} {} -> {}", kind, absolute, target.display());
        let body = fetch(&self.client, &absolute).await?;
        fs::write(&target, body).await?;

        Ok(())
    }
}

/// Orchestrates localization of everything one parsed page references
pub struct PageProcessor {
    localizer: Arc<AssetLocalizer>,
    root: PathBuf,
}

impl PageProcessor {
    pub fn new(localizer: Arc<AssetLocalizer>, root: PathBuf) -> Self {
        Self { localizer, root }
    }

    /// Writes the page's own HTML and localizes its assets.
    ///
    /// The HTML is persisted only when the URL path ends in the
    /// literal suffix "html"; other pages are crawled for links but
    /// never written. Stylesheets and scripts are localized in turn;
    /// images fan out one worker per reference, bounded by the
    /// asset-tier semaphore.
    pub async fn process(&self, url: &Url, page: &ParsedPage) -> Result<(), KagamiError> {
        if is_persistable_page(url) {
            let target = local_path(&self.root, url);
            if let Some(parent) = target.parent() {
                fs::create_dir_all(parent).await?;
            }
            fs::write(&target, &page.html).await?;
            tracing::debug!("Wrote page {} -> {}", url, target.display());
        }

        for href in &page.stylesheets {
            self.localizer
                .localize(url, href, AssetKind::Stylesheet)
                .await?;
        }

        let mut images = JoinSet::new();
        for src in page.images.iter().cloned() {
            let localizer = Arc::clone(&self.localizer);
            let base = url.clone();
            images.spawn(async move { localizer.localize(&base, &src, AssetKind::Image).await });
        }

        let mut first_error = None;
        while let Some(joined) = images.join_next().await {
            match joined {
                Ok(Ok(())) => {}
                Ok(Err(e)) if first_error.is_none() => first_error = Some(e),
                Ok(Err(e)) => tracing::debug!("Further image failure: {}", e),
                Err(join_err) if first_error.is_none() => first_error = Some(join_err.into()),
                Err(join_err) => tracing::debug!("Image worker panicked: {}", join_err),
            }
        }
        if let Some(e) = first_error {
            return Err(e);
        }

        for src in &page.scripts {
            self.localizer.localize(url, src, AssetKind::Script).await?;
        }

        Ok(())
    }
}
