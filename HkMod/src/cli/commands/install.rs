//! CLI command for installing catalog mods

use std::sync::Mutex;
use std::time::Instant;

use indicatif::ProgressBar;
use modlinks::cache::{ContentCache, FetchPhase, FetchProgress, select_link};
use modlinks::catalog::{Manifest, Platform};

use crate::cli::progress::{
    LOOKING_GLASS, PACKAGE, download_bar, is_terminal, print_done, print_step, simple_spinner,
};
use crate::config::Config;
use crate::operations::{InstallTarget, install};
use crate::transport::{HttpTransport, fetch_catalog};

pub fn execute(mods: &[String]) -> anyhow::Result<()> {
    let start = Instant::now();
    let config = Config::load();
    let mods_dir = config.mods_dir()?;
    let cache = ContentCache::new(config.cache_dir()?);
    let platform = Platform::current();
    let transport = HttpTransport::new()?;

    print_step(1, 2, LOOKING_GLASS, "Fetching catalog...");
    let pb = simple_spinner(&config.modlinks_url);
    let catalog = fetch_catalog(&transport, &config.modlinks_url);
    pb.finish_and_clear();
    let catalog = catalog?;

    print_step(2, 2, PACKAGE, "Installing mods...");
    let state = Mutex::new(DownloadState::default());
    let show_bars = is_terminal();
    let on_progress = |name: &str, progress: &FetchProgress| {
        if let Ok(mut state) = state.lock() {
            state.update(&catalog, platform, show_bars, name, progress);
        }
    };

    let report = install(
        &catalog,
        mods,
        InstallTarget {
            mods_dir: &mods_dir,
            cache: &cache,
            platform,
        },
        &transport,
        &on_progress,
    );
    if let Some(pb) = state.lock().ok().and_then(|mut state| state.bar.take()) {
        pb.finish_and_clear();
    }

    for err in &report.unresolved {
        println!("{err}");
    }
    if let Some(missing) = &report.missing {
        println!("{missing}");
    }
    for (name, result) in &report.results {
        match result {
            Ok(_) => {}
            // Already names the mod.
            Err(e @ crate::Error::UnsafeName { .. }) => println!("{e}"),
            Err(e) => println!("cannot install {name}: {e}"),
        }
    }

    let installed = report.installed().count();
    println!("  Installed {installed} of {} mods", report.results.len());
    print_done(start.elapsed());
    Ok(())
}

/// Which mod is being fetched, and its download bar if one is shown.
#[derive(Default)]
struct DownloadState {
    current: Option<String>,
    bar: Option<ProgressBar>,
}

impl DownloadState {
    fn update(
        &mut self,
        catalog: &[Manifest],
        platform: Option<Platform>,
        show_bars: bool,
        name: &str,
        progress: &FetchProgress,
    ) {
        if self.current.as_deref() != Some(name) {
            if let Some(pb) = self.bar.take() {
                pb.abandon();
            }
            self.current = Some(name.to_string());
        }

        match progress.phase {
            FetchPhase::CheckingCache => {}
            FetchPhase::CacheHit => println!("=> Installing {name} from cache"),
            FetchPhase::Downloading if progress.bytes == 0 => {
                let url = catalog
                    .iter()
                    .find(|m| m.name == name)
                    .and_then(|m| select_link(m, platform).ok())
                    .map_or("the network", |link| link.url.as_str());
                println!("=> Installing {name} from {url}");
                if show_bars {
                    self.bar = Some(download_bar(progress.total, name));
                }
            }
            FetchPhase::Downloading => {
                if let Some(pb) = &self.bar {
                    pb.set_position(progress.bytes);
                }
            }
            FetchPhase::Complete => {
                if let Some(pb) = self.bar.take() {
                    pb.finish_and_clear();
                }
            }
        }
    }
}
