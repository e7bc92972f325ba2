//! Main application for the YouTube thumbnail downloader GUI

use eframe::egui;
use tokio::runtime::Runtime;

use thumbgrab::app::{visuals_for, ThumbnailApp};
use thumbgrab::config::{self, AppConfig};
use thumbgrab::logging;
use thumbgrab::preferences::{self, MemoryStore, PreferenceStore, TomlFileStore};
use thumbgrab::RUNTIME;

/// File-backed preferences, or in-memory ones if the file is unusable.
fn open_preference_store() -> Box<dyn PreferenceStore> {
    let opened = preferences::preferences_path()
        .and_then(|path| TomlFileStore::open(path).map_err(anyhow::Error::from));
    match opened {
        Ok(store) => {
            tracing::debug!("preferences at {}", store.path().display());
            Box::new(store)
        }
        Err(e) => {
            tracing::warn!("preferences will not persist: {e}");
            Box::new(MemoryStore::default())
        }
    }
}

/// Program entry point: sets up logging, config and runtime, then launches the GUI
fn main() -> anyhow::Result<()> {
    logging::init();

    let config = config::load_or_init().unwrap_or_else(|e| {
        tracing::warn!("using default config: {e}");
        AppConfig::default()
    });
    RUNTIME.get_or_try_init(Runtime::new)?;
    let store = open_preference_store();

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default().with_inner_size([1100.0, 780.0]),
        // Theme comes from the stored preference, not live system changes
        follow_system_theme: false,
        ..Default::default()
    };
    eframe::run_native(
        "YouTube Thumbnail Downloader",
        options,
        Box::new(move |cc| {
            let system_dark = cc.integration_info.system_theme == Some(eframe::Theme::Dark);
            let app = ThumbnailApp::new(config, store, system_dark);
            cc.egui_ctx.set_visuals(visuals_for(app.theme()));
            Box::new(app)
        }),
    )
    .map_err(|e| anyhow::anyhow!("GUI failed: {e}"))
}
