mod api;
mod app;
mod event;
mod format;
mod history;
mod theme;
mod ui;

use app::BlogBotApp;
use eframe::egui;
use std::sync::mpsc;
use theme::Theme;
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("blogbot=info")),
        )
        .init();

    let (tx, rx) = mpsc::channel();

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .thread_name("blogbot-runtime")
        .build()?;

    let api = runtime.block_on(async { api::ApiClient::new(api::BASE_URL, tx) })?;

    let app = BlogBotApp::new(rx, api);
    // The runtime must outlive the UI loop so in-flight requests can finish.
    let _runtime = runtime;

    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 800.0])
            .with_min_inner_size([1024.0, 640.0]),
        ..Default::default()
    };

    eframe::run_native(
        "BlogBot",
        native_options,
        Box::new(move |creation_context| {
            Theme::default().apply_visuals(&creation_context.egui_ctx);
            Ok(Box::new(app))
        }),
    )?;

    Ok(())
}
