mod app;
mod cli;
mod config;

use tracing_subscriber::EnvFilter;
use winit::event_loop::EventLoop;

fn main() {
    let args = cli::parse();

    // Initialize logging
    let log_directive = args.log_level.as_deref().unwrap_or("oriel=info");
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive(
                log_directive
                    .parse()
                    .unwrap_or_else(|_| "oriel=info".parse().unwrap()),
            ),
        )
        .init();

    tracing::info!("oriel v{} starting...", env!("CARGO_PKG_VERSION"));

    // Load config
    let config = config::AppConfig::load(args.config.as_deref()).unwrap_or_else(|e| {
        tracing::warn!("Config load failed, using defaults: {e}");
        config::AppConfig::default()
    });

    let window_opts = config.window_options().unwrap_or_else(|e| {
        tracing::warn!("Invalid window options, using defaults: {e}");
        Default::default()
    });

    // CLI overrides on top of the profile
    let mut webview_cfg = config.webview_config();
    if let Some(url) = args.url {
        webview_cfg.url = Some(url);
        webview_cfg.html = None;
    }
    if let Some(dir) = args.data_dir {
        webview_cfg.data_dir = Some(dir);
    }
    if args.devtools {
        webview_cfg.devtools = true;
    }
    if webview_cfg.url.is_none() && webview_cfg.html.is_none() {
        webview_cfg.html = Some(app::DEMO_HTML.to_string());
    }

    // Create event loop and run
    let event_loop = EventLoop::<app::WakeUp>::with_user_event()
        .build()
        .expect("failed to create event loop");
    let proxy = event_loop.create_proxy();
    let mut oriel = app::OrielApp::new(window_opts, webview_cfg, proxy);

    tracing::info!("Entering event loop");
    if let Err(e) = event_loop.run_app(&mut oriel) {
        tracing::error!("Event loop error: {e}");
    }
    tracing::info!("Shutdown complete");
}
