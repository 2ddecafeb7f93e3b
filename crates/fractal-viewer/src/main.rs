mod app;
mod config;

use anyhow::Result;

use fractal_engine::logging::init_logging;
use fractal_engine::window::Runtime;

use crate::app::FractalApp;
use crate::config::ViewerConfig;

fn main() -> Result<()> {
    let config = ViewerConfig::default();
    init_logging(config.logging.clone());

    log::info!(
        "controls: drag pan, wheel/space zoom, up/down mass, G grid, B blur, 3 shading, W mono, F11 fullscreen, Esc quit"
    );

    let app = FractalApp::new(&config);
    Runtime::run(config.window, config.gpu, app)
}
