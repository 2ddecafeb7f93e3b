use winit::dpi::LogicalSize;

use fractal_engine::device::GpuInit;
use fractal_engine::driver::DriverConfig;
use fractal_engine::logging::LoggingConfig;
use fractal_engine::view::ViewConfig;
use fractal_engine::window::RuntimeConfig;

/// Everything the viewer is configured with at startup.
#[derive(Debug, Clone)]
pub struct ViewerConfig {
    pub logging: LoggingConfig,
    pub window: RuntimeConfig,
    pub gpu: GpuInit,
    pub view: ViewConfig,
    pub driver: DriverConfig,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            logging: LoggingConfig::default(),
            window: RuntimeConfig {
                title: "Fractal".to_string(),
                initial_size: LogicalSize::new(1280.0, 720.0),
                resizable: false,
            },
            gpu: GpuInit::default(),
            view: ViewConfig::default(),
            driver: DriverConfig::default(),
        }
    }
}
