mod app;

use app::FibonacciSpiralApp;
use fibonacci_spiral::config::SpiralSettings;

fn main() -> Result<(), eframe::Error> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    tracing::info!("Starting Fibonacci Spiral App");

    let settings = SpiralSettings::default();
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([settings.window_width, settings.window_height]),
        renderer: eframe::Renderer::Wgpu,
        ..Default::default()
    };

    eframe::run_native(
        "Fibonacci golden ratio approximation",
        options,
        Box::new(move |cc| Box::new(FibonacciSpiralApp::new(cc, settings))),
    )
}
