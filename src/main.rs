use eframe::egui;
use lipid_panda::app::LipidPandaApp;
use lipid_panda::config::ExplorerConfig;

fn main() -> eframe::Result {
    env_logger::init();

    let config = ExplorerConfig::from_env();

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1400.0, 900.0])
            .with_min_inner_size([700.0, 450.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Lipid Panda – Class Explorer",
        options,
        Box::new(|_cc| Ok(Box::new(LipidPandaApp::new(config)))),
    )
}
