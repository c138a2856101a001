//! Entry point for the yov text-to-speech desktop client.
#![cfg_attr(
    all(not(debug_assertions), target_os = "windows"),
    windows_subsystem = "windows"
)]
use eframe::egui;
use yov::egui_app::TtsController;
use yov::egui_app::ui::{EguiApp, MIN_VIEWPORT_SIZE};
use yov::logging::{self, LogDestination};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    match logging::init() {
        Ok(LogDestination::StdoutOnly(reason)) => eprintln!("File logging disabled: {reason}"),
        Ok(_) => {}
        Err(err) => eprintln!("Logging disabled: {err}"),
    }

    let viewport = egui::ViewportBuilder::default()
        .with_title("yov")
        .with_inner_size([720.0, 720.0])
        .with_min_inner_size(MIN_VIEWPORT_SIZE)
        .with_drag_and_drop(true);
    let native_options = eframe::NativeOptions {
        viewport,
        ..Default::default()
    };

    eframe::run_native(
        "yov",
        native_options,
        Box::new(|cc| {
            let controller = TtsController::from_config();
            Ok(Box::new(EguiApp::new(controller, &cc.egui_ctx)))
        }),
    )?;
    Ok(())
}
