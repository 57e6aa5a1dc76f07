use astar_clock::ClockApp;
use astar_engine::logging::LoggingConfig;

fn main() {
    // Startup banner, printed before the window opens.
    println!();
    println!("  ╔════════════════════════════════════════╗");
    println!("  ║         ASTAR ANALOG CLOCK v0.1        ║");
    println!("  ╠════════════════════════════════════════╣");
    println!("  ║  L / D / A   theme light, dark, auto   ║");
    println!("  ║  1 / 2 / 3   numerals 12, XII, none    ║");
    println!("  ║  S           smooth seconds on/off     ║");
    println!("  ║  M           minor ticks on/off        ║");
    println!("  ║  Esc / Q     close                     ║");
    println!("  ╚════════════════════════════════════════╝");
    println!();

    let result = ClockApp::new()
        .title("Analog Clock")
        .size(480.0, 480.0)
        .font(load_font())
        .logging(LoggingConfig::default())
        .run();

    if let Err(e) = result {
        log::error!("clock exited with error: {e:#}");
        eprintln!("astar runtime error: {e:#}");
        std::process::exit(1);
    }
}

fn load_font() -> Vec<u8> {
    [
        "/usr/share/fonts/TTF/DejaVuSans.ttf",
        "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
        "/usr/share/fonts/dejavu/DejaVuSans.ttf",
        "/usr/share/fonts/noto/NotoSans-Regular.ttf",
        "/usr/share/fonts/truetype/noto/NotoSans-Regular.ttf",
    ]
    .iter()
    .find_map(|p| std::fs::read(p).ok())
    .unwrap_or_default()
}
