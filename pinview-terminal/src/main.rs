/// Pinview Terminal Demo - Pinhole Projection Playground
///
/// Drag the colored balls with the mouse and watch their viewing cones and
/// 1D screen images follow.
/// Controls:
///   - Mouse drag: Move a ball
///   - Q/ESC: Quit

use std::io;
use pinview_core::Scene;
use pinview_terminal::TerminalApp;

fn main() -> io::Result<()> {
    println!("Pinview Terminal - Loading...");

    let scene = Scene::demo();

    println!("Starting terminal renderer (press Q to quit)...");
    std::thread::sleep(std::time::Duration::from_secs(1));

    // Run the terminal app
    let mut app = TerminalApp::new(scene)?;
    app.run()?;

    println!("Thank you for using Pinview!");
    Ok(())
}
