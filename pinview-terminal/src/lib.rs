/// Terminal frontend: crossterm event loop with mouse-drag input
use crossterm::{
    cursor,
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, MouseButton,
        MouseEvent, MouseEventKind,
    },
    execute, queue,
    style::{Color, Print, ResetColor, SetForegroundColor},
    terminal::{self},
};
use std::io::{self, stdout, Write};
use std::time::{Duration, Instant};

use pinview_core::{DragSession, Scene};

pub mod renderer;

pub use renderer::CellRenderer;

/// Main application struct for the terminal visualization
pub struct TerminalApp {
    scene: Scene,
    renderer: CellRenderer,
    drag: Option<DragSession>,
    notice: Option<String>,
    running: bool,
    last_frame: Instant,
    frame_count: u32,
    fps: f32,
}

impl TerminalApp {
    pub fn new(scene: Scene) -> io::Result<Self> {
        let (width, height) = terminal::size()?;
        let renderer = CellRenderer::new(width as usize, height as usize, scene.bounds());

        Ok(Self {
            scene,
            renderer,
            drag: None,
            notice: None,
            running: true,
            last_frame: Instant::now(),
            frame_count: 0,
            fps: 0.0,
        })
    }

    pub fn run(&mut self) -> io::Result<()> {
        terminal::enable_raw_mode()?;
        execute!(
            stdout(),
            terminal::EnterAlternateScreen,
            EnableMouseCapture,
            cursor::Hide
        )?;

        let result = self.main_loop();

        // Cleanup
        terminal::disable_raw_mode()?;
        execute!(
            stdout(),
            DisableMouseCapture,
            terminal::LeaveAlternateScreen,
            cursor::Show
        )?;

        result
    }

    fn main_loop(&mut self) -> io::Result<()> {
        let target_frame_time = Duration::from_millis(1000 / 30); // 30 FPS target

        while self.running {
            let frame_start = Instant::now();

            // Drain all pending input; a drag burst delivers many events per
            // frame.
            while event::poll(Duration::from_millis(0))? {
                self.handle_event()?;
            }

            // Render
            self.render()?;

            // Frame timing
            self.frame_count += 1;
            let elapsed = frame_start.elapsed();
            if elapsed < target_frame_time {
                std::thread::sleep(target_frame_time - elapsed);
            }

            // Update FPS counter
            let now = Instant::now();
            if (now - self.last_frame).as_secs() >= 1 {
                self.fps = self.frame_count as f32 / (now - self.last_frame).as_secs_f32();
                self.frame_count = 0;
                self.last_frame = now;
            }
        }

        Ok(())
    }

    fn handle_event(&mut self) -> io::Result<()> {
        match event::read()? {
            Event::Key(KeyEvent { code, .. }) => match code {
                KeyCode::Char('q') | KeyCode::Esc => {
                    self.running = false;
                }
                _ => {}
            },
            Event::Mouse(MouseEvent {
                kind, column, row, ..
            }) => {
                let pointer = self.renderer.cell_to_world(column, row);
                match kind {
                    MouseEventKind::Down(MouseButton::Left) => {
                        self.drag = DragSession::begin(&self.scene, pointer);
                        self.notice = None;
                    }
                    MouseEventKind::Drag(MouseButton::Left) => {
                        if let Some(drag) = self.drag {
                            match drag.apply(&mut self.scene, pointer) {
                                Ok(_) => self.notice = None,
                                Err(err) => self.notice = Some(err.to_string()),
                            }
                        }
                    }
                    MouseEventKind::Up(_) => {
                        self.drag = None;
                    }
                    _ => {}
                }
            }
            Event::Resize(width, height) => {
                self.renderer =
                    CellRenderer::new(width as usize, height as usize, self.scene.bounds());
            }
            _ => {}
        }
        Ok(())
    }

    fn render(&mut self) -> io::Result<()> {
        // Clear renderer
        self.renderer.clear();

        // Rasterize the scene; objects that fail to project are already
        // skipped by the frame.
        let frame = self.scene.frame();
        self.renderer.render_scene(&self.scene, &frame);

        // Output to terminal
        let mut stdout = stdout();
        queue!(stdout, cursor::MoveTo(0, 0))?;

        self.renderer.draw(&mut stdout)?;

        // Draw UI overlay
        let status = match &self.notice {
            Some(notice) => format!(
                "Pinview | FPS: {:.1} | Drag balls with the mouse, Q=Quit | {}",
                self.fps, notice
            ),
            None => format!(
                "Pinview | FPS: {:.1} | Drag balls with the mouse, Q=Quit",
                self.fps
            ),
        };
        queue!(
            stdout,
            cursor::MoveTo(0, 0),
            SetForegroundColor(Color::Yellow),
            Print(status),
            ResetColor
        )?;

        stdout.flush()?;
        Ok(())
    }
}
