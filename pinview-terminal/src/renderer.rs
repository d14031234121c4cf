/// Cell rasterizer for terminal rendering
use crossterm::{
    style::{Color, Print, ResetColor, SetForegroundColor},
    QueueableCommand,
};
use nalgebra::Point2;
use std::io::Write;

use pinview_core::{Bounds, ObjectView, Scene};

/// Renderer that rasterizes the scene into a grid of colored characters.
///
/// World coordinates span the scene bounds; the x and y scales differ so the
/// full canvas always fits the terminal.
pub struct CellRenderer {
    width: usize,
    height: usize,
    sx: f64,
    sy: f64,
    char_buffer: Vec<char>,
    color_buffer: Vec<Color>,
}

impl CellRenderer {
    pub fn new(width: usize, height: usize, bounds: &Bounds) -> Self {
        let size = width * height;
        Self {
            width,
            height,
            sx: width as f64 / bounds.width,
            sy: height as f64 / bounds.height,
            char_buffer: vec![' '; size],
            color_buffer: vec![Color::Reset; size],
        }
    }

    pub fn clear(&mut self) {
        for i in 0..self.char_buffer.len() {
            self.char_buffer[i] = ' ';
            self.color_buffer[i] = Color::Reset;
        }
    }

    /// Center of a terminal cell in world coordinates; used to interpret
    /// mouse positions.
    pub fn cell_to_world(&self, column: u16, row: u16) -> Point2<f64> {
        Point2::new(
            (column as f64 + 0.5) / self.sx,
            (row as f64 + 0.5) / self.sy,
        )
    }

    fn world_to_cell(&self, p: Point2<f64>) -> (f64, f64) {
        (p.x * self.sx, p.y * self.sy)
    }

    /// Rasterize one frame: viewing cones below, then the screen line and
    /// image segments, then the balls and the camera glyph on top.
    pub fn render_scene(&mut self, scene: &Scene, frame: &[ObjectView]) {
        for view in frame {
            let apex = self.world_to_cell(view.cone.apex);
            let t1 = self.world_to_cell(view.cone.tangent1);
            let t2 = self.world_to_cell(view.cone.tangent2);
            self.fill_triangle(apex, t1, t2, '.', cell_color(view.object.color));
        }

        let screen = *scene.screen();
        self.fill_hline(screen.left(), screen.right(), screen.y(), '-', Color::DarkGrey);

        for view in frame {
            if view.image.visible {
                self.fill_hline(
                    view.image.x1,
                    view.image.x2,
                    screen.y(),
                    '=',
                    cell_color(view.object.color),
                );
            }
        }

        for view in frame {
            self.fill_circle(
                view.object.position,
                view.object.radius,
                '@',
                cell_color(view.object.color),
            );
        }

        let camera = *scene.camera();
        self.fill_circle(camera.position, camera.radius, '#', Color::White);

        // Labels, placed to the right of their glyphs
        let camera_label = Point2::new(camera.position.x + camera.radius + 20.0, camera.position.y);
        self.draw_text(camera_label, "camera", Color::Grey);
        let screen_label = Point2::new(screen.right() + 20.0, screen.y());
        self.draw_text(screen_label, "screen", Color::Grey);
    }

    fn set(&mut self, col: i32, row: i32, ch: char, color: Color) {
        if col < 0 || row < 0 || col >= self.width as i32 || row >= self.height as i32 {
            return;
        }
        let idx = row as usize * self.width + col as usize;
        self.char_buffer[idx] = ch;
        self.color_buffer[idx] = color;
    }

    fn fill_triangle(&mut self, v0: (f64, f64), v1: (f64, f64), v2: (f64, f64), ch: char, color: Color) {
        // Bounding box, clipped to the cell grid
        let min_x = (v0.0.min(v1.0).min(v2.0).floor() as i32).max(0);
        let max_x = (v0.0.max(v1.0).max(v2.0).ceil() as i32).min(self.width as i32 - 1);
        let min_y = (v0.1.min(v1.1).min(v2.1).floor() as i32).max(0);
        let max_y = (v0.1.max(v1.1).max(v2.1).ceil() as i32).min(self.height as i32 - 1);

        // Scanline rasterization over cell centers
        for y in min_y..=max_y {
            for x in min_x..=max_x {
                let p = (x as f64 + 0.5, y as f64 + 0.5);
                if let Some((w0, w1, w2)) = barycentric(v0, v1, v2, p) {
                    if w0 >= 0.0 && w1 >= 0.0 && w2 >= 0.0 {
                        self.set(x, y, ch, color);
                    }
                }
            }
        }
    }

    fn fill_circle(&mut self, center: Point2<f64>, radius: f64, ch: char, color: Color) {
        let (cx, cy) = self.world_to_cell(center);
        // Terminal cells are not square; keep at least one cell per axis so
        // small glyphs stay visible.
        let rx = (radius * self.sx).max(0.5);
        let ry = (radius * self.sy).max(0.5);

        let min_x = ((cx - rx).floor() as i32).max(0);
        let max_x = ((cx + rx).ceil() as i32).min(self.width as i32 - 1);
        let min_y = ((cy - ry).floor() as i32).max(0);
        let max_y = ((cy + ry).ceil() as i32).min(self.height as i32 - 1);

        for y in min_y..=max_y {
            for x in min_x..=max_x {
                let dx = (x as f64 + 0.5 - cx) / rx;
                let dy = (y as f64 + 0.5 - cy) / ry;
                if dx * dx + dy * dy <= 1.0 {
                    self.set(x, y, ch, color);
                }
            }
        }
    }

    fn fill_hline(&mut self, x1: f64, x2: f64, y: f64, ch: char, color: Color) {
        let (lo, hi) = if x1 <= x2 { (x1, x2) } else { (x2, x1) };
        let row = (y * self.sy) as i32;
        let start = (lo * self.sx).round() as i32;
        let end = (hi * self.sx).round() as i32;
        for col in start..=end {
            self.set(col, row, ch, color);
        }
    }

    fn draw_text(&mut self, at: Point2<f64>, text: &str, color: Color) {
        let (col, row) = self.world_to_cell(at);
        for (i, ch) in text.chars().enumerate() {
            self.set(col as i32 + i as i32, row as i32, ch, color);
        }
    }

    pub fn draw<W: Write>(&self, writer: &mut W) -> std::io::Result<()> {
        for y in 0..self.height {
            for x in 0..self.width {
                let idx = y * self.width + x;
                writer.queue(SetForegroundColor(self.color_buffer[idx]))?;
                writer.queue(Print(self.char_buffer[idx]))?;
            }
            writer.queue(Print('\n'))?;
        }
        writer.queue(ResetColor)?;
        Ok(())
    }
}

fn cell_color(color: pinview_core::Color) -> Color {
    Color::Rgb {
        r: color.r,
        g: color.g,
        b: color.b,
    }
}

/// Calculate barycentric coordinates for a point in a triangle
fn barycentric(
    v0: (f64, f64),
    v1: (f64, f64),
    v2: (f64, f64),
    p: (f64, f64),
) -> Option<(f64, f64, f64)> {
    let denom = (v1.1 - v2.1) * (v0.0 - v2.0) + (v2.0 - v1.0) * (v0.1 - v2.1);

    if denom.abs() < 1e-9 {
        return None;
    }

    let w0 = ((v1.1 - v2.1) * (p.0 - v2.0) + (v2.0 - v1.0) * (p.1 - v2.1)) / denom;
    let w1 = ((v2.1 - v0.1) * (p.0 - v2.0) + (v0.0 - v2.0) * (p.1 - v2.1)) / denom;
    let w2 = 1.0 - w0 - w1;

    Some((w0, w1, w2))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cell(renderer: &CellRenderer, col: usize, row: usize) -> char {
        renderer.char_buffer[row * renderer.width + col]
    }

    #[test]
    fn test_cell_world_round_trip() {
        let renderer = CellRenderer::new(80, 24, &Bounds::new(400.0, 400.0));
        let world = renderer.cell_to_world(26, 10);
        let (col, row) = renderer.world_to_cell(world);
        assert_eq!(col as u16, 26);
        assert_eq!(row as u16, 10);
    }

    #[test]
    fn test_demo_scene_rasterizes_all_layers() {
        let scene = Scene::demo();
        let mut renderer = CellRenderer::new(80, 24, scene.bounds());
        let frame = scene.frame();
        renderer.render_scene(&scene, &frame);

        // Ball at (130, 174) covers its center cell.
        assert_eq!(cell(&renderer, 26, 10), '@');

        let chars: Vec<char> = renderer.char_buffer.clone();
        assert!(chars.contains(&'-'), "screen line missing");
        assert!(chars.contains(&'='), "image segment missing");
        assert!(chars.contains(&'.'), "viewing cone missing");
        assert!(chars.contains(&'#'), "camera glyph missing");
    }

    #[test]
    fn test_barycentric_inside_outside() {
        let v0 = (0.0, 0.0);
        let v1 = (10.0, 0.0);
        let v2 = (0.0, 10.0);

        let (w0, w1, w2) = barycentric(v0, v1, v2, (2.0, 2.0)).unwrap();
        assert!(w0 >= 0.0 && w1 >= 0.0 && w2 >= 0.0);
        assert!((w0 + w1 + w2 - 1.0).abs() < 1e-9);

        let (_, w1, _) = barycentric(v0, v1, v2, (20.0, 2.0)).unwrap();
        assert!(w1 > 1.0);

        // Degenerate triangle has no barycentric frame.
        assert!(barycentric(v0, v0, v2, (1.0, 1.0)).is_none());
    }
}
