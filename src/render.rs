use std::collections::HashSet;
use std::path::Path;

use image::{Rgba, RgbaImage};
use rusttype::{point, Font, Scale};
use tracing::info;

use crate::common::{Position, Solution};
use crate::error::{Error, Result};
use crate::map::Map;
use crate::solver::Heuristic;

const CELL_SIZE: u32 = 50;
const CELL_BORDER: u32 = 2;

const BACKGROUND: Rgba<u8> = Rgba([0, 0, 0, 255]);
const WALL: Rgba<u8> = Rgba([40, 40, 40, 255]);
const START: Rgba<u8> = Rgba([255, 0, 0, 255]);
const GOAL: Rgba<u8> = Rgba([0, 171, 28, 255]);
const PATH: Rgba<u8> = Rgba([220, 235, 113, 255]);
const EXPLORED: Rgba<u8> = Rgba([212, 97, 85, 255]);
const ESTIMATE: Rgba<u8> = Rgba([255, 255, 255, 255]);
const FREE: Rgba<u8> = Rgba([237, 240, 252, 255]);
const TEXT: Rgba<u8> = Rgba([0, 0, 0, 255]);

const LABEL_FONT: &[u8] = include_bytes!("../assets/DejaVuSans.ttf");
const LABEL_SCALE: f32 = 20.0;

fn label_font() -> Result<Font<'static>> {
    Font::try_from_bytes(LABEL_FONT).ok_or(Error::InvalidFont)
}

/// Text view of the maze: `█` wall, `A` start, `B` goal, `*` path cell.
pub fn text(map: &Map, solution: Option<&Solution>) -> String {
    let mut out = String::with_capacity(map.height * (map.width + 1));
    for i in 0..map.height {
        for j in 0..map.width {
            let ch = if map.is_wall((i, j)) {
                '█'
            } else if (i, j) == map.start {
                'A'
            } else if (i, j) == map.goal {
                'B'
            } else if solution.is_some_and(|s| s.contains((i, j))) {
                '*'
            } else {
                ' '
            };
            out.push(ch);
        }
        out.push('\n');
    }
    out
}

#[derive(Debug, Clone, Copy)]
pub struct ImageOptions {
    /// Highlight the solution path and print heuristic values on free cells.
    pub show_solution: bool,
    /// Shade explored cells. Only applies once a solution exists.
    pub show_explored: bool,
}

impl Default for ImageOptions {
    fn default() -> Self {
        ImageOptions {
            show_solution: true,
            show_explored: false,
        }
    }
}

/// Rasterize the maze, one square per cell colored by role.
pub fn image<H: Heuristic + ?Sized>(
    map: &Map,
    solution: Option<&Solution>,
    explored: &HashSet<Position>,
    heuristic: &H,
    options: ImageOptions,
) -> Result<RgbaImage> {
    let font = label_font()?;
    let mut img = RgbaImage::from_pixel(
        map.width as u32 * CELL_SIZE,
        map.height as u32 * CELL_SIZE,
        BACKGROUND,
    );

    for i in 0..map.height {
        for j in 0..map.width {
            let cell = (i, j);
            let mut label = None;

            let fill = if map.is_wall(cell) {
                WALL
            } else if cell == map.start {
                START
            } else if cell == map.goal {
                GOAL
            } else if options.show_solution && solution.is_some_and(|s| s.contains(cell)) {
                PATH
            } else if options.show_explored && solution.is_some() && explored.contains(&cell) {
                EXPLORED
            } else if options.show_solution {
                label = Some(heuristic.estimate(cell, map.goal));
                ESTIMATE
            } else {
                FREE
            };

            let left = j as u32 * CELL_SIZE;
            let top = i as u32 * CELL_SIZE;
            fill_rect(
                &mut img,
                left + CELL_BORDER,
                top + CELL_BORDER,
                left + CELL_SIZE - CELL_BORDER,
                top + CELL_SIZE - CELL_BORDER,
                fill,
            );

            // Unreachable cells have no meaningful estimate.
            if let Some(value) = label.filter(|&value| value != usize::MAX) {
                draw_label(&mut img, &font, left, top, &value.to_string());
            }
        }
    }

    Ok(img)
}

pub fn save_image<H: Heuristic + ?Sized, P: AsRef<Path>>(
    map: &Map,
    solution: Option<&Solution>,
    explored: &HashSet<Position>,
    heuristic: &H,
    options: ImageOptions,
    path: P,
) -> Result<()> {
    let path = path.as_ref();
    image(map, solution, explored, heuristic, options)?.save(path)?;
    info!("wrote maze image to {}", path.display());
    Ok(())
}

// Inclusive on both corners.
fn fill_rect(img: &mut RgbaImage, x0: u32, y0: u32, x1: u32, y1: u32, color: Rgba<u8>) {
    for y in y0..=y1.min(img.height() - 1) {
        for x in x0..=x1.min(img.width() - 1) {
            img.put_pixel(x, y, color);
        }
    }
}

/// Draw `label` centered in the cell whose top-left pixel is `(left, top)`.
fn draw_label(img: &mut RgbaImage, font: &Font<'_>, left: u32, top: u32, label: &str) {
    let scale = Scale::uniform(LABEL_SCALE);
    let ascent = font.v_metrics(scale).ascent;
    let glyphs: Vec<_> = font.layout(label, scale, point(0.0, ascent)).collect();

    let Some((min_x, min_y, max_x, max_y)) = glyphs
        .iter()
        .filter_map(|glyph| glyph.pixel_bounding_box())
        .map(|bb| (bb.min.x, bb.min.y, bb.max.x, bb.max.y))
        .reduce(|a, b| (a.0.min(b.0), a.1.min(b.1), a.2.max(b.2), a.3.max(b.3)))
    else {
        return;
    };
    let offset_x = left as i32 + (CELL_SIZE as i32 - (max_x - min_x)) / 2 - min_x;
    let offset_y = top as i32 + (CELL_SIZE as i32 - (max_y - min_y)) / 2 - min_y;

    for glyph in &glyphs {
        let Some(bb) = glyph.pixel_bounding_box() else {
            continue;
        };
        glyph.draw(|gx, gy, coverage| {
            let x = offset_x + bb.min.x + gx as i32;
            let y = offset_y + bb.min.y + gy as i32;
            if x < 0 || y < 0 || x as u32 >= img.width() || y as u32 >= img.height() {
                return;
            }
            let pixel = img.get_pixel_mut(x as u32, y as u32);
            *pixel = blend(*pixel, TEXT, coverage);
        });
    }
}

/// Alpha-blend `fg` over `bg` channel by channel.
fn blend(bg: Rgba<u8>, fg: Rgba<u8>, alpha: f32) -> Rgba<u8> {
    let mix = |b: u8, f: u8| ((1.0 - alpha) * b as f32 + alpha * f as f32) as u8;
    Rgba([
        mix(bg.0[0], fg.0[0]),
        mix(bg.0[1], fg.0[1]),
        mix(bg.0[2], fg.0[2]),
        bg.0[3].max(fg.0[3]),
    ])
}
