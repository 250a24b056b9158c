//! Software framebuffer renderer for computed frames.
//!
//! Consumes strip records and ray hit points; the engine modules never call
//! into this one.

use crate::camera::Camera;
use crate::projection::Strip;
use crate::session::{Frame, Session};
use crate::world::{EMPTY, Grid, WallKind};

const CEILING: u32 = pack_rgb(0xb7, 0xde, 0xf5);
const FLOOR: u32 = pack_rgb(0x55, 0x55, 0x55);
const MAP_WALL: u32 = pack_rgb(0x22, 0x22, 0x22);
const MAP_FLOOR: u32 = pack_rgb(0xff, 0xff, 0xff);
const MAP_RAY: u32 = pack_rgb(0xff, 0x40, 0x40);
const MAP_PLAYER: u32 = pack_rgb(0x20, 0xc0, 0x20);

/// Heading marker length on the minimap, world units
const HEADING_LEN: f32 = 30.0;
/// Player marker edge, world units
const PLAYER_SIZE: f32 = 8.0;

#[inline]
pub const fn pack_rgb(r: u8, g: u8, b: u8) -> u32 {
    // 0RGB, matching the window surface
    (b as u32) | ((g as u32) << 8) | ((r as u32) << 16)
}

#[inline]
fn scale_rgb(color: u32, k: f32) -> u32 {
    let ch = |shift: u32| ((((color >> shift) & 0xFF) as f32 * k) as u32).min(255);
    ch(0) | (ch(8) << 8) | (ch(16) << 16)
}

/// Base colour for a wall face before distance shading. Vertical faces are
/// lit a little brighter than horizontal ones.
pub fn wall_color(kind: WallKind, vertical: bool) -> u32 {
    let base = match kind {
        WallKind::Plain => pack_rgb(255, 255, 255),
        WallKind::Colored => pack_rgb(255, 0, 0),
    };
    if vertical { base } else { scale_rgb(base, 0.8) }
}

/// Draw the first-person view and the minimap overlay.
pub fn render_frame(buf: &mut [u32], width: usize, height: usize, session: &Session) {
    let frame = session.frame();
    draw_strips(buf, width, height, frame);
    draw_minimap(
        buf,
        width,
        height,
        session.grid(),
        &session.camera,
        frame,
        session.config().minimap_scale,
    );
}

/// Fill every column: ceiling above its strip, wall, floor below.
/// Strips narrower than a pixel share columns; strips wider span several.
pub fn draw_strips(buf: &mut [u32], width: usize, height: usize, frame: &Frame) {
    if frame.strips.is_empty() {
        for (y, row) in buf.chunks_mut(width).take(height).enumerate() {
            row.fill(if y < height / 2 { CEILING } else { FLOOR });
        }
        return;
    }

    let per_column = width as f32 / frame.strips.len() as f32;
    for x in 0..width {
        let i = ((x as f32 / per_column) as usize).min(frame.strips.len() - 1);
        draw_column(buf, width, height, x, &frame.strips[i]);
    }
}

fn draw_column(buf: &mut [u32], width: usize, height: usize, x: usize, strip: &Strip) {
    let (top, bottom) = strip.pixel_span(height);
    let color = scale_rgb(wall_color(strip.kind, strip.vertical), strip.clamped_shade());

    let mut idx = x;
    for y in 0..height {
        buf[idx] = if y < top {
            CEILING
        } else if y < bottom {
            color
        } else {
            FLOOR
        };
        idx += width;
    }
}

pub fn draw_minimap(
    buf: &mut [u32],
    width: usize,
    height: usize,
    grid: &Grid,
    camera: &Camera,
    frame: &Frame,
    scale: f32,
) {
    if scale <= 0.0 {
        return;
    }
    let tile = grid.tile_len() * scale;

    for row in 0..grid.rows() {
        for col in 0..grid.cols() {
            let color = match grid.cell(row, col) {
                Some(EMPTY) => MAP_FLOOR,
                _ => MAP_WALL,
            };
            fill_rect(
                buf,
                width,
                height,
                col as f32 * tile,
                row as f32 * tile,
                tile,
                tile,
                color,
            );
        }
    }

    let eye = [camera.pos[0] * scale, camera.pos[1] * scale];
    for ray in frame.rays.iter().filter(|r| r.is_hit()) {
        draw_line(
            buf,
            width,
            height,
            eye,
            [ray.hit[0] * scale, ray.hit[1] * scale],
            MAP_RAY,
        );
    }

    let half = PLAYER_SIZE * scale * 0.5;
    fill_rect(
        buf,
        width,
        height,
        eye[0] - half,
        eye[1] - half,
        half * 2.0,
        half * 2.0,
        MAP_PLAYER,
    );
    let (s, c) = camera.angle().sin_cos();
    let tip = [
        eye[0] + c * HEADING_LEN * scale,
        eye[1] + s * HEADING_LEN * scale,
    ];
    draw_line(buf, width, height, eye, tip, MAP_PLAYER);
}

#[allow(clippy::too_many_arguments)]
fn fill_rect(
    buf: &mut [u32],
    width: usize,
    height: usize,
    x: f32,
    y: f32,
    w: f32,
    h: f32,
    color: u32,
) {
    let x0 = x.floor().clamp(0.0, width as f32) as usize;
    let x1 = (x + w).floor().clamp(0.0, width as f32) as usize;
    let y0 = y.floor().clamp(0.0, height as f32) as usize;
    let y1 = (y + h).floor().clamp(0.0, height as f32) as usize;
    for row in y0..y1 {
        buf[row * width + x0..row * width + x1].fill(color);
    }
}

// Bresenham, clipped per pixel
fn draw_line(buf: &mut [u32], width: usize, height: usize, a: [f32; 2], b: [f32; 2], color: u32) {
    let (mut x0, mut y0) = (a[0].round() as i32, a[1].round() as i32);
    let (x1, y1) = (b[0].round() as i32, b[1].round() as i32);
    let dx = (x1 - x0).abs();
    let dy = -(y1 - y0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let sy = if y0 < y1 { 1 } else { -1 };
    let mut err = dx + dy;

    loop {
        if x0 >= 0 && y0 >= 0 && (x0 as usize) < width && (y0 as usize) < height {
            buf[y0 as usize * width + x0 as usize] = color;
        }
        if x0 == x1 && y0 == y1 {
            break;
        }
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x0 += sx;
        }
        if e2 <= dx {
            err += dx;
            y0 += sy;
        }
    }
}
