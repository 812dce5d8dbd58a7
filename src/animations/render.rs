//! Locally drawn GIF animations used when no video service produced one.

use std::borrow::Cow;
use std::f64::consts::PI;

use crate::catalog::normalize_key;
use crate::types::MediaAsset;
use crate::{Error, Result};

/// `model_used` of animations drawn locally.
pub const RENDERED_ANIMATION: &str = "rendered_fallback";

pub const WIDTH: u16 = 160;
pub const HEIGHT: u16 = 100;
pub const FRAMES_PER_SECOND: u32 = 10;

const BACKGROUND: u8 = 0;
const GRID: u8 = 1;
const INK: u8 = 2;
const ACCENT: u8 = 3;

#[rustfmt::skip]
const PALETTE: [u8; 12] = [
    255, 255, 255,
    222, 222, 222,
    31, 90, 200,
    214, 39, 40,
];

/// Vertical extent of the plotted curves, in curve units either side of zero.
const Y_RANGE: f64 = 1.5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scene {
    SineWave,
    Pendulum,
    WavePropagation,
    Generic,
}

impl Scene {
    pub fn for_concept(concept: &str) -> Self {
        match normalize_key(concept).as_str() {
            "sine_wave" => Scene::SineWave,
            "pendulum_motion" => Scene::Pendulum,
            "wave_propagation" => Scene::WavePropagation,
            _ => Scene::Generic,
        }
    }

    fn draw(self, canvas: &mut Canvas, frame: u32) {
        let t = f64::from(frame) * 0.1;
        match self {
            Scene::SineWave => canvas.plot(4.0 * PI, |x| (x + t).sin()),
            Scene::WavePropagation => canvas.plot(4.0 * PI, |x| (x - t).sin() * (-x / 10.0).exp()),
            Scene::Generic => canvas.plot(2.0 * PI, |x| (x + t).sin() * x.cos()),
            Scene::Pendulum => {
                let theta = 0.5 * t.sin();
                let (px, py) = (i32::from(WIDTH) / 2, 8);
                let length = f64::from(HEIGHT) * 0.75;
                let bx = px + (length * theta.sin()).round() as i32;
                let by = py + (length * theta.cos()).round() as i32;
                canvas.line(px - 12, py, px + 12, py, INK);
                canvas.line(px, py, bx, by, INK);
                canvas.disc(bx, by, 5, ACCENT);
            }
        }
    }
}

/// Indexed-colour frame buffer over [`PALETTE`].
struct Canvas {
    pixels: Vec<u8>,
}

impl Canvas {
    fn new() -> Self {
        let mut canvas = Self {
            pixels: vec![BACKGROUND; usize::from(WIDTH) * usize::from(HEIGHT)],
        };
        for x in (0..i32::from(WIDTH)).step_by(20) {
            canvas.line(x, 0, x, i32::from(HEIGHT) - 1, GRID);
        }
        for y in (0..i32::from(HEIGHT)).step_by(20) {
            canvas.line(0, y, i32::from(WIDTH) - 1, y, GRID);
        }
        canvas
    }

    fn set(&mut self, x: i32, y: i32, colour: u8) {
        if x < 0 || y < 0 || x >= i32::from(WIDTH) || y >= i32::from(HEIGHT) {
            return;
        }
        self.pixels[y as usize * usize::from(WIDTH) + x as usize] = colour;
    }

    fn line(&mut self, x0: i32, y0: i32, x1: i32, y1: i32, colour: u8) {
        let (dx, dy) = ((x1 - x0).abs(), -(y1 - y0).abs());
        let (sx, sy) = (if x0 < x1 { 1 } else { -1 }, if y0 < y1 { 1 } else { -1 });
        let (mut x, mut y, mut err) = (x0, y0, dx + dy);
        loop {
            self.set(x, y, colour);
            if x == x1 && y == y1 {
                break;
            }
            let e2 = 2 * err;
            if e2 >= dy {
                err += dy;
                x += sx;
            }
            if e2 <= dx {
                err += dx;
                y += sy;
            }
        }
    }

    fn disc(&mut self, cx: i32, cy: i32, radius: i32, colour: u8) {
        for y in -radius..=radius {
            for x in -radius..=radius {
                if x * x + y * y <= radius * radius {
                    self.set(cx + x, cy + y, colour);
                }
            }
        }
    }

    /// Draws `f` over `0..=x_max`, one sample per pixel column, two pixels thick.
    fn plot(&mut self, x_max: f64, f: impl Fn(f64) -> f64) {
        let mid = f64::from(HEIGHT) / 2.0;
        let row = |y: f64| (mid - y.clamp(-Y_RANGE, Y_RANGE) * (mid - 1.0) / Y_RANGE).round() as i32;
        let last = i32::from(WIDTH) - 1;
        let mut prev = row(f(0.0));
        for col in 1..=last {
            let y = row(f(x_max * f64::from(col) / f64::from(last)));
            self.line(col - 1, prev, col, y, INK);
            self.line(col - 1, prev + 1, col, y + 1, INK);
            prev = y;
        }
    }
}

/// Encodes `duration_secs` of `scene` as a looping GIF.
pub fn render_gif(scene: Scene, duration_secs: u32) -> Result<Vec<u8>> {
    let frames = duration_secs.max(1) * FRAMES_PER_SECOND;
    let delay = (100 / FRAMES_PER_SECOND) as u16;
    let mut buf = Vec::new();
    {
        let mut encoder = gif::Encoder::new(&mut buf, WIDTH, HEIGHT, &PALETTE).map_err(encode_error)?;
        encoder.set_repeat(gif::Repeat::Infinite).map_err(encode_error)?;
        for n in 0..frames {
            let mut canvas = Canvas::new();
            scene.draw(&mut canvas, n);
            let mut frame = gif::Frame::default();
            frame.width = WIDTH;
            frame.height = HEIGHT;
            frame.delay = delay;
            frame.buffer = Cow::Owned(canvas.pixels);
            encoder.write_frame(&frame).map_err(encode_error)?;
        }
    }
    Ok(buf)
}

/// `{Concept}_fallback.gif` drawn for the concept's scene.
pub fn rendered_animation(concept: &str, duration_secs: u32) -> Result<MediaAsset> {
    let bytes = render_gif(Scene::for_concept(concept), duration_secs)?;
    Ok(MediaAsset::file(
        format!("{}_fallback.gif", concept.trim().replace(' ', "_")),
        bytes,
    ))
}

fn encode_error(e: gif::EncodingError) -> Error {
    Error::Io(std::io::Error::other(e))
}
