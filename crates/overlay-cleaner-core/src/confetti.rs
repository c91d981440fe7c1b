#![forbid(unsafe_code)]

//! Confetti burst shown once the gate is cleared.
//!
//! Particles fall from just above the viewport, sway with their tilt phase
//! and are drawn as short diagonal strokes. The simulation advances once per
//! frame (not per unit of time) and stops after [`CELEBRATION_DURATION`] of
//! wall-clock time measured from the first frame.
//!
//! # Determinism
//!
//! Uses xorshift64 seeded by the host, so a given seed always produces the
//! same burst.

use core::time::Duration;

/// Particles spawned per burst.
pub const PARTICLE_COUNT: usize = 120;
/// Animation time budget, measured from the first frame.
pub const CELEBRATION_DURATION: Duration = Duration::from_millis(2_200);
/// Delay between fading the overlay out and detaching it.
pub const CELEBRATION_TEARDOWN: Duration = Duration::from_millis(350);

/// Particle colors.
pub const PALETTE: [&str; 6] = [
    "#16a34a", "#22c55e", "#38bdf8", "#f59e0b", "#ef4444", "#a855f7",
];

const SWAY: f64 = 0.5;
const TILT_AMPLITUDE: f64 = 10.0;

/// Deterministic xorshift64 PRNG.
#[derive(Debug, Clone)]
struct Xorshift64(u64);

impl Xorshift64 {
    /// Seeds pass through one splitmix64 round so small seeds still start
    /// from a well-mixed state.
    fn new(seed: u64) -> Self {
        let mut z = seed.wrapping_add(0x9E37_79B9_7F4A_7C15);
        z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
        z ^= z >> 31;
        // Zero is a fixed point of xorshift.
        Self(if z == 0 { 1 } else { z })
    }

    fn next_u64(&mut self) -> u64 {
        let mut x = self.0;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.0 = x;
        x
    }

    /// Uniform in `[0, 1)`.
    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    fn range(&mut self, lo: f64, hi: f64) -> f64 {
        lo + self.next_f64() * (hi - lo)
    }
}

/// A straight line segment to draw.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Stroke {
    pub from: (f64, f64),
    pub to: (f64, f64),
    pub width: f64,
    pub color: &'static str,
}

/// 2D drawing surface capability.
pub trait StrokeCanvas {
    /// Clear the `width` x `height` area.
    fn clear(&mut self, width: f64, height: f64);
    fn draw_stroke(&mut self, stroke: &Stroke);
}

#[derive(Debug, Clone, PartialEq)]
pub struct Particle {
    pub x: f64,
    pub y: f64,
    /// Stroke width and half the stroke height.
    pub radius: f64,
    pub tilt: f64,
    pub tilt_angle: f64,
    pub tilt_angle_inc: f64,
    pub vx: f64,
    pub vy: f64,
    pub color: &'static str,
}

impl Particle {
    fn spawn(rng: &mut Xorshift64, width: f64, height: f64) -> Self {
        let x = rng.next_f64() * width;
        let y = -10.0 - rng.next_f64() * height * 0.3;
        let radius = rng.range(4.0, 10.0);
        let tilt = rng.next_f64() * TILT_AMPLITUDE;
        let tilt_angle = rng.next_f64() * core::f64::consts::PI;
        let tilt_angle_inc = rng.range(0.02, 0.10);
        let color = PALETTE[(rng.next_u64() % PALETTE.len() as u64) as usize];
        let vx = rng.range(-2.0, 2.0);
        let vy = rng.range(2.0, 5.0);
        Self {
            x,
            y,
            radius,
            tilt,
            tilt_angle,
            tilt_angle_inc,
            vx,
            vy,
            color,
        }
    }

    fn advance(&mut self) {
        self.tilt_angle += self.tilt_angle_inc;
        self.y += self.vy;
        self.x += self.vx + self.tilt_angle.sin() * SWAY;
        self.tilt = self.tilt_angle.sin() * TILT_AMPLITUDE;
    }

    #[must_use]
    pub fn stroke(&self) -> Stroke {
        Stroke {
            from: (self.x + self.tilt + self.radius, self.y),
            to: (self.x + self.tilt, self.y + self.radius * 2.0),
            width: self.radius,
            color: self.color,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameStatus {
    /// Schedule another frame.
    Running,
    /// Time budget spent; begin teardown.
    Finished,
}

#[derive(Debug, Clone)]
pub struct Confetti {
    particles: Vec<Particle>,
    width: f64,
    height: f64,
    origin: Option<Duration>,
}

impl Confetti {
    #[must_use]
    pub fn new(width: f64, height: f64, seed: u64) -> Self {
        let mut rng = Xorshift64::new(seed);
        let particles = (0..PARTICLE_COUNT)
            .map(|_| Particle::spawn(&mut rng, width, height))
            .collect();
        Self {
            particles,
            width,
            height,
            origin: None,
        }
    }

    #[must_use]
    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    /// Track a viewport resize. Particles keep their positions.
    pub fn resize(&mut self, width: f64, height: f64) {
        self.width = width;
        self.height = height;
    }

    /// Advance and draw one frame at `timestamp`.
    ///
    /// The first call fixes the animation origin. The frame is always drawn;
    /// the return value says whether another one should follow.
    pub fn frame<C: StrokeCanvas>(&mut self, timestamp: Duration, canvas: &mut C) -> FrameStatus {
        let origin = *self.origin.get_or_insert(timestamp);
        let elapsed = timestamp.saturating_sub(origin);

        canvas.clear(self.width, self.height);
        for particle in &mut self.particles {
            particle.advance();
            canvas.draw_stroke(&particle.stroke());
        }

        if elapsed < CELEBRATION_DURATION {
            FrameStatus::Running
        } else {
            FrameStatus::Finished
        }
    }
}
