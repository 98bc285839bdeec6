//! Glyph outline extraction and key-point reduction.
//!
//! The reducer is a turn-angle heuristic, not a true skeletonization: it
//! keeps the outline's start, sharp turns, and end, which approximates the
//! visual skeleton well enough for the character sets this was tuned on
//! (CJK strokes and Latin capitals). Curve control points are dropped and
//! only segment endpoints are traced, since the projection later smooths
//! the path anyway.

use ttf_parser::OutlineBuilder;

use crate::error::TrackError;
use crate::font::FontStore;
use crate::geometry::Point2;

/// Retain an interior point as a key point when the path bends by more than
/// this many degrees.
const TURN_ANGLE_THRESHOLD_DEG: f64 = 30.0;

/// Minimum distance (font units) between consecutive retained key points.
const MIN_KEY_POINT_SPACING: f64 = 10.0;

/// Visual complexity class of a glyph skeleton, derived from the number of
/// retained turn points rather than from per-character special cases.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShapeComplexity {
    /// No interior turns: a single straight stroke.
    Straight,
    /// A handful of turns.
    Simple,
    /// Everything else.
    Complex,
}

/// Per-class caps on the size of the produced key-point set.
#[derive(Debug, Clone, Copy)]
pub struct CapTable {
    pub straight: usize,
    pub simple: usize,
    pub complex: usize,
}

impl Default for CapTable {
    fn default() -> Self {
        Self {
            straight: 2,
            simple: 4,
            complex: 8,
        }
    }
}

impl CapTable {
    fn cap_for(&self, complexity: ShapeComplexity) -> usize {
        match complexity {
            ShapeComplexity::Straight => self.straight,
            ShapeComplexity::Simple => self.simple,
            ShapeComplexity::Complex => self.complex,
        }
    }
}

fn classify(interior_turns: usize) -> ShapeComplexity {
    match interior_turns {
        0 => ShapeComplexity::Straight,
        1..=3 => ShapeComplexity::Simple,
        _ => ShapeComplexity::Complex,
    }
}

/// Collects glyph outline segment endpoints into a flat point sequence,
/// dropping consecutive duplicates.
#[derive(Default)]
struct ContourCollector {
    points: Vec<Point2>,
}

impl ContourCollector {
    fn push(&mut self, x: f32, y: f32) {
        let p = Point2::new(f64::from(x), f64::from(y));
        if self.points.last() != Some(&p) {
            self.points.push(p);
        }
    }
}

impl OutlineBuilder for ContourCollector {
    fn move_to(&mut self, x: f32, y: f32) {
        self.push(x, y);
    }

    fn line_to(&mut self, x: f32, y: f32) {
        self.push(x, y);
    }

    fn quad_to(&mut self, _x1: f32, _y1: f32, x: f32, y: f32) {
        self.push(x, y);
    }

    fn curve_to(&mut self, _x1: f32, _y1: f32, _x2: f32, _y2: f32, x: f32, y: f32) {
        self.push(x, y);
    }

    fn close(&mut self) {}
}

/// Extract the reduced key-point set for a character.
pub fn extract_key_points(
    font: &FontStore,
    character: char,
    caps: &CapTable,
) -> Result<Vec<Point2>, TrackError> {
    let face = font.face()?;
    let glyph = face
        .glyph_index(character)
        .ok_or(TrackError::GlyphNotFound(character))?;

    let mut collector = ContourCollector::default();
    if face.outline_glyph(glyph, &mut collector).is_none() || collector.points.is_empty() {
        // Whitespace and other mark-only glyphs have nothing to trace.
        return Err(TrackError::GlyphNotFound(character));
    }

    Ok(reduce_key_points(&collector.points, caps))
}

/// Reduce a deduplicated contour to its key points: start, sharp turns, end.
pub fn reduce_key_points(contour: &[Point2], caps: &CapTable) -> Vec<Point2> {
    let contour = dedup_consecutive(contour);
    match contour.len() {
        0 => return Vec::new(),
        // A degenerate single-point glyph collapses to start = end.
        1 => return vec![contour[0], contour[0]],
        _ => {}
    }

    let mut keys = vec![contour[0]];
    for i in 1..contour.len() - 1 {
        let angle = turn_angle_deg(contour[i - 1], contour[i], contour[i + 1]);
        if angle > TURN_ANGLE_THRESHOLD_DEG
            && contour[i].distance_to(keys.last().unwrap()) > MIN_KEY_POINT_SPACING
        {
            keys.push(contour[i]);
        }
    }
    let interior_turns = keys.len() - 1;
    keys.push(contour[contour.len() - 1]);

    let complexity = classify(interior_turns);
    let cap = caps.cap_for(complexity);
    match complexity {
        ShapeComplexity::Straight => vec![keys[0], keys[keys.len() - 1]],
        ShapeComplexity::Simple => subsample(&keys, cap),
        ShapeComplexity::Complex => {
            let mut reduced = subsample(&keys, cap);
            // Pad short reductions so complex glyphs always carry `cap` points.
            while reduced.len() < cap {
                reduced.push(reduced[reduced.len() - 1]);
            }
            reduced
        }
    }
}

fn dedup_consecutive(points: &[Point2]) -> Vec<Point2> {
    let mut out: Vec<Point2> = Vec::with_capacity(points.len());
    for p in points {
        if out.last() != Some(p) {
            out.push(*p);
        }
    }
    out
}

/// Turn angle at `b` between the incoming edge `a -> b` and the outgoing
/// edge `b -> c`, in degrees.
fn turn_angle_deg(a: Point2, b: Point2, c: Point2) -> f64 {
    let (v1x, v1y) = (b.x - a.x, b.y - a.y);
    let (v2x, v2y) = (c.x - b.x, c.y - b.y);
    let n1 = (v1x * v1x + v1y * v1y).sqrt();
    let n2 = (v2x * v2x + v2y * v2y).sqrt();
    if n1 == 0.0 || n2 == 0.0 {
        return 0.0;
    }
    let cos = ((v1x * v2x + v1y * v2y) / (n1 * n2)).clamp(-1.0, 1.0);
    cos.acos().to_degrees()
}

/// Uniformly subsample an ordered sequence to at most `n` points, always
/// keeping the first and last.
fn subsample(points: &[Point2], n: usize) -> Vec<Point2> {
    if points.len() <= n || n < 2 {
        return points.to_vec();
    }
    let last = points.len() - 1;
    (0..n).map(|i| points[i * last / (n - 1)]).collect()
}
