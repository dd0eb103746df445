//! Point sources for the contour app.

use std::fs;
use std::path::Path;

use anyhow::{bail, Context, Result};
use ar_common::{Glyph, GlyphList, Point};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, info};

/// Read points from a delimited text file: one `x,y` pair per line.
///
/// Blank lines and `#` comments are skipped. A first line that does not
/// parse is taken as a header. Columns past the second are ignored.
pub fn load_points(path: &Path) -> Result<GlyphList<Point, ()>> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read points from {}", path.display()))?;

    let mut glyphs = Vec::new();
    for (i, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        match parse_point(line) {
            Some(p) => glyphs.push(Glyph::new(p, ())),
            None if i == 0 => debug!(header = line, "Skipping header line"),
            None => bail!("{}:{}: expected `x,y`, got {:?}", path.display(), i + 1, line),
        }
    }

    info!(path = %path.display(), points = glyphs.len(), "Loaded points");
    Ok(GlyphList::new(glyphs))
}

fn parse_point(line: &str) -> Option<Point> {
    let mut fields = line.split(|c: char| c == ',' || c == '\t' || c == ';');
    let x = fields.next()?.trim().parse::<f64>().ok()?;
    let y = fields.next()?.trim().parse::<f64>().ok()?;
    (x.is_finite() && y.is_finite()).then(|| Point::new(x, y))
}

/// Synthetic population: `n` points around `clusters` hot spots in the
/// unit square scaled to `extent`.
pub fn synthetic_points(n: usize, clusters: usize, extent: f64, seed: u64) -> GlyphList<Point, ()> {
    let mut rng = StdRng::seed_from_u64(seed);
    let hot_spots: Vec<(Point, f64)> = (0..clusters.max(1))
        .map(|_| {
            let center = Point::new(rng.gen_range(0.1..0.9) * extent, rng.gen_range(0.1..0.9) * extent);
            (center, rng.gen_range(0.02..0.15) * extent)
        })
        .collect();

    let glyphs = (0..n)
        .map(|i| {
            let (center, spread) = hot_spots[i % hot_spots.len()];
            let dx: f64 = (0..4).map(|_| rng.gen_range(-1.0..1.0)).sum::<f64>() * spread / 2.0;
            let dy: f64 = (0..4).map(|_| rng.gen_range(-1.0..1.0)).sum::<f64>() * spread / 2.0;
            Glyph::new(Point::new(center.x + dx, center.y + dy), ())
        })
        .collect();

    info!(points = n, clusters = hot_spots.len(), seed, "Generated synthetic points");
    glyphs
}
