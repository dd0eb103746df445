//! Iso-contours by marching squares.
//!
//! A numeric grid is thresholded into a boolean grid, every vertex is
//! classified from the four cells meeting at it, each classification emits
//! up to two segments between the midpoints of the vertex's square, and
//! the segments are stitched into paths by matching endpoints.
//!
//! Geometry: cell `(x, y)` covers `[x, x+1) × [y, y+1)`. Vertex `(x, y)` is
//! the corner shared by cells `(x-1, y-1)`, `(x, y-1)`, `(x-1, y)` and
//! `(x, y)`, and its square spans the centers of those four cells. A
//! segment endpoint is the midpoint of one side of that square, so every
//! endpoint lies on a half-unit lattice and stitching is exact.
//!
//! The thresholded grid is padded with one low cell on every side before
//! classification, so regions that reach the edge of the grid still close.

use std::collections::HashMap;
use std::time::Instant;

use aggregates::{Aggregates, Grid};
use ar_common::{ArError, ArResult, BoundingBox, Point};
use num_traits::ToPrimitive;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::transfer::{IsoDivide, Transfer};
use crate::Renderer;

/// Classification of a vertex from its 2×2 cell neighborhood.
///
/// Names describe the high (inside) cells: `ui` is the lower half, `di`
/// the upper half, `l`/`r` the left/right half; `_in` variants have one
/// high cell, `_out` variants three.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContourCase {
    Empty,
    Surround,
    DiagTwo,
    DiagOne,
    UiIn,
    DiIn,
    LIn,
    RIn,
    UiRIn,
    UiLIn,
    DiRIn,
    DiLIn,
    DiROut,
    DiLOut,
    UiLOut,
    UiROut,
}

/// Side of a vertex's square; the segment endpoint is its midpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Side {
    Top,
    Right,
    Bottom,
    Left,
}

use Side::{Bottom, Left, Right, Top};

impl ContourCase {
    pub const ALL: [ContourCase; 16] = [
        ContourCase::Empty,
        ContourCase::Surround,
        ContourCase::DiagTwo,
        ContourCase::DiagOne,
        ContourCase::UiIn,
        ContourCase::DiIn,
        ContourCase::LIn,
        ContourCase::RIn,
        ContourCase::UiRIn,
        ContourCase::UiLIn,
        ContourCase::DiRIn,
        ContourCase::DiLIn,
        ContourCase::DiROut,
        ContourCase::DiLOut,
        ContourCase::UiLOut,
        ContourCase::UiROut,
    ];

    /// Classify the cells top-left, top-right, bottom-left, bottom-right
    /// of a vertex.
    pub fn classify(tl: bool, tr: bool, bl: bool, br: bool) -> ContourCase {
        match (tl, tr, bl, br) {
            (false, false, false, false) => ContourCase::Empty,
            (true, true, true, true) => ContourCase::Surround,
            (true, false, false, true) => ContourCase::DiagTwo,
            (false, true, true, false) => ContourCase::DiagOne,
            (false, false, true, true) => ContourCase::UiIn,
            (true, true, false, false) => ContourCase::DiIn,
            (true, false, true, false) => ContourCase::LIn,
            (false, true, false, true) => ContourCase::RIn,
            (false, false, false, true) => ContourCase::UiRIn,
            (false, false, true, false) => ContourCase::UiLIn,
            (false, true, false, false) => ContourCase::DiRIn,
            (true, false, false, false) => ContourCase::DiLIn,
            (true, false, true, true) => ContourCase::DiROut,
            (false, true, true, true) => ContourCase::DiLOut,
            (true, true, false, true) => ContourCase::UiLOut,
            (true, true, true, false) => ContourCase::UiROut,
        }
    }

    /// Ambiguous cases where the high cells sit on a diagonal.
    pub fn is_saddle(&self) -> bool {
        matches!(self, ContourCase::DiagOne | ContourCase::DiagTwo)
    }

    /// Segments crossing this vertex's square.
    ///
    /// Saddles always join the two high cells: both low corners are cut
    /// off by their own segment.
    fn segments(&self) -> &'static [(Side, Side)] {
        match self {
            ContourCase::Empty | ContourCase::Surround => &[],
            ContourCase::UiIn | ContourCase::DiIn => &[(Left, Right)],
            ContourCase::LIn | ContourCase::RIn => &[(Top, Bottom)],
            ContourCase::UiRIn | ContourCase::UiROut => &[(Right, Bottom)],
            ContourCase::UiLIn | ContourCase::UiLOut => &[(Left, Bottom)],
            ContourCase::DiRIn | ContourCase::DiROut => &[(Top, Right)],
            ContourCase::DiLIn | ContourCase::DiLOut => &[(Left, Top)],
            ContourCase::DiagTwo => &[(Top, Right), (Left, Bottom)],
            ContourCase::DiagOne => &[(Left, Top), (Right, Bottom)],
        }
    }
}

/// Endpoint of a segment in half-unit coordinates.
type Key = (i64, i64);

fn side_key(x: i32, y: i32, side: Side) -> Key {
    let (x, y) = (2 * x as i64, 2 * y as i64);
    match side {
        Top => (x, y - 1),
        Right => (x + 1, y),
        Bottom => (x, y + 1),
        Left => (x - 1, y),
    }
}

fn key_point((x, y): Key) -> Point {
    Point::new(x as f64 / 2.0, y as f64 / 2.0)
}

/// Marching-squares classification of a boolean grid, one case per vertex.
///
/// Vertices on the low edges of the grid lack a full neighborhood and are
/// [`ContourCase::Empty`].
#[derive(Debug, Clone, Copy, Default)]
pub struct CaseClassifier;

impl Transfer<bool> for CaseClassifier {
    type Output = ContourCase;

    fn empty(&self) -> ContourCase {
        ContourCase::Empty
    }

    fn at(&self, x: i32, y: i32, input: &Grid<bool>) -> ContourCase {
        let bounds = input.bounds();
        if x <= bounds.low_x || y <= bounds.low_y || !bounds.contains(x, y) {
            return ContourCase::Empty;
        }
        ContourCase::classify(
            *input.get(x - 1, y - 1),
            *input.get(x, y - 1),
            *input.get(x - 1, y),
            *input.get(x, y),
        )
    }
}

/// One stitched iso-line.
///
/// Closed contours do not repeat their first point; see
/// [`Contour::closed_points`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Contour {
    pub level: f64,
    pub points: Vec<Point>,
    pub closed: bool,
}

impl Contour {
    pub fn bounds(&self) -> BoundingBox {
        BoundingBox::from_points(self.points.iter().copied())
    }

    /// Points with the first repeated at the end when the path is closed.
    pub fn closed_points(&self) -> Vec<Point> {
        let mut points = self.points.clone();
        if self.closed {
            if let Some(first) = self.points.first() {
                points.push(*first);
            }
        }
        points
    }

    /// Even-odd containment against the path treated as a ring.
    pub fn contains(&self, p: Point) -> bool {
        let n = self.points.len();
        if n < 3 {
            return false;
        }
        let mut inside = false;
        let mut j = n - 1;
        for i in 0..n {
            let (a, b) = (self.points[i], self.points[j]);
            if (a.y > p.y) != (b.y > p.y) {
                let cross_x = a.x + (p.y - a.y) * (b.x - a.x) / (b.y - a.y);
                if p.x < cross_x {
                    inside = !inside;
                }
            }
            j = i;
        }
        inside
    }
}

/// All contours of one threshold level.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContourSet {
    pub level: f64,
    pub contours: Vec<Contour>,
    /// Paths whose stitching did not return to the start.
    pub open_paths: usize,
}

impl ContourSet {
    pub fn is_empty(&self) -> bool {
        self.contours.is_empty()
    }

    pub fn bounds(&self) -> BoundingBox {
        self.contours
            .iter()
            .fold(BoundingBox::empty(), |acc, c| acc.union(&c.bounds()))
    }

    /// Even-odd containment over every closed contour, so nested rings
    /// form holes.
    pub fn contains(&self, p: Point) -> bool {
        self.contours
            .iter()
            .filter(|c| c.closed && c.contains(p))
            .count()
            % 2
            == 1
    }
}

/// Stitch the segments of a classified grid into contours tagged `level`.
pub fn trace_contours(cases: &Grid<ContourCase>, level: f64) -> ContourSet {
    let mut segments: Vec<(Key, Key)> = Vec::new();
    for (x, y, case) in cases.cells() {
        for &(a, b) in case.segments() {
            segments.push((side_key(x, y, a), side_key(x, y, b)));
        }
    }

    let mut by_endpoint: HashMap<Key, Vec<usize>> = HashMap::with_capacity(segments.len() * 2);
    for (i, (a, b)) in segments.iter().enumerate() {
        by_endpoint.entry(*a).or_default().push(i);
        by_endpoint.entry(*b).or_default().push(i);
    }

    let mut used = vec![false; segments.len()];
    let mut contours = Vec::new();
    let mut open_paths = 0;

    for start in 0..segments.len() {
        if used[start] {
            continue;
        }
        used[start] = true;
        let (head, tail) = segments[start];
        let mut path = vec![head, tail];

        extend(&mut path, &segments, &by_endpoint, &mut used);
        let closed = path.len() > 2 && path.first() == path.last();
        if closed {
            path.pop();
        } else {
            path.reverse();
            extend(&mut path, &segments, &by_endpoint, &mut used);
            open_paths += 1;
        }

        contours.push(Contour {
            level,
            points: path.into_iter().map(key_point).collect(),
            closed,
        });
    }

    if open_paths > 0 {
        warn!(level, open_paths, "Contour stitching left open paths");
    }

    ContourSet {
        level,
        contours,
        open_paths,
    }
}

/// Walk unused segments from the last point of `path` until none remain
/// or the path returns to its first point.
fn extend(
    path: &mut Vec<Key>,
    segments: &[(Key, Key)],
    by_endpoint: &HashMap<Key, Vec<usize>>,
    used: &mut [bool],
) {
    loop {
        let Some(&end) = path.last() else { return };
        if path.len() > 2 && path.first() == Some(&end) {
            return;
        }
        let next = by_endpoint
            .get(&end)
            .and_then(|candidates| candidates.iter().copied().find(|&i| !used[i]));
        let Some(i) = next else { return };
        used[i] = true;
        let (a, b) = segments[i];
        path.push(if a == end { b } else { a });
    }
}

/// Levels `start, start + interval, ...` up to and including `max_value`.
pub fn generate_contour_levels(start: f64, max_value: f64, interval: f64) -> Vec<f64> {
    if !(interval > 0.0) || !interval.is_finite() || max_value < start {
        return vec![];
    }

    (0..)
        .map(|i| start + interval * i as f64)
        .take_while(|level| *level <= max_value)
        .collect()
}

/// How threshold levels are chosen for a grid.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum ContourMode {
    /// One fixed threshold.
    Single { threshold: f64 },
    /// `count` levels from `low` in steps of `step`; with no count, every
    /// step up to the grid's maximum.
    Spaced {
        low: f64,
        step: f64,
        count: Option<usize>,
    },
    /// `n` levels evenly spaced strictly between the grid's minimum and
    /// maximum.
    Count { n: usize },
}

impl ContourMode {
    pub fn validate(&self) -> ArResult<()> {
        match *self {
            ContourMode::Single { threshold } if !threshold.is_finite() => Err(
                ArError::invalid_parameter("threshold", format!("{} is not finite", threshold)),
            ),
            ContourMode::Spaced { low, .. } if !low.is_finite() => {
                Err(ArError::invalid_parameter("low", format!("{} is not finite", low)))
            }
            ContourMode::Spaced { step, .. } if !(step > 0.0 && step.is_finite()) => Err(
                ArError::invalid_parameter("step", format!("{} must be positive", step)),
            ),
            _ => Ok(()),
        }
    }

    /// Levels that do not depend on the grid's values, if this mode has
    /// them.
    pub fn fixed_levels(&self) -> Option<Vec<f64>> {
        match *self {
            ContourMode::Single { threshold } => Some(vec![threshold]),
            ContourMode::Spaced {
                low,
                step,
                count: Some(n),
            } => Some((0..n).map(|i| low + step * i as f64).collect()),
            _ => None,
        }
    }

    /// Threshold levels for a grid whose values span `[min, max]`.
    ///
    /// `Count` yields nothing for a flat range.
    pub fn levels(&self, min: f64, max: f64) -> Vec<f64> {
        match *self {
            ContourMode::Single { .. } | ContourMode::Spaced { count: Some(_), .. } => {
                self.fixed_levels().unwrap_or_default()
            }
            ContourMode::Spaced {
                low,
                step,
                count: None,
            } => generate_contour_levels(low, max, step),
            ContourMode::Count { .. } if max <= min => Vec::new(),
            ContourMode::Count { n } => {
                let span = max - min;
                (1..=n)
                    .map(|i| min + span * i as f64 / (n + 1) as f64)
                    .collect()
            }
        }
    }
}

/// Contours of `grid` at one threshold.
pub fn contours_at<R, A>(renderer: &R, grid: &Grid<A>, threshold: f64) -> ArResult<ContourSet>
where
    R: Renderer,
    A: ToPrimitive + Sync,
{
    let high = renderer.transfer(grid, &IsoDivide::new(threshold))?;
    let padded = high.subset(high.bounds().grow(1));
    let cases = renderer.transfer(&padded, &CaseClassifier)?;
    Ok(trace_contours(&cases, threshold))
}

/// Contours at `low`, `low + step`, ...; `count` levels, or every level
/// up to the grid's maximum when `count` is `None`.
pub fn contours_spaced<R, A>(
    renderer: &R,
    grid: &Grid<A>,
    low: f64,
    step: f64,
    count: Option<usize>,
) -> ArResult<Vec<ContourSet>>
where
    R: Renderer,
    A: ToPrimitive + Sync,
{
    contours(renderer, grid, &ContourMode::Spaced { low, step, count })
}

/// Contours at `n` levels evenly spaced inside the grid's value range.
pub fn contours_count<R, A>(renderer: &R, grid: &Grid<A>, n: usize) -> ArResult<Vec<ContourSet>>
where
    R: Renderer,
    A: ToPrimitive + Sync,
{
    contours(renderer, grid, &ContourMode::Count { n })
}

/// Contours for every level `mode` selects, in ascending level order.
pub fn contours<R, A>(renderer: &R, grid: &Grid<A>, mode: &ContourMode) -> ArResult<Vec<ContourSet>>
where
    R: Renderer,
    A: ToPrimitive + Sync,
{
    mode.validate()?;
    let start = Instant::now();

    let levels = match (mode.fixed_levels(), grid.value_range()) {
        (Some(levels), _) => levels,
        (None, Some((min, max))) => mode.levels(min, max),
        (None, None) => Vec::new(),
    };

    let sets = levels
        .iter()
        .map(|&level| contours_at(renderer, grid, level))
        .collect::<ArResult<Vec<_>>>()?;

    debug!(
        levels = sets.len(),
        contours = sets.iter().map(|s| s.contours.len()).sum::<usize>(),
        elapsed_ms = start.elapsed().as_millis() as u64,
        "Generated contours"
    );

    Ok(sets)
}
