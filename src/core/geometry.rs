use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

/// A 2D point, either in logical (index, value) or pixel space.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    #[must_use]
    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

/// Axis-aligned rectangle with `left/top/right/bottom` edges.
///
/// Edges are stored as given. Mapping through a transform that flips an axis
/// returns a rectangle normalized with [`Rect::sorted`].
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub left: f64,
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
}

impl Rect {
    #[must_use]
    pub const fn new(left: f64, top: f64, right: f64, bottom: f64) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    #[must_use]
    pub fn width(self) -> f64 {
        self.right - self.left
    }

    #[must_use]
    pub fn height(self) -> f64 {
        self.bottom - self.top
    }

    #[must_use]
    pub fn center_y(self) -> f64 {
        (self.top + self.bottom) / 2.0
    }

    #[must_use]
    pub fn corners(self) -> [Point; 4] {
        [
            Point::new(self.left, self.top),
            Point::new(self.right, self.top),
            Point::new(self.right, self.bottom),
            Point::new(self.left, self.bottom),
        ]
    }

    /// Returns a copy with `left <= right` and `top <= bottom`.
    #[must_use]
    pub fn sorted(self) -> Self {
        Self {
            left: self.left.min(self.right),
            top: self.top.min(self.bottom),
            right: self.left.max(self.right),
            bottom: self.top.max(self.bottom),
        }
    }

    #[must_use]
    pub fn bounding(points: &[Point]) -> Option<Self> {
        let (first, rest) = points.split_first()?;
        let mut out = Self::new(first.x, first.y, first.x, first.y);
        for point in rest {
            out.left = out.left.min(point.x);
            out.top = out.top.min(point.y);
            out.right = out.right.max(point.x);
            out.bottom = out.bottom.max(point.y);
        }
        Some(out)
    }

    #[must_use]
    pub fn contains_point(self, point: Point) -> bool {
        point.x >= self.left && point.x <= self.right && point.y >= self.top && point.y <= self.bottom
    }

    #[must_use]
    pub fn contains_rect(self, other: Rect) -> bool {
        other.left >= self.left
            && other.right <= self.right
            && other.top >= self.top
            && other.bottom <= self.bottom
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum PathCommand {
    MoveTo(Point),
    LineTo(Point),
    Close,
}

/// Polyline path built from move/line commands.
///
/// Short paths (crosshair segments, single indicator strokes) stay inline.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Path {
    commands: SmallVec<[PathCommand; 8]>,
}

impl Path {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn move_to(&mut self, point: Point) -> &mut Self {
        self.commands.push(PathCommand::MoveTo(point));
        self
    }

    pub fn line_to(&mut self, point: Point) -> &mut Self {
        self.commands.push(PathCommand::LineTo(point));
        self
    }

    pub fn close(&mut self) -> &mut Self {
        self.commands.push(PathCommand::Close);
        self
    }

    #[must_use]
    pub fn commands(&self) -> &[PathCommand] {
        &self.commands
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Iterates over every vertex in command order.
    pub fn vertices(&self) -> impl Iterator<Item = Point> + '_ {
        self.commands.iter().filter_map(|command| match command {
            PathCommand::MoveTo(point) | PathCommand::LineTo(point) => Some(*point),
            PathCommand::Close => None,
        })
    }

    /// Returns a new path with every vertex passed through `f`.
    #[must_use]
    pub fn map_vertices(&self, mut f: impl FnMut(Point) -> Point) -> Self {
        let commands = self
            .commands
            .iter()
            .map(|command| match *command {
                PathCommand::MoveTo(point) => PathCommand::MoveTo(f(point)),
                PathCommand::LineTo(point) => PathCommand::LineTo(f(point)),
                PathCommand::Close => PathCommand::Close,
            })
            .collect();
        Self { commands }
    }
}

impl FromIterator<Point> for Path {
    /// Builds an open polyline: first point moves, the rest draw lines.
    fn from_iter<I: IntoIterator<Item = Point>>(iter: I) -> Self {
        let mut path = Self::new();
        for (idx, point) in iter.into_iter().enumerate() {
            if idx == 0 {
                path.move_to(point);
            } else {
                path.line_to(point);
            }
        }
        path
    }
}
