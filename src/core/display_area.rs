use serde::{Deserialize, Serialize};

use crate::core::geometry::Rect;
use crate::error::{ChartError, ChartResult};

/// Pixel rectangle a panel draws into.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DisplayArea {
    pub left: f64,
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
}

impl DisplayArea {
    /// Builds a validated area (finite edges, `left < right`, `top <= bottom`).
    pub fn new(left: f64, top: f64, right: f64, bottom: f64) -> ChartResult<Self> {
        if !left.is_finite() || !top.is_finite() || !right.is_finite() || !bottom.is_finite() {
            return Err(ChartError::InvalidData(
                "display area edges must be finite".to_owned(),
            ));
        }
        if left >= right {
            return Err(ChartError::InvalidData(
                "display area left must be < right".to_owned(),
            ));
        }
        if top > bottom {
            return Err(ChartError::InvalidData(
                "display area top must be <= bottom".to_owned(),
            ));
        }
        Ok(Self {
            left,
            top,
            right,
            bottom,
        })
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
    pub fn contains(self, other: Self) -> bool {
        self.as_rect().contains_rect(other.as_rect())
    }

    #[must_use]
    pub fn contains_y(self, y: f64) -> bool {
        y >= self.top && y <= self.bottom
    }

    #[must_use]
    pub fn contains_x(self, x: f64) -> bool {
        x >= self.left && x <= self.right
    }

    #[must_use]
    pub fn as_rect(self) -> Rect {
        Rect::new(self.left, self.top, self.right, self.bottom)
    }
}

/// Vertical insets of a panel.
///
/// `display_top`/`display_bottom` override the full area's vertical extent
/// (used to reserve header space); paddings shrink the full area into the
/// main area where data is drawn.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PanelInsets {
    #[serde(default)]
    pub main_padding_top: f64,
    #[serde(default)]
    pub main_padding_bottom: f64,
    #[serde(default)]
    pub display_top: Option<f64>,
    #[serde(default)]
    pub display_bottom: Option<f64>,
}

impl PanelInsets {
    #[must_use]
    pub fn with_main_padding(mut self, top: f64, bottom: f64) -> Self {
        self.main_padding_top = top;
        self.main_padding_bottom = bottom;
        self
    }

    fn validate(self) -> ChartResult<Self> {
        if !self.main_padding_top.is_finite()
            || !self.main_padding_bottom.is_finite()
            || self.main_padding_top < 0.0
            || self.main_padding_bottom < 0.0
        {
            return Err(ChartError::InvalidData(
                "main area paddings must be finite and >= 0".to_owned(),
            ));
        }
        Ok(self)
    }
}

/// The two rectangles every panel owns: full area and main (data) area.
///
/// Invariants: `main ⊆ full`, `left == 0` and `right == viewport width` for
/// both rectangles.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PanelAreas {
    full: DisplayArea,
    main: DisplayArea,
}

impl PanelAreas {
    /// Computes both areas for a panel of `width x height` pixels.
    pub fn layout(width: f64, height: f64, insets: PanelInsets) -> ChartResult<Self> {
        let insets = insets.validate()?;
        if !width.is_finite() || width <= 0.0 || !height.is_finite() || height <= 0.0 {
            return Err(ChartError::InvalidData(
                "panel size must be finite and > 0".to_owned(),
            ));
        }

        let full = DisplayArea::new(
            0.0,
            insets.display_top.unwrap_or(0.0),
            width,
            insets.display_bottom.unwrap_or(height),
        )?;
        let main = DisplayArea::new(
            full.left,
            full.top + insets.main_padding_top,
            full.right,
            full.bottom - insets.main_padding_bottom,
        )
        .map_err(|_| {
            ChartError::InvalidData("main area paddings exceed the display area".to_owned())
        })?;

        Self::from_areas(full, main)
    }

    /// Pairs two precomputed areas, checking the containment invariant.
    pub fn from_areas(full: DisplayArea, main: DisplayArea) -> ChartResult<Self> {
        if !full.contains(main) {
            return Err(ChartError::InvalidData(
                "main area must lie inside the full display area".to_owned(),
            ));
        }
        if main.left != full.left || main.right != full.right {
            return Err(ChartError::InvalidData(
                "main and full area must share the horizontal extent".to_owned(),
            ));
        }
        if main.height() <= 0.0 {
            return Err(ChartError::InvalidData(
                "main area height must be > 0".to_owned(),
            ));
        }
        Ok(Self { full, main })
    }

    #[must_use]
    pub fn full(self) -> DisplayArea {
        self.full
    }

    #[must_use]
    pub fn main(self) -> DisplayArea {
        self.main
    }
}
