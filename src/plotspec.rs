//! Purpose: Closed, enumerated option structs that serialize to module
//! argument strings.
//! Exports: `Region`, `Projection`, `Pen`, `PlotSpec`.
//! Role: Argument-building convenience kept entirely outside the
//! session/resource core; the core only ever sees the serialized string.
//! Invariants: `to_args()` output is a space-joined token list with no
//! embedded whitespace inside a token.
use serde::{Deserialize, Serialize};

use crate::core::error::{Error, ErrorKind};

/// Rectangular data region, serialized as `-R<xmin>/<xmax>/<ymin>/<ymax>`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Region {
    pub x_min: f64,
    pub x_max: f64,
    pub y_min: f64,
    pub y_max: f64,
}

impl Region {
    pub fn new(x_min: f64, x_max: f64, y_min: f64, y_max: f64) -> Result<Self, Error> {
        if !(x_min < x_max && y_min < y_max) {
            return Err(Error::new(ErrorKind::Usage)
                .with_message("region bounds must satisfy min < max on both axes"));
        }
        Ok(Self {
            x_min,
            x_max,
            y_min,
            y_max,
        })
    }

    fn to_arg(self) -> String {
        format!("-R{}/{}/{}/{}", self.x_min, self.x_max, self.y_min, self.y_max)
    }
}

/// Map projection, serialized as a `-J` token. The engine's drawing stubs
/// accept and ignore it; real engines dispatch on it.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub enum Projection {
    /// Linear x/y at the given plot width.
    Linear { width_cm: f64 },
    /// Mercator at the given plot width.
    Mercator { width_cm: f64 },
}

impl Projection {
    fn to_arg(self) -> String {
        match self {
            Projection::Linear { width_cm } => format!("-JX{width_cm}"),
            Projection::Mercator { width_cm } => format!("-JM{width_cm}"),
        }
    }
}

/// Stroke pen, serialized as `-W<width>p,<color>`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Pen {
    pub width_pt: f64,
    pub color: String,
}

impl Pen {
    pub fn new(width_pt: f64, color: impl Into<String>) -> Self {
        Self {
            width_pt,
            color: color.into(),
        }
    }

    fn to_arg(&self) -> String {
        format!("-W{}p,{}", self.width_pt, self.color)
    }
}

/// Options for one drawing call. Every field is optional; `to_args()` emits
/// only the tokens that are set, in a stable order.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PlotSpec {
    pub region: Option<Region>,
    pub projection: Option<Projection>,
    pub pen: Option<Pen>,
}

impl PlotSpec {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_region(mut self, region: Region) -> Self {
        self.region = Some(region);
        self
    }

    pub fn with_projection(mut self, projection: Projection) -> Self {
        self.projection = Some(projection);
        self
    }

    pub fn with_pen(mut self, pen: Pen) -> Self {
        self.pen = Some(pen);
        self
    }

    pub fn to_args(&self) -> String {
        let mut tokens = Vec::new();
        if let Some(region) = self.region {
            tokens.push(region.to_arg());
        }
        if let Some(projection) = self.projection {
            tokens.push(projection.to_arg());
        }
        if let Some(pen) = &self.pen {
            tokens.push(pen.to_arg());
        }
        tokens.join(" ")
    }
}

#[cfg(test)]
mod tests {
    use super::{Pen, PlotSpec, Projection, Region};
    use crate::core::error::ErrorKind;

    #[test]
    fn spec_serializes_in_stable_order() {
        let spec = PlotSpec::new()
            .with_region(Region::new(0.0, 10.0, -5.0, 5.0).expect("region"))
            .with_projection(Projection::Mercator { width_cm: 12.0 })
            .with_pen(Pen::new(1.0, "black"));
        assert_eq!(spec.to_args(), "-R0/10/-5/5 -JM12 -W1p,black");
    }

    #[test]
    fn empty_spec_serializes_to_nothing() {
        assert_eq!(PlotSpec::new().to_args(), "");
    }

    #[test]
    fn inverted_regions_are_rejected() {
        let err = Region::new(10.0, 0.0, 0.0, 1.0).expect_err("inverted");
        assert_eq!(err.kind(), ErrorKind::Usage);
    }

    #[test]
    fn specs_round_trip_through_json() {
        let spec = PlotSpec::new()
            .with_region(Region::new(0.0, 1.0, 0.0, 1.0).expect("region"))
            .with_pen(Pen::new(0.5, "red"));
        let json = serde_json::to_string(&spec).expect("serialize");
        let back: PlotSpec = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back, spec);
    }
}
