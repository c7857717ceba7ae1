//! Interfaces to the surface that places and displays widgets.
//!
//! The host owns widget placement, display metrics and submission of view
//! state. Everything here is injected so tests can substitute fixed fakes.

use std::fmt;

use serde::Deserialize;

use crate::{error::HostError, view::ViewState};

/// Opaque id of one host-managed widget placement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize)]
#[serde(transparent)]
pub struct WidgetId(pub i32);

impl fmt::Display for WidgetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Host layout bounds for one instance, in device-independent units.
/// Missing values are zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(default)]
pub struct SizeHints {
    pub min_width: i32,
    pub max_width: i32,
    pub min_height: i32,
    pub max_height: i32,
}

/// Orientation as reported by the host, which may be undecided.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrientationSignal {
    Portrait,
    Landscape,
    #[default]
    Undefined,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    Portrait,
    Landscape,
}

impl Orientation {
    /// Resolves the orientation once per refresh. An undecided signal falls
    /// back to the display shape, where a square display counts as portrait.
    pub fn detect(signal: OrientationSignal, display_width: u32, display_height: u32) -> Self {
        match signal {
            OrientationSignal::Portrait => Orientation::Portrait,
            OrientationSignal::Landscape => Orientation::Landscape,
            OrientationSignal::Undefined if display_width <= display_height => {
                Orientation::Portrait
            }
            OrientationSignal::Undefined => Orientation::Landscape,
        }
    }
}

/// Converts device-independent units to whole pixels.
pub trait UnitConverter {
    fn to_pixels(&self, dp: f32) -> u32;
}

/// Density scale factor, rounding to the nearest pixel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Density(pub f32);

impl UnitConverter for Density {
    fn to_pixels(&self, dp: f32) -> u32 {
        let px = (dp * self.0).round();
        if px.is_finite() && px > 0.0 {
            px.min(u32::MAX as f32) as u32
        } else {
            0
        }
    }
}

/// Display metrics of the device the widgets live on.
pub trait DisplayInfo: UnitConverter {
    fn orientation_signal(&self) -> OrientationSignal;

    /// Physical display size in pixels as `(width, height)`.
    fn display_size(&self) -> (u32, u32);

    fn orientation(&self) -> Orientation {
        let (width, height) = self.display_size();
        Orientation::detect(self.orientation_signal(), width, height)
    }
}

/// The widget host: enumerates placements, reports their size hints and
/// accepts finished view state.
pub trait WidgetHost {
    fn list_instance_ids(&self) -> Vec<WidgetId>;

    /// Re-queried on every refresh; `None` when the host reports nothing.
    fn size_hints(&self, id: WidgetId) -> Option<SizeHints>;

    fn submit(&self, id: WidgetId, view: ViewState) -> Result<(), HostError>;
}
