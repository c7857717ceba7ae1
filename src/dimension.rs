use crate::host::{Orientation, SizeHints, UnitConverter};

/// Pixel footprint of one widget instance for the current layout pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct WidgetSize {
    pub width: u32,
    pub height: u32,
}

impl WidgetSize {
    /// Hosts that report nothing usable leave one side at zero.
    pub fn is_known(&self) -> bool {
        self.width > 0 && self.height > 0
    }
}

/// Picks the hint pair describing the rendered footprint: narrow and tall in
/// portrait, wide and short in landscape.
pub fn resolve_size(
    hints: SizeHints,
    orientation: Orientation,
    units: &(impl UnitConverter + ?Sized),
) -> WidgetSize {
    let (width_dp, height_dp) = match orientation {
        Orientation::Portrait => (hints.min_width, hints.max_height),
        Orientation::Landscape => (hints.max_width, hints.min_height),
    };

    WidgetSize {
        width: units.to_pixels(width_dp.max(0) as f32),
        height: units.to_pixels(height_dp.max(0) as f32),
    }
}
