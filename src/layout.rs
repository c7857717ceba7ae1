//! Adaptive visibility planning.
//!
//! One fixed degradation policy for the widget shape: a square cover on the
//! left, three transport buttons in a row, and a title and subtitle line
//! above the buttons. When the resolved size is too small, optional elements
//! are dropped in priority order until the rest fits. The play/pause button
//! always stays.

use bitflags::bitflags;

use crate::{config::LayoutConfig, dimension::WidgetSize, host::UnitConverter, view::ElementId};

bitflags! {
    /// Optional elements the planner has turned off.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Hidden: u8 {
        const COVER = 1 << 0;
        const REWIND = 1 << 1;
        const FAST_FORWARD = 1 << 2;
        const TITLE = 1 << 3;
        const SUBTITLE = 1 << 4;
    }
}

const OPTIONAL_ELEMENTS: [(ElementId, Hidden); 5] = [
    (ElementId::Cover, Hidden::COVER),
    (ElementId::Rewind, Hidden::REWIND),
    (ElementId::FastForward, Hidden::FAST_FORWARD),
    (ElementId::Title, Hidden::TITLE),
    (ElementId::Subtitle, Hidden::SUBTITLE),
];

/// Pixel budget constants for one refresh.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LayoutMetrics {
    /// One transport button including its padding.
    pub button_footprint: u32,
    pub title_height: u32,
    pub subtitle_height: u32,
}

impl LayoutMetrics {
    pub fn from_config(config: &LayoutConfig, units: &(impl UnitConverter + ?Sized)) -> Self {
        Self {
            button_footprint: units.to_pixels(config.button_footprint_dp()),
            title_height: units.to_pixels(config.title_line_dp()),
            subtitle_height: units.to_pixels(config.subtitle_line_dp()),
        }
    }
}

/// Visibility decisions for one refresh of one widget instance.
///
/// Flags only ever go from visible to hidden; there is no way to re-show an
/// element once it is in `hidden`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LayoutPlan {
    size: WidgetSize,
    hidden: Hidden,
}

impl LayoutPlan {
    /// Everything visible; used as-is when the host reports no usable size.
    pub fn all_visible(size: WidgetSize) -> Self {
        Self {
            size,
            hidden: Hidden::empty(),
        }
    }

    pub fn size(&self) -> WidgetSize {
        self.size
    }

    pub fn hidden(&self) -> Hidden {
        self.hidden
    }

    pub fn is_visible(&self, element: ElementId) -> bool {
        OPTIONAL_ELEMENTS
            .iter()
            .find(|(id, _)| *id == element)
            .map_or(true, |(_, flag)| !self.hidden.contains(*flag))
    }

    /// Visibility of every optional element, in a fixed order.
    pub fn visibility(&self) -> impl Iterator<Item = (ElementId, bool)> + '_ {
        OPTIONAL_ELEMENTS
            .iter()
            .map(|(id, flag)| (*id, !self.hidden.contains(*flag)))
    }

    fn hide(&mut self, flag: Hidden) {
        self.hidden.insert(flag);
    }
}

/// Plans which optional elements fit into `size`.
///
/// Callers only plan for sizes where both sides are positive; anything else
/// keeps [`LayoutPlan::all_visible`].
pub fn plan_visibility(
    size: WidgetSize,
    single_section: bool,
    metrics: &LayoutMetrics,
) -> LayoutPlan {
    let mut plan = LayoutPlan::all_visible(size);
    plan_horizontal(&mut plan, metrics);
    plan_vertical(&mut plan, single_section, metrics);
    plan
}

// Cover is square, so its width equals the widget height.
fn plan_horizontal(plan: &mut LayoutPlan, metrics: &LayoutMetrics) {
    let available = u64::from(plan.size.width);
    let button = u64::from(metrics.button_footprint);
    let cover = u64::from(plan.size.height);
    let mut total = 3 * button + cover;

    if total > available {
        plan.hide(Hidden::COVER);
        total -= cover;
    }

    if total > available {
        plan.hide(Hidden::FAST_FORWARD);
        total -= button;
    }

    if total > available {
        plan.hide(Hidden::REWIND);
    }
}

fn plan_vertical(plan: &mut LayoutPlan, single_section: bool, metrics: &LayoutMetrics) {
    let available = u64::from(plan.size.height);
    let subtitle = u64::from(metrics.subtitle_height);
    let mut total =
        u64::from(metrics.button_footprint) + u64::from(metrics.title_height) + subtitle;

    if single_section || total > available {
        plan.hide(Hidden::SUBTITLE);
        total -= subtitle;
    }

    if total > available {
        plan.hide(Hidden::TITLE);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{host::Density, view::ViewState};
    use proptest::prelude::*;

    const METRICS: LayoutMetrics = LayoutMetrics {
        button_footprint: 52,
        title_height: 16,
        subtitle_height: 14,
    };

    fn size(width: u32, height: u32) -> WidgetSize {
        WidgetSize { width, height }
    }

    #[test]
    fn metrics_follow_density() {
        let metrics = LayoutMetrics::from_config(&LayoutConfig::default(), &Density(2.0));
        assert_eq!(
            metrics,
            LayoutMetrics {
                button_footprint: 104,
                title_height: 32,
                subtitle_height: 28,
            }
        );
    }

    #[test]
    fn roomy_widget_shows_everything() {
        let plan = plan_visibility(size(400, 100), false, &METRICS);
        assert_eq!(plan.hidden(), Hidden::empty());
        assert!(plan.visibility().all(|(_, visible)| visible));
    }

    #[test]
    fn cover_goes_first() {
        // 3 * 52 + 100 = 256
        let plan = plan_visibility(size(255, 100), false, &METRICS);
        assert_eq!(plan.hidden(), Hidden::COVER);
    }

    #[test]
    fn fast_forward_goes_before_rewind() {
        let plan = plan_visibility(size(155, 100), false, &METRICS);
        assert_eq!(plan.hidden(), Hidden::COVER | Hidden::FAST_FORWARD);

        let plan = plan_visibility(size(103, 100), false, &METRICS);
        assert_eq!(
            plan.hidden(),
            Hidden::COVER | Hidden::FAST_FORWARD | Hidden::REWIND
        );
    }

    #[test]
    fn exact_fit_is_not_exceeding() {
        let plan = plan_visibility(size(256, 100), false, &METRICS);
        assert!(plan.is_visible(ElementId::Cover));

        let plan = plan_visibility(size(400, 82), false, &METRICS);
        assert!(plan.is_visible(ElementId::Subtitle));
        assert!(plan.is_visible(ElementId::Title));
    }

    #[test]
    fn subtitle_goes_before_title() {
        // 52 + 16 + 14 = 82
        let plan = plan_visibility(size(1000, 81), false, &METRICS);
        assert!(!plan.is_visible(ElementId::Subtitle));
        assert!(plan.is_visible(ElementId::Title));

        let plan = plan_visibility(size(1000, 67), false, &METRICS);
        assert!(!plan.is_visible(ElementId::Subtitle));
        assert!(!plan.is_visible(ElementId::Title));
    }

    #[test]
    fn single_section_hides_subtitle_with_room_to_spare() {
        let plan = plan_visibility(size(1000, 500), true, &METRICS);
        assert_eq!(plan.hidden(), Hidden::SUBTITLE);
    }

    #[test]
    fn single_section_frees_room_for_title() {
        let plan = plan_visibility(size(1000, 68), true, &METRICS);
        assert!(!plan.is_visible(ElementId::Subtitle));
        assert!(plan.is_visible(ElementId::Title));
    }

    #[test]
    fn whole_widget_and_play_pause_are_never_planned() {
        let plan = plan_visibility(size(1, 1), false, &METRICS);
        assert!(plan
            .visibility()
            .all(|(id, _)| id != ElementId::PlayPause && id != ElementId::WholeWidget));

        let mut view = ViewState::new();
        view.apply_layout(&plan);
        assert!(view.is_visible(ElementId::PlayPause));
        assert!(view.is_visible(ElementId::WholeWidget));
    }

    proptest! {
        #[test]
        fn enough_room_shows_everything(
            extra_width in 0u32..2000,
            height in 82u32..2000,
        ) {
            let width = 3 * 52 + height + extra_width;
            let plan = plan_visibility(size(width, height), false, &METRICS);
            prop_assert_eq!(plan.hidden(), Hidden::empty());
        }

        /// Requires a cover at least one footprint wide; a narrower cover
        /// frees less room than a button needs.
        #[test]
        fn cover_band_keeps_all_buttons(
            height in 52u32..1000,
            offset in 0u32..52,
        ) {
            let width = 2 * 52 + height + offset;
            let plan = plan_visibility(size(width, height), false, &METRICS);
            prop_assert!(!plan.is_visible(ElementId::Cover));
            prop_assert!(plan.is_visible(ElementId::Rewind));
            prop_assert!(plan.is_visible(ElementId::FastForward));
        }

        #[test]
        fn priority_order_is_monotonic(
            width in 1u32..1200,
            height in 1u32..600,
            single in any::<bool>(),
        ) {
            let plan = plan_visibility(size(width, height), single, &METRICS);
            let hidden = plan.hidden();
            if hidden.contains(Hidden::REWIND) {
                prop_assert!(hidden.contains(Hidden::FAST_FORWARD));
            }
            if hidden.contains(Hidden::FAST_FORWARD) {
                prop_assert!(hidden.contains(Hidden::COVER));
            }
            if hidden.contains(Hidden::TITLE) {
                prop_assert!(hidden.contains(Hidden::SUBTITLE));
            }
        }

        #[test]
        fn play_pause_survives_any_plan(
            width in 1u32..5000,
            height in 1u32..5000,
            single in any::<bool>(),
        ) {
            let plan = plan_visibility(size(width, height), single, &METRICS);
            let mut view = ViewState::new();
            view.set_visible(ElementId::PlayPause, true);
            view.apply_layout(&plan);
            prop_assert!(view.is_visible(ElementId::PlayPause));
            prop_assert!(plan.visibility().all(|(id, _)| id != ElementId::PlayPause));
        }

        #[test]
        fn single_section_always_hides_subtitle(width in 1u32..5000, height in 1u32..5000) {
            let plan = plan_visibility(size(width, height), true, &METRICS);
            prop_assert!(!plan.is_visible(ElementId::Subtitle));
        }

        #[test]
        fn passes_are_independent(width in 1u32..1200, height in 1u32..600) {
            let plan = plan_visibility(size(width, height), false, &METRICS);
            let wide = plan_visibility(size(5000, height), false, &METRICS);
            prop_assert_eq!(
                plan.hidden() & (Hidden::TITLE | Hidden::SUBTITLE),
                wide.hidden() & (Hidden::TITLE | Hidden::SUBTITLE)
            );
        }
    }
}
