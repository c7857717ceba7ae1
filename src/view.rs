//! View-state builder submitted to the host.
//!
//! Rendering never pokes at a live surface; it fills one `ViewState` value
//! per instance and hands the finished value to the host.

use std::collections::BTreeMap;

use crate::{cover::Cover, intent::Intent, layout::LayoutPlan};

/// Addressable elements of the widget layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ElementId {
    WholeWidget,
    Cover,
    Title,
    Subtitle,
    Rewind,
    PlayPause,
    FastForward,
}

/// Built-in drawables the host already knows how to show.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Icon {
    Play,
    Pause,
    AppIcon,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ImageContent {
    Bitmap(Cover),
    Resource(Icon),
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ViewState {
    visibility: BTreeMap<ElementId, bool>,
    texts: BTreeMap<ElementId, String>,
    images: BTreeMap<ElementId, ImageContent>,
    click_targets: BTreeMap<ElementId, Intent>,
    layout: Option<LayoutPlan>,
}

impl ViewState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_visible(&mut self, element: ElementId, visible: bool) -> &mut Self {
        self.visibility.insert(element, visible);
        self
    }

    pub fn set_text(&mut self, element: ElementId, text: impl Into<String>) -> &mut Self {
        self.texts.insert(element, text.into());
        self
    }

    pub fn set_image(&mut self, element: ElementId, image: ImageContent) -> &mut Self {
        self.images.insert(element, image);
        self
    }

    pub fn set_click_target(&mut self, element: ElementId, intent: Intent) -> &mut Self {
        self.click_targets.insert(element, intent);
        self
    }

    /// Applies every visibility decision of `plan` and records it.
    pub fn apply_layout(&mut self, plan: &LayoutPlan) -> &mut Self {
        for (element, visible) in plan.visibility() {
            self.set_visible(element, visible);
        }
        self.layout = Some(*plan);
        self
    }

    /// Elements are visible unless something turned them off.
    pub fn is_visible(&self, element: ElementId) -> bool {
        self.visibility.get(&element).copied().unwrap_or(true)
    }

    pub fn text(&self, element: ElementId) -> Option<&str> {
        self.texts.get(&element).map(String::as_str)
    }

    pub fn image(&self, element: ElementId) -> Option<&ImageContent> {
        self.images.get(&element)
    }

    pub fn click_target(&self, element: ElementId) -> Option<&Intent> {
        self.click_targets.get(&element)
    }

    /// The plan applied to this view, if adaptive planning ran.
    pub fn layout(&self) -> Option<&LayoutPlan> {
        self.layout.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::intent::TransportCommand;

    #[test]
    fn unset_elements_default_to_visible() {
        let view = ViewState::new();
        assert!(view.is_visible(ElementId::Cover));
        assert!(view.text(ElementId::Title).is_none());
        assert!(view.layout().is_none());
    }

    #[test]
    fn setters_chain_and_overwrite() {
        let mut view = ViewState::new();
        view.set_text(ElementId::Title, "first")
            .set_text(ElementId::Title, "second")
            .set_visible(ElementId::Rewind, false)
            .set_image(ElementId::PlayPause, ImageContent::Resource(Icon::Pause))
            .set_click_target(
                ElementId::Rewind,
                Intent::Transport(TransportCommand::Rewind),
            );

        assert_eq!(view.text(ElementId::Title), Some("second"));
        assert!(!view.is_visible(ElementId::Rewind));
        assert_eq!(
            view.image(ElementId::PlayPause),
            Some(&ImageContent::Resource(Icon::Pause))
        );
        assert_eq!(
            view.click_target(ElementId::Rewind),
            Some(&Intent::Transport(TransportCommand::Rewind))
        );
    }
}
