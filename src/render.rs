use crate::{
    cover::CoverResolver,
    intent::IntentFactory,
    session::SessionSnapshot,
    view::{ElementId, Icon, ImageContent, ViewState},
};

/// Fills everything that does not depend on the available space.
pub struct StateRenderer<'a> {
    covers: CoverResolver<'a>,
    intents: &'a dyn IntentFactory,
}

impl<'a> StateRenderer<'a> {
    pub fn new(covers: CoverResolver<'a>, intents: &'a dyn IntentFactory) -> Self {
        Self { covers, intents }
    }

    /// `cover_size` is the resolved widget height; zero while unknown.
    pub fn render_session(&self, item: &SessionSnapshot, cover_size: u32) -> ViewState {
        let mut view = ViewState::new();

        view.set_click_target(ElementId::PlayPause, self.intents.play_pause_command())
            .set_click_target(ElementId::FastForward, self.intents.fast_forward_command())
            .set_click_target(ElementId::Rewind, self.intents.rewind_command());

        view.set_image(
            ElementId::PlayPause,
            ImageContent::Resource(play_pause_icon(item)),
        );

        view.set_text(ElementId::Title, item.name.as_str())
            .set_text(ElementId::Subtitle, item.section_name.as_str());

        let cover = self.covers.resolve(item, cover_size);
        view.set_image(ElementId::Cover, ImageContent::Bitmap(cover))
            .set_click_target(
                ElementId::WholeWidget,
                self.intents.open_detail_intent(item.id),
            );

        view
    }

    /// Fixed state shown while nothing is selected: the app icon and a
    /// click target leading to the chooser, no text and no transport.
    pub fn render_no_session(&self) -> ViewState {
        let mut view = ViewState::new();
        view.set_image(ElementId::Cover, ImageContent::Resource(Icon::AppIcon))
            .set_click_target(ElementId::WholeWidget, self.intents.open_chooser_intent());

        for element in [
            ElementId::Title,
            ElementId::Subtitle,
            ElementId::Rewind,
            ElementId::PlayPause,
            ElementId::FastForward,
        ] {
            view.set_visible(element, false);
        }

        view
    }
}

fn play_pause_icon(item: &SessionSnapshot) -> Icon {
    if item.phase.is_playing() {
        Icon::Pause
    } else {
        Icon::Play
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        cover::{CoverSettings, CoverSource, DecodingLoader, MonogramPlaceholder},
        intent::{DefaultIntents, Intent, TransportCommand},
        session::{ItemId, PlaybackPhase},
    };
    use std::path::PathBuf;

    const SETTINGS: CoverSettings = CoverSettings {
        max_file_bytes: 1024,
        fallback_size: 56,
        placeholder_size: 32,
    };

    fn item(phase: PlaybackPhase) -> SessionSnapshot {
        SessionSnapshot {
            id: ItemId(9),
            name: "Neuromancer".to_string(),
            section_name: "Chapter 3".to_string(),
            section_count: 24,
            cover_file: PathBuf::from("/nonexistent/neuromancer.jpg"),
            use_cover_replacement: false,
            phase,
        }
    }

    fn renderer() -> StateRenderer<'static> {
        StateRenderer::new(
            CoverResolver::new(&DecodingLoader, &MonogramPlaceholder, SETTINGS),
            &DefaultIntents,
        )
    }

    #[test]
    fn fills_text_targets_and_cover() {
        let view = renderer().render_session(&item(PlaybackPhase::Paused), 120);

        assert_eq!(view.text(ElementId::Title), Some("Neuromancer"));
        assert_eq!(view.text(ElementId::Subtitle), Some("Chapter 3"));
        assert_eq!(
            view.click_target(ElementId::PlayPause),
            Some(&Intent::Transport(TransportCommand::PlayPause))
        );
        assert_eq!(
            view.click_target(ElementId::Rewind),
            Some(&Intent::Transport(TransportCommand::Rewind))
        );
        assert_eq!(
            view.click_target(ElementId::FastForward),
            Some(&Intent::Transport(TransportCommand::FastForward))
        );
        assert_eq!(
            view.click_target(ElementId::WholeWidget),
            Some(&Intent::OpenDetail(ItemId(9)))
        );
        match view.image(ElementId::Cover) {
            Some(ImageContent::Bitmap(cover)) => {
                assert_eq!(cover.source, CoverSource::Placeholder);
                assert_eq!(cover.size(), 32);
            }
            other => panic!("unexpected cover {other:?}"),
        }
    }

    #[test]
    fn icon_follows_playback_phase() {
        let icon = |phase| {
            renderer()
                .render_session(&item(phase), 0)
                .image(ElementId::PlayPause)
                .cloned()
        };
        assert_eq!(
            icon(PlaybackPhase::Playing),
            Some(ImageContent::Resource(Icon::Pause))
        );
        assert_eq!(
            icon(PlaybackPhase::Paused),
            Some(ImageContent::Resource(Icon::Play))
        );
        assert_eq!(
            icon(PlaybackPhase::Stopped),
            Some(ImageContent::Resource(Icon::Play))
        );
    }

    #[test]
    fn session_view_leaves_visibility_to_the_planner() {
        let view = renderer().render_session(&item(PlaybackPhase::Playing), 0);
        for element in [
            ElementId::Cover,
            ElementId::Title,
            ElementId::Subtitle,
            ElementId::Rewind,
            ElementId::PlayPause,
            ElementId::FastForward,
        ] {
            assert!(view.is_visible(element), "{element:?} hidden");
        }
    }

    #[test]
    fn no_session_opens_chooser_without_transport() {
        let view = renderer().render_no_session();
        assert_eq!(
            view.click_target(ElementId::WholeWidget),
            Some(&Intent::OpenChooser)
        );
        assert_eq!(
            view.image(ElementId::Cover),
            Some(&ImageContent::Resource(Icon::AppIcon))
        );
        assert!(view.click_target(ElementId::PlayPause).is_none());
        assert!(!view.is_visible(ElementId::PlayPause));
        assert!(!view.is_visible(ElementId::Rewind));
        assert!(!view.is_visible(ElementId::FastForward));
        assert!(view.is_visible(ElementId::Cover));
        assert!(view.layout().is_none());
    }
}
