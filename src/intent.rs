use crate::session::ItemId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransportCommand {
    PlayPause,
    Rewind,
    FastForward,
}

impl TransportCommand {
    /// Media key code used as the command's fixed identifier.
    pub fn key_code(self) -> i32 {
        match self {
            TransportCommand::PlayPause => 85,
            TransportCommand::Rewind => 89,
            TransportCommand::FastForward => 90,
        }
    }
}

/// Invocable handle bound to a widget click target.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Intent {
    Transport(TransportCommand),
    OpenDetail(ItemId),
    OpenChooser,
}

/// Builds the handles the widget binds to its click targets.
pub trait IntentFactory {
    fn play_pause_command(&self) -> Intent {
        Intent::Transport(TransportCommand::PlayPause)
    }

    fn rewind_command(&self) -> Intent {
        Intent::Transport(TransportCommand::Rewind)
    }

    fn fast_forward_command(&self) -> Intent {
        Intent::Transport(TransportCommand::FastForward)
    }

    fn open_detail_intent(&self, item: ItemId) -> Intent {
        Intent::OpenDetail(item)
    }

    fn open_chooser_intent(&self) -> Intent {
        Intent::OpenChooser
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultIntents;

impl IntentFactory for DefaultIntents {}
