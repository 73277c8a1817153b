use crate::ShortcutAction;

/// Commands sent from the input listener to the main application.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppCommand {
    /// A shortcut launch to route.
    Shortcut {
        /// Action carried by the launch.
        action: ShortcutAction,
    },
    /// Print the saved recordings.
    ListRecordings,
    /// Print the recorder state.
    Status,
    /// Prompt for camera and microphone access.
    RequestPermissions,
    /// Request application shutdown.
    Shutdown,
}

impl AppCommand {
    /// Parse one input line. Blank lines yield `None`.
    pub fn parse(line: &str) -> Option<Self> {
        let trimmed = line.trim();
        match trimmed.to_ascii_lowercase().as_str() {
            "" => None,
            "list" => Some(AppCommand::ListRecordings),
            "status" => Some(AppCommand::Status),
            "permissions" => Some(AppCommand::RequestPermissions),
            "quit" | "exit" => Some(AppCommand::Shutdown),
            _ => Some(AppCommand::Shortcut {
                action: ShortcutAction::parse(trimmed),
            }),
        }
    }
}
