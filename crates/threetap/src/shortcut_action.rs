/// URL scheme that launches a shortcut action.
pub const SHORTCUT_SCHEME: &str = "threetap";

/// Action carried by an incoming shortcut launch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShortcutAction {
    /// Begin recording.
    Start,
    /// Stop recording.
    Stop,
    /// Anything else; ignored by the router.
    Other(String),
}

impl ShortcutAction {
    /// Parse `threetap://start`, `threetap:stop`, or a bare action name.
    ///
    /// Query strings and trailing path segments are ignored.
    pub fn parse(input: &str) -> Self {
        let trimmed = input.trim();

        let without_scheme = trimmed
            .split_once(':')
            .filter(|(scheme, _)| scheme.eq_ignore_ascii_case(SHORTCUT_SCHEME))
            .map_or(trimmed, |(_, rest)| rest.trim_start_matches('/'));

        let action = without_scheme
            .split(['/', '?', '#'])
            .next()
            .unwrap_or_default();

        if action.eq_ignore_ascii_case("start") {
            ShortcutAction::Start
        } else if action.eq_ignore_ascii_case("stop") {
            ShortcutAction::Stop
        } else {
            ShortcutAction::Other(action.to_string())
        }
    }
}
