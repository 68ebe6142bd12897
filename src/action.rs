use serde::{Deserialize, Serialize};
use strum::Display;

use crate::catalog::FolderId;

#[derive(Debug, Clone, PartialEq, Eq, Display, Serialize, Deserialize)]
pub enum Action {
    Tick,
    Render,
    Resize(u16, u16),
    Suspend,
    Resume,
    Quit,
    ClearScreen,
    Error(String),
    Help,
    SelectFolder(FolderId),
    ToggleExpanded(FolderId),
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_actions_from_config_text() {
        let quit: Action = json5::from_str(r#""Quit""#).unwrap();
        assert_eq!(quit, Action::Quit);

        let select: Action = json5::from_str(r#"{ SelectFolder: "music" }"#).unwrap();
        assert_eq!(select, Action::SelectFolder(FolderId::Music));

        assert!(json5::from_str::<Action>(r#"{ SelectFolder: "videos" }"#).is_err());
    }
}
