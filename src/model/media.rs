//! Media lookup state shown on the simulation tab

use super::catalog::ExperimentId;

/// Storage key of an experiment's video, e.g. `onion-peel.mp4`
pub fn media_key(experiment: &ExperimentId) -> String {
    format!("{}.mp4", experiment)
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum MediaState {
    /// No lookup issued for the current experiment yet
    #[default]
    Idle,
    Loading { key: String },
    Ready { url: String },
    NotFound { key: String },
}

impl MediaState {
    pub fn is_idle(&self) -> bool {
        matches!(self, MediaState::Idle)
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, MediaState::Loading { .. })
    }

    pub fn url(&self) -> Option<&str> {
        match self {
            MediaState::Ready { url } => Some(url),
            _ => None,
        }
    }

    pub fn can_retry(&self) -> bool {
        matches!(self, MediaState::NotFound { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_media_key() {
        assert_eq!(media_key(&ExperimentId::new("mitosis")), "mitosis.mp4");
    }

    #[test]
    fn test_state_queries() {
        assert!(MediaState::default().is_idle());
        let ready = MediaState::Ready {
            url: "https://example.org/a.mp4".to_string(),
        };
        assert_eq!(ready.url(), Some("https://example.org/a.mp4"));
        assert!(!ready.can_retry());
        assert!(MediaState::NotFound { key: "a.mp4".to_string() }.can_retry());
    }
}
