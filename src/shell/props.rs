//! Host-supplied player inputs

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

pub const DEFAULT_THEME: &str = "default";

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerProps {
    pub source_url: String,
    pub title: String,
    /// Dedication ("for ...")
    pub name: Option<String>,
    pub download_url: Option<String>,
    pub show_download: bool,
    pub theme: String,
}

impl PlayerProps {
    pub fn new(source_url: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            source_url: source_url.into(),
            title: title.into(),
            name: None,
            download_url: None,
            show_download: false,
            theme: DEFAULT_THEME.to_string(),
        }
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Offer a direct download of `url`
    pub fn download(mut self, url: impl Into<String>) -> Self {
        self.download_url = Some(url.into());
        self.show_download = true;
        self
    }

    pub fn show_download(mut self, show: bool) -> Self {
        self.show_download = show;
        self
    }

    pub fn theme(mut self, theme: impl Into<String>) -> Self {
        self.theme = theme.into();
        self
    }
}
