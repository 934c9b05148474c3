//! Data handed to the sharing and gifting collaborators

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Social share request
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SharePayload {
    pub title: String,
    pub url: String,
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Option::is_none"))]
    pub creator_name: Option<String>,
    pub theme: String,
}

/// Gift request
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GiftPayload {
    pub song_title: String,
    pub song_url: String,
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Option::is_none"))]
    pub creator_name: Option<String>,
}

#[cfg(all(test, feature = "serde"))]
mod tests {
    use super::*;

    #[test]
    fn test_share_field_names() {
        let share = SharePayload {
            title: "Happy Birthday Sam".into(),
            url: "https://example.com/s/1".into(),
            creator_name: Some("Alex".into()),
            theme: "birthday".into(),
        };
        let json = serde_json::to_value(&share).unwrap();
        assert_eq!(json["creatorName"], "Alex");
        assert_eq!(json["theme"], "birthday");
    }

    #[test]
    fn test_gift_omits_missing_creator() {
        let gift = GiftPayload {
            song_title: "Our Song".into(),
            song_url: "https://example.com/s/2".into(),
            creator_name: None,
        };
        let json = serde_json::to_string(&gift).unwrap();
        assert_eq!(
            json,
            r#"{"songTitle":"Our Song","songUrl":"https://example.com/s/2"}"#
        );
    }
}
