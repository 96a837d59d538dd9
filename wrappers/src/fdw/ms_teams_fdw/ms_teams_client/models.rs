use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

// Microsoft Teams API models

/// Legacy actionable message card accepted by channel incoming webhooks
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct MessageCard {
    #[serde(rename = "@type")]
    card_type: &'static str,
    #[serde(rename = "@context")]
    context: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub text: String,
}

impl Default for MessageCard {
    fn default() -> Self {
        Self {
            card_type: "MessageCard",
            context: "https://schema.org/extensions",
            title: None,
            text: String::new(),
        }
    }
}

/// OAuth2 client-credentials token response
#[derive(Debug, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    #[serde(default)]
    pub token_type: Option<String>,
    #[serde(default)]
    pub expires_in: Option<u64>,
}

/// One page of a Graph collection response
#[derive(Debug, Deserialize)]
pub struct CollectionPage {
    #[serde(default)]
    pub value: Vec<JsonValue>,
    #[serde(rename = "@odata.nextLink", default)]
    pub next_link: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn card_without_title_omits_it() {
        let card = MessageCard {
            text: "hi".to_string(),
            ..Default::default()
        };
        assert_eq!(
            serde_json::to_value(&card).unwrap(),
            json!({
                "@type": "MessageCard",
                "@context": "https://schema.org/extensions",
                "text": "hi",
            })
        );
    }

    #[test]
    fn page_reads_next_link() {
        let page: CollectionPage = serde_json::from_value(json!({
            "@odata.context": "https://graph.microsoft.com/v1.0/$metadata#teams('t')/channels",
            "@odata.nextLink": "https://graph.microsoft.com/v1.0/teams/t/channels?$skiptoken=x",
            "value": [{"id": "1"}],
        }))
        .unwrap();
        assert_eq!(page.value.len(), 1);
        assert!(page.next_link.unwrap().ends_with("$skiptoken=x"));
    }
}
