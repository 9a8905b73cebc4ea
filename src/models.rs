//! Data models and structures
//!
//! Defines the keyword input, the rendered prompt pair and the couplet
//! returned to callers, plus the coercion rules shared by inbound bodies and
//! model payloads.

use serde::Serialize;
use serde_json::Value;

pub const KEYWORD1_FALLBACK: &str = "南开";
pub const KEYWORD2_FALLBACK: &str = "顺遂";

/// Render a loosely typed JSON value as text.
///
/// Strings pass through, non-zero numbers use their decimal form and `true`
/// becomes `"true"`. `null`, `false`, zero, arrays and objects count as absent.
pub fn coerce_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) if n.as_f64() == Some(0.0) => None,
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(true) => Some("true".to_string()),
        _ => None,
    }
}

/// Field names accepted for each keyword slot of the inbound body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeywordAliases {
    pub keyword1: Vec<String>,
    pub keyword2: Vec<String>,
    pub horizontal: Vec<String>,
}

impl Default for KeywordAliases {
    fn default() -> Self {
        Self {
            keyword1: to_owned_list(&["keyword1", "k1", "keyword_1"]),
            keyword2: to_owned_list(&["keyword2", "k2", "keyword_2"]),
            horizontal: to_owned_list(&["horizontalKeyword", "horizontal", "h"]),
        }
    }
}

impl KeywordAliases {
    /// Parse a comma separated alias list, dropping blank entries.
    pub fn parse_list(raw: &str) -> Vec<String> {
        raw.split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(String::from)
            .collect()
    }

    /// First alias whose value is present and not `null`.
    fn lookup<'a>(body: &'a Value, aliases: &[String]) -> Option<&'a Value> {
        aliases
            .iter()
            .filter_map(|alias| body.get(alias))
            .find(|value| !value.is_null())
    }
}

fn to_owned_list(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

/// Keywords as they arrived in the request body, before defaults apply.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeywordRequest {
    pub keyword1: Option<String>,
    pub keyword2: Option<String>,
    /// Accepted for client compatibility; the caption is always model-written.
    pub horizontal_hint: Option<String>,
}

impl KeywordRequest {
    pub fn from_body(body: &Value, aliases: &KeywordAliases) -> Self {
        let pick = |names: &[String]| KeywordAliases::lookup(body, names).and_then(coerce_text);

        Self {
            keyword1: pick(&aliases.keyword1),
            keyword2: pick(&aliases.keyword2),
            horizontal_hint: pick(&aliases.horizontal),
        }
    }

    pub fn into_pair(self) -> KeywordPair {
        KeywordPair::sanitize(self.keyword1.as_deref(), self.keyword2.as_deref())
    }
}

/// Two keywords, both guaranteed non-empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeywordPair {
    pub keyword1: String,
    pub keyword2: String,
}

impl KeywordPair {
    pub fn sanitize(keyword1: Option<&str>, keyword2: Option<&str>) -> Self {
        Self {
            keyword1: sanitize_keyword(keyword1, KEYWORD1_FALLBACK),
            keyword2: sanitize_keyword(keyword2, KEYWORD2_FALLBACK),
        }
    }
}

impl Default for KeywordPair {
    fn default() -> Self {
        Self::sanitize(None, None)
    }
}

fn sanitize_keyword(raw: Option<&str>, fallback: &str) -> String {
    match raw.map(str::trim) {
        Some(s) if !s.is_empty() => s.to_string(),
        _ => fallback.to_string(),
    }
}

/// System and user instructions sent to the model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptPair {
    pub system: String,
    pub user: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Couplet {
    pub upper: String,
    pub lower: String,
    pub horizontal: String,
}

impl Couplet {
    /// Build a couplet from a decoded model payload.
    ///
    /// Returns `None` unless all three fields are non-empty after trimming.
    pub fn from_payload(payload: &Value) -> Option<Self> {
        let field = |name: &str| {
            payload
                .get(name)
                .and_then(coerce_text)
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
        };

        Some(Self {
            upper: field("upper")?,
            lower: field("lower")?,
            horizontal: field("horizontal")?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_sanitize_applies_fallbacks() {
        let pair = KeywordPair::sanitize(Some("   "), None);
        assert_eq!(pair.keyword1, KEYWORD1_FALLBACK);
        assert_eq!(pair.keyword2, KEYWORD2_FALLBACK);
    }

    #[test]
    fn test_sanitize_trims_values() {
        let pair = KeywordPair::sanitize(Some("  绩点 "), Some("上岸\n"));
        assert_eq!(pair.keyword1, "绩点");
        assert_eq!(pair.keyword2, "上岸");
    }

    #[test]
    fn test_keyword_request_accepts_aliases() {
        let aliases = KeywordAliases::default();
        let body = json!({ "k1": "早八", "keyword_2": "二食", "h": "锦鲤" });

        let request = KeywordRequest::from_body(&body, &aliases);
        assert_eq!(
            request,
            KeywordRequest {
                keyword1: Some("早八".to_string()),
                keyword2: Some("二食".to_string()),
                horizontal_hint: Some("锦鲤".to_string()),
            }
        );
    }

    #[test]
    fn test_keyword_request_prefers_first_non_null_alias() {
        let aliases = KeywordAliases::default();
        let body = json!({ "keyword1": null, "k1": "马蹄湖", "keyword2": "", "k2": "新开湖" });

        let request = KeywordRequest::from_body(&body, &aliases);
        assert_eq!(request.keyword1.as_deref(), Some("马蹄湖"));
        // An empty string is present, so later aliases are not consulted.
        assert_eq!(request.keyword2.as_deref(), Some(""));
        assert_eq!(request.into_pair().keyword2, KEYWORD2_FALLBACK);
    }

    #[test]
    fn test_keyword_request_coerces_numbers() {
        let aliases = KeywordAliases::default();
        let body = json!({ "keyword1": 2026, "keyword2": false });

        let pair = KeywordRequest::from_body(&body, &aliases).into_pair();
        assert_eq!(pair.keyword1, "2026");
        assert_eq!(pair.keyword2, KEYWORD2_FALLBACK);
    }

    #[test]
    fn test_zero_counts_as_absent() {
        assert_eq!(coerce_text(&json!(0)), None);
        assert_eq!(coerce_text(&json!(0.0)), None);
        assert_eq!(coerce_text(&json!(-3)), Some("-3".to_string()));

        let aliases = KeywordAliases::default();
        let pair = KeywordRequest::from_body(&json!({ "keyword1": 0 }), &aliases).into_pair();
        assert_eq!(pair.keyword1, KEYWORD1_FALLBACK);

        let payload = json!({ "upper": 0, "lower": "下联", "horizontal": "横批" });
        assert!(Couplet::from_payload(&payload).is_none());
    }

    #[test]
    fn test_keyword_request_from_non_object_is_empty() {
        let aliases = KeywordAliases::default();
        let request = KeywordRequest::from_body(&json!([1, 2, 3]), &aliases);
        assert_eq!(request, KeywordRequest::default());
    }

    #[test]
    fn test_custom_aliases() {
        let aliases = KeywordAliases {
            keyword1: KeywordAliases::parse_list("first, , a"),
            keyword2: KeywordAliases::parse_list("second"),
            horizontal: Vec::new(),
        };
        assert_eq!(aliases.keyword1, vec!["first", "a"]);

        let body = json!({ "a": "津南", "second": "妖风", "keyword1": "ignored" });
        let pair = KeywordRequest::from_body(&body, &aliases).into_pair();
        assert_eq!(pair.keyword1, "津南");
        assert_eq!(pair.keyword2, "妖风");
    }

    #[test]
    fn test_couplet_from_payload_trims_fields() {
        let payload = json!({
            "upper": " 马蹄湖水映朝阳 ",
            "lower": "省身楼前绩点旺",
            "horizontal": "南开锦鲤\n"
        });

        let couplet = Couplet::from_payload(&payload).unwrap();
        assert_eq!(
            couplet,
            Couplet {
                upper: "马蹄湖水映朝阳".to_string(),
                lower: "省身楼前绩点旺".to_string(),
                horizontal: "南开锦鲤".to_string(),
            }
        );
    }

    #[test]
    fn test_couplet_from_payload_rejects_blank_or_missing() {
        assert!(Couplet::from_payload(&json!({ "upper": "a", "lower": "b" })).is_none());
        assert!(
            Couplet::from_payload(&json!({ "upper": "a", "lower": "  ", "horizontal": "c" }))
                .is_none()
        );
        assert!(Couplet::from_payload(&json!("not an object")).is_none());
    }

    #[test]
    fn test_couplet_serialization() {
        let couplet = Couplet {
            upper: "上".to_string(),
            lower: "下".to_string(),
            horizontal: "横".to_string(),
        };
        let json = serde_json::to_value(&couplet).unwrap();
        assert_eq!(json, json!({ "upper": "上", "lower": "下", "horizontal": "横" }));
    }
}
