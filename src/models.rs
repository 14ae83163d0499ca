use std::fmt;

use serde::{Deserialize, Serialize, Serializer};

pub const UNKNOWN_AUTHOR: &str = "Unknown author";
pub const PRICE_UNAVAILABLE: &str = "Price not available";

/// A lower-cased topical term used to query the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct Keyword(String);

impl Keyword {
    pub fn new(term: impl AsRef<str>) -> Self {
        Self(term.as_ref().to_lowercase())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Keyword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Price {
    Yen(u64),
    Unavailable,
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Price::Yen(amount) => write!(f, "¥{amount}"),
            Price::Unavailable => f.write_str(PRICE_UNAVAILABLE),
        }
    }
}

impl Serialize for Price {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// One catalog result, tagged with the keyword that found it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RawHit {
    pub title: String,
    pub author: String,
    pub price: Price,
    #[serde(rename = "imageUrl")]
    pub image_url: String,
    pub keyword: Keyword,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ChatRequest {
    #[serde(default)]
    pub message: Option<String>,
}

impl ChatRequest {
    /// Lenient decode: anything that is not `{"message": "<string>"}` is an empty message.
    pub fn from_body(body: &[u8]) -> Self {
        serde_json::from_slice(body).unwrap_or_default()
    }

    pub fn into_message(self) -> String {
        self.message.unwrap_or_default()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ChatReply {
    #[serde(rename = "response")]
    pub reply_text: String,
    pub keywords: Vec<Keyword>,
    #[serde(rename = "books")]
    pub recommendations: Vec<RawHit>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keyword_is_lowercased() {
        assert_eq!(Keyword::new("Mystery").as_str(), "mystery");
    }

    #[test]
    fn price_renders_for_display() {
        assert_eq!(Price::Yen(1540).to_string(), "¥1540");
        assert_eq!(Price::Unavailable.to_string(), "Price not available");
    }

    #[test]
    fn raw_hit_uses_wire_field_names() {
        let hit = RawHit {
            title: "Dune".to_string(),
            author: "Frank Herbert".to_string(),
            price: Price::Yen(990),
            image_url: "https://img/dune.jpg".to_string(),
            keyword: Keyword::new("science"),
        };

        let value = serde_json::to_value(&hit).unwrap();
        assert_eq!(value["imageUrl"], "https://img/dune.jpg");
        assert_eq!(value["price"], "¥990");
        assert_eq!(value["keyword"], "science");
    }

    #[test]
    fn malformed_request_body_is_empty_message() {
        assert_eq!(ChatRequest::from_body(b"not json").into_message(), "");
        assert_eq!(ChatRequest::from_body(b"{}").into_message(), "");
        assert_eq!(ChatRequest::from_body(b"{\"message\": 42}").into_message(), "");
        assert_eq!(
            ChatRequest::from_body(b"{\"message\": \"hi\"}").into_message(),
            "hi"
        );
    }
}
