use url::Url;

/// URL schemes a payload may use to be shown as an image.
const IMAGE_SCHEMES: [&str; 5] = ["http", "https", "ftp", "file", "jar"];

/// Raw content decoded from a tag.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Payload {
    /// The decoded string, exactly as read.
    pub raw_value: String,
    /// Explicit URL field, for tag formats that carry a typed URL record.
    pub url: Option<String>,
}

impl Payload {
    pub fn new(raw_value: impl Into<String>) -> Self {
        Self {
            raw_value: raw_value.into(),
            url: None,
        }
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }
}

/// Identifies what a tag should display. Used as the asset cache index.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PresentationKey {
    Image { url: Url },
    Text { text: String },
}

impl PresentationKey {
    pub fn image(url: Url) -> Self {
        Self::Image { url }
    }

    pub fn text(text: impl Into<String>) -> Self {
        Self::Text { text: text.into() }
    }

    /// Derive the key for a payload.
    ///
    /// A non-empty explicit URL field wins if it parses; otherwise the raw
    /// value is tried as a URL; otherwise the raw value is shown as text.
    /// Free text that happens to parse as a URL is therefore shown as an image.
    pub fn from_payload(payload: &Payload) -> Self {
        let explicit = payload
            .url
            .as_deref()
            .filter(|u| !u.is_empty())
            .and_then(parse_url);

        match explicit.or_else(|| parse_url(&payload.raw_value)) {
            Some(url) => Self::Image { url },
            None => Self::Text {
                text: payload.raw_value.clone(),
            },
        }
    }

    pub fn is_image(&self) -> bool {
        matches!(self, Self::Image { .. })
    }
}

/// Parse `input` as an absolute URL with one of the supported schemes.
pub fn parse_url(input: &str) -> Option<Url> {
    let url = match Url::parse(input) {
        Ok(url) => url,
        Err(e) => {
            tracing::trace!(input, error = %e, "Payload is not a URL");
            return None;
        }
    };
    IMAGE_SCHEMES
        .contains(&url.scheme())
        .then_some(url)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_raw_url_becomes_image_key() {
        let key = PresentationKey::from_payload(&Payload::new("http://x/a.png"));
        assert_eq!(
            key,
            PresentationKey::image(Url::parse("http://x/a.png").unwrap())
        );
        assert!(key.is_image());
    }

    #[test]
    fn test_plain_text_becomes_text_key() {
        let key = PresentationKey::from_payload(&Payload::new("hello world"));
        assert_eq!(key, PresentationKey::text("hello world"));
    }

    #[test]
    fn test_explicit_url_takes_precedence() {
        let payload =
            Payload::new("https://raw.example/b.png").with_url("https://typed.example/a.png");
        match PresentationKey::from_payload(&payload) {
            PresentationKey::Image { url } => assert_eq!(url.host_str(), Some("typed.example")),
            other => panic!("expected image key, got {other:?}"),
        }
    }

    #[test]
    fn test_empty_or_invalid_explicit_url_falls_back_to_raw() {
        let payload = Payload::new("https://raw.example/b.png").with_url("");
        assert!(PresentationKey::from_payload(&payload).is_image());

        let payload = Payload::new("just text").with_url("not a url");
        assert_eq!(
            PresentationKey::from_payload(&payload),
            PresentationKey::text("just text")
        );
    }

    #[test]
    fn test_unsupported_scheme_is_text() {
        assert!(parse_url("mailto:someone@example.com").is_none());
        assert!(parse_url("note: buy milk").is_none());
        assert!(parse_url("ftp://files.example/pic.png").is_some());
    }

    #[test]
    fn test_key_equality_is_structural() {
        assert_eq!(PresentationKey::text("a"), PresentationKey::text("a"));
        assert_ne!(PresentationKey::text("a"), PresentationKey::text("b"));
        let a = parse_url("http://x/a.png").unwrap();
        let b = parse_url("http://x/a.png").unwrap();
        assert_eq!(PresentationKey::image(a), PresentationKey::image(b));
    }
}
