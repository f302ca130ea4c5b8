use unicode_segmentation::UnicodeSegmentation;

#[derive(Debug, Clone)]
pub struct RecipientName(String);

impl RecipientName {
    /// Any non-blank name of up to 256 graphemes. Names are shown as the CRM
    /// stores them, so punctuation is allowed; templates escape it.
    pub fn parse(s: String) -> Result<RecipientName, String> {
        let is_empty_or_whitespace = s.trim().is_empty();
        let is_too_long = s.graphemes(true).count() > 256;

        if is_empty_or_whitespace || is_too_long {
            Err(format!("{} is not a valid recipient name.", s))
        } else {
            Ok(Self(s))
        }
    }
}

impl AsRef<str> for RecipientName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
