use unicode_segmentation::UnicodeSegmentation;

const MAX_CHAR_LENGTH: usize = 256;

/// Name of the external service a user is subscribed to (e.g. "Netflix").
#[derive(Debug, Clone, PartialEq, Eq, Hash, serde::Serialize)]
pub struct ServiceName(String);

impl ServiceName {
    pub fn parse(name: String) -> Result<ServiceName, String> {
        let is_empty_or_whitespace = name.trim().is_empty();
        let is_too_long = name.graphemes(true).count() > MAX_CHAR_LENGTH;

        if is_empty_or_whitespace || is_too_long {
            return Err(format!("{} is not a valid service name", name));
        }

        Ok(Self(name))
    }
}

impl AsRef<str> for ServiceName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
