use std::fmt;
use std::hash;

/// A header name. Comparison and hashing ignore ASCII case.
#[derive(Debug, Clone)]
pub struct Header(String);

impl Header {
    pub fn new(s: &str) -> Self {
        Self(s.to_string())
    }
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl PartialEq for Header {
    fn eq(&self, other: &Self) -> bool {
        self.0.eq_ignore_ascii_case(&other.0)
    }
}

impl Eq for Header {}

impl hash::Hash for Header {
    fn hash<H: hash::Hasher>(&self, state: &mut H) {
        self.0.to_ascii_lowercase().hash(state);
    }
}

impl fmt::Display for Header {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for Header {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for Header {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<Header> for String {
    fn from(s: Header) -> Self {
        s.0
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_header_case_insensitive() {
        assert_eq!(Header::new("Content-Type"), Header::new("content-type"));
        let mut headers = HashMap::new();
        headers.insert(Header::new("X-Api-Key"), "secret".to_string());
        assert_eq!(
            headers.get(&Header::new("x-api-key")),
            Some(&"secret".to_string())
        );
    }

    #[test]
    fn test_header_keeps_spelling() {
        assert_eq!(Header::new("Content-Length").to_string(), "Content-Length");
    }
}
