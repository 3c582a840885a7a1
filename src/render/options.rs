//! Rendering options and configuration.

/// Options for rendering a node tree to HTML.
#[derive(Debug, Clone)]
pub struct RenderOptions {
    /// Base URL prepended to asset paths. Image sources and `src` attributes
    /// pointing into `/content/dam` are rewritten against it. Empty means
    /// paths are emitted as-is.
    pub author_base_url: String,
}

impl RenderOptions {
    /// Create new render options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the author base URL. A trailing slash is stripped so joining
    /// with absolute asset paths stays clean.
    pub fn with_author_base_url(mut self, url: impl Into<String>) -> Self {
        let mut url = url.into();
        while url.ends_with('/') {
            url.pop();
        }
        self.author_base_url = url;
        self
    }
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            author_base_url: String::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_options_builder() {
        let options = RenderOptions::new().with_author_base_url("https://author.example.com");
        assert_eq!(options.author_base_url, "https://author.example.com");
    }

    #[test]
    fn test_trailing_slash_stripped() {
        let options = RenderOptions::new().with_author_base_url("https://author.example.com/");
        assert_eq!(options.author_base_url, "https://author.example.com");
    }
}
