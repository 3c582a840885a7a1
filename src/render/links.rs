//! Asset link rewriting for embedded markup.

/// Prefix every `src="/content/dam...` attribute with the author base URL.
///
/// Applied to text fields that carry raw HTML before they are emitted, so
/// asset references stored relative to the repository resolve against the
/// authoring host. Idempotent: once rewritten the attribute no longer starts
/// with `/content/dam`, and an empty base URL leaves the input untouched.
pub fn rewrite_asset_links(html: &str, author_base_url: &str) -> String {
    if author_base_url.is_empty() {
        return html.to_string();
    }
    html.replace(
        "src=\"/content/dam",
        &format!("src=\"{author_base_url}/content/dam"),
    )
}
