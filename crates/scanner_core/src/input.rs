/// Splits free-form input into candidate URLs.
///
/// Pieces are separated by any run of whitespace and/or commas. Empty pieces
/// are dropped; order and duplicates are preserved and no URL syntax is checked.
pub fn parse_urls(text: &str) -> Vec<String> {
    text.split(|c: char| c.is_whitespace() || c == ',')
        .map(str::trim)
        .filter(|piece| !piece.is_empty())
        .map(ToOwned::to_owned)
        .collect()
}
