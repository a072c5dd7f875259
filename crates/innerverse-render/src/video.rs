//! Video locator parsing.

use regex::Regex;

/// Extract a video identifier from a locator string.
///
/// Full-URL patterns are tried first; a string that matches none of them is
/// accepted only when it is itself a bare 11-character identifier token.
pub fn extract_video_id(locator: &str) -> Option<String> {
    let locator = locator.trim();
    let url_patterns = [
        r"(?:youtube\.com/watch\?v=)([A-Za-z0-9_-]{11})",
        r"(?:youtu\.be/)([A-Za-z0-9_-]{11})",
        r"(?:youtube\.com/embed/)([A-Za-z0-9_-]{11})",
    ];
    for pattern in url_patterns {
        let Ok(regex) = Regex::new(pattern) else {
            continue;
        };
        if let Some(captures) = regex.captures(locator) {
            return Some(captures[1].to_string());
        }
    }
    let Ok(bare) = Regex::new(r"^[A-Za-z0-9_-]{11}$") else {
        return None;
    };
    if bare.is_match(locator) {
        return Some(locator.to_string());
    }
    None
}

#[cfg(test)]
mod tests {
    use super::extract_video_id;
    use pretty_assertions::assert_eq;

    #[test]
    fn extracts_from_watch_url() {
        assert_eq!(
            extract_video_id("https://www.youtube.com/watch?v=dQw4w9WgXcQ"),
            Some("dQw4w9WgXcQ".to_string())
        );
    }

    #[test]
    fn extracts_from_short_and_embed_urls() {
        assert_eq!(
            extract_video_id("https://youtu.be/dQw4w9WgXcQ"),
            Some("dQw4w9WgXcQ".to_string())
        );
        assert_eq!(
            extract_video_id("https://www.youtube.com/embed/dQw4w9WgXcQ?rel=0"),
            Some("dQw4w9WgXcQ".to_string())
        );
    }

    #[test]
    fn accepts_bare_identifier_token() {
        assert_eq!(
            extract_video_id("dQw4w9WgXcQ"),
            Some("dQw4w9WgXcQ".to_string())
        );
    }

    #[test]
    fn rejects_everything_else() {
        assert_eq!(extract_video_id("not a url"), None);
        assert_eq!(extract_video_id(""), None);
        assert_eq!(extract_video_id("short"), None);
    }
}
