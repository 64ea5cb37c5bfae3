//! Terminal output helpers

/// Render a URL as an OSC 8 hyperlink when stdout supports it, plain cyan otherwise
pub fn terminal_link(url: &str) -> String {
    if supports_hyperlinks::on(supports_hyperlinks::Stream::Stdout) {
        format!("\x1b]8;;{}\x07\x1b[36m{}\x1b[0m\x1b]8;;\x07", url, url)
    } else {
        format!("\x1b[36m{}\x1b[0m", url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_terminal_link_contains_url() {
        let url = "http://localhost:5390/api/v1/health";
        let link = terminal_link(url);
        assert!(link.contains(url));
        assert!(link.contains("\x1b[36m"));
        assert!(link.ends_with("\x1b[0m") || link.ends_with("\x07"));
    }
}
