use unicode_width::UnicodeWidthStr;

pub struct TextMetrics {
    pub char_width: f64,
    pub line_height: f64,
    pub padding: f64,
    pub min_radius: f64,
    /// Labels wider than this wrap onto further lines.
    pub max_line_width: f64,
}

impl Default for TextMetrics {
    fn default() -> Self {
        Self {
            char_width: 7.5,
            line_height: 15.0,
            padding: 8.0,
            min_radius: 30.0,
            max_line_width: 120.0,
        }
    }
}

impl TextMetrics {
    pub fn text_width(&self, text: &str) -> f64 {
        let width = UnicodeWidthStr::width(text);
        width as f64 * self.char_width
    }

    /// Greedy word wrap by display width. A single word wider than the
    /// limit keeps a line of its own.
    pub fn wrap_label(&self, label: &str) -> Vec<String> {
        let mut lines: Vec<String> = Vec::new();
        let mut current = String::new();

        for word in label.split_whitespace() {
            if current.is_empty() {
                current.push_str(word);
                continue;
            }
            let candidate = format!("{} {}", current, word);
            if self.text_width(&candidate) <= self.max_line_width {
                current = candidate;
            } else {
                lines.push(std::mem::take(&mut current));
                current.push_str(word);
            }
        }

        if !current.is_empty() {
            lines.push(current);
        }
        lines
    }

    /// Radius of a circle that fits the wrapped label lines.
    pub fn node_radius(&self, lines: &[String]) -> f64 {
        let widest = lines
            .iter()
            .map(|l| self.text_width(l))
            .fold(0.0, f64::max);
        let half_w = widest / 2.0 + self.padding;
        let half_h = lines.len() as f64 * self.line_height / 2.0 + self.padding;

        (half_w * half_w + half_h * half_h).sqrt().max(self.min_radius)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ascii_width() {
        let m = TextMetrics::default();
        assert_eq!(m.text_width("Goal"), 4.0 * 7.5);
    }

    #[test]
    fn test_unicode_width() {
        let m = TextMetrics::default();
        // 全角文字は幅2
        assert_eq!(m.text_width("目標"), 4.0 * 7.5);
    }

    #[test]
    fn test_wrap_short_label() {
        let m = TextMetrics::default();
        assert_eq!(m.wrap_label("Run 5k"), vec!["Run 5k"]);
    }

    #[test]
    fn test_wrap_long_label() {
        let m = TextMetrics::default();
        let lines = m.wrap_label("Build endurance with three long runs every single week");
        assert!(lines.len() > 1);
        assert!(lines.iter().all(|l| m.text_width(l) <= m.max_line_width));
        assert_eq!(
            lines.join(" "),
            "Build endurance with three long runs every single week"
        );
    }

    #[test]
    fn test_wrap_overlong_word() {
        let m = TextMetrics::default();
        let word = "x".repeat(40);
        assert_eq!(m.wrap_label(&format!("a {word} b")), vec!["a".to_string(), word, "b".to_string()]);
    }

    #[test]
    fn test_wrap_empty_label() {
        let m = TextMetrics::default();
        assert!(m.wrap_label("   ").is_empty());
    }

    #[test]
    fn test_node_radius() {
        let m = TextMetrics::default();
        assert_eq!(m.node_radius(&[]), m.min_radius);
        let big = m.node_radius(&m.wrap_label("Build endurance with three long runs every week"));
        assert!(big > m.min_radius);
    }
}
