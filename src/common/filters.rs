// src/common/filters.rs

/// Case-insensitive substring filter on `title`. Results are always ordered by id.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TitleFilter {
    needle: Option<String>,
}

impl TitleFilter {
    pub fn new(title: Option<&str>) -> Self {
        // An empty parameter means no filtering
        let needle = title.filter(|t| !t.is_empty()).map(str::to_lowercase);
        Self { needle }
    }

    pub fn is_active(&self) -> bool {
        self.needle.is_some()
    }

    /// Pattern for `title ILIKE $n`, with LIKE wildcards escaped.
    pub fn like_pattern(&self) -> Option<String> {
        self.needle.as_ref().map(|needle| {
            let mut pattern = String::with_capacity(needle.len() + 2);
            pattern.push('%');
            for c in needle.chars() {
                if matches!(c, '%' | '_' | '\\') {
                    pattern.push('\\');
                }
                pattern.push(c);
            }
            pattern.push('%');
            pattern
        })
    }

    pub fn matches(&self, title: &str) -> bool {
        match &self.needle {
            Some(needle) => title.to_lowercase().contains(needle.as_str()),
            None => true,
        }
    }
}
