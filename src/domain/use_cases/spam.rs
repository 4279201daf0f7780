use regex::Regex;

/// One named pattern rule. Rules are checked in order and the first match
/// wins, so the rule name can be logged.
#[derive(Debug)]
pub struct SpamRule {
    name: &'static str,
    pattern: Regex,
}

impl SpamRule {
    pub fn new(name: &'static str, pattern: &str) -> Self {
        SpamRule {
            name,
            pattern: Regex::new(pattern).expect("spam rule pattern must compile"),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn matches(&self, text: &str) -> bool {
        self.pattern.is_match(text)
    }
}

/// Ordered list of pattern rules applied to user-supplied text.
#[derive(Debug)]
pub struct SpamFilter {
    rules: Vec<SpamRule>,
}

impl SpamFilter {
    pub fn with_rules(rules: Vec<SpamRule>) -> Self {
        SpamFilter { rules }
    }

    /// Name of the first rule matching any of the given texts.
    pub fn first_match(&self, texts: &[&str]) -> Option<&'static str> {
        self.rules
            .iter()
            .find(|rule| texts.iter().any(|text| rule.matches(text)))
            .map(SpamRule::name)
    }
}

impl Default for SpamFilter {
    fn default() -> Self {
        SpamFilter::with_rules(vec![
            SpamRule::new("script-tag", r"(?i)<script"),
            SpamRule::new("javascript-scheme", r"(?i)javascript:"),
            SpamRule::new("iframe-tag", r"(?i)<iframe"),
            SpamRule::new("bbcode-url", r"(?i)\[url="),
            SpamRule::new("bbcode-link", r"(?i)\[link="),
            SpamRule::new("spam-keywords", r"(?i)viagra|cialis|casino|poker"),
        ])
    }
}
