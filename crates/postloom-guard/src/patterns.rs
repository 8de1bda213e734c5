// SPDX-FileCopyrightText: 2026 Postloom Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Dangerous-substring patterns stripped from incoming topics.
//!
//! Each pattern pairs a regex with the violation text recorded when it
//! fires. Detections are never silent: stripping always leaves a trace in
//! `ValidationResult::violations`.

use std::sync::LazyLock;

use regex::Regex;

/// A dangerous-input pattern and its human-readable violation label.
pub struct DangerPattern {
    pub regex: Regex,
    pub violation: &'static str,
}

/// Patterns checked in order. Order matters for violation reporting only;
/// all patterns are always applied.
pub static DANGER_PATTERNS: LazyLock<Vec<DangerPattern>> = LazyLock::new(|| {
    vec![
        DangerPattern {
            // <script ...> and </script>
            regex: Regex::new(r"(?i)<\s*/?\s*script[^>]*>").unwrap(),
            violation: "script tag removed",
        },
        DangerPattern {
            // onclick=, onload = , onerror= ...
            regex: Regex::new(r"(?i)\bon\w+\s*=").unwrap(),
            violation: "event handler attribute removed",
        },
        DangerPattern {
            // javascript: URIs
            regex: Regex::new(r"(?i)javascript\s*:").unwrap(),
            violation: "javascript URI removed",
        },
        DangerPattern {
            // eval(...), exec(...), system(...), Function(...)
            regex: Regex::new(r"(?i)\b(?:eval|exec|system|function)\s*\(").unwrap(),
            violation: "code execution pattern removed",
        },
        DangerPattern {
            // api_key=..., secret: ..., password=..., token=...
            regex: Regex::new(r"(?i)\b(?:api[_-]?key|secret|password|token)\s*[:=]\s*\S+").unwrap(),
            violation: "credential-like pair removed",
        },
    ]
});

/// Strip every dangerous pattern from `input`, recording one violation per
/// pattern that fired.
///
/// Runs to a fixpoint: removing one pattern can splice the surrounding
/// text into a new match (e.g. a script tag wedged inside an event-handler
/// attribute), so passes repeat until nothing fires. Each removal strictly
/// shrinks the string, so this terminates.
pub fn strip_dangerous(input: &str, violations: &mut Vec<String>) -> String {
    let mut result = input.to_string();
    loop {
        let mut fired = false;
        for pattern in DANGER_PATTERNS.iter() {
            if pattern.regex.is_match(&result) {
                violations.push(pattern.violation.to_string());
                result = pattern.regex.replace_all(&result, "").to_string();
                fired = true;
            }
        }
        if !fired {
            return result;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_script_tags() {
        let mut violations = Vec::new();
        let out = strip_dangerous("hello <script>alert(1)</script> world", &mut violations);
        assert!(!out.contains("<script"));
        assert!(!out.contains("</script"));
        assert_eq!(violations, vec!["script tag removed"]);
    }

    #[test]
    fn strips_event_handlers() {
        let mut violations = Vec::new();
        let out = strip_dangerous("img onerror=alert(1) post about cats", &mut violations);
        assert!(!out.contains("onerror"));
        assert!(violations.iter().any(|v| v.contains("event handler")));
    }

    #[test]
    fn strips_code_execution_calls() {
        let mut violations = Vec::new();
        let out = strip_dangerous("topic eval(document.cookie)", &mut violations);
        assert!(!out.to_lowercase().contains("eval("));
        assert!(violations.iter().any(|v| v.contains("code execution")));
    }

    #[test]
    fn strips_credential_pairs() {
        let mut violations = Vec::new();
        let out = strip_dangerous("post about api_key=sk-12345 leaks", &mut violations);
        assert!(!out.contains("sk-12345"));
        assert!(violations.iter().any(|v| v.contains("credential")));
    }

    #[test]
    fn one_violation_per_pattern_not_per_match() {
        let mut violations = Vec::new();
        strip_dangerous("<script></script><script></script>", &mut violations);
        assert_eq!(violations.len(), 1);
    }

    #[test]
    fn clean_input_passes_untouched() {
        let mut violations = Vec::new();
        let input = "a post about morning coffee rituals";
        let out = strip_dangerous(input, &mut violations);
        assert_eq!(out, input);
        assert!(violations.is_empty());
    }
}
