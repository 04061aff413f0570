const SUCCESS_KEYWORDS: &[&str] = &["completed", "done", "finished", "success"];
const MAX_SUMMARY_CHARS: usize = 200;

/// Extracts a human-readable summary from a coding tool's raw output: the
/// last non-empty line mentioning a success keyword, or failing that the
/// last non-empty line overall, truncated to 200 characters.
pub fn extract_summary(output: &str) -> String {
    let lines: Vec<&str> = output.lines().map(str::trim).filter(|l| !l.is_empty()).collect();

    let chosen = lines
        .iter()
        .rev()
        .find(|line| {
            let lower = line.to_lowercase();
            SUCCESS_KEYWORDS.iter().any(|k| lower.contains(k))
        })
        .or_else(|| lines.last())
        .copied()
        .unwrap_or_default();

    truncate(chosen)
}

fn truncate(s: &str) -> String {
    if s.chars().count() <= MAX_SUMMARY_CHARS {
        s.to_string()
    } else {
        s.chars().take(MAX_SUMMARY_CHARS).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prefers_the_last_line_mentioning_a_success_keyword() {
        let output = "working...\nfinished implementing retry logic\nextra trailing noise";
        assert_eq!(extract_summary(output), "finished implementing retry logic");
    }

    #[test]
    fn falls_back_to_last_non_empty_line() {
        let output = "step one\nstep two\n\n";
        assert_eq!(extract_summary(output), "step two");
    }

    #[test]
    fn truncates_to_200_characters() {
        let long_line = "x".repeat(250);
        let summary = extract_summary(&long_line);
        assert_eq!(summary.chars().count(), 200);
    }
}
