use cloud_code_core::{Priority, Task, TaskContext};

/// Sections pulled out of an issue body's markdown structure.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct IssueSections {
    description: String,
    acceptance_criteria: Vec<String>,
    related_files: Vec<String>,
    context_notes: String,
}

enum Section {
    Description,
    AcceptanceCriteria,
    RelatedFiles,
    ContextNotes,
}

/// Splits an issue body into description / acceptance criteria / related
/// files / extra context, keyed off `## `-level markdown headings.
fn extract_sections(body: &str) -> IssueSections {
    let mut sections = IssueSections::default();
    let mut current = Section::Description;
    let mut buf: Vec<&str> = Vec::new();

    for line in body.lines() {
        if let Some(header) = line.strip_prefix("## ") {
            save_section(&mut sections, &current, &buf);
            buf.clear();
            let header = header.trim().to_lowercase();
            current = if header.contains("acceptance") || header.contains("criteria") {
                Section::AcceptanceCriteria
            } else if header.contains("related") || header.contains("files") {
                Section::RelatedFiles
            } else if header.contains("context") {
                Section::ContextNotes
            } else {
                Section::Description
            };
        } else {
            buf.push(line);
        }
    }
    save_section(&mut sections, &current, &buf);
    sections
}

fn save_section(sections: &mut IssueSections, section: &Section, lines: &[&str]) {
    let content = lines.join("\n").trim().to_string();
    match section {
        Section::Description => sections.description = content,
        Section::ContextNotes => sections.context_notes = content,
        Section::AcceptanceCriteria => {
            sections.acceptance_criteria = lines
                .iter()
                .map(|l| l.trim())
                .filter_map(strip_bullet)
                .filter(|s| !s.is_empty())
                .collect();
        }
        Section::RelatedFiles => {
            sections.related_files = lines
                .iter()
                .map(|l| l.trim())
                .filter(|l| l.starts_with('-') || l.starts_with('*'))
                .map(|l| l.trim_start_matches(['-', '*', ' ']).trim().to_string())
                .filter(|path| path.contains('/') || path.contains('.'))
                .collect();
        }
    }
}

/// Strips a leading `-`, `*`, or `N.` bullet marker from an acceptance
/// criterion line. Lines that carry no bullet marker are dropped, matching
/// the reference parser's list-only interpretation of this section.
fn strip_bullet(line: &str) -> Option<String> {
    let starts_with_digit_dot = line
        .split_once('.')
        .map(|(head, _)| !head.is_empty() && head.chars().all(|c| c.is_ascii_digit()))
        .unwrap_or(false);

    if let Some(rest) = line.strip_prefix('-').or_else(|| line.strip_prefix('*')) {
        let rest = rest.trim();
        if !rest.is_empty() {
            return Some(rest.to_string());
        }
    } else if starts_with_digit_dot {
        let rest = line.splitn(2, '.').nth(1).unwrap_or("").trim();
        if !rest.is_empty() {
            return Some(rest.to_string());
        }
    }
    None
}

const AGENT_LABELS: &[(&str, &[&str])] = &[
    ("frontend", &["frontend", "ui", "react", "vue", "angular", "css", "html"]),
    ("backend", &["backend", "api", "server", "database", "python", "node", "go"]),
    ("devops", &["devops", "ci", "cd", "infrastructure", "docker", "kubernetes", "k8s"]),
    ("testing", &["testing", "test", "qa", "e2e", "unit-test"]),
    ("database", &["database", "db", "sql", "migration", "schema"]),
    ("reviewer", &["review", "code-review"]),
];

/// Infers the best `agent_type` from an issue's labels, falling back to
/// keyword matching against title+body, then `"backend"` as a last resort.
pub fn infer_agent_type(labels: &[String], title: &str, body: &str) -> String {
    let labels_lower: Vec<String> = labels.iter().map(|l| l.to_lowercase()).collect();

    for (agent_type, keywords) in AGENT_LABELS {
        if keywords.iter().any(|kw| labels_lower.iter().any(|l| l == kw)) {
            return agent_type.to_string();
        }
    }

    let content = format!("{title} {body}").to_lowercase();
    for (agent_type, keywords) in AGENT_LABELS {
        if keywords.iter().any(|kw| content.contains(kw)) {
            return agent_type.to_string();
        }
    }

    "backend".to_string()
}

const PRIORITY_LABELS: &[(&str, Priority)] = &[
    ("critical", Priority::Critical),
    ("urgent", Priority::Critical),
    ("high", Priority::High),
    ("high-priority", Priority::High),
    ("medium", Priority::Medium),
    ("low", Priority::Low),
    ("low-priority", Priority::Low),
];

/// Infers task priority from an issue's labels, defaulting to `Medium`.
pub fn priority_from_labels(labels: &[String]) -> Priority {
    let labels_lower: Vec<String> = labels.iter().map(|l| l.to_lowercase()).collect();
    for (label, priority) in PRIORITY_LABELS {
        if labels_lower.iter().any(|l| l == label) {
            return *priority;
        }
    }
    Priority::Medium
}

/// Derives the canonical branch name for an issue-backed task.
pub fn branch_for_issue(issue_number: u64) -> String {
    format!("cloud-code/issue-{issue_number}")
}

/// Recovers the issue number `branch_for_issue` encoded, if any. Pull-request
/// review branches (which keep the PR's own head branch name) yield `None`.
pub fn issue_number_from_branch(branch: &str) -> Option<u64> {
    branch.strip_prefix("cloud-code/issue-")?.parse().ok()
}

/// Builds a task from a GitHub issue: generates the id, infers priority,
/// parses acceptance criteria / related files / extra context out of the
/// body, and sets the canonical branch name.
pub fn build_task_from_issue(issue_number: u64, title: &str, body: &str, labels: &[String]) -> Task {
    let sections = extract_sections(body);
    let priority = priority_from_labels(labels);
    let task_id = format!("issue-{issue_number}-{}", &uuid::Uuid::new_v4().simple().to_string()[..8]);

    let mut description = if sections.description.is_empty() {
        body.to_string()
    } else {
        sections.description
    };
    if !sections.context_notes.is_empty() {
        description.push_str("\n\n## Additional Context\n");
        description.push_str(&sections.context_notes);
    }

    Task::new(task_id, title, branch_for_issue(issue_number))
        .with_priority(priority)
        .with_description(description)
        .with_acceptance_criteria(sections.acceptance_criteria)
        .with_context(TaskContext { related_files: sections.related_files, dependencies: Vec::new() })
}

/// Builds a code-review task from a pull request, grounded on the reference
/// implementation's review checklist.
pub fn build_review_task(pr_number: u64, title: &str, body: &str, head_branch: &str) -> Task {
    let task_id = format!("pr-review-{pr_number}-{}", &uuid::Uuid::new_v4().simple().to_string()[..8]);
    let body = if body.is_empty() { "No description provided." } else { body };
    let description = format!(
        "## Code Review Request\n\nReview the changes in PR #{pr_number}.\n\n### PR Description\n{body}\n\n### Review Checklist\n- Code quality and readability\n- Test coverage\n- Security considerations\n- Performance implications\n- Documentation updates needed\n"
    );

    Task::new(task_id, format!("Review: {title}"), head_branch)
        .with_description(description)
        .with_acceptance_criteria(vec![
            "Review all changed files".to_string(),
            "Check for potential bugs or issues".to_string(),
            "Verify test coverage".to_string(),
            "Provide constructive feedback".to_string(),
        ])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sections_are_split_on_headings() {
        let body = "Some intro text\n\n## Acceptance Criteria\n- First thing\n- Second thing\n\n## Related Files\n- src/main.rs\n- README.md\n\n## Context\nExtra notes here";
        let sections = extract_sections(body);
        assert_eq!(sections.description, "Some intro text");
        assert_eq!(sections.acceptance_criteria, vec!["First thing", "Second thing"]);
        assert_eq!(sections.related_files, vec!["src/main.rs", "README.md"]);
        assert_eq!(sections.context_notes, "Extra notes here");
    }

    #[test]
    fn numbered_acceptance_criteria_are_stripped() {
        let body = "## Acceptance Criteria\n1. Do the thing\n2. Do another thing";
        let sections = extract_sections(body);
        assert_eq!(sections.acceptance_criteria, vec!["Do the thing", "Do another thing"]);
    }

    #[test]
    fn agent_type_is_inferred_from_labels_before_content() {
        let labels = vec!["frontend".to_string()];
        assert_eq!(infer_agent_type(&labels, "Fix the API", "server code"), "frontend");
    }

    #[test]
    fn agent_type_falls_back_to_content_keywords() {
        let labels: Vec<String> = vec![];
        assert_eq!(infer_agent_type(&labels, "Add CI pipeline", "docker build steps"), "devops");
    }

    #[test]
    fn agent_type_defaults_to_backend() {
        let labels: Vec<String> = vec![];
        assert_eq!(infer_agent_type(&labels, "Do a thing", "no hints here"), "backend");
    }

    #[test]
    fn priority_defaults_to_medium() {
        assert_eq!(priority_from_labels(&[]), Priority::Medium);
        assert_eq!(priority_from_labels(&["urgent".to_string()]), Priority::Critical);
    }

    #[test]
    fn build_task_from_issue_sets_the_canonical_branch() {
        let labels = vec!["high".to_string()];
        let task = build_task_from_issue(7, "Add retry logic", "## Acceptance Criteria\n- Retries 3 times", &labels);
        assert_eq!(task.branch, "cloud-code/issue-7");
        assert_eq!(task.priority, Priority::High);
        assert!(task.id.starts_with("issue-7-"));
        assert_eq!(task.acceptance_criteria, vec!["Retries 3 times"]);
    }
}
