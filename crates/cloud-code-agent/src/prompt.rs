use cloud_code_core::Task;

/// Builds the prompt handed to the coding tool for `task`: title,
/// description, an optional acceptance-criteria block, an optional
/// related-files block, and the standard execution instructions.
pub fn build_prompt(task: &Task) -> String {
    let mut sections = vec![format!("# {}\n\n{}", task.title, task.description)];

    if !task.acceptance_criteria.is_empty() {
        let items = task
            .acceptance_criteria
            .iter()
            .map(|c| format!("- {c}"))
            .collect::<Vec<_>>()
            .join("\n");
        sections.push(format!("## Acceptance Criteria\n{items}"));
    }

    if !task.context.related_files.is_empty() {
        let items = task
            .context
            .related_files
            .iter()
            .map(|f| format!("- {f}"))
            .collect::<Vec<_>>()
            .join("\n");
        sections.push(format!("## Related Files\n{items}"));
    }

    sections.push(format!(
        "## Instructions\n\
         Read the existing code before making changes. Implement the task \
         described above so that it meets every acceptance criterion. Update \
         or add tests covering the change. Do not commit your work — the \
         agent loop commits on your behalf once you finish. Work on branch \
         `{}`.",
        task.branch
    ));

    sections.join("\n\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use cloud_code_core::Task;

    #[test]
    fn includes_acceptance_criteria_and_related_files_when_present() {
        let mut task = Task::new("t1", "Add retry logic", "cloud-code/issue-7")
            .with_description("Retry flaky network calls.");
        task.acceptance_criteria = vec!["Retries 3 times".to_string()];
        task.context.related_files = vec!["src/http.rs".to_string()];

        let prompt = build_prompt(&task);
        assert!(prompt.contains("Acceptance Criteria"));
        assert!(prompt.contains("Retries 3 times"));
        assert!(prompt.contains("Related Files"));
        assert!(prompt.contains("src/http.rs"));
        assert!(prompt.contains("cloud-code/issue-7"));
    }

    #[test]
    fn omits_empty_optional_sections() {
        let task = Task::new("t1", "Add retry logic", "cloud-code/issue-7");
        let prompt = build_prompt(&task);
        assert!(!prompt.contains("Acceptance Criteria"));
        assert!(!prompt.contains("Related Files"));
    }
}
