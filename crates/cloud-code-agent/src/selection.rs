use cloud_code_core::{ReportStatus, ReportingDocument, Task};

/// Picks the next eligible task to run, given the agent's pending tasks and
/// its own reporting document.
///
/// A task is eligible when its existing report (if any) is not terminal and
/// every task it depends on has already reached `completed`. Eligible tasks
/// are ordered by priority (critical first), ties broken by their original
/// position in `tasks`.
pub fn select_next_task(tasks: &[Task], reporting: &ReportingDocument) -> Option<Task> {
    let mut candidates: Vec<(usize, &Task)> = tasks
        .iter()
        .enumerate()
        .filter(|(_, task)| {
            !matches!(
                reporting.report(&task.id).map(|r| r.status),
                Some(ReportStatus::Completed) | Some(ReportStatus::Failed) | Some(ReportStatus::Blocked)
            )
        })
        .filter(|(_, task)| {
            task.depends_on.iter().all(|dep| {
                reporting
                    .report(dep)
                    .is_some_and(|r| r.status == ReportStatus::Completed)
            })
        })
        .collect();

    candidates.sort_by(|a, b| b.1.priority.cmp(&a.1.priority).then(a.0.cmp(&b.0)));
    candidates.into_iter().next().map(|(_, task)| task.clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use cloud_code_core::{Priority, TaskReport};

    fn task(id: &str, priority: Priority) -> Task {
        Task::new(id, id, "branch").with_priority(priority)
    }

    #[test]
    fn prefers_higher_priority() {
        let tasks = vec![task("low", Priority::Low), task("crit", Priority::Critical)];
        let reporting = ReportingDocument::new("backend", "agent-1");
        let picked = select_next_task(&tasks, &reporting).unwrap();
        assert_eq!(picked.id, "crit");
    }

    #[test]
    fn ties_keep_original_order() {
        let tasks = vec![task("a", Priority::Medium), task("b", Priority::Medium)];
        let reporting = ReportingDocument::new("backend", "agent-1");
        let picked = select_next_task(&tasks, &reporting).unwrap();
        assert_eq!(picked.id, "a");
    }

    #[test]
    fn skips_tasks_already_terminal() {
        let tasks = vec![task("done", Priority::Critical), task("todo", Priority::Low)];
        let mut reporting = ReportingDocument::new("backend", "agent-1");
        let mut report = TaskReport::new();
        report.status = ReportStatus::Completed;
        reporting.tasks.insert("done".to_string(), report);

        let picked = select_next_task(&tasks, &reporting).unwrap();
        assert_eq!(picked.id, "todo");
    }

    #[test]
    fn skips_tasks_with_unmet_dependencies() {
        let blocked_task = task("b", Priority::Critical).depends_on("a");
        let tasks = vec![blocked_task];
        let reporting = ReportingDocument::new("backend", "agent-1");
        assert!(select_next_task(&tasks, &reporting).is_none());
    }

    #[test]
    fn runs_once_dependency_completes() {
        let blocked_task = task("b", Priority::Critical).depends_on("a");
        let tasks = vec![blocked_task];
        let mut reporting = ReportingDocument::new("backend", "agent-1");
        let mut report = TaskReport::new();
        report.status = ReportStatus::Completed;
        reporting.tasks.insert("a".to_string(), report);

        let picked = select_next_task(&tasks, &reporting).unwrap();
        assert_eq!(picked.id, "b");
    }
}
