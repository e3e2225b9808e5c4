//! The task filter chain.
//!
//! Every stage is a pure predicate intersection over the working set, so
//! the order the stages run in cannot change the result — only the count
//! cap is order-sensitive, and it always runs last. An absent criterion
//! makes its stage a no-op, never an error.
//!
//! `today` is an argument rather than a clock read so the overdue
//! predicate is deterministic under test.

use chrono::NaiveDate;

use super::{Task, TaskFilter};

/// Run `tasks` through the filter chain. Input order (the remote's order)
/// is preserved; the cap truncates after every predicate has run.
///
/// `filter.project_name` is ignored here; the engine resolves it to
/// `project_id` before calling.
pub fn apply(mut tasks: Vec<Task>, filter: &TaskFilter, today: NaiveDate) -> Vec<Task> {
    if let Some(project_id) = &filter.project_id {
        tasks.retain(|t| t.project_id.as_deref() == Some(project_id.as_str()));
    }

    if let Some(needle) = &filter.content {
        let needle = needle.to_lowercase();
        tasks.retain(|t| t.content.to_lowercase().contains(&needle));
    }

    if let Some(date) = filter.due_date {
        tasks.retain(|t| t.due_date() == Some(date));
    }

    if let Some(wanted) = filter.overdue {
        // Overdue = strictly before today. Undated tasks match neither
        // polarity.
        tasks.retain(|t| t.due_date().is_some_and(|due| (due < today) == wanted));
    }

    if let Some(labels) = &filter.labels {
        for label in labels {
            let label = label.to_lowercase();
            tasks.retain(|t| t.labels.iter().any(|l| l.to_lowercase() == label));
        }
    }

    if let Some(priority) = filter.priority {
        tasks.retain(|t| t.priority == priority);
    }

    if let Some(limit) = filter.limit {
        tasks.truncate(limit);
    }

    tasks
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::todo::Due;

    fn task(id: &str, content: &str) -> Task {
        Task {
            id: id.to_string(),
            content: content.to_string(),
            description: None,
            project_id: None,
            labels: vec![],
            priority: 1,
            due: None,
        }
    }

    fn with_due(mut t: Task, date: &str) -> Task {
        t.due = Some(Due {
            date: date.to_string(),
        });
        t
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 8, 6).unwrap()
    }

    fn fixture() -> Vec<Task> {
        vec![
            with_due(task("1", "Buy groceries"), "2026-08-01"),
            with_due(
                Task {
                    project_id: Some("p-work".to_string()),
                    labels: vec!["ops".to_string(), "urgent".to_string()],
                    priority: 4,
                    ..task("2", "File expense report")
                },
                "2026-08-20",
            ),
            Task {
                project_id: Some("p-work".to_string()),
                labels: vec!["ops".to_string()],
                priority: 2,
                ..task("3", "Rotate router password")
            },
            with_due(task("4", "Water plants"), "2026-08-06"),
        ]
    }

    fn ids(tasks: &[Task]) -> Vec<&str> {
        tasks.iter().map(|t| t.id.as_str()).collect()
    }

    #[test]
    fn no_filters_is_identity() {
        let result = apply(fixture(), &TaskFilter::default(), today());
        assert_eq!(ids(&result), ["1", "2", "3", "4"]);
    }

    #[test]
    fn project_id_filter() {
        let filter = TaskFilter {
            project_id: Some("p-work".to_string()),
            ..TaskFilter::default()
        };
        assert_eq!(ids(&apply(fixture(), &filter, today())), ["2", "3"]);
    }

    #[test]
    fn content_substring_is_case_insensitive() {
        let filter = TaskFilter {
            content: Some("GROCERIES".to_string()),
            ..TaskFilter::default()
        };
        assert_eq!(ids(&apply(fixture(), &filter, today())), ["1"]);
    }

    #[test]
    fn due_date_exact_match_skips_undated() {
        let filter = TaskFilter {
            due_date: NaiveDate::from_ymd_opt(2026, 8, 6),
            ..TaskFilter::default()
        };
        assert_eq!(ids(&apply(fixture(), &filter, today())), ["4"]);
    }

    #[test]
    fn overdue_partitions_the_due_dated_set() {
        let overdue = apply(
            fixture(),
            &TaskFilter {
                overdue: Some(true),
                ..TaskFilter::default()
            },
            today(),
        );
        let current = apply(
            fixture(),
            &TaskFilter {
                overdue: Some(false),
                ..TaskFilter::default()
            },
            today(),
        );

        // Strictly before today: only task 1. Due today is not overdue.
        assert_eq!(ids(&overdue), ["1"]);
        assert_eq!(ids(&current), ["2", "4"]);

        // Disjoint, and together exactly the due-dated tasks. Task 3 has
        // no due date and appears in neither.
        let mut union = ids(&overdue);
        union.extend(ids(&current));
        union.sort();
        assert_eq!(union, ["1", "2", "4"]);
    }

    #[test]
    fn label_filter_is_conjunctive() {
        let both = TaskFilter {
            labels: Some(vec!["ops".to_string(), "urgent".to_string()]),
            ..TaskFilter::default()
        };
        assert_eq!(ids(&apply(fixture(), &both, today())), ["2"]);

        let three = TaskFilter {
            labels: Some(vec![
                "ops".to_string(),
                "urgent".to_string(),
                "q3".to_string(),
            ]),
            ..TaskFilter::default()
        };
        assert!(apply(fixture(), &three, today()).is_empty());
    }

    #[test]
    fn label_match_ignores_case() {
        let filter = TaskFilter {
            labels: Some(vec!["OPS".to_string()]),
            ..TaskFilter::default()
        };
        assert_eq!(ids(&apply(fixture(), &filter, today())), ["2", "3"]);
    }

    #[test]
    fn priority_exact_match() {
        let filter = TaskFilter {
            priority: Some(4),
            ..TaskFilter::default()
        };
        assert_eq!(ids(&apply(fixture(), &filter, today())), ["2"]);
    }

    #[test]
    fn limit_applies_after_predicates() {
        // limit=1 over a project filter must return the first *filtered*
        // task, not the first task overall.
        let filter = TaskFilter {
            project_id: Some("p-work".to_string()),
            limit: Some(1),
            ..TaskFilter::default()
        };
        assert_eq!(ids(&apply(fixture(), &filter, today())), ["2"]);
    }

    #[test]
    fn limit_zero_means_empty() {
        let filter = TaskFilter {
            limit: Some(0),
            ..TaskFilter::default()
        };
        assert!(apply(fixture(), &filter, today()).is_empty());
    }

    #[test]
    fn limit_beyond_len_is_harmless() {
        let filter = TaskFilter {
            limit: Some(100),
            ..TaskFilter::default()
        };
        assert_eq!(apply(fixture(), &filter, today()).len(), 4);
    }

    #[test]
    fn predicate_order_does_not_change_the_result() {
        // Same criteria, applied one predicate at a time in reverse order,
        // must select the same set the combined chain does.
        let combined = TaskFilter {
            project_id: Some("p-work".to_string()),
            content: Some("e".to_string()),
            labels: Some(vec!["ops".to_string()]),
            priority: Some(4),
            overdue: Some(false),
            ..TaskFilter::default()
        };
        let chained = apply(fixture(), &combined, today());

        let mut reversed = fixture();
        for stage in [
            TaskFilter {
                overdue: Some(false),
                ..TaskFilter::default()
            },
            TaskFilter {
                priority: Some(4),
                ..TaskFilter::default()
            },
            TaskFilter {
                labels: Some(vec!["ops".to_string()]),
                ..TaskFilter::default()
            },
            TaskFilter {
                content: Some("e".to_string()),
                ..TaskFilter::default()
            },
            TaskFilter {
                project_id: Some("p-work".to_string()),
                ..TaskFilter::default()
            },
        ] {
            reversed = apply(reversed, &stage, today());
        }

        assert_eq!(ids(&chained), ids(&reversed));
        assert_eq!(ids(&chained), ["2"]);
    }

    #[test]
    fn malformed_due_date_never_matches_date_filters() {
        let mut tasks = fixture();
        tasks.push(with_due(task("5", "Corrupt due"), "someday"));

        let by_date = TaskFilter {
            due_date: NaiveDate::from_ymd_opt(2026, 8, 6),
            ..TaskFilter::default()
        };
        assert_eq!(ids(&apply(tasks.clone(), &by_date, today())), ["4"]);

        for wanted in [true, false] {
            let by_overdue = TaskFilter {
                overdue: Some(wanted),
                ..TaskFilter::default()
            };
            assert!(!ids(&apply(tasks.clone(), &by_overdue, today())).contains(&"5"));
        }
    }
}
