use crate::domain::project::Project;
use crate::domain::task::Task;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProjectListFilter {
    pub status: Option<String>,
    pub client_id: Option<String>,
    pub query: Option<String>,
}

pub fn apply_project_filters(projects: Vec<Project>, filter: &ProjectListFilter) -> Vec<Project> {
    let status = normalize_scalar(filter.status.as_deref());
    let client_id = normalize_scalar(filter.client_id.as_deref());
    let query = normalize_scalar(filter.query.as_deref());

    projects
        .into_iter()
        .filter(|project| {
            if let Some(status) = status.as_deref() {
                if !project.status.eq_ignore_ascii_case(status) {
                    return false;
                }
            }
            if let Some(client_id) = client_id.as_deref() {
                if project.client_id.as_deref() != Some(client_id) {
                    return false;
                }
            }
            if let Some(query) = query.as_deref() {
                let haystack = format!(
                    "{} {} {}",
                    project.id,
                    project.name,
                    project.description.as_deref().unwrap_or_default()
                )
                .to_ascii_lowercase();
                if !haystack.contains(query) {
                    return false;
                }
            }
            true
        })
        .collect()
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskListFilter {
    pub project_id: Option<String>,
    pub status: Option<String>,
    pub query: Option<String>,
}

pub fn apply_task_filters(tasks: Vec<Task>, filter: &TaskListFilter) -> Vec<Task> {
    let project_id = normalize_scalar(filter.project_id.as_deref());
    let status = normalize_scalar(filter.status.as_deref());
    let query = normalize_scalar(filter.query.as_deref());

    tasks
        .into_iter()
        .filter(|task| {
            if let Some(project_id) = project_id.as_deref() {
                if task.project_id != project_id {
                    return false;
                }
            }
            if let Some(status) = status.as_deref() {
                if !task.status.eq_ignore_ascii_case(status) {
                    return false;
                }
            }
            if let Some(query) = query.as_deref() {
                let haystack = format!("{} {}", task.id, task.title).to_ascii_lowercase();
                if !haystack.contains(query) {
                    return false;
                }
            }
            true
        })
        .collect()
}

fn normalize_scalar(raw: Option<&str>) -> Option<String> {
    let trimmed = raw?.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_ascii_lowercase())
    }
}

#[cfg(test)]
mod tests {
    use super::{apply_project_filters, apply_task_filters, ProjectListFilter, TaskListFilter};
    use crate::domain::project::Project;
    use crate::domain::task::Task;

    fn project(id: &str, name: &str, status: &str, client_id: Option<&str>) -> Project {
        Project {
            id: id.to_string(),
            created_at: "2026-03-01T10:00:00Z".to_string(),
            name: name.to_string(),
            status: status.to_string(),
            client_id: client_id.map(str::to_string),
            budget: None,
            currency: None,
            start_date: None,
            end_date: None,
            description: None,
        }
    }

    fn task(id: &str, title: &str, project_id: &str, status: &str) -> Task {
        Task {
            id: id.to_string(),
            created_at: "2026-03-01T10:00:00Z".to_string(),
            project_id: project_id.to_string(),
            title: title.to_string(),
            status: status.to_string(),
            priority: None,
            due_date: None,
            worker_id: None,
        }
    }

    #[test]
    fn empty_filter_returns_everything() {
        let projects = vec![
            project("p1", "Villa", "planned", None),
            project("p2", "Road", "active", None),
        ];
        let result = apply_project_filters(projects.clone(), &ProjectListFilter::default());
        assert_eq!(result, projects);
    }

    #[test]
    fn filters_projects_by_status_client_and_query() {
        let projects = vec![
            project("p1", "Villa Qadmous", "active", Some("c1")),
            project("p2", "Warehouse", "active", Some("c2")),
            project("p3", "Road", "planned", Some("c1")),
        ];

        let by_status = apply_project_filters(
            projects.clone(),
            &ProjectListFilter {
                status: Some("Active".to_string()),
                ..ProjectListFilter::default()
            },
        );
        assert_eq!(by_status.len(), 2);

        let by_client = apply_project_filters(
            projects.clone(),
            &ProjectListFilter {
                client_id: Some("c1".to_string()),
                ..ProjectListFilter::default()
            },
        );
        assert_eq!(by_client.len(), 2);

        let by_query = apply_project_filters(
            projects,
            &ProjectListFilter {
                query: Some("villa".to_string()),
                ..ProjectListFilter::default()
            },
        );
        assert_eq!(by_query.len(), 1);
        assert_eq!(by_query[0].id, "p1");
    }

    #[test]
    fn filters_tasks_by_project_and_status() {
        let tasks = vec![
            task("t1", "pour slab", "p1", "pending"),
            task("t2", "wiring", "p1", "done"),
            task("t3", "paint", "p2", "pending"),
        ];

        let result = apply_task_filters(
            tasks,
            &TaskListFilter {
                project_id: Some("p1".to_string()),
                status: Some("pending".to_string()),
                query: None,
            },
        );
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].id, "t1");
    }

    #[test]
    fn blank_filter_values_are_ignored() {
        let tasks = vec![task("t1", "pour slab", "p1", "pending")];
        let result = apply_task_filters(
            tasks.clone(),
            &TaskListFilter {
                project_id: Some("  ".to_string()),
                status: None,
                query: Some(String::new()),
            },
        );
        assert_eq!(result, tasks);
    }
}
