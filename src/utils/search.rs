//! Client-side search over cached matches and tasks
//!
//! Pure functions; nothing here touches the network.

use crate::models::{Match, Task};

/// Lowercased search needle, or `None` for a blank term
fn needle(term: &str) -> Option<String> {
    let term = term.trim();
    (!term.is_empty()).then(|| term.to_lowercase())
}

/// Tasks whose title or description contains `term`, ignoring case
pub fn filter_tasks<'a>(tasks: &'a [Task], term: &str) -> Vec<&'a Task> {
    match needle(term) {
        None => tasks.iter().collect(),
        Some(needle) => tasks.iter().filter(|task| task.matches_term(&needle)).collect(),
    }
}

/// Matches whose task title contains `term` (ignoring case), or whose id contains it
pub fn filter_matches<'a>(matches: &'a [Match], tasks: &[Task], term: &str) -> Vec<&'a Match> {
    let Some(needle) = needle(term) else {
        return matches.iter().collect();
    };

    matches
        .iter()
        .filter(|m| {
            let title_hit = tasks
                .iter()
                .find(|task| task.id == m.task_id)
                .is_some_and(|task| task.title.to_lowercase().contains(&needle));
            title_hit || m.id.to_string().contains(&needle)
        })
        .collect()
}
