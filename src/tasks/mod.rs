//! In-memory to-do list.
//!
//! Tasks live only as long as the `TaskList` value. Every change goes
//! through `TaskList::apply`, which consumes the list and returns the next
//! one.

pub mod templates;

use tracing::debug;
use uuid::Uuid;

use crate::models::{Priority, Task};

#[derive(Debug, Clone, PartialEq)]
pub enum TaskEvent {
    Add { text: String, priority: Priority },
    Toggle(Uuid),
    Delete(Uuid),
    ClearCompleted,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TaskList {
    tasks: Vec<Task>,
}

impl TaskList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply one event. Blank text and unknown ids leave the list unchanged.
    pub fn apply(mut self, event: TaskEvent) -> Self {
        match event {
            TaskEvent::Add { text, priority } => {
                let text = text.trim();
                if text.is_empty() {
                    debug!("Ignoring blank task");
                } else {
                    self.tasks.push(Task::new(text, priority));
                }
            }
            TaskEvent::Toggle(id) => {
                if let Some(task) = self.tasks.iter_mut().find(|t| t.id == id) {
                    task.completed = !task.completed;
                }
            }
            TaskEvent::Delete(id) => self.tasks.retain(|t| t.id != id),
            TaskEvent::ClearCompleted => self.tasks.retain(|t| !t.completed),
        }
        self
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn get(&self, id: Uuid) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    /// Number of tasks not yet completed.
    pub fn remaining(&self) -> usize {
        self.tasks.iter().filter(|t| !t.completed).count()
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn add(list: TaskList, text: &str) -> TaskList {
        list.apply(TaskEvent::Add {
            text: text.to_string(),
            priority: Priority::Medium,
        })
    }

    #[test]
    fn test_add_trims_and_ignores_blank() {
        let list = add(TaskList::new(), "  buy milk ");
        let list = add(list, "   ");
        assert_eq!(list.len(), 1);
        assert_eq!(list.tasks()[0].text, "buy milk");
        assert!(!list.tasks()[0].completed);
    }

    #[test]
    fn test_toggle_flips_completion() {
        let list = add(TaskList::new(), "call the bank");
        let id = list.tasks()[0].id;

        let list = list.apply(TaskEvent::Toggle(id));
        assert!(list.get(id).unwrap().completed);
        assert_eq!(list.remaining(), 0);

        let list = list.apply(TaskEvent::Toggle(id));
        assert!(!list.get(id).unwrap().completed);
    }

    #[test]
    fn test_unknown_id_is_noop() {
        let list = add(TaskList::new(), "gym");
        let before = list.clone();
        let list = list
            .apply(TaskEvent::Toggle(Uuid::new_v4()))
            .apply(TaskEvent::Delete(Uuid::new_v4()));
        assert_eq!(list, before);
    }

    #[test]
    fn test_delete_and_clear_completed() {
        let list = ["a task", "b task", "c task"]
            .into_iter()
            .fold(TaskList::new(), add);
        let ids: Vec<Uuid> = list.tasks().iter().map(|t| t.id).collect();

        let list = list.apply(TaskEvent::Delete(ids[0]));
        assert_eq!(list.len(), 2);

        let list = list
            .apply(TaskEvent::Toggle(ids[1]))
            .apply(TaskEvent::ClearCompleted);
        assert_eq!(list.len(), 1);
        assert_eq!(list.tasks()[0].id, ids[2]);
    }
}
