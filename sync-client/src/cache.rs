//! Local mirror of the user's board, kept in step by stream events.
//!
//! Entries mirror server rows; `subtasks_of` and `resolved_tags` are
//! local-only projections recomputed from the flat maps on read, never sent
//! back to the server.

use crate::sse_client::{Action, StreamEvent};
use log::*;
use serde::Deserialize;
use serde_json::Value;
use std::collections::HashMap;
use uuid::Uuid;

pub type Id = Uuid;

#[derive(Debug, Clone, Deserialize)]
pub struct Task {
    pub id: Id,
    #[serde(default)]
    pub section_id: Option<Id>,
    #[serde(default)]
    pub parent_id: Option<Id>,
    pub title: String,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub status: String,
    pub position: i32,
    #[serde(default)]
    pub tag_ids: Vec<Id>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Section {
    pub id: Id,
    #[serde(default)]
    pub folder_id: Option<Id>,
    pub name: String,
    pub position: i32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Folder {
    pub id: Id,
    pub name: String,
    pub position: i32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SmartFolder {
    pub id: Id,
    pub name: String,
    #[serde(default)]
    pub criteria: Value,
    pub position: i32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Tag {
    pub id: Id,
    pub name: String,
    #[serde(default)]
    pub color: Option<String>,
}

/// One rank entry of a reorder payload.
#[derive(Debug, Clone, Deserialize)]
struct RankEntry {
    id: Id,
    position: i32,
}

#[derive(Debug, Default)]
pub struct EntityCache {
    tasks: HashMap<Id, Task>,
    sections: HashMap<Id, Section>,
    folders: HashMap<Id, Folder>,
    smart_folders: HashMap<Id, SmartFolder>,
    tags: HashMap<Id, Tag>,
}

impl EntityCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the whole mirror from flat query results, used after login
    /// and after a reconnect-triggered refetch.
    pub fn replace_all(
        &mut self,
        tasks: Vec<Task>,
        sections: Vec<Section>,
        folders: Vec<Folder>,
        smart_folders: Vec<SmartFolder>,
        tags: Vec<Tag>,
    ) {
        self.tasks = tasks.into_iter().map(|t| (t.id, t)).collect();
        self.sections = sections.into_iter().map(|s| (s.id, s)).collect();
        self.folders = folders.into_iter().map(|f| (f.id, f)).collect();
        self.smart_folders = smart_folders.into_iter().map(|s| (s.id, s)).collect();
        self.tags = tags.into_iter().map(|t| (t.id, t)).collect();
    }

    /// Merges one pushed change: create/update upsert by id, delete removes,
    /// reorder overwrites `position` for every listed id. Unknown ids in a
    /// reorder are skipped; the payload is authoritative for ranks only.
    pub fn apply(&mut self, event: &StreamEvent) {
        match event {
            StreamEvent::Connected { .. } => {}
            StreamEvent::Task { action, payload } => {
                Self::apply_to(&mut self.tasks, *action, payload)
            }
            StreamEvent::Section { action, payload } => {
                Self::apply_to(&mut self.sections, *action, payload)
            }
            StreamEvent::Folder { action, payload } => {
                Self::apply_to(&mut self.folders, *action, payload)
            }
            StreamEvent::SmartFolder { action, payload } => {
                Self::apply_to(&mut self.smart_folders, *action, payload)
            }
        }
    }

    fn apply_to<T>(entries: &mut HashMap<Id, T>, action: Action, payload: &Value)
    where
        T: for<'de> Deserialize<'de> + HasRank,
    {
        match action {
            Action::Create | Action::Update => match T::deserialize(payload) {
                Ok(entity) => {
                    entries.insert(entity.id(), entity);
                }
                Err(e) => warn!("Dropping unparseable change payload: {e}"),
            },
            Action::Delete => {
                if let Some(id) = payload.get("id").and_then(|v| v.as_str()) {
                    if let Ok(id) = id.parse::<Id>() {
                        entries.remove(&id);
                    }
                }
            }
            Action::Reorder => match Vec::<RankEntry>::deserialize(payload) {
                Ok(ranks) => {
                    for rank in ranks {
                        if let Some(entity) = entries.get_mut(&rank.id) {
                            entity.set_position(rank.position);
                        }
                    }
                }
                Err(e) => warn!("Dropping unparseable reorder payload: {e}"),
            },
        }
    }

    pub fn task(&self, id: &Id) -> Option<&Task> {
        self.tasks.get(id)
    }

    pub fn task_count(&self) -> usize {
        self.tasks.len()
    }

    /// Top-level tasks of one section, in display order. Position ties break
    /// on id so the ordering is stable across tabs.
    pub fn tasks_in_section(&self, section_id: Option<Id>) -> Vec<&Task> {
        let mut tasks: Vec<&Task> = self
            .tasks
            .values()
            .filter(|t| t.section_id == section_id && t.parent_id.is_none())
            .collect();
        tasks.sort_by_key(|t| (t.position, t.id));
        tasks
    }

    /// Subtasks grouped under their parent, in display order.
    pub fn subtasks_of(&self, parent_id: Id) -> Vec<&Task> {
        let mut subtasks: Vec<&Task> = self
            .tasks
            .values()
            .filter(|t| t.parent_id == Some(parent_id))
            .collect();
        subtasks.sort_by_key(|t| (t.position, t.id));
        subtasks
    }

    /// Resolves a task's tag ids against the flat tag list. Ids without a
    /// cached tag are skipped until the next refetch fills them in.
    pub fn resolved_tags(&self, task: &Task) -> Vec<&Tag> {
        task.tag_ids
            .iter()
            .filter_map(|id| self.tags.get(id))
            .collect()
    }

    pub fn sections_ordered(&self) -> Vec<&Section> {
        let mut sections: Vec<&Section> = self.sections.values().collect();
        sections.sort_by_key(|s| (s.position, s.id));
        sections
    }

    pub fn folders_ordered(&self) -> Vec<&Folder> {
        let mut folders: Vec<&Folder> = self.folders.values().collect();
        folders.sort_by_key(|f| (f.position, f.id));
        folders
    }
}

/// Rank access shared by all cached entity types.
trait HasRank {
    fn id(&self) -> Id;
    fn set_position(&mut self, position: i32);
}

macro_rules! impl_has_rank {
    ($($entity:ty),+) => {
        $(impl HasRank for $entity {
            fn id(&self) -> Id {
                self.id
            }

            fn set_position(&mut self, position: i32) {
                self.position = position;
            }
        })+
    };
}

impl_has_rank!(Task, Section, Folder, SmartFolder);

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn task_payload(id: Id, section_id: Id, title: &str, position: i32) -> Value {
        json!({
            "id": id,
            "section_id": section_id,
            "parent_id": null,
            "title": title,
            "status": "todo",
            "position": position,
            "tag_ids": [],
        })
    }

    #[test]
    fn create_update_and_delete_events_upsert_the_mirror() {
        let mut cache = EntityCache::new();
        let section_id = Id::new_v4();
        let task_id = Id::new_v4();

        cache.apply(&StreamEvent::Task {
            action: Action::Create,
            payload: task_payload(task_id, section_id, "Water the plants", 0),
        });
        assert_eq!(cache.task(&task_id).unwrap().title, "Water the plants");

        cache.apply(&StreamEvent::Task {
            action: Action::Update,
            payload: task_payload(task_id, section_id, "Water every plant", 0),
        });
        assert_eq!(cache.task(&task_id).unwrap().title, "Water every plant");

        cache.apply(&StreamEvent::Task {
            action: Action::Delete,
            payload: json!({"id": task_id}),
        });
        assert!(cache.task(&task_id).is_none());
    }

    #[test]
    fn reorder_events_overwrite_positions_wholesale() {
        let mut cache = EntityCache::new();
        let section_id = Id::new_v4();
        let first = Id::new_v4();
        let second = Id::new_v4();

        for (id, position) in [(first, 0), (second, 1)] {
            cache.apply(&StreamEvent::Task {
                action: Action::Create,
                payload: task_payload(id, section_id, "task", position),
            });
        }

        cache.apply(&StreamEvent::Task {
            action: Action::Reorder,
            payload: json!([
                {"id": first, "position": 1},
                {"id": second, "position": 0},
            ]),
        });

        let ordered: Vec<Id> = cache
            .tasks_in_section(Some(section_id))
            .iter()
            .map(|t| t.id)
            .collect();
        assert_eq!(ordered, vec![second, first]);
    }

    #[test]
    fn reorder_events_skip_unknown_ids() {
        let mut cache = EntityCache::new();

        cache.apply(&StreamEvent::Task {
            action: Action::Reorder,
            payload: json!([{"id": Id::new_v4(), "position": 3}]),
        });

        assert_eq!(cache.task_count(), 0);
    }

    #[test]
    fn subtasks_and_tags_are_projected_from_flat_results() {
        let mut cache = EntityCache::new();
        let section_id = Id::new_v4();
        let parent_id = Id::new_v4();
        let child_id = Id::new_v4();
        let tag_id = Id::new_v4();

        cache.replace_all(
            vec![
                Task {
                    id: parent_id,
                    section_id: Some(section_id),
                    parent_id: None,
                    title: "Plan the week".into(),
                    notes: None,
                    status: "todo".into(),
                    position: 0,
                    tag_ids: vec![tag_id],
                },
                Task {
                    id: child_id,
                    section_id: Some(section_id),
                    parent_id: Some(parent_id),
                    title: "Block focus time".into(),
                    notes: None,
                    status: "todo".into(),
                    position: 0,
                    tag_ids: vec![],
                },
            ],
            vec![],
            vec![],
            vec![],
            vec![Tag {
                id: tag_id,
                name: "planning".into(),
                color: None,
            }],
        );

        // Subtasks never appear in the top-level listing.
        let top_level: Vec<Id> = cache
            .tasks_in_section(Some(section_id))
            .iter()
            .map(|t| t.id)
            .collect();
        assert_eq!(top_level, vec![parent_id]);

        let subtasks: Vec<Id> = cache.subtasks_of(parent_id).iter().map(|t| t.id).collect();
        assert_eq!(subtasks, vec![child_id]);

        let parent = cache.task(&parent_id).unwrap();
        let tags: Vec<&str> = cache
            .resolved_tags(parent)
            .iter()
            .map(|t| t.name.as_str())
            .collect();
        assert_eq!(tags, vec!["planning"]);
    }
}
