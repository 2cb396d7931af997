//! Presentation-layer overlay for an in-flight drag.
//!
//! While a drag is in progress the UI shows a projected ordering: the
//! dragged task removed from its origin container and inserted at the
//! hovered index of the target container. The underlying cache is never
//! mutated; the projection is recomputed per frame and discarded when the
//! drag ends or is cancelled. The authoritative ordering arrives later via
//! the reorder mutation response or a broadcast event.

use crate::cache::{EntityCache, Id};

/// One in-flight drag: the task being moved and where the pointer hovers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DragProjection {
    pub task_id: Id,
    pub from_section: Option<Id>,
    pub to_section: Option<Id>,
    pub hover_index: usize,
}

/// The task ids of one section in display order, with `drag` overlaid when
/// it involves this section. Pure function over the cache snapshot.
pub fn project_section_order(
    cache: &EntityCache,
    section_id: Option<Id>,
    drag: Option<&DragProjection>,
) -> Vec<Id> {
    let mut order: Vec<Id> = cache
        .tasks_in_section(section_id)
        .iter()
        .map(|task| task.id)
        .collect();

    let Some(drag) = drag else {
        return order;
    };

    // Remove from the origin rendering; skip untouched sections entirely.
    if drag.from_section == section_id || drag.to_section == section_id {
        order.retain(|id| *id != drag.task_id);
    }

    if drag.to_section == section_id {
        let index = drag.hover_index.min(order.len());
        order.insert(index, drag.task_id);
    }

    order
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::Task;

    fn board(section_a: Id, section_b: Id, ids: [Id; 3]) -> EntityCache {
        let mut cache = EntityCache::new();
        let task = |id: Id, section: Id, position: i32| Task {
            id,
            section_id: Some(section),
            parent_id: None,
            title: format!("task {position}"),
            notes: None,
            status: "todo".into(),
            position,
            tag_ids: vec![],
        };
        cache.replace_all(
            vec![
                task(ids[0], section_a, 0),
                task(ids[1], section_a, 1),
                task(ids[2], section_b, 0),
            ],
            vec![],
            vec![],
            vec![],
            vec![],
        );
        cache
    }

    #[test]
    fn without_a_drag_the_cached_order_is_returned() {
        let (section_a, section_b) = (Id::new_v4(), Id::new_v4());
        let ids = [Id::new_v4(), Id::new_v4(), Id::new_v4()];
        let cache = board(section_a, section_b, ids);

        assert_eq!(
            project_section_order(&cache, Some(section_a), None),
            vec![ids[0], ids[1]]
        );
    }

    #[test]
    fn a_cross_section_drag_moves_the_task_between_projections() {
        let (section_a, section_b) = (Id::new_v4(), Id::new_v4());
        let ids = [Id::new_v4(), Id::new_v4(), Id::new_v4()];
        let cache = board(section_a, section_b, ids);

        let drag = DragProjection {
            task_id: ids[0],
            from_section: Some(section_a),
            to_section: Some(section_b),
            hover_index: 0,
        };

        assert_eq!(
            project_section_order(&cache, Some(section_a), Some(&drag)),
            vec![ids[1]]
        );
        assert_eq!(
            project_section_order(&cache, Some(section_b), Some(&drag)),
            vec![ids[0], ids[2]]
        );

        // The cache itself is untouched: the projection is presentation-only.
        assert_eq!(
            cache.task(&ids[0]).unwrap().section_id,
            Some(section_a)
        );
    }

    #[test]
    fn hover_index_is_clamped_to_the_container_length() {
        let (section_a, section_b) = (Id::new_v4(), Id::new_v4());
        let ids = [Id::new_v4(), Id::new_v4(), Id::new_v4()];
        let cache = board(section_a, section_b, ids);

        let drag = DragProjection {
            task_id: ids[2],
            from_section: Some(section_b),
            to_section: Some(section_a),
            hover_index: 99,
        };

        assert_eq!(
            project_section_order(&cache, Some(section_a), Some(&drag)),
            vec![ids[0], ids[1], ids[2]]
        );
    }

    #[test]
    fn reordering_within_a_section_projects_the_new_slot() {
        let (section_a, section_b) = (Id::new_v4(), Id::new_v4());
        let ids = [Id::new_v4(), Id::new_v4(), Id::new_v4()];
        let cache = board(section_a, section_b, ids);

        let drag = DragProjection {
            task_id: ids[1],
            from_section: Some(section_a),
            to_section: Some(section_a),
            hover_index: 0,
        };

        assert_eq!(
            project_section_order(&cache, Some(section_a), Some(&drag)),
            vec![ids[1], ids[0]]
        );
    }
}
