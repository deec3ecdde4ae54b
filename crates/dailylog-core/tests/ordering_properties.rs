//! Property tests for category-scoped reordering.

use dailylog_core::ordering::{category_view, is_dense, reorder};
use dailylog_core::{Category, Routine};
use proptest::prelude::*;

fn category_strategy() -> impl Strategy<Value = Category> {
    prop_oneof![
        Just(Category::Morning),
        Just(Category::Afternoon),
        Just(Category::Evening),
    ]
}

fn routines_strategy() -> impl Strategy<Value = Vec<Routine>> {
    prop::collection::vec(category_strategy(), 1..12).prop_map(|categories| {
        categories
            .into_iter()
            .enumerate()
            .map(|(i, category)| Routine::new(format!("r{i}"), format!("Routine {i}"), "", category, i))
            .collect()
    })
}

fn ids(routines: &[Routine]) -> Vec<String> {
    routines.iter().map(|r| r.id.clone()).collect()
}

proptest! {
    #![proptest_config(ProptestConfig { max_global_rejects: 65536, ..ProptestConfig::default() })]

    #[test]
    fn ranks_stay_dense_under_any_move_sequence(
        mut routines in routines_strategy(),
        moves in prop::collection::vec((category_strategy(), -2isize..14, -2isize..14), 0..30),
    ) {
        for (category, from, to) in moves {
            let view = category_view(&routines, category);
            if let Some(next) = reorder(&routines, &view, from, to) {
                routines = next;
            }
            prop_assert!(is_dense(&routines));
        }
    }

    #[test]
    fn moved_routine_lands_on_requested_slot(
        routines in routines_strategy(),
        category in category_strategy(),
        from in 0usize..12,
        to in 0usize..12,
    ) {
        let view = category_view(&routines, category);
        prop_assume!(from < view.len() && to < view.len() && from != to);

        let moved_id = view[from].id.clone();
        let next = reorder(&routines, &view, from as isize, to as isize).unwrap();
        let new_view = category_view(&next, category);
        prop_assert_eq!(&new_view[to].id, &moved_id);

        // Without the moved routine the view is otherwise unchanged.
        let before: Vec<_> = ids(&view).into_iter().filter(|id| *id != moved_id).collect();
        let after: Vec<_> = ids(&new_view).into_iter().filter(|id| *id != moved_id).collect();
        prop_assert_eq!(before, after);

        for other in Category::ALL.into_iter().filter(|c| *c != category) {
            prop_assert_eq!(ids(&category_view(&routines, other)), ids(&category_view(&next, other)));
        }
    }

    #[test]
    fn out_of_range_target_changes_nothing(
        routines in routines_strategy(),
        category in category_strategy(),
        from in 0usize..12,
        overshoot in 0isize..5,
        below in any::<bool>(),
    ) {
        let view = category_view(&routines, category);
        let to = if below { -1 - overshoot } else { view.len() as isize + overshoot };
        prop_assert!(reorder(&routines, &view, from as isize, to).is_none());
    }
}
