use std::collections::HashSet;

use crate::filter::{self, Query, Selection};
use crate::member::{Member, Role, RoleFilter};
use crate::pagination::{self, PageSlot};
use crate::runner::{DataSource, DetailView, Options, Runner};
use crate::state::{QueryAction, QueryState};

fn fixture() -> Vec<Member> {
    vec![
        Member::new("1", "Asha", Role::Chair)
            .with_domain("AI/ML")
            .with_skills(["Python"]),
        Member::new("2", "Ravi", Role::Member)
            .with_domain("Web Development")
            .with_skills(["React", "Node.js"]),
        Member::new("3", "Meera", Role::Secretary)
            .with_domain("AI/ML")
            .with_skills(["Python", "Go"]),
        Member::new("4", "Karthik", Role::Member)
            .with_domain("Cybersecurity")
            .with_skills(["Cybersecurity"]),
        Member::new("5", "Divya", Role::ViceChair)
            .with_domain("Web Development")
            .with_skills(["React"]),
    ]
}

fn ids(members: &[&Member]) -> Vec<String> {
    members.iter().map(|m| m.id.to_string()).collect()
}

#[test]
fn search_cha_matches_chair_role_only() {
    let members = fixture();
    let query = Query {
        search: "cha".to_string(),
        ..Query::default()
    };
    let hits = filter::filter(&members, &query);
    assert_eq!(ids(&hits), vec!["1", "5"]);
    assert!(!hits.iter().any(|m| m.name == "Ravi"));
}

#[test]
fn skills_match_any_selected() {
    let members = fixture();
    let query = Query {
        skills: ["React", "Go"].into_iter().collect(),
        ..Query::default()
    };
    assert_eq!(ids(&filter::filter(&members, &query)), vec!["2", "3", "5"]);
}

#[test]
fn dimensions_combine_with_and() {
    let members = fixture();
    let query = Query {
        search: "a".to_string(),
        role: RoleFilter::Only(Role::Member),
        domains: ["Web Development", "Cybersecurity"].into_iter().collect(),
        skills: ["React", "Cybersecurity"].into_iter().collect(),
    };
    assert_eq!(ids(&filter::filter(&members, &query)), vec!["2", "4"]);
}

#[test]
fn filtered_result_is_ordered_subset() {
    let members = fixture();
    let queries = [
        Query::default(),
        Query {
            search: "R".to_string(),
            ..Query::default()
        },
        Query {
            domains: ["AI/ML"].into_iter().collect(),
            ..Query::default()
        },
        Query {
            search: "zzz".to_string(),
            ..Query::default()
        },
    ];
    for query in queries.iter() {
        let indices = filter::filter_indices(&members, query);
        assert!(indices.windows(2).all(|w| w[0] < w[1]));
        let unique: HashSet<_> = indices.iter().collect();
        assert_eq!(unique.len(), indices.len());
        assert!(indices.iter().all(|&i| query.matches(&members[i])));
    }
}

#[test]
fn double_toggle_restores_selection() {
    let start: Selection = ["React"].into_iter().collect();
    for value in ["React", "Go"] {
        let once = filter::toggle(value, &start);
        assert_ne!(once, start);
        assert_eq!(filter::toggle(value, &once), start);
    }
}

#[test]
fn pages_concatenate_to_input() {
    let items: Vec<usize> = (0..47).collect();
    for page_size in [1, 5, 20, 47, 100] {
        let total = pagination::total_pages(items.len(), page_size);
        let rebuilt: Vec<usize> = (1..=total)
            .flat_map(|p| pagination::page_slice(&items, page_size, p).iter().copied())
            .collect();
        assert_eq!(rebuilt, items, "page_size {page_size}");
        assert!(pagination::page_slice(&items, page_size, total + 1).is_empty());
    }
}

#[test]
fn page_window_shapes() {
    use PageSlot::{Ellipsis as E, Page as P};
    assert_eq!(
        pagination::page_window(7, 4),
        (1..=7).map(P).collect::<Vec<_>>()
    );
    assert_eq!(
        pagination::page_window(15, 1),
        vec![P(1), P(2), P(3), P(4), E, P(13), P(14), P(15)]
    );
    assert_eq!(
        pagination::page_window(15, 15),
        vec![P(1), P(2), P(3), E, P(12), P(13), P(14), P(15)]
    );
    assert_eq!(
        pagination::page_window(15, 8),
        vec![P(1), P(2), E, P(7), P(8), P(9), E, P(14), P(15)]
    );
}

#[test]
fn filter_actions_reset_page_navigation_does_not() {
    let filter_actions = [
        QueryAction::SetSearch("a".to_string()),
        QueryAction::SetRole(RoleFilter::Only(Role::Chair)),
        QueryAction::ToggleDomain("AI/ML".to_string()),
        QueryAction::ToggleSkill("Go".to_string()),
        QueryAction::ClearFilters,
    ];
    let mut state = QueryState::new();
    state.apply(QueryAction::GoToPage(4));
    for action in filter_actions {
        assert_eq!(state.reduce(action).page, 1);
    }

    state.apply(QueryAction::NextPage);
    assert_eq!(state.page, 5);
    state.apply(QueryAction::PreviousPage);
    assert_eq!(state.page, 4);
}

#[test]
fn runner_reuses_filter_across_pages() {
    let mut runner = Runner::new(Options {
        data: DataSource::Inline(fixture()),
        page_size: 2,
    })
    .unwrap();
    let mut state = QueryState::new();
    state.apply(QueryAction::ToggleSkill("React".to_string()));
    state.apply(QueryAction::ToggleSkill("Python".to_string()));

    assert_eq!(runner.list(&mut state).page.total_pages, 2);
    state.apply(QueryAction::NextPage);
    let view = runner.list(&mut state);
    assert_eq!(view.members.len(), 2);
    assert_eq!(view.page.current_page, 2);
    assert_eq!(runner.memo().misses(), 1);
    assert_eq!(runner.memo().hits(), 1);
}

#[test]
fn lookup_is_independent_of_filters() {
    let mut runner = Runner::new(Options {
        data: DataSource::Inline(fixture()),
        page_size: 20,
    })
    .unwrap();
    let mut state = QueryState::new();
    state.apply(QueryAction::SetRole(RoleFilter::Only(Role::Chair)));
    assert_eq!(runner.list(&mut state).members.len(), 1);

    assert!(matches!(runner.show("4"), DetailView::Found(m) if m.name == "Karthik"));
    assert_eq!(
        runner.show("40"),
        DetailView::NotFound {
            id: "40".to_string()
        }
    );
}

#[test]
fn empty_result_has_no_pages() {
    let mut runner = Runner::new(Options {
        data: DataSource::Inline(fixture()),
        page_size: 2,
    })
    .unwrap();
    let mut state = QueryState::new();
    state.apply(QueryAction::SetSearch("nobody".to_string()));
    let view = runner.list(&mut state);
    assert!(view.members.is_empty());
    assert_eq!(view.page.total_pages, 0);
    assert!(!view.page.shows_controls());
}

#[test]
fn embedded_directory_lists_first_page() {
    let mut runner = Runner::new(Options::default()).unwrap();
    assert_eq!(runner.directory().len(), 56);

    let mut state = QueryState::new();
    let view = runner.list(&mut state);
    assert_eq!(view.page.total_items, 56);
    assert_eq!(view.page.total_pages, 3);
    assert_eq!(view.members.len(), 20);
    assert_eq!(view.members[0].name, "Asha Menon");

    state.apply(QueryAction::SetSearch("CHA".to_string()));
    let names: Vec<&str> = runner
        .list(&mut state)
        .members
        .iter()
        .map(|m| m.name.as_str())
        .collect();
    assert!(names.contains(&"Asha Menon"));
    assert!(names.contains(&"Charulatha Iyer"));
}
