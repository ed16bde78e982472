use memdir::member::{Role, RoleFilter};
use memdir::runner::{Options, Runner};
use memdir::state::{QueryAction, QueryState};
use std::error::Error;

fn main() -> Result<(), Box<dyn Error>> {
    let mut runner = Runner::new(Options {
        page_size: 5,
        ..Options::default()
    })?;

    let mut state = QueryState::new();
    state.apply(QueryAction::SetRole(RoleFilter::Only(Role::Member)));
    state.apply(QueryAction::ToggleSkill("Python".to_string()));
    state.apply(QueryAction::ToggleSkill("Go".to_string()));
    state.apply(QueryAction::NextPage);

    let view = runner.list(&mut state);
    println!("Matches: {}", view.page.total_items);
    println!("Page: {}/{}", view.page.current_page, view.page.total_pages);
    for m in view.members.iter() {
        println!("{} {} [{}]", m.id, m.name, m.skills.join(", "));
    }
    let window: Vec<String> = view.page.window.iter().map(|s| s.to_string()).collect();
    println!("Pages: {}", window.join(" "));

    Ok(())
}
