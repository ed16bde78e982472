use memdir::member::{Member, Role};
use memdir::runner::{DataSource, DetailView, Options, Runner};
use std::error::Error;

fn main() -> Result<(), Box<dyn Error>> {
    let runner = Runner::new(Options {
        data: DataSource::Inline(vec![
            Member::new("1", "Asha", Role::Chair).with_skills(["Rust", "Go"]),
            Member::new("2", "Ravi", Role::Member).with_domain("AI/ML"),
        ]),
        ..Options::default()
    })?;

    for id in ["1", "2", "42"] {
        match runner.show(id) {
            DetailView::Found(m) => println!("{} {} ({})", m.id, m.name, m.role),
            DetailView::NotFound { id } => println!("{id}: member not found"),
        }
    }

    Ok(())
}
