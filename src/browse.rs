use crate::member::RoleFilter;
use crate::state::QueryAction;
use crate::utils;

pub const HELP: &str = "\
commands:
  search <text>    filter by name, role or skill (no text clears the search)
  role <role>      All, Chair, Vice Chair, Secretary or Member
  domain <domain>  toggle a domain filter
  skill <skill>    toggle a skill filter
  clear            drop every filter
  page <n>         jump to a page
  next | prev      move one page
  open <id>        show one member
  list             redraw the current page
  theme            toggle light/dark
  help             this text
  quit             leave";

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum BrowseCommand {
    Action(QueryAction),
    Open(String),
    Redraw,
    ToggleTheme,
    Help,
    Quit,
}

pub fn parse_command(line: &str) -> Result<BrowseCommand, String> {
    let (verb, rest) = utils::split_command(line);
    let command = match verb.as_str() {
        "search" | "s" | "/" => BrowseCommand::Action(QueryAction::SetSearch(rest.to_string())),
        "role" | "r" => {
            let role = if rest.is_empty() {
                RoleFilter::All
            } else {
                RoleFilter::parse(rest).ok_or_else(|| {
                    format!("unknown role '{rest}', expected All, Chair, Vice Chair, Secretary or Member")
                })?
            };
            BrowseCommand::Action(QueryAction::SetRole(role))
        }
        "domain" | "d" => BrowseCommand::Action(QueryAction::ToggleDomain(required(rest, "domain")?)),
        "skill" | "k" => BrowseCommand::Action(QueryAction::ToggleSkill(required(rest, "skill")?)),
        "clear" => BrowseCommand::Action(QueryAction::ClearFilters),
        "page" | "p" => {
            let page = utils::parse_positive_usize(rest).map_err(|e| format!("invalid page: {e}"))?;
            BrowseCommand::Action(QueryAction::GoToPage(page))
        }
        "next" | "n" => BrowseCommand::Action(QueryAction::NextPage),
        "prev" | "previous" => BrowseCommand::Action(QueryAction::PreviousPage),
        "open" | "show" | "o" => BrowseCommand::Open(required(rest, "member id")?),
        "list" | "ls" | "" => BrowseCommand::Redraw,
        "theme" | "t" => BrowseCommand::ToggleTheme,
        "help" | "h" | "?" => BrowseCommand::Help,
        "quit" | "q" | "exit" => BrowseCommand::Quit,
        other => return Err(format!("unknown command '{other}', type 'help'")),
    };
    Ok(command)
}

fn required(rest: &str, what: &str) -> Result<String, String> {
    let value = rest.trim();
    if value.is_empty() {
        return Err(format!("missing {what}"));
    }
    Ok(value.to_string())
}
