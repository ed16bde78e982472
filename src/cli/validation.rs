use crate::cli::args::{CliArgs, Command, FilterArgs, OutputArgs};
use crate::member::RoleFilter;
use crate::output::OutputFormat;

fn validate_filters(filters: &FilterArgs) -> Result<(), String> {
    if let Some(role) = filters.role.as_deref() {
        if RoleFilter::parse(role).is_none() {
            return Err(format!(
                "invalid --role '{role}', expected All, Chair, Vice Chair, Secretary or Member"
            ));
        }
    }
    Ok(())
}

fn validate_page_size(page_size: Option<usize>) -> Result<(), String> {
    if page_size == Some(0) {
        return Err("invalid page-size, expected positive integer".to_string());
    }
    Ok(())
}

fn validate_format(raw: Option<&str>) -> Result<(), String> {
    if let Some(raw) = raw {
        if OutputFormat::parse(raw).is_none() {
            return Err(format!("invalid --format '{raw}', expected text, json or html"));
        }
    }
    Ok(())
}

fn validate_output(output: &OutputArgs) -> Result<(), String> {
    validate_format(output.format.as_deref())
}

pub fn validate(args: &CliArgs) -> Result<(), String> {
    match &args.command {
        Command::List(list) => {
            validate_filters(&list.filters)?;
            validate_page_size(list.page_size)?;
            if list.page == Some(0) {
                return Err("invalid page, expected positive integer".to_string());
            }
            validate_output(&list.output)?;
            if list.output_dir.is_some() {
                if list.output.output.is_some() {
                    return Err("use either --output or --output-dir, not both".to_string());
                }
                let format = list.output.format.as_deref().and_then(OutputFormat::parse);
                if matches!(format, Some(f) if f != OutputFormat::Html) {
                    return Err("--output-dir writes html, drop --format or use html".to_string());
                }
            }
        }
        Command::Show(show) => {
            if show.id.trim().is_empty() {
                return Err("member id must not be empty".to_string());
            }
            validate_output(&show.output)?;
        }
        Command::Browse(browse) => {
            validate_filters(&browse.filters)?;
            validate_page_size(browse.page_size)?;
        }
        Command::Facets(facets) => {
            if let Some(raw) = facets.format.as_deref() {
                if OutputFormat::parse(raw) == Some(OutputFormat::Html) {
                    return Err("facets support text or json output".to_string());
                }
            }
            validate_format(facets.format.as_deref())?;
        }
        Command::Theme(theme) => {
            let action = theme.action.trim().to_lowercase();
            if !matches!(action.as_str(), "show" | "toggle" | "light" | "dark") {
                return Err(format!(
                    "invalid theme action '{}', expected show, toggle, light or dark",
                    theme.action
                ));
            }
        }
        Command::InitConfig => {}
    }
    Ok(())
}
