use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};

use clap::{error::ErrorKind, CommandFactory, Parser};
use colored::Colorize;

use crate::browse::{self, BrowseCommand};
use crate::cli::args::{CliArgs, Command, FilterArgs, OutputArgs};
use crate::cli::validation;
use crate::config::{self, ConfigFile};
use crate::logging;
use crate::member::RoleFilter;
use crate::output::report::{self, SiteFile};
use crate::output::{self, OutputFormat};
use crate::pagination::DEFAULT_PAGE_SIZE;
use crate::runner::{DataSource, DetailView, Options, Runner};
use crate::settings::{
    self, FileSettingsStore, MemorySettingsStore, SettingsStore, Theme, ThemeSettings,
};
use crate::state::{QueryAction, QueryState};
use crate::utils;

fn format_kv_line(label: &str, value: &str) {
    println!(":: {:<10}: {}", label, value);
}

#[derive(Clone, Debug)]
struct RunConfig {
    data: DataSource,
    page_size: usize,
    format: Option<OutputFormat>,
    settings_path: Option<PathBuf>,
    config_path: Option<PathBuf>,
    no_color: bool,
    verbose: u8,
}

fn build_run_config(args: &CliArgs, cfg: ConfigFile) -> Result<RunConfig, String> {
    validation::validate(args)?;

    let no_color = if args.color {
        false
    } else {
        args.no_color || cfg.no_color.unwrap_or(false)
    };

    let cli_page_size = match &args.command {
        Command::List(list) => list.page_size,
        Command::Browse(browse) => browse.page_size,
        _ => None,
    };
    let page_size = cli_page_size
        .or(cfg.page_size)
        .unwrap_or(DEFAULT_PAGE_SIZE);
    if page_size == 0 {
        return Err("invalid page_size in config, expected positive integer".to_string());
    }

    let format = match cfg.format.as_deref() {
        Some(raw) => Some(
            OutputFormat::parse(raw)
                .ok_or_else(|| format!("invalid format '{raw}' in config, expected text, json or html"))?,
        ),
        None => None,
    };

    let data = match args.data.clone().or(cfg.data) {
        Some(path) if !path.trim().is_empty() => {
            DataSource::FilePath(config::expand_tilde(path.trim()))
        }
        _ => DataSource::Embedded,
    };

    let settings_path = args
        .settings
        .clone()
        .or(cfg.settings)
        .map(|p| config::expand_tilde(&p))
        .or_else(settings::default_settings_path);

    let config_path = args
        .config
        .as_deref()
        .map(config::expand_tilde)
        .or_else(config::default_config_path);

    Ok(RunConfig {
        data,
        page_size,
        format,
        settings_path,
        config_path,
        no_color,
        verbose: args.verbose,
    })
}

fn resolve_format(output: &OutputArgs, fallback: Option<OutputFormat>) -> OutputFormat {
    output
        .format
        .as_deref()
        .and_then(OutputFormat::parse)
        .or_else(|| {
            output
                .output
                .as_deref()
                .and_then(output::infer_format_from_path)
        })
        .or(fallback)
        .unwrap_or(OutputFormat::Text)
}

fn query_state_from(filters: &FilterArgs, page: Option<usize>) -> Result<QueryState, String> {
    let mut state = QueryState::new();
    if let Some(search) = filters.search.as_ref() {
        state.apply(QueryAction::SetSearch(search.clone()));
    }
    if let Some(raw) = filters.role.as_deref() {
        let role = RoleFilter::parse(raw).ok_or_else(|| format!("invalid --role '{raw}'"))?;
        state.apply(QueryAction::SetRole(role));
    }
    for domain in utils::flatten_csv_values(&filters.domain) {
        state.apply(QueryAction::ToggleDomain(domain));
    }
    for skill in utils::flatten_csv_values(&filters.skill) {
        state.apply(QueryAction::ToggleSkill(skill));
    }
    if let Some(page) = page {
        state.apply(QueryAction::GoToPage(page));
    }
    Ok(state)
}

fn open_runner(run: &RunConfig) -> Result<Runner, String> {
    Runner::new(Options {
        data: run.data.clone(),
        page_size: run.page_size,
    })
    .map_err(|e| e.to_string())
}

fn open_theme(run: &RunConfig) -> Result<ThemeSettings<Box<dyn SettingsStore>>, String> {
    let store: Box<dyn SettingsStore> = match run.settings_path.as_ref() {
        Some(path) => Box::new(FileSettingsStore::new(path)),
        None => {
            tracing::warn!("no home directory, theme changes will not be persisted");
            Box::new(MemorySettingsStore::new())
        }
    };
    ThemeSettings::init(store).map_err(|e| e.to_string())
}

fn emit(bytes: &[u8], output: Option<&str>) -> Result<(), String> {
    match output {
        Some(path) => {
            let path = config::expand_tilde(path);
            std::fs::write(&path, bytes)
                .map_err(|e| format!("failed to write output file '{}': {e}", path.display()))?;
            format_kv_line("Output", &path.display().to_string());
            Ok(())
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout
                .write_all(bytes)
                .and_then(|_| stdout.flush())
                .map_err(|e| format!("failed to write output: {e}"))
        }
    }
}

fn write_site(dir: &Path, files: &[SiteFile]) -> Result<(), String> {
    std::fs::create_dir_all(dir)
        .map_err(|e| format!("failed to create output directory '{}': {e}", dir.display()))?;
    for file in files {
        let path = dir.join(&file.name);
        std::fs::write(&path, &file.contents)
            .map_err(|e| format!("failed to write output file '{}': {e}", path.display()))?;
    }
    Ok(())
}

pub fn browse_session<S, R, W>(
    runner: &mut Runner,
    state: &mut QueryState,
    theme: &mut ThemeSettings<S>,
    input: R,
    out: &mut W,
) -> Result<(), String>
where
    S: SettingsStore,
    R: BufRead,
    W: Write,
{
    let write_err = |e: std::io::Error| format!("failed to write output: {e}");

    let view = output::render_list_text(&runner.list(state));
    out.write_all(view.as_bytes()).map_err(write_err)?;

    let mut lines = input.lines();
    loop {
        write!(out, "{} ", "memdir>".bold().cyan()).map_err(write_err)?;
        out.flush().map_err(write_err)?;

        let line = match lines.next() {
            Some(line) => line.map_err(|e| format!("failed to read input: {e}"))?,
            None => break,
        };

        let rendered = match browse::parse_command(&line) {
            Ok(BrowseCommand::Action(action)) => {
                tracing::debug!(?action, "browse action");
                state.apply(action);
                output::render_list_text(&runner.list(state))
            }
            Ok(BrowseCommand::Redraw) => output::render_list_text(&runner.list(state)),
            Ok(BrowseCommand::Open(id)) => output::render_detail_text(&runner.show(&id)),
            Ok(BrowseCommand::ToggleTheme) => match theme.toggle() {
                Ok(next) => format!(":: {:<10}: {}\n", "Theme", next),
                Err(e) => {
                    tracing::warn!(error = %e, "theme change not saved");
                    format!("{} {e}\n", "[ERR]".bold().red())
                }
            },
            Ok(BrowseCommand::Help) => format!("{}\n", browse::HELP),
            Ok(BrowseCommand::Quit) => break,
            Err(e) => format!("{} {e}\n", "[ERR]".bold().red()),
        };
        out.write_all(rendered.as_bytes()).map_err(write_err)?;
    }
    Ok(())
}

fn run_theme(run: &RunConfig, action: &str) -> Result<(), String> {
    let mut theme = open_theme(run)?;
    match action.trim().to_lowercase().as_str() {
        "toggle" => {
            theme.toggle().map_err(|e| e.to_string())?;
        }
        "show" => {}
        other => {
            let target = Theme::parse(other)
                .ok_or_else(|| format!("invalid theme action '{other}'"))?;
            theme.set(target).map_err(|e| e.to_string())?;
        }
    }
    format_kv_line("Theme", theme.theme().as_str());
    Ok(())
}

fn run_init_config(run: &RunConfig) -> Result<(), String> {
    let path = run
        .config_path
        .as_ref()
        .ok_or_else(|| "could not resolve a config path, pass --config".to_string())?;
    let written = config::ensure_default_config_file(path)?;
    let status = if written { "written" } else { "exists, left untouched" };
    format_kv_line("Config", &format!("{} ({status})", path.display()));
    Ok(())
}

fn run(args: CliArgs, run: RunConfig) -> Result<(), String> {
    match args.command {
        Command::List(list) => {
            let mut runner = open_runner(&run)?;
            let mut state = query_state_from(&list.filters, list.page)?;
            if let Some(dir) = list.output_dir.as_deref() {
                let dir = config::expand_tilde(dir);
                let theme = open_theme(&run)?.theme();
                let files = report::render_site(&mut runner, &state, theme);
                write_site(&dir, &files)?;
                format_kv_line("Output", &dir.display().to_string());
                format_kv_line("Files", &files.len().to_string());
                return Ok(());
            }
            let format = resolve_format(&list.output, run.format);
            let theme = match format {
                OutputFormat::Html => open_theme(&run)?.theme(),
                _ => Theme::default(),
            };
            let bytes = output::render_list(&runner.list(&mut state), format, theme);
            emit(&bytes, list.output.output.as_deref())
        }
        Command::Show(show) => {
            let runner = open_runner(&run)?;
            let id = show.id.trim();
            let format = resolve_format(&show.output, run.format);
            let theme = match format {
                OutputFormat::Html => open_theme(&run)?.theme(),
                _ => Theme::default(),
            };
            let detail = runner.show(id);
            let bytes = output::render_detail(&detail, format, theme);
            emit(&bytes, show.output.output.as_deref())?;
            match detail {
                DetailView::Found(_) => Ok(()),
                DetailView::NotFound { id } => Err(format!("member not found: {id}")),
            }
        }
        Command::Browse(browse) => {
            let mut runner = open_runner(&run)?;
            let mut state = query_state_from(&browse.filters, None)?;
            let mut theme = open_theme(&run)?;
            format_kv_line("Members", &runner.directory().len().to_string());
            format_kv_line("Page size", &runner.page_size().to_string());
            format_kv_line("Theme", theme.theme().as_str());
            println!("{}", "type 'help' for commands".dimmed());
            println!();
            let stdin = std::io::stdin();
            let mut stdout = std::io::stdout();
            browse_session(&mut runner, &mut state, &mut theme, stdin.lock(), &mut stdout)
        }
        Command::Facets(facets) => {
            let runner = open_runner(&run)?;
            let format = facets
                .format
                .as_deref()
                .and_then(OutputFormat::parse)
                .or(run.format)
                .unwrap_or(OutputFormat::Text);
            emit(&output::render_facets(&runner.facets(), format), None)
        }
        Command::Theme(theme) => run_theme(&run, &theme.action),
        Command::InitConfig => run_init_config(&run),
    }
}

pub fn run_cli() -> Result<(), String> {
    let args = match CliArgs::try_parse() {
        Ok(args) => args,
        Err(e) => match e.kind() {
            ErrorKind::DisplayHelp | ErrorKind::DisplayHelpOnMissingArgumentOrSubcommand => {
                print!("{e}");
                return Ok(());
            }
            ErrorKind::DisplayVersion => {
                let cmd = CliArgs::command();
                print!("{}", cmd.render_version());
                return Ok(());
            }
            _ => return Err(e.to_string()),
        },
    };

    let user_config_path = args.config.clone().map(|p| config::expand_tilde(&p));
    let cfg = match (user_config_path.as_ref(), &args.command) {
        (_, Command::InitConfig) => ConfigFile::default(),
        (Some(path), _) => config::load_config(path, false)?,
        (None, _) => match config::default_config_path() {
            Some(path) => config::load_config(&path, true)?,
            None => ConfigFile::default(),
        },
    };

    let run_config = build_run_config(&args, cfg)?;

    if run_config.no_color {
        colored::control::set_override(false);
    } else if args.color {
        colored::control::set_override(true);
    }
    logging::init_logging(run_config.verbose, run_config.no_color);

    run(args, run_config)
}

#[cfg(test)]
mod cli_tests {
    use super::*;
    use crate::member::{Member, Role};
    use crate::settings::Settings;
    use std::io::Cursor;

    fn parse(argv: &[&str]) -> CliArgs {
        CliArgs::parse_from(argv)
    }

    #[test]
    fn defaults_use_embedded_data_and_twenty_per_page() {
        let run = build_run_config(&parse(&["memdir", "list"]), ConfigFile::default()).unwrap();
        assert!(matches!(run.data, DataSource::Embedded));
        assert_eq!(run.page_size, 20);
        assert!(!run.no_color);
    }

    #[test]
    fn cli_overrides_config() {
        let cfg = ConfigFile {
            data: Some("/srv/members.yml".to_string()),
            page_size: Some(12),
            no_color: Some(true),
            ..ConfigFile::default()
        };
        let from_cfg = build_run_config(&parse(&["memdir", "list"]), cfg.clone()).unwrap();
        assert_eq!(from_cfg.page_size, 12);
        assert!(from_cfg.no_color);
        assert!(
            matches!(from_cfg.data, DataSource::FilePath(ref p) if p == &PathBuf::from("/srv/members.yml"))
        );

        let args = parse(&["memdir", "--color", "list", "--page-size", "5"]);
        let from_cli = build_run_config(&args, cfg).unwrap();
        assert_eq!(from_cli.page_size, 5);
        assert!(!from_cli.no_color);
    }

    #[test]
    fn bad_config_values_are_rejected() {
        let zero = ConfigFile {
            page_size: Some(0),
            ..ConfigFile::default()
        };
        assert!(build_run_config(&parse(&["memdir", "list"]), zero).is_err());

        let xml = ConfigFile {
            format: Some("xml".to_string()),
            ..ConfigFile::default()
        };
        assert!(build_run_config(&parse(&["memdir", "list"]), xml).is_err());
    }

    #[test]
    fn format_falls_back_from_flag_to_path_to_config() {
        let explicit = OutputArgs {
            format: Some("json".to_string()),
            output: Some("out.html".to_string()),
        };
        assert_eq!(resolve_format(&explicit, None), OutputFormat::Json);

        let inferred = OutputArgs {
            format: None,
            output: Some("out.html".to_string()),
        };
        assert_eq!(resolve_format(&inferred, Some(OutputFormat::Json)), OutputFormat::Html);

        let none = OutputArgs::default();
        assert_eq!(resolve_format(&none, Some(OutputFormat::Json)), OutputFormat::Json);
        assert_eq!(resolve_format(&none, None), OutputFormat::Text);
    }

    #[test]
    fn query_state_collects_repeatable_and_comma_values() {
        let args = parse(&[
            "memdir", "list", "-s", "ash", "-r", "Chair", "-k", "React,Go", "-k", "Go", "-d",
            "AI/ML", "-p", "3",
        ]);
        let Command::List(list) = args.command else {
            panic!("expected list");
        };
        let state = query_state_from(&list.filters, list.page).unwrap();
        assert_eq!(state.query.search, "ash");
        assert_eq!(state.query.role, RoleFilter::Only(Role::Chair));
        assert_eq!(state.query.skills.len(), 2);
        assert!(state.query.domains.contains("AI/ML"));
        assert_eq!(state.page, 3);
    }

    fn inline_runner() -> Runner {
        let members = (1..=5)
            .map(|i| {
                let skill = if i % 2 == 0 { "Go" } else { "React" };
                Member::new(i.to_string(), format!("Person {i}"), Role::Member)
                    .with_skills([skill])
            })
            .collect();
        Runner::new(Options {
            data: DataSource::Inline(members),
            page_size: 1,
        })
        .unwrap()
    }

    #[test]
    fn browse_session_applies_commands_in_order() {
        colored::control::set_override(false);
        let mut runner = inline_runner();
        let mut state = QueryState::new();
        let store = MemorySettingsStore::new();
        let mut theme = ThemeSettings::init(&store).unwrap();
        let input = Cursor::new("page 3\nskill Go\nnext\nopen 4\nopen 99\ntheme\nbogus\nquit\npage 1\n");
        let mut out = Vec::new();

        browse_session(&mut runner, &mut state, &mut theme, input, &mut out).unwrap();

        let text = String::from_utf8(out).unwrap();
        assert!(state.query.skills.contains("Go"));
        assert_eq!(state.page, 2);
        assert!(text.contains("Person 4"));
        assert!(text.contains("Member not found: 99"));
        assert!(text.contains("unknown command 'bogus'"));
        assert_eq!(store.stored(), Some(Settings { dark_mode: true }));
    }

    struct ReadOnlyStore;

    impl SettingsStore for ReadOnlyStore {
        fn load(&self) -> Result<Option<Settings>, settings::SettingsError> {
            Ok(None)
        }

        fn save(&self, _settings: &Settings) -> Result<(), settings::SettingsError> {
            Err(settings::SettingsError::Write {
                path: "settings.yml".to_string(),
                source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read-only"),
            })
        }
    }

    #[test]
    fn failed_theme_save_keeps_session_running() {
        colored::control::set_override(false);
        let mut runner = inline_runner();
        let mut state = QueryState::new();
        let mut theme = ThemeSettings::init(ReadOnlyStore).unwrap();
        let mut out = Vec::new();

        let result = browse_session(
            &mut runner,
            &mut state,
            &mut theme,
            Cursor::new("theme\nsearch a\nquit\n"),
            &mut out,
        );

        assert!(result.is_ok());
        assert_eq!(state.query.search, "a");
        assert_eq!(theme.theme(), Theme::Light);
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("[ERR] failed to write settings: settings.yml: read-only"));
    }

    #[test]
    fn output_dir_site_links_only_to_written_files() {
        let mut runner = inline_runner();
        let mut state = QueryState::new();
        state.apply(QueryAction::ToggleSkill("React".to_string()));
        let files = report::render_site(&mut runner, &state, Theme::Dark);

        let dir = tempfile::tempdir().unwrap();
        let site = dir.path().join("site");
        write_site(&site, &files).unwrap();

        for page in ["index.html", "page-2.html", "page-3.html", "member-5.html"] {
            assert!(site.join(page).is_file(), "{page} missing");
        }
        assert!(!site.join("page-4.html").exists());
        let index = std::fs::read_to_string(site.join("index.html")).unwrap();
        assert!(index.contains(r#"href="member-1.html""#));
        assert!(index.contains(r#"href="page-2.html""#));
    }

    #[test]
    fn browse_session_stops_at_end_of_input() {
        colored::control::set_override(false);
        let mut runner = inline_runner();
        let mut state = QueryState::new();
        let store = MemorySettingsStore::new();
        let mut theme = ThemeSettings::init(&store).unwrap();
        let mut out = Vec::new();

        browse_session(&mut runner, &mut state, &mut theme, Cursor::new("next\n"), &mut out)
            .unwrap();

        assert_eq!(state.page, 2);
        assert_eq!(store.saves(), 0);
        assert!(String::from_utf8(out).unwrap().contains("Total"));
    }
}
