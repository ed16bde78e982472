use clap::{ArgAction, Args, Parser, Subcommand};

#[derive(Parser, Debug, Clone)]
#[command(
    name = "memdir",
    version,
    about = "member directory with search, filters and pagination",
    long_about = "memdir lists the members of an organization directory with free-text search, role selection, multi-select domain/skill filters and pagination.\n\nExamples:\n  memdir list\n  memdir list -s python --skill React --skill Go -p 2\n  memdir list --role \"Vice Chair\" --domain AI/ML -f json\n  memdir show 12\n  memdir browse\n\nTip: Use --config to persist the dataset path and page size."
)]
pub struct CliArgs {
    #[arg(
        short = 'v',
        long = "verbose",
        action = ArgAction::Count,
        global = true,
        help_heading = "Output",
        help = "Increase log verbosity (-v, -vv, -vvv)."
    )]
    pub verbose: u8,

    #[arg(
        short = 'c',
        long = "color",
        global = true,
        help_heading = "Output",
        help = "Enable colored output (overrides --no-color)."
    )]
    pub color: bool,

    #[arg(
        long = "no-color",
        visible_alias = "nc",
        global = true,
        help_heading = "Output",
        help = "Disable colored output."
    )]
    pub no_color: bool,

    #[arg(
        short = 'C',
        long = "config",
        value_name = "FILE",
        global = true,
        help_heading = "Input",
        help = "Path to config file (defaults to ~/.memdir/config.yml)."
    )]
    pub config: Option<String>,

    #[arg(
        short = 'D',
        long = "data",
        visible_alias = "members",
        value_name = "FILE",
        global = true,
        help_heading = "Input",
        help = "Member dataset (.json, .yml, .yaml). Defaults to the embedded dataset."
    )]
    pub data: Option<String>,

    #[arg(
        long = "settings",
        value_name = "FILE",
        global = true,
        help_heading = "Input",
        help = "Theme settings file (defaults to ~/.memdir/settings.yml)."
    )]
    pub settings: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    #[command(visible_alias = "ls", about = "Print one page of the filtered directory.")]
    List(ListArgs),

    #[command(about = "Print the detail view of one member.")]
    Show(ShowArgs),

    #[command(about = "Interactive session: filter, page and open members line by line.")]
    Browse(BrowseArgs),

    #[command(about = "Print the selectable roles, domains and skills with member counts.")]
    Facets(FacetsArgs),

    #[command(about = "Show or change the persisted light/dark theme.")]
    Theme(ThemeArgs),

    #[command(about = "Write a commented default config file.")]
    InitConfig,
}

#[derive(Args, Debug, Clone, Default)]
pub struct FilterArgs {
    #[arg(
        short = 's',
        long = "search",
        value_name = "TEXT",
        help_heading = "Filters",
        help = "Case-insensitive match on name, role or skill."
    )]
    pub search: Option<String>,

    #[arg(
        short = 'r',
        long = "role",
        value_name = "ROLE",
        help_heading = "Filters",
        help = "All, Chair, Vice Chair, Secretary or Member (exact)."
    )]
    pub role: Option<String>,

    #[arg(
        short = 'd',
        long = "domain",
        value_name = "DOMAIN",
        action = ArgAction::Append,
        help_heading = "Filters",
        help = "Only members in one of these domains (repeatable, comma-separated)."
    )]
    pub domain: Vec<String>,

    #[arg(
        short = 'k',
        long = "skill",
        value_name = "SKILL",
        action = ArgAction::Append,
        help_heading = "Filters",
        help = "Only members with at least one of these skills (repeatable, comma-separated)."
    )]
    pub skill: Vec<String>,
}

#[derive(Args, Debug, Clone, Default)]
pub struct OutputArgs {
    #[arg(
        short = 'f',
        long = "format",
        value_name = "FORMAT",
        help_heading = "Output",
        help = "Output format: text, json, html (inferred from --output when omitted)."
    )]
    pub format: Option<String>,

    #[arg(
        short = 'o',
        long = "output",
        value_name = "FILE",
        help_heading = "Output",
        help = "Write output to a file instead of stdout."
    )]
    pub output: Option<String>,
}

#[derive(Args, Debug, Clone, Default)]
pub struct ListArgs {
    #[command(flatten)]
    pub filters: FilterArgs,

    #[arg(
        short = 'p',
        long = "page",
        value_name = "N",
        help_heading = "Pagination",
        help = "1-based page to print."
    )]
    pub page: Option<usize>,

    #[arg(
        long = "page-size",
        visible_alias = "ps",
        value_name = "N",
        help_heading = "Pagination",
        help = "Members per page (default 20)."
    )]
    pub page_size: Option<usize>,

    #[command(flatten)]
    pub output: OutputArgs,

    #[arg(
        long = "output-dir",
        value_name = "DIR",
        help_heading = "Output",
        help = "Write a linked HTML site (index.html, page-N.html, member-<id>.html) into DIR."
    )]
    pub output_dir: Option<String>,
}

#[derive(Args, Debug, Clone)]
pub struct ShowArgs {
    #[arg(value_name = "ID", help = "Member id.")]
    pub id: String,

    #[command(flatten)]
    pub output: OutputArgs,
}

#[derive(Args, Debug, Clone, Default)]
pub struct BrowseArgs {
    #[command(flatten)]
    pub filters: FilterArgs,

    #[arg(
        long = "page-size",
        visible_alias = "ps",
        value_name = "N",
        help_heading = "Pagination",
        help = "Members per page (default 20)."
    )]
    pub page_size: Option<usize>,
}

#[derive(Args, Debug, Clone, Default)]
pub struct FacetsArgs {
    #[arg(
        short = 'f',
        long = "format",
        value_name = "FORMAT",
        help_heading = "Output",
        help = "Output format: text or json."
    )]
    pub format: Option<String>,
}

#[derive(Args, Debug, Clone, Default)]
pub struct ThemeArgs {
    #[arg(
        value_name = "ACTION",
        default_value = "show",
        help = "show, toggle, light or dark."
    )]
    pub action: String,
}
