use colored::Colorize;

fn main() {
    if let Err(e) = memdir::app::run_cli() {
        eprintln!("{} {e}", "error:".bold().red());
        std::process::exit(1);
    }
}
