fn main() {
    besigue_cli::logging::init();
    let mut out = std::io::stdout();
    let mut err = std::io::stderr();
    let code = besigue_cli::run(std::env::args(), &mut out, &mut err);
    std::process::exit(code);
}
