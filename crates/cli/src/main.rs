use std::process::ExitCode;

fn main() -> ExitCode {
    soundrush_cli::run()
}
