use std::process::ExitCode;

fn main() -> ExitCode {
    match arcane_survivors::game::run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("arcane-survivors: {err}");
            ExitCode::FAILURE
        }
    }
}
