use std::process::ExitCode;

fn main() -> ExitCode {
    match inv_ident_cli::run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{:#}", e);
            ExitCode::FAILURE
        }
    }
}
