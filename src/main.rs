use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    match studydesk::cli::run().await {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {:?}", e);
            ExitCode::from(studydesk::errors::get_exit_code(&e))
        }
    }
}
