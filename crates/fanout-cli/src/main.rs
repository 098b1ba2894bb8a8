use std::process::ExitCode;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    fanout_cli::init_tracing();

    let matches = fanout_cli::command().get_matches();

    let outcome = match fanout_cli::parse(&matches) {
        Ok((mode, settings)) => fanout_cli::execute(mode, &settings).await,
        Err(e) => Err(e),
    };

    match outcome {
        Ok(output) => {
            println!("{output}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!("{e:#}");
            eprintln!("error: {e:#}");
            ExitCode::FAILURE
        }
    }
}
