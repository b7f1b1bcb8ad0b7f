use crate::{cli::Cli, config::Config, workload::{TokioPacer, Workload}};
use clap::Parser;
use rand::{rngs::StdRng, SeedableRng};
use tokio::signal::ctrl_c;
use tracing::info;

mod buffer;
mod cli;
mod config;
mod workload;

fn startup_lines(pid: u32) -> [String; 2] {
    [
        format!("[TargetApp] PID={}", pid),
        "[TargetApp] Running. Press Ctrl+C to exit.".to_owned(),
    ]
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    // stdout carries only the startup lines
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();

    let cli = Cli::parse();

    let conf = Config::load(cli.config.as_deref()).await?;
    let mut workload = Workload::new(&conf, StdRng::from_entropy(), TokioPacer)?;

    for line in startup_lines(std::process::id()) {
        println!("{}", line);
    }
    info!(?conf, "start workload");

    tokio::select! {
        _ = workload.run() => {},
        res = ctrl_c() => {
            res?;
            info!(
                iterations = workload.iterations(),
                retained = workload.buffer().len(),
                bytes = workload.buffer().bytes(),
                "got ctrl_c"
            );
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_startup_lines() {
        let [pid, banner] = startup_lines(4242);
        assert_eq!(pid, "[TargetApp] PID=4242");
        assert_eq!(banner, "[TargetApp] Running. Press Ctrl+C to exit.");
    }
}
