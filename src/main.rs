//! Brick Breaker - headless entry point
//!
//! `brick-breaker [--tuning <PATH>] [--seed <N>]` plays one autopilot session
//! and prints a JSON summary of how it went.

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use std::path::PathBuf;

    use brick_breaker::audio::LogCuePlayer;
    use brick_breaker::consts::{SIM_DT, TICKS_PER_SEC};
    use brick_breaker::platform::{HudRenderer, LogOverlay};
    use brick_breaker::sim::GamePhase;
    use brick_breaker::{QualityPreset, Runner, Settings, Tuning, TuningError};
    use clap::Parser;
    use serde::Serialize;

    /// Ten minutes of simulated play
    const DEFAULT_MAX_FRAMES: u64 = 10 * 60 * TICKS_PER_SEC as u64;

    /// Brick Breaker - headless autopilot run
    #[derive(Debug, Parser)]
    #[command(name = "brick-breaker")]
    #[command(about = "Plays one autopilot session and prints a JSON run summary", long_about = None)]
    struct Cli {
        /// Tuning file (JSON); built-in balance when omitted
        #[arg(short, long)]
        tuning: Option<PathBuf>,

        /// RNG seed; random when omitted
        #[arg(short, long)]
        seed: Option<u64>,

        /// Quality preset (low, medium, high)
        #[arg(short, long, default_value_t = QualityPreset::Medium)]
        quality: QualityPreset,

        /// Stop after this many 60 Hz frames
        #[arg(long, default_value_t = DEFAULT_MAX_FRAMES)]
        max_frames: u64,
    }

    #[derive(Debug, Serialize)]
    struct RunSummary {
        seed: u64,
        phase: GamePhase,
        stage: u32,
        score: u64,
        lives: u32,
        bricks_broken: u32,
        frames: u64,
        sim_ticks: u64,
    }

    fn run(cli: Cli) -> Result<RunSummary, TuningError> {
        let tuning = match &cli.tuning {
            Some(path) => Tuning::load(path)?,
            None => Tuning::default(),
        };
        let seed = cli.seed.unwrap_or_else(rand::random);
        let settings = Settings::from_preset(cli.quality);
        let audio = LogCuePlayer::new(settings.effective_volume());

        let mut runner = Runner::new(
            seed,
            tuning,
            settings,
            audio,
            LogOverlay::default(),
            HudRenderer::default(),
        )?;
        runner.autopilot = true;

        let mut frames = 0;
        while frames < cli.max_frames && !runner.state.phase.is_terminal() {
            runner.frame(SIM_DT);
            frames += 1;
        }
        if !runner.state.phase.is_terminal() {
            log::warn!("Frame limit reached in {:?}", runner.state.phase);
        }

        let state = &runner.state;
        Ok(RunSummary {
            seed,
            phase: state.phase,
            stage: state.stage,
            score: state.score,
            lives: state.lives,
            bricks_broken: state.bricks_broken,
            frames,
            sim_ticks: state.time_ticks,
        })
    }

    pub fn main() {
        let cli = Cli::parse();
        env_logger::init();
        log::info!("Brick Breaker (native) starting...");

        let summary = match run(cli) {
            Ok(summary) => summary,
            Err(e) => {
                log::error!("{}", e);
                std::process::exit(1);
            }
        };
        match serde_json::to_string_pretty(&summary) {
            Ok(json) => println!("{json}"),
            Err(e) => {
                log::error!("Failed to encode summary: {}", e);
                std::process::exit(1);
            }
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;
        use clap::CommandFactory;

        #[test]
        fn test_cli_definition() {
            Cli::command().debug_assert();
        }

        #[test]
        fn test_numeric_tuning_path_is_not_a_seed() {
            let cli = Cli::try_parse_from(["brick-breaker", "--tuning", "7"]).unwrap();
            assert_eq!(cli.tuning, Some(PathBuf::from("7")));
            assert_eq!(cli.seed, None);

            let cli = Cli::try_parse_from(["brick-breaker", "-s", "7", "-q", "high"]).unwrap();
            assert_eq!(cli.seed, Some(7));
            assert_eq!(cli.quality, QualityPreset::High);
            assert_eq!(cli.max_frames, DEFAULT_MAX_FRAMES);
        }

        #[test]
        fn test_bad_arguments_are_rejected() {
            assert!(Cli::try_parse_from(["brick-breaker", "--bogus"]).is_err());
            assert!(Cli::try_parse_from(["brick-breaker", "--seed", "abc"]).is_err());
            assert!(Cli::try_parse_from(["brick-breaker", "7"]).is_err());
            assert!(Cli::try_parse_from(["brick-breaker", "-q", "ultra"]).is_err());

            let help = Cli::try_parse_from(["brick-breaker", "--help"]).unwrap_err();
            assert_eq!(help.kind(), clap::error::ErrorKind::DisplayHelp);
        }

        #[test]
        fn test_short_run_with_seed() {
            let cli = Cli::try_parse_from(["brick-breaker", "--seed", "3", "--max-frames", "120"])
                .unwrap();
            let summary = run(cli).unwrap();
            assert_eq!(summary.seed, 3);
            assert_eq!(summary.frames, 120);
            assert_eq!(summary.sim_ticks, 120);
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    native::main();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // In the browser the host page drives `Runner` directly
}
