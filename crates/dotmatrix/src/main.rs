use clap::Parser;
use dotmatrix::RunConfig;

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let config = RunConfig::parse();
    log::info!("Playing ROM path: '{}'", config.rom_path.display());
    dotmatrix::run(config)
}
