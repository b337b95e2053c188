use clap::Parser;

mod platform;

fn main() -> anyhow::Result<()> {
    platform::run_app(platform::Args::parse())
}
