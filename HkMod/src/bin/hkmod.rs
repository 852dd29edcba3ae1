fn main() -> anyhow::Result<()> {
    hkmod::cli::run_cli()
}
