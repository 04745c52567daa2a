use anyhow::Result;

fn main() -> Result<()> {
    newprompt::cli::run()
}
