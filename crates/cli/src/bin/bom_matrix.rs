use anyhow::Result;

fn main() -> Result<()> {
    bom_cli::main_entry()
}
