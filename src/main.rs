use std::error::Error;

fn main() -> Result<(), Box<dyn Error>> {
    mcp_selection::cli::main()
}
