use anyhow::Result;
use fix_diff::DiffConfig;
use std::env;
use std::path::Path;

fn main() -> Result<()> {
    let args: Vec<String> = env::args().collect();

    if args.len() < 3 {
        println!("Usage: normalized_diff <old_file> <new_file> [--exact]");
        return Ok(());
    }

    let old_file = &args[1];
    let new_file = &args[2];
    let exact = args.get(3).is_some_and(|arg| arg == "--exact");

    println!(
        "Comparing {} and {} ({} comparison)",
        old_file,
        new_file,
        if exact { "exact" } else { "whitespace-insensitive" }
    );

    // Read the file contents
    let old_content = std::fs::read_to_string(Path::new(old_file))?;
    let new_content = std::fs::read_to_string(Path::new(new_file))?;

    let config = DiffConfig::default().ignore_whitespace(!exact);
    let diff = config.diff_and_annotate(&old_content, &new_content)?;

    println!("\nAnnotated document:");
    print!("{}", diff.document());

    println!("\n{} hunk(s)", diff.hunk_count());

    Ok(())
}
