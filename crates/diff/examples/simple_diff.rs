use anyhow::Result;
use fix_diff::{diff_and_annotate, AnnotatedLineKind};

fn main() -> Result<()> {
    // Code as submitted, and the fix proposed for it
    let broken = r#"fn main() {
    let name = "Rust";
    println!("Hello, {}!", nmae);
}
"#;

    let fixed = r#"fn main() {
    // Greet by name
    let name = "Rust";
    println!("Hello, {}!", name);
}
"#;

    let diff = diff_and_annotate(broken, fixed)?;

    // Print diff statistics
    println!("Diff statistics:");
    println!("  Hunks: {}", diff.hunk_count());
    println!("  Added lines: {}", diff.added_lines());
    println!("  Removed lines: {}", diff.removed_lines());

    // Print the annotated document with color-coded lines
    println!("\nAnnotated document:");
    for (i, (line, kind)) in diff
        .document()
        .lines()
        .zip(diff.line_kinds())
        .enumerate()
    {
        match kind {
            AnnotatedLineKind::Old => println!("{:>3} \x1b[31m{}\x1b[0m", i, line),
            AnnotatedLineKind::New => println!("{:>3} \x1b[32m{}\x1b[0m", i, line),
            AnnotatedLineKind::Marker => println!("{:>3} \x1b[90m{}\x1b[0m", i, line),
            AnnotatedLineKind::Unchanged => println!("{:>3} {}", i, line),
        }
    }

    // Print where each hunk sits
    println!("\nRegions:");
    for (i, region) in diff.regions().iter().enumerate() {
        println!("Hunk {}:", i + 1);
        println!("  Old lines: {:?}", region.old_lines);
        println!("  Merge line: {}", region.merge_line);
        println!("  New lines: {:?}", region.new_lines);
    }

    Ok(())
}
