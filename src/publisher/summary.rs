use std::collections::BTreeMap;
use std::fmt::Write;

use crate::types::ExtractionResult;

pub const SUMMARY_FILE_NAME: &str = "README.md";
pub const SUMMARY_COMMIT_MESSAGE: &str = "Add repository summary";

pub fn format_bytes(bytes: u64) -> String {
    if bytes >= 1_000_000_000 {
        format!("{:.2} GB", bytes as f64 / 1_000_000_000.0)
    } else if bytes >= 1_000_000 {
        format!("{:.2} MB", bytes as f64 / 1_000_000.0)
    } else if bytes >= 1_000 {
        format!("{:.2} KB", bytes as f64 / 1_000.0)
    } else {
        format!("{bytes} B")
    }
}

/// Markdown summary of one extraction: counts, byte totals, the extension
/// histogram and the rendered directory tree.
pub fn render_summary(extraction: &ExtractionResult) -> String {
    let stats = &extraction.statistics;
    let mut out = String::new();

    let _ = writeln!(out, "# {}\n", extraction.folder_name);
    let _ = writeln!(
        out,
        "Published from an archive extracted at {}.\n",
        extraction.timestamp.format("%Y-%m-%d %H:%M:%S UTC")
    );

    let _ = writeln!(out, "## Contents\n");
    let _ = writeln!(out, "- Total files: {}", stats.total_files);
    let _ = writeln!(out, "- Total size: {}", format_bytes(stats.total_size));
    let _ = writeln!(
        out,
        "- Compressed size: {}",
        format_bytes(stats.total_compressed_size)
    );
    let _ = writeln!(out, "- Compression ratio: {}%", stats.compression_ratio);
    let _ = writeln!(
        out,
        "- Average file size: {}",
        format_bytes(stats.average_file_size)
    );
    if let Some(largest) = &stats.largest_file {
        let _ = writeln!(
            out,
            "- Largest file: {} ({})",
            largest.name,
            format_bytes(largest.size)
        );
    }
    if let Some(smallest) = &stats.smallest_file {
        let _ = writeln!(
            out,
            "- Smallest file: {} ({})",
            smallest.name,
            format_bytes(smallest.size)
        );
    }
    out.push('\n');

    if !stats.file_types.is_empty() {
        let _ = writeln!(out, "## File types\n");
        let _ = writeln!(out, "| Extension | Count |");
        let _ = writeln!(out, "|-----------|-------|");
        let ordered: BTreeMap<_, _> = stats.file_types.iter().collect();
        for (extension, count) in ordered {
            let _ = writeln!(out, "| {extension} | {count} |");
        }
        out.push('\n');
    }

    let _ = writeln!(out, "## Structure\n");
    let _ = writeln!(out, "```");
    out.push_str(&extraction.file_structure.render());
    let _ = writeln!(out, "```");

    out
}
