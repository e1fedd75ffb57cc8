//! Table formatting helpers for CLI output.

use comfy_table::{ContentArrangement, Table};
use conscanner_core::ImagesDocument;

/// Create a styled table with the given headers.
pub fn new_table(headers: &[&str]) -> Table {
    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.load_preset(comfy_table::presets::NOTHING);
    table.set_header(headers);
    table
}

/// One row per validated image.
pub fn images_table(document: &ImagesDocument) -> Table {
    let mut table = new_table(&["REGISTRY", "IMAGE", "TAG", "SCHEME"]);
    for record in &document.images {
        table.add_row(vec![
            record.registry.as_str(),
            record.image.as_str(),
            record.tag.as_str(),
            record.scheme.as_str(),
        ]);
    }
    table
}
