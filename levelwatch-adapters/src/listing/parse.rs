//! ListingParser - turns the online list markup into a snapshot.
//!
//! The table is positional: of the three cells in a row, the first is
//! ignored, the second is the name and the third the level. Anything else
//! is skipped, so a layout change yields an empty snapshot instead of an
//! error.

use std::sync::LazyLock;

use levelwatch_types::OnlineSnapshot;
use scraper::{ElementRef, Html, Selector};
use tracing::debug;

static ROW: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("table tr").expect("row selector is valid"));
static CELL: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("td").expect("cell selector is valid"));

const NAME_CELL: usize = 1;
const LEVEL_CELL: usize = 2;
const CELLS_PER_ROW: usize = 3;

/// Parse the listing markup. Never fails; malformed rows are dropped.
pub fn parse_listing(document: &str) -> OnlineSnapshot {
    let html = Html::parse_document(document);
    let mut snapshot = OnlineSnapshot::new();
    let mut skipped = 0usize;

    for row in html.select(&ROW) {
        let cells: Vec<ElementRef<'_>> = row.select(&CELL).collect();
        if cells.len() != CELLS_PER_ROW {
            // header rows (<th>) and layout rows land here
            continue;
        }

        let name = cell_text(&cells[NAME_CELL]);
        let level = cell_text(&cells[LEVEL_CELL]);

        match parse_level(&level) {
            Some(level) if !name.is_empty() => snapshot.insert(name, level),
            _ => {
                skipped += 1;
                debug!("Skipping listing row: name={:?} level={:?}", name, level);
            }
        }
    }

    if skipped > 0 {
        debug!(
            "Parsed {} online players, skipped {} rows",
            snapshot.len(),
            skipped
        );
    }

    snapshot
}

fn cell_text(cell: &ElementRef<'_>) -> String {
    cell.text().collect::<String>().trim().to_string()
}

fn parse_level(text: &str) -> Option<u32> {
    text.trim().parse::<u32>().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parses_three_cell_rows() {
        let page = r#"<table>
            <tr><td>1</td><td>Knight</td><td>51</td></tr>
            <tr><td>2</td><td> <b>Mage</b> </td><td> 10 </td></tr>
        </table>"#;

        let snapshot = parse_listing(page);
        assert_eq!(snapshot.len(), 2);
        assert_eq!(snapshot.level("Knight"), Some(51));
        assert_eq!(snapshot.level("Mage"), Some(10));
    }

    #[test]
    fn test_skips_rows_with_wrong_cell_count() {
        let page = r#"<table>
            <tr><th>#</th><th>Name</th><th>Level</th></tr>
            <tr><td>Knight</td><td>51</td></tr>
            <tr><td>1</td><td>Mage</td><td>10</td><td>extra</td></tr>
            <tr><td>3</td><td>Archer</td><td>7</td></tr>
        </table>"#;

        let snapshot = parse_listing(page);
        assert_eq!(snapshot.len(), 1);
        assert_eq!(snapshot.level("Archer"), Some(7));
    }

    #[test]
    fn test_skips_empty_names_and_bad_levels() {
        let page = r#"<table>
            <tr><td>1</td><td>   </td><td>51</td></tr>
            <tr><td>2</td><td>Mage</td><td>ten</td></tr>
            <tr><td>3</td><td>Rogue</td><td>-4</td></tr>
            <tr><td>4</td><td>Archer</td><td></td></tr>
        </table>"#;

        assert!(parse_listing(page).is_empty());
    }

    #[test]
    fn test_level_must_be_a_whole_number() {
        let page = r#"<table>
            <tr><td>1</td><td>Knight</td><td>51.5</td></tr>
            <tr><td>2</td><td>Mage</td><td>51 pts</td></tr>
            <tr><td>3</td><td>Rogue</td><td>51 (+1)</td></tr>
            <tr><td>4</td><td>Archer</td><td> 52 </td></tr>
        </table>"#;

        let snapshot = parse_listing(page);
        assert_eq!(snapshot.len(), 1);
        assert_eq!(snapshot.level("Knight"), None);
        assert_eq!(snapshot.level("Mage"), None);
        assert_eq!(snapshot.level("Rogue"), None);
        assert_eq!(snapshot.level("Archer"), Some(52));
    }

    #[test]
    fn test_garbage_yields_empty_snapshot() {
        assert!(parse_listing("").is_empty());
        assert!(parse_listing("<html><p>maintenance</p></html>").is_empty());
        assert!(parse_listing("<<<>>> not html at all").is_empty());
    }

    #[test]
    fn test_duplicate_name_keeps_last_row() {
        let page = r#"<table>
            <tr><td>1</td><td>Knight</td><td>50</td></tr>
            <tr><td>2</td><td>Knight</td><td>52</td></tr>
        </table>"#;

        assert_eq!(parse_listing(page).level("Knight"), Some(52));
    }

    #[test]
    fn test_names_keep_inner_spaces() {
        let page = "<table><tr><td>1</td><td>Big Knight</td><td>80</td></tr></table>";
        assert_eq!(parse_listing(page).level("Big Knight"), Some(80));
    }
}
