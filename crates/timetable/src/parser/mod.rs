//! Roster parser for the portal's course registration page.
//!
//! The page carries two tables, each introduced by a caption: the registered
//! course list and the weekly schedule. Both are found the same way:
//! 1. Find the one element whose own text contains the caption
//! 2. Walk up to the table holding the caption
//! 3. Take the next sibling element and, counting that sibling itself, its
//!    second table
//! 4. Keep the white-background rows of that table
//!
//! This follows the portal's markup closely; any layout change on the portal
//! side breaks it.

mod error;
mod rows;

pub use error::ParseError;
pub use rows::{day_index, hour_from_token, RowKind, DAY_TOKENS, UNKNOWN_DAY};

use crate::model::Subject;
use scraper::{ElementRef, Html, Selector};
use std::sync::LazyLock;
use tracing::{debug, info, warn};

/// Caption of the registered course table.
pub const COURSE_ANCHOR: &str = "Registered Course";

/// Caption of the weekly schedule table.
pub const SCHEDULE_ANCHOR: &str = "Schedule";

/// Background of data rows; header rows use other colors.
const DATA_ROW_COLOR: &str = "#ffffff";

static ROW_SELECTOR: LazyLock<Selector> = LazyLock::new(|| Selector::parse("tr[bgcolor]").unwrap());

/// Parses a saved registration page into subjects with merged schedule slots.
///
/// An empty list is a valid result and means nothing was parsed.
///
/// # Errors
/// Returns a structural [`ParseError`] when either caption is missing,
/// duplicated, or not followed by the expected tables. Malformed rows never
/// fail the parse; they are skipped.
pub fn parse(markup: &str) -> Result<Vec<Subject>, ParseError> {
    let document = Html::parse_document(markup);

    let course_rows = match find_rows(&document, COURSE_ANCHOR) {
        Ok(rows) => rows,
        Err(e) => {
            warn!(error = %e, "Course table not found");
            return Err(e);
        }
    };
    let schedule_rows = match find_rows(&document, SCHEDULE_ANCHOR) {
        Ok(rows) => rows,
        Err(e) => {
            warn!(error = %e, "Schedule table not found");
            return Err(e);
        }
    };

    let mut subjects = rows::parse_course_rows(&course_rows);
    rows::parse_schedule_rows(&schedule_rows, &mut subjects);

    info!(
        subjects = subjects.len(),
        slots = subjects.iter().map(|s| s.schedules().len()).sum::<usize>(),
        "Parsed roster"
    );

    Ok(subjects)
}

/// Locates the data table under `anchor` and returns its rows as cell texts.
fn find_rows(document: &Html, anchor: &str) -> Result<Vec<Vec<String>>, ParseError> {
    let caption = find_anchor(document, anchor)?;
    let not_found = || ParseError::TableNotFound {
        anchor: anchor.to_string(),
    };

    let caption_table = caption
        .ancestors()
        .filter_map(ElementRef::wrap)
        .find(|el| el.value().name() == "table")
        .ok_or_else(not_found)?;

    let container = caption_table
        .next_siblings()
        .find_map(ElementRef::wrap)
        .ok_or_else(not_found)?;

    let data_table = container
        .descendants()
        .filter_map(ElementRef::wrap)
        .filter(|el| el.value().name() == "table")
        .nth(1)
        .ok_or_else(not_found)?;

    let rows: Vec<Vec<String>> = data_table
        .select(&ROW_SELECTOR)
        .filter(is_data_row)
        .map(|row| row.children().filter_map(ElementRef::wrap).map(cell_text).collect())
        .collect();

    debug!(anchor = anchor, rows = rows.len(), "Collected table rows");

    Ok(rows)
}

/// Finds the single element whose own text contains `anchor`, ignoring case.
fn find_anchor<'a>(document: &'a Html, anchor: &str) -> Result<ElementRef<'a>, ParseError> {
    let needle = anchor.to_lowercase();

    let matches: Vec<ElementRef<'a>> = document
        .root_element()
        .descendants()
        .filter_map(ElementRef::wrap)
        .filter(|el| own_text(el).to_lowercase().contains(&needle))
        .collect();

    match matches.as_slice() {
        [single] => Ok(*single),
        [] => Err(ParseError::AnchorNotFound {
            anchor: anchor.to_string(),
        }),
        many => Err(ParseError::AnchorAmbiguous {
            anchor: anchor.to_string(),
            count: many.len(),
        }),
    }
}

/// Text of the element's direct text children, whitespace-normalized.
fn own_text(element: &ElementRef) -> String {
    let raw: String = element
        .children()
        .filter_map(|node| node.value().as_text().map(|t| &**t))
        .collect();
    normalize_whitespace(&raw)
}

fn cell_text(cell: ElementRef) -> String {
    normalize_whitespace(&cell.text().collect::<String>())
}

fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn is_data_row(row: &ElementRef) -> bool {
    row.value()
        .attr("bgcolor")
        .map(|color| color.to_lowercase().contains(DATA_ROW_COLOR))
        .unwrap_or(false)
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::model::{SectionKind, MONDAY};

    /// Builds a caption table followed by a container whose nested table holds `rows`.
    pub(crate) fn section_markup(anchor: &str, rows: &[&[&str]]) -> String {
        let body: String = rows
            .iter()
            .map(|cells| {
                let tds: String = cells.iter().map(|c| format!("<td> {c} </td>")).collect();
                format!("<tr bgcolor=\"#FFFFFF\">{tds}</tr>")
            })
            .collect();

        format!(
            "<table><tr><td><b>{anchor}</b></td></tr></table>\n\
             <table><tr><td>\
               <table><tr bgcolor=\"#C0C0C0\"><td>No</td><td>Header</td></tr>{body}</table>\
             </td></tr></table>"
        )
    }

    pub(crate) fn page(sections: &[String]) -> String {
        format!("<html><body>{}</body></html>", sections.concat())
    }

    #[test]
    fn test_parse_single_course() {
        let markup = page(&[
            section_markup(
                COURSE_ANCHOR,
                &[&["1", "CS101", "Intro to CS", "LEC A", "-", "3"]],
            ),
            section_markup(
                SCHEDULE_ANCHOR,
                &[
                    &["1", "CS101", "LEC A", "MON", "09AM", "LAB1"],
                    &["2", "MON", "10AM", "LAB1"],
                ],
            ),
        ]);

        let subjects = parse(&markup).unwrap();
        assert_eq!(subjects.len(), 1);

        let subject = &subjects[0];
        assert_eq!(subject.code, "CS101");
        assert_eq!(subject.description, "Intro to CS");
        assert_eq!(subject.lecture_section.as_deref(), Some("LEC A"));
        assert_eq!(subject.tutorial_section, None);
        assert_eq!(subject.credit_hours, 3);

        assert_eq!(subject.schedules().len(), 1);
        let slot = &subject.schedules()[0];
        assert_eq!(slot.section(), SectionKind::Lecture);
        assert_eq!(slot.day(), MONDAY);
        assert_eq!(slot.start_hour(), 9);
        assert_eq!(slot.length(), 2);
        assert_eq!(slot.room(), "LAB1");
    }

    #[test]
    fn test_missing_anchor_is_structural() {
        let markup = page(&[section_markup(
            COURSE_ANCHOR,
            &[&["1", "CS101", "Intro to CS", "LEC A", "-", "3"]],
        )]);

        let err = parse(&markup).unwrap_err();
        assert_eq!(
            err,
            ParseError::AnchorNotFound {
                anchor: SCHEDULE_ANCHOR.to_string()
            }
        );
        assert!(err.is_structural());
    }

    #[test]
    fn test_duplicate_anchor_is_structural() {
        let markup = page(&[
            section_markup(COURSE_ANCHOR, &[]),
            section_markup(COURSE_ANCHOR, &[]),
            section_markup(SCHEDULE_ANCHOR, &[]),
        ]);

        let err = parse(&markup).unwrap_err();
        assert!(matches!(err, ParseError::AnchorAmbiguous { count: 2, .. }));
        assert_eq!(err.anchor(), COURSE_ANCHOR);
    }

    #[test]
    fn test_anchor_without_table_is_structural() {
        let markup = format!(
            "<html><body><p>{COURSE_ANCHOR}</p>{}</body></html>",
            section_markup(SCHEDULE_ANCHOR, &[])
        );

        assert_eq!(
            parse(&markup).unwrap_err(),
            ParseError::TableNotFound {
                anchor: COURSE_ANCHOR.to_string()
            }
        );
    }

    #[test]
    fn test_no_rows_is_empty_not_error() {
        let markup = page(&[
            section_markup(COURSE_ANCHOR, &[]),
            section_markup(SCHEDULE_ANCHOR, &[]),
        ]);

        assert!(parse(&markup).unwrap().is_empty());
    }

    #[test]
    fn test_malformed_course_row_is_skipped() {
        let markup = page(&[
            section_markup(
                COURSE_ANCHOR,
                &[
                    &["1", "CS101", "Intro to CS"],
                    &["2", "MA201", "Calculus", "LEC B", "TUT 1", "4"],
                ],
            ),
            section_markup(SCHEDULE_ANCHOR, &[]),
        ]);

        let subjects = parse(&markup).unwrap();
        assert_eq!(subjects.len(), 1);
        assert_eq!(subjects[0].code, "MA201");
        assert_eq!(subjects[0].color, 0);
    }
}
