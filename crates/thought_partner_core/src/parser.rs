//! crates/thought_partner_core/src/parser.rs
//!
//! Turns the agent's free-text reply into chat text plus whiteboard items.
//!
//! The agent asks for items with bracketed directives such as
//! `[create sticky]Ship v2[/create sticky]`. Directives are pulled out kind by
//! kind, in the fixed order of [`ItemKind::directive_kinds`], so the produced
//! items are stable for a given input regardless of where tags appear.

use std::ops::Range;

use crate::domain::{ItemDescriptor, ItemKind, Point, Provenance};

/// Appended to the chat text whenever at least one item was extracted.
pub const ITEMS_ADDED_NOTE: &str =
    "I've added some items to the whiteboard to help organize our thoughts.";

/// Where parsed items sit until the layout engine places them.
const UNPLACED: Point = Point::new(100.0, 100.0);

/// The result of parsing one agent reply.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedResponse {
    pub cleaned_content: String,
    pub items: Vec<ItemDescriptor>,
}

/// A located `[create kind]...[/create kind]` pair, as byte ranges into the text.
struct Directive {
    span: Range<usize>,
    body: Range<usize>,
}

/// Extracts every well-formed creation directive from `raw`.
///
/// Tag names match case-insensitively and bodies may span lines. An opening
/// tag without a matching closing tag is left in the text untouched. A
/// directive with nothing at all between its tags is removed but creates
/// nothing; a whitespace-only body still yields an item with empty content.
pub fn parse(raw: &str) -> ParsedResponse {
    let mut text = raw.to_string();
    let mut items = Vec::new();

    for kind in ItemKind::directive_kinds() {
        while let Some(directive) = find_directive(&text, kind) {
            if !directive.body.is_empty() {
                let body = text[directive.body].trim().to_string();
                items.push(agent_item(kind, body));
            }
            text.replace_range(directive.span, "");
        }
    }

    if items.is_empty() {
        return ParsedResponse {
            cleaned_content: text,
            items,
        };
    }

    let remainder = text.trim();
    let cleaned_content = if remainder.is_empty() {
        ITEMS_ADDED_NOTE.to_string()
    } else {
        format!("{}\n\n({})", remainder, ITEMS_ADDED_NOTE)
    };
    ParsedResponse {
        cleaned_content,
        items,
    }
}

/// Splits table content into rows of trimmed cells. The first row is the header.
pub fn parse_table(content: &str) -> Vec<Vec<String>> {
    content
        .lines()
        .filter(|line| !line.trim().is_empty())
        .map(|line| line.split(',').map(|cell| cell.trim().to_string()).collect())
        .collect()
}

fn find_directive(text: &str, kind: ItemKind) -> Option<Directive> {
    let open = format!("[create {}]", kind.as_str());
    let close = format!("[/create {}]", kind.as_str());

    // ASCII lowercasing keeps byte offsets identical to `text`.
    let lowered = text.to_ascii_lowercase();
    let start = lowered.find(&open)?;
    let body_start = start + open.len();
    let body_end = body_start + lowered[body_start..].find(&close)?;

    Some(Directive {
        span: start..body_end + close.len(),
        body: body_start..body_end,
    })
}

fn agent_item(kind: ItemKind, content: String) -> ItemDescriptor {
    let mut item = ItemDescriptor::new(kind, content, Provenance::Agent);
    item.position = UNPLACED;
    if kind == ItemKind::Table {
        let grid = parse_table(&item.content);
        item.columns = grid.first().map(|header| header.len() as u32);
        item.rows = Some(grid.len() as u32);
    }
    item
}

#[cfg(test)]
mod tests {
    use super::*;

    fn suffixed(text: &str) -> String {
        format!("{}\n\n({})", text, ITEMS_ADDED_NOTE)
    }

    #[test]
    fn single_sticky_becomes_note_only_message() {
        let parsed = parse("[create sticky]Hello[/create sticky]");
        assert_eq!(parsed.cleaned_content, ITEMS_ADDED_NOTE);
        assert_eq!(parsed.items.len(), 1);
        let item = &parsed.items[0];
        assert_eq!(item.kind, ItemKind::Sticky);
        assert_eq!(item.content, "Hello");
        assert_eq!(item.created_by, Provenance::Agent);
        assert_eq!(item.width, Some(240.0));
        assert_eq!(item.height, Some(200.0));
    }

    #[test]
    fn repeated_kind_yields_items_in_text_order() {
        let parsed = parse("[create text]A[/create text] middle [create text]B[/create text]");
        let contents: Vec<_> = parsed.items.iter().map(|i| i.content.as_str()).collect();
        assert_eq!(contents, ["A", "B"]);
        assert_eq!(parsed.cleaned_content, suffixed("middle"));
    }

    #[test]
    fn text_without_directives_passes_through_unchanged() {
        let raw = "  Let's start with user research. [not a directive]  ";
        let parsed = parse(raw);
        assert_eq!(parsed.cleaned_content, raw);
        assert!(parsed.items.is_empty());
    }

    #[test]
    fn kinds_are_extracted_in_fixed_order() {
        let parsed = parse(
            "[create table]a,b\n1,2[/create table]\
             [create text]T[/create text]\
             [create heading]H[/create heading]\
             [create sticky]S[/create sticky]\
             [create bulletpoints]• one[/create bulletpoints]",
        );
        let kinds: Vec<_> = parsed.items.iter().map(|i| i.kind).collect();
        assert_eq!(
            kinds,
            [
                ItemKind::Sticky,
                ItemKind::Heading,
                ItemKind::BulletPoints,
                ItemKind::Text,
                ItemKind::Table,
            ]
        );
        assert_eq!(parsed.cleaned_content, ITEMS_ADDED_NOTE);
    }

    #[test]
    fn tag_names_match_case_insensitively_and_bodies_span_lines() {
        let parsed = parse("Plan:\n[CREATE Sticky]\n  Goals\n- grow\n[/Create STICKY]\nDone.");
        assert_eq!(parsed.items.len(), 1);
        assert_eq!(parsed.items[0].content, "Goals\n- grow");
        assert_eq!(parsed.cleaned_content, suffixed("Plan:\n\nDone."));
    }

    #[test]
    fn unterminated_directive_is_left_in_place() {
        let raw = "Before [create sticky]never closed";
        let parsed = parse(raw);
        assert_eq!(parsed.cleaned_content, raw);
        assert!(parsed.items.is_empty());

        let parsed = parse("[create sticky]open [create heading]Title[/create heading]");
        assert_eq!(parsed.items.len(), 1);
        assert_eq!(parsed.items[0].kind, ItemKind::Heading);
        assert_eq!(parsed.cleaned_content, suffixed("[create sticky]open"));
    }

    #[test]
    fn empty_directive_is_removed_without_creating_an_item() {
        let parsed = parse("x [create sticky][/create sticky] y");
        assert!(parsed.items.is_empty());
        assert_eq!(parsed.cleaned_content, "x  y");
    }

    #[test]
    fn whitespace_only_directive_creates_an_empty_item() {
        let parsed = parse("a [create sticky]   [/create sticky] b");
        assert_eq!(parsed.items.len(), 1);
        assert_eq!(parsed.items[0].kind, ItemKind::Sticky);
        assert_eq!(parsed.items[0].content, "");
        assert_eq!(parsed.cleaned_content, suffixed("a  b"));
    }

    #[test]
    fn table_directive_counts_columns_and_rows() {
        let parsed = parse(
            "[create table]Task,Owner,Due\nResearch,Ana,May\n\nDesign,Li,June\n[/create table]",
        );
        let table = &parsed.items[0];
        assert_eq!(table.kind, ItemKind::Table);
        assert_eq!(table.columns, Some(3));
        assert_eq!(table.rows, Some(3));
        assert_eq!(parse_table(&table.content)[1], ["Research", "Ana", "May"]);
    }

    #[test]
    fn non_ascii_text_around_directives_is_preserved() {
        let parsed = parse("Überblick → [create text]Größe[/create text] ✓");
        assert_eq!(parsed.items[0].content, "Größe");
        assert_eq!(parsed.cleaned_content, suffixed("Überblick →  ✓"));
    }
}
