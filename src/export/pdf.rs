use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, ObjectId, Stream};

use super::{ExportError, DOCUMENT_HEADING};

// US Letter in points.
const PAGE_WIDTH: i64 = 612;
const PAGE_HEIGHT: i64 = 792;
const MARGIN: i64 = 72;

const BODY_FONT_SIZE: i64 = 11;
const HEADING_FONT_SIZE: i64 = 16;
const LEADING: i64 = 14;
/// Lines reserved for the heading on the first page.
const HEADING_LINES: usize = 2;

/// Helvetica advance widths (1/1000 em) for WinAnsi codes 0x20..=0xFF, from the
/// standard Adobe font metrics.
#[rustfmt::skip]
const HELVETICA_WIDTHS: [u16; 224] = [
    // 0x20
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278,
    // 0x30
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 278, 278, 584, 584, 584, 556,
    // 0x40
    1015, 667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, 722, 778,
    // 0x50
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 278, 278, 278, 469, 556,
    // 0x60
    333, 556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, 556, 556,
    // 0x70
    556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, 334, 260, 334, 584, 350,
    // 0x80
    556, 350, 222, 556, 333, 1000, 556, 556, 333, 1000, 667, 333, 1000, 350, 611, 350,
    // 0x90
    350, 222, 222, 333, 333, 350, 556, 1000, 333, 1000, 500, 333, 944, 350, 500, 667,
    // 0xA0
    278, 333, 556, 556, 556, 556, 260, 556, 333, 737, 370, 556, 584, 333, 737, 333,
    // 0xB0
    400, 584, 333, 333, 333, 556, 537, 278, 333, 333, 365, 556, 834, 834, 834, 611,
    // 0xC0
    667, 667, 667, 667, 667, 667, 1000, 722, 667, 667, 667, 667, 278, 278, 278, 278,
    // 0xD0
    722, 722, 778, 778, 778, 778, 778, 584, 778, 722, 722, 722, 722, 667, 667, 611,
    // 0xE0
    556, 556, 556, 556, 556, 556, 889, 500, 556, 556, 556, 556, 278, 278, 278, 278,
    // 0xF0
    556, 556, 556, 556, 556, 556, 556, 584, 611, 556, 556, 556, 500, 500, 556, 500,
];

/// Printable width between the side margins, in points.
pub const USABLE_WIDTH: i64 = PAGE_WIDTH - 2 * MARGIN;

/// Largest body line advance, in 1/1000 em, that fits the printable width.
pub fn line_capacity() -> u32 {
    (USABLE_WIDTH * 1000 / BODY_FONT_SIZE) as u32
}

pub fn lines_per_page() -> usize {
    ((PAGE_HEIGHT - 2 * MARGIN) / LEADING) as usize
}

fn char_advance(c: char) -> u32 {
    let code = win_ansi_byte(c);
    HELVETICA_WIDTHS
        .get(usize::from(code).wrapping_sub(0x20))
        .copied()
        .unwrap_or(HELVETICA_WIDTHS[0]) as u32
}

/// Helvetica advance of `text` in 1/1000 em, as it will be drawn.
pub fn advance(text: &str) -> u32 {
    text.chars().map(char_advance).sum()
}

/// Greedy word wrap by rendered width. Input newlines are kept as paragraph breaks
/// and words wider than `max_width` are split between characters.
pub fn wrap_text(text: &str, max_width: u32) -> Vec<String> {
    let space = char_advance(' ');
    let mut lines = Vec::new();

    for paragraph in text.lines() {
        let paragraph = paragraph.replace('\t', "    ");
        let mut current = String::new();
        let mut current_width = 0;

        for word in paragraph.split_whitespace() {
            let mut word = word.to_string();
            let mut word_width = advance(&word);

            if word_width > max_width {
                if !current.is_empty() {
                    lines.push(std::mem::take(&mut current));
                    current_width = 0;
                }
                let mut chunk = String::new();
                let mut chunk_width = 0;
                for c in word.chars() {
                    let width = char_advance(c);
                    if !chunk.is_empty() && chunk_width + width > max_width {
                        lines.push(std::mem::take(&mut chunk));
                        chunk_width = 0;
                    }
                    chunk.push(c);
                    chunk_width += width;
                }
                word = chunk;
                word_width = chunk_width;
            }

            if !current.is_empty() && current_width + space + word_width > max_width {
                lines.push(std::mem::take(&mut current));
                current_width = 0;
            }
            if !current.is_empty() {
                current.push(' ');
                current_width += space;
            }
            current.push_str(&word);
            current_width += word_width;
        }

        lines.push(current);
    }

    lines
}

/// Splits wrapped lines into pages, leaving room for the heading on page one.
pub fn paginate(lines: Vec<String>, per_page: usize) -> Vec<Vec<String>> {
    let per_page = per_page.max(HEADING_LINES + 1);
    let mut pages = Vec::new();
    let mut remaining = lines.into_iter().peekable();
    let mut capacity = per_page - HEADING_LINES;

    loop {
        let page: Vec<String> = remaining.by_ref().take(capacity).collect();
        pages.push(page);
        if remaining.peek().is_none() {
            break;
        }
        capacity = per_page;
    }

    pages
}

/// Maps a character onto its WinAnsi code for the standard Helvetica font.
fn win_ansi_byte(c: char) -> u8 {
    match c {
        ' '..='~' => c as u8,
        '\u{a0}'..='\u{ff}' => c as u32 as u8,
        '\u{2018}' | '\u{2019}' => b'\'',
        '\u{201c}' | '\u{201d}' => b'"',
        '\u{2013}' | '\u{2014}' => b'-',
        '\u{2022}' => 0x95,
        '\u{2026}' => 0x85,
        _ => b'?',
    }
}

fn win_ansi(text: &str) -> Vec<u8> {
    text.chars().map(win_ansi_byte).collect()
}

fn page_operations(lines: &[String], with_heading: bool) -> Vec<Operation> {
    let mut ops = vec![
        Operation::new("BT", vec![]),
        Operation::new("TL", vec![LEADING.into()]),
        Operation::new("Td", vec![MARGIN.into(), (PAGE_HEIGHT - MARGIN).into()]),
    ];

    if with_heading {
        ops.push(Operation::new("Tf", vec!["F2".into(), HEADING_FONT_SIZE.into()]));
        ops.push(Operation::new(
            "Tj",
            vec![Object::string_literal(win_ansi(DOCUMENT_HEADING))],
        ));
        for _ in 0..HEADING_LINES {
            ops.push(Operation::new("T*", vec![]));
        }
    }

    ops.push(Operation::new("Tf", vec!["F1".into(), BODY_FONT_SIZE.into()]));
    for line in lines {
        if !line.is_empty() {
            ops.push(Operation::new("Tj", vec![Object::string_literal(win_ansi(line))]));
        }
        ops.push(Operation::new("T*", vec![]));
    }

    ops.push(Operation::new("ET", vec![]));
    ops
}

pub fn render(text: &str) -> Result<Vec<u8>, ExportError> {
    let pages = paginate(wrap_text(text, line_capacity()), lines_per_page());

    let mut doc = Document::with_version("1.5");
    let pages_id: ObjectId = doc.new_object_id();

    let body_font = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
        "Encoding" => "WinAnsiEncoding",
    });
    let heading_font = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica-Bold",
        "Encoding" => "WinAnsiEncoding",
    });
    let resources = doc.add_object(dictionary! {
        "Font" => dictionary! {
            "F1" => body_font,
            "F2" => heading_font,
        },
    });

    let mut kids: Vec<Object> = Vec::with_capacity(pages.len());
    for (index, lines) in pages.iter().enumerate() {
        let content = Content {
            operations: page_operations(lines, index == 0),
        };
        let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode()?));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
        });
        kids.push(page_id.into());
    }

    let page_count = kids.len() as i64;
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => page_count,
            "Resources" => resources,
            "MediaBox" => vec![0_i64.into(), 0_i64.into(), PAGE_WIDTH.into(), PAGE_HEIGHT.into()],
        }),
    );

    let catalog = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog);
    doc.compress();

    let mut bytes = Vec::new();
    doc.save_to(&mut bytes)?;
    Ok(bytes)
}
