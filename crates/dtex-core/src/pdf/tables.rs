//! Table detection over whitespace-aligned page text.

use super::RawTable;

/// Lines with fewer cells than this end the current table.
const MIN_COLUMNS: usize = 2;

/// One cell of a text line with its character offsets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CellSpan {
    pub start: usize,
    pub end: usize,
    pub text: String,
}

/// Split a line on tabs and runs of two or more spaces, keeping each cell's
/// character position.
pub fn split_line_into_spans(line: &str) -> Vec<CellSpan> {
    let mut spans = Vec::new();
    let mut current = String::new();
    let mut start = 0;
    let mut whitespace_run = 0_usize;

    for (pos, ch) in line.chars().enumerate() {
        if ch == '\t' {
            push_span(&mut spans, &mut current, start);
            whitespace_run = 0;
            continue;
        }

        if ch.is_whitespace() {
            whitespace_run += 1;
            if whitespace_run == 2 {
                push_span(&mut spans, &mut current, start);
            } else if whitespace_run == 1 && !current.is_empty() {
                current.push(' ');
            }
            continue;
        }

        if current.is_empty() {
            start = pos;
        }
        whitespace_run = 0;
        current.push(ch);
    }

    push_span(&mut spans, &mut current, start);
    spans
}

fn push_span(spans: &mut Vec<CellSpan>, current: &mut String, start: usize) {
    let text = current.trim_end();
    if !text.is_empty() {
        spans.push(CellSpan {
            start,
            end: start + text.chars().count(),
            text: text.to_string(),
        });
    }
    current.clear();
}

/// Group consecutive multi-cell lines into tables of at least two rows.
///
/// The first line of a block is its header. Data lines with as many cells as
/// the header map cell by cell; other lines are aligned to the header by
/// horizontal overlap, so gaps become missing cells and values without a
/// header above them get an unnamed column.
pub fn detect_tables(text: &str) -> Vec<RawTable> {
    let mut tables = Vec::new();
    let mut block: Vec<Vec<CellSpan>> = Vec::new();

    for line in text.lines() {
        let spans = split_line_into_spans(line);
        if spans.len() >= MIN_COLUMNS {
            block.push(spans);
        } else {
            finish(&mut block, &mut tables);
        }
    }

    finish(&mut block, &mut tables);
    tables
}

fn finish(block: &mut Vec<Vec<CellSpan>>, tables: &mut Vec<RawTable>) {
    if block.len() >= 2 {
        tables.push(align_block(std::mem::take(block)));
    } else {
        block.clear();
    }
}

struct Slot {
    start: usize,
    end: usize,
    header: Option<String>,
}

fn align_block(block: Vec<Vec<CellSpan>>) -> RawTable {
    let mut lines = block.into_iter();
    let header = lines.next().unwrap_or_default();
    let data: Vec<Vec<CellSpan>> = lines.collect();
    let named = header.len();

    let mut slots: Vec<Slot> = header
        .into_iter()
        .map(|s| Slot {
            start: s.start,
            end: s.end,
            header: Some(s.text),
        })
        .collect();

    for span in data.iter().filter(|line| line.len() != named).flatten() {
        if best_slot(&slots, span).is_none() {
            let at = slots.partition_point(|s| s.start < span.start);
            slots.insert(
                at,
                Slot {
                    start: span.start,
                    end: span.end,
                    header: None,
                },
            );
        }
    }

    let named_slots: Vec<usize> = (0..slots.len())
        .filter(|&i| slots[i].header.is_some())
        .collect();

    let mut rows = Vec::with_capacity(data.len() + 1);
    rows.push(slots.iter().map(|s| s.header.clone()).collect());

    for line in data {
        let mut row: Vec<Option<String>> = vec![None; slots.len()];

        if line.len() == named {
            for (span, &i) in line.into_iter().zip(&named_slots) {
                row[i] = Some(span.text);
            }
        } else {
            for span in line {
                let Some(i) = best_slot(&slots, &span) else {
                    continue;
                };
                match &mut row[i] {
                    Some(existing) => {
                        existing.push(' ');
                        existing.push_str(&span.text);
                    }
                    cell @ None => *cell = Some(span.text),
                }
            }
        }

        rows.push(row);
    }

    RawTable::new(rows)
}

/// Slot sharing the most character positions with `span`; leftmost on ties.
fn best_slot(slots: &[Slot], span: &CellSpan) -> Option<usize> {
    let mut best: Option<(usize, usize)> = None;
    for (i, slot) in slots.iter().enumerate() {
        let overlap = slot.end.min(span.end).saturating_sub(slot.start.max(span.start));
        if overlap > 0 && best.is_none_or(|(_, o)| overlap > o) {
            best = Some((i, overlap));
        }
    }
    best.map(|(i, _)| i)
}
