// Markdown report backend

use std::fmt::{self, Write};

use potmap_report::{
    Block, ChartImages, DocumentWriter, ReportDocument, ReportError, SectionId, Table, TextStyle,
};

/// Plain-text report. Available charts are linked as `<identifier>.png`
/// next to the output file; missing ones print their fallback text.
#[derive(Debug, Clone, Copy, Default)]
pub struct MarkdownDocumentWriter;

impl DocumentWriter for MarkdownDocumentWriter {
    fn write_document(
        &self,
        document: &ReportDocument,
        images: &ChartImages,
    ) -> Result<Vec<u8>, ReportError> {
        let mut out = String::new();
        write_markdown(&mut out, document, images).map_err(|e| ReportError::Write(e.to_string()))?;
        Ok(out.into_bytes())
    }

    fn extension(&self) -> &'static str {
        "md"
    }
}

fn write_markdown(out: &mut String, doc: &ReportDocument, images: &ChartImages) -> fmt::Result {
    for section in &doc.sections {
        // the header section opens with its own heading block
        if section.id != SectionId::Header {
            writeln!(out, "## {}\n", section.title)?;
        }
        for block in &section.blocks {
            write_block(out, block, images)?;
        }
    }
    writeln!(out, "---\n\n_{}_", doc.meta.footer)
}

fn write_block(out: &mut String, block: &Block, images: &ChartImages) -> fmt::Result {
    match block {
        Block::Heading { level, text } => {
            writeln!(out, "{} {}\n", "#".repeat(usize::from(*level).clamp(1, 6)), text)
        }
        Block::KeyValueBox { title, entries } => {
            writeln!(out, "**{title}**\n")?;
            for e in entries {
                let value = if e.value.is_empty() { "______________" } else { e.value.as_str() };
                writeln!(out, "- {}: {}", e.key, value)?;
            }
            writeln!(out)
        }
        Block::Table(table) => write_table(out, table),
        Block::TextBlock { text, style } => match style {
            TextStyle::Normal => writeln!(out, "{text}\n"),
            TextStyle::Emphasis => writeln!(out, "**{text}**\n"),
            TextStyle::Caption | TextStyle::Placeholder => writeln!(out, "_{text}_\n"),
        },
        Block::ImagePlaceholder { chart, caption, fallback } => {
            let alt = caption.as_deref().unwrap_or(chart.identifier());
            if images.contains_key(chart) {
                writeln!(out, "![{alt}]({}.png)\n", chart.identifier())
            } else {
                writeln!(out, "{fallback}\n")?;
                match caption {
                    Some(c) => writeln!(out, "_{c}_\n"),
                    None => Ok(()),
                }
            }
        }
        Block::MetricTriplet { metrics } => {
            let labels: Vec<String> = metrics.iter().map(|m| cell(&m.label)).collect();
            let values: Vec<String> = metrics
                .iter()
                .map(|m| cell(format!("{} {}", m.value, m.unit).trim()))
                .collect();
            writeln!(out, "| {} |", labels.join(" | "))?;
            writeln!(out, "|---|---|---|")?;
            writeln!(out, "| {} |\n", values.join(" | "))
        }
        Block::Callout { severity, title, body, reference } => {
            writeln!(out, "> **[{}] {}**", severity.to_string().to_uppercase(), title)?;
            writeln!(out, ">\n> {body}")?;
            if let Some(r) = reference {
                writeln!(out, ">\n> _{r}_")?;
            }
            writeln!(out)
        }
    }
}

fn write_table(out: &mut String, table: &Table) -> fmt::Result {
    if table.rows.is_empty() {
        if let Some(text) = &table.empty_text {
            return writeln!(out, "_{text}_\n");
        }
    }
    let header: Vec<String> = table.columns.iter().map(|c| cell(c)).collect();
    writeln!(out, "| {} |", header.join(" | "))?;
    writeln!(out, "|{}", "---|".repeat(table.columns.len()))?;
    for row in &table.rows {
        let cells: Vec<String> = row.iter().map(|c| cell(c)).collect();
        writeln!(out, "| {} |", cells.join(" | "))?;
    }
    writeln!(out)?;
    if let Some(note) = &table.note {
        writeln!(out, "_{note}_\n")?;
    }
    Ok(())
}

fn cell(s: &str) -> String {
    s.replace('|', "\\|")
}
