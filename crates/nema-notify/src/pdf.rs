// PDF rendering of EAT records
//
// Layout is a single A4 column using the PDF built-in Helvetica fonts, so no
// font files are needed at runtime. Pages are added when the cursor reaches
// the bottom margin.

use anyhow::{anyhow, Result};
use chrono::{DateTime, SecondsFormat, Utc};
use nema_core::{yes_no, Eat, EatRenderer};
use printpdf::{
    BuiltinFont, IndirectFontRef, Mm, PdfDocument, PdfDocumentReference, PdfLayerReference,
};

const PAGE_WIDTH_MM: f32 = 210.0;
const PAGE_HEIGHT_MM: f32 = 297.0;
const MARGIN_MM: f32 = 15.0;
const LABEL_WIDTH_MM: f32 = 50.0;
const LAYER_NAME: &str = "Layer 1";

/// Characters per line of 10pt body text across the printable width
const WRAP_CHARS: usize = 95;

/// Renders EATs with printpdf
#[derive(Debug, Clone, Default)]
pub struct PdfRenderer;

impl PdfRenderer {
    pub fn new() -> Self {
        Self
    }

    /// Render `eat` with an explicit generation timestamp in the footer
    pub fn render_at(&self, eat: &Eat, generated_at: DateTime<Utc>) -> Result<Vec<u8>> {
        self.render_document(eat, generated_at).map(|(bytes, _)| bytes)
    }

    /// Rendered bytes and the number of pages written
    fn render_document(
        &self,
        eat: &Eat,
        generated_at: DateTime<Utc>,
    ) -> Result<(Vec<u8>, usize)> {
        let title = format!("Emergency Advisory Text {}", eat.event_title);
        let (doc, page, layer) =
            PdfDocument::new(title, Mm(PAGE_WIDTH_MM), Mm(PAGE_HEIGHT_MM), LAYER_NAME);

        let fonts = Fonts {
            regular: builtin_font(&doc, BuiltinFont::Helvetica)?,
            bold: builtin_font(&doc, BuiltinFont::HelveticaBold)?,
            italic: builtin_font(&doc, BuiltinFont::HelveticaOblique)?,
        };

        let pages = {
            let mut page = PageWriter {
                doc: &doc,
                layer: doc.get_page(page).get_layer(layer),
                fonts: &fonts,
                y: PAGE_HEIGHT_MM - MARGIN_MM - 5.0,
                pages: 1,
            };
            write_eat(&mut page, eat, generated_at);
            page.pages
        };

        let bytes = doc
            .save_to_bytes()
            .map_err(|e| anyhow!("pdf output: {:?}", e))?;
        Ok((bytes, pages))
    }
}

impl EatRenderer for PdfRenderer {
    fn render(&self, eat: &Eat) -> Result<Vec<u8>> {
        self.render_at(eat, Utc::now())
    }
}

struct Fonts {
    regular: IndirectFontRef,
    bold: IndirectFontRef,
    italic: IndirectFontRef,
}

#[derive(Clone, Copy)]
enum Style {
    Regular,
    Bold,
    Italic,
}

struct PageWriter<'a> {
    doc: &'a PdfDocumentReference,
    layer: PdfLayerReference,
    fonts: &'a Fonts,
    /// Baseline of the next line, measured from the bottom edge
    y: f32,
    pages: usize,
}

impl PageWriter<'_> {
    fn text_at(&self, x: f32, text: &str, size: f32, style: Style) {
        let font = match style {
            Style::Regular => &self.fonts.regular,
            Style::Bold => &self.fonts.bold,
            Style::Italic => &self.fonts.italic,
        };
        self.layer.use_text(text, size, Mm(x), Mm(self.y), font);
    }

    fn line(&mut self, text: &str, size: f32, style: Style, advance: f32) {
        self.text_at(MARGIN_MM, text, size, style);
        self.advance(advance);
    }

    fn field(&mut self, label: &str, value: &str) {
        self.text_at(MARGIN_MM, &format!("{}:", label), 10.0, Style::Bold);
        self.text_at(MARGIN_MM + LABEL_WIDTH_MM, value, 10.0, Style::Regular);
        self.advance(7.0);
    }

    fn advance(&mut self, mm: f32) {
        self.y -= mm;
        if self.y < MARGIN_MM {
            let (page, layer) =
                self.doc
                    .add_page(Mm(PAGE_WIDTH_MM), Mm(PAGE_HEIGHT_MM), LAYER_NAME);
            self.layer = self.doc.get_page(page).get_layer(layer);
            self.y = PAGE_HEIGHT_MM - MARGIN_MM - 5.0;
            self.pages += 1;
        }
    }
}

fn builtin_font(doc: &PdfDocumentReference, font: BuiltinFont) -> Result<IndirectFontRef> {
    doc.add_builtin_font(font)
        .map_err(|e| anyhow!("pdf font: {:?}", e))
}

fn write_eat(page: &mut PageWriter<'_>, eat: &Eat, generated_at: DateTime<Utc>) {
    page.line("Emergency Advisory Text", 18.0, Style::Bold, 15.0);
    page.line(&eat.event_title, 14.0, Style::Bold, 12.0);
    page.line(
        &format!("Version: {} | Status: {}", eat.version, eat.status),
        11.0,
        Style::Regular,
        10.0,
    );

    page.field("Location", &eat.location);
    page.field(
        "Event Date (UTC)",
        &eat.event_date.to_rfc3339_opts(SecondsFormat::Secs, true),
    );
    page.field("Magnitude", &eat.magnitude_display());
    if !eat.earthquake_url.is_empty() {
        page.field("Earthquake URL", &eat.earthquake_url);
    }
    page.field("Beach/Marine Threat", yes_no(eat.beach_marine_threat));
    page.field("Land Threat", yes_no(eat.land_threat));
    page.field("TEP Activated", yes_no(eat.tep_activated));

    if !eat.event_comments.is_empty() {
        page.advance(5.0);
        page.line("Event Comments:", 11.0, Style::Bold, 7.0);
        for line in wrap_text(&eat.event_comments, WRAP_CHARS) {
            page.line(&line, 10.0, Style::Regular, 5.0);
        }
    }

    if !eat.attachments.is_empty() {
        page.advance(5.0);
        page.line("Attachments:", 11.0, Style::Bold, 7.0);
        for file in &eat.attachments {
            page.line(
                &format!("- {} ({})", file.name, file.mime_type),
                10.0,
                Style::Regular,
                6.0,
            );
        }
    }

    page.advance(10.0);
    page.line(
        &format!(
            "Generated: {}",
            generated_at.to_rfc3339_opts(SecondsFormat::Secs, true)
        ),
        8.0,
        Style::Italic,
        4.0,
    );
}

/// Greedy word wrap that keeps explicit line breaks and splits overlong words
fn wrap_text(text: &str, width: usize) -> Vec<String> {
    let mut lines = Vec::new();
    for paragraph in text.lines() {
        let mut current = String::new();
        for word in paragraph.split_whitespace() {
            let mut word: Vec<char> = word.chars().collect();
            while word.len() > width {
                if !current.is_empty() {
                    lines.push(std::mem::take(&mut current));
                }
                lines.push(word.drain(..width).collect());
            }
            let word: String = word.into_iter().collect();
            if word.is_empty() {
                continue;
            }
            let needed = if current.is_empty() {
                word.chars().count()
            } else {
                current.chars().count() + 1 + word.chars().count()
            };
            if needed > width {
                lines.push(std::mem::take(&mut current));
            }
            if !current.is_empty() {
                current.push(' ');
            }
            current.push_str(&word);
        }
        lines.push(current);
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use nema_core::{EatFile, EatStatus};

    fn eat() -> Eat {
        Eat {
            id: Some(99),
            event_title: "M5.0-Wellington-2026-01-15".to_string(),
            location: "Wellington".to_string(),
            event_date: Utc.with_ymd_and_hms(2026, 1, 15, 10, 30, 0).unwrap(),
            magnitude: 5.0,
            earthquake_url: "https://www.geonet.org.nz/earthquake/2026p000001".to_string(),
            version: 2,
            event_comments: "Strong shaking reported.\nMonitor tide gauges.".to_string(),
            beach_marine_threat: true,
            land_threat: false,
            status: EatStatus::Confirmed,
            tep_activated: true,
            attachments: vec![EatFile {
                id: 3,
                name: "map.png".to_string(),
                path: "files/map.png".to_string(),
                url: None,
                size: 10,
                mime_type: "image/png".to_string(),
            }],
            created_at: None,
            updated_at: None,
        }
    }

    #[test]
    fn test_render_produces_pdf() {
        let bytes = PdfRenderer::new().render(&eat()).unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }

    #[test]
    fn test_render_minimal_record() {
        let mut eat = eat();
        eat.earthquake_url.clear();
        eat.event_comments.clear();
        eat.attachments.clear();
        let generated = Utc.with_ymd_and_hms(2026, 1, 15, 11, 0, 0).unwrap();
        let (bytes, pages) = PdfRenderer::new()
            .render_document(&eat, generated)
            .unwrap();
        assert!(bytes.starts_with(b"%PDF"));
        assert_eq!(pages, 1);
    }

    #[test]
    fn test_render_long_comments_spill_onto_new_pages() {
        let mut eat = eat();
        eat.event_comments = "Observation line.\n".repeat(120);
        let generated = Utc.with_ymd_and_hms(2026, 1, 15, 11, 0, 0).unwrap();
        let (bytes, pages) = PdfRenderer::new()
            .render_document(&eat, generated)
            .unwrap();
        assert!(bytes.starts_with(b"%PDF"));
        assert!(pages >= 2, "expected a second page, got {}", pages);
    }

    #[test]
    fn test_wrap_text() {
        assert_eq!(wrap_text("one two three", 7), vec!["one two", "three"]);
        assert_eq!(wrap_text("a\n\nb", 10), vec!["a", "", "b"]);
        assert_eq!(wrap_text("abcdefghij", 4), vec!["abcd", "efgh", "ij"]);
        assert!(wrap_text("", 10).is_empty());
    }
}
