use std::io::{self, Write};

use flate2::write::ZlibEncoder;
use flate2::Compression;

use super::fonts::BuiltinFont;
use super::objects::{ObjRef, PdfObject};
use super::writer::{escape_literal, format_real, PdfWriter};
use crate::blocks::Stroke;
use crate::graphics::Color;

const CATALOG_OBJ: ObjRef = ObjRef(1);
const PAGES_OBJ: ObjRef = ObjRef(2);
const FONT_REGULAR_OBJ: ObjRef = ObjRef(3);
const FONT_BOLD_OBJ: ObjRef = ObjRef(4);
const FIRST_PAGE_OBJ_NUM: u32 = 5;

/// A piece of a text line set in one font.
#[derive(Debug, Clone, PartialEq)]
pub struct TextSpan {
    pub font: BuiltinFont,
    pub text: String,
}

/// Page-by-page PDF builder.
///
/// Each page is written out when it ends, so only the open page is held in
/// memory. Coordinates use PDF's bottom-left origin, in points.
pub struct PdfDocument<W: Write> {
    writer: PdfWriter<W>,
    info: Vec<(String, String)>,
    pages: Vec<ObjRef>,
    current: Option<PageBuilder>,
    next_obj_num: u32,
    compress: bool,
}

struct PageBuilder {
    width: f64,
    height: f64,
    ops: Vec<u8>,
}

impl<W: Write> PdfDocument<W> {
    /// Start a document: writes the header and the two shared font objects.
    pub fn new(writer: W) -> io::Result<Self> {
        let mut writer = PdfWriter::new(writer);
        writer.write_header()?;
        for (id, font) in [
            (FONT_REGULAR_OBJ, BuiltinFont::Helvetica),
            (FONT_BOLD_OBJ, BuiltinFont::HelveticaBold),
        ] {
            let dict = PdfObject::dict(vec![
                ("Type", PdfObject::name("Font")),
                ("Subtype", PdfObject::name("Type1")),
                ("BaseFont", PdfObject::name(font.base_name())),
                ("Encoding", PdfObject::name("WinAnsiEncoding")),
            ]);
            writer.write_object(id, &dict)?;
        }
        Ok(PdfDocument {
            writer,
            info: Vec::new(),
            pages: Vec::new(),
            current: None,
            next_obj_num: FIRST_PAGE_OBJ_NUM,
            compress: false,
        })
    }

    /// Flate-compress page content streams.
    pub fn set_compression(&mut self, compress: bool) -> &mut Self {
        self.compress = compress;
        self
    }

    /// Add a document info entry such as "Title" or "Creator".
    pub fn set_info(&mut self, key: &str, value: &str) -> &mut Self {
        self.info.push((key.to_string(), value.to_string()));
        self
    }

    /// Open a new page, closing the previous one first.
    pub fn begin_page(&mut self, width: f64, height: f64) -> io::Result<()> {
        if self.current.is_some() {
            self.end_page()?;
        }
        self.current = Some(PageBuilder {
            width,
            height,
            ops: Vec::new(),
        });
        Ok(())
    }

    pub fn has_open_page(&self) -> bool {
        self.current.is_some()
    }

    pub fn page_count(&self) -> usize {
        self.pages.len() + usize::from(self.current.is_some())
    }

    fn ops(&mut self) -> io::Result<&mut Vec<u8>> {
        self.current
            .as_mut()
            .map(|page| &mut page.ops)
            .ok_or_else(|| io::Error::new(io::ErrorKind::Other, "no open page"))
    }

    /// Fill an axis-aligned rectangle; `(x, y)` is the lower-left corner.
    pub fn fill_rect(&mut self, x: f64, y: f64, w: f64, h: f64, color: Color) -> io::Result<()> {
        let op = format!(
            "{} {} {} rg\n{} {} {} {} re\nf\n",
            format_real(color.r),
            format_real(color.g),
            format_real(color.b),
            format_real(x),
            format_real(y),
            format_real(w),
            format_real(h),
        );
        self.ops()?.extend_from_slice(op.as_bytes());
        Ok(())
    }

    /// Stroke a straight line.
    pub fn line(&mut self, from: (f64, f64), to: (f64, f64), stroke: Stroke) -> io::Result<()> {
        let op = format!(
            "q\n{} {} {} RG\n{} w\n{} {} m\n{} {} l\nS\nQ\n",
            format_real(stroke.color.r),
            format_real(stroke.color.g),
            format_real(stroke.color.b),
            format_real(stroke.width),
            format_real(from.0),
            format_real(from.1),
            format_real(to.0),
            format_real(to.1),
        );
        self.ops()?.extend_from_slice(op.as_bytes());
        Ok(())
    }

    /// Draw one line of text starting at baseline `(x, y)`. Spans follow
    /// each other without gaps; font changes are emitted only when needed.
    pub fn text_line(
        &mut self,
        spans: &[TextSpan],
        x: f64,
        y: f64,
        size: f64,
        color: Color,
    ) -> io::Result<()> {
        if spans.iter().all(|s| s.text.is_empty()) {
            return Ok(());
        }
        let ops = self.ops()?;
        ops.extend_from_slice(
            format!(
                "BT\n{} {} {} rg\n{} {} Td\n",
                format_real(color.r),
                format_real(color.g),
                format_real(color.b),
                format_real(x),
                format_real(y),
            )
            .as_bytes(),
        );
        let mut active: Option<BuiltinFont> = None;
        for span in spans.iter().filter(|s| !s.text.is_empty()) {
            if active != Some(span.font) {
                ops.extend_from_slice(
                    format!("/{} {} Tf\n", span.font.resource_name(), format_real(size))
                        .as_bytes(),
                );
                active = Some(span.font);
            }
            ops.push(b'(');
            ops.extend_from_slice(&escape_literal(&span.text));
            ops.extend_from_slice(b") Tj\n");
        }
        ops.extend_from_slice(b"ET\n");
        Ok(())
    }

    /// Write the open page's content stream and page dictionary.
    pub fn end_page(&mut self) -> io::Result<()> {
        let page = self
            .current
            .take()
            .ok_or_else(|| io::Error::new(io::ErrorKind::Other, "no open page"))?;

        let content_id = self.alloc();
        let page_id = self.alloc();

        let stream = if self.compress {
            let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
            encoder.write_all(&page.ops)?;
            PdfObject::stream(
                vec![("Filter", PdfObject::name("FlateDecode"))],
                encoder.finish()?,
            )
        } else {
            PdfObject::stream(vec![], page.ops)
        };
        self.writer.write_object(content_id, &stream)?;

        let fonts = BuiltinFont::ALL
            .iter()
            .zip([FONT_REGULAR_OBJ, FONT_BOLD_OBJ])
            .map(|(font, id)| (font.resource_name(), PdfObject::Reference(id)))
            .collect();
        let page_dict = PdfObject::dict(vec![
            ("Type", PdfObject::name("Page")),
            ("Parent", PdfObject::Reference(PAGES_OBJ)),
            ("MediaBox", PdfObject::rect(page.width, page.height)),
            ("Contents", PdfObject::Reference(content_id)),
            (
                "Resources",
                PdfObject::dict(vec![("Font", PdfObject::dict(fonts))]),
            ),
        ]);
        self.writer.write_object(page_id, &page_dict)?;
        self.pages.push(page_id);
        Ok(())
    }

    fn alloc(&mut self) -> ObjRef {
        let id = ObjRef(self.next_obj_num);
        self.next_obj_num += 1;
        id
    }

    /// Close any open page and write the info dictionary, page tree,
    /// catalog and trailer. Returns the underlying writer.
    pub fn end_document(mut self) -> io::Result<W> {
        if self.current.is_some() {
            self.end_page()?;
        }

        let info_id = if self.info.is_empty() {
            None
        } else {
            let id = self.alloc();
            let entries = self
                .info
                .iter()
                .map(|(k, v)| (k.as_str(), PdfObject::text(v)))
                .collect();
            self.writer.write_object(id, &PdfObject::dict(entries))?;
            Some(id)
        };

        let kids = self.pages.iter().map(|id| PdfObject::Reference(*id)).collect();
        let pages = PdfObject::dict(vec![
            ("Type", PdfObject::name("Pages")),
            ("Kids", PdfObject::Array(kids)),
            ("Count", PdfObject::Integer(self.pages.len() as i64)),
        ]);
        self.writer.write_object(PAGES_OBJ, &pages)?;

        let catalog = PdfObject::dict(vec![
            ("Type", PdfObject::name("Catalog")),
            ("Pages", PdfObject::Reference(PAGES_OBJ)),
        ]);
        self.writer.write_object(CATALOG_OBJ, &catalog)?;

        self.writer.finish(CATALOG_OBJ, info_id)
    }
}
