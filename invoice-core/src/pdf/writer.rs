use std::io::{self, Write};

use super::objects::{ObjRef, PdfObject};

/// Serializes indirect objects to a `Write` target, remembering each
/// object's byte offset for the cross-reference table.
pub struct PdfWriter<W: Write> {
    inner: W,
    offset: usize,
    offsets: Vec<(u32, usize)>,
}

impl<W: Write> PdfWriter<W> {
    pub fn new(inner: W) -> Self {
        PdfWriter {
            inner,
            offset: 0,
            offsets: Vec::new(),
        }
    }

    fn put(&mut self, data: &[u8]) -> io::Result<()> {
        self.inner.write_all(data)?;
        self.offset += data.len();
        Ok(())
    }

    fn put_str(&mut self, s: &str) -> io::Result<()> {
        self.put(s.as_bytes())
    }

    /// `%PDF-1.7` plus a comment of high bytes so transfer tools treat the
    /// file as binary.
    pub fn write_header(&mut self) -> io::Result<()> {
        self.put_str("%PDF-1.7\n")?;
        self.put(b"%\xe2\xe3\xcf\xd3\n")
    }

    pub fn write_object(&mut self, id: ObjRef, obj: &PdfObject) -> io::Result<()> {
        self.offsets.push((id.0, self.offset));
        self.put_str(&format!("{} 0 obj\n", id.0))?;
        self.write_value(obj)?;
        self.put_str("\nendobj\n")
    }

    fn write_value(&mut self, obj: &PdfObject) -> io::Result<()> {
        match obj {
            PdfObject::Integer(n) => self.put_str(&n.to_string()),
            PdfObject::Real(f) => self.put_str(&format_real(*f)),
            PdfObject::Name(name) => self.put_str(&format!("/{}", name)),
            PdfObject::Text(s) => {
                self.put(b"(")?;
                self.put(&escape_literal(s))?;
                self.put(b")")
            }
            PdfObject::Array(items) => {
                self.put_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        self.put_str(" ")?;
                    }
                    self.write_value(item)?;
                }
                self.put_str("]")
            }
            PdfObject::Dictionary(entries) => {
                self.write_entries(entries)?;
                self.put_str(" >>")
            }
            PdfObject::Stream { dict, data } => {
                self.write_entries(dict)?;
                self.put_str(&format!(" /Length {} >>\nstream\n", data.len()))?;
                self.put(data)?;
                self.put_str("\nendstream")
            }
            PdfObject::Reference(id) => self.put_str(&format!("{} 0 R", id.0)),
        }
    }

    /// Opening `<<` and every entry, without the closing `>>`.
    fn write_entries(&mut self, entries: &[(String, PdfObject)]) -> io::Result<()> {
        self.put_str("<<")?;
        for (key, value) in entries {
            self.put_str(&format!(" /{} ", key))?;
            self.write_value(value)?;
        }
        Ok(())
    }

    /// Write the xref table, trailer and `%%EOF`, returning the target.
    pub fn finish(mut self, root: ObjRef, info: Option<ObjRef>) -> io::Result<W> {
        let xref_offset = self.offset;
        self.offsets.sort_by_key(|&(num, _)| num);
        let size = self.offsets.last().map_or(0, |&(num, _)| num) + 1;

        let mut table = format!("xref\n0 {}\n", size);
        // Object 0 heads the free list. Every entry is exactly 20 bytes.
        table.push_str("0000000000 65535 f\r\n");
        let mut entries = self.offsets.iter().peekable();
        for num in 1..size {
            match entries.peek() {
                Some(&&(n, off)) if n == num => {
                    table.push_str(&format!("{:010} 00000 n\r\n", off));
                    entries.next();
                }
                _ => table.push_str("0000000000 00000 f\r\n"),
            }
        }
        self.put_str(&table)?;

        let mut trailer = format!("trailer\n<< /Size {} /Root {} 0 R", size, root.0);
        if let Some(info) = info {
            trailer.push_str(&format!(" /Info {} 0 R", info.0));
        }
        trailer.push_str(&format!(" >>\nstartxref\n{}\n%%EOF\n", xref_offset));
        self.put_str(&trailer)?;

        self.inner.flush()?;
        Ok(self.inner)
    }
}

/// Encode text for a literal string drawn with a builtin font.
///
/// Latin-1 characters map to their single-byte code (the fonts use
/// WinAnsiEncoding); anything else becomes `?`. Delimiters are escaped.
pub fn escape_literal(s: &str) -> Vec<u8> {
    let mut out = Vec::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            '\\' | '(' | ')' => {
                out.push(b'\\');
                out.push(ch as u8);
            }
            '\n' | '\r' | '\t' => out.push(b' '),
            ' '..='~' | '\u{a0}'..='\u{ff}' => out.push(ch as u32 as u8),
            _ => out.push(b'?'),
        }
    }
    out
}

/// Format a number for PDF output: at most four decimals, no trailing
/// zeros, never scientific notation.
pub fn format_real(v: f64) -> String {
    if v == v.trunc() && v.abs() < 1e15 {
        return format!("{}", v as i64);
    }
    let s = format!("{:.4}", v);
    let s = s.trim_end_matches('0').trim_end_matches('.');
    if s == "-0" {
        "0".to_string()
    } else {
        s.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn written(obj: &PdfObject) -> String {
        let mut w = PdfWriter::new(Vec::new());
        w.write_object(ObjRef(1), obj).unwrap();
        String::from_utf8_lossy(&w.inner).into_owned()
    }

    #[test]
    fn header_marks_binary() {
        let mut w = PdfWriter::new(Vec::new());
        w.write_header().unwrap();
        assert!(w.inner.starts_with(b"%PDF-1.7\n%"));
        assert!(w.inner[10..14].iter().all(|&b| b >= 128));
    }

    #[test]
    fn dictionary_syntax() {
        let out = written(&PdfObject::dict(vec![
            ("Type", PdfObject::name("Catalog")),
            ("Pages", PdfObject::Reference(ObjRef(2))),
        ]));
        assert!(out.starts_with("1 0 obj\n"));
        assert!(out.contains("<< /Type /Catalog /Pages 2 0 R >>"));
        assert!(out.ends_with("\nendobj\n"));
    }

    #[test]
    fn stream_length_counts_data() {
        let out = written(&PdfObject::stream(vec![], b"BT ET".to_vec()));
        assert!(out.contains("<< /Length 5 >>\nstream\nBT ET\nendstream"));
    }

    #[test]
    fn literal_escapes_delimiters() {
        assert_eq!(escape_literal("a(b)c\\d"), b"a\\(b\\)c\\\\d".to_vec());
    }

    #[test]
    fn literal_maps_latin1_and_replaces_others() {
        assert_eq!(escape_literal("caf\u{e9}"), vec![b'c', b'a', b'f', 0xe9]);
        assert_eq!(escape_literal("\u{20b9} 5"), b"? 5".to_vec());
    }

    #[test]
    fn reals_are_compact() {
        assert_eq!(format_real(612.0), "612");
        assert_eq!(format_real(12.5), "12.5");
        assert_eq!(format_real(595.27559), "595.2756");
        assert_eq!(format_real(-0.00001), "0");
    }

    #[test]
    fn xref_entries_are_twenty_bytes() {
        let mut w = PdfWriter::new(Vec::new());
        w.write_header().unwrap();
        w.write_object(ObjRef(1), &PdfObject::name("Catalog")).unwrap();
        w.write_object(ObjRef(3), &PdfObject::name("Gap")).unwrap();
        let buf = w.finish(ObjRef(1), None).unwrap();

        let marker = b"xref\n0 4\n";
        let start = buf
            .windows(marker.len())
            .position(|win| win == marker)
            .unwrap()
            + marker.len();
        let entries = &buf[start..start + 80];
        for chunk in entries.chunks(20) {
            assert_eq!(&chunk[18..], b"\r\n");
        }
        // Object 2 was never written.
        assert_eq!(&entries[40..60], b"0000000000 00000 f\r\n");
    }

    #[test]
    fn trailer_names_root_and_info() {
        let mut w = PdfWriter::new(Vec::new());
        w.write_header().unwrap();
        w.write_object(ObjRef(1), &PdfObject::name("Catalog")).unwrap();
        w.write_object(ObjRef(2), &PdfObject::dict(vec![("Title", PdfObject::text("t"))]))
            .unwrap();
        let buf = w.finish(ObjRef(1), Some(ObjRef(2))).unwrap();
        let out = String::from_utf8_lossy(&buf);
        assert!(out.contains("<< /Size 3 /Root 1 0 R /Info 2 0 R >>"));
        assert!(out.ends_with("%%EOF\n"));
    }
}
