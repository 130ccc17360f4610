/// Indirect object number. Generation is always 0: documents are written
/// once and never updated in place.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjRef(pub u32);

/// The subset of PDF object types (PDF 32000-1:2008 Section 7.3) that an
/// invoice needs.
#[derive(Debug, Clone, PartialEq)]
pub enum PdfObject {
    Integer(i64),
    Real(f64),
    /// Name object, stored without the leading `/`.
    Name(String),
    /// Literal string, stored unescaped without the enclosing parens.
    Text(String),
    Array(Vec<PdfObject>),
    /// Entries keep insertion order so output is byte-for-byte reproducible.
    Dictionary(Vec<(String, PdfObject)>),
    Stream {
        dict: Vec<(String, PdfObject)>,
        data: Vec<u8>,
    },
    Reference(ObjRef),
}

impl PdfObject {
    pub fn name(s: &str) -> Self {
        PdfObject::Name(s.to_string())
    }

    pub fn text(s: &str) -> Self {
        PdfObject::Text(s.to_string())
    }

    pub fn dict(entries: Vec<(&str, PdfObject)>) -> Self {
        PdfObject::Dictionary(owned_entries(entries))
    }

    pub fn stream(entries: Vec<(&str, PdfObject)>, data: Vec<u8>) -> Self {
        PdfObject::Stream {
            dict: owned_entries(entries),
            data,
        }
    }

    /// `[0 0 width height]`
    pub fn rect(width: f64, height: f64) -> Self {
        PdfObject::Array(vec![
            PdfObject::Integer(0),
            PdfObject::Integer(0),
            PdfObject::Real(width),
            PdfObject::Real(height),
        ])
    }
}

fn owned_entries(entries: Vec<(&str, PdfObject)>) -> Vec<(String, PdfObject)> {
    entries
        .into_iter()
        .map(|(k, v)| (k.to_string(), v))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dict_keeps_entry_order() {
        let obj = PdfObject::dict(vec![
            ("Type", PdfObject::name("Catalog")),
            ("Pages", PdfObject::Reference(ObjRef(2))),
        ]);
        match obj {
            PdfObject::Dictionary(entries) => {
                let keys: Vec<&str> = entries.iter().map(|(k, _)| k.as_str()).collect();
                assert_eq!(keys, vec!["Type", "Pages"]);
            }
            _ => panic!("expected Dictionary"),
        }
    }

    #[test]
    fn media_box_rect() {
        match PdfObject::rect(595.0, 842.0) {
            PdfObject::Array(items) => {
                assert_eq!(items.len(), 4);
                assert_eq!(items[2], PdfObject::Real(595.0));
            }
            _ => panic!("expected Array"),
        }
    }
}
