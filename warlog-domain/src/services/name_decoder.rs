use encoding_rs::Encoding;

/// Turns player names printed in the server's legacy code page into text.
#[derive(Debug, Clone, Copy)]
pub struct NameDecoder {
    encoding: &'static Encoding,
}

impl NameDecoder {
    pub fn new(encoding: &'static Encoding) -> Self {
        Self { encoding }
    }

    /// Accepts WHATWG labels such as `windows-1251`, `cp1251` or `utf-8`.
    pub fn for_label(label: &str) -> Option<Self> {
        Encoding::for_label(label.trim().as_bytes()).map(Self::new)
    }

    pub fn encoding_name(&self) -> &'static str {
        self.encoding.name()
    }

    /// Best effort: undecodable input comes back as a lossy view of the raw bytes.
    pub fn decode(&self, raw: &[u8]) -> String {
        if raw.is_ascii() {
            return String::from_utf8_lossy(raw).into_owned();
        }
        match self
            .encoding
            .decode_without_bom_handling_and_without_replacement(raw)
        {
            Some(text) => text.into_owned(),
            None => String::from_utf8_lossy(raw).into_owned(),
        }
    }
}

impl Default for NameDecoder {
    fn default() -> Self {
        Self::new(encoding_rs::WINDOWS_1251)
    }
}
