use std::fmt::Display;
use std::path::Path;

use crate::encoding::TextEncoding;
use crate::error::CsvWriteError;
use crate::io::output_encoded_to_file;

/// A finished CSV payload together with its target encoding
///
/// Returned by [`write_with_options`](crate::write_with_options). The text is
/// kept as assembled; the encoding only applies when bytes are requested.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsvText {
    text: String,
    encoding: TextEncoding,
}

impl CsvText {
    /// Wrap `text`, to be encoded with `encoding`
    pub fn new(text: impl Into<String>, encoding: TextEncoding) -> Self {
        Self {
            text: text.into(),
            encoding,
        }
    }

    /// The CSV text as assembled
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Target encoding
    pub fn encoding(&self) -> TextEncoding {
        self.encoding
    }

    /// The text as it reads after a round trip through the target encoding
    ///
    /// Characters the encoding cannot represent show up as `?`.
    pub fn encoded_text(&self) -> String {
        self.encoding.decode(&self.bytes())
    }

    /// The text after a round trip through the encoding labelled `encoding`
    pub fn text_in(&self, encoding: &str) -> Result<String, CsvWriteError> {
        let encoding = TextEncoding::for_label(encoding)?;
        Ok(encoding.decode(&encoding.encode(&self.text)))
    }

    /// The text encoded with the target encoding
    pub fn bytes(&self) -> Vec<u8> {
        self.encoding.encode(&self.text)
    }

    /// The text encoded with the encoding labelled `encoding`
    pub fn bytes_in(&self, encoding: &str) -> Result<Vec<u8>, CsvWriteError> {
        Ok(TextEncoding::for_label(encoding)?.encode(&self.text))
    }

    /// Write the encoded text to `path`
    pub fn output_file<P: AsRef<Path>>(&self, path: P) -> Result<(), CsvWriteError> {
        output_encoded_to_file(&self.bytes(), path.as_ref())
    }

    /// Consume and return the assembled text
    pub fn into_text(self) -> String {
        self.text
    }
}

impl Display for CsvText {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.text)
    }
}

impl AsRef<str> for CsvText {
    fn as_ref(&self) -> &str {
        &self.text
    }
}
