use crate::core::types::AlleleCode;
use crate::parsing::input::ColumnLayout;

/// One parsed input line.
///
/// Fields are owned copies of the tokenized line. Only the identifier and the
/// two allele fields are ever rewritten; everything else is written back
/// exactly as read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputRecord {
    /// 1-based line number in the input file (header is line 1)
    pub line_number: u64,

    fields: Vec<String>,
}

impl InputRecord {
    #[must_use]
    pub fn new(line_number: u64, fields: Vec<String>) -> Self {
        Self {
            line_number,
            fields,
        }
    }

    #[must_use]
    pub fn fields(&self) -> &[String] {
        &self.fields
    }

    #[must_use]
    pub fn field(&self, index: usize) -> &str {
        self.fields.get(index).map_or("", String::as_str)
    }

    /// Trimmed value of a field
    #[must_use]
    pub fn trimmed(&self, index: usize) -> &str {
        self.field(index).trim()
    }

    pub fn set_field(&mut self, index: usize, value: impl Into<String>) {
        if let Some(field) = self.fields.get_mut(index) {
            *field = value.into();
        }
    }

    /// Replace both allele fields with symbolic codes
    pub fn set_codes(&mut self, layout: &ColumnLayout, codes: (AlleleCode, AlleleCode)) {
        self.set_field(layout.first_allele, codes.0.as_str());
        self.set_field(layout.second_allele, codes.1.as_str());
    }

    /// Join fields back into a line using the input separator
    #[must_use]
    pub fn to_line(&self, separator: char) -> String {
        let mut buf = [0u8; 4];
        self.fields.join(&*separator.encode_utf8(&mut buf))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_line_preserves_fields() {
        let record = InputRecord::new(
            2,
            vec!["rs1".to_string(), " chr1 ".to_string(), String::new()],
        );
        assert_eq!(record.to_line('\t'), "rs1\t chr1 \t");
        assert_eq!(record.trimmed(1), "chr1");
        assert_eq!(record.field(9), "");
    }

    #[test]
    fn test_set_field() {
        let mut record = InputRecord::new(2, vec!["a".to_string(), "b".to_string()]);
        record.set_field(1, "c");
        record.set_field(5, "ignored");
        assert_eq!(record.to_line(','), "a,c");
    }
}
