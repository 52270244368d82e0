use std::collections::BTreeMap;

/// One row of scraped data. The schema belongs to the backend; the client
/// only ever reads fields by name.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ScrapeRecord {
    fields: BTreeMap<String, String>,
}

impl ScrapeRecord {
    pub fn from_fields<K, V, I>(fields: I) -> Self
    where
        K: Into<String>,
        V: Into<String>,
        I: IntoIterator<Item = (K, V)>,
    {
        Self {
            fields: fields
                .into_iter()
                .map(|(key, value)| (key.into(), value.into()))
                .collect(),
        }
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.fields.get(field).map(String::as_str)
    }

    /// Value to display for `field`; absent fields render as empty.
    pub fn cell(&self, field: &str) -> &str {
        self.get(field).unwrap_or("")
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn fields(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

/// Arrival-ordered, append-only accumulation of records.
///
/// Entries are never removed or reordered; a fresh log only comes from a
/// fresh [`crate::AppState`].
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RecordLog {
    records: Vec<ScrapeRecord>,
}

impl RecordLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, record: ScrapeRecord) {
        self.records.push(record);
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ScrapeRecord> {
        self.records.iter()
    }

    pub fn as_slice(&self) -> &[ScrapeRecord] {
        &self.records
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_render_empty() {
        let record = ScrapeRecord::from_fields([("Company Name", "Acme")]);
        assert_eq!(record.cell("Company Name"), "Acme");
        assert_eq!(record.cell("Email"), "");
        assert_eq!(record.get("Email"), None);
    }

    #[test]
    fn log_keeps_duplicates_in_arrival_order() {
        let a = ScrapeRecord::from_fields([("Person Name", "Ada")]);
        let b = ScrapeRecord::from_fields([("Person Name", "Bob")]);
        let mut log = RecordLog::new();
        log.append(a.clone());
        log.append(b.clone());
        log.append(a.clone());
        assert_eq!(log.as_slice(), &[a.clone(), b, a]);
    }
}
