//! headers/types.rs
//! Message headers carried alongside every envelope.
//!
//! Only From, To, Subject and Date are covered by the signature. Any other header
//! travels in `extra`, is preserved by the codec, and is NOT integrity-protected.

use std::collections::BTreeMap;

use crate::constants::header_names;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MailHeaders {
    pub from: String,
    pub to: String,
    pub subject: String,
    pub date: String,
    extra: BTreeMap<String, String>,
}

impl MailHeaders {
    pub fn new(
        from: impl Into<String>,
        to: impl Into<String>,
        subject: impl Into<String>,
        date: impl Into<String>,
    ) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
            subject: subject.into(),
            date: date.into(),
            extra: BTreeMap::new(),
        }
    }

    /// Headers stamped with the current UTC time in RFC 2822 form.
    pub fn dated_now(
        from: impl Into<String>,
        to: impl Into<String>,
        subject: impl Into<String>,
    ) -> Self {
        Self::new(from, to, subject, chrono::Utc::now().to_rfc2822())
    }

    /// Attach an unsigned header. Names of signed headers are refused (returns
    /// `false`) so the extra map can never shadow a signed field on the wire.
    pub fn insert_extra(&mut self, name: impl Into<String>, value: impl Into<String>) -> bool {
        let name = name.into();
        if header_names::SIGNED.contains(&name.as_str()) {
            return false;
        }
        self.extra.insert(name, value.into());
        true
    }

    /// Unsigned headers, sorted by name.
    pub fn extra(&self) -> &BTreeMap<String, String> {
        &self.extra
    }

    /// Signed header values in digest order: From, To, Subject, Date.
    pub fn signed_fields(&self) -> [&str; 4] {
        [&self.from, &self.to, &self.subject, &self.date]
    }

    /// Look up any header by its wire name.
    pub fn get(&self, name: &str) -> Option<&str> {
        match name {
            header_names::FROM => Some(&self.from),
            header_names::TO => Some(&self.to),
            header_names::SUBJECT => Some(&self.subject),
            header_names::DATE => Some(&self.date),
            other => self.extra.get(other).map(String::as_str),
        }
    }
}
