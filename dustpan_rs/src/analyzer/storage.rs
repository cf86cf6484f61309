//! Browser storage and cookie keys a project reads or writes.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::types::SourceFile;

use super::classify::{is_markup, is_script};
use super::regexes::{
    regex_cookie_library, regex_cookie_store, regex_document_cookie, regex_indexed_db_open,
    regex_request_cookie, regex_response_cookie, regex_web_storage_call, regex_web_storage_index,
    regex_web_storage_property,
};

/// Members of the Storage interface, never keys.
const STORAGE_MEMBERS: &[&str] = &["getItem", "setItem", "removeItem", "clear", "key", "length"];

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageReport {
    pub local_storage_keys: BTreeSet<String>,
    pub session_storage_keys: BTreeSet<String>,
    pub cookie_keys: BTreeSet<String>,
    pub uses_indexed_db: bool,
}

impl StorageReport {
    fn record_web_storage(&mut self, storage: &str, key: &str) {
        let keys = match storage {
            "localStorage" => &mut self.local_storage_keys,
            _ => &mut self.session_storage_keys,
        };
        keys.insert(key.to_string());
    }
}

pub fn detect_storage(files: &[SourceFile]) -> StorageReport {
    let mut report = StorageReport::default();
    for file in files.iter().filter(|f| is_script(f) || is_markup(f)) {
        let content = &file.content;

        for re in [regex_web_storage_call(), regex_web_storage_index()] {
            for caps in re.captures_iter(content) {
                report.record_web_storage(&caps[1], &caps[2]);
            }
        }
        for caps in regex_web_storage_property().captures_iter(content) {
            if !STORAGE_MEMBERS.contains(&&caps[2]) {
                report.record_web_storage(&caps[1], &caps[2]);
            }
        }

        for re in [
            regex_cookie_library(),
            regex_cookie_store(),
            regex_document_cookie(),
            regex_response_cookie(),
        ] {
            for caps in re.captures_iter(content) {
                report.cookie_keys.insert(caps[1].to_string());
            }
        }
        for caps in regex_request_cookie().captures_iter(content) {
            if let Some(key) = caps.get(1).or_else(|| caps.get(2)) {
                report.cookie_keys.insert(key.as_str().to_string());
            }
        }

        report.uses_indexed_db |= regex_indexed_db_open().is_match(content);
    }
    report
}
