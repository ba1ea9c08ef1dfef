//! Column 9 attribute grammars.
//!
//! GFF3 uses `key=value;key=value`, GTF uses `key "value"; key "value";`.
//! Both parsers keep the first value seen for a repeated key.

use crate::core::model::{AttributeMap, Dialect};
use anyhow::{Result, bail};
use indexmap::map::Entry;

const GTF_SEPARATOR: &str = "\"; ";

impl Dialect {
    pub fn parse_attributes(self, field: &str, line_no: usize) -> Result<AttributeMap> {
        match self {
            Dialect::Gff => parse_gff(field, line_no),
            Dialect::Gtf => parse_gtf(field, line_no),
        }
    }
}

pub fn parse_gff(field: &str, line_no: usize) -> Result<AttributeMap> {
    let mut kv = AttributeMap::new();
    for segment in field.split(';') {
        if segment.is_empty() {
            continue;
        }
        let Some((key, value)) = segment.split_once('=') else {
            bail!("line {}: gff attribute without '=': {:?}", line_no, segment);
        };
        insert_first(&mut kv, key, query_unescape(value));
    }
    Ok(kv)
}

pub fn parse_gtf(field: &str, line_no: usize) -> Result<AttributeMap> {
    let mut kv = AttributeMap::new();
    let trimmed = field.trim_matches(' ').trim_end_matches(';');
    for segment in trimmed.split(GTF_SEPARATOR) {
        if segment.is_empty() {
            continue;
        }
        let Some((key, value)) = segment.split_once(' ') else {
            bail!("line {}: gtf attribute without space: {:?}", line_no, segment);
        };
        let value = query_unescape(value);
        insert_first(&mut kv, key, strip_quotes(&value).to_string());
    }
    Ok(kv)
}

/// Adds `Dbxref=tag:value,...` entries as `tag -> value`; entries without a colon are ignored.
pub fn expand_dbxref(kv: &mut AttributeMap) {
    let Some(dbxref) = kv.get("Dbxref").cloned() else {
        return;
    };
    for entry in dbxref.split(',') {
        let mut parts = entry.split(':');
        let (Some(tag), Some(value)) = (parts.next(), parts.next()) else {
            continue;
        };
        insert_first(kv, tag, value.to_string());
    }
}

fn insert_first(kv: &mut AttributeMap, key: &str, value: String) {
    if let Entry::Vacant(slot) = kv.entry(key.to_string()) {
        slot.insert(value);
    }
}

fn strip_quotes(s: &str) -> &str {
    let s = s.strip_prefix('"').unwrap_or(s);
    s.strip_suffix('"').unwrap_or(s)
}

/// URL query unescaping: `%XX` escapes and `+` as space. A malformed escape
/// yields an empty string.
pub fn query_unescape(s: &str) -> String {
    if !s.contains(['%', '+']) {
        return s.to_string();
    }
    let bytes = s.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'%' => {
                let hi = bytes.get(i + 1).and_then(|b| hex_val(*b));
                let lo = bytes.get(i + 2).and_then(|b| hex_val(*b));
                match (hi, lo) {
                    (Some(hi), Some(lo)) => out.push((hi << 4) | lo),
                    _ => return String::new(),
                }
                i += 3;
            }
            b'+' => {
                out.push(b' ');
                i += 1;
            }
            b => {
                out.push(b);
                i += 1;
            }
        }
    }
    String::from_utf8_lossy(&out).into_owned()
}

fn hex_val(b: u8) -> Option<u8> {
    match b {
        b'0'..=b'9' => Some(b - b'0'),
        b'a'..=b'f' => Some(b - b'a' + 10),
        b'A'..=b'F' => Some(b - b'A' + 10),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gff_key_value_pairs() {
        let kv = parse_gff("ID=gene1;Name=X;", 1).unwrap();
        assert_eq!(kv.len(), 2);
        assert_eq!(kv["ID"], "gene1");
        assert_eq!(kv["Name"], "X");
    }

    #[test]
    fn gff_first_duplicate_wins() {
        let kv = parse_gff("ID=a;ID=b", 1).unwrap();
        assert_eq!(kv["ID"], "a");
    }

    #[test]
    fn gff_value_is_percent_decoded() {
        let kv = parse_gff("Note=a%3Bb%2Cc;Alias=x%3Dy", 1).unwrap();
        assert_eq!(kv["Note"], "a;b,c");
        assert_eq!(kv["Alias"], "x=y");
    }

    #[test]
    fn gff_value_splits_on_first_equals() {
        let kv = parse_gff("Target=a=b", 1).unwrap();
        assert_eq!(kv["Target"], "a=b");
    }

    #[test]
    fn gff_segment_without_equals_fails_with_line() {
        let err = parse_gff("ID=a;broken", 42).unwrap_err();
        assert!(err.to_string().contains("line 42"));
    }

    #[test]
    fn keys_keep_source_order() {
        let kv = parse_gff("ID=a;id=b;Id=c;iD=d;ID=e", 1).unwrap();
        let keys: Vec<&str> = kv.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["ID", "id", "Id", "iD"]);
    }

    #[test]
    fn gtf_quoted_pairs() {
        let kv = parse_gtf("gene_id \"g1\"; transcript_id \"t1\";", 1).unwrap();
        assert_eq!(kv.len(), 2);
        assert_eq!(kv["gene_id"], "g1");
        assert_eq!(kv["transcript_id"], "t1");
    }

    #[test]
    fn gtf_tolerates_surrounding_spaces() {
        let kv = parse_gtf("  gene_id \"g1\"; gene_name \"A B\";  ", 1).unwrap();
        assert_eq!(kv["gene_id"], "g1");
        assert_eq!(kv["gene_name"], "A B");
    }

    #[test]
    fn gtf_first_duplicate_wins() {
        let kv = parse_gtf("tag \"basic\"; tag \"CCDS\";", 1).unwrap();
        assert_eq!(kv["tag"], "basic");
    }

    #[test]
    fn gtf_segment_without_space_fails() {
        let err = parse_gtf("gene_id \"g1\"; broken\"; x \"y\";", 7).unwrap_err();
        assert!(err.to_string().contains("line 7"));
        assert!(err.to_string().contains("gtf"));
    }

    #[test]
    fn dialect_dispatches_to_grammar() {
        let kv = Dialect::Gtf.parse_attributes("gene_id \"g1\";", 1).unwrap();
        assert_eq!(kv["gene_id"], "g1");
        assert!(Dialect::Gff.parse_attributes("gene_id \"g1\";", 1).is_err());
    }

    #[test]
    fn dbxref_expansion_keeps_first_tag() {
        let mut kv = parse_gff("ID=g;Dbxref=GO:0001,GO:0002,GeneID:123,junk", 1).unwrap();
        expand_dbxref(&mut kv);
        assert_eq!(kv["GO"], "0001");
        assert_eq!(kv["GeneID"], "123");
        assert!(!kv.contains_key("junk"));
    }

    #[test]
    fn dbxref_expansion_does_not_override_attributes() {
        let mut kv = parse_gff("GeneID=own;Dbxref=GeneID:123", 1).unwrap();
        expand_dbxref(&mut kv);
        assert_eq!(kv["GeneID"], "own");
    }

    #[test]
    fn dbxref_takes_first_colon_field() {
        let mut kv = parse_gff("Dbxref=HGNC:HGNC:5", 1).unwrap();
        expand_dbxref(&mut kv);
        assert_eq!(kv["HGNC"], "HGNC");
    }

    #[test]
    fn unescape_plus_and_bad_escape() {
        assert_eq!(query_unescape("a+b"), "a b");
        assert_eq!(query_unescape("plain"), "plain");
        assert_eq!(query_unescape("100%"), "");
        assert_eq!(query_unescape("%zz"), "");
    }
}
