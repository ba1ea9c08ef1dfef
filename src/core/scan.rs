use crate::core::io::Input;
use crate::core::model::{FIELD_COUNT, Record};
use anyhow::Result;
use log::warn;

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct ScanStats {
    pub lines: usize,
    pub records: usize,
    pub invalid: usize,
    pub last_invalid_line: Option<usize>,
}

pub fn invalid_record_message(line_no: usize) -> String {
    format!(
        "line {}: expected {} tab-separated fields with a sequence id, skipping",
        line_no, FIELD_COUNT
    )
}

/// Splits a line into exactly nine tab-separated columns.
pub fn split_record(line_no: usize, line: &str) -> Option<Record<'_>> {
    let mut fields = [""; FIELD_COUNT];
    let mut n = 0;
    for field in line.split('\t') {
        if n == FIELD_COUNT {
            return None;
        }
        fields[n] = field;
        n += 1;
    }
    if n != FIELD_COUNT || fields[0].is_empty() {
        return None;
    }
    Some(Record::new(line_no, line, fields))
}

/// Streams every valid record to `f`, one line buffer at a time. Comment and
/// empty lines are skipped silently, malformed lines with a warning.
pub fn for_each_record<F>(input: &mut Input, mut f: F) -> Result<ScanStats>
where
    F: FnMut(&Record<'_>) -> Result<()>,
{
    let mut stats = ScanStats::default();
    let mut buf = String::new();
    while let Some(line_no) = input.next_line(&mut buf)? {
        stats.lines += 1;
        if buf.is_empty() || buf.starts_with('#') {
            continue;
        }
        match split_record(line_no, &buf) {
            Some(record) => {
                stats.records += 1;
                f(&record)?;
            }
            None => {
                stats.invalid += 1;
                stats.last_invalid_line = Some(line_no);
                warn!("{}", invalid_record_message(line_no));
            }
        }
    }
    Ok(stats)
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::core::io::InputKind;
    use std::path::Path;

    pub(crate) fn input_from(text: &'static str, name: &str) -> Input {
        input_from_bytes(text.as_bytes(), name)
    }

    pub(crate) fn input_from_bytes(data: &'static [u8], name: &str) -> Input {
        Input::from_reader(Path::new(name), InputKind::Plain, Box::new(data))
    }

    #[test]
    fn split_requires_nine_fields() {
        assert!(split_record(1, "chr1\t.\tgene\t1\t2\t.\t+\t.\tID=a").is_some());
        assert!(split_record(1, "chr1\t.\tgene\t1\t2\t.\t+\t.").is_none());
        assert!(split_record(1, "chr1\t.\tgene\t1\t2\t.\t+\t.\tID=a\textra").is_none());
        assert!(split_record(1, "\t.\tgene\t1\t2\t.\t+\t.\tID=a").is_none());
    }

    #[test]
    fn invalid_lines_are_skipped_and_scanning_continues() {
        let mut input = input_from(
            "##gff-version 3\nchr1\tsrc\tgene\n\nchr1\tsrc\tgene\t1\t9\t.\t+\t.\tID=a\n",
            "t.gff",
        );
        let mut seen = Vec::new();
        let stats = for_each_record(&mut input, |r| {
            seen.push((r.line_no, r.seq_id().to_string()));
            Ok(())
        })
        .unwrap();
        assert_eq!(seen, vec![(4, "chr1".to_string())]);
        assert_eq!(
            stats,
            ScanStats {
                lines: 4,
                records: 1,
                invalid: 1,
                last_invalid_line: Some(2),
            }
        );
    }

    #[test]
    fn short_line_warning_names_its_line() {
        let msg = invalid_record_message(2);
        assert!(msg.starts_with("line 2:"));
        assert!(msg.contains("9 tab-separated fields"));
    }

    #[test]
    fn non_utf8_line_does_not_stop_the_scan() {
        let mut input = input_from_bytes(
            b"chr1\t.\tgene\t1\t9\t.\t+\t.\tNote=caf\xe9\nchr1\t.\tgene\t1\t9\t.\t+\t.\tID=ok\n",
            "t.gff",
        );
        let mut attrs = Vec::new();
        let stats = for_each_record(&mut input, |r| {
            attrs.push(r.attributes().to_string());
            Ok(())
        })
        .unwrap();
        assert_eq!(stats.records, 2);
        assert_eq!(attrs, vec!["Note=caf\u{fffd}", "ID=ok"]);
    }
}
