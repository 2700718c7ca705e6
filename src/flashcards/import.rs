use crate::flashcards::repo::NewCard;

/// Outcome of parsing an uploaded CSV. Rows that fail validation become
/// line-numbered warnings instead of aborting the whole import.
#[derive(Debug, Default)]
pub struct ParsedImport {
    pub cards: Vec<NewCard>,
    pub warnings: Vec<String>,
}

/// Parses deck-import CSV data.
///
/// Expected columns: `source_text`, `target_text` and optionally
/// `pronunciation`. Rows with both text columns blank are skipped silently;
/// rows missing one of them produce a warning carrying the file line number.
pub fn parse_csv(data: &[u8]) -> anyhow::Result<ParsedImport> {
    let text = std::str::from_utf8(data)
        .map_err(|_| anyhow::anyhow!("file encoding error, save the CSV as UTF-8"))?;

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(text.as_bytes());

    let headers = reader.headers()?.clone();
    let source_idx = headers.iter().position(|h| h == "source_text");
    let target_idx = headers.iter().position(|h| h == "target_text");
    let pron_idx = headers.iter().position(|h| h == "pronunciation");

    let (Some(source_idx), Some(target_idx)) = (source_idx, target_idx) else {
        anyhow::bail!("CSV must have source_text and target_text columns");
    };

    let mut parsed = ParsedImport::default();
    for (i, record) in reader.records().enumerate() {
        // header is line 1, first data row line 2
        let fallback_line = (i + 2) as u64;
        let record = match record {
            Ok(r) => r,
            Err(e) => {
                let line = e.position().map(|p| p.line()).unwrap_or(fallback_line);
                parsed.warnings.push(format!("Line {line}: {e}"));
                continue;
            }
        };
        let line = record
            .position()
            .map(|p| p.line())
            .unwrap_or(fallback_line);

        let source = record.get(source_idx).unwrap_or("").trim();
        let target = record.get(target_idx).unwrap_or("").trim();
        let pronunciation = pron_idx
            .and_then(|idx| record.get(idx))
            .unwrap_or("")
            .trim();

        if source.is_empty() && target.is_empty() {
            continue;
        }
        if source.is_empty() {
            parsed
                .warnings
                .push(format!("Line {line}: missing source_text"));
            continue;
        }
        if target.is_empty() {
            parsed
                .warnings
                .push(format!("Line {line}: missing target_text"));
            continue;
        }

        parsed.cards.push(NewCard {
            source_text: source.to_string(),
            pronunciation: pronunciation.to_string(),
            target_text: target.to_string(),
        });
    }

    Ok(parsed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_well_formed_rows() {
        let csv = "source_text,pronunciation,target_text\n\
                   xin chào,annyeong,안녕\n\
                   cảm ơn,gamsa,감사\n";
        let parsed = parse_csv(csv.as_bytes()).unwrap();
        assert_eq!(parsed.cards.len(), 2);
        assert!(parsed.warnings.is_empty());
        assert_eq!(parsed.cards[0].source_text, "xin chào");
        assert_eq!(parsed.cards[1].target_text, "감사");
    }

    #[test]
    fn pronunciation_column_is_optional() {
        let csv = "source_text,target_text\nxin chào,안녕\n";
        let parsed = parse_csv(csv.as_bytes()).unwrap();
        assert_eq!(parsed.cards.len(), 1);
        assert_eq!(parsed.cards[0].pronunciation, "");
    }

    #[test]
    fn blank_rows_are_skipped_without_warning() {
        let csv = "source_text,pronunciation,target_text\n\
                   ,,\n\
                   xin chào,annyeong,안녕\n";
        let parsed = parse_csv(csv.as_bytes()).unwrap();
        assert_eq!(parsed.cards.len(), 1);
        assert!(parsed.warnings.is_empty());
    }

    #[test]
    fn half_filled_rows_warn_with_line_numbers() {
        let csv = "source_text,pronunciation,target_text\n\
                   xin chào,annyeong,안녕\n\
                   ,annyeong,안녕\n\
                   cảm ơn,,\n";
        let parsed = parse_csv(csv.as_bytes()).unwrap();
        assert_eq!(parsed.cards.len(), 1);
        assert_eq!(parsed.warnings.len(), 2);
        assert!(parsed.warnings[0].starts_with("Line 3:"));
        assert!(parsed.warnings[0].contains("source_text"));
        assert!(parsed.warnings[1].starts_with("Line 4:"));
        assert!(parsed.warnings[1].contains("target_text"));
    }

    #[test]
    fn missing_required_columns_is_fatal() {
        let csv = "word,meaning\nhello,xin chào\n";
        let err = parse_csv(csv.as_bytes()).unwrap_err();
        assert!(err.to_string().contains("source_text"));
    }

    #[test]
    fn invalid_utf8_is_fatal() {
        let err = parse_csv(&[0xff, 0xfe, 0x00]).unwrap_err();
        assert!(err.to_string().contains("UTF-8"));
    }

    #[test]
    fn extra_columns_are_ignored() {
        let csv = "note,source_text,target_text\nremember this,chào,안녕\n";
        let parsed = parse_csv(csv.as_bytes()).unwrap();
        assert_eq!(parsed.cards.len(), 1);
        assert_eq!(parsed.cards[0].source_text, "chào");
    }
}
