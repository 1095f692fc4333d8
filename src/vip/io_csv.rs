// Reader for flat candidate lists in CSV files.

use std::collections::HashMap;
use std::fs::File;
use std::iter::Skip;

use voter_info::builder::ContestBuilder;

use crate::vip::{io_common::non_empty, *};

// Positions of the candidate columns once the contest column is taken out.
const NAME_COL: usize = 0;
const PARTY_COL: usize = 1;
const ORDER_COL: usize = 2;
const PHONE_COL: usize = 3;
const EMAIL_COL: usize = 4;
const URL_COL: usize = 5;
const PHOTO_URL_COL: usize = 6;

/// A candidate row, before being grouped by contest.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct ParsedCandidate {
    pub lineno: usize,
    pub contest: String,
    pub record: CandidateRecord,
}

pub fn read_csv_candidates<S: RecordStore>(
    path: String,
    cfs: &FileSource,
    store: &mut S,
) -> VipResult<Vec<PollingLocationWrapper>> {
    let parsed = parse_csv_candidates(&path, cfs)?;
    import_candidates(&parsed, store)?;
    // Candidate lists do not carry any location.
    Ok(Vec::new())
}

pub fn parse_csv_candidates(path: &str, cfs: &FileSource) -> VipResult<Vec<ParsedCandidate>> {
    let contest_col = cfs.contest_column_index()?;
    let (records, row_offset) = get_records(path, cfs)?;
    let mut res: Vec<ParsedCandidate> = Vec::new();
    for (idx, line_r) in records.enumerate() {
        let lineno = idx + row_offset;
        let line = line_r.context(CsvLineParseSnafu {})?;
        debug!("parse_csv_candidates: lineno: {:?} row: {:?}", lineno, line);
        let contest = line
            .get(contest_col)
            .context(CsvLineTooShortSnafu { lineno })?;
        let others: Vec<&str> = line
            .iter()
            .enumerate()
            .filter(|(idx, _)| *idx != contest_col)
            .map(|(_, s)| s)
            .collect();
        let cell = |col: usize| -> VipResult<Option<String>> {
            let s = others.get(col).context(CsvLineTooShortSnafu { lineno })?;
            Ok(non_empty(&Some(s.to_string())))
        };

        let order_on_ballot = match cell(ORDER_COL)? {
            Some(s) => Some(
                s.parse::<i64>()
                    .ok()
                    .context(CsvBallotOrderSnafu { lineno, value: s })?,
            ),
            None => None,
        };

        res.push(ParsedCandidate {
            lineno,
            contest: contest.trim().to_string(),
            record: CandidateRecord {
                candidate_url: cell(URL_COL)?,
                email: cell(EMAIL_COL)?,
                name: cell(NAME_COL)?,
                order_on_ballot,
                party: cell(PARTY_COL)?,
                phone: cell(PHONE_COL)?,
                photo: None,
                photo_url: cell(PHOTO_URL_COL)?,
                contest: None,
            },
        });
    }
    Ok(res)
}

/// Groups the candidates by contest, in order of first appearance.
fn import_candidates<S: RecordStore>(parsed: &[ParsedCandidate], store: &mut S) -> VipResult<()> {
    let mut contest_order: Vec<&String> = Vec::new();
    let mut by_contest: HashMap<&String, Vec<&ParsedCandidate>> = HashMap::new();
    for p in parsed.iter() {
        if !by_contest.contains_key(&p.contest) {
            contest_order.push(&p.contest);
        }
        by_contest.entry(&p.contest).or_default().push(p);
    }

    for contest_name in contest_order {
        let record = ContestRecord {
            office: non_empty(&Some(contest_name.clone())),
            ..ContestRecord::default()
        };
        let mut builder = ContestBuilder::new(store, record);
        for p in by_contest.get(contest_name).into_iter().flatten() {
            builder
                .add_candidate(p.record.clone())
                .context(StoreSnafu {})?;
        }
        let (cid, added) = builder.finish();
        info!(
            "import_candidates: {} {:?} with {} candidates",
            cid,
            contest_name,
            added.len()
        );
    }
    Ok(())
}

fn get_records(
    path: &str,
    cfs: &FileSource,
) -> VipResult<(Skip<csv::StringRecordsIntoIter<File>>, usize)> {
    let first_row = cfs.first_row_index()?;
    let rdr = csv::ReaderBuilder::new()
        .has_headers(false)
        .from_path(path)
        .context(CsvOpenSnafu { path })?;
    // The index starts at 1 to respect most conventions in the spreadsheet world
    Ok((rdr.into_records().skip(first_row - 1), first_row))
}
