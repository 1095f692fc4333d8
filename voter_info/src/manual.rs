/*!

This is the long-form manual for `voter_info` and `vipinfo`.

## Records

A `CandidateRecord` holds the attributes of one candidate as they come from a
feed. Every attribute is optional, including the name. The `RecordStore` trait
owns the records and keeps the link between a candidate and its contest.
`InMemoryStore` is the implementation shipped with this crate.

The display order of the candidates of a contest is computed by
`ordering::sort_for_display`: candidates with a position on the ballot come
first, by position, then the others. Ties are broken by name.

## Popups

`popup::InfoPopupView::create` lays out the popup shown for a polling location
or a candidate. The caller passes the largest frame it accepts, and gets back a
`PopupLayout` that is:
* never larger than this frame
* at least 64x40 points (or the frame itself, if it is smaller)
* large enough for all its content, up to the preferred content width of 240
  points. Longer content wraps, and content that does not fit is cut with an
  ellipsis.

The layout is rendered by an implementation of `render::PopupRenderer`.
`TextRenderer` prints it in a terminal.

## Command line

`vipinfo --config election_config.json` reads a configuration file, imports all
its feed sources and prints a summary in JSON format. With
`--reference expected_summary.json`, the summary is compared to a reference and
differences are reported.

The configuration file looks like this:

```json
{
  "outputSettings": { "electionName": "City general election" },
  "feedSources": [
    { "provider": "civic_json", "filePath": "feed.json" },
    { "provider": "csv", "filePath": "candidates.csv", "firstRowIndex": 2 }
  ],
  "popupSettings": { "maxWidth": 300, "maxHeight": 200 }
}
```

### `civic_json`

A JSON document in the format of the Google Civic Information API
`voterinfo` response: `contests` (each with its `candidates`),
`pollingLocations`, `earlyVoteSites` and `dropOffLocations`.

### `csv`

One candidate per row, with the columns
`contest,name,party,orderOnBallot,phone,email,candidateUrl,photoUrl`.
Candidates with the same `contest` value are grouped in the same contest.
Empty cells are left unset.

*/
