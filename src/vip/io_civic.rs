// Reader for feeds in the format of the Civic Information API (voterinfo query).

use serde::{Deserialize, Serialize};
use serde_json::Value as JSValue;

use voter_info::builder::ContestBuilder;

use crate::vip::{
    config_reader::read_js_int,
    io_common::{format_address, non_empty},
    *,
};

#[derive(PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct CivicCandidate {
    pub name: Option<String>,
    pub party: Option<String>,
    #[serde(rename = "candidateUrl")]
    pub candidate_url: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    #[serde(rename = "photoUrl")]
    pub photo_url: Option<String>,
    #[serde(rename = "orderOnBallot")]
    pub order_on_ballot: Option<JSValue>,
}

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct CivicDistrict {
    pub name: Option<String>,
}

#[derive(PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct CivicContest {
    #[serde(rename = "type")]
    pub contest_type: Option<String>,
    pub office: Option<String>,
    #[serde(rename = "ballotTitle")]
    pub ballot_title: Option<String>,
    pub district: Option<CivicDistrict>,
    #[serde(default)]
    pub candidates: Vec<CivicCandidate>,
}

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct CivicAddress {
    #[serde(rename = "locationName")]
    pub location_name: Option<String>,
    pub line1: Option<String>,
    pub line2: Option<String>,
    pub line3: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip: Option<String>,
}

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct CivicLocation {
    pub address: CivicAddress,
    #[serde(rename = "pollingHours")]
    pub polling_hours: Option<String>,
}

#[derive(PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct CivicFeed {
    #[serde(default)]
    pub contests: Vec<CivicContest>,
    #[serde(rename = "pollingLocations", default)]
    pub polling_locations: Vec<CivicLocation>,
    #[serde(rename = "earlyVoteSites", default)]
    pub early_vote_sites: Vec<CivicLocation>,
    #[serde(rename = "dropOffLocations", default)]
    pub drop_off_locations: Vec<CivicLocation>,
}

pub fn read_civic_feed<S: RecordStore>(
    path: String,
    store: &mut S,
) -> VipResult<Vec<PollingLocationWrapper>> {
    let contents = fs::read_to_string(path.clone()).context(OpeningJsonSnafu { path })?;
    let feed: CivicFeed = serde_json::from_str(contents.as_str()).context(ParsingJsonSnafu {})?;
    import_civic_feed(&feed, store)
}

pub fn import_civic_feed<S: RecordStore>(
    feed: &CivicFeed,
    store: &mut S,
) -> VipResult<Vec<PollingLocationWrapper>> {
    for contest in feed.contests.iter() {
        let record = ContestRecord {
            ballot_title: non_empty(&contest.ballot_title),
            office: non_empty(&contest.office),
            contest_type: non_empty(&contest.contest_type),
            district_name: contest.district.as_ref().and_then(|d| non_empty(&d.name)),
        };
        let mut builder = ContestBuilder::new(store, record);
        for c in contest.candidates.iter() {
            let order_on_ballot = match &c.order_on_ballot {
                None | Some(JSValue::Null) => None,
                x => Some(read_js_int(x)?),
            };
            builder
                .add_candidate(CandidateRecord {
                    candidate_url: non_empty(&c.candidate_url),
                    email: non_empty(&c.email),
                    name: non_empty(&c.name),
                    order_on_ballot,
                    party: non_empty(&c.party),
                    phone: non_empty(&c.phone),
                    photo: None,
                    photo_url: non_empty(&c.photo_url),
                    contest: None,
                })
                .context(StoreSnafu {})?;
        }
        let (cid, added) = builder.finish();
        debug!("read_civic_feed: {} with {} candidates", cid, added.len());
    }

    let mut res: Vec<PollingLocationWrapper> = Vec::new();
    let groups = [
        (LocationKind::PollingLocation, &feed.polling_locations),
        (LocationKind::EarlyVoteSite, &feed.early_vote_sites),
        (LocationKind::DropOffLocation, &feed.drop_off_locations),
    ];
    for (kind, locations) in groups {
        for l in locations.iter() {
            res.push(location_wrapper(kind, l));
        }
    }
    Ok(res)
}

fn location_wrapper(kind: LocationKind, l: &CivicLocation) -> PollingLocationWrapper {
    let a = &l.address;
    let name = non_empty(&a.location_name)
        .or_else(|| non_empty(&a.line1))
        .unwrap_or_default();
    PollingLocationWrapper {
        kind,
        name,
        address: format_address(
            &[a.line1.clone(), a.line2.clone(), a.line3.clone()],
            &a.city,
            &a.state,
            &a.zip,
        ),
        hours: non_empty(&l.polling_hours),
        party: None,
        phone: None,
        email: None,
        url: None,
    }
}
