// ********* Record data structures ***********

use std::fmt::Display;

use snafu::Snafu;

/// Identifier of a candidate inside a record store.
///
/// Identifiers are assigned by the store and never reused.
#[derive(Eq, PartialEq, Debug, Clone, Copy, Hash, Ord, PartialOrd)]
pub struct CandidateId(pub u32);

/// Identifier of a contest inside a record store.
#[derive(Eq, PartialEq, Debug, Clone, Copy, Hash, Ord, PartialOrd)]
pub struct ContestId(pub u32);

impl Display for CandidateId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "candidate#{}", self.0)
    }
}

impl Display for ContestId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "contest#{}", self.0)
    }
}

/// The attributes of a single candidate.
///
/// This is a plain value: it performs no validation and no normalization.
/// All the fields are optional. The name is required to display the candidate
/// correctly, but it is not enforced here: feeds in the wild contain unnamed
/// candidates and they are kept as they are.
///
/// The `contest` field is a non-owning back-reference to the contest on which
/// this candidate appears. It is only meaningful for the store that assigned it.
#[derive(Eq, PartialEq, Debug, Clone, Default)]
pub struct CandidateRecord {
    pub candidate_url: Option<String>,
    pub email: Option<String>,
    pub name: Option<String>,
    /// Position on the ballot among the candidates of the same contest.
    pub order_on_ballot: Option<i64>,
    pub party: Option<String>,
    pub phone: Option<String>,
    /// Raw image bytes.
    pub photo: Option<Vec<u8>>,
    pub photo_url: Option<String>,
    pub contest: Option<ContestId>,
}

impl CandidateRecord {
    /// A candidate with only a name.
    pub fn named(name: &str) -> CandidateRecord {
        CandidateRecord {
            name: Some(name.to_string()),
            ..CandidateRecord::default()
        }
    }

    /// The name, or the empty string if the feed did not provide one.
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or("")
    }

    pub fn display_party(&self) -> &str {
        self.party.as_deref().unwrap_or("")
    }

    pub fn display_phone(&self) -> &str {
        self.phone.as_deref().unwrap_or("")
    }

    pub fn display_email(&self) -> &str {
        self.email.as_deref().unwrap_or("")
    }

    pub fn display_url(&self) -> &str {
        self.candidate_url.as_deref().unwrap_or("")
    }

    pub fn has_photo(&self) -> bool {
        matches!(&self.photo, Some(bytes) if !bytes.is_empty())
    }
}

/// A contest (race or referendum) holding a set of candidates.
///
/// The candidates themselves are tracked by the store, not by this value.
#[derive(Eq, PartialEq, Debug, Clone, Default)]
pub struct ContestRecord {
    pub ballot_title: Option<String>,
    pub office: Option<String>,
    pub contest_type: Option<String>,
    pub district_name: Option<String>,
}

impl ContestRecord {
    /// The title to show for this contest: the office, then the ballot title.
    pub fn display_title(&self) -> &str {
        self.office
            .as_deref()
            .or(self.ballot_title.as_deref())
            .unwrap_or("")
    }
}

// ******** Popup input data structures *********

/// What a popup is describing.
#[derive(Eq, PartialEq, Debug, Clone, Copy, Hash)]
pub enum LocationKind {
    PollingLocation,
    EarlyVoteSite,
    DropOffLocation,
    Candidate,
}

impl LocationKind {
    pub fn label(&self) -> &'static str {
        match self {
            LocationKind::PollingLocation => "pollingLocation",
            LocationKind::EarlyVoteSite => "earlyVoteSite",
            LocationKind::DropOffLocation => "dropOffLocation",
            LocationKind::Candidate => "candidate",
        }
    }
}

/// Display-ready data for a popup.
///
/// The values are expected to be validated by whoever builds the wrapper.
/// A field that is present but empty is treated as absent.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct PollingLocationWrapper {
    pub kind: LocationKind,
    pub name: String,
    pub address: Option<String>,
    pub hours: Option<String>,
    pub party: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub url: Option<String>,
}

impl PollingLocationWrapper {
    pub fn new(kind: LocationKind, name: &str) -> PollingLocationWrapper {
        PollingLocationWrapper {
            kind,
            name: name.to_string(),
            address: None,
            hours: None,
            party: None,
            phone: None,
            email: None,
            url: None,
        }
    }

    pub fn with_address(self, address: &str) -> PollingLocationWrapper {
        PollingLocationWrapper {
            address: Some(address.to_string()),
            ..self
        }
    }

    pub fn with_hours(self, hours: &str) -> PollingLocationWrapper {
        PollingLocationWrapper {
            hours: Some(hours.to_string()),
            ..self
        }
    }

    pub fn with_party(self, party: &str) -> PollingLocationWrapper {
        PollingLocationWrapper {
            party: Some(party.to_string()),
            ..self
        }
    }
}

impl From<&CandidateRecord> for PollingLocationWrapper {
    fn from(c: &CandidateRecord) -> Self {
        PollingLocationWrapper {
            kind: LocationKind::Candidate,
            name: c.display_name().to_string(),
            address: None,
            hours: None,
            party: c.party.clone(),
            phone: c.phone.clone(),
            email: c.email.clone(),
            url: c.candidate_url.clone(),
        }
    }
}

// ******** Errors *********

/// Errors returned by a record store.
#[derive(Debug, Snafu, PartialEq, Eq)]
#[snafu(visibility(pub(crate)))]
pub enum StoreError {
    #[snafu(display("No candidate with id {id} in the store"))]
    UnknownCandidate { id: CandidateId },
    #[snafu(display("No contest with id {id} in the store"))]
    UnknownContest { id: ContestId },
}

/// Errors that prevent a popup from being laid out.
#[derive(Debug, Snafu, PartialEq)]
#[snafu(visibility(pub(crate)))]
pub enum PopupError {
    #[snafu(display(
        "Popup bounds must have a positive width and height, got {width}x{height}"
    ))]
    InvalidBounds { width: f64, height: f64 },
    #[snafu(display("Popup metric {metric} has an unusable value {value}"))]
    InvalidMetrics { metric: String, value: f64 },
}
