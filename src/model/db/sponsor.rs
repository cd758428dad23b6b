use std::ops::Deref;

use serde::{Deserialize, Serialize};

pub type SponsorId = u32;

/// Display-only sponsor data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SponsorCore {
    pub name: String,
    pub logo_url: String,
}

impl SponsorCore {
    pub fn new(name: impl Into<String>, logo_url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            logo_url: logo_url.into(),
        }
    }
}

pub type NewSponsor = SponsorCore;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sponsor {
    #[serde(rename = "_id")]
    pub id: SponsorId,
    #[serde(flatten)]
    pub sponsor: SponsorCore,
}

impl Deref for Sponsor {
    type Target = SponsorCore;

    fn deref(&self) -> &Self::Target {
        &self.sponsor
    }
}
