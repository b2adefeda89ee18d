//! Entity extraction and the registry of official channels
//!
//! Entities are found by plain substring match against a fixed lexicon, so
//! "tata" also hits inside "tatami". Scan order is brands, then political
//! leaders, then celebrities.

use crate::models::{Entity, EntityKind};

pub const BRANDS: &[&str] = &[
    "apple", "google", "microsoft", "tesla", "amazon", "meta", "twitter", "netflix", "disney",
    "coca cola", "pepsi", "nike", "adidas", "tata", "reliance", "infosys", "wipro", "tcs",
    "airtel", "jio", "ola", "flipkart", "paytm", "zomato", "swiggy",
];

pub const POLITICAL_LEADERS: &[&str] = &[
    "biden", "trump", "modi", "putin", "xi jinping", "macron", "trudeau", "zelensky",
    "narendra modi", "rahul gandhi", "amit shah", "mamata banerjee", "arvind kejriwal",
    "yogi adityanath",
];

pub const CELEBRITIES: &[&str] = &[
    "elon musk", "bill gates", "jeff bezos", "mark zuckerberg", "taylor swift", "kim kardashian",
    "cristiano ronaldo", "lionel messi", "shah rukh khan", "salman khan", "aamir khan",
    "amitabh bachchan", "deepika padukone", "priyanka chopra", "virat kohli", "ms dhoni",
    "rohit sharma",
];

/// Find every lexicon entry contained in `text`.
pub fn extract_entities(text: &str) -> Vec<Entity> {
    let lower = text.to_lowercase();
    let lexicon = [
        (EntityKind::Brand, BRANDS),
        (EntityKind::PoliticalLeader, POLITICAL_LEADERS),
        (EntityKind::Celebrity, CELEBRITIES),
    ];

    let mut entities = Vec::new();
    for (kind, names) in lexicon {
        for name in names.iter().filter(|name| lower.contains(*name)) {
            entities.push(Entity::new(kind, *name));
        }
    }
    entities
}

/// A verified account or newsroom an entity publishes through.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OfficialChannel {
    pub twitter: Option<&'static str>,
    pub website: Option<&'static str>,
    pub instagram: Option<&'static str>,
    pub verified: bool,
}

impl OfficialChannel {
    const fn twitter(handle: &'static str) -> Self {
        Self {
            twitter: Some(handle),
            website: None,
            instagram: None,
            verified: true,
        }
    }

    const fn site(handle: &'static str, website: &'static str) -> Self {
        Self {
            twitter: Some(handle),
            website: Some(website),
            instagram: None,
            verified: true,
        }
    }

    const fn insta(handle: &'static str, instagram: &'static str) -> Self {
        Self {
            twitter: Some(handle),
            website: None,
            instagram: Some(instagram),
            verified: true,
        }
    }

    /// Stable identity of the channel, used to avoid querying it twice.
    pub fn key(&self) -> &'static str {
        self.twitter.or(self.website).unwrap_or("official")
    }
}

const OFFICIAL_CHANNELS: &[(&str, OfficialChannel)] = &[
    ("apple", OfficialChannel::site("@Apple", "apple.com/newsroom")),
    ("google", OfficialChannel::site("@Google", "blog.google")),
    ("tesla", OfficialChannel::site("@Tesla", "tesla.com/blog")),
    ("microsoft", OfficialChannel::site("@Microsoft", "news.microsoft.com")),
    ("tata", OfficialChannel::site("@TataCompanies", "tata.com/newsroom")),
    ("reliance", OfficialChannel::site("@RIL_Updates", "ril.com/news")),
    ("infosys", OfficialChannel::site("@Infosys", "infosys.com/newsroom")),
    ("airtel", OfficialChannel::site("@airtelindia", "airtel.in/press-release")),
    ("jio", OfficialChannel::site("@JioCare", "jio.com/press-release")),
    ("biden", OfficialChannel::site("@POTUS", "whitehouse.gov/news")),
    ("modi", OfficialChannel::site("@narendramodi", "pib.gov.in")),
    ("narendra modi", OfficialChannel::site("@narendramodi", "pib.gov.in")),
    ("trudeau", OfficialChannel::site("@JustinTrudeau", "pm.gc.ca")),
    ("rahul gandhi", OfficialChannel::twitter("@RahulGandhi")),
    ("amit shah", OfficialChannel::twitter("@AmitShah")),
    ("arvind kejriwal", OfficialChannel::twitter("@ArvindKejriwal")),
    ("elon musk", OfficialChannel::twitter("@elonmusk")),
    ("bill gates", OfficialChannel::twitter("@BillGates")),
    ("taylor swift", OfficialChannel::insta("@taylorswift13", "@taylorswift")),
    ("shah rukh khan", OfficialChannel::insta("@iamsrk", "@iamsrk")),
    ("salman khan", OfficialChannel::twitter("@BeingSalmanKhan")),
    ("amitabh bachchan", OfficialChannel::twitter("@SrBachchan")),
    ("virat kohli", OfficialChannel::insta("@imVkohli", "@virat.kohli")),
    ("ms dhoni", OfficialChannel::insta("@msdhoni", "@mahi7781")),
];

/// Registered official channel for an entity name, if any.
pub fn official_channel(name: &str) -> Option<&'static OfficialChannel> {
    OFFICIAL_CHANNELS
        .iter()
        .find(|(entity, _)| *entity == name)
        .map(|(_, channel)| channel)
}

/// Entities that have a registered channel, one per distinct channel.
pub fn channels_for<'a>(entities: &'a [Entity]) -> Vec<(&'a Entity, &'static OfficialChannel)> {
    let mut seen = std::collections::HashSet::new();
    entities
        .iter()
        .filter_map(|entity| official_channel(&entity.name).map(|channel| (entity, channel)))
        .filter(|(_, channel)| seen.insert(channel.key()))
        .collect()
}
