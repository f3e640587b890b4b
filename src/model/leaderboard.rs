use serde::{Serialize, Serializer};

use super::{Score, Subscriber};

/// One leaderboard row. Serializes its place as `"{place}.mesto"`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RankedSubscriber {
    #[serde(rename = "mesto", serialize_with = "serialize_place")]
    pub place: u32,
    pub id: i32,
    #[serde(rename = "ime")]
    pub first_name: String,
    #[serde(rename = "priimek")]
    pub last_name: String,
    #[serde(rename = "uporabnisko_ime")]
    pub username: String,
    #[serde(rename = "ocena")]
    pub score: Score,
}

/// Builds the leaderboard: unranked subscribers are dropped, the rest are sorted by
/// score descending. The sort is stable, so equal scores keep their input order.
/// Places are dense: equal scores share a place and the next lower score gets the next one.
pub fn rank(subscribers: Vec<Subscriber>) -> Vec<RankedSubscriber> {
    let mut ranked: Vec<Subscriber> = subscribers
        .into_iter()
        .filter(|sub| sub.score.is_ranked())
        .collect();
    ranked.sort_by(|a, b| b.score.cmp(&a.score));

    let mut place = 0;
    let mut previous_score = None;

    ranked
        .into_iter()
        .map(|sub| {
            if previous_score != Some(sub.score) {
                place += 1;
                previous_score = Some(sub.score);
            }
            RankedSubscriber {
                place,
                id: sub.id,
                first_name: sub.first_name,
                last_name: sub.last_name,
                username: sub.username,
                score: sub.score,
            }
        })
        .collect()
}

fn serialize_place<S: Serializer>(place: &u32, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_str(&format_args!("{place}.mesto"))
}
