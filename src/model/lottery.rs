use rand::{seq::IndexedRandom, Rng};
use serde::Serialize;

use super::Subscriber;

/// Everything that can be won in the prize draw.
pub const PRIZES: [&str; 5] = [
    "majica",
    "skodelica",
    "nahrbtnik",
    "vstopnica za koncert",
    "darilni bon",
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PrizeDraw {
    pub id: i32,
    #[serde(rename = "ime")]
    pub first_name: String,
    #[serde(rename = "priimek")]
    pub last_name: String,
    #[serde(rename = "nagrada")]
    pub prize: &'static str,
}

/// Picks a winner and a prize, both uniformly at random.
/// Returns `None` when there is nobody to draw from.
pub fn draw<R: Rng + ?Sized>(subscribers: &[Subscriber], rng: &mut R) -> Option<PrizeDraw> {
    let winner = subscribers.choose(rng)?;
    let prize = *PRIZES.choose(rng)?;

    Some(PrizeDraw {
        id: winner.id,
        first_name: winner.first_name.clone(),
        last_name: winner.last_name.clone(),
        prize,
    })
}
