//! Random `adjective-color-animal` project name suggestions

use rand::seq::SliceRandom;
use rand::Rng;

const ADJECTIVES: &[&str] = &[
    "brave", "calm", "clever", "cosmic", "curious", "dusty", "eager", "fancy", "gentle",
    "glitchy", "happy", "hidden", "jolly", "lucky", "mellow", "misty", "nimble", "quiet",
    "rapid", "shiny", "sleepy", "swift", "tiny", "wild",
];

const COLORS: &[&str] = &[
    "amber", "aqua", "azure", "beige", "black", "blue", "coral", "crimson", "cyan", "gold",
    "green", "indigo", "ivory", "lime", "magenta", "olive", "orange", "pink", "purple", "red",
    "silver", "teal", "violet", "white",
];

const ANIMALS: &[&str] = &[
    "badger", "beaver", "crab", "crow", "dolphin", "eagle", "falcon", "ferret", "fox", "gecko",
    "heron", "koala", "lemur", "lynx", "moth", "narwhal", "otter", "owl", "panda", "raven",
    "salmon", "tiger", "walrus", "yak",
];

/// Suggest a fresh project name such as `swift-teal-otter`
pub fn suggest_project_name<R: Rng + ?Sized>(rng: &mut R) -> String {
    [ADJECTIVES, COLORS, ANIMALS]
        .iter()
        .map(|words| words.choose(&mut *rng).copied().unwrap_or("sketch"))
        .collect::<Vec<_>>()
        .join("-")
}
