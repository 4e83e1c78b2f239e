//! Deterministic generator for the fixed slug universe.
//!
//! Every slug is `"{adjective}-{noun}"`. The output order is adjective-major and is the order
//! in which slugs receive their identities when the pool is seeded, so it doubles as the
//! order of system-directed assignment.

/// Adjective half of every slug.
pub const ADJECTIVES: [&str; 150] = [
    "able", "agile", "alert", "amused", "ancient", "angry", "anxious", "arctic", "awake",
    "awesome", "bashful", "bold", "bored", "brave", "breezy", "bright", "brisk", "bubbly",
    "busy", "calm", "careful", "cheerful", "chilly", "clever", "cloudy", "clumsy", "cosmic",
    "cozy", "crafty", "cranky", "crazy", "crispy", "cuddly", "curious", "cute", "daring",
    "dazzling", "dizzy", "dreamy", "eager", "early", "electric", "elegant", "epic", "fancy",
    "fearless", "feisty", "fierce", "fluffy", "flying", "focused", "fresh", "friendly",
    "frosty", "funny", "fuzzy", "gentle", "giant", "giddy", "glad", "gleaming", "glowing",
    "golden", "graceful", "grumpy", "happy", "hasty", "helpful", "heroic", "hidden", "honest",
    "humble", "hungry", "icy", "jolly", "jumpy", "keen", "kind", "lazy", "little", "lively",
    "lonely", "loud", "lucky", "magic", "majestic", "mellow", "merry", "mighty", "misty",
    "modest", "moody", "mystic", "nervous", "nimble", "noble", "odd", "patient", "peaceful",
    "perky", "playful", "polite", "proud", "puzzled", "quick", "quiet", "radiant", "rapid",
    "rowdy", "royal", "rusty", "sassy", "secret", "shaggy", "shiny", "shy", "silent", "silly",
    "sleepy", "slow", "smart", "sneaky", "snowy", "soggy", "sparkly", "speedy", "spicy",
    "spooky", "steady", "stormy", "sturdy", "sunny", "super", "surprised", "swift", "tall",
    "tender", "thirsty", "tidy", "tiny", "tough", "tricky", "valiant", "vivid", "wacky",
    "warm", "wild", "wise", "witty", "zesty",
];

/// Noun half of every slug.
pub const NOUNS: [&str; 10] = [
    "bulbasaur",
    "charmander",
    "squirtle",
    "pikachu",
    "jigglypuff",
    "meowth",
    "psyduck",
    "snorlax",
    "eevee",
    "gengar",
];

/// Number of slugs in the pool.
pub const POOL_SIZE: usize = ADJECTIVES.len() * NOUNS.len();

/// Produces the complete slug pool in seeding order.
///
/// Pure and stable across runs: the same word lists always yield the same sequence.
///
/// # Examples
///
/// ```
/// let slugs = linker::domain::slug_pool::generate();
/// assert_eq!(slugs.len(), 1500);
/// assert_eq!(slugs[0], "able-bulbasaur");
/// ```
pub fn generate() -> Vec<String> {
    ADJECTIVES
        .iter()
        .flat_map(|adjective| {
            NOUNS
                .iter()
                .map(move |noun| format!("{adjective}-{noun}"))
        })
        .collect()
}
