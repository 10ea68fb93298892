//! Human-readable session labels.
//!
//! Each session gets a three-word `adjective_color_noun` label drawn at
//! process start. The label doubles as the default destination directory
//! for newly created files whose declared path does not exist on disk.

use rand::seq::SliceRandom;

const ADJECTIVES: [&str; 10] = [
    "swift", "bright", "calm", "wise", "bold", "kind", "pure", "warm", "cool", "soft",
];

const COLORS: [&str; 10] = [
    "azure", "coral", "jade", "amber", "ruby", "pearl", "gold", "silver", "bronze", "crystal",
];

const NOUNS: [&str; 10] = [
    "river", "mountain", "forest", "cloud", "star", "ocean", "valley", "meadow", "wind", "sun",
];

/// Generates a random `adjective_color_noun` session label.
pub fn generate_session_label() -> String {
    let mut rng = rand::thread_rng();
    // The word lists are non-empty constants, so choose never returns None.
    format!(
        "{}_{}_{}",
        ADJECTIVES.choose(&mut rng).unwrap(),
        COLORS.choose(&mut rng).unwrap(),
        NOUNS.choose(&mut rng).unwrap(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_label_has_three_known_words() {
        let label = generate_session_label();
        let parts: Vec<&str> = label.split('_').collect();

        assert_eq!(parts.len(), 3);
        assert!(ADJECTIVES.contains(&parts[0]));
        assert!(COLORS.contains(&parts[1]));
        assert!(NOUNS.contains(&parts[2]));
    }
}
