//! Starter catalog uploaded by `wordpick seed`.

use wordpick_core::word::WordEntry;

fn strings(items: &[&str]) -> Vec<String> { items.iter().map(|s| s.to_string()).collect() }

fn entry(
  word: &str,
  valence: i8,
  energy: u8,
  types: &[&str],
  domains: &[&str],
  tags: &[&str],
  synonyms: &[&str],
) -> WordEntry {
  WordEntry {
    types: strings(types),
    domains: strings(domains),
    synonyms: strings(synonyms),
    ..WordEntry::new(word).with_levels(valence, energy).with_tags(tags.iter().copied())
  }
}

pub fn seed_words() -> Vec<WordEntry> {
  vec![
    entry("Calm", 1, 1, &["state"], &["mindfulness"], &["soothe", "ground"], &["Soothe", "Steady"]),
    entry("Focus", 1, 2, &["action"], &["productivity"], &["focus"], &[]),
    entry("Gratitude", 2, 2, &["virtue"], &["self", "relationships"], &["lift", "reframe"], &[]),
    entry("Courage", 2, 4, &["virtue"], &["self", "leadership"], &["elevate", "stretch"], &[]),
    entry("Momentum", 2, 4, &["state"], &["productivity"], &["elevate", "build"], &[]),
    entry("Nourish", 2, 2, &["action"], &["health", "self"], &["soothe", "care"], &[]),
  ]
}
