//! Creative prompt kits.
//!
//! Stateless: a kit is picked at random and the user's message is woven in
//! as the seed. Never touches the network or the evaluator.

use rand::Rng;

/// Seed used when the message is blank.
const DEFAULT_SEED: &str = "your idea";

/// Body of a kit: a two-column table or a list of lines.
enum KitBody {
    Table(Vec<(&'static str, String)>),
    Lines(Vec<String>),
}

struct CreativeKit {
    heading: &'static str,
    body: KitBody,
    outro: String,
}

impl CreativeKit {
    fn render(&self) -> String {
        let block = match &self.body {
            KitBody::Table(rows) => {
                let mut lines = vec!["Focus | Spark".to_string(), "-----|------".to_string()];
                lines.extend(rows.iter().map(|(focus, spark)| format!("{focus} | {spark}")));
                lines.join("\n")
            }
            KitBody::Lines(lines) => lines.join("\n"),
        };
        format!("{}\n{}\n\n{}", self.heading, block, self.outro)
    }
}

/// Upper-case the first character.
#[must_use]
pub fn capitalize_first(value: &str) -> String {
    let mut chars = value.chars();
    chars.next().map_or_else(String::new, |first| {
        first.to_uppercase().chain(chars).collect()
    })
}

fn kits(message: &str) -> Vec<CreativeKit> {
    let trimmed = message.trim();
    let seed = capitalize_first(if trimmed.is_empty() { DEFAULT_SEED } else { trimmed });
    let lower = seed.to_lowercase();

    vec![
        CreativeKit {
            heading: "🌌 Story Seed Matrix",
            body: KitBody::Table(vec![
                ("Protagonist", "A restless cartographer mapping emotions".to_string()),
                ("Setting", "A floating bazaar lit by aurora tides".to_string()),
                ("Conflict", format!("The map misbehaves whenever {lower} is whispered")),
                ("Wildcard", format!("{seed} collides with an impossible rule")),
            ]),
            outro: "Combine any two cells and riff on them, or ask me for another matrix.".to_string(),
        },
        CreativeKit {
            heading: "🎭 Prompt Remix Lab",
            body: KitBody::Lines(vec![
                format!("Anchor ➜ {seed}."),
                "Genre Flip ➜ Noir documentary told as journal entries.".to_string(),
                "Sensory Hook ➜ The air smells like thunderstorms and vinyl records.".to_string(),
            ]),
            outro: "Tweak any line to fit your vibe, and I can expand whichever spark you like next."
                .to_string(),
        },
        CreativeKit {
            heading: "✨ Creative Stretch Circuit",
            body: KitBody::Lines(vec![
                "1. Draft a 20-second micro-scene using only questions.".to_string(),
                "2. Swap in a surprising ally halfway through.".to_string(),
                "3. End on a color that never appears in nature.".to_string(),
            ]),
            outro: format!(
                "Try running the circuit with {seed} as your muse, or ask for a fresh set."
            ),
        },
    ]
}

/// Render a random creative kit seeded with the message.
pub fn creative_response<R: Rng + ?Sized>(message: &str, rng: &mut R) -> String {
    let mut kits = kits(message);
    let index = rng.gen_range(0..kits.len());
    kits.swap_remove(index).render()
}
