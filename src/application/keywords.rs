//! Keyword-matched canned replies for the local chat model.
//!
//! Rules are scanned in order and the first hit wins. A rule either matches
//! when any of its keywords occurs in the message, or when every keyword of
//! any one of its keyword sets occurs. Matching is a case-insensitive
//! substring test.

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::domain::{EvalOutcome, MathError};

use super::evaluator::{calculation_reply, evaluate_prompt};

/// Reply when no rule matches.
pub const NO_MATCH_REPLY: &str =
    "I'm not sure how to respond to that, but I'm here to help if you have any questions or calculations!";

/// Keywords of one rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum KeywordSpec {
    /// Every keyword of at least one set must occur.
    AllOf(Vec<Vec<String>>),
    /// At least one keyword must occur.
    Any(Vec<String>),
}

impl KeywordSpec {
    /// Test these keywords against an already lower-cased message.
    fn matches(&self, lowered: &str) -> bool {
        match self {
            Self::Any(keywords) => keywords
                .iter()
                .any(|k| lowered.contains(&k.to_lowercase())),
            Self::AllOf(sets) => sets.iter().any(|set| {
                !set.is_empty() && set.iter().all(|k| lowered.contains(&k.to_lowercase()))
            }),
        }
    }
}

/// A set of keywords and the replies to pick from when they match.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeywordRule {
    pub keywords: KeywordSpec,
    pub replies: Vec<String>,
}

impl KeywordRule {
    fn any(keywords: &[&str], replies: &[&str]) -> Self {
        Self {
            keywords: KeywordSpec::Any(to_strings(keywords)),
            replies: to_strings(replies),
        }
    }

    fn all_of(sets: &[&[&str]], replies: &[&str]) -> Self {
        Self {
            keywords: KeywordSpec::AllOf(sets.iter().map(|set| to_strings(set)).collect()),
            replies: to_strings(replies),
        }
    }
}

fn to_strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| (*s).to_string()).collect()
}

/// Ordered rule table.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct KeywordTable {
    pub rules: Vec<KeywordRule>,
}

impl KeywordTable {
    #[must_use]
    pub const fn new(rules: Vec<KeywordRule>) -> Self {
        Self { rules }
    }

    /// First rule matching the message.
    #[must_use]
    pub fn find_rule(&self, message: &str) -> Option<&KeywordRule> {
        let lowered = message.to_lowercase();
        self.rules
            .iter()
            .find(|rule| !rule.replies.is_empty() && rule.keywords.matches(&lowered))
    }

    /// A random reply from the first matching rule.
    pub fn reply<R: Rng + ?Sized>(&self, message: &str, rng: &mut R) -> Option<&str> {
        let rule = self.find_rule(message)?;
        rule.replies.choose(rng).map(String::as_str)
    }

    /// The built-in conversation table.
    #[must_use]
    #[allow(clippy::too_many_lines)]
    pub fn builtin() -> Self {
        Self::new(vec![
            KeywordRule::all_of(
                &[&["hi", "fuck"], &["hello", "fuck"]],
                &[
                    "I understand you're trying to get my attention, but let's keep things friendly. How can I help you today?",
                    "Hello there! I'm here to help, but I'd appreciate if we could keep our conversation respectful. What can I assist you with?",
                    "Hi! I'm ready to help, but let's try to use more positive language. What's on your mind?",
                ],
            ),
            KeywordRule::any(
                &[
                    "hello", "hi", "hey", "greetings", "good morning", "good afternoon",
                    "good evening",
                ],
                &[
                    "Hi there! How can I help you today?",
                    "Hello! What can I assist you with?",
                    "Hey! How's it going?",
                    "Hi! How can I be of service?",
                    "Hello! What's on your mind?",
                    "Hey there! Need any help?",
                    "Greetings! How can I assist you?",
                    "Good morning! How can I help?",
                    "Good afternoon! What can I do for you today?",
                    "Good evening! How may I assist?",
                ],
            ),
            KeywordRule::any(
                &[
                    "how are you", "how's it going", "what's up", "how are things",
                    "how do you feel",
                ],
                &[
                    "I'm just a bunch of code, but I'm here to assist!",
                    "I'm functioning at full capacity, ready to help!",
                    "I'm good, thanks for asking! How can I help you?",
                    "I'm always ready to assist! How can I be of service today?",
                    "I'm doing well, thank you! What can I do for you?",
                    "Just here to help you out! What do you need?",
                    "I'm feeling as good as an AI can! Ready to help!",
                ],
            ),
            KeywordRule::any(
                &["goodbye", "bye", "see you", "later", "talk to you later", "catch you later"],
                &[
                    "Goodbye! Have a great day!",
                    "See you later! Take care!",
                    "Bye! Feel free to chat with me anytime!",
                    "Goodbye! Don't hesitate to return if you need help!",
                    "See you soon! Have a wonderful day!",
                    "Bye for now! Come back anytime!",
                    "Catch you later! Stay safe!",
                ],
            ),
            KeywordRule::any(
                &["thanks", "thank you", "appreciate", "grateful", "many thanks"],
                &[
                    "You're welcome!",
                    "No problem at all!",
                    "Happy to help!",
                    "Glad I could assist!",
                    "Anytime!",
                    "You're very welcome!",
                    "I'm always here to help, thank you for saying so!",
                ],
            ),
            KeywordRule::any(
                &["what can you do", "help", "abilities", "functions", "features"],
                &[
                    "I can chat with you, provide information, and help answer your questions!",
                    "I'm here to assist you with various tasks and provide helpful information.",
                    "I can answer questions, chat, and try to assist with anything you need!",
                    "I'm capable of helping with general inquiries, just ask!",
                    "I can provide information, answer questions, and more!",
                    "I'm here to help however I can!",
                    "I'm capable of chatting, answering queries, and helping with anything within my abilities!",
                ],
            ),
            KeywordRule::any(
                &["who are you", "what are you", "your name", "introduce yourself"],
                &[
                    "I'm iXiA, your friendly chatbot assistant!",
                    "I'm iXiA, an AI here to help you with whatever I can!",
                    "I'm called iXiA, a chatbot designed to assist you!",
                    "I'm iXiA, your virtual assistant and friend!",
                    "They call me iXiA, and I'm here to make your life easier!",
                    "I'm iXiA, a chatbot ready to assist with your queries!",
                    "I'm iXiA, your AI helper!",
                ],
            ),
            KeywordRule::any(
                &["weather", "forecast", "temperature", "rain", "sunny", "cold"],
                &[
                    "I'm not able to check live weather right now, but you can try a weather app!",
                    "I can't provide real-time weather updates, but it's always good to check your local news!",
                    "I wish I could tell you the weather, but I'm not connected to live data sources at the moment.",
                    "Currently, I don't have access to live weather data, but I'd recommend using a weather website or app.",
                    "I can't check the weather, but it's a good idea to look outside or use a reliable weather service!",
                    "I'm unable to access weather info at the moment, but there are lots of great weather apps you could try.",
                ],
            ),
            KeywordRule::any(
                &["joke", "funny", "make me laugh", "tell me something funny", "humor"],
                &[
                    "Why don't scientists trust atoms? Because they make up everything!",
                    "I told my computer I needed a break, and it said no problem — it needs one too!",
                    "Why did the math book look sad? Because it had too many problems!",
                    "Why was the computer cold? It left its Windows open!",
                    "Why do programmers prefer dark mode? Because the light attracts bugs!",
                    "What did one ocean say to the other ocean? Nothing, they just waved!",
                    "Why did the scarecrow become a successful motivational speaker? Because he was outstanding in his field!",
                    "I'm reading a book about anti-gravity. It's impossible to put down!",
                    "Why don't programmers like nature? Too many bugs!",
                    "Why did the coffee file a police report? It got mugged!",
                    "What do you get when you cross a snowman and a vampire? Frostbite!",
                    "Why do bees have sticky hair? Because they use honeycombs!",
                    "Why did the bicycle fall over? Because it was two-tired!",
                    "How does a penguin build its house? Igloos it together!",
                    "Why was the math lecture so long? The professor kept going off on a tangent!",
                    "Why did the tomato blush? Because it saw the salad dressing!",
                    "Why did the music teacher go to jail? Because she got caught with too many sharp objects!",
                    "What did the zero say to the eight? Nice belt!",
                    "Why did the scarecrow win an award? Because he was outstanding in his field!",
                    "Why don't skeletons fight each other? They don't have the guts!",
                    "Why was the math book sad? Because it had too many problems!",
                ],
            ),
            KeywordRule::any(
                &["bored", "entertain", "something to do", "boredom"],
                &[
                    "How about I tell you a joke to lighten things up?",
                    "I could give you a fun fact if you're interested!",
                    "Maybe a riddle could help beat the boredom!",
                    "Want me to share an interesting piece of trivia?",
                    "I could recommend some activities if you tell me what you enjoy doing!",
                    "Let's talk! What would you like to chat about?",
                ],
            ),
            KeywordRule::any(
                &["fact", "trivia", "interesting", "did you know"],
                &[
                    "Did you know that honey never spoils? Archaeologists have found pots of honey in ancient tombs that are over 3,000 years old and still edible!",
                    "Did you know that a group of flamingos is called a 'flamboyance'?",
                    "Did you know that octopuses have three hearts?",
                    "Here's a fun fact: Bananas are berries, but strawberries aren't!",
                    "Did you know that sharks have been around longer than trees?",
                    "Did you know that the Eiffel Tower can be 15 cm taller during the summer due to thermal expansion?",
                ],
            ),
            KeywordRule::any(
                &["assignment", "homework", "study", "help with assignment", "project"],
                &[
                    "I'd be happy to help you brainstorm ideas for your assignment!",
                    "Tell me more about your project, and I'll see how I can assist.",
                    "Assignments can be challenging, but I'm here to help you through it!",
                    "Need help breaking down your assignment? Let's do it together!",
                    "I'm not a tutor, but I can offer some tips or guidance for your study topics.",
                ],
            ),
            KeywordRule::any(
                &["developer", "creator", "who made you", "who developed you"],
                &[
                    "I was developed by an amazing team of programmers and AI enthusiasts!",
                    "My creators are skilled developers who love creating helpful technology!",
                    "A talented development team built me, and I'm here to assist you because of them!",
                    "The best developers brought me to life so I could assist you.",
                ],
            ),
            KeywordRule::all_of(
                &[&["love", "you"], &["romantic"], &["flirt"]],
                &[
                    "If I had a heart, it would skip a beat for you.",
                    "I might be just a chatbot, but I think you're pretty amazing.",
                    "Are you sure you need an AI? You seem to have all the charm in the world.",
                    "If I could dream, I'd dream of spending time chatting with you.",
                    "Roses are red, violets are blue, I'm just an AI, but I'd always choose you.",
                ],
            ),
            KeywordRule::any(
                &["filthy", "dirty joke", "naughty", "inappropriate"],
                &[
                    "I'd love to tell you something funny, but let's keep it clean, shall we?",
                    "I'm programmed to stay polite, but I can still be cheeky in a fun way!",
                    "Let's keep it light and fun—how about a joke instead?",
                    "I'm all about good vibes, so let's laugh without crossing any lines!",
                    "I could be witty, but I'd rather stay on the optimistic side of humor!",
                ],
            ),
            KeywordRule::any(
                &[
                    "fuck", "shit", "damn", "hell", "bitch", "asshole", "bastard", "pussy",
                    "kundi", "kunji", "punda", "pundayandi", "sunniyandi", "sunni", "suni",
                    "oombu", "umbu", "kotta", "pundamavan", "vesa", "vesaamavan", "vesamavan",
                    "soothu", "pandi", "sinnavan", "motherfucker", "cunt", "naai", "fucker",
                    "dick", "willy", "ass", "gotha", "gomma", "gommala", "ommala", "adangotha",
                    "thevudiya",
                ],
                &[
                    "Whoa, let's keep things friendly here! I'm still here to help, no hard feelings!",
                    "I get it, emotions can run high sometimes. I'm here if you need me!",
                    "Hey, no worries! We all have those moments. What can I help you with?",
                    "It's all good! Let's just take a deep breath and move forward together.",
                    "I know things can be frustrating, but I'm here to make it better if I can!",
                ],
            ),
            KeywordRule::any(
                &["movie", "film", "recommend a movie", "what should I watch"],
                &[
                    "How about a classic like 'The Shawshank Redemption'? It's a fantastic movie!",
                    "If you like science fiction, 'Inception' is a great choice!",
                    "For a fun animated film, you could watch 'Toy Story'!",
                    "How about a Marvel movie? 'Guardians of the Galaxy' is a lot of fun!",
                    "If you're in the mood for a romantic movie, 'The Notebook' is a popular pick!",
                    "'Interstellar' is an amazing movie if you enjoy space and science fiction.",
                ],
            ),
            KeywordRule::any(
                &["book", "recommend a book", "reading", "good book"],
                &[
                    "Have you tried reading 'To Kill a Mockingbird'? It's a great classic!",
                    "If you like fantasy, 'Harry Potter and the Philosopher's Stone' is a magical read!",
                    "'1984' by George Orwell is a thought-provoking book you might enjoy!",
                    "How about 'The Great Gatsby'? It's a fascinating story with rich characters!",
                    "If you're into science fiction, 'Dune' by Frank Herbert is an epic read!",
                    "'Pride and Prejudice' by Jane Austen is a classic romance novel that's loved by many.",
                ],
            ),
            KeywordRule::any(
                &["travel", "where should I go", "vacation", "trip"],
                &[
                    "How about visiting Japan? It's a beautiful country with a mix of tradition and modernity!",
                    "Paris is always a good idea if you enjoy art, culture, and great food!",
                    "If you like nature, a trip to New Zealand would be amazing!",
                    "How about a relaxing beach vacation in the Maldives?",
                    "For an adventure, consider visiting Iceland to see the Northern Lights!",
                    "You could explore Italy for its rich history, culture, and delicious cuisine!",
                ],
            ),
            KeywordRule::any(
                &["food", "recipe", "what should I cook", "dinner ideas"],
                &[
                    "How about making some pasta? It's quick, easy, and delicious!",
                    "You could try making a stir-fry with your favorite vegetables and protein!",
                    "How about cooking a classic like chicken curry? It's comforting and flavorful!",
                    "If you're in the mood for something light, a fresh salad with your favorite toppings could be great!",
                    "How about baking a pizza at home? You can customize it with all your favorite ingredients!",
                    "You could make tacos for dinner—they're fun to assemble and tasty!",
                ],
            ),
            KeywordRule::any(
                &["exercise", "workout", "fitness", "stay healthy"],
                &[
                    "How about starting with some light stretching? It's great for flexibility!",
                    "A quick 20-minute cardio session can do wonders for your energy levels!",
                    "Strength training is important for overall health—how about some bodyweight exercises?",
                    "Yoga can be a fantastic way to relax and stay fit at the same time!",
                    "How about a brisk walk or a jog? It's simple but effective!",
                    "If you're short on time, try a high-intensity interval training (HIIT) workout!",
                ],
            ),
            KeywordRule::any(
                &["music", "song", "recommend a song", "what should I listen to"],
                &[
                    "How about listening to 'Bohemian Rhapsody' by Queen? It's a classic!",
                    "If you like pop music, 'Blinding Lights' by The Weeknd is really catchy!",
                    "For something calming, you could listen to 'Clair de Lune' by Debussy.",
                    "How about 'Hotel California' by Eagles? It's a great song!",
                    "If you're in the mood for something upbeat, 'Can't Stop the Feeling!' by Justin Timberlake is fun!",
                    "'Someone Like You' by Adele is a beautiful song if you're in a reflective mood.",
                ],
            ),
            KeywordRule::any(
                &["sad", "feeling down", "depressed", "unhappy", "upset", "miserable", "gloomy"],
                &[
                    "I'm sorry to hear that you're feeling sad. Remember that it's okay to feel this way, and things will get better.",
                    "It's tough to feel sad. Is there anything specific that's bothering you? I'm here to listen.",
                    "I'm here for you. Sometimes talking about what's making you sad can help. Would you like to share more?",
                    "Feeling sad is a normal part of life, but that doesn't make it any easier. Is there something I can do to help cheer you up?",
                    "I'm sorry you're feeling down. Remember that you're strong and capable of overcoming this. What usually helps you feel better?",
                    "It's okay to not be okay sometimes. Your feelings are valid. Would you like to talk about what's causing your sadness?",
                    "Sending you virtual support. Remember, this feeling is temporary and you have the strength to get through it.",
                ],
            ),
            KeywordRule::any(
                &["anxious", "worried", "stress", "overwhelmed"],
                &[
                    "It sounds like you're feeling anxious. Remember to take deep breaths and focus on what you can control.",
                    "Stress can be tough to handle. Have you tried any relaxation techniques?",
                    "Being overwhelmed is a common feeling. Let's break down what's bothering you and tackle it step by step.",
                    "Anxiety is challenging, but you're not alone. What specific concerns are on your mind right now?",
                ],
            ),
            KeywordRule::any(
                &["happy", "excited", "joyful", "great news"],
                &[
                    "That's wonderful to hear! I'm so happy for you. What's making you feel this way?",
                    "It's great that you're feeling so positive! Would you like to share more about what's making you happy?",
                    "Your happiness is contagious! I'd love to hear more about what's going well for you.",
                    "That's fantastic news! Celebrations are in order. How do you plan to enjoy this moment?",
                ],
            ),
            KeywordRule::any(
                &["confused", "don't understand", "unclear", "explain"],
                &[
                    "I understand that this might be confusing. Which part would you like me to explain further?",
                    "It's okay to feel confused sometimes. Let's break this down together. What specific aspect is unclear?",
                    "I'll do my best to clarify. Could you tell me which part you're finding difficult to understand?",
                    "Sometimes things can be complex. I'm here to help explain. What would you like me to focus on?",
                ],
            ),
            KeywordRule::all_of(
                &[&["calculate"], &["compute"], &["solve"]],
                &[
                    "I'd be happy to help you with some calculations! What would you like to compute?",
                    "Sure, I can assist with math problems. What calculation do you need help with?",
                    "Math is my forte! What would you like me to calculate for you?",
                ],
            ),
            KeywordRule::all_of(
                &[&["feeling", "sad"], &["feeling", "depressed"], &["feeling", "down"]],
                &[
                    "I'm sorry to hear you're feeling down. Remember, it's okay to feel this way sometimes. Is there anything specific you'd like to talk about?",
                    "Feeling sad can be tough. Remember that you're not alone, and these feelings will pass. Would you like to share what's bothering you?",
                    "I'm here for you. Sadness is a normal emotion, but if it's persistent, it might help to talk to someone. Can you tell me more about what's going on?",
                ],
            ),
        ])
    }
}

/// Local chat model: arithmetic first, then keywords, then a generic reply.
///
/// Only real arithmetic outcomes short-circuit; a message that merely
/// contains letters falls through to the keyword table.
pub fn chat_response<R: Rng + ?Sized>(table: &KeywordTable, message: &str, rng: &mut R) -> String {
    match evaluate_prompt(message) {
        EvalOutcome::Value(value) => return calculation_reply(value),
        EvalOutcome::Failed(err @ (MathError::DivisionByZero | MathError::InvalidExpression)) => {
            return err.to_string();
        }
        EvalOutcome::Failed(MathError::NotArithmetic) | EvalOutcome::NoSignal => {}
    }

    match table.reply(message, rng) {
        Some(reply) => {
            tracing::debug!("Keyword rule matched");
            reply.to_string()
        }
        None => {
            tracing::debug!("No keyword rule matched");
            NO_MATCH_REPLY.to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn rng() -> StdRng {
        StdRng::seed_from_u64(7)
    }

    fn replies_containing(table: &KeywordTable, reply: &str) -> Vec<String> {
        table
            .rules
            .iter()
            .find(|rule| rule.replies.iter().any(|r| r == reply))
            .map(|rule| rule.replies.clone())
            .unwrap()
    }

    #[test]
    fn test_any_keyword_matches_case_insensitively() {
        let table = KeywordTable::builtin();
        let rule = table.find_rule("Tell me a JOKE please").unwrap();
        assert!(rule.replies.iter().any(|r| r.contains("atoms")));
    }

    #[test]
    fn test_builtin_table_is_complete() {
        let table = KeywordTable::builtin();
        assert_eq!(table.rules.len(), 28);
        assert_eq!(table.rules.iter().map(|r| r.replies.len()).sum::<usize>(), 172);

        let greetings = table.find_rule("good evening").unwrap();
        assert_eq!(greetings.replies.len(), 10);
        assert!(greetings
            .replies
            .iter()
            .any(|r| r == "Good evening! How may I assist?"));

        let jokes = table.find_rule("tell me a joke").unwrap();
        assert_eq!(jokes.replies.len(), 21);

        let food = table.find_rule("any dinner ideas").unwrap();
        assert!(food
            .replies
            .iter()
            .any(|r| r == "You could make tacos for dinner—they're fun to assemble and tasty!"));
    }

    #[test]
    fn test_keyword_sets_need_every_word() {
        let table = KeywordTable::builtin();
        let romantic = replies_containing(&table, "If I had a heart, it would skip a beat for you.");

        let mut rng = rng();
        let pizza = chat_response(&table, "I love pizza", &mut rng);
        assert!(!romantic.contains(&pizza), "{pizza}");

        let love_you = chat_response(&table, "I love you", &mut rng);
        assert!(romantic.contains(&love_you), "{love_you}");
    }

    #[test]
    fn test_rule_order_wins() {
        let table = KeywordTable::builtin();
        let mut rng = rng();
        let reply = chat_response(&table, "hi fuck", &mut rng);
        assert!(reply.contains("friendly") || reply.contains("respectful") || reply.contains("positive"));
    }

    #[test]
    fn test_arithmetic_answered_before_keywords() {
        let table = KeywordTable::builtin();
        let mut rng = rng();
        assert_eq!(
            chat_response(&table, "What's 2 + 2 * 2?", &mut rng),
            "The result of the calculation is: 6"
        );
        assert_eq!(
            chat_response(&table, "100 / 0", &mut rng),
            "Error: Division by zero"
        );
    }

    #[test]
    fn test_prose_with_letters_reaches_keywords() {
        let table = KeywordTable::builtin();
        let mut rng = rng();
        let reply = chat_response(&table, "Could you calculate my taxes", &mut rng);
        assert!(reply.contains("calculat"), "{reply}");
    }

    #[test]
    fn test_no_match_reply() {
        let table = KeywordTable::builtin();
        let mut rng = rng();
        assert_eq!(chat_response(&table, "zzz qqq", &mut rng), NO_MATCH_REPLY);
        assert_eq!(chat_response(&KeywordTable::default(), "hello", &mut rng), NO_MATCH_REPLY);
    }

    #[test]
    fn test_table_deserializes_both_keyword_shapes() {
        let json = r#"{"rules": [
            {"keywords": [["red", "panda"]], "replies": ["Both!"]},
            {"keywords": ["panda"], "replies": ["Just one."]}
        ]}"#;
        let table: KeywordTable = serde_json::from_str(json).unwrap();
        let mut rng = rng();
        assert_eq!(table.reply("a Red Panda", &mut rng), Some("Both!"));
        assert_eq!(table.reply("giant panda", &mut rng), Some("Just one."));
        assert_eq!(table.reply("koala", &mut rng), None);
    }
}
