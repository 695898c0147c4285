use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier for one course module.
///
/// Topics are opaque to the session engine; they select lesson content, a
/// roleplay persona, and the focus handed to the question generation service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TopicId {
    /// Direct object pronouns (le, la, les, l').
    Cod,
    /// The imperative mood.
    Imperatif,
    /// Second-group verbs in -IR.
    VerbsIr,
    /// Asking for and giving directions.
    Orientation,
    /// Culture module on the city of Lyon.
    Lyon,
}

impl TopicId {
    /// All course modules in course order.
    pub const ALL: [TopicId; 5] = [
        TopicId::Cod,
        TopicId::Imperatif,
        TopicId::VerbsIr,
        TopicId::Orientation,
        TopicId::Lyon,
    ];

    /// Short stable code used in prompts and logs.
    #[must_use]
    pub fn code(self) -> &'static str {
        match self {
            TopicId::Cod => "COD",
            TopicId::Imperatif => "IMPERATIF",
            TopicId::VerbsIr => "VERBI_IR",
            TopicId::Orientation => "ORIENTATION",
            TopicId::Lyon => "LYON",
        }
    }

    /// Focus description handed to the question generation service.
    #[must_use]
    pub fn generation_context(self) -> &'static str {
        match self {
            TopicId::Cod => {
                "French Direct Object Pronouns (COD - Les pronoms compléments d'objet direct). \
                 Focus on: le, la, les, l', me, te, nous, vous. Rules: Placement BEFORE the verb \
                 (Je la regarde), Negation sandwich (Je ne la regarde pas), Elision (l')."
            }
            TopicId::Imperatif => {
                "French Imperative Mode (L'Impératif). Focus on Verb conjugation, Irregular \
                 verbs (Avoir, Venir, Etre), and Pronoun placement (COD after verb)."
            }
            TopicId::VerbsIr => {
                "French second-group verbs in -IR (Finir, Choisir, Grossir). Focus on the \
                 'ISS' stem in plural forms and present-tense conjugation."
            }
            TopicId::Orientation => {
                "Asking for and giving directions in French (Pour aller à..., tourner à \
                 droite/gauche, c'est loin/près, aller à pied). Polite forms included."
            }
            TopicId::Lyon => {
                "Culture and vocabulary about the city of Lyon: the two rivers, the Bouchon \
                 restaurants, Vieux Lyon, Fourvière, the Confluence district."
            }
        }
    }
}

impl fmt::Display for TopicId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}
