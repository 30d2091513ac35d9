use serde::{Deserialize, Serialize};

/// An English keyword that may translate one or more signs
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Keyword {
    pub id: i64,
    pub text: String,
}

/// A dictionary entry for a single sign.
///
/// `sn` is the sign number: a unique integer defining the ordering of signs
/// in the dictionary. It is nullable and gaps between numbers are allowed so
/// later signs can be inserted. `in_web` gates general-public visibility.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Gloss {
    pub id: i64,
    pub idgloss: String,
    pub annotation_idgloss: Option<String>,
    pub sn: Option<i64>,
    pub in_web: Option<bool>,
    pub is_new: Option<bool>,
    pub blend: Option<String>,
    pub compound: Option<String>,
    pub morph: Option<String>,
    pub sense: Option<i64>,
    pub stem_sn: Option<i64>,
    pub dom_handshape: Option<String>,
    pub sub_handshape: Option<String>,
    pub final_dom_handshape: Option<String>,
    pub final_sub_handshape: Option<String>,
    pub loc_prim: Option<i64>,
    pub final_loc: Option<i64>,
    pub initial_palm_orientation: Option<String>,
    pub final_palm_orientation: Option<String>,
}

/// Column list matching the field order of [`Gloss`], for query_as selects
pub const GLOSS_COLUMNS: &str = "id, idgloss, annotation_idgloss, sn, in_web, is_new, \
     blend, compound, morph, sense, stem_sn, \
     dom_handshape, sub_handshape, final_dom_handshape, final_sub_handshape, \
     loc_prim, final_loc, initial_palm_orientation, final_palm_orientation";

/// The link between a keyword and a gloss, with a disambiguating index
/// for multiple senses of the same keyword
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Translation {
    pub id: i64,
    pub gloss_id: i64,
    pub keyword_id: i64,
    pub idx: i64,
}

/// An English text attached to a gloss, grouped by role on the gloss page
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Definition {
    pub id: i64,
    pub gloss_id: i64,
    pub text: String,
    pub role: String,
    pub count: i64,
    pub published: bool,
}

/// A registered user account
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    pub id: String,
    pub username: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub enabled: bool,
    pub created_at: String,
    pub updated_at: String,
}

/// Relation role between two glosses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RelationRole {
    Variant,
    Antonym,
    Synonym,
    SeeAlso,
    Homophone,
}

impl RelationRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            RelationRole::Variant => "variant",
            RelationRole::Antonym => "antonym",
            RelationRole::Synonym => "synonym",
            RelationRole::SeeAlso => "seealso",
            RelationRole::Homophone => "homophone",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "variant" => Some(RelationRole::Variant),
            "antonym" => Some(RelationRole::Antonym),
            "synonym" => Some(RelationRole::Synonym),
            "seealso" => Some(RelationRole::SeeAlso),
            "homophone" => Some(RelationRole::Homophone),
            _ => None,
        }
    }
}

/// Roles a definition text can be filed under on the gloss page
pub const DEFINITION_ROLE_CHOICES: &[(&str, &str)] = &[
    ("general", "General Definition"),
    ("noun", "As a Noun"),
    ("verb", "As a Verb or Adjective"),
    ("interact", "Interactive"),
    ("deictic", "Deictic"),
    ("modifier", "As Modifier"),
    ("question", "As Question"),
    ("augment", "As Augment"),
    ("note", "Note"),
    ("privatenote", "Private Note"),
];

/// Handshape codes used by the phonology fields
pub const HANDSHAPE_CHOICES: &[(&str, &str)] = &[
    ("notset", "No Value Set"),
    ("0.0", "N/A"),
    ("0.1", "Round"),
    ("0.2", "Okay"),
    ("1.1", "Point"),
    ("1.2", "Hook"),
    ("2.1", "Two"),
    ("2.2", "Kneel"),
    ("2.3", "Perth"),
    ("2.4", "Spoon"),
    ("2.5", "Letter-n"),
    ("2.6", "Wish"),
    ("3.1", "Three"),
    ("3.2", "Mother"),
    ("3.3", "Letter-m"),
    ("4.1", "Four"),
    ("5.1", "Spread"),
    ("5.2", "Ball"),
    ("5.3", "Flat"),
    ("5.4", "Thick"),
    ("5.5", "Cup"),
    ("6.1", "Good"),
    ("6.2", "Bad"),
    ("7.1", "Gun"),
    ("7.2", "Letter-c"),
    ("7.3", "Small"),
    ("7.4", "Seven"),
    ("8.1", "Eight"),
    ("9.1", "Nine"),
    ("10.1", "Fist"),
    ("10.2", "Soon"),
    ("10.3", "Ten"),
    ("11.1", "Write"),
    ("12.1", "Salt"),
    ("13.1", "Middle"),
    ("14.1", "Rude"),
    ("15.1", "Ambivalent"),
    ("16.1", "Love"),
    ("17.1", "Animal"),
    ("18.1", "Queer"),
];

/// Location codes used by the phonology fields
pub const LOCATION_CHOICES: &[(i64, &str)] = &[
    (-1, "No Value Set"),
    (0, "N/A"),
    (1, "Top of head"),
    (2, "Forehead"),
    (3, "Temple"),
    (4, "Eye"),
    (5, "Nose"),
    (6, "Whole of face"),
    (7, "Cheekbone"),
    (8, "Ear or side of head"),
    (9, "Cheek"),
    (10, "Mouth and lips"),
    (11, "Chin"),
    (12, "Neck"),
    (13, "Shoulder"),
    (14, "Chest"),
    (28, "High neutral space"),
    (15, "Stomach"),
    (29, "Neutral space"),
    (16, "Waist"),
    (17, "Below waist"),
    (18, "Upper arm"),
    (19, "Elbow"),
    (20, "Pronated forearm"),
    (21, "Supinated forearm"),
    (22, "Pronated wrist"),
    (23, "Supinated wrist"),
    (24, "Back of hand"),
    (25, "Palm"),
    (26, "Edge of hand"),
    (27, "Fingertips"),
];

/// Palm orientation codes used by the phonology fields
pub const PALM_ORIENTATION_CHOICES: &[(&str, &str)] = &[
    ("notset", "No Value Set"),
    ("prone", "Prone"),
    ("neutral", "Neutral"),
    ("supine", "Supine"),
    ("0", "N/A"),
];
