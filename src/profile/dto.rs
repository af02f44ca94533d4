use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::items::{number, number_text, required, whole, EditForm, Entity};
use crate::store::{de, Collection};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sex {
    Male,
    Female,
    #[default]
    #[serde(rename = "")]
    Unset,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DietPreference {
    Normal,
    #[serde(rename = "dietintermittent", alias = "intermittent")]
    Intermittent,
    Vegetarian,
    Vegan,
    #[default]
    #[serde(rename = "")]
    Unset,
}

/// Values accepted from the command line and edit buffers.
impl std::str::FromStr for Sex {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "male" | "m" => Ok(Self::Male),
            "female" | "f" => Ok(Self::Female),
            "" => Ok(Self::Unset),
            other => Err(format!("unknown sex {other:?}")),
        }
    }
}

impl std::str::FromStr for DietPreference {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "normal" => Ok(Self::Normal),
            "intermittent" | "dietintermittent" => Ok(Self::Intermittent),
            "vegetarian" => Ok(Self::Vegetarian),
            "vegan" => Ok(Self::Vegan),
            "" => Ok(Self::Unset),
            other => Err(format!("unknown diet preference {other:?}")),
        }
    }
}

/// The household profile. The store keeps a list but the app only ever
/// has one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    #[serde(deserialize_with = "de::id_lenient")]
    pub id: u64,
    #[serde(flatten)]
    pub fields: ProfileDraft,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileDraft {
    #[serde(default)]
    pub fullname: String,
    #[serde(deserialize_with = "de::u32_lenient", default)]
    pub memberoffamily: u32,
    /// Centimetres.
    #[serde(deserialize_with = "de::f64_lenient", default)]
    pub height: f64,
    /// Kilograms.
    #[serde(deserialize_with = "de::f64_lenient", default)]
    pub weight: f64,
    #[serde(deserialize_with = "de::u32_lenient", default)]
    pub ages: u32,
    #[serde(default)]
    pub dailyactivities: String,
    #[serde(default)]
    pub sex: Sex,
    #[serde(default)]
    pub dietpreference: DietPreference,
}

impl Entity for UserProfile {
    type Draft = ProfileDraft;

    const COLLECTION: Collection = Collection::Users;
    const LABEL: &'static str = "profile";

    fn id(&self) -> u64 {
        self.id
    }

    fn draft(&self) -> ProfileDraft {
        self.fields.clone()
    }

    fn from_draft(id: u64, fields: ProfileDraft) -> Self {
        Self { id, fields }
    }
}

/// Profile edit buffer; numbers stay text until submit.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProfileForm {
    pub id: Option<u64>,
    pub fullname: String,
    pub memberoffamily: String,
    pub height: String,
    pub weight: String,
    pub ages: String,
    pub dailyactivities: String,
    pub sex: Sex,
    pub dietpreference: DietPreference,
}

impl EditForm for ProfileForm {
    type Entity = UserProfile;

    fn id(&self) -> Option<u64> {
        self.id
    }

    fn from_entity(p: &UserProfile) -> Self {
        let f = &p.fields;
        Self {
            id: Some(p.id),
            fullname: f.fullname.clone(),
            memberoffamily: f.memberoffamily.to_string(),
            height: number_text(f.height),
            weight: number_text(f.weight),
            ages: f.ages.to_string(),
            dailyactivities: f.dailyactivities.clone(),
            sex: f.sex,
            dietpreference: f.dietpreference,
        }
    }

    fn validate(&self) -> Result<ProfileDraft, ValidationError> {
        let fullname = required("fullname", &self.fullname)?.to_string();
        let memberoffamily = whole("memberoffamily", &self.memberoffamily)?;
        let ages = whole("ages", &self.ages)?;
        let height = number("height", &self.height)?;
        let weight = number("weight", &self.weight)?;
        let dailyactivities = required("dailyactivities", &self.dailyactivities)?.to_string();
        if self.sex == Sex::Unset {
            return Err(ValidationError::Missing("sex"));
        }
        if self.dietpreference == DietPreference::Unset {
            return Err(ValidationError::Missing("dietpreference"));
        }
        Ok(ProfileDraft {
            fullname,
            memberoffamily,
            height,
            weight,
            ages,
            dailyactivities,
            sex: self.sex,
            dietpreference: self.dietpreference,
        })
    }
}
