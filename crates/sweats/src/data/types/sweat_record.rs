use crate::data::error::{DataError, Result};
use chrono::{DateTime, Utc};
use derive_builder::Builder;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use ulid::Ulid;

pub const SWEAT_PK: &str = "Sweat";

/// A flagged player, as stored in DynamoDB.
#[derive(Serialize, Deserialize, Builder, Clone, Debug, PartialEq)]
pub struct SweatRecord {
    /// `Sweat` - Global partition key for all sweat records
    #[builder(setter(custom))]
    pub pk: String,
    /// `Sweat#<ulid>`
    #[builder(setter(custom))]
    pub sk: String,

    pub username: String,
    #[builder(default)]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uuid: Option<String>,

    #[builder(default)]
    #[serde(default)]
    pub stats: SweatStats,

    #[builder(default)]
    #[serde(default)]
    pub milo: bool,
    #[builder(default)]
    #[serde(default)]
    pub potat: bool,
    #[builder(default)]
    #[serde(default)]
    pub aballs: bool,
    #[builder(default)]
    #[serde(default)]
    pub zoiv: bool,

    /// `YYYY-MM-DD`
    pub date_added: String,

    /// When the record was created. Never rewritten.
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub created_ts: DateTime<Utc>,

    #[builder(default)]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub urchin_tag: Option<String>,
}

/// Numeric statistics captured when the record is submitted.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct SweatStats {
    #[serde(default)]
    pub star: f64,
    #[serde(default)]
    pub fkdr: f64,
    #[serde(default)]
    pub wlr: f64,
    #[serde(default)]
    pub bblr: f64,
    #[serde(default)]
    pub kdr: f64,
    #[serde(default)]
    pub finals: f64,
    #[serde(default)]
    pub final_deaths: f64,
    #[serde(default)]
    pub beds: f64,
    #[serde(default)]
    pub beds_lost: f64,
    #[serde(default)]
    pub kills: f64,
    #[serde(default)]
    pub deaths: f64,
}

impl SweatRecordBuilder {
    /// Custom setter for the record id that sets `pk` and `sk` together.
    pub fn record_id(&mut self, id: Ulid) -> &mut Self {
        self.pk = Some(SWEAT_PK.to_string());
        self.sk = Some(sort_key(&id));
        self
    }
}

pub fn sort_key(id: &Ulid) -> String {
    format!("{SWEAT_PK}#{id}")
}

impl SweatRecord {
    pub fn id(&self) -> &str {
        self.sk
            .strip_prefix(SWEAT_PK)
            .and_then(|s| s.strip_prefix('#'))
            .unwrap_or(&self.sk)
    }

    /// Builds the record that gets persisted for a validated submission.
    pub fn create(input: NewSweat, id: Ulid, created_ts: DateTime<Utc>) -> Result<Self> {
        let date_added = input
            .date_added
            .unwrap_or_else(|| created_ts.date_naive().format("%Y-%m-%d").to_string());
        SweatRecordBuilder::default()
            .record_id(id)
            .username(input.username)
            .uuid(input.uuid)
            .stats(input.stats)
            .milo(input.milo)
            .potat(input.potat)
            .aballs(input.aballs)
            .zoiv(input.zoiv)
            .date_added(date_added)
            .created_ts(created_ts)
            .urchin_tag(input.urchin_tag)
            .build()
            .map_err(|e| DataError::InvalidInput(e.to_string()))
    }
}

/// A validated create request. Anything the caller cannot set (id, creation time) is absent.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct NewSweat {
    pub username: String,
    pub uuid: Option<String>,
    pub stats: SweatStats,
    pub milo: bool,
    pub potat: bool,
    pub aballs: bool,
    pub zoiv: bool,
    pub date_added: Option<String>,
    pub urchin_tag: Option<String>,
}

impl NewSweat {
    pub fn new(username: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            ..Default::default()
        }
    }

    /// Parses a create request body. The tag is never taken from the caller.
    pub fn from_json(body: &Value) -> Result<Self> {
        let object = as_object(body)?;

        let username = object
            .get("username")
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .ok_or_else(|| DataError::InvalidInput("username is required".to_string()))?;

        let number = |key: &str| numeric(key, object.get(key));
        let stats = SweatStats {
            star: number("star")?,
            fkdr: number("fkdr")?,
            wlr: number("wlr")?,
            bblr: number("bblr")?,
            kdr: number("kdr")?,
            finals: number("finals")?,
            final_deaths: number("finalDeaths")?,
            beds: number("beds")?,
            beds_lost: number("bedsLost")?,
            kills: number("kills")?,
            deaths: number("deaths")?,
        };

        let flag = |key: &str| object.get(key).is_some_and(truthy);

        Ok(Self {
            username: username.to_string(),
            uuid: non_empty_string(object.get("uuid")),
            stats,
            milo: flag("milo"),
            potat: flag("potat"),
            aballs: flag("aballs"),
            zoiv: flag("zoiv"),
            date_added: non_empty_string(object.get("dateAdded")),
            urchin_tag: None,
        })
    }
}

/// The only fields a partial update may touch.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum UpdatableField {
    Milo,
    Potat,
    Aballs,
    Zoiv,
    UrchinTag,
}

impl UpdatableField {
    pub const ALL: [UpdatableField; 5] = [
        UpdatableField::Milo,
        UpdatableField::Potat,
        UpdatableField::Aballs,
        UpdatableField::Zoiv,
        UpdatableField::UrchinTag,
    ];

    /// The key callers use in request bodies.
    pub fn key(self) -> &'static str {
        match self {
            UpdatableField::Milo => "milo",
            UpdatableField::Potat => "potat",
            UpdatableField::Aballs => "aballs",
            UpdatableField::Zoiv => "zoiv",
            UpdatableField::UrchinTag => "urchinTag",
        }
    }

    /// The attribute name on the stored item.
    pub fn attribute(self) -> &'static str {
        match self {
            UpdatableField::UrchinTag => "urchin_tag",
            other => other.key(),
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|field| field.key() == key)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum PatchValue {
    Flag(bool),
    /// `None` clears the tag.
    Tag(Option<String>),
}

/// A restricted update. Keys outside [`UpdatableField`] never make it in here.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SweatPatch {
    changes: BTreeMap<UpdatableField, PatchValue>,
}

impl SweatPatch {
    pub fn from_json(body: &Value) -> Result<Self> {
        let object = as_object(body)?;
        let mut patch = Self::default();
        for (key, value) in object {
            let Some(field) = UpdatableField::from_key(key) else {
                continue;
            };
            let value = match field {
                UpdatableField::UrchinTag => match value {
                    Value::Null => PatchValue::Tag(None),
                    Value::String(s) => PatchValue::Tag(Some(s.clone())),
                    _ => {
                        return Err(DataError::InvalidInput(
                            "urchinTag must be a string or null".to_string(),
                        ));
                    }
                },
                _ => PatchValue::Flag(truthy(value)),
            };
            patch.changes.insert(field, value);
        }
        Ok(patch)
    }

    #[cfg(test)]
    pub fn set_flag(mut self, field: UpdatableField, value: bool) -> Self {
        if field != UpdatableField::UrchinTag {
            self.changes.insert(field, PatchValue::Flag(value));
        }
        self
    }

    #[cfg(test)]
    pub fn set_tag(mut self, tag: Option<String>) -> Self {
        self.changes
            .insert(UpdatableField::UrchinTag, PatchValue::Tag(tag));
        self
    }

    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }

    pub fn changes(&self) -> impl Iterator<Item = (UpdatableField, &PatchValue)> {
        self.changes.iter().map(|(field, value)| (*field, value))
    }

    pub fn apply(&self, record: &mut SweatRecord) {
        for (field, value) in self.changes() {
            match (field, value) {
                (UpdatableField::Milo, PatchValue::Flag(v)) => record.milo = *v,
                (UpdatableField::Potat, PatchValue::Flag(v)) => record.potat = *v,
                (UpdatableField::Aballs, PatchValue::Flag(v)) => record.aballs = *v,
                (UpdatableField::Zoiv, PatchValue::Flag(v)) => record.zoiv = *v,
                (UpdatableField::UrchinTag, PatchValue::Tag(v)) => record.urchin_tag = v.clone(),
                _ => {}
            }
        }
    }
}

/// Loose truthiness: `null`, `false`, `0`, `NaN` and `""` are false, everything else is true.
pub fn truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

fn numeric(key: &str, value: Option<&Value>) -> Result<f64> {
    let invalid = || DataError::InvalidInput(format!("{key} must be a number"));
    match value {
        None | Some(Value::Null) => Ok(0.0),
        Some(Value::Number(n)) => n.as_f64().ok_or_else(invalid),
        Some(Value::String(s)) if s.trim().is_empty() => Ok(0.0),
        Some(Value::String(s)) => s
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|f| f.is_finite())
            .ok_or_else(invalid),
        Some(_) => Err(invalid()),
    }
}

fn non_empty_string(value: Option<&Value>) -> Option<String> {
    value
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

fn as_object(body: &Value) -> Result<&Map<String, Value>> {
    body.as_object()
        .ok_or_else(|| DataError::InvalidInput("request body must be a JSON object".to_string()))
}
