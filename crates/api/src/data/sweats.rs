use chrono::{DateTime, Utc};
use serde::Serialize;
use sweats::data::types::sweat_record::SweatRecord;

#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct SweatView {
    #[serde(rename = "_id")]
    pub id: String,
    pub username: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uuid: Option<String>,
    pub star: f64,
    pub fkdr: f64,
    pub wlr: f64,
    pub bblr: f64,
    pub kdr: f64,
    pub finals: f64,
    pub final_deaths: f64,
    pub beds: f64,
    pub beds_lost: f64,
    pub kills: f64,
    pub deaths: f64,
    pub milo: bool,
    pub potat: bool,
    pub aballs: bool,
    pub zoiv: bool,
    pub date_added: String,
    pub created_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub urchin_tag: Option<String>,
}

impl From<SweatRecord> for SweatView {
    fn from(record: SweatRecord) -> Self {
        let id = record.id().to_string();
        let stats = record.stats;
        Self {
            id,
            username: record.username,
            uuid: record.uuid,
            star: stats.star,
            fkdr: stats.fkdr,
            wlr: stats.wlr,
            bblr: stats.bblr,
            kdr: stats.kdr,
            finals: stats.finals,
            final_deaths: stats.final_deaths,
            beds: stats.beds,
            beds_lost: stats.beds_lost,
            kills: stats.kills,
            deaths: stats.deaths,
            milo: record.milo,
            potat: record.potat,
            aballs: record.aballs,
            zoiv: record.zoiv,
            date_added: record.date_added,
            created_at: record.created_ts,
            urchin_tag: record.urchin_tag,
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeletedSweat {
    pub ok: bool,
    pub deleted_id: String,
}
