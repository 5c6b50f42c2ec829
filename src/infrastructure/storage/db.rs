use crate::domain::error::KrishiError;
use crate::domain::model::{
    Conversation, CropFilter, CropGuide, Language, PestFilter, PestInfo, WeatherTip,
};
use crate::domain::traits::{ConversationStore, FarmGuideStore};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::path::Path;
use tokio_rusqlite::{params, Connection};

pub const DEFAULT_HISTORY_LIMIT: usize = 10;

pub async fn init_database(db_path: &Path) -> Result<Connection, KrishiError> {
    let db = Connection::open(db_path.to_path_buf()).await?;
    create_schema(&db).await?;
    Ok(db)
}

pub async fn init_memory_database() -> Result<Connection, KrishiError> {
    let db = Connection::open_in_memory().await?;
    create_schema(&db).await?;
    Ok(db)
}

async fn create_schema(db: &Connection) -> Result<(), KrishiError> {
    db.call(|conn| {
        conn.execute(
            "CREATE TABLE IF NOT EXISTS conversations (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                user_id TEXT NOT NULL,
                question TEXT NOT NULL,
                answer TEXT NOT NULL,
                language TEXT NOT NULL,
                used_fallback INTEGER NOT NULL DEFAULT 0,
                created_at TEXT NOT NULL
            )",
            [],
        )?;

        conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_conversations_user ON conversations(user_id, id)",
            [],
        )?;

        conn.execute(
            "CREATE TABLE IF NOT EXISTS crop_guidance (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                crop_name TEXT NOT NULL,
                season TEXT,
                location TEXT,
                soil_type TEXT,
                planting_time TEXT,
                harvesting_time TEXT,
                water_requirements TEXT,
                fertilizer_needs TEXT,
                common_varieties TEXT,
                special_notes TEXT
            )",
            [],
        )?;

        conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_crop_season ON crop_guidance(season, location)",
            [],
        )?;

        conn.execute(
            "CREATE TABLE IF NOT EXISTS pest_control (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                pest_name TEXT NOT NULL,
                affected_crops TEXT,
                symptoms TEXT,
                organic_control TEXT,
                chemical_control TEXT,
                prevention TEXT,
                severity TEXT
            )",
            [],
        )?;

        conn.execute(
            "CREATE TABLE IF NOT EXISTS weather_tips (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                weather_condition TEXT NOT NULL,
                crop_impact TEXT,
                recommended_actions TEXT,
                protection_measures TEXT,
                timing_considerations TEXT
            )",
            [],
        )?;

        seed_guides(conn)?;

        Ok(())
    })
    .await?;

    Ok(())
}

// 内置农事指导数据

const CROP_SEED: &[[&str; 10]] = &[
    [
        "Rice", "Kharif", "Punjab", "Clay loam", "June-July", "October-November",
        "Requires standing water, 5-7 cm depth during early stages",
        "120:60:40 kg NPK per hectare",
        "Pusa Basmati, PR-126, PAU 201",
        "Sensitive to water stress during flowering and grain filling stages",
    ],
    [
        "Wheat", "Rabi", "Uttar Pradesh", "Sandy loam", "November-December", "March-April",
        "4-6 irrigations, critical stages: crown root, tillering, flowering",
        "150:60:40 kg NPK per hectare",
        "HD 2967, PBW 550, DBW 17",
        "Avoid waterlogging, requires good drainage",
    ],
    [
        "Cotton", "Kharif", "Maharashtra", "Black cotton soil", "June-July", "December-March",
        "6-8 irrigations, critical stages: flowering and boll formation",
        "100:50:50 kg NPK per hectare",
        "Bollgard II, RCH 2, Bunny",
        "Requires warm climate and well-drained soil",
    ],
];

const PEST_SEED: &[[&str; 7]] = &[
    [
        "Brown Plant Hopper", "Rice",
        "Yellowing and browning of leaves, hopper burn",
        "Use neem oil spray, encourage natural predators like spiders",
        "Imidacloprid 17.8 SL @ 0.3 ml/l or Buprofezin 25 SC @ 1.0 ml/l",
        "Avoid excessive nitrogen, maintain proper water level",
        "High",
    ],
    [
        "Bollworm", "Cotton",
        "Holes in bolls, damaged flowers",
        "Use neem seed kernel extract, pheromone traps",
        "Emamectin benzoate 5 SG @ 0.4 g/l or Spinosad 45 SC @ 0.3 ml/l",
        "Deep summer plowing, crop rotation",
        "High",
    ],
    [
        "Aphids", "Wheat, Mustard, Vegetables",
        "Curling of leaves, sticky honeydew on leaves",
        "Spray neem oil or soap solution",
        "Imidacloprid 17.8 SL @ 0.3 ml/l or Thiamethoxam 25 WG @ 0.2 g/l",
        "Remove weeds, use yellow sticky traps",
        "Medium",
    ],
];

const WEATHER_TIP_SEED: &[[&str; 5]] = &[
    [
        "Drought",
        "Reduced crop yield, wilting, stunted growth",
        "Use drought-resistant varieties, mulching, drip irrigation",
        "Water conservation techniques, shade nets",
        "Avoid transplanting during peak drought",
    ],
    [
        "Heavy Rainfall",
        "Waterlogging, nutrient leaching, disease spread",
        "Improve drainage, apply foliar nutrients",
        "Raised beds, proper field leveling",
        "Delay fertilizer application until after heavy rain",
    ],
    [
        "Heat Wave",
        "Flower drop, reduced pollination, sunburn",
        "Increase irrigation frequency, use shade nets",
        "Mulching, anti-transpirants",
        "Irrigate in early morning or late evening",
    ],
];

fn table_is_empty(conn: &rusqlite::Connection, table: &str) -> rusqlite::Result<bool> {
    let count: i64 = conn.query_row(&format!("SELECT COUNT(*) FROM {}", table), [], |row| {
        row.get(0)
    })?;
    Ok(count == 0)
}

/// Fill empty guide tables with the bundled rows. Existing rows are left alone.
fn seed_guides(conn: &rusqlite::Connection) -> rusqlite::Result<()> {
    if table_is_empty(conn, "crop_guidance")? {
        for row in CROP_SEED {
            conn.execute(
                "INSERT INTO crop_guidance (crop_name, season, location, soil_type, planting_time,
                    harvesting_time, water_requirements, fertilizer_needs, common_varieties, special_notes)
                 VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
                rusqlite::params_from_iter(row.iter()),
            )?;
        }
    }

    if table_is_empty(conn, "pest_control")? {
        for row in PEST_SEED {
            conn.execute(
                "INSERT INTO pest_control (pest_name, affected_crops, symptoms, organic_control,
                    chemical_control, prevention, severity)
                 VALUES (?, ?, ?, ?, ?, ?, ?)",
                rusqlite::params_from_iter(row.iter()),
            )?;
        }
    }

    if table_is_empty(conn, "weather_tips")? {
        for row in WEATHER_TIP_SEED {
            conn.execute(
                "INSERT INTO weather_tips (weather_condition, crop_impact, recommended_actions,
                    protection_measures, timing_considerations)
                 VALUES (?, ?, ?, ?, ?)",
                rusqlite::params_from_iter(row.iter()),
            )?;
        }
    }

    tracing::debug!("Farm guide tables ready");
    Ok(())
}

/// SQLite-backed conversation log
#[derive(Clone)]
pub struct SqliteConversationStore {
    conn: Connection,
}

impl SqliteConversationStore {
    pub fn new(conn: Connection) -> Self {
        Self { conn }
    }

    pub async fn count(&self) -> Result<usize, KrishiError> {
        let count: i64 = self
            .conn
            .call(|conn| conn.query_row("SELECT COUNT(*) FROM conversations", [], |row| row.get(0)))
            .await?;
        Ok(count as usize)
    }
}

#[async_trait]
impl ConversationStore for SqliteConversationStore {
    async fn save_conversation(
        &self,
        user_id: &str,
        question: &str,
        answer: &str,
        language: Language,
        used_fallback: bool,
    ) -> Result<i64, KrishiError> {
        let user_id = user_id.to_string();
        let question = question.to_string();
        let answer = answer.to_string();
        let now = Utc::now().to_rfc3339();

        let id = self
            .conn
            .call(move |conn| {
                conn.execute(
                    "INSERT INTO conversations (user_id, question, answer, language, used_fallback, created_at)
                     VALUES (?, ?, ?, ?, ?, ?)",
                    params![user_id, question, answer, language.as_str(), used_fallback, now],
                )?;
                Ok(conn.last_insert_rowid())
            })
            .await?;

        tracing::debug!("Saved conversation {}", id);
        Ok(id)
    }

    async fn recent_conversations(
        &self,
        user_id: &str,
        limit: usize,
    ) -> Result<Vec<Conversation>, KrishiError> {
        let user_id = user_id.to_string();
        let limit = limit as i64;

        let rows = self
            .conn
            .call(move |conn| {
                let mut stmt = conn.prepare(
                    "SELECT id, user_id, question, answer, language, used_fallback, created_at
                     FROM conversations
                     WHERE user_id = ?
                     ORDER BY id DESC
                     LIMIT ?",
                )?;
                let rows = stmt
                    .query_map(params![user_id, limit], |row| {
                        Ok((
                            row.get::<_, i64>(0)?,
                            row.get::<_, String>(1)?,
                            row.get::<_, String>(2)?,
                            row.get::<_, String>(3)?,
                            row.get::<_, String>(4)?,
                            row.get::<_, bool>(5)?,
                            row.get::<_, String>(6)?,
                        ))
                    })?
                    .collect::<Result<Vec<_>, rusqlite::Error>>()?;
                Ok(rows)
            })
            .await?;

        rows.into_iter()
            .map(
                |(id, user_id, question, answer, language, used_fallback, created_at)| {
                    let created_at = DateTime::parse_from_rfc3339(&created_at)
                        .map(|t| t.with_timezone(&Utc))
                        .map_err(|e| {
                            KrishiError::Data(format!("bad timestamp in conversation log: {}", e))
                        })?;
                    Ok(Conversation {
                        id,
                        user_id,
                        question,
                        answer,
                        language: Language::parse_or_default(&language),
                        used_fallback,
                        created_at,
                    })
                },
            )
            .collect()
    }
}

/// SQLite-backed crop, pest and weather guides
#[derive(Clone)]
pub struct SqliteGuideStore {
    conn: Connection,
}

impl SqliteGuideStore {
    pub fn new(conn: Connection) -> Self {
        Self { conn }
    }
}

/// Appends `clause` with its lowercased argument when `value` is set and non-blank.
fn push_filter(
    sql: &mut String,
    args: &mut Vec<String>,
    clause: &str,
    value: Option<&str>,
    like: bool,
) {
    if let Some(value) = value.map(str::trim).filter(|v| !v.is_empty()) {
        sql.push_str(clause);
        let value = value.to_lowercase();
        args.push(if like { format!("%{}%", value) } else { value });
    }
}

#[async_trait]
impl FarmGuideStore for SqliteGuideStore {
    async fn crop_guidance(&self, filter: &CropFilter) -> Result<Vec<CropGuide>, KrishiError> {
        let mut sql = String::from(
            "SELECT crop_name, season, location, soil_type, planting_time, harvesting_time,
                    water_requirements, fertilizer_needs, common_varieties, special_notes
             FROM crop_guidance WHERE 1=1",
        );
        let mut args = Vec::new();
        push_filter(
            &mut sql,
            &mut args,
            " AND LOWER(crop_name) = ?",
            filter.crop_name.as_deref(),
            false,
        );
        push_filter(
            &mut sql,
            &mut args,
            " AND LOWER(season) = ?",
            filter.season.as_deref(),
            false,
        );
        push_filter(
            &mut sql,
            &mut args,
            " AND LOWER(location) LIKE ?",
            filter.location.as_deref(),
            true,
        );
        sql.push_str(" ORDER BY crop_name, season, location");

        let guides = self
            .conn
            .call(move |conn| {
                let mut stmt = conn.prepare(&sql)?;
                let rows = stmt
                    .query_map(rusqlite::params_from_iter(args.iter()), |row| {
                        Ok(CropGuide {
                            crop_name: row.get(0)?,
                            season: row.get(1)?,
                            location: row.get(2)?,
                            soil_type: row.get(3)?,
                            planting_time: row.get(4)?,
                            harvesting_time: row.get(5)?,
                            water_requirements: row.get(6)?,
                            fertilizer_needs: row.get(7)?,
                            common_varieties: row.get(8)?,
                            special_notes: row.get(9)?,
                        })
                    })?
                    .collect::<Result<Vec<_>, rusqlite::Error>>()?;
                Ok(rows)
            })
            .await?;

        Ok(guides)
    }

    async fn pest_info(&self, filter: &PestFilter) -> Result<Vec<PestInfo>, KrishiError> {
        let mut sql = String::from(
            "SELECT pest_name, affected_crops, symptoms, organic_control, chemical_control,
                    prevention, severity
             FROM pest_control WHERE 1=1",
        );
        let mut args = Vec::new();
        push_filter(
            &mut sql,
            &mut args,
            " AND LOWER(pest_name) LIKE ?",
            filter.pest_name.as_deref(),
            true,
        );
        push_filter(
            &mut sql,
            &mut args,
            " AND LOWER(affected_crops) LIKE ?",
            filter.crop_name.as_deref(),
            true,
        );
        push_filter(
            &mut sql,
            &mut args,
            " AND LOWER(severity) = ?",
            filter.severity.as_deref(),
            false,
        );
        sql.push_str(" ORDER BY pest_name");

        let pests = self
            .conn
            .call(move |conn| {
                let mut stmt = conn.prepare(&sql)?;
                let rows = stmt
                    .query_map(rusqlite::params_from_iter(args.iter()), |row| {
                        Ok(PestInfo {
                            pest_name: row.get(0)?,
                            affected_crops: row.get(1)?,
                            symptoms: row.get(2)?,
                            organic_control: row.get(3)?,
                            chemical_control: row.get(4)?,
                            prevention: row.get(5)?,
                            severity: row.get(6)?,
                        })
                    })?
                    .collect::<Result<Vec<_>, rusqlite::Error>>()?;
                Ok(rows)
            })
            .await?;

        Ok(pests)
    }

    async fn weather_tips(&self, condition: Option<&str>) -> Result<Vec<WeatherTip>, KrishiError> {
        let mut sql = String::from(
            "SELECT weather_condition, crop_impact, recommended_actions, protection_measures,
                    timing_considerations
             FROM weather_tips WHERE 1=1",
        );
        let mut args = Vec::new();
        push_filter(
            &mut sql,
            &mut args,
            " AND LOWER(weather_condition) LIKE ?",
            condition,
            true,
        );
        sql.push_str(" ORDER BY weather_condition");

        let tips = self
            .conn
            .call(move |conn| {
                let mut stmt = conn.prepare(&sql)?;
                let rows = stmt
                    .query_map(rusqlite::params_from_iter(args.iter()), |row| {
                        Ok(WeatherTip {
                            weather_condition: row.get(0)?,
                            crop_impact: row.get(1)?,
                            recommended_actions: row.get(2)?,
                            protection_measures: row.get(3)?,
                            timing_considerations: row.get(4)?,
                        })
                    })?
                    .collect::<Result<Vec<_>, rusqlite::Error>>()?;
                Ok(rows)
            })
            .await?;

        Ok(tips)
    }
}
