// SPDX-License-Identifier: Apache-2.0

//! Schema DDL. Timestamps are RFC 3339 TEXT; JSON-array columns are TEXT
//! holding valid JSON documents.

pub const CURRENT_VERSION: i32 = 1;

pub const SCHEMA_VERSION_TABLE: &str = r"
CREATE TABLE IF NOT EXISTS schema_version (
    version INTEGER NOT NULL,
    applied_at TEXT NOT NULL
);
";

pub const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS athletes (
    id TEXT PRIMARY KEY,
    name TEXT NOT NULL,
    sport TEXT NOT NULL,
    position TEXT,
    team TEXT,
    sex TEXT NOT NULL,
    date_of_birth TEXT NOT NULL,
    height_cm REAL,
    weight_kg REAL,
    notes TEXT,
    archived INTEGER NOT NULL DEFAULT 0,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS athlete_contacts (
    id TEXT PRIMARY KEY,
    athlete_id TEXT NOT NULL REFERENCES athletes(id),
    name TEXT NOT NULL,
    relationship TEXT NOT NULL,
    email TEXT,
    phone TEXT,
    role TEXT
);
CREATE INDEX IF NOT EXISTS idx_contacts_athlete_id ON athlete_contacts(athlete_id);

CREATE TABLE IF NOT EXISTS movement_assessments (
    id TEXT PRIMARY KEY,
    athlete_id TEXT NOT NULL REFERENCES athletes(id),
    session_date TEXT NOT NULL,
    screen_type TEXT NOT NULL,
    score REAL NOT NULL,
    notes TEXT,
    created_at TEXT NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_movement_assessments_athlete
    ON movement_assessments(athlete_id, session_date);

CREATE TABLE IF NOT EXISTS interventions (
    id TEXT PRIMARY KEY,
    movement_assessment_id TEXT NOT NULL REFERENCES movement_assessments(id),
    title TEXT NOT NULL,
    detail TEXT,
    acknowledged INTEGER NOT NULL DEFAULT 0,
    created_at TEXT NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_interventions_assessment
    ON interventions(movement_assessment_id);

CREATE TABLE IF NOT EXISTS risk_snapshots (
    id TEXT PRIMARY KEY,
    athlete_id TEXT NOT NULL REFERENCES athletes(id),
    captured_at TEXT NOT NULL,
    risk_score REAL NOT NULL,
    risk_band TEXT NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_risk_snapshots_athlete
    ON risk_snapshots(athlete_id, captured_at);

CREATE TABLE IF NOT EXISTS rehab_assessments (
    id TEXT PRIMARY KEY,
    athlete_id TEXT NOT NULL REFERENCES athletes(id),
    session_date TEXT NOT NULL,
    surgical_side TEXT NOT NULL,
    limb_symmetry_score REAL NOT NULL,
    cleared INTEGER NOT NULL,
    concerns_json TEXT NOT NULL,
    recommended_exercises_json TEXT NOT NULL,
    athlete_summary TEXT NOT NULL,
    parent_summary TEXT NOT NULL,
    clinician_summary TEXT NOT NULL,
    raw_model_output_json TEXT,
    created_at TEXT NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_rehab_assessments_athlete
    ON rehab_assessments(athlete_id, session_date);

CREATE TABLE IF NOT EXISTS rehab_videos (
    id TEXT PRIMARY KEY,
    rehab_assessment_id TEXT NOT NULL REFERENCES rehab_assessments(id),
    test_type TEXT NOT NULL,
    url TEXT NOT NULL,
    captured_at TEXT NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_rehab_videos_assessment
    ON rehab_videos(rehab_assessment_id);

CREATE TABLE IF NOT EXISTS audience_rewrites (
    id TEXT PRIMARY KEY,
    movement_assessment_id TEXT REFERENCES movement_assessments(id),
    audience TEXT NOT NULL,
    tone TEXT NOT NULL,
    source_text TEXT NOT NULL,
    rewritten_text TEXT NOT NULL,
    created_at TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS users (
    id TEXT PRIMARY KEY,
    email TEXT NOT NULL UNIQUE,
    name TEXT NOT NULL,
    role TEXT NOT NULL,
    athlete_id TEXT REFERENCES athletes(id),
    created_at TEXT NOT NULL
);
"#;
