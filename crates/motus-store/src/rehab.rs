// SPDX-License-Identifier: Apache-2.0

//! Rehab assessment persistence. Parent row and its videos are written in one
//! transaction; JSON-array columns round-trip through `serde_json` here so
//! callers never see encoded strings.

use crate::{conv_err, ts_from_sql, ts_to_sql, Store, StoreError};
use motus_model::{
    Athlete, AthleteId, RehabAssessment, RehabAssessmentId, RehabTestType, RehabVideo,
    RehabVideoId, SurgicalSide,
};
use rusqlite::{params, Row};
use serde_json::Value;

fn row_to_rehab_assessment(row: &Row<'_>) -> rusqlite::Result<RehabAssessment> {
    let id: String = row.get("id")?;
    let athlete_id: String = row.get("athlete_id")?;
    let session_date: String = row.get("session_date")?;
    let side: String = row.get("surgical_side")?;
    let concerns_json: String = row.get("concerns_json")?;
    let exercises_json: String = row.get("recommended_exercises_json")?;
    let raw_model_output_json: Option<String> = row.get("raw_model_output_json")?;
    let created_at: String = row.get("created_at")?;
    let raw_model_output = raw_model_output_json
        .map(|raw| serde_json::from_str::<Value>(&raw))
        .transpose()
        .map_err(conv_err)?;
    Ok(RehabAssessment {
        id: RehabAssessmentId::parse(&id).map_err(conv_err)?,
        athlete_id: AthleteId::parse(&athlete_id).map_err(conv_err)?,
        session_date: ts_from_sql(&session_date).map_err(conv_err)?,
        surgical_side: SurgicalSide::parse(&side).map_err(conv_err)?,
        limb_symmetry_score: row.get("limb_symmetry_score")?,
        cleared: row.get::<_, i64>("cleared")? != 0,
        concerns: serde_json::from_str(&concerns_json).map_err(conv_err)?,
        recommended_exercises: serde_json::from_str(&exercises_json).map_err(conv_err)?,
        athlete_summary: row.get("athlete_summary")?,
        parent_summary: row.get("parent_summary")?,
        clinician_summary: row.get("clinician_summary")?,
        raw_model_output,
        created_at: ts_from_sql(&created_at).map_err(conv_err)?,
    })
}

fn row_to_video(row: &Row<'_>) -> rusqlite::Result<RehabVideo> {
    let id: String = row.get("id")?;
    let assessment_id: String = row.get("rehab_assessment_id")?;
    let test_type: String = row.get("test_type")?;
    let captured_at: String = row.get("captured_at")?;
    Ok(RehabVideo {
        id: RehabVideoId::parse(&id).map_err(conv_err)?,
        rehab_assessment_id: RehabAssessmentId::parse(&assessment_id).map_err(conv_err)?,
        test_type: RehabTestType::parse(&test_type).map_err(conv_err)?,
        url: row.get("url")?,
        captured_at: ts_from_sql(&captured_at).map_err(conv_err)?,
    })
}

impl Store {
    /// Persist an assessment and its videos atomically. Either everything
    /// lands or nothing does.
    pub fn insert_rehab_assessment(
        &self,
        assessment: &RehabAssessment,
        videos: &[RehabVideo],
    ) -> Result<(), StoreError> {
        let concerns_json = serde_json::to_string(&assessment.concerns)?;
        let exercises_json = serde_json::to_string(&assessment.recommended_exercises)?;
        let raw_model_output_json = assessment
            .raw_model_output
            .as_ref()
            .map(serde_json::to_string)
            .transpose()?;

        let tx = self.conn().unchecked_transaction()?;
        tx.execute(
            "INSERT INTO rehab_assessments
                 (id, athlete_id, session_date, surgical_side, limb_symmetry_score, cleared,
                  concerns_json, recommended_exercises_json, athlete_summary, parent_summary,
                  clinician_summary, raw_model_output_json, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)",
            params![
                assessment.id.as_str(),
                assessment.athlete_id.as_str(),
                ts_to_sql(&assessment.session_date),
                assessment.surgical_side.as_str(),
                assessment.limb_symmetry_score,
                assessment.cleared as i64,
                concerns_json,
                exercises_json,
                assessment.athlete_summary,
                assessment.parent_summary,
                assessment.clinician_summary,
                raw_model_output_json,
                ts_to_sql(&assessment.created_at),
            ],
        )?;
        for video in videos {
            tx.execute(
                "INSERT INTO rehab_videos (id, rehab_assessment_id, test_type, url, captured_at)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                params![
                    video.id.as_str(),
                    video.rehab_assessment_id.as_str(),
                    video.test_type.as_str(),
                    video.url,
                    ts_to_sql(&video.captured_at),
                ],
            )?;
        }
        tx.commit()?;
        Ok(())
    }

    pub fn get_rehab_assessment(
        &self,
        id: &RehabAssessmentId,
    ) -> Result<RehabAssessment, StoreError> {
        let mut stmt = self
            .conn()
            .prepare("SELECT * FROM rehab_assessments WHERE id = ?1")?;
        let mut rows = stmt.query_map(params![id.as_str()], row_to_rehab_assessment)?;
        match rows.next() {
            Some(row) => Ok(row?),
            None => Err(StoreError::not_found("rehab_assessment", id.as_str())),
        }
    }

    /// Assessment joined with its athlete and videos, for the detail endpoint.
    pub fn get_rehab_detail(
        &self,
        id: &RehabAssessmentId,
    ) -> Result<(RehabAssessment, Athlete, Vec<RehabVideo>), StoreError> {
        let assessment = self.get_rehab_assessment(id)?;
        let athlete = self.get_athlete(&assessment.athlete_id)?;
        let videos = self.list_rehab_videos(id)?;
        Ok((assessment, athlete, videos))
    }

    pub fn list_rehab_assessments(
        &self,
        athlete_id: &AthleteId,
        limit: usize,
    ) -> Result<Vec<RehabAssessment>, StoreError> {
        let mut stmt = self.conn().prepare(
            "SELECT * FROM rehab_assessments WHERE athlete_id = ?1
             ORDER BY session_date DESC LIMIT ?2",
        )?;
        let rows = stmt.query_map(
            params![athlete_id.as_str(), limit as i64],
            row_to_rehab_assessment,
        )?;
        let mut assessments = Vec::new();
        for row in rows {
            assessments.push(row?);
        }
        Ok(assessments)
    }

    pub fn list_rehab_videos(
        &self,
        assessment_id: &RehabAssessmentId,
    ) -> Result<Vec<RehabVideo>, StoreError> {
        let mut stmt = self.conn().prepare(
            "SELECT * FROM rehab_videos WHERE rehab_assessment_id = ?1 ORDER BY captured_at",
        )?;
        let rows = stmt.query_map(params![assessment_id.as_str()], row_to_video)?;
        let mut videos = Vec::new();
        for row in rows {
            videos.push(row?);
        }
        Ok(videos)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::athletes::tests::fixture_athlete;
    use chrono::{Duration, Utc};
    use serde_json::json;

    fn fixture_assessment(athlete_id: &AthleteId, minutes_ago: i64) -> RehabAssessment {
        let at = Utc::now() - Duration::minutes(minutes_ago);
        RehabAssessment {
            id: RehabAssessmentId::generate(),
            athlete_id: athlete_id.clone(),
            session_date: at,
            surgical_side: SurgicalSide::Right,
            limb_symmetry_score: 0.87,
            cleared: false,
            concerns: vec!["triple_hop below floor".to_string()],
            recommended_exercises: vec!["Triple hop progression".to_string()],
            athlete_summary: "Keep building.".to_string(),
            parent_summary: "Steady progress.".to_string(),
            clinician_summary: "LSI 87%, not yet cleared.".to_string(),
            raw_model_output: Some(json!({"model": "stub", "tokens": 42})),
            created_at: at,
        }
    }

    fn fixture_video(assessment_id: &RehabAssessmentId, test_type: RehabTestType) -> RehabVideo {
        RehabVideo {
            id: RehabVideoId::generate(),
            rehab_assessment_id: assessment_id.clone(),
            test_type,
            url: "https://cdn.example.com/clip.mp4".to_string(),
            captured_at: Utc::now(),
        }
    }

    #[test]
    fn assessment_with_videos_round_trips() {
        let store = Store::open_in_memory().expect("open");
        let athlete = fixture_athlete("Rehabbing");
        store.insert_athlete(&athlete).expect("insert athlete");

        let assessment = fixture_assessment(&athlete.id, 0);
        let videos = vec![
            fixture_video(&assessment.id, RehabTestType::SingleLegHop),
            fixture_video(&assessment.id, RehabTestType::Squat),
        ];
        store
            .insert_rehab_assessment(&assessment, &videos)
            .expect("insert");

        let (loaded, loaded_athlete, loaded_videos) =
            store.get_rehab_detail(&assessment.id).expect("detail");
        assert_eq!(loaded.concerns, assessment.concerns);
        assert_eq!(
            loaded.recommended_exercises,
            assessment.recommended_exercises
        );
        assert_eq!(loaded.raw_model_output, assessment.raw_model_output);
        assert_eq!(loaded_athlete.id, athlete.id);
        assert_eq!(loaded_videos.len(), 2);
    }

    #[test]
    fn insert_is_atomic_when_a_video_violates_schema() {
        let store = Store::open_in_memory().expect("open");
        let athlete = fixture_athlete("Atomic");
        store.insert_athlete(&athlete).expect("insert athlete");

        let assessment = fixture_assessment(&athlete.id, 0);
        let good = fixture_video(&assessment.id, RehabTestType::Lunge);
        // Second video references a nonexistent parent, so the FK fires.
        let mut orphan = fixture_video(&assessment.id, RehabTestType::Squat);
        orphan.rehab_assessment_id = RehabAssessmentId::generate();

        let result = store.insert_rehab_assessment(&assessment, &[good, orphan]);
        assert!(result.is_err());
        assert!(matches!(
            store.get_rehab_assessment(&assessment.id),
            Err(StoreError::NotFound { .. })
        ));
    }

    #[test]
    fn history_is_most_recent_first_and_limited() {
        let store = Store::open_in_memory().expect("open");
        let athlete = fixture_athlete("History");
        store.insert_athlete(&athlete).expect("insert athlete");
        for minutes_ago in [50, 40, 30, 20, 10, 0] {
            let assessment = fixture_assessment(&athlete.id, minutes_ago);
            let video = fixture_video(&assessment.id, RehabTestType::TripleHop);
            store
                .insert_rehab_assessment(&assessment, &[video])
                .expect("insert");
        }
        let history = store.list_rehab_assessments(&athlete.id, 5).expect("list");
        assert_eq!(history.len(), 5);
        for pair in history.windows(2) {
            assert!(pair[0].session_date >= pair[1].session_date);
        }
    }

    #[test]
    fn assessment_requires_existing_athlete() {
        let store = Store::open_in_memory().expect("open");
        let assessment = fixture_assessment(&AthleteId::generate(), 0);
        assert!(store.insert_rehab_assessment(&assessment, &[]).is_err());
    }
}
