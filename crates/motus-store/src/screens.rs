// SPDX-License-Identifier: Apache-2.0

use crate::{conv_err, ts_from_sql, ts_to_sql, Store, StoreError};
use motus_model::{
    AthleteId, Intervention, InterventionId, MovementAssessment, MovementAssessmentId, RiskBand,
    RiskSnapshot, RiskSnapshotId,
};
use rusqlite::{params, Row};

fn row_to_assessment(row: &Row<'_>) -> rusqlite::Result<MovementAssessment> {
    let id: String = row.get("id")?;
    let athlete_id: String = row.get("athlete_id")?;
    let session_date: String = row.get("session_date")?;
    let created_at: String = row.get("created_at")?;
    Ok(MovementAssessment {
        id: MovementAssessmentId::parse(&id).map_err(conv_err)?,
        athlete_id: AthleteId::parse(&athlete_id).map_err(conv_err)?,
        session_date: ts_from_sql(&session_date).map_err(conv_err)?,
        screen_type: row.get("screen_type")?,
        score: row.get("score")?,
        notes: row.get("notes")?,
        created_at: ts_from_sql(&created_at).map_err(conv_err)?,
    })
}

fn row_to_intervention(row: &Row<'_>) -> rusqlite::Result<Intervention> {
    let id: String = row.get("id")?;
    let assessment_id: String = row.get("movement_assessment_id")?;
    let created_at: String = row.get("created_at")?;
    Ok(Intervention {
        id: InterventionId::parse(&id).map_err(conv_err)?,
        movement_assessment_id: MovementAssessmentId::parse(&assessment_id).map_err(conv_err)?,
        title: row.get("title")?,
        detail: row.get("detail")?,
        acknowledged: row.get::<_, i64>("acknowledged")? != 0,
        created_at: ts_from_sql(&created_at).map_err(conv_err)?,
    })
}

fn row_to_snapshot(row: &Row<'_>) -> rusqlite::Result<RiskSnapshot> {
    let id: String = row.get("id")?;
    let athlete_id: String = row.get("athlete_id")?;
    let captured_at: String = row.get("captured_at")?;
    let score: f64 = row.get("risk_score")?;
    Ok(RiskSnapshot {
        id: RiskSnapshotId::parse(&id).map_err(conv_err)?,
        athlete_id: AthleteId::parse(&athlete_id).map_err(conv_err)?,
        captured_at: ts_from_sql(&captured_at).map_err(conv_err)?,
        risk_score: score,
        risk_band: RiskBand::from_score(score),
    })
}

impl Store {
    pub fn insert_movement_assessment(
        &self,
        assessment: &MovementAssessment,
    ) -> Result<(), StoreError> {
        self.conn().execute(
            "INSERT INTO movement_assessments
                 (id, athlete_id, session_date, screen_type, score, notes, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                assessment.id.as_str(),
                assessment.athlete_id.as_str(),
                ts_to_sql(&assessment.session_date),
                assessment.screen_type,
                assessment.score,
                assessment.notes,
                ts_to_sql(&assessment.created_at),
            ],
        )?;
        Ok(())
    }

    pub fn get_movement_assessment(
        &self,
        id: &MovementAssessmentId,
    ) -> Result<MovementAssessment, StoreError> {
        let mut stmt = self
            .conn()
            .prepare("SELECT * FROM movement_assessments WHERE id = ?1")?;
        let mut rows = stmt.query_map(params![id.as_str()], row_to_assessment)?;
        match rows.next() {
            Some(row) => Ok(row?),
            None => Err(StoreError::not_found("movement_assessment", id.as_str())),
        }
    }

    pub fn list_movement_assessments(
        &self,
        athlete_id: &AthleteId,
        limit: usize,
    ) -> Result<Vec<MovementAssessment>, StoreError> {
        let mut stmt = self.conn().prepare(
            "SELECT * FROM movement_assessments WHERE athlete_id = ?1
             ORDER BY session_date DESC LIMIT ?2",
        )?;
        let rows = stmt.query_map(
            params![athlete_id.as_str(), limit as i64],
            row_to_assessment,
        )?;
        let mut assessments = Vec::new();
        for row in rows {
            assessments.push(row?);
        }
        Ok(assessments)
    }

    pub fn insert_intervention(&self, intervention: &Intervention) -> Result<(), StoreError> {
        self.conn().execute(
            "INSERT INTO interventions
                 (id, movement_assessment_id, title, detail, acknowledged, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                intervention.id.as_str(),
                intervention.movement_assessment_id.as_str(),
                intervention.title,
                intervention.detail,
                intervention.acknowledged as i64,
                ts_to_sql(&intervention.created_at),
            ],
        )?;
        Ok(())
    }

    pub fn list_interventions(
        &self,
        assessment_id: &MovementAssessmentId,
    ) -> Result<Vec<Intervention>, StoreError> {
        let mut stmt = self.conn().prepare(
            "SELECT * FROM interventions WHERE movement_assessment_id = ?1 ORDER BY created_at",
        )?;
        let rows = stmt.query_map(params![assessment_id.as_str()], row_to_intervention)?;
        let mut interventions = Vec::new();
        for row in rows {
            interventions.push(row?);
        }
        Ok(interventions)
    }

    pub fn acknowledge_intervention(
        &self,
        id: &InterventionId,
    ) -> Result<Intervention, StoreError> {
        let changed = self.conn().execute(
            "UPDATE interventions SET acknowledged = 1 WHERE id = ?1",
            params![id.as_str()],
        )?;
        if changed == 0 {
            return Err(StoreError::not_found("intervention", id.as_str()));
        }
        let mut stmt = self
            .conn()
            .prepare("SELECT * FROM interventions WHERE id = ?1")?;
        let mut rows = stmt.query_map(params![id.as_str()], row_to_intervention)?;
        match rows.next() {
            Some(row) => Ok(row?),
            None => Err(StoreError::not_found("intervention", id.as_str())),
        }
    }

    /// Append-only risk series; there is no update path.
    pub fn insert_risk_snapshot(&self, snapshot: &RiskSnapshot) -> Result<(), StoreError> {
        self.conn().execute(
            "INSERT INTO risk_snapshots (id, athlete_id, captured_at, risk_score, risk_band)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                snapshot.id.as_str(),
                snapshot.athlete_id.as_str(),
                ts_to_sql(&snapshot.captured_at),
                snapshot.risk_score,
                snapshot.risk_band.as_str(),
            ],
        )?;
        Ok(())
    }

    pub fn list_risk_snapshots(
        &self,
        athlete_id: &AthleteId,
        limit: usize,
    ) -> Result<Vec<RiskSnapshot>, StoreError> {
        let mut stmt = self.conn().prepare(
            "SELECT * FROM risk_snapshots WHERE athlete_id = ?1
             ORDER BY captured_at DESC LIMIT ?2",
        )?;
        let rows = stmt.query_map(params![athlete_id.as_str(), limit as i64], row_to_snapshot)?;
        let mut snapshots = Vec::new();
        for row in rows {
            snapshots.push(row?);
        }
        Ok(snapshots)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::athletes::tests::fixture_athlete;
    use chrono::{Duration, Utc};

    fn seeded_store() -> (Store, AthleteId) {
        let store = Store::open_in_memory().expect("open");
        let athlete = fixture_athlete("Screened");
        store.insert_athlete(&athlete).expect("insert athlete");
        let id = athlete.id;
        (store, id)
    }

    #[test]
    fn assessment_and_intervention_lifecycle() {
        let (store, athlete_id) = seeded_store();
        let now = Utc::now();
        let assessment = MovementAssessment {
            id: MovementAssessmentId::generate(),
            athlete_id: athlete_id.clone(),
            session_date: now,
            screen_type: "fms".to_string(),
            score: 2.1,
            notes: None,
            created_at: now,
        };
        store
            .insert_movement_assessment(&assessment)
            .expect("insert assessment");

        let intervention = Intervention {
            id: InterventionId::generate(),
            movement_assessment_id: assessment.id.clone(),
            title: "Hip mobility block".to_string(),
            detail: Some("3x/week".to_string()),
            acknowledged: false,
            created_at: now,
        };
        store
            .insert_intervention(&intervention)
            .expect("insert intervention");

        let acked = store
            .acknowledge_intervention(&intervention.id)
            .expect("acknowledge");
        assert!(acked.acknowledged);
        assert_eq!(store.list_interventions(&assessment.id).unwrap().len(), 1);
    }

    #[test]
    fn snapshots_are_most_recent_first_and_limited() {
        let (store, athlete_id) = seeded_store();
        let base = Utc::now();
        for i in 0..5 {
            let score = 0.1 * f64::from(i);
            store
                .insert_risk_snapshot(&RiskSnapshot {
                    id: RiskSnapshotId::generate(),
                    athlete_id: athlete_id.clone(),
                    captured_at: base + Duration::minutes(i64::from(i)),
                    risk_score: score,
                    risk_band: RiskBand::from_score(score),
                })
                .expect("insert snapshot");
        }
        let snapshots = store.list_risk_snapshots(&athlete_id, 3).expect("list");
        assert_eq!(snapshots.len(), 3);
        assert!(snapshots[0].captured_at > snapshots[1].captured_at);
        assert!(snapshots[1].captured_at > snapshots[2].captured_at);
    }
}
